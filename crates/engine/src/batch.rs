// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line accumulation shared by the local and remote readers.

use tl_adapters::TextSink;

/// Platform line separator appended to re-terminated lines.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Accumulates decoded lines and flushes them to the sink in batches.
///
/// Blank lines (empty, or a bare carriage return) are dropped and do not
/// count toward the batch threshold. Lines whose raw terminator was
/// already `\r\n` pass through verbatim; everything else is re-terminated
/// with the platform separator.
pub struct Batcher<'a> {
    sink: &'a dyn TextSink,
    batch_size: usize,
    buf: String,
    count: usize,
}

impl<'a> Batcher<'a> {
    pub fn new(sink: &'a dyn TextSink, batch_size: usize) -> Self {
        Self {
            sink,
            batch_size,
            buf: String::new(),
            count: 0,
        }
    }

    /// Feed one raw line, terminator included (a final unterminated line
    /// is fed as-is).
    pub fn push_line(&mut self, raw: &str) {
        let content = raw.trim_end_matches(['\r', '\n']);
        if content.is_empty() {
            return;
        }

        if raw.ends_with("\r\n") {
            self.buf.push_str(raw);
        } else {
            self.buf.push_str(content);
            self.buf.push_str(LINE_SEPARATOR);
        }

        self.count += 1;
        if self.count == self.batch_size {
            self.flush();
        }
    }

    /// Flush whatever has accumulated, if anything.
    pub fn flush(&mut self) {
        if self.count == 0 {
            return;
        }
        self.sink.append_batch(&self.buf);
        self.buf.clear();
        self.count = 0;
    }
}

/// Report a read failure inline: two blank separator lines, then the
/// error text, through the sink's error channel.
pub fn notify_read_error(sink: &dyn TextSink, error: &dyn std::fmt::Display) {
    sink.notify_error(&format!(
        "{sep}{sep}Error opening file: {error}{sep}",
        sep = LINE_SEPARATOR
    ));
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
