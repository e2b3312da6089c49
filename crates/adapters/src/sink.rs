// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text sink: the consumer of decoded batches.

use std::io::Write;

/// Receives decoded text batches and inline error notices.
///
/// Implementations must be callable from non-UI threads; a GUI sink is
/// expected to hand off to its own thread internally. Errors arrive in
/// the same viewport as tailed content, wrapped in blank separator lines
/// by the caller.
pub trait TextSink: Send + Sync {
    /// Append one flushed batch of decoded lines.
    fn append_batch(&self, text: &str);

    /// Append an error notice (same viewport, no separate channel).
    fn notify_error(&self, text: &str);
}

/// Sink that streams straight to stdout.
#[derive(Clone, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl TextSink for StdoutSink {
    fn append_batch(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout means the consumer is gone; nothing to report to.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn notify_error(&self, text: &str) {
        self.append_batch(text);
    }
}

/// Recorded sink call.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    AppendBatch(String),
    NotifyError(String),
}

/// Fake sink for tests; records every call.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeSink {
    calls: std::sync::Arc<std::sync::Mutex<Vec<SinkCall>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Only the appended batches, in order.
    pub fn batches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::AppendBatch(text) => Some(text),
                SinkCall::NotifyError(_) => None,
            })
            .collect()
    }

    /// Only the error notices, in order.
    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::NotifyError(text) => Some(text),
                SinkCall::AppendBatch(_) => None,
            })
            .collect()
    }

    /// Concatenation of every appended batch.
    pub fn text(&self) -> String {
        self.batches().concat()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TextSink for FakeSink {
    fn append_batch(&self, text: &str) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SinkCall::AppendBatch(text.to_string()));
    }

    fn notify_error(&self, text: &str) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SinkCall::NotifyError(text.to_string()));
    }
}
