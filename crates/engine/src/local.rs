// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental polling of a growing local file.

use crate::batch::{notify_read_error, Batcher};
use crate::reader::SharedDescriptor;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tl_adapters::{TextSink, TreePersist};
use tl_core::encoding;
use tl_core::target::{OFFSET_AT_END, OFFSET_FROM_START};

/// Polls one local file, tracking a byte offset across polls.
pub struct LocalFileReader {
    descriptor: SharedDescriptor,
    path: PathBuf,
    sink: Arc<dyn TextSink>,
    persist: Arc<dyn TreePersist>,
}

impl LocalFileReader {
    pub fn new(
        descriptor: SharedDescriptor,
        path: PathBuf,
        sink: Arc<dyn TextSink>,
        persist: Arc<dyn TreePersist>,
    ) -> Self {
        Self {
            descriptor,
            path,
            sink,
            persist,
        }
    }

    /// One poll: emit everything between the tracked offset and the
    /// current end of file, then advance the offset.
    ///
    /// Offset semantics (see `tl_core::target`): `-1` reads from the top
    /// without seeking; `0` silently catches up to the current end; any
    /// other value resumes there unless the file shrank since the last
    /// poll, in which case consumption restarts from the top.
    pub fn poll(&mut self) {
        let (batch_size, known_encoding, offset, last_length) = {
            let desc = self.descriptor.lock().unwrap_or_else(|e| e.into_inner());
            (
                desc.effective_batch_size(),
                desc.encoding,
                desc.offset,
                desc.last_length,
            )
        };

        let encoding = match known_encoding {
            Some(encoding) => encoding,
            None => self.detect_encoding(),
        };

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(file = %self.path.display(), error = %e, "error opening file");
                notify_read_error(self.sink.as_ref(), &e);
                return;
            }
        };
        let current_length = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                notify_read_error(self.sink.as_ref(), &e);
                return;
            }
        };

        let start = if offset == OFFSET_FROM_START {
            0
        } else if offset == OFFSET_AT_END {
            current_length
        } else if last_length <= current_length {
            offset as u64
        } else {
            // Shrunk since the last poll: do not seek past a rotated
            // file, restart consumption from the top.
            tracing::info!(
                file = %self.path.display(),
                last_length,
                current_length,
                "file shrank, restarting from the top"
            );
            0
        };

        let mut reader = BufReader::new(file);
        if start > 0 {
            if let Err(e) = reader.seek(SeekFrom::Start(start)) {
                notify_read_error(self.sink.as_ref(), &e);
                return;
            }
        }

        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes) {
            notify_read_error(self.sink.as_ref(), &e);
            return;
        }

        let (text, _, _) = encoding.decode(&bytes);
        let mut batcher = Batcher::new(self.sink.as_ref(), batch_size);
        for line in text.split_inclusive('\n') {
            batcher.push_line(line);
        }
        batcher.flush();

        let consumed = start + bytes.len() as u64;
        let mut desc = self.descriptor.lock().unwrap_or_else(|e| e.into_inner());
        desc.last_length = consumed;
        desc.offset = consumed as i64;
    }

    /// First-poll detection; the result is sticky either way, and a
    /// conclusive detection is worth persisting.
    fn detect_encoding(&self) -> &'static encoding_rs::Encoding {
        let detected = encoding::detect_file(&self.path);
        let encoding = detected.unwrap_or_else(encoding::fallback);
        match detected {
            Some(encoding) => {
                tracing::info!(file = %self.path.display(), encoding = encoding.name(), "detected encoding");
            }
            None => {
                tracing::warn!(
                    file = %self.path.display(),
                    default = encoding.name(),
                    "no encoding detected, using default"
                );
            }
        }
        self.descriptor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .encoding = Some(encoding);
        if detected.is_some() {
            self.persist.persist_target_tree();
        }
        encoding
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
