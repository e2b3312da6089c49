// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reader dispatch: one closed set of two variants, chosen once at task
//! construction from the source's scheme prefix.

use crate::local::LocalFileReader;
use crate::remote::{RemoteShared, RemoteShellReader};
use std::sync::{Arc, Mutex};
use tl_core::TargetDescriptor;

/// A target's descriptor, shared between the registry, its task, and its
/// reader. Only the owning reader mutates the read-state fields.
pub type SharedDescriptor = Arc<Mutex<TargetDescriptor>>;

/// The reader bound to one scheduled task.
pub enum TailReader {
    Local(LocalFileReader),
    Remote(RemoteShellReader),
}

impl TailReader {
    /// Read whatever new content is available and emit it to the sink.
    /// Never fails: read errors are reported through the sink.
    pub fn poll(&mut self) {
        match self {
            TailReader::Local(reader) => reader.poll(),
            TailReader::Remote(reader) => reader.poll(),
        }
    }

    /// Shared handle used to disable the reader from other threads.
    pub fn control(&self) -> ReaderControl {
        match self {
            TailReader::Local(_) => ReaderControl { remote: None },
            TailReader::Remote(reader) => ReaderControl {
                remote: Some(reader.shared()),
            },
        }
    }
}

/// Cross-thread disable handle. For a local reader there is nothing to
/// tear down; for a remote reader this closes the session, which also
/// unblocks the drain thread.
#[derive(Clone, Default)]
pub struct ReaderControl {
    remote: Option<Arc<RemoteShared>>,
}

impl ReaderControl {
    pub(crate) fn shutdown(&self) {
        if let Some(remote) = &self.remote {
            remote.shutdown();
        }
    }
}
