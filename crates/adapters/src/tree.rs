// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target-tree persistence.
//!
//! The tree itself (hierarchy, UI layout) belongs to the embedding
//! application; the engine only pokes [`TreePersist`] when a durable
//! descriptor field changes (a newly detected encoding, a rename) so the
//! owner can re-save. [`FileTreeStore`] is the line-per-leaf store the
//! embedder can build that save on.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tl_core::TargetRecord;

/// Persistence hook: "some durable target state changed, save the tree".
pub trait TreePersist: Send + Sync {
    fn persist_target_tree(&self);
}

/// Hook for embedders without persistence (tests, one-shot CLI runs).
#[derive(Clone, Default)]
pub struct NoopTreePersist;

impl NoopTreePersist {
    pub fn new() -> Self {
        Self
    }
}

impl TreePersist for NoopTreePersist {
    fn persist_target_tree(&self) {}
}

#[derive(Debug, thiserror::Error)]
pub enum TreeStoreError {
    #[error("error writing tree file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading tree file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File-backed record store: one quoted-`;` line per leaf target, UTF-8.
#[derive(Debug, Clone)]
pub struct FileTreeStore {
    path: PathBuf,
}

impl FileTreeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the whole store from the given records.
    pub fn save(&self, records: &[TargetRecord]) -> Result<(), TreeStoreError> {
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut file = fs::File::create(path)?;
            for record in records {
                writeln!(file, "{}", record.to_line())?;
            }
            file.flush()
        };
        write(&self.path).map_err(|source| TreeStoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Read all records back. Unparseable lines are skipped with a
    /// warning; a missing file is an empty store.
    pub fn load(&self) -> Result<Vec<TargetRecord>, TreeStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(TreeStoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match TargetRecord::parse_line(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "skipping tree line");
                }
            }
        }
        Ok(records)
    }
}

/// Fake persistence hook for tests: counts invocations.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeTreePersist {
    count: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeTreePersist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persist_count(&self) -> usize {
        self.count.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TreePersist for FakeTreePersist {
    fn persist_target_tree(&self) {
        self.count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
