// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! External collaborators of the tail engine, behind narrow traits.
//!
//! The engine never talks to a UI, a password dialog, or the tree file
//! directly; it talks to these traits. Production implementations live
//! here too where they are trivial (stdout sink, file-backed tree store);
//! fakes record their calls and are exported for other crates' tests via
//! the `test-support` feature.

pub mod credentials;
pub mod sink;
pub mod tree;

pub use credentials::{CredentialPrompt, Credentials, NoPrompt};
pub use sink::{StdoutSink, TextSink};
pub use tree::{FileTreeStore, NoopTreePersist, TreePersist, TreeStoreError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use credentials::{FakePrompt, PromptCall};
#[cfg(any(test, feature = "test-support"))]
pub use sink::{FakeSink, SinkCall};
#[cfg(any(test, feature = "test-support"))]
pub use tree::FakeTreePersist;
