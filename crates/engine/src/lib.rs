// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! taillight tail engine
//!
//! One timer thread per active target, plus one drain thread per remote
//! session. The [`SchedulerRegistry`] is the process-wide entry point:
//! it maps target full names to their live [`ScheduledTask`]s.

mod batch;
mod local;
mod reader;
mod registry;
mod remote;
mod task;

pub use local::LocalFileReader;
pub use reader::{ReaderControl, SharedDescriptor, TailReader};
pub use registry::SchedulerRegistry;
pub use remote::{ConnectError, CredentialCache, RemoteShellReader};
pub use task::ScheduledTask;
