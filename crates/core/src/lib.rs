//! tl-core: Core library for the taillight tail-scheduling system
//!
//! This crate provides:
//! - Target descriptors: what to tail, how often, and the per-target
//!   read state carried between polls
//! - Schedule kinds and the scheduled-task state machine
//! - Character-encoding lookup and bounded-effort detection
//! - The persisted per-target record and its line codec

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod encoding;
pub mod record;
pub mod schedule;
pub mod target;

// Re-exports
pub use record::{RecordError, TargetRecord};
pub use schedule::{ScheduleKind, TaskEvent, TaskState};
pub use target::{SourceError, SourceLocation, SshLocation, TargetDescriptor};
