// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule kinds and the scheduled-task state machine.
//!
//! The state machine is pure: the engine drives it from its timer thread
//! and acts on the returned state. Disablement is only ever observed on
//! the next tick, never mid-sleep; callers that depend on in-flight ticks
//! completing get exactly that.

use serde::{Deserialize, Serialize};

/// How a target's timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// No timer; polls happen only by explicit invocation.
    None,
    /// A single delayed fire, after which the task is consumed.
    OneShot,
    /// Fixed-rate repeating fires, first fire after one interval.
    Repeating,
}

/// Lifecycle of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Timer active, polls run on each tick.
    Armed,
    /// Disabled; the timer cancels itself on the next tick. Terminal —
    /// re-arming requires constructing a new task.
    Disarmed,
    /// A one-shot task that has fired. Terminal.
    OneShotConsumed,
}

/// Events observed by a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    /// The timer fired and the poll ran.
    Fired,
    /// `set_enabled(false)` was requested.
    Disable,
}

impl TaskState {
    /// Apply an event for a task of the given schedule kind.
    pub fn transition(self, kind: ScheduleKind, event: TaskEvent) -> TaskState {
        match (self, event) {
            (TaskState::Armed, TaskEvent::Fired) => match kind {
                ScheduleKind::OneShot => TaskState::OneShotConsumed,
                ScheduleKind::None | ScheduleKind::Repeating => TaskState::Armed,
            },
            (TaskState::Armed, TaskEvent::Disable) => TaskState::Disarmed,
            // Terminal states: no resurrection.
            (TaskState::Disarmed, _) => TaskState::Disarmed,
            (TaskState::OneShotConsumed, _) => TaskState::OneShotConsumed,
        }
    }

    /// Whether the next tick should run a poll (as opposed to cancelling
    /// the timer).
    pub fn is_armed(self) -> bool {
        self == TaskState::Armed
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
