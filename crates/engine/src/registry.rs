// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler registry: full name → live scheduled task.

use crate::task::ScheduledTask;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Thread-safe map of the currently polling targets.
///
/// Constructor-injected and cheaply cloneable (clones share the map), so
/// embedders and tests can run isolated instances. Callers never need
/// their own locking; every operation is atomic on the map.
///
/// Absence of a key means "not currently polling" — the target may still
/// exist in the embedder's tree, just idle. Callers are expected to check
/// [`SchedulerRegistry::contains`] before [`SchedulerRegistry::add`] to
/// avoid polling the same target twice.
#[derive(Clone, Default)]
pub struct SchedulerRegistry {
    tasks: Arc<Mutex<HashMap<String, ScheduledTask>>>,
}

impl SchedulerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a task under its full name.
    ///
    /// A task already present under that name is displaced and disabled,
    /// keeping at most one armed task per identifier.
    pub fn add(&self, task: ScheduledTask) {
        tracing::info!("Start read of file: {}", task.display_name());
        let displaced = self
            .tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(task.full_name().to_string(), task);
        if let Some(old) = displaced {
            tracing::warn!(
                target_name = old.full_name(),
                "duplicate add displaced a live task"
            );
            old.set_enabled(false);
        }
    }

    /// Disable and drop the task, if present. Idempotent.
    pub fn remove(&self, full_name: &str) {
        let removed = self
            .tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(full_name);
        if let Some(task) = removed {
            tracing::info!("Stop read of file: {}", task.display_name());
            task.set_enabled(false);
        }
    }

    /// Re-enable a present task in place.
    ///
    /// Only effective while the task's timer has not yet observed a prior
    /// disable; a task whose timer already cancelled (or whose remote
    /// session was torn down) needs `remove` + a fresh `add`.
    pub fn enable(&self, full_name: &str) {
        if let Some(task) = self.get(full_name) {
            task.set_enabled(true);
        }
    }

    /// Disable a present task in place, keeping its slot. The repeating
    /// timer self-cancels on its next tick; use [`SchedulerRegistry::remove`]
    /// for a hard stop.
    pub fn disable(&self, full_name: &str) {
        if let Some(task) = self.get(full_name) {
            task.set_enabled(false);
        }
    }

    pub fn get(&self, full_name: &str) -> Option<ScheduledTask> {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(full_name)
            .cloned()
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
