// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One scheduled task: a descriptor, a reader, and a timer thread.

use crate::reader::{ReaderControl, SharedDescriptor, TailReader};
use crate::remote::{ConnectError, CredentialCache, RemoteShellReader};
use crate::LocalFileReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tl_adapters::{CredentialPrompt, TextSink, TreePersist};
use tl_core::target::SourceLocation;
use tl_core::{ScheduleKind, TargetDescriptor, TaskEvent, TaskState};

struct TaskInner {
    descriptor: SharedDescriptor,
    full_name: String,
    display_name: String,
    schedule: ScheduleKind,
    interval: Duration,
    /// The enable *request*; the state machine transitions when a tick
    /// observes it.
    enabled: AtomicBool,
    state: Mutex<TaskState>,
    reader: Mutex<TailReader>,
    control: ReaderControl,
}

/// Handle to one live scheduled task. Cloning shares the task; the timer
/// thread holds its own handle and exits cooperatively.
#[derive(Clone)]
pub struct ScheduledTask {
    inner: Arc<TaskInner>,
}

impl ScheduledTask {
    /// Build the reader for the descriptor's source, enable it (for a
    /// remote source this performs connection and credential
    /// negotiation), and arm the timer.
    ///
    /// On a connect failure the error is surfaced through the sink and
    /// returned; the caller must not register the task.
    pub fn spawn(
        descriptor: TargetDescriptor,
        sink: Arc<dyn TextSink>,
        persist: Arc<dyn TreePersist>,
        prompt: Arc<dyn CredentialPrompt>,
        cache: CredentialCache,
    ) -> Result<Self, ConnectError> {
        let full_name = descriptor.full_name().to_string();
        let display_name = descriptor.display_name().to_string();
        let schedule = descriptor.schedule;
        let interval = Duration::from_millis(descriptor.interval_ms);
        let source = descriptor.source.clone();

        let descriptor: SharedDescriptor = Arc::new(Mutex::new(descriptor));

        let reader = match source {
            SourceLocation::Local(path) => TailReader::Local(LocalFileReader::new(
                Arc::clone(&descriptor),
                path,
                Arc::clone(&sink),
                persist,
            )),
            SourceLocation::Ssh(ssh) => {
                match RemoteShellReader::connect(
                    Arc::clone(&descriptor),
                    ssh,
                    Arc::clone(&sink),
                    persist,
                    prompt,
                    cache,
                ) {
                    Ok(reader) => TailReader::Remote(reader),
                    Err(e) => {
                        sink.notify_error(&format!(
                            "{sep}{e}{sep}",
                            sep = crate::batch::LINE_SEPARATOR
                        ));
                        return Err(e);
                    }
                }
            }
        };

        let control = reader.control();
        descriptor.lock().unwrap_or_else(|e| e.into_inner()).enabled = true;

        let task = Self {
            inner: Arc::new(TaskInner {
                descriptor,
                full_name,
                display_name,
                schedule,
                interval,
                enabled: AtomicBool::new(true),
                state: Mutex::new(TaskState::Armed),
                reader: Mutex::new(reader),
                control,
            }),
        };
        task.arm_timer();
        Ok(task)
    }

    /// Start the timer thread for repeating and one-shot kinds; the first
    /// fire comes after one full interval. `ScheduleKind::None` installs
    /// no timer and polls only via [`ScheduledTask::tick`].
    fn arm_timer(&self) {
        match self.inner.schedule {
            ScheduleKind::None => {}
            ScheduleKind::OneShot | ScheduleKind::Repeating => {
                let inner = Arc::clone(&self.inner);
                std::thread::spawn(move || loop {
                    std::thread::sleep(inner.interval);
                    if !tick(&inner) {
                        break;
                    }
                });
            }
        }
    }

    /// Manual tick entry point. Returns `false` once the task has
    /// observed disablement (or consumed its one-shot fire) and will
    /// never poll again.
    pub fn tick(&self) -> bool {
        tick(&self.inner)
    }

    /// Flip the enable request. Disabling a remote task tears its session
    /// down immediately; the timer itself only cancels on its next tick.
    pub fn set_enabled(&self, enabled: bool) {
        tracing::debug!(target_name = self.inner.full_name, enabled, "set_enabled");
        self.inner.enabled.store(enabled, Ordering::SeqCst);
        self.inner
            .descriptor
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .enabled = enabled;
        if !enabled {
            self.inner.control.shutdown();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> TaskState {
        *self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn full_name(&self) -> &str {
        &self.inner.full_name
    }

    pub fn display_name(&self) -> &str {
        &self.inner.display_name
    }

    pub fn schedule(&self) -> ScheduleKind {
        self.inner.schedule
    }

    /// The shared descriptor, for callers that snapshot read state.
    pub fn descriptor(&self) -> SharedDescriptor {
        Arc::clone(&self.inner.descriptor)
    }
}

/// One tick. Observing disablement here — and nowhere else — is what
/// tears a repeating timer down, so an in-flight tick always completes
/// and a disable takes effect on the next one.
fn tick(inner: &TaskInner) -> bool {
    {
        let mut state = inner.state.lock().unwrap_or_else(|e| e.into_inner());
        if !inner.enabled.load(Ordering::SeqCst) {
            *state = state.transition(inner.schedule, TaskEvent::Disable);
        }
        if !state.is_armed() {
            return false;
        }
    }

    inner.reader.lock().unwrap_or_else(|e| e.into_inner()).poll();

    let mut state = inner.state.lock().unwrap_or_else(|e| e.into_inner());
    *state = state.transition(inner.schedule, TaskEvent::Fired);
    state.is_armed()
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
