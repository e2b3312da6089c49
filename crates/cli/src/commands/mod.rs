// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod follow;
pub mod run;

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tl_engine::SchedulerRegistry;

/// Block until Ctrl-C, then stop every registered target.
pub fn stream_until_interrupted(registry: &SchedulerRegistry, ids: &[String]) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        eprintln!("\nStopping tails...");
        r.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
    }

    for id in ids {
        registry.remove(id);
    }
    Ok(())
}
