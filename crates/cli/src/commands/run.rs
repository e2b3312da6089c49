// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tl run`: follow every target defined in a TOML config.
//!
//! The config names the targets; an optional `tree` path points at the
//! line-per-leaf record store used to persist durable state (detected
//! encodings survive restarts through it).

use crate::prompt::StdinPrompt;
use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tl_adapters::{
    CredentialPrompt, FileTreeStore, NoopTreePersist, StdoutSink, TextSink, TreePersist,
};
use tl_core::record::AUTO_DETECT;
use tl_core::target::OFFSET_FROM_START;
use tl_core::{encoding, ScheduleKind, SourceLocation, TargetDescriptor, TargetRecord};
use tl_engine::{CredentialCache, ScheduledTask, SchedulerRegistry, SharedDescriptor};

#[derive(Args)]
pub struct RunArgs {
    /// Path to the TOML config
    config: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Record store for durable target state; omit to run stateless.
    pub tree: Option<PathBuf>,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TargetConfig {
    /// Registry key; defaults to the source string.
    pub full_name: Option<String>,
    pub source: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: i32,
    /// Encoding name; omitted means auto-detect.
    pub encoding: Option<String>,
    #[serde(default = "default_schedule")]
    pub schedule: ScheduleKind,
    #[serde(default)]
    pub from_start: bool,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_batch_size() -> i32 {
    100
}

fn default_schedule() -> ScheduleKind {
    ScheduleKind::Repeating
}

impl Config {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("invalid config")?;
        if config.targets.is_empty() {
            bail!("config defines no targets");
        }
        Ok(config)
    }
}

impl TargetConfig {
    pub(crate) fn to_descriptor(&self) -> Result<TargetDescriptor> {
        let location = SourceLocation::parse(&self.source)?;
        let full_name = self.full_name.clone().unwrap_or_else(|| self.source.clone());
        let mut desc = TargetDescriptor::new(full_name, location);
        desc.interval_ms = self.interval_ms;
        desc.batch_size = self.batch_size;
        desc.schedule = self.schedule;
        if self.from_start {
            desc.offset = OFFSET_FROM_START;
        }
        if let Some(label) = &self.encoding {
            desc.encoding = Some(
                encoding::lookup(label)
                    .with_context(|| format!("unsupported encoding: {label}"))?,
            );
        }
        Ok(desc)
    }
}

/// Re-applies persisted encodings so a restart keeps earlier detections.
pub(crate) fn merge_persisted_encoding(desc: &mut TargetDescriptor, records: &[TargetRecord]) {
    if desc.encoding.is_some() {
        return;
    }
    let Some(record) = records.iter().find(|r| r.full_name == desc.full_name()) else {
        return;
    };
    if record.encoding != AUTO_DETECT {
        desc.encoding = encoding::lookup(&record.encoding);
    }
}

/// Persistence hook over the record store: snapshots every live
/// descriptor and rewrites the store.
struct TreeSaver {
    store: FileTreeStore,
    descriptors: Mutex<Vec<SharedDescriptor>>,
}

impl TreeSaver {
    fn new(store: FileTreeStore) -> Self {
        Self {
            store,
            descriptors: Mutex::new(Vec::new()),
        }
    }

    fn track(&self, descriptor: SharedDescriptor) {
        self.descriptors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(descriptor);
    }
}

impl TreePersist for TreeSaver {
    fn persist_target_tree(&self) {
        let records: Vec<TargetRecord> = self
            .descriptors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|d| TargetRecord::from_descriptor(&d.lock().unwrap_or_else(|e| e.into_inner())))
            .collect();
        if let Err(e) = self.store.save(&records) {
            tracing::error!(error = %e, "tree persist failed");
        }
    }
}

pub fn handle(args: RunArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("cannot read config {}", args.config.display()))?;
    let config = Config::parse(&text)?;

    let (saver, persisted_records) = match &config.tree {
        Some(path) => {
            let store = FileTreeStore::new(path);
            let records = store.load()?;
            (Some(Arc::new(TreeSaver::new(store))), records)
        }
        None => (None, Vec::new()),
    };
    let persist: Arc<dyn TreePersist> = match &saver {
        Some(saver) => Arc::clone(saver) as Arc<dyn TreePersist>,
        None => Arc::new(NoopTreePersist::new()),
    };

    let registry = SchedulerRegistry::new();
    let cache = CredentialCache::new();
    let sink: Arc<dyn TextSink> = Arc::new(StdoutSink::new());
    let prompt: Arc<dyn CredentialPrompt> = Arc::new(StdinPrompt::new());

    let mut registered = Vec::new();
    for target in &config.targets {
        let mut desc = target.to_descriptor()?;
        merge_persisted_encoding(&mut desc, &persisted_records);

        let full_name = desc.full_name().to_string();
        if registry.contains(&full_name) {
            tracing::warn!(target_name = full_name, "duplicate target in config, skipped");
            continue;
        }

        match ScheduledTask::spawn(
            desc,
            Arc::clone(&sink),
            Arc::clone(&persist),
            Arc::clone(&prompt),
            cache.clone(),
        ) {
            Ok(task) => {
                if let Some(saver) = &saver {
                    saver.track(task.descriptor());
                }
                registry.add(task);
                registered.push(full_name);
            }
            Err(e) => {
                tracing::error!(target_name = full_name, error = %e, "target not registered");
            }
        }
    }

    if registry.is_empty() {
        bail!("no targets could be registered");
    }

    // Snapshot the freshly loaded state once at startup.
    persist.persist_target_tree();

    super::stream_until_interrupted(&registry, &registered)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
