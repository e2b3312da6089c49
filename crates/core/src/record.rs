// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted per-target record and its line codec.
//!
//! The tree file is owned by an external collaborator; this module only
//! fixes the record shape and the one-line-per-leaf wire format so that
//! descriptor state (notably a detected encoding) survives restarts.

use crate::target::{SourceLocation, TargetDescriptor};
use serde::{Deserialize, Serialize};

/// Encoding field sentinel for "not yet detected".
pub const AUTO_DETECT: &str = "Auto detect";

/// Number of `;`-separated fields in one record line.
const FIELD_COUNT: usize = 8;

/// Error decoding a persisted record line.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed record line: {0}")]
    Malformed(String),
    #[error("record line has {found} fields, expected {FIELD_COUNT}: {line}")]
    FieldCount { found: usize, line: String },
    #[error("invalid number {value:?} in field {field}")]
    Number { field: &'static str, value: String },
    #[error(transparent)]
    Source(#[from] crate::target::SourceError),
}

/// One persisted leaf target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub display_name: String,
    pub full_name: String,
    pub source: String,
    pub batch_size: i32,
    pub interval_ms: u64,
    pub display_colors: bool,
    /// Encoding name, or [`AUTO_DETECT`] when none is pinned yet.
    pub encoding: String,
    pub color_template: String,
}

impl TargetRecord {
    pub fn from_descriptor(desc: &TargetDescriptor) -> Self {
        Self {
            display_name: desc.display_name().to_string(),
            full_name: desc.full_name().to_string(),
            source: desc.source.to_string(),
            batch_size: desc.batch_size,
            interval_ms: desc.interval_ms,
            display_colors: desc.display_colors,
            encoding: desc
                .encoding
                .map(|e| e.name().to_string())
                .unwrap_or_else(|| AUTO_DETECT.to_string()),
            color_template: desc.color_template.clone(),
        }
    }

    /// Rebuild a descriptor. An encoding name that is no longer supported
    /// degrades to auto-detection with a warning, never an error.
    pub fn to_descriptor(&self) -> Result<TargetDescriptor, RecordError> {
        let source = SourceLocation::parse(&self.source)?;
        let mut desc = TargetDescriptor::new(self.full_name.clone(), source);
        desc.set_display_name(self.display_name.clone());
        desc.batch_size = self.batch_size;
        desc.interval_ms = self.interval_ms;
        desc.display_colors = self.display_colors;
        desc.color_template = self.color_template.clone();
        if self.encoding != AUTO_DETECT {
            desc.encoding = crate::encoding::lookup(&self.encoding);
            if desc.encoding.is_none() {
                tracing::warn!(
                    target_name = %self.full_name,
                    encoding = %self.encoding,
                    "persisted encoding not supported, falling back to auto-detection"
                );
            }
        }
        Ok(desc)
    }

    /// Encode as one tree-file line: every field double-quoted, joined
    /// with `;`.
    pub fn to_line(&self) -> String {
        format!(
            "\"{}\";\"{}\";\"{}\";\"{}\";\"{}\";\"{}\";\"{}\";\"{}\"",
            self.display_name,
            self.full_name,
            self.source,
            self.batch_size,
            self.interval_ms,
            self.display_colors,
            self.encoding,
            self.color_template,
        )
    }

    /// Decode one tree-file line.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields = split_quoted(line)
            .ok_or_else(|| RecordError::Malformed(line.to_string()))?;
        if fields.len() != FIELD_COUNT {
            return Err(RecordError::FieldCount {
                found: fields.len(),
                line: line.to_string(),
            });
        }

        Ok(Self {
            display_name: fields[0].to_string(),
            full_name: fields[1].to_string(),
            source: fields[2].to_string(),
            batch_size: parse_number(fields[3], "batch_size")?,
            interval_ms: parse_number(fields[4], "interval_ms")?,
            display_colors: fields[5] == "true",
            encoding: fields[6].to_string(),
            color_template: fields[7].to_string(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
) -> Result<T, RecordError> {
    value.trim().parse().map_err(|_| RecordError::Number {
        field,
        value: value.to_string(),
    })
}

/// Split `"a";"b";…` into its unquoted fields. Fields cannot themselves
/// contain a double quote.
fn split_quoted(line: &str) -> Option<Vec<&str>> {
    let mut fields = Vec::new();
    let mut rest = line.trim();
    loop {
        rest = rest.strip_prefix('"')?;
        let end = rest.find('"')?;
        fields.push(&rest[..end]);
        rest = &rest[end + 1..];
        if rest.is_empty() {
            return Some(fields);
        }
        rest = rest.strip_prefix(';')?;
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
