// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Character-encoding lookup and bounded-effort detection.
//!
//! Detection is best-effort and never fatal: an inconclusive scan or an
//! unrecognized label falls back to [`fallback`], logged as a warning by
//! the caller and never surfaced to the sink.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default number of bytes examined when detecting a local file's encoding.
pub const DETECT_CAP: u64 = 1024 * 1024;

/// The fallback applied when detection is inconclusive: ASCII, modelled as
/// its ASCII-compatible superset in the supported set.
pub fn fallback() -> &'static Encoding {
    encoding_rs::WINDOWS_1252
}

/// Resolve an encoding label (case-insensitive WHATWG label, which covers
/// the upper-case names the persisted tree carries) to a supported
/// encoding. Unknown labels return `None`; callers apply [`fallback`].
pub fn lookup(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Feed at most `cap` bytes from `source` into the detector and return its
/// best guess, or `None` when nothing could be examined.
pub fn detect<R: Read>(mut source: R, cap: u64) -> Option<&'static Encoding> {
    let mut detector = EncodingDetector::new();
    let mut buf = [0u8; 4096];
    let mut total: u64 = 0;

    while total < cap {
        let want = buf.len().min((cap - total) as usize);
        let read = match source.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(_) => break,
        };
        detector.feed(&buf[..read], false);
        total += read as u64;
    }

    if total == 0 {
        return None;
    }
    detector.feed(&[], true);
    Some(detector.guess(None, true))
}

/// Detect a local file's encoding from its first [`DETECT_CAP`] bytes.
pub fn detect_file(path: &Path) -> Option<&'static Encoding> {
    let file = File::open(path).ok()?;
    detect(file, DETECT_CAP)
}

/// Shell command asking a remote host for a file's encoding. Its reply is
/// filename-prefixed, which is how the relay loop tells it apart from
/// tailed payload.
pub fn probe_command(remote_path: &str) -> String {
    format!("file --mime-encoding {remote_path}")
}

/// Parse the reply to [`probe_command`]: `<path>: <label>`. Returns the
/// label; resolution and fallback are the caller's concern.
pub fn parse_probe_reply<'a>(line: &'a str, remote_path: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(remote_path)?.strip_prefix(':')?;
    let label = rest.trim();
    if label.is_empty() {
        return None;
    }
    Some(label)
}

#[cfg(test)]
#[path = "encoding_tests.rs"]
mod tests;
