use super::*;
use std::io::Write;

#[test]
fn lookup_resolves_common_labels() {
    assert_eq!(lookup("UTF-8"), Some(encoding_rs::UTF_8));
    assert_eq!(lookup("utf-8"), Some(encoding_rs::UTF_8));
    assert_eq!(lookup(" iso-8859-1 "), Some(encoding_rs::WINDOWS_1252));
    assert_eq!(lookup("us-ascii"), Some(encoding_rs::WINDOWS_1252));
    assert_eq!(lookup("SHIFT_JIS"), Some(encoding_rs::SHIFT_JIS));
}

#[test]
fn lookup_rejects_unknown_labels() {
    assert_eq!(lookup("definitely-not-an-encoding"), None);
    assert_eq!(lookup(""), None);
}

#[test]
fn detect_recognizes_utf8_text() {
    let text = "héllo wörld, çà et là\n".repeat(50);
    let detected = detect(text.as_bytes(), DETECT_CAP).unwrap();
    assert_eq!(detected, encoding_rs::UTF_8);
}

#[test]
fn detect_on_empty_source_is_inconclusive() {
    assert_eq!(detect(std::io::empty(), DETECT_CAP), None);
}

#[test]
fn detect_stops_at_the_cap() {
    // A reader that never ends; detection must still terminate.
    struct Endless;
    impl std::io::Read for Endless {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            for b in buf.iter_mut() {
                *b = b'a';
            }
            Ok(buf.len())
        }
    }
    assert!(detect(Endless, 8192).is_some());
}

#[test]
fn detect_file_reads_the_prefix() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", "naïve café résumé\n".repeat(20)).unwrap();
    assert_eq!(detect_file(file.path()), Some(encoding_rs::UTF_8));
}

#[test]
fn detect_file_missing_is_inconclusive() {
    assert_eq!(detect_file(std::path::Path::new("/no/such/file")), None);
}

#[test]
fn probe_reply_is_filename_prefixed() {
    let line = "/var/log/app.log: us-ascii";
    assert_eq!(parse_probe_reply(line, "/var/log/app.log"), Some("us-ascii"));
}

#[test]
fn probe_reply_ignores_payload_lines() {
    assert_eq!(parse_probe_reply("2024-01-01 INFO started", "/var/log/app.log"), None);
    assert_eq!(parse_probe_reply("/var/log/app.log: ", "/var/log/app.log"), None);
    assert_eq!(parse_probe_reply("", "/var/log/app.log"), None);
}

#[test]
fn probe_command_names_the_file() {
    assert_eq!(
        probe_command("/var/log/app.log"),
        "file --mime-encoding /var/log/app.log"
    );
}
