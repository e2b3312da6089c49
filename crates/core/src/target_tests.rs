use super::*;
use crate::schedule::ScheduleKind;

#[test]
fn plain_path_parses_as_local() {
    let source = SourceLocation::parse("/var/log/syslog").unwrap();
    assert_eq!(source, SourceLocation::Local(PathBuf::from("/var/log/syslog")));
    assert!(!source.is_remote());
}

#[test]
fn ssh_uri_parses_user_host_and_path() {
    let source = SourceLocation::parse("ssh://admin@db01:/var/log/app.log").unwrap();
    let SourceLocation::Ssh(ssh) = source else {
        panic!("expected ssh source");
    };
    assert_eq!(ssh.user, "admin");
    assert_eq!(ssh.key_path, None);
    assert_eq!(ssh.host, "db01");
    assert_eq!(ssh.path, "/var/log/app.log");
}

#[test]
fn ssh_uri_with_key_path_selects_key_auth() {
    let source =
        SourceLocation::parse("ssh://user:/home/user/.ssh/id_rsa@host:/var/log/app.log").unwrap();
    let SourceLocation::Ssh(ssh) = source else {
        panic!("expected ssh source");
    };
    assert_eq!(ssh.user, "user");
    assert_eq!(ssh.key_path, Some(PathBuf::from("/home/user/.ssh/id_rsa")));
    assert_eq!(ssh.host, "host");
}

#[test]
fn ssh_uri_without_user_is_rejected() {
    let err = SourceLocation::parse("ssh://host:/var/log/app.log").unwrap_err();
    assert!(matches!(err, SourceError::MissingUser(_)));

    let err = SourceLocation::parse("ssh://:key@host:/var/log/app.log").unwrap_err();
    assert!(matches!(err, SourceError::MissingUser(_)));
}

#[test]
fn ssh_uri_without_path_separator_is_rejected() {
    let err = SourceLocation::parse("ssh://user@host").unwrap_err();
    assert!(matches!(err, SourceError::MissingPath(_)));
}

#[test]
fn ssh_uri_round_trips_through_display() {
    for uri in [
        "ssh://admin@db01:/var/log/app.log",
        "ssh://user:/home/user/.ssh/id_rsa@host:/var/log/app.log",
    ] {
        let source = SourceLocation::parse(uri).unwrap();
        assert_eq!(source.to_string(), uri);
    }
}

#[test]
fn descriptor_defaults_match_a_fresh_target() {
    let desc = TargetDescriptor::new(
        "prod/db01/syslog",
        SourceLocation::parse("/var/log/syslog").unwrap(),
    );
    assert_eq!(desc.full_name(), "prod/db01/syslog");
    assert_eq!(desc.display_name(), "syslog");
    assert_eq!(desc.schedule, ScheduleKind::Repeating);
    assert_eq!(desc.offset, OFFSET_AT_END);
    assert_eq!(desc.last_length, 0);
    assert!(desc.encoding.is_none());
    assert!(!desc.enabled);
}

#[test]
fn rename_re_derives_display_name() {
    let mut desc = TargetDescriptor::new(
        "prod/db01/syslog",
        SourceLocation::parse("/var/log/syslog").unwrap(),
    );
    desc.set_full_name("prod/db02/messages");
    assert_eq!(desc.display_name(), "messages");

    desc.set_full_name("flat-name");
    assert_eq!(desc.display_name(), "flat-name");
}

#[test]
fn non_positive_batch_size_falls_back_to_default() {
    let mut desc = TargetDescriptor::new(
        "t",
        SourceLocation::parse("/tmp/t.log").unwrap(),
    );
    desc.batch_size = 0;
    assert_eq!(desc.effective_batch_size(), DEFAULT_BATCH_SIZE);
    desc.batch_size = -5;
    assert_eq!(desc.effective_batch_size(), DEFAULT_BATCH_SIZE);
    desc.batch_size = 2;
    assert_eq!(desc.effective_batch_size(), 2);
}
