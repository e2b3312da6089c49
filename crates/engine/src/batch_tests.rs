use super::*;
use tl_adapters::FakeSink;

#[test]
fn flushes_every_batch_size_lines() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 2);
    for line in ["a\n", "b\n", "c\n", "d\n", "e\n"] {
        batcher.push_line(line);
    }
    batcher.flush();

    let batches = sink.batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0], format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}"));
    assert_eq!(batches[2], format!("e{LINE_SEPARATOR}"));
}

#[test]
fn remainder_smaller_than_batch_is_flushed() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 100);
    batcher.push_line("only\n");
    batcher.flush();
    assert_eq!(sink.batches(), vec![format!("only{LINE_SEPARATOR}")]);
}

#[test]
fn flush_with_nothing_accumulated_emits_nothing() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 10);
    batcher.flush();
    batcher.flush();
    assert!(sink.batches().is_empty());
}

#[test]
fn blank_lines_are_skipped_and_do_not_count() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 2);
    for line in ["a\n", "\n", "\r\n", "\r", "b\n"] {
        batcher.push_line(line);
    }
    // a and b land in the same batch: the blanks never counted.
    assert_eq!(sink.batches(), vec![format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}")]);
}

#[test]
fn crlf_terminated_lines_pass_through_verbatim() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 10);
    batcher.push_line("windows line\r\n");
    batcher.push_line("unix line\n");
    batcher.flush();
    assert_eq!(
        sink.batches(),
        vec![format!("windows line\r\nunix line{LINE_SEPARATOR}")]
    );
}

#[test]
fn unterminated_final_line_is_re_terminated() {
    let sink = FakeSink::new();
    let mut batcher = Batcher::new(&sink, 10);
    batcher.push_line("no newline at eof");
    batcher.flush();
    assert_eq!(sink.batches(), vec![format!("no newline at eof{LINE_SEPARATOR}")]);
}

#[test]
fn read_error_is_wrapped_in_blank_separators() {
    let sink = FakeSink::new();
    notify_read_error(&sink, &"boom");
    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with(&format!("{LINE_SEPARATOR}{LINE_SEPARATOR}")));
    assert!(errors[0].contains("Error opening file: boom"));
}
