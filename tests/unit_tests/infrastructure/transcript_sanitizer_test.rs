use voxmail::infrastructure::observability::sanitize_transcript;

#[test]
fn given_blank_text_when_sanitizing_then_marks_empty() {
    assert_eq!(sanitize_transcript("  \n "), "[EMPTY]");
}

#[test]
fn given_long_transcript_when_sanitizing_then_preview_is_bounded() {
    let text = "a".repeat(200);

    let preview = sanitize_transcript(&text);

    assert!(preview.starts_with(&"a".repeat(80)));
    assert!(preview.ends_with("(200 chars total)"));
}

#[test]
fn given_secrets_in_text_when_sanitizing_then_values_are_redacted() {
    let preview = sanitize_transcript("use Bearer abc123 and password=hunter2 now");

    assert_eq!(preview, "use Bearer [REDACTED] and password=[REDACTED] now");
}
