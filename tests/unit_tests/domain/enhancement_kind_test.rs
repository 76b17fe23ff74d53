use voxmail::domain::{EnhancementKind, EnhancementKinds};

#[test]
fn given_comma_separated_kinds_when_parsing_then_preserves_order_and_drops_duplicates() {
    let kinds = EnhancementKinds::parse("summary, cleanup,summary").unwrap();

    let collected: Vec<EnhancementKind> = kinds.iter().collect();
    assert_eq!(
        collected,
        vec![EnhancementKind::Summary, EnhancementKind::Cleanup]
    );
    assert_eq!(kinds.serialize(), "summary,cleanup");
}

#[test]
fn given_empty_string_when_parsing_kinds_then_set_is_empty() {
    let kinds = EnhancementKinds::parse("").unwrap();
    assert!(kinds.is_empty());
}

#[test]
fn given_unknown_kind_when_parsing_then_returns_error() {
    assert!(EnhancementKinds::parse("cleanup,translate").is_err());
}

#[test]
fn given_kinds_when_serialized_to_json_then_uses_lowercase_array() {
    let kinds: EnhancementKinds = vec![EnhancementKind::Cleanup, EnhancementKind::Summary].into();
    let json = serde_json::to_string(&kinds).unwrap();
    assert_eq!(json, r#"["cleanup","summary"]"#);
}

#[test]
fn given_each_kind_when_labelled_then_matches_email_subject_prefix() {
    assert_eq!(EnhancementKind::Cleanup.label(), "Cleaned");
    assert_eq!(EnhancementKind::Summary.label(), "Summary");
}
