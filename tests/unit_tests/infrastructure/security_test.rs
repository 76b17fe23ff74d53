use voxmail::infrastructure::security::{
    background_token, sign_webhook, verify_background_token, verify_webhook_signature,
};

#[test]
fn given_signature_from_signing_key_when_verifying_then_accepted() {
    let signature = sign_webhook("key-123", "1700000000", "abc");

    assert!(verify_webhook_signature("key-123", "1700000000", "abc", &signature));
}

#[test]
fn given_tampered_token_when_verifying_signature_then_rejected() {
    let signature = sign_webhook("key-123", "1700000000", "abc");

    assert!(!verify_webhook_signature("key-123", "1700000000", "abd", &signature));
    assert!(!verify_webhook_signature("other-key", "1700000000", "abc", &signature));
}

#[test]
fn given_non_hex_signature_when_verifying_then_rejected() {
    assert!(!verify_webhook_signature("key-123", "1700000000", "abc", "not-hex"));
}

#[test]
fn given_known_input_when_signing_then_matches_hmac_sha256_vector() {
    // HMAC-SHA256(key = "key", message = "The quick brown fox jumps over the lazy dog")
    let signature = sign_webhook("key", "The quick brown fox ", "jumps over the lazy dog");
    assert_eq!(
        signature,
        "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
    );
}

#[test]
fn given_shared_secret_when_deriving_token_then_hex_sha256() {
    assert_eq!(
        background_token("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn given_presented_tokens_when_verifying_background_token_then_only_exact_match_passes() {
    let token = background_token("s3cret");

    assert!(verify_background_token("s3cret", &token));
    assert!(!verify_background_token("s3cret", "s3cret"));
    assert!(!verify_background_token("other", &token));
    assert!(!verify_background_token("s3cret", ""));
}

#[test]
fn given_malformed_or_truncated_token_when_verifying_background_token_then_rejected_without_panic() {
    let token = background_token("s3cret");

    assert!(!verify_background_token("s3cret", &token[..62]));
    assert!(!verify_background_token("s3cret", &format!("{}00", token)));
    assert!(!verify_background_token("s3cret", &token.replace(|c: char| c.is_ascii_digit(), "z")));
    assert!(verify_background_token("s3cret", &format!("  {}\n", token.to_uppercase())));
}
