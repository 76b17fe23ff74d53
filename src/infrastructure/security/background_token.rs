use hmac::digest::{CtOutput, Output};
use sha2::{Digest, Sha256};

/// Bearer token for background self-calls: hex SHA-256 of the shared secret,
/// so the raw secret never travels over the wire.
pub fn background_token(shared_secret: &str) -> String {
    hex::encode(Sha256::digest(shared_secret.as_bytes()))
}

/// Compares the presented token's digest bytes in constant time.
pub fn verify_background_token(shared_secret: &str, presented: &str) -> bool {
    let Ok(presented) = hex::decode(presented.trim()) else {
        return false;
    };
    let expected = Sha256::digest(shared_secret.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }

    CtOutput::<Sha256>::new(expected) == CtOutput::new(Output::<Sha256>::clone_from_slice(&presented))
}
