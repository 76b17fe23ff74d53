mod background_token;
mod webhook_signature;

pub use background_token::{background_token, verify_background_token};
pub use webhook_signature::{sign_webhook, verify_webhook_signature};
