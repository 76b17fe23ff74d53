pub mod audio;
pub mod background;
pub mod http;
pub mod llm;
pub mod mail;
pub mod observability;
pub mod persistence;
pub mod rate_limit;
pub mod security;
