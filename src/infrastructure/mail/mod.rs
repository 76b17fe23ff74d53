mod http_mailer;
mod log_mailer;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;
