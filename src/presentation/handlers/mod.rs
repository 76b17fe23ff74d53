mod background;
mod error_response;
mod event_status;
mod health;
mod inbound_email;
mod transcribe;

pub use background::enhance_handler;
pub use error_response::{ErrorResponse, error_response, pipeline_error_response};
pub use event_status::event_status_handler;
pub use health::health_handler;
pub use inbound_email::{inbound_email_handler, parse_attachments};
pub use transcribe::transcribe_handler;
