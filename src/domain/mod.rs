mod audio_reference;
mod enhancement_kind;
mod error_kind;
mod event_status;
mod processing_event;
mod processing_kind;
mod user;

pub use audio_reference::AudioReference;
pub use enhancement_kind::{EnhancementKind, EnhancementKinds};
pub use error_kind::ErrorKind;
pub use event_status::EventStatus;
pub use processing_event::{EventId, ProcessingEvent};
pub use processing_kind::ProcessingKind;
pub use user::{Caller, User, UserId, UserSlug};
