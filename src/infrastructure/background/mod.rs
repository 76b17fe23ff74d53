mod channel_dispatcher;
mod self_call_dispatcher;

pub use channel_dispatcher::ChannelDispatcher;
pub use self_call_dispatcher::{BACKGROUND_ENHANCE_PATH, SelfCallDispatcher};
