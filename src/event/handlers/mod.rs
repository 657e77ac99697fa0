pub mod error_reply;
pub mod registry;

pub use error_reply::ErrorReplyHandler;
pub use registry::{register_default_handlers, DEFAULT_HANDLERS};
