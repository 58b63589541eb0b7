pub mod backend;
pub mod conversation;
pub mod error;
pub mod image;
pub mod prompt;
pub mod session;
pub mod types;

pub use backend::ChatBackend;
pub use conversation::Conversation;
pub use error::{ChatError, Result};
pub use session::{ChatSession, ReplyOutcome, StreamHandler, Terminal, dispatch};
pub use types::{ChatRequest, EventStream, Message, MessageId, MessageStatus, Role, StreamEvent};
