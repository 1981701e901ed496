pub mod apex;
pub mod api;
pub mod chat;
pub mod media;
pub mod mentions;

pub use api::contract::ChatApi;
pub use api::rest::{RestChatApi, RestConfig};
pub use apex::utils::{ChatError, ChatResult};
pub use chat::composer::{MessageComposer, SubmitOutcome};
pub use chat::session::{ConversationSession, SessionMount};
pub use chat::timeline::MessageTimeline;
