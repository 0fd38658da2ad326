pub mod conversation;
pub mod flex;
pub mod messages;
pub mod webhook;

pub use conversation::{ConversationState, ConversationStore};
pub use webhook::{IncomingMessage, WebhookBody, WebhookEvent};
