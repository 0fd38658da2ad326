use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    WaitingLocation,
}

/// Per-user conversation state, kept for the lifetime of the process.
#[derive(Default)]
pub struct ConversationStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: &str) -> ConversationState {
        self.states
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, user_id: &str, state: ConversationState) {
        let mut states = self.states.write().await;
        if state == ConversationState::Idle {
            states.remove(user_id);
        } else {
            states.insert(user_id.to_string(), state);
        }
    }

    pub async fn reset(&self, user_id: &str) {
        self.set(user_id, ConversationState::Idle).await;
    }
}
