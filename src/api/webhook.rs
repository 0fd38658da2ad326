use axum::{Json, body::Bytes, extract::State};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{AppState, WebhookAck};
use crate::line::WebhookBody;

/// `POST /line/webhook`
///
/// Always acknowledges so LINE does not redeliver; events are processed on
/// their own tasks after the response is sent.
pub async fn receive(State(state): State<Arc<AppState>>, body: Bytes) -> Json<WebhookAck> {
    let payload: WebhookBody = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed webhook body");
            return Json(WebhookAck { ok: true });
        }
    };

    let events = payload.into_events();
    debug!(events = events.len(), "Webhook received");

    for event in events {
        let bot = state.bot().clone();
        tokio::spawn(async move {
            bot.handle_event(&event).await;
        });
    }

    Json(WebhookAck { ok: true })
}
