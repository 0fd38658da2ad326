use serde_json::{Value, json};

pub const LOCATION_PROMPT: &str = "🍜 了解！\n下のボタンから現在地を送ってね👇";
pub const USAGE_HINT: &str = "「近くのラーメン」って送ってみて🍜";
pub const TRIGGER_FIRST_HINT: &str = "先に「近くのラーメン」って送ってね🍜";
pub const NOT_FOUND: &str = "近くにラーメン屋が見つからなかったよ…🍜";
pub const UNAVAILABLE: &str = "いまお店を検索できないみたい…🙏\n少し時間をおいてもう一度試してね";

#[must_use]
pub fn text(text: &str) -> Value {
    json!({
        "type": "text",
        "text": text,
    })
}

/// Text message with a quick-reply button that opens the location picker.
#[must_use]
pub fn location_request() -> Value {
    json!({
        "type": "text",
        "text": LOCATION_PROMPT,
        "quickReply": {
            "items": [{
                "type": "action",
                "action": {
                    "type": "location",
                    "label": "現在地を送る 📍",
                },
            }],
        },
    })
}
