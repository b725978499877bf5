use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::conversation::handle_turn;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "sessionId", alias = "session_id")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

pub async fn handler(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> Result<HttpResponse> {
    let ChatRequest {
        message,
        session_id,
    } = req.into_inner();

    let turn = handle_turn(&state, message, session_id).await?;

    Ok(HttpResponse::Ok().json(ChatResponse {
        reply: turn.reply,
        session_id: turn.session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_accepts_camel_and_snake_case_ids() {
        let camel: ChatRequest =
            serde_json::from_str(r#"{"message": "Hello", "sessionId": "abc"}"#).unwrap();
        let snake: ChatRequest =
            serde_json::from_str(r#"{"message": "Hello", "session_id": "abc"}"#).unwrap();

        assert_eq!(camel.session_id.as_deref(), Some("abc"));
        assert_eq!(snake.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn chat_request_without_fields() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();

        assert!(request.message.is_none());
        assert!(request.session_id.is_none());
    }

    #[test]
    fn chat_response_uses_camel_case_id() {
        let json = serde_json::to_value(ChatResponse {
            reply: "ok".to_string(),
            session_id: "abc".to_string(),
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({"reply": "ok", "sessionId": "abc"}));
    }
}
