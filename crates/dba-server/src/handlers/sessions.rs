use actix_web::{web, HttpResponse};
use dba_core::Message;
use serde::Serialize;

use crate::conversation::delete_session;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionMessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub deleted: bool,
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let summaries = state.store.list().await.map_err(|e| {
        log::error!("Failed to list sessions: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let session_id = path.into_inner();
    let messages = state.store.load(&session_id).await;
    Ok(HttpResponse::Ok().json(SessionMessagesResponse { messages }))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let session_id = path.into_inner();

    let deleted = delete_session(&state, &session_id).await?;

    if deleted {
        log::info!("[{}] Session deleted", session_id);
    } else {
        log::debug!("[{}] Delete requested for unknown session", session_id);
    }

    Ok(HttpResponse::Ok().json(DeleteSessionResponse { deleted }))
}
