//! One chat turn: resolve the session, assemble context, ask the model, persist.

use dba_core::session::is_valid_session_id;
use dba_core::{new_session_id, Message};
use dba_llm::CompletionOutcome;

use crate::error::{AppError, Result};
use crate::state::{AppState, SYSTEM_INSTRUCTION};

pub const NO_DOCUMENTATION_PLACEHOLDER: &str = "(no matching documentation)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub session_id: String,
    pub reply: String,
    pub upstream_failure: bool,
}

pub async fn handle_turn(
    state: &AppState,
    message: Option<String>,
    session_id: Option<String>,
) -> Result<ChatTurn> {
    let message = message
        .filter(|message| !message.trim().is_empty())
        .ok_or(AppError::MissingMessage)?;

    let session_id = match session_id.filter(|id| !id.is_empty()) {
        Some(id) if !is_valid_session_id(&id) => return Err(AppError::InvalidSessionId(id)),
        Some(id) => id,
        None => {
            let id = new_session_id();
            log::info!("[{}] Starting new session", id);
            id
        }
    };

    let guard = match &state.session_locks {
        Some(locks) => Some(locks.acquire(&session_id).await),
        None => None,
    };

    let mut history = state.store.load(&session_id).await;
    log::debug!("[{}] Loaded {} prior messages", session_id, history.len());

    let documents = state.retrieval.retrieve(&message, state.retrieval_k).await;
    let snapshots = state.snapshots.read_all().await;
    let bundle = state.assembler.assemble(&snapshots, &history);
    let prompt = build_prompt(&documents, &bundle, &message);

    let outcome = state.llm.generate(&prompt).await;
    let upstream_failure = outcome.is_failure();
    if let CompletionOutcome::UpstreamFailure(description) = &outcome {
        log::warn!(
            "[{}] Completion failed, replying with error text: {}",
            session_id,
            description
        );
    }
    let reply = outcome.into_text();

    history.push(Message::user(message));
    history.push(Message::assistant(reply.clone()));
    let saved = state.store.save(&session_id, &history).await;
    drop(guard);
    release_lock(state, &session_id);
    if let Err(e) = saved {
        log::error!("[{}] Failed to save session: {}", session_id, e);
        return Err(AppError::StorageError(e));
    }

    Ok(ChatTurn {
        session_id,
        reply,
        upstream_failure,
    })
}

/// Remove a session record, waiting for any in-flight turn on it when
/// per-session locking is enabled.
pub async fn delete_session(state: &AppState, session_id: &str) -> Result<bool> {
    let guard = match &state.session_locks {
        Some(locks) => Some(locks.acquire(session_id).await),
        None => None,
    };

    let deleted = state.store.delete(session_id).await;
    drop(guard);
    release_lock(state, session_id);

    deleted.map_err(|e| {
        log::error!("[{}] Failed to delete session from storage: {}", session_id, e);
        AppError::StorageError(e)
    })
}

fn release_lock(state: &AppState, session_id: &str) {
    if let Some(locks) = &state.session_locks {
        locks.release_idle(session_id);
    }
}

pub fn build_prompt(documents: &[String], system_state: &str, message: &str) -> String {
    let documentation = if documents.is_empty() {
        NO_DOCUMENTATION_PLACEHOLDER.to_string()
    } else {
        documents.join("\n")
    };

    format!(
        "{}\n\nDOCUMENTATION CONTEXT:\n{}\n\nSYSTEM STATE:\n{}\n\nUSER: {}",
        SYSTEM_INSTRUCTION, documentation, system_state, message
    )
}
