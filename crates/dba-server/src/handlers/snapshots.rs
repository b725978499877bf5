use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::state::AppState;

pub async fn security(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.snapshots.security().await)
}

pub async fn performance(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.snapshots.performance().await)
}

pub async fn anomalies(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.snapshots.anomalies().await)
}

pub async fn backup(state: web::Data<AppState>) -> impl Responder {
    let (plan, rman) = tokio::join!(
        state.snapshots.backup_plan(),
        state.snapshots.backup_script()
    );
    HttpResponse::Ok().json(json!({
        "plan": plan,
        "rman": rman.unwrap_or_default(),
    }))
}
