use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Routes shared by the binary and the HTTP tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/chat", web::post().to(handlers::chat::handler))
            .route("/sessions", web::get().to(handlers::sessions::list))
            .route("/sessions/{session_id}", web::get().to(handlers::sessions::get))
            .route(
                "/sessions/{session_id}",
                web::delete().to(handlers::sessions::delete),
            )
            .route("/dashboard", web::get().to(handlers::dashboard::handler))
            .service(
                web::scope("/snapshots")
                    .route("/security", web::get().to(handlers::snapshots::security))
                    .route("/performance", web::get().to(handlers::snapshots::performance))
                    .route("/anomalies", web::get().to(handlers::snapshots::anomalies))
                    .route("/backup", web::get().to(handlers::snapshots::backup)),
            )
            .route("/health", web::get().to(handlers::health::handler)),
    );
}

pub async fn run_server(config: ServerConfig) -> io::Result<()> {
    log::info!("Initializing server with data directory {:?}", config.data_dir);
    let state = web::Data::new(AppState::from_config(&config).await?);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(format!("0.0.0.0:{}", config.port))?
    .run()
    .await
}
