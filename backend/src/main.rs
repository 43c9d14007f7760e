mod auth;
mod config;
mod error;
mod inference;
mod logging;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use auth::gate::AccessGate;
use config::AppConfig;
use inference::store::ModelStore;
use routes::{configure_routes, UploadLimit};
use std::env;
use std::io::{Error, ErrorKind};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::load().map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
    logging::init(config.log_file.as_deref()).map_err(|e| Error::new(ErrorKind::Other, e))?;

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let gate = AccessGate::from_config(&config.users, config.password_cost).map_err(|e| {
        log::error!("Invalid credential table: {}", e);
        Error::new(ErrorKind::InvalidInput, e)
    })?;
    if gate.is_empty() {
        log::warn!("No users configured; every login attempt will be rejected.");
    } else {
        log::info!("Loaded {} user credentials", gate.len());
    }

    let store = ModelStore::from_config(config.model.clone());
    if config.model.preload {
        if let Err(e) = store.get() {
            log::error!("Failed to preload model at startup: {}", e);
            return Err(Error::new(
                ErrorKind::Other,
                format!("Model loading failed: {}", e),
            ));
        }
    }

    let gate = web::Data::new(gate);
    let store = web::Data::new(store);
    let limit = web::Data::new(UploadLimit(config.server.max_upload_bytes));
    let frontend_dir = config.server.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::AUTHORIZATION,
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(gate.clone())
            .app_data(store.clone())
            .app_data(limit.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
