mod config;
mod error;
mod services;
mod state;
mod store;

use crate::config::ServiceConfig;
use crate::state::AppState;
use crate::store::{FileStore, RecordStore};
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = ServiceConfig::from_env();
    config
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let files = FileStore::init(&config.upload_dir).map_err(io::Error::other)?;
    info!("Uploads stored in {}", files.root().display());

    let records = RecordStore::open(&config.database_path).map_err(io::Error::other)?;
    info!("Record store opened at {}", config.database_path.display());

    let state = AppState::new(records.clone(), files);
    let json_limit = config.json_limit;
    let allowed_origin = config.allowed_origin.clone();
    let (host, port) = config.bind_address();

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(services::cors::cors(&allowed_origin))
            .app_data(services::models::json_config(json_limit))
            .app_data(web::Data::new(state.clone()))
            .service(services::models::configure_routes())
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    records.close().map_err(io::Error::other)?;
    info!("Record store closed");
    Ok(())
}
