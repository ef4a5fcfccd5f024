mod config;
mod error;
mod services;
mod store;

use crate::config::AppConfig;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    store::bootstrap(&config.db_path).map_err(io::Error::other)?;

    let url = config.url();
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(config.clone())
            .service(services::templates::configure_routes())
            .service(services::reports::configure_routes())
            .service(services::queries::configure_routes())
            .service(services::movies::configure_routes())
            .service(services::data_sources::csv::configure_routes())
            .service(services::admin::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
