mod db;
mod errors;
mod handlers;
mod models;
mod state;
mod utils;

use std::sync::Mutex;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use crate::state::DomainState;
use crate::utils::config::Config;

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|err| {
        error!("{}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let store = db::open_store(&config).map_err(|err| {
        error!("{}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;
    let state = web::Data::new(Mutex::new(DomainState::load(store, config.owner_email.clone())));

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    info!("Starting server at {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .app_data(web::JsonConfig::default().limit(MAX_BODY_BYTES))
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
