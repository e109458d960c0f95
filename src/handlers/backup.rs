use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::utils::config::Config;

pub async fn export_database(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    let filename = format!("backup_{}.json", chrono::Local::now().format("%Y-%m-%d"));

    Ok(HttpResponse::Ok()
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .json(state.export_database()))
}

/// Takes the raw backup text so that unparseable files reach the domain
/// layer and are reported as malformed imports.
pub async fn import_database(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    body: String,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let replaced = state.import_database(&body)?;
    Ok(HttpResponse::Ok().json(json!({ "replaced": replaced })))
}

pub async fn get_status(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.persistence_status()))
}
