use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::models::transaction::NewTransaction;
use crate::utils::config::Config;

pub async fn create_transaction(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    new_transaction: web::Json<NewTransaction>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let transaction = state.add_transaction(new_transaction.into_inner())?;
    Ok(HttpResponse::Created().json(transaction))
}

pub async fn get_transactions(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.transactions()))
}

pub async fn delete_transaction(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let moved = state.delete_transaction(&id)?;
    Ok(HttpResponse::Ok().json(json!({ "moved": usize::from(moved) })))
}
