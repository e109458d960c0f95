use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;
use crate::handlers::{authorized, optional_json, SharedState};
use crate::models::employee::{Employee, EmployeeUpdate};
use crate::models::transaction::{Transaction, TransactionUpdate};
use crate::utils::config::Config;

#[derive(Serialize)]
struct TrashResponse<'a> {
    employees: &'a [Employee],
    transactions: &'a [Transaction],
}

pub async fn get_trash(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(TrashResponse {
        employees: state.trashed_employees(),
        transactions: state.trashed_transactions(),
    }))
}

/// The body is optional; when present it holds corrections applied before
/// the employee goes back to the live list and must decode cleanly.
pub async fn restore_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let edits: Option<EmployeeUpdate> = optional_json(&body)?;
    match state.restore_employee(&id, edits)? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee is not in the trash".to_string())),
    }
}

pub async fn purge_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let purged = state.permanently_delete_employee(&id)?;
    Ok(HttpResponse::Ok().json(json!({ "purged": purged })))
}

pub async fn restore_transaction(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let edits: Option<TransactionUpdate> = optional_json(&body)?;
    match state.restore_transaction(&id, edits)? {
        Some(transaction) => Ok(HttpResponse::Ok().json(transaction)),
        None => Err(AppError::NotFound("Transaction is not in the trash".to_string())),
    }
}

pub async fn purge_transaction(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let purged = state.permanently_delete_transaction(&id)?;
    Ok(HttpResponse::Ok().json(json!({ "purged": purged })))
}
