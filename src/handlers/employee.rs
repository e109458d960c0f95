use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::models::employee::{EmployeeQuery, EmployeeUpdate, NewEmployee};
use crate::utils::config::Config;

#[derive(Deserialize)]
pub struct BulkDelete {
    ids: Vec<String>,
}

pub async fn create_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let employee = state.add_employee(new_employee.into_inner())?;
    Ok(HttpResponse::Created().json(employee))
}

pub async fn get_employees(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.search_employees(&query)))
}

pub async fn get_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    let employee = state
        .employee(&id)
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    match state.update_employee(&id, updates.into_inner())? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee not found".to_string())),
    }
}

pub async fn toggle_employee_status(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    match state.toggle_employee_status(&id)? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee not found".to_string())),
    }
}

/// Deleting an unknown id is not an error; the response reports what moved.
pub async fn delete_employee(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let moved = state.soft_delete_employees(&[id.into_inner()])?;
    Ok(HttpResponse::Ok().json(json!({ "moved": moved })))
}

pub async fn delete_employees(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    body: web::Json<BulkDelete>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let moved = state.soft_delete_employees(&body.ids)?;
    Ok(HttpResponse::Ok().json(json!({ "moved": moved })))
}

pub async fn export_employees_csv(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    let csv = state.export_employees_csv(&query);
    let filename = format!("employees_{}.csv", chrono::Local::now().format("%Y-%m-%d"));

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv))
}
