use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::models::report::ReportPeriodParams;
use crate::utils::config::Config;

/// Live summary for the period the report view is filtered to.
pub async fn get_summary(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    params: web::Query<ReportPeriodParams>,
) -> Result<HttpResponse, AppError> {
    let period = params.resolve().map_err(AppError::BadRequest)?;
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.summary(period)))
}

pub async fn get_reports(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.reports()))
}

/// Called when the report view is printed; the current summary is archived.
pub async fn save_report(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    params: web::Query<ReportPeriodParams>,
) -> Result<HttpResponse, AppError> {
    let period = params.resolve().map_err(AppError::BadRequest)?;
    let mut state = authorized(&req, &config, &state)?;
    let report = state.save_report(period)?;
    Ok(HttpResponse::Created().json(report))
}
