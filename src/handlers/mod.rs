pub mod activity;
pub mod backup;
pub mod employee;
pub mod profile;
pub mod report;
pub mod session;
pub mod transaction;
pub mod trash;

use std::sync::{Mutex, MutexGuard};

use actix_web::{web, HttpRequest};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::state::DomainState;
use crate::utils;
use crate::utils::config::Config;

pub type SharedState = web::Data<Mutex<DomainState>>;

pub fn lock(state: &Mutex<DomainState>) -> Result<MutexGuard<'_, DomainState>, AppError> {
    state.lock().map_err(|_| {
        log::error!("Domain state mutex poisoned");
        AppError::InternalServerError("State unavailable".to_string())
    })
}

/// Validates the bearer token and checks it belongs to the signed-in session.
pub fn authorized<'a>(
    req: &HttpRequest,
    config: &Config,
    state: &'a Mutex<DomainState>,
) -> Result<MutexGuard<'a, DomainState>, AppError> {
    let identity = utils::jwt::identity_from_request(req, &config.jwt_secret)?;
    let guard = lock(state)?;
    guard.ensure_session(&identity)?;
    Ok(guard)
}

/// Decodes an optional JSON body. A blank body is `None`; any other body
/// must decode.
pub fn optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|err| AppError::BadRequest(format!("Invalid request body: {}", err)))
}

/// Registers every `/v1` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/v1/session")
            .route(web::get().to(session::get_session))
            .route(web::post().to(session::sign_in))
            .route(web::delete().to(session::sign_out)),
    )
    .service(
        web::resource("/v1/employee")
            .route(web::get().to(employee::get_employees))
            .route(web::post().to(employee::create_employee)),
    )
    .service(
        web::resource("/v1/employee/bulk-delete")
            .route(web::post().to(employee::delete_employees)),
    )
    .service(
        web::resource("/v1/employee/export.csv")
            .route(web::get().to(employee::export_employees_csv)),
    )
    .service(
        web::resource("/v1/employee/{id}")
            .route(web::get().to(employee::get_employee))
            .route(web::patch().to(employee::update_employee))
            .route(web::delete().to(employee::delete_employee)),
    )
    .service(
        web::resource("/v1/employee/{id}/status")
            .route(web::post().to(employee::toggle_employee_status)),
    )
    .service(
        web::resource("/v1/transaction")
            .route(web::get().to(transaction::get_transactions))
            .route(web::post().to(transaction::create_transaction)),
    )
    .service(
        web::resource("/v1/transaction/{id}")
            .route(web::delete().to(transaction::delete_transaction)),
    )
    .service(web::resource("/v1/trash").route(web::get().to(trash::get_trash)))
    .service(
        web::resource("/v1/trash/employee/{id}")
            .route(web::post().to(trash::restore_employee))
            .route(web::delete().to(trash::purge_employee)),
    )
    .service(
        web::resource("/v1/trash/transaction/{id}")
            .route(web::post().to(trash::restore_transaction))
            .route(web::delete().to(trash::purge_transaction)),
    )
    .service(
        web::resource("/v1/report")
            .route(web::get().to(report::get_reports))
            .route(web::post().to(report::save_report)),
    )
    .service(web::resource("/v1/report/summary").route(web::get().to(report::get_summary)))
    .service(web::resource("/v1/activity").route(web::get().to(activity::get_activity)))
    .service(
        web::resource("/v1/profile")
            .route(web::get().to(profile::get_profile))
            .route(web::patch().to(profile::update_profile)),
    )
    .service(web::resource("/v1/profile/theme").route(web::post().to(profile::update_theme)))
    .service(
        web::resource("/v1/profile/language").route(web::post().to(profile::toggle_language)),
    )
    .service(
        web::resource("/v1/profile/dark-mode").route(web::post().to(profile::toggle_dark_mode)),
    )
    .service(
        web::resource("/v1/backup")
            .route(web::get().to(backup::export_database))
            .route(web::post().to(backup::import_database)),
    )
    .service(web::resource("/v1/status").route(web::get().to(backup::get_status)));
}
