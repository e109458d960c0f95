use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::models::profile::{ProfileUpdate, ThemeUpdate};
use crate::utils::config::Config;

pub async fn get_profile(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.profile()))
}

pub async fn update_profile(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    update: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let profile = state.update_profile(update.into_inner())?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_theme(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    theme: web::Json<ThemeUpdate>,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let profile = state.update_theme(theme.into_inner())?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn toggle_language(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let profile = state.toggle_language()?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn toggle_dark_mode(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    let profile = state.toggle_dark_mode()?;
    Ok(HttpResponse::Ok().json(profile))
}
