use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::errors::AppError;
use crate::handlers::{authorized, lock, SharedState};
use crate::models::profile::CurrentUserProfile;
use crate::utils;
use crate::utils::config::Config;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    authenticated: bool,
    is_owner: bool,
    profile: CurrentUserProfile,
}

/// Unauthenticated: the sign-in screen needs the saved theme and language.
pub async fn get_session(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = lock(&state)?;
    Ok(HttpResponse::Ok().json(SessionResponse {
        authenticated: state.is_authenticated(),
        is_owner: state.is_owner(),
        profile: state.profile().clone(),
    }))
}

/// Session-change push from the identity provider.
pub async fn sign_in(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let identity = utils::jwt::identity_from_request(&req, &config.jwt_secret)?;
    let mut state = lock(&state)?;
    let profile = state.sign_in(&identity).clone();

    Ok(HttpResponse::Ok().json(SessionResponse {
        authenticated: true,
        is_owner: state.is_owner(),
        profile,
    }))
}

pub async fn sign_out(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
) -> Result<HttpResponse, AppError> {
    let mut state = authorized(&req, &config, &state)?;
    state.sign_out();
    Ok(HttpResponse::NoContent().finish())
}
