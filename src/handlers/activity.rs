use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::{authorized, SharedState};
use crate::models::activity::ActivityQuery;
use crate::utils::config::Config;

pub async fn get_activity(
    req: HttpRequest,
    config: web::Data<Config>,
    state: SharedState,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse, AppError> {
    let state = authorized(&req, &config, &state)?;
    Ok(HttpResponse::Ok().json(state.activity_log(query.category)))
}
