use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{app_state::AppState, errors::AppError, models::dto::request::LoginRequest};
use crate::models::dto::response::AuthResponse;

/// Mock login inherited from the source system: any credentials are
/// accepted, the account is created on first use.
#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let user = state.user_service.login(&request.username).await?;
    let token = state.jwt_service.create_token(&user)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}
