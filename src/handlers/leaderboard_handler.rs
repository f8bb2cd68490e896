use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::LeaderboardQuery, response::LeaderboardResponse},
};

#[get("/api/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let leaderboard = state.leaderboard_service.rank(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LeaderboardResponse { leaderboard }))
}
