use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        GenerateQuizRequest, HintQuery, HistoryQuery, RetryQuizRequest, SubmitQuizRequest,
    },
};

#[post("/api/quizzes/generate")]
pub async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .generate_quiz(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/quizzes/hint/{quiz_id}")]
pub async fn get_hint(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<HintQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .get_hint(&quiz_id, &query.question_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/quizzes/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    use validator::Validate;
    let request = request.into_inner();
    request.validate()?;

    let response = state
        .quiz_service
        .submit(&auth.0.sub, &request.quiz_id, request.responses)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/quizzes/history")]
pub async fn get_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .history(&auth.0.sub, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/quizzes/{quiz_id}/retry")]
pub async fn retry_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<RetryQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .retry(&auth.0.sub, &quiz_id, request.into_inner().responses)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
