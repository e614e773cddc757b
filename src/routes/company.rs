use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::company_dto::{CompanyLikePayload, CompanyPassPayload},
    error::Result,
    middleware::auth::CompanyActor,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/company/likes",
    request_body = CompanyLikePayload,
    responses(
        (status = 201, description = "Candidate liked", body = Json<LikeResult>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User or job post not found"),
        (status = 409, description = "Candidate already liked")
    )
)]
#[axum::debug_handler]
pub async fn like_user(
    State(state): State<AppState>,
    Extension(actor): Extension<CompanyActor>,
    Json(payload): Json<CompanyLikePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .company_like_service
        .company_like_user(
            actor.company_id,
            payload.user_id,
            actor.staff_id,
            payload.job_post_id,
            payload.note,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    delete,
    path = "/api/company/likes/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Candidate user ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = Json<UnlikeResult>),
        (status = 404, description = "Like not found")
    )
)]
#[axum::debug_handler]
pub async fn unlike_user(
    State(state): State<AppState>,
    Extension(actor): Extension<CompanyActor>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .company_like_service
        .company_unlike_user(actor.company_id, user_id)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/company/passes",
    request_body = CompanyPassPayload,
    responses(
        (status = 200, description = "Pass acknowledged", body = Json<PassResult>)
    )
)]
#[axum::debug_handler]
pub async fn pass_user(
    State(state): State<AppState>,
    Extension(actor): Extension<CompanyActor>,
    Json(payload): Json<CompanyPassPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .company_like_service
        .company_pass_user(actor.company_id, payload.user_id)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/company/candidates",
    responses(
        (status = 200, description = "Users interested in the company, newest first", body = Json<Vec<Candidate>>)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(actor): Extension<CompanyActor>,
) -> Result<impl IntoResponse> {
    let candidates = state
        .candidate_service
        .get_company_candidates(actor.company_id)
        .await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/company/matches",
    responses(
        (status = 200, description = "Active matches of the company", body = Json<Vec<MatchView>>)
    )
)]
#[axum::debug_handler]
pub async fn list_matches(
    State(state): State<AppState>,
    Extension(actor): Extension<CompanyActor>,
) -> Result<impl IntoResponse> {
    let matches = state
        .match_service
        .get_company_matches(actor.company_id)
        .await?;
    Ok(Json(matches))
}
