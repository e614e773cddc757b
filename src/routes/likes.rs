use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::like_dto::{LikeCompanyPayload, LikeJobPayload, LikeVideoPayload},
    error::Result,
    middleware::auth::PersonActor,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/likes/companies",
    request_body = LikeCompanyPayload,
    responses(
        (status = 201, description = "Company liked", body = Json<LikeResult>),
        (status = 404, description = "Company not found"),
        (status = 409, description = "Company already liked")
    )
)]
#[axum::debug_handler]
pub async fn like_company(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Json(payload): Json<LikeCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .like_service
        .like_company(actor.user_id, payload.company_id, payload.source)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    delete,
    path = "/api/likes/companies/{company_id}",
    params(
        ("company_id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = Json<UnlikeResult>),
        (status = 404, description = "Like not found")
    )
)]
#[axum::debug_handler]
pub async fn unlike_company(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .like_service
        .unlike_company(actor.user_id, company_id)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/likes/jobs",
    request_body = LikeJobPayload,
    responses(
        (status = 201, description = "Job post liked", body = Json<LikeResult>),
        (status = 404, description = "Job post not found"),
        (status = 409, description = "Job post already liked")
    )
)]
#[axum::debug_handler]
pub async fn like_job(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Json(payload): Json<LikeJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .like_service
        .like_job(actor.user_id, payload.job_post_id, payload.source)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    delete,
    path = "/api/likes/jobs/{job_post_id}",
    params(
        ("job_post_id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = Json<UnlikeResult>),
        (status = 404, description = "Like not found")
    )
)]
#[axum::debug_handler]
pub async fn unlike_job(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Path(job_post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .like_service
        .unlike_job(actor.user_id, job_post_id)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/likes/jobs",
    responses(
        (status = 200, description = "Job posts the caller liked, newest first", body = Json<Vec<LikedJob>>)
    )
)]
#[axum::debug_handler]
pub async fn list_liked_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
) -> Result<impl IntoResponse> {
    let jobs = state.like_service.get_user_liked_jobs(actor.user_id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    post,
    path = "/api/likes/videos",
    request_body = LikeVideoPayload,
    responses(
        (status = 201, description = "Video liked", body = Json<LikeResult>),
        (status = 404, description = "Video not found"),
        (status = 409, description = "Video already liked")
    )
)]
#[axum::debug_handler]
pub async fn like_video(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Json(payload): Json<LikeVideoPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .like_service
        .like_video(actor.user_id, payload.video_id)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    delete,
    path = "/api/likes/videos/{video_id}",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Like removed", body = Json<UnlikeResult>),
        (status = 404, description = "Like not found")
    )
)]
#[axum::debug_handler]
pub async fn unlike_video(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Path(video_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .like_service
        .unlike_video(actor.user_id, video_id)
        .await?;
    Ok(Json(result))
}
