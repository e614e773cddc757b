use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{error::Result, middleware::auth::PersonActor, AppState};

#[utoipa::path(
    get,
    path = "/api/matches",
    responses(
        (status = 200, description = "Active matches of the caller", body = Json<Vec<MatchView>>)
    )
)]
#[axum::debug_handler]
pub async fn list_matches(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
) -> Result<impl IntoResponse> {
    let matches = state.match_service.get_user_matches(actor.user_id).await?;
    Ok(Json(matches))
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match found", body = Json<MatchDetail>),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Match not found")
    )
)]
#[axum::debug_handler]
pub async fn get_match(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state
        .match_lifecycle_service
        .get_match_detail(id, actor.user_id)
        .await?;
    Ok(Json(detail))
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match declined", body = Json<DeleteResult>),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Match not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_match(
    State(state): State<AppState>,
    Extension(actor): Extension<PersonActor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .match_lifecycle_service
        .delete_match(id, actor.user_id)
        .await?;
    Ok(Json(result))
}
