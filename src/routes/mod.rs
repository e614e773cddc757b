pub mod company;
pub mod health;
pub mod likes;
pub mod matches;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::middleware::auth::{require_company, require_person};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let person_api = Router::new()
        .route("/api/likes/companies", post(likes::like_company))
        .route(
            "/api/likes/companies/:company_id",
            delete(likes::unlike_company),
        )
        .route(
            "/api/likes/jobs",
            get(likes::list_liked_jobs).post(likes::like_job),
        )
        .route("/api/likes/jobs/:job_post_id", delete(likes::unlike_job))
        .route("/api/likes/videos", post(likes::like_video))
        .route("/api/likes/videos/:video_id", delete(likes::unlike_video))
        .route("/api/matches", get(matches::list_matches))
        .route(
            "/api/matches/:id",
            get(matches::get_match).delete(matches::delete_match),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_person,
        ));

    let company_api = Router::new()
        .route("/api/company/likes", post(company::like_user))
        .route("/api/company/likes/:user_id", delete(company::unlike_user))
        .route("/api/company/passes", post(company::pass_user))
        .route("/api/company/candidates", get(company::list_candidates))
        .route("/api/company/matches", get(company::list_matches))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_company,
        ));

    base_routes
        .merge(person_api)
        .merge(company_api)
        .with_state(state)
}
