pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use crate::services::{
    candidate_service::CandidateService, company_like_service::CompanyLikeService,
    like_service::LikeService, match_lifecycle_service::MatchLifecycleService,
    match_service::MatchService,
};
use crate::store::MatchStore;

#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub like_service: LikeService,
    pub company_like_service: CompanyLikeService,
    pub match_service: MatchService,
    pub match_lifecycle_service: MatchLifecycleService,
    pub candidate_service: CandidateService,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>, jwt_secret: impl Into<String>) -> Self {
        let match_service = MatchService::new(store.clone());
        let like_service = LikeService::new(store.clone(), match_service.clone());
        let company_like_service = CompanyLikeService::new(store.clone(), match_service.clone());
        let match_lifecycle_service = MatchLifecycleService::new(store.clone());
        let candidate_service = CandidateService::new(store);

        Self {
            jwt_secret: Arc::from(jwt_secret.into()),
            like_service,
            company_like_service,
            match_service,
            match_lifecycle_service,
            candidate_service,
        }
    }
}
