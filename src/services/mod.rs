pub mod candidate_service;
pub mod company_like_service;
pub mod like_service;
pub mod match_lifecycle_service;
pub mod match_service;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::store::{MatchStore, MemoryStore};

    use super::candidate_service::CandidateService;
    use super::company_like_service::CompanyLikeService;
    use super::like_service::LikeService;
    use super::match_lifecycle_service::MatchLifecycleService;
    use super::match_service::MatchService;

    /// All services wired over one in-memory store.
    pub struct Fixture {
        pub store: Arc<MemoryStore>,
        pub likes: LikeService,
        pub company_likes: CompanyLikeService,
        pub matches: MatchService,
        pub lifecycle: MatchLifecycleService,
        pub candidates: CandidateService,
    }

    impl Fixture {
        pub fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let shared: Arc<dyn MatchStore> = store.clone();
            let matches = MatchService::new(shared.clone());

            Self {
                likes: LikeService::new(shared.clone(), matches.clone()),
                company_likes: CompanyLikeService::new(shared.clone(), matches.clone()),
                lifecycle: MatchLifecycleService::new(shared.clone()),
                candidates: CandidateService::new(shared),
                matches,
                store,
            }
        }
    }
}
