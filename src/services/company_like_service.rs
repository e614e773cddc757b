use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::dto::company_dto::PassResult;
use crate::dto::like_dto::{LikeResult, UnlikeResult};
use crate::error::{Error, Result};
use crate::models::company_like::NewCompanyLike;
use crate::models::like::LikeTarget;
use crate::models::matches::InitiatedBy;
use crate::services::match_service::MatchService;
use crate::store::MatchStore;

#[derive(Clone)]
pub struct CompanyLikeService {
    store: Arc<dyn MatchStore>,
    match_service: MatchService,
}

impl CompanyLikeService {
    pub fn new(store: Arc<dyn MatchStore>, match_service: MatchService) -> Self {
        Self {
            store,
            match_service,
        }
    }

    pub async fn company_like_user(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        liked_by_id: Uuid,
        job_post_id: Option<Uuid>,
        note: Option<String>,
    ) -> Result<LikeResult> {
        if self.store.find_user(user_id).await?.is_none() {
            return Err(Error::NotFound("User not found".to_string()));
        }
        if let Some(job_id) = job_post_id {
            let job = self.store.find_job_post(job_id).await?;
            if job.map(|j| j.company_id) != Some(company_id) {
                return Err(Error::NotFound("Job post not found".to_string()));
            }
        }

        self.store
            .insert_company_like(NewCompanyLike {
                company_id,
                user_id,
                liked_by_id,
                job_post_id,
                note,
            })
            .await?
            .ok_or_else(|| Error::Conflict("You have already liked this candidate".to_string()))?;

        let Some(interest) = self.store.find_company_interest(user_id, company_id).await? else {
            return Ok(LikeResult::liked(false));
        };

        let liked_job = match interest.target {
            LikeTarget::JobPost(id) => Some(id),
            _ => None,
        };
        self.match_service
            .create_match(
                user_id,
                company_id,
                InitiatedBy::Company,
                job_post_id.or(liked_job),
            )
            .await?;
        Ok(LikeResult::liked(true))
    }

    // TODO: persist passes once product decides whether a pass hides the
    // candidate from later listings.
    pub async fn company_pass_user(&self, company_id: Uuid, user_id: Uuid) -> Result<PassResult> {
        debug!(%company_id, %user_id, "Company passed on candidate");
        Ok(PassResult { passed: true })
    }

    /// Withdraws the company's interest. An existing match is left alone.
    pub async fn company_unlike_user(&self, company_id: Uuid, user_id: Uuid) -> Result<UnlikeResult> {
        if !self.store.delete_company_like(company_id, user_id).await? {
            return Err(Error::NotFound("Like not found".to_string()));
        }
        Ok(UnlikeResult { unliked: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;

    #[tokio::test]
    async fn user_like_first_then_company_like_matches() {
        let fx = Fixture::new();
        let user = fx.store.add_user("U1");
        let company = fx.store.add_company("C1");
        let staff = Uuid::new_v4();
        let job = fx.store.add_job_post(company, "J1", None);

        let liked = fx
            .likes
            .like_company(user, company, Some("feed".into()))
            .await
            .unwrap();
        assert_eq!(liked, LikeResult::liked(false));

        let result = fx
            .company_likes
            .company_like_user(company, user, staff, Some(job), Some("great fit".into()))
            .await
            .unwrap();
        assert_eq!(result, LikeResult::liked(true));

        let matches = fx.store.matches_for_pair(user, company);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].initiated_by, InitiatedBy::Company);
        assert_eq!(matches[0].job_post_id, Some(job));
        assert_eq!(fx.store.chats_for_match(matches[0].id).len(), 1);
    }

    #[tokio::test]
    async fn job_scoped_interest_counts_as_reciprocal() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");
        let job = fx.store.add_job_post(company, "Engineer", None);

        fx.likes.like_job(user, job, None).await.unwrap();
        let result = fx
            .company_likes
            .company_like_user(company, user, Uuid::new_v4(), None, None)
            .await
            .unwrap();

        assert!(result.matched);
        let matches = fx.store.matches_for_pair(user, company);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].job_post_id, Some(job));
    }

    #[tokio::test]
    async fn interest_in_other_company_does_not_match() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let acme = fx.store.add_company("Acme");
        let globex = fx.store.add_company("Globex");
        let globex_job = fx.store.add_job_post(globex, "Engineer", None);

        fx.likes.like_company(user, globex, None).await.unwrap();
        fx.likes.like_job(user, globex_job, None).await.unwrap();

        let result = fx
            .company_likes
            .company_like_user(acme, user, Uuid::new_v4(), None, None)
            .await
            .unwrap();
        assert!(!result.matched);
        assert!(fx.store.matches_for_pair(user, acme).is_empty());
    }

    #[tokio::test]
    async fn duplicate_company_like_conflicts() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");

        fx.company_likes
            .company_like_user(company, user, Uuid::new_v4(), None, None)
            .await
            .unwrap();
        let again = fx
            .company_likes
            .company_like_user(company, user, Uuid::new_v4(), None, Some("again".into()))
            .await;
        assert!(matches!(again, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn rejects_unknown_user_and_foreign_job_post() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let acme = fx.store.add_company("Acme");
        let globex = fx.store.add_company("Globex");
        let globex_job = fx.store.add_job_post(globex, "Engineer", None);

        let unknown = fx
            .company_likes
            .company_like_user(acme, Uuid::new_v4(), Uuid::new_v4(), None, None)
            .await;
        assert!(matches!(unknown, Err(Error::NotFound(_))));

        let foreign = fx
            .company_likes
            .company_like_user(acme, user, Uuid::new_v4(), Some(globex_job), None)
            .await;
        assert!(matches!(foreign, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn pass_is_acknowledged_without_state() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");
        fx.likes.like_company(user, company, None).await.unwrap();

        let result = fx.company_likes.company_pass_user(company, user).await.unwrap();
        assert!(result.passed);

        let candidates = fx.candidates.get_company_candidates(company).await.unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn unlike_keeps_existing_match() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");

        fx.likes.like_company(user, company, None).await.unwrap();
        fx.company_likes
            .company_like_user(company, user, Uuid::new_v4(), None, None)
            .await
            .unwrap();

        let result = fx.company_likes.company_unlike_user(company, user).await.unwrap();
        assert!(result.unliked);
        assert_eq!(fx.store.matches_for_pair(user, company).len(), 1);

        let again = fx.company_likes.company_unlike_user(company, user).await;
        assert!(matches!(again, Err(Error::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn simultaneous_opposite_likes_create_one_match() {
        for _ in 0..20 {
            let fx = Fixture::new();
            let user = fx.store.add_user("Ada");
            let company = fx.store.add_company("Acme");

            let likes = fx.likes.clone();
            let company_likes = fx.company_likes.clone();
            let person_side =
                tokio::spawn(async move { likes.like_company(user, company, None).await });
            let company_side = tokio::spawn(async move {
                company_likes
                    .company_like_user(company, user, Uuid::new_v4(), None, None)
                    .await
            });

            let person = person_side.await.unwrap().expect("person side succeeds");
            let company_result = company_side.await.unwrap().expect("company side succeeds");

            assert!(person.matched || company_result.matched);
            let matches = fx.store.matches_for_pair(user, company);
            assert_eq!(matches.len(), 1);
            assert_eq!(fx.store.chats_for_match(matches[0].id).len(), 1);
            assert_eq!(fx.store.chat_count(), 1);
        }
    }
}
