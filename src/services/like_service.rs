use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::dto::like_dto::{LikeResult, UnlikeResult};
use crate::error::{Error, Result};
use crate::models::job_post::LikedJob;
use crate::models::like::{Like, LikeTarget, NewLike};
use crate::models::matches::InitiatedBy;
use crate::services::match_service::MatchService;
use crate::store::MatchStore;

#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn MatchStore>,
    match_service: MatchService,
}

impl LikeService {
    pub fn new(store: Arc<dyn MatchStore>, match_service: MatchService) -> Self {
        Self {
            store,
            match_service,
        }
    }

    pub async fn like_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        source: Option<String>,
    ) -> Result<LikeResult> {
        if self.store.find_company(company_id).await?.is_none() {
            return Err(Error::NotFound("Company not found".to_string()));
        }

        self.insert(user_id, LikeTarget::Company(company_id), source)
            .await?;
        let matched = self.match_if_reciprocal(user_id, company_id, None).await?;
        Ok(LikeResult::liked(matched))
    }

    pub async fn like_job(
        &self,
        user_id: Uuid,
        job_post_id: Uuid,
        source: Option<String>,
    ) -> Result<LikeResult> {
        let job = self
            .store
            .find_job_post(job_post_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job post not found".to_string()))?;

        let target = LikeTarget::JobPost(job.id);
        self.insert(user_id, target, source).await?;
        self.adjust_counter(target, 1).await;

        let matched = self
            .match_if_reciprocal(user_id, job.company_id, Some(job.id))
            .await?;
        Ok(LikeResult::liked(matched))
    }

    /// Videos are not a matchable target.
    pub async fn like_video(&self, user_id: Uuid, video_id: Uuid) -> Result<LikeResult> {
        if !self.store.video_exists(video_id).await? {
            return Err(Error::NotFound("Video not found".to_string()));
        }

        let target = LikeTarget::Video(video_id);
        self.insert(user_id, target, None).await?;
        self.adjust_counter(target, 1).await;
        Ok(LikeResult::liked(false))
    }

    pub async fn unlike_company(&self, user_id: Uuid, company_id: Uuid) -> Result<UnlikeResult> {
        self.remove(user_id, LikeTarget::Company(company_id)).await
    }

    pub async fn unlike_job(&self, user_id: Uuid, job_post_id: Uuid) -> Result<UnlikeResult> {
        self.remove(user_id, LikeTarget::JobPost(job_post_id)).await
    }

    pub async fn unlike_video(&self, user_id: Uuid, video_id: Uuid) -> Result<UnlikeResult> {
        self.remove(user_id, LikeTarget::Video(video_id)).await
    }

    pub async fn get_user_liked_jobs(&self, user_id: Uuid) -> Result<Vec<LikedJob>> {
        self.store.list_liked_jobs(user_id).await
    }

    async fn insert(
        &self,
        user_id: Uuid,
        target: LikeTarget,
        source: Option<String>,
    ) -> Result<Like> {
        self.store
            .insert_like(NewLike {
                user_id,
                target,
                source,
            })
            .await?
            .ok_or_else(|| Error::Conflict(format!("You have already liked this {}", label(target))))
    }

    async fn remove(&self, user_id: Uuid, target: LikeTarget) -> Result<UnlikeResult> {
        if !self.store.delete_like(user_id, target).await? {
            return Err(Error::NotFound("Like not found".to_string()));
        }
        self.adjust_counter(target, -1).await;
        Ok(UnlikeResult { unliked: true })
    }

    // The counter is a separate statement from the like row. A failure here
    // leaves the counter off by one; it is reported, not rolled back.
    async fn adjust_counter(&self, target: LikeTarget, delta: i32) {
        if let Err(e) = self.store.adjust_like_count(target, delta).await {
            warn!(
                error = ?e,
                target_type = target.kind(),
                target_id = %target.id(),
                delta,
                "Like counter update failed after like row change"
            );
        }
    }

    async fn match_if_reciprocal(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        job_post_id: Option<Uuid>,
    ) -> Result<bool> {
        let Some(company_like) = self.store.find_company_like(company_id, user_id).await? else {
            return Ok(false);
        };
        self.match_service
            .create_match(
                user_id,
                company_id,
                InitiatedBy::User,
                job_post_id.or(company_like.job_post_id),
            )
            .await?;
        Ok(true)
    }
}

fn label(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Company(_) => "company",
        LikeTarget::JobPost(_) => "job post",
        LikeTarget::Video(_) => "video",
    }
}
