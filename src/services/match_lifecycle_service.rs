use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::dto::match_dto::DeleteResult;
use crate::error::{Error, Result};
use crate::models::matches::{Match, MatchDetail, MatchStatus};
use crate::store::MatchStore;

#[derive(Clone)]
pub struct MatchLifecycleService {
    store: Arc<dyn MatchStore>,
}

impl MatchLifecycleService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Declines the match and deactivates its chat. Only the person side
    /// may decline. DECLINED is terminal, so repeating the call is a no-op.
    pub async fn delete_match(&self, match_id: Uuid, user_id: Uuid) -> Result<DeleteResult> {
        let record = self.load_for_participant(match_id, user_id).await?;

        if record.status == MatchStatus::Declined {
            debug!(%match_id, "Match already declined");
            return Ok(DeleteResult { deleted: true });
        }

        if self.store.decline_match(match_id).await? {
            info!(%match_id, %user_id, company_id = %record.company_id, "Match declined");
        } else {
            debug!(%match_id, "Match was declined concurrently");
        }
        Ok(DeleteResult { deleted: true })
    }

    pub async fn get_match_detail(&self, match_id: Uuid, user_id: Uuid) -> Result<MatchDetail> {
        let record = self.load_for_participant(match_id, user_id).await?;

        let company = self
            .store
            .find_company(record.company_id)
            .await?
            .ok_or_else(|| Error::NotFound("Company not found".to_string()))?;
        let user = self
            .store
            .find_user(record.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        let job_post = match record.job_post_id {
            Some(job_id) => self.store.find_job_post_detail(job_id).await?,
            None => None,
        };
        let chat = self.store.find_chat_by_match(match_id).await?;

        Ok(MatchDetail {
            record,
            company,
            job_post,
            user,
            chat,
        })
    }

    async fn load_for_participant(&self, match_id: Uuid, user_id: Uuid) -> Result<Match> {
        let record = self
            .store
            .find_match(match_id)
            .await?
            .ok_or_else(|| Error::NotFound("Match not found".to_string()))?;
        if record.user_id != user_id {
            return Err(Error::Forbidden(
                "You are not a participant of this match".to_string(),
            ));
        }
        Ok(record)
    }
}
