use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job_post::JobPostSummary;
use crate::models::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeSource {
    Company,
    Job,
}

/// Raw interest row feeding the candidate list.
#[derive(Debug, Clone)]
pub struct InterestRow {
    pub user: UserSummary,
    pub job_post: Option<JobPostSummary>,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub user: UserSummary,
    pub like_source: LikeSource,
    pub job_post: Option<JobPostSummary>,
    pub liked_at: DateTime<Utc>,
    pub company_liked: bool,
    pub matched: bool,
}

impl Candidate {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}
