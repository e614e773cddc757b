use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::chat::Chat;
use crate::models::company::{Company, CompanySummary};
use crate::models::job_post::JobPost;
use crate::models::user::UserSummary;

/// Which side's like completed the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiatedBy {
    User,
    Company,
}

impl InitiatedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitiatedBy::User => "user",
            InitiatedBy::Company => "company",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(InitiatedBy::User),
            "company" => Some(InitiatedBy::Company),
            _ => None,
        }
    }
}

/// ACTIVE -> DECLINED is the only transition; DECLINED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Active,
    Declined,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Active => "ACTIVE",
            MatchStatus::Declined => "DECLINED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ACTIVE" => Some(MatchStatus::Active),
            "DECLINED" => Some(MatchStatus::Declined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub job_post_id: Option<Uuid>,
    pub initiated_by: InitiatedBy,
    pub status: MatchStatus,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub job_post_id: Option<Uuid>,
    pub initiated_by: InitiatedBy,
}

/// Outcome of the insert-if-absent on (user_id, company_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchInsert {
    Created(Uuid),
    Existing(Uuid),
}

impl MatchInsert {
    pub fn match_id(&self) -> Uuid {
        match self {
            MatchInsert::Created(id) | MatchInsert::Existing(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub record: Match,
    pub chat: Option<Chat>,
    pub company: CompanySummary,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub record: Match,
    pub company: Company,
    pub job_post: Option<JobPost>,
    pub user: UserSummary,
    pub chat: Option<Chat>,
}
