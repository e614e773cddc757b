use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a person liked. Exactly one target per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "snake_case")]
pub enum LikeTarget {
    Company(Uuid),
    JobPost(Uuid),
    Video(Uuid),
}

impl LikeTarget {
    /// Discriminator as stored in `likes.target_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            LikeTarget::Company(_) => "company",
            LikeTarget::JobPost(_) => "job_post",
            LikeTarget::Video(_) => "video",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            LikeTarget::Company(id) | LikeTarget::JobPost(id) | LikeTarget::Video(id) => *id,
        }
    }

    pub fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "company" => Some(LikeTarget::Company(id)),
            "job_post" => Some(LikeTarget::JobPost(id)),
            "video" => Some(LikeTarget::Video(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub target: LikeTarget,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLike {
    pub user_id: Uuid,
    pub target: LikeTarget,
    pub source: Option<String>,
}
