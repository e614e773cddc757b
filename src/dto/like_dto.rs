use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeCompanyPayload {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeJobPayload {
    pub job_post_id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeVideoPayload {
    pub video_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResult {
    pub liked: bool,
    pub matched: bool,
}

impl LikeResult {
    pub fn liked(matched: bool) -> Self {
        Self {
            liked: true,
            matched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlikeResult {
    pub unliked: bool,
}
