use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobPostSummary {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub like_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profession {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub job_post_id: Option<Uuid>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub like_count: i32,
}

/// Job post with everything the match detail screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPost {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub like_count: i32,
    pub profession: Option<Profession>,
    pub videos: Vec<Video>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedJob {
    pub job_post: JobPostSummary,
    pub source: Option<String>,
    pub liked_at: DateTime<Utc>,
}
