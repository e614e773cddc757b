use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyLike {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub liked_by_id: Uuid,
    pub job_post_id: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompanyLike {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub liked_by_id: Uuid,
    pub job_post_id: Option<Uuid>,
    pub note: Option<String>,
}
