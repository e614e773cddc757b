use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub is_active: bool,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_preview: Option<String>,
    pub user_unread_count: i32,
    pub company_unread_count: i32,
    pub created_at: DateTime<Utc>,
}
