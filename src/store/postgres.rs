use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::candidate::InterestRow;
use crate::models::chat::Chat;
use crate::models::company::{Company, CompanySummary};
use crate::models::company_like::{CompanyLike, NewCompanyLike};
use crate::models::job_post::{JobPost, JobPostSummary, LikedJob, Profession, Video};
use crate::models::like::{Like, LikeTarget, NewLike};
use crate::models::matches::{InitiatedBy, Match, MatchInsert, MatchStatus, MatchView, NewMatch};
use crate::models::user::UserSummary;
use crate::store::MatchStore;

const LIKE_COLUMNS: &str = "l.id, l.user_id, l.target_type, l.target_id, l.source, l.created_at";

const MATCH_COLUMNS: &str =
    "id, user_id, company_id, job_post_id, initiated_by, status, matched_at";

const MATCH_VIEW_SELECT: &str = r#"
    SELECT
        m.id, m.user_id, m.company_id, m.job_post_id, m.initiated_by, m.status, m.matched_at,
        c.name AS company_name, c.logo_url AS company_logo_url,
        u.name AS user_name, u.email AS user_email,
        u.avatar_url AS user_avatar_url, u.headline AS user_headline,
        ch.id AS chat_id, ch.is_active AS chat_is_active,
        ch.last_message_at AS chat_last_message_at,
        ch.last_message_preview AS chat_last_message_preview,
        ch.user_unread_count AS chat_user_unread_count,
        ch.company_unread_count AS chat_company_unread_count,
        ch.created_at AS chat_created_at
    FROM matches m
    JOIN companies c ON c.id = m.company_id
    JOIN users u ON u.id = m.user_id
    LEFT JOIN chats ch ON ch.match_id = m.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn like_from_row(row: &PgRow) -> Result<Like> {
    let kind: String = row.try_get("target_type")?;
    let target_id: Uuid = row.try_get("target_id")?;
    let target = LikeTarget::from_parts(&kind, target_id)
        .ok_or_else(|| Error::Internal(format!("Unknown like target type: {}", kind)))?;
    Ok(Like {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        target,
        source: row.try_get("source")?,
        created_at: row.try_get("created_at")?,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match> {
    let initiated_by: String = row.try_get("initiated_by")?;
    let status: String = row.try_get("status")?;
    Ok(Match {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        company_id: row.try_get("company_id")?,
        job_post_id: row.try_get("job_post_id")?,
        initiated_by: InitiatedBy::parse(&initiated_by)
            .ok_or_else(|| Error::Internal(format!("Unknown initiator: {}", initiated_by)))?,
        status: MatchStatus::parse(&status)
            .ok_or_else(|| Error::Internal(format!("Unknown match status: {}", status)))?,
        matched_at: row.try_get("matched_at")?,
    })
}

fn match_view_from_row(row: &PgRow) -> Result<MatchView> {
    let record = match_from_row(row)?;
    let chat = match row.try_get::<Option<Uuid>, _>("chat_id")? {
        Some(chat_id) => Some(Chat {
            id: chat_id,
            match_id: record.id,
            user_id: record.user_id,
            company_id: record.company_id,
            is_active: row.try_get("chat_is_active")?,
            last_message_at: row.try_get("chat_last_message_at")?,
            last_message_preview: row.try_get("chat_last_message_preview")?,
            user_unread_count: row.try_get("chat_user_unread_count")?,
            company_unread_count: row.try_get("chat_company_unread_count")?,
            created_at: row.try_get("chat_created_at")?,
        }),
        None => None,
    };
    Ok(MatchView {
        company: CompanySummary {
            id: record.company_id,
            name: row.try_get("company_name")?,
            logo_url: row.try_get("company_logo_url")?,
        },
        user: UserSummary {
            id: record.user_id,
            name: row.try_get("user_name")?,
            email: row.try_get("user_email")?,
            avatar_url: row.try_get("user_avatar_url")?,
            headline: row.try_get("user_headline")?,
        },
        chat,
        record,
    })
}

fn interest_from_row(row: &PgRow, with_job: bool) -> Result<InterestRow> {
    let job_post = if with_job {
        Some(JobPostSummary {
            id: row.try_get("job_id")?,
            company_id: row.try_get("job_company_id")?,
            title: row.try_get("job_title")?,
            location: row.try_get("job_location")?,
            like_count: row.try_get("job_like_count")?,
        })
    } else {
        None
    };
    Ok(InterestRow {
        user: UserSummary::from_row(row)?,
        job_post,
        liked_at: row.try_get::<DateTime<Utc>, _>("liked_at")?,
    })
}

#[async_trait]
impl MatchStore for PgStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserSummary>> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, avatar_url, headline FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, logo_url, industry, location, website, description
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn find_job_post(&self, job_post_id: Uuid) -> Result<Option<JobPostSummary>> {
        let job = sqlx::query_as::<_, JobPostSummary>(
            "SELECT id, company_id, title, location, like_count FROM job_posts WHERE id = $1",
        )
        .bind(job_post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    async fn find_job_post_detail(&self, job_post_id: Uuid) -> Result<Option<JobPost>> {
        let Some(row) = sqlx::query(
            r#"
            SELECT j.id, j.company_id, j.title, j.description, j.location, j.like_count,
                   j.created_at, p.id AS profession_id, p.name AS profession_name
            FROM job_posts j
            LEFT JOIN professions p ON p.id = j.profession_id
            WHERE j.id = $1
            "#,
        )
        .bind(job_post_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, company_id, job_post_id, url, thumbnail_url, like_count
            FROM videos
            WHERE job_post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(job_post_id)
        .fetch_all(&self.pool)
        .await?;

        let profession = match row.try_get::<Option<Uuid>, _>("profession_id")? {
            Some(id) => Some(Profession {
                id,
                name: row.try_get("profession_name")?,
            }),
            None => None,
        };

        Ok(Some(JobPost {
            id: row.try_get("id")?,
            company_id: row.try_get("company_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            location: row.try_get("location")?,
            like_count: row.try_get("like_count")?,
            profession,
            videos,
            created_at: row.try_get("created_at")?,
        }))
    }

    async fn video_exists(&self, video_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM videos WHERE id = $1)")
                .bind(video_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn adjust_like_count(&self, target: LikeTarget, delta: i32) -> Result<()> {
        let sql = match target {
            LikeTarget::JobPost(_) => {
                "UPDATE job_posts SET like_count = GREATEST(like_count + $2, 0) WHERE id = $1"
            }
            LikeTarget::Video(_) => {
                "UPDATE videos SET like_count = GREATEST(like_count + $2, 0) WHERE id = $1"
            }
            LikeTarget::Company(_) => return Ok(()),
        };
        sqlx::query(sql)
            .bind(target.id())
            .bind(delta)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_like(&self, like: NewLike) -> Result<Option<Like>> {
        let row = sqlx::query(
            r#"
            INSERT INTO likes (id, user_id, target_type, target_id, source)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, target_type, target_id) DO NOTHING
            RETURNING id, user_id, target_type, target_id, source, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(like.user_id)
        .bind(like.target.kind())
        .bind(like.target.id())
        .bind(like.source)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(like_from_row).transpose()
    }

    async fn delete_like(&self, user_id: Uuid, target: LikeTarget) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM likes WHERE user_id = $1 AND target_type = $2 AND target_id = $3",
        )
        .bind(user_id)
        .bind(target.kind())
        .bind(target.id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_company_interest(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Like>> {
        let sql = format!(
            r#"
            SELECT {LIKE_COLUMNS}
            FROM likes l
            LEFT JOIN job_posts j ON l.target_type = 'job_post' AND j.id = l.target_id
            WHERE l.user_id = $1
              AND ((l.target_type = 'company' AND l.target_id = $2) OR j.company_id = $2)
            ORDER BY (l.target_type = 'company') DESC, l.created_at DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(like_from_row).transpose()
    }

    async fn list_liked_jobs(&self, user_id: Uuid) -> Result<Vec<LikedJob>> {
        let rows = sqlx::query(
            r#"
            SELECT l.source, l.created_at AS liked_at,
                   j.id, j.company_id, j.title, j.location, j.like_count
            FROM likes l
            JOIN job_posts j ON l.target_type = 'job_post' AND j.id = l.target_id
            WHERE l.user_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(LikedJob {
                    job_post: JobPostSummary::from_row(row)?,
                    source: row.try_get("source")?,
                    liked_at: row.try_get("liked_at")?,
                })
            })
            .collect()
    }

    async fn insert_company_like(&self, like: NewCompanyLike) -> Result<Option<CompanyLike>> {
        let row = sqlx::query_as::<_, CompanyLike>(
            r#"
            INSERT INTO company_likes (id, company_id, user_id, liked_by_id, job_post_id, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (company_id, user_id) DO NOTHING
            RETURNING id, company_id, user_id, liked_by_id, job_post_id, note, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(like.company_id)
        .bind(like.user_id)
        .bind(like.liked_by_id)
        .bind(like.job_post_id)
        .bind(like.note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_company_like(&self, company_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM company_likes WHERE company_id = $1 AND user_id = $2")
            .bind(company_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_company_like(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CompanyLike>> {
        let row = sqlx::query_as::<_, CompanyLike>(
            r#"
            SELECT id, company_id, user_id, liked_by_id, job_post_id, note, created_at
            FROM company_likes
            WHERE company_id = $1 AND user_id = $2
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_match(&self, match_id: Uuid) -> Result<Option<Match>> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn find_match_by_pair(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Match>> {
        let sql =
            format!("SELECT {MATCH_COLUMNS} FROM matches WHERE user_id = $1 AND company_id = $2");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn create_match_with_chat(&self, new_match: NewMatch) -> Result<MatchInsert> {
        let mut tx = self.pool.begin().await?;

        // Blocks on a concurrent uncommitted insert of the same pair, then
        // yields nothing once that writer commits.
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO matches (id, user_id, company_id, job_post_id, initiated_by, status)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
            ON CONFLICT (user_id, company_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_match.user_id)
        .bind(new_match.company_id)
        .bind(new_match.job_post_id)
        .bind(new_match.initiated_by.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(match_id) = inserted else {
            tx.rollback().await?;
            let existing: Uuid =
                sqlx::query_scalar("SELECT id FROM matches WHERE user_id = $1 AND company_id = $2")
                    .bind(new_match.user_id)
                    .bind(new_match.company_id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(MatchInsert::Existing(existing));
        };

        sqlx::query(
            r#"
            INSERT INTO chats (id, match_id, user_id, company_id, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(new_match.user_id)
        .bind(new_match.company_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(MatchInsert::Created(match_id))
    }

    async fn decline_match(&self, match_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE matches SET status = 'DECLINED' WHERE id = $1 AND status = 'ACTIVE'",
        )
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE chats SET is_active = FALSE WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn find_match_view(&self, match_id: Uuid) -> Result<Option<MatchView>> {
        let sql = format!("{MATCH_VIEW_SELECT} WHERE m.id = $1");
        let row = sqlx::query(&sql)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(match_view_from_row).transpose()
    }

    async fn find_chat_by_match(&self, match_id: Uuid) -> Result<Option<Chat>> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            SELECT id, match_id, user_id, company_id, is_active, last_message_at,
                   last_message_preview, user_unread_count, company_unread_count, created_at
            FROM chats
            WHERE match_id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(chat)
    }

    async fn list_user_matches(&self, user_id: Uuid) -> Result<Vec<MatchView>> {
        let sql = format!(
            "{MATCH_VIEW_SELECT} WHERE m.user_id = $1 AND m.status = 'ACTIVE' ORDER BY m.matched_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(match_view_from_row).collect()
    }

    async fn list_company_matches(&self, company_id: Uuid) -> Result<Vec<MatchView>> {
        let sql = format!(
            "{MATCH_VIEW_SELECT} WHERE m.company_id = $1 AND m.status = 'ACTIVE' ORDER BY m.matched_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(match_view_from_row).collect()
    }

    async fn list_direct_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>> {
        let rows = sqlx::query(
            r#"
            SELECT l.created_at AS liked_at, u.id, u.name, u.email, u.avatar_url, u.headline
            FROM likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.target_type = 'company' AND l.target_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|row| interest_from_row(row, false)).collect()
    }

    async fn list_job_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>> {
        let rows = sqlx::query(
            r#"
            SELECT l.created_at AS liked_at, u.id, u.name, u.email, u.avatar_url, u.headline,
                   j.id AS job_id, j.company_id AS job_company_id, j.title AS job_title,
                   j.location AS job_location, j.like_count AS job_like_count
            FROM likes l
            JOIN job_posts j ON l.target_type = 'job_post' AND j.id = l.target_id
            JOIN users u ON u.id = l.user_id
            WHERE j.company_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM likes d
                  WHERE d.user_id = l.user_id
                    AND d.target_type = 'company'
                    AND d.target_id = $1
              )
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|row| interest_from_row(row, true)).collect()
    }

    async fn company_liked_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar("SELECT user_id FROM company_likes WHERE company_id = $1")
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn matched_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            "SELECT user_id FROM matches WHERE company_id = $1 AND status = 'ACTIVE'",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
