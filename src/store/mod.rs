//! Persistence seam for the like/match engine.
//!
//! Every method is one unit of work. Implementations must enforce the unique
//! keys on likes `(user_id, target)`, company likes `(company_id, user_id)` and
//! matches `(user_id, company_id)`, and must create a match and its chat
//! all-or-nothing.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::InterestRow;
use crate::models::chat::Chat;
use crate::models::company::Company;
use crate::models::company_like::{CompanyLike, NewCompanyLike};
use crate::models::job_post::{JobPost, JobPostSummary, LikedJob};
use crate::models::like::{Like, LikeTarget, NewLike};
use crate::models::matches::{Match, MatchInsert, MatchView, NewMatch};
use crate::models::user::UserSummary;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserSummary>>;

    async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>>;

    async fn find_job_post(&self, job_post_id: Uuid) -> Result<Option<JobPostSummary>>;

    /// Job post joined with its profession and videos.
    async fn find_job_post_detail(&self, job_post_id: Uuid) -> Result<Option<JobPost>>;

    async fn video_exists(&self, video_id: Uuid) -> Result<bool>;

    /// Shifts the denormalized like counter of a job post or video, never
    /// below zero. Company targets carry no counter.
    async fn adjust_like_count(&self, target: LikeTarget, delta: i32) -> Result<()>;

    /// Insert-if-absent. `None` means the like already exists.
    async fn insert_like(&self, like: NewLike) -> Result<Option<Like>>;

    /// Returns whether a row was removed.
    async fn delete_like(&self, user_id: Uuid, target: LikeTarget) -> Result<bool>;

    /// The user's interest in a company: a direct like, or else the most
    /// recent like on one of the company's job posts.
    async fn find_company_interest(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Like>>;

    async fn list_liked_jobs(&self, user_id: Uuid) -> Result<Vec<LikedJob>>;

    /// Insert-if-absent. `None` means the company already liked this user.
    async fn insert_company_like(&self, like: NewCompanyLike) -> Result<Option<CompanyLike>>;

    async fn delete_company_like(&self, company_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn find_company_like(&self, company_id: Uuid, user_id: Uuid)
        -> Result<Option<CompanyLike>>;

    async fn find_match(&self, match_id: Uuid) -> Result<Option<Match>>;

    async fn find_match_by_pair(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Match>>;

    /// Inserts the match and its chat in one transaction. When another
    /// writer already holds the `(user_id, company_id)` key nothing is
    /// written and the existing id comes back as `MatchInsert::Existing`.
    async fn create_match_with_chat(&self, new_match: NewMatch) -> Result<MatchInsert>;

    /// ACTIVE -> DECLINED and chat deactivation in one transaction.
    /// Returns false when the match was not ACTIVE.
    async fn decline_match(&self, match_id: Uuid) -> Result<bool>;

    async fn find_match_view(&self, match_id: Uuid) -> Result<Option<MatchView>>;

    async fn find_chat_by_match(&self, match_id: Uuid) -> Result<Option<Chat>>;

    async fn list_user_matches(&self, user_id: Uuid) -> Result<Vec<MatchView>>;

    async fn list_company_matches(&self, company_id: Uuid) -> Result<Vec<MatchView>>;

    /// Direct company likes, newest first.
    async fn list_direct_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>>;

    /// Likes on the company's job posts from users without a direct company
    /// like, newest first.
    async fn list_job_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>>;

    async fn company_liked_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>>;

    /// Users holding an ACTIVE match with the company.
    async fn matched_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>>;
}
