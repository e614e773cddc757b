//! Process-local `MatchStore`. One mutex guards the whole state, so each
//! trait call is a serializable unit of work. Used by the test suites.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::InterestRow;
use crate::models::chat::Chat;
use crate::models::company::{Company, CompanySummary};
use crate::models::company_like::{CompanyLike, NewCompanyLike};
use crate::models::job_post::{JobPost, JobPostSummary, LikedJob, Profession, Video};
use crate::models::like::{Like, LikeTarget, NewLike};
use crate::models::matches::{Match, MatchInsert, MatchStatus, MatchView, NewMatch};
use crate::models::user::UserSummary;
use crate::store::MatchStore;

#[derive(Debug, Clone)]
struct JobPostRecord {
    id: Uuid,
    company_id: Uuid,
    profession_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    location: Option<String>,
    like_count: i32,
    created_at: DateTime<Utc>,
}

impl JobPostRecord {
    fn summary(&self) -> JobPostSummary {
        JobPostSummary {
            id: self.id,
            company_id: self.company_id,
            title: self.title.clone(),
            location: self.location.clone(),
            like_count: self.like_count,
        }
    }
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserSummary>,
    companies: HashMap<Uuid, Company>,
    professions: HashMap<Uuid, Profession>,
    job_posts: HashMap<Uuid, JobPostRecord>,
    videos: Vec<Video>,
    likes: Vec<Like>,
    company_likes: Vec<CompanyLike>,
    matches: Vec<Match>,
    chats: Vec<Chat>,
}

impl State {
    fn view(&self, record: &Match) -> Option<MatchView> {
        let company = self.companies.get(&record.company_id)?;
        let user = self.users.get(&record.user_id)?;
        Some(MatchView {
            record: record.clone(),
            chat: self.chats.iter().find(|c| c.match_id == record.id).cloned(),
            company: CompanySummary::from(company),
            user: user.clone(),
        })
    }

    fn active_views<F>(&self, filter: F) -> Vec<MatchView>
    where
        F: Fn(&Match) -> bool,
    {
        let mut views: Vec<MatchView> = self
            .matches
            .iter()
            .rev()
            .filter(|m| m.status == MatchStatus::Active && filter(m))
            .filter_map(|m| self.view(m))
            .collect();
        views.sort_by(|a, b| b.record.matched_at.cmp(&a.record.matched_at));
        views
    }

    fn has_direct_like(&self, user_id: Uuid, company_id: Uuid) -> bool {
        self.likes
            .iter()
            .any(|l| l.user_id == user_id && l.target == LikeTarget::Company(company_id))
    }
}

/// Newest first; ties keep reverse insertion order.
fn newest_first<T, F>(items: &[T], created_at: F) -> Vec<&T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut sorted: Vec<&T> = items.iter().rev().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().users.insert(
            id,
            UserSummary {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", id.simple()),
                avatar_url: None,
                headline: None,
            },
        );
        id
    }

    pub fn add_company(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().companies.insert(
            id,
            Company {
                id,
                name: name.to_string(),
                logo_url: None,
                industry: None,
                location: None,
                website: None,
                description: None,
            },
        );
        id
    }

    pub fn add_profession(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().professions.insert(
            id,
            Profession {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn add_job_post(&self, company_id: Uuid, title: &str, profession_id: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().job_posts.insert(
            id,
            JobPostRecord {
                id,
                company_id,
                profession_id,
                title: title.to_string(),
                description: None,
                location: None,
                like_count: 0,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn add_video(&self, job_post_id: Option<Uuid>, url: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut state = self.lock();
        let company_id = job_post_id
            .and_then(|job| state.job_posts.get(&job))
            .map(|job| job.company_id);
        state.videos.push(Video {
            id,
            user_id: None,
            company_id,
            job_post_id,
            url: url.to_string(),
            thumbnail_url: None,
            like_count: 0,
        });
        id
    }

    pub fn job_like_count(&self, job_post_id: Uuid) -> Option<i32> {
        self.lock().job_posts.get(&job_post_id).map(|j| j.like_count)
    }

    pub fn video_like_count(&self, video_id: Uuid) -> Option<i32> {
        self.lock()
            .videos
            .iter()
            .find(|v| v.id == video_id)
            .map(|v| v.like_count)
    }

    pub fn like_rows(&self, user_id: Uuid, target: LikeTarget) -> usize {
        self.lock()
            .likes
            .iter()
            .filter(|l| l.user_id == user_id && l.target == target)
            .count()
    }

    pub fn active_likes_on(&self, target: LikeTarget) -> usize {
        self.lock().likes.iter().filter(|l| l.target == target).count()
    }

    pub fn matches_for_pair(&self, user_id: Uuid, company_id: Uuid) -> Vec<Match> {
        self.lock()
            .matches
            .iter()
            .filter(|m| m.user_id == user_id && m.company_id == company_id)
            .cloned()
            .collect()
    }

    pub fn chats_for_match(&self, match_id: Uuid) -> Vec<Chat> {
        self.lock()
            .chats
            .iter()
            .filter(|c| c.match_id == match_id)
            .cloned()
            .collect()
    }

    pub fn chat_count(&self) -> usize {
        self.lock().chats.len()
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserSummary>> {
        Ok(self.lock().users.get(&user_id).cloned())
    }

    async fn find_company(&self, company_id: Uuid) -> Result<Option<Company>> {
        Ok(self.lock().companies.get(&company_id).cloned())
    }

    async fn find_job_post(&self, job_post_id: Uuid) -> Result<Option<JobPostSummary>> {
        Ok(self.lock().job_posts.get(&job_post_id).map(JobPostRecord::summary))
    }

    async fn find_job_post_detail(&self, job_post_id: Uuid) -> Result<Option<JobPost>> {
        let state = self.lock();
        let Some(job) = state.job_posts.get(&job_post_id) else {
            return Ok(None);
        };
        Ok(Some(JobPost {
            id: job.id,
            company_id: job.company_id,
            title: job.title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            like_count: job.like_count,
            profession: job
                .profession_id
                .and_then(|id| state.professions.get(&id))
                .cloned(),
            videos: state
                .videos
                .iter()
                .filter(|v| v.job_post_id == Some(job_post_id))
                .cloned()
                .collect(),
            created_at: job.created_at,
        }))
    }

    async fn video_exists(&self, video_id: Uuid) -> Result<bool> {
        Ok(self.lock().videos.iter().any(|v| v.id == video_id))
    }

    async fn adjust_like_count(&self, target: LikeTarget, delta: i32) -> Result<()> {
        let mut state = self.lock();
        let counter = match target {
            LikeTarget::JobPost(id) => state.job_posts.get_mut(&id).map(|j| &mut j.like_count),
            LikeTarget::Video(id) => state
                .videos
                .iter_mut()
                .find(|v| v.id == id)
                .map(|v| &mut v.like_count),
            LikeTarget::Company(_) => None,
        };
        if let Some(count) = counter {
            *count = (*count + delta).max(0);
        }
        Ok(())
    }

    async fn insert_like(&self, like: NewLike) -> Result<Option<Like>> {
        let mut state = self.lock();
        if state
            .likes
            .iter()
            .any(|l| l.user_id == like.user_id && l.target == like.target)
        {
            return Ok(None);
        }
        let row = Like {
            id: Uuid::new_v4(),
            user_id: like.user_id,
            target: like.target,
            source: like.source,
            created_at: Utc::now(),
        };
        state.likes.push(row.clone());
        Ok(Some(row))
    }

    async fn delete_like(&self, user_id: Uuid, target: LikeTarget) -> Result<bool> {
        let mut state = self.lock();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.user_id == user_id && l.target == target));
        Ok(state.likes.len() < before)
    }

    async fn find_company_interest(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Like>> {
        let state = self.lock();
        let direct = state
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.target == LikeTarget::Company(company_id));
        if let Some(like) = direct {
            return Ok(Some(like.clone()));
        }
        let via_job = newest_first(&state.likes, |l| l.created_at)
            .into_iter()
            .find(|l| {
                l.user_id == user_id
                    && matches!(l.target, LikeTarget::JobPost(job)
                        if state.job_posts.get(&job).map(|j| j.company_id) == Some(company_id))
            })
            .cloned();
        Ok(via_job)
    }

    async fn list_liked_jobs(&self, user_id: Uuid) -> Result<Vec<LikedJob>> {
        let state = self.lock();
        Ok(newest_first(&state.likes, |l| l.created_at)
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| match l.target {
                LikeTarget::JobPost(job) => state.job_posts.get(&job).map(|j| LikedJob {
                    job_post: j.summary(),
                    source: l.source.clone(),
                    liked_at: l.created_at,
                }),
                _ => None,
            })
            .collect())
    }

    async fn insert_company_like(&self, like: NewCompanyLike) -> Result<Option<CompanyLike>> {
        let mut state = self.lock();
        if state
            .company_likes
            .iter()
            .any(|l| l.company_id == like.company_id && l.user_id == like.user_id)
        {
            return Ok(None);
        }
        let row = CompanyLike {
            id: Uuid::new_v4(),
            company_id: like.company_id,
            user_id: like.user_id,
            liked_by_id: like.liked_by_id,
            job_post_id: like.job_post_id,
            note: like.note,
            created_at: Utc::now(),
        };
        state.company_likes.push(row.clone());
        Ok(Some(row))
    }

    async fn delete_company_like(&self, company_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let before = state.company_likes.len();
        state
            .company_likes
            .retain(|l| !(l.company_id == company_id && l.user_id == user_id));
        Ok(state.company_likes.len() < before)
    }

    async fn find_company_like(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CompanyLike>> {
        Ok(self
            .lock()
            .company_likes
            .iter()
            .find(|l| l.company_id == company_id && l.user_id == user_id)
            .cloned())
    }

    async fn find_match(&self, match_id: Uuid) -> Result<Option<Match>> {
        Ok(self.lock().matches.iter().find(|m| m.id == match_id).cloned())
    }

    async fn find_match_by_pair(&self, user_id: Uuid, company_id: Uuid) -> Result<Option<Match>> {
        Ok(self
            .lock()
            .matches
            .iter()
            .find(|m| m.user_id == user_id && m.company_id == company_id)
            .cloned())
    }

    async fn create_match_with_chat(&self, new_match: NewMatch) -> Result<MatchInsert> {
        let mut state = self.lock();
        if let Some(existing) = state
            .matches
            .iter()
            .find(|m| m.user_id == new_match.user_id && m.company_id == new_match.company_id)
        {
            return Ok(MatchInsert::Existing(existing.id));
        }

        let now = Utc::now();
        let match_id = Uuid::new_v4();
        state.matches.push(Match {
            id: match_id,
            user_id: new_match.user_id,
            company_id: new_match.company_id,
            job_post_id: new_match.job_post_id,
            initiated_by: new_match.initiated_by,
            status: MatchStatus::Active,
            matched_at: now,
        });
        state.chats.push(Chat {
            id: Uuid::new_v4(),
            match_id,
            user_id: new_match.user_id,
            company_id: new_match.company_id,
            is_active: true,
            last_message_at: None,
            last_message_preview: None,
            user_unread_count: 0,
            company_unread_count: 0,
            created_at: now,
        });
        Ok(MatchInsert::Created(match_id))
    }

    async fn decline_match(&self, match_id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let Some(record) = state
            .matches
            .iter_mut()
            .find(|m| m.id == match_id && m.status == MatchStatus::Active)
        else {
            return Ok(false);
        };
        record.status = MatchStatus::Declined;
        for chat in state.chats.iter_mut().filter(|c| c.match_id == match_id) {
            chat.is_active = false;
        }
        Ok(true)
    }

    async fn find_match_view(&self, match_id: Uuid) -> Result<Option<MatchView>> {
        let state = self.lock();
        Ok(state
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .and_then(|m| state.view(m)))
    }

    async fn find_chat_by_match(&self, match_id: Uuid) -> Result<Option<Chat>> {
        Ok(self
            .lock()
            .chats
            .iter()
            .find(|c| c.match_id == match_id)
            .cloned())
    }

    async fn list_user_matches(&self, user_id: Uuid) -> Result<Vec<MatchView>> {
        Ok(self.lock().active_views(|m| m.user_id == user_id))
    }

    async fn list_company_matches(&self, company_id: Uuid) -> Result<Vec<MatchView>> {
        Ok(self.lock().active_views(|m| m.company_id == company_id))
    }

    async fn list_direct_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>> {
        let state = self.lock();
        Ok(newest_first(&state.likes, |l| l.created_at)
            .into_iter()
            .filter(|l| l.target == LikeTarget::Company(company_id))
            .filter_map(|l| {
                state.users.get(&l.user_id).map(|user| InterestRow {
                    user: user.clone(),
                    job_post: None,
                    liked_at: l.created_at,
                })
            })
            .collect())
    }

    async fn list_job_interest(&self, company_id: Uuid) -> Result<Vec<InterestRow>> {
        let state = self.lock();
        Ok(newest_first(&state.likes, |l| l.created_at)
            .into_iter()
            .filter(|l| !state.has_direct_like(l.user_id, company_id))
            .filter_map(|l| {
                let LikeTarget::JobPost(job_id) = l.target else {
                    return None;
                };
                let job = state.job_posts.get(&job_id)?;
                if job.company_id != company_id {
                    return None;
                }
                let user = state.users.get(&l.user_id)?;
                Some(InterestRow {
                    user: user.clone(),
                    job_post: Some(job.summary()),
                    liked_at: l.created_at,
                })
            })
            .collect())
    }

    async fn company_liked_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .lock()
            .company_likes
            .iter()
            .filter(|l| l.company_id == company_id)
            .map(|l| l.user_id)
            .collect())
    }

    async fn matched_user_ids(&self, company_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: HashSet<Uuid> = self
            .lock()
            .matches
            .iter()
            .filter(|m| m.company_id == company_id && m.status == MatchStatus::Active)
            .map(|m| m.user_id)
            .collect();
        Ok(ids.into_iter().collect())
    }
}
