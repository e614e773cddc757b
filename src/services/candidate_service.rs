use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::{Candidate, InterestRow, LikeSource};
use crate::store::MatchStore;

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn MatchStore>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Everyone who showed interest in the company, directly or through one
    /// of its job posts, one entry per user.
    pub async fn get_company_candidates(&self, company_id: Uuid) -> Result<Vec<Candidate>> {
        let direct = self.store.list_direct_interest(company_id).await?;
        let via_jobs = self.store.list_job_interest(company_id).await?;

        let company_liked: HashSet<Uuid> = self
            .store
            .company_liked_user_ids(company_id)
            .await?
            .into_iter()
            .collect();
        let matched: HashSet<Uuid> = self
            .store
            .matched_user_ids(company_id)
            .await?
            .into_iter()
            .collect();

        Ok(merge_candidates(direct, via_jobs, &company_liked, &matched))
    }
}

/// Direct likes are merged first, so a direct entry always wins over a job
/// entry for the same user. Within a source the first row wins.
fn merge_candidates(
    direct: Vec<InterestRow>,
    via_jobs: Vec<InterestRow>,
    company_liked: &HashSet<Uuid>,
    matched: &HashSet<Uuid>,
) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(direct.len() + via_jobs.len());

    let rows = direct
        .into_iter()
        .map(|row| (LikeSource::Company, row))
        .chain(via_jobs.into_iter().map(|row| (LikeSource::Job, row)));

    for (like_source, row) in rows {
        let user_id = row.user.id;
        if !seen.insert(user_id) {
            continue;
        }
        candidates.push(Candidate {
            job_post: match like_source {
                LikeSource::Company => None,
                LikeSource::Job => row.job_post,
            },
            user: row.user,
            like_source,
            liked_at: row.liked_at,
            company_liked: company_liked.contains(&user_id),
            matched: matched.contains(&user_id),
        });
    }

    candidates.sort_by(|a, b| b.liked_at.cmp(&a.liked_at));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job_post::JobPostSummary;
    use crate::models::matches::InitiatedBy;
    use crate::models::user::UserSummary;
    use crate::services::test_support::Fixture;
    use chrono::{Duration, Utc};

    fn user(name: &str) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            avatar_url: None,
            headline: None,
        }
    }

    fn job(company_id: Uuid) -> JobPostSummary {
        JobPostSummary {
            id: Uuid::new_v4(),
            company_id,
            title: "Engineer".to_string(),
            location: None,
            like_count: 1,
        }
    }

    #[test]
    fn direct_entry_wins_over_job_entry() {
        let ada = user("ada");
        let company = Uuid::new_v4();
        let direct_at = Utc::now() - Duration::hours(2);
        let job_at = Utc::now();

        let direct = vec![InterestRow {
            user: ada.clone(),
            job_post: None,
            liked_at: direct_at,
        }];
        let via_jobs = vec![InterestRow {
            user: ada.clone(),
            job_post: Some(job(company)),
            liked_at: job_at,
        }];

        let merged = merge_candidates(direct, via_jobs, &HashSet::new(), &HashSet::new());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].like_source, LikeSource::Company);
        assert_eq!(merged[0].liked_at, direct_at);
        assert!(merged[0].job_post.is_none());
    }

    #[test]
    fn annotations_come_from_lookup_sets() {
        let ada = user("ada");
        let bob = user("bob");
        let company = Uuid::new_v4();
        let now = Utc::now();

        let direct = vec![InterestRow {
            user: ada.clone(),
            job_post: None,
            liked_at: now - Duration::minutes(5),
        }];
        let via_jobs = vec![
            InterestRow {
                user: bob.clone(),
                job_post: Some(job(company)),
                liked_at: now,
            },
            InterestRow {
                user: bob.clone(),
                job_post: Some(job(company)),
                liked_at: now - Duration::minutes(10),
            },
        ];
        let company_liked: HashSet<Uuid> = [ada.id, bob.id].into_iter().collect();
        let matched: HashSet<Uuid> = [ada.id].into_iter().collect();

        let merged = merge_candidates(direct, via_jobs, &company_liked, &matched);
        assert_eq!(merged.len(), 2);

        assert_eq!(merged[0].user_id(), bob.id);
        assert_eq!(merged[0].like_source, LikeSource::Job);
        assert_eq!(merged[0].liked_at, now);
        assert!(merged[0].company_liked);
        assert!(!merged[0].matched);

        assert_eq!(merged[1].user_id(), ada.id);
        assert!(merged[1].company_liked);
        assert!(merged[1].matched);
    }

    #[tokio::test]
    async fn candidates_merge_direct_and_job_likes() {
        let fx = Fixture::new();
        let company = fx.store.add_company("Acme");
        let other = fx.store.add_company("Globex");
        let job = fx.store.add_job_post(company, "Engineer", None);
        let other_job = fx.store.add_job_post(other, "Designer", None);

        let both = fx.store.add_user("both");
        let job_only = fx.store.add_user("job-only");
        let elsewhere = fx.store.add_user("elsewhere");

        fx.likes.like_company(both, company, Some("feed".into())).await.unwrap();
        fx.likes.like_job(both, job, None).await.unwrap();
        fx.likes.like_job(job_only, job, None).await.unwrap();
        fx.likes.like_job(elsewhere, other_job, None).await.unwrap();

        fx.company_likes
            .company_like_user(company, job_only, Uuid::new_v4(), None, None)
            .await
            .unwrap();

        let candidates = fx.candidates.get_company_candidates(company).await.unwrap();
        assert_eq!(candidates.len(), 2);

        let both_entry = candidates.iter().find(|c| c.user_id() == both).unwrap();
        assert_eq!(both_entry.like_source, LikeSource::Company);
        assert!(both_entry.job_post.is_none());
        assert!(!both_entry.company_liked);
        assert!(!both_entry.matched);

        let job_entry = candidates.iter().find(|c| c.user_id() == job_only).unwrap();
        assert_eq!(job_entry.like_source, LikeSource::Job);
        assert_eq!(job_entry.job_post.as_ref().map(|j| j.id), Some(job));
        assert!(job_entry.company_liked);
        assert!(job_entry.matched);
    }

    #[tokio::test]
    async fn declined_matches_are_not_flagged_matched() {
        let fx = Fixture::new();
        let company = fx.store.add_company("Acme");
        let ada = fx.store.add_user("ada");

        fx.likes.like_company(ada, company, None).await.unwrap();
        let view = fx
            .matches
            .create_match(ada, company, InitiatedBy::User, None)
            .await
            .unwrap();
        fx.lifecycle.delete_match(view.record.id, ada).await.unwrap();

        let candidates = fx.candidates.get_company_candidates(company).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(!candidates[0].matched);
    }
}
