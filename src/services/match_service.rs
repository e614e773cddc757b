use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::matches::{InitiatedBy, MatchInsert, MatchView, NewMatch};
use crate::store::MatchStore;

#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn MatchStore>,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self { store }
    }

    /// Materializes the match and its chat for a mutual pair.
    ///
    /// Both like paths can reach this concurrently for the same pair. The
    /// pair lookup short-circuits the common case; the store's
    /// insert-if-absent settles the rest, and the losing caller gets the
    /// winner's match back instead of an error.
    pub async fn create_match(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        initiated_by: InitiatedBy,
        job_post_id: Option<Uuid>,
    ) -> Result<MatchView> {
        if let Some(existing) = self.store.find_match_by_pair(user_id, company_id).await? {
            debug!(match_id = %existing.id, %user_id, %company_id, "Match already exists");
            return self.load_view(existing.id).await;
        }

        let outcome = self
            .store
            .create_match_with_chat(NewMatch {
                user_id,
                company_id,
                job_post_id,
                initiated_by,
            })
            .await?;

        match outcome {
            MatchInsert::Created(match_id) => info!(
                %match_id,
                %user_id,
                %company_id,
                initiated_by = initiated_by.as_str(),
                "Match created"
            ),
            MatchInsert::Existing(match_id) => info!(
                %match_id,
                %user_id,
                %company_id,
                "Concurrent match creation lost the race, reusing existing match"
            ),
        }

        self.load_view(outcome.match_id()).await
    }

    pub async fn get_user_matches(&self, user_id: Uuid) -> Result<Vec<MatchView>> {
        self.store.list_user_matches(user_id).await
    }

    pub async fn get_company_matches(&self, company_id: Uuid) -> Result<Vec<MatchView>> {
        self.store.list_company_matches(company_id).await
    }

    async fn load_view(&self, match_id: Uuid) -> Result<MatchView> {
        self.store
            .find_match_view(match_id)
            .await?
            .ok_or_else(|| Error::NotFound("Match not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::MatchStatus;
    use crate::services::test_support::Fixture;

    #[tokio::test]
    async fn creates_match_and_chat_together() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");

        let view = fx
            .matches
            .create_match(user, company, InitiatedBy::Company, None)
            .await
            .unwrap();

        assert_eq!(view.record.status, MatchStatus::Active);
        assert_eq!(view.record.initiated_by, InitiatedBy::Company);
        assert_eq!(view.company.name, "Acme");
        assert_eq!(view.user.name, "Ada");
        let chat = view.chat.expect("chat created with match");
        assert!(chat.is_active);
        assert_eq!(chat.match_id, view.record.id);
        assert_eq!(fx.store.chats_for_match(view.record.id).len(), 1);
    }

    #[tokio::test]
    async fn second_call_returns_existing_match_unchanged() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");
        let job = fx.store.add_job_post(company, "Engineer", None);

        let first = fx
            .matches
            .create_match(user, company, InitiatedBy::User, Some(job))
            .await
            .unwrap();
        let second = fx
            .matches
            .create_match(user, company, InitiatedBy::Company, None)
            .await
            .unwrap();

        assert_eq!(first.record.id, second.record.id);
        assert_eq!(second.record.initiated_by, InitiatedBy::User);
        assert_eq!(second.record.job_post_id, Some(job));
        assert_eq!(fx.store.matches_for_pair(user, company).len(), 1);
        assert_eq!(fx.store.chat_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creation_yields_one_match_and_one_chat() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let company = fx.store.add_company("Acme");

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = fx.matches.clone();
                let side = if i % 2 == 0 {
                    InitiatedBy::User
                } else {
                    InitiatedBy::Company
                };
                tokio::spawn(async move { service.create_match(user, company, side, None).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            let view = handle.await.unwrap().expect("no caller observes an error");
            ids.push(view.record.id);
        }
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(fx.store.matches_for_pair(user, company).len(), 1);
        assert_eq!(fx.store.chats_for_match(ids[0]).len(), 1);
    }

    #[tokio::test]
    async fn lost_insert_race_reuses_existing_match() {
        let mut store = crate::store::MockMatchStore::new();
        let user = Uuid::new_v4();
        let company = Uuid::new_v4();
        let existing = Uuid::new_v4();

        let fx = Fixture::new();
        let ada = fx.store.add_user("Ada");
        let acme = fx.store.add_company("Acme");
        let view = fx
            .matches
            .create_match(ada, acme, InitiatedBy::User, None)
            .await
            .unwrap();

        store
            .expect_find_match_by_pair()
            .times(1)
            .returning(|_, _| Ok(None));
        store
            .expect_create_match_with_chat()
            .times(1)
            .returning(move |_| Ok(MatchInsert::Existing(existing)));
        store
            .expect_find_match_view()
            .withf(move |id| *id == existing)
            .times(1)
            .returning(move |_| Ok(Some(view.clone())));

        let service = MatchService::new(Arc::new(store));
        let result = service
            .create_match(user, company, InitiatedBy::Company, None)
            .await;

        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn listings_only_include_active_matches() {
        let fx = Fixture::new();
        let user = fx.store.add_user("Ada");
        let acme = fx.store.add_company("Acme");
        let globex = fx.store.add_company("Globex");

        let kept = fx
            .matches
            .create_match(user, acme, InitiatedBy::User, None)
            .await
            .unwrap();
        let declined = fx
            .matches
            .create_match(user, globex, InitiatedBy::User, None)
            .await
            .unwrap();
        fx.lifecycle
            .delete_match(declined.record.id, user)
            .await
            .unwrap();

        let mine = fx.matches.get_user_matches(user).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].record.id, kept.record.id);

        assert_eq!(fx.matches.get_company_matches(acme).await.unwrap().len(), 1);
        assert!(fx.matches.get_company_matches(globex).await.unwrap().is_empty());
    }
}
