//! Runs the engine against a real Postgres. Needs `DATABASE_URL`:
//! `cargo test --test pg_store_test -- --ignored`

use std::env;
use std::sync::Arc;

use match_backend::{
    database::pool::run_migrations, models::matches::MatchStatus, store::PgStore, AppState,
};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use uuid::Uuid;

async fn connect() -> PgPool {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

async fn seed(pool: &PgPool) -> (Uuid, Uuid, Uuid) {
    let user = Uuid::new_v4();
    let company = Uuid::new_v4();
    let job = Uuid::new_v4();

    sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
        .bind(user)
        .bind("Pg User")
        .bind(format!("pg_{}@example.com", user))
        .execute(pool)
        .await
        .expect("seed user");
    sqlx::query("INSERT INTO companies (id, name) VALUES ($1, $2)")
        .bind(company)
        .bind("Pg Company")
        .execute(pool)
        .await
        .expect("seed company");
    sqlx::query("INSERT INTO job_posts (id, company_id, title) VALUES ($1, $2, $3)")
        .bind(job)
        .bind(company)
        .bind("Pg Engineer")
        .execute(pool)
        .await
        .expect("seed job post");

    (user, company, job)
}

#[tokio::test]
#[ignore]
async fn postgres_mutual_like_and_decline() {
    let pool = connect().await;
    let (user, company, job) = seed(&pool).await;
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), "unused");

    let liked = state.like_service.like_job(user, job, None).await.unwrap();
    assert!(!liked.matched);

    let result = state
        .company_like_service
        .company_like_user(company, user, Uuid::new_v4(), None, None)
        .await
        .unwrap();
    assert!(result.matched);

    let matches = state.match_service.get_user_matches(user).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].record.job_post_id, Some(job));
    let match_id = matches[0].record.id;

    state
        .match_lifecycle_service
        .delete_match(match_id, user)
        .await
        .unwrap();

    let row = sqlx::query(
        "SELECT m.status, c.is_active FROM matches m JOIN chats c ON c.match_id = m.id WHERE m.id = $1",
    )
    .bind(match_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let status: String = row.try_get("status").unwrap();
    let is_active: bool = row.try_get("is_active").unwrap();
    assert_eq!(MatchStatus::parse(&status), Some(MatchStatus::Declined));
    assert!(!is_active);

    state.like_service.unlike_job(user, job).await.unwrap();
    state.like_service.unlike_job(user, job).await.unwrap_err();
    let count: i32 = sqlx::query("SELECT like_count FROM job_posts WHERE id = $1")
        .bind(job)
        .fetch_one(&pool)
        .await
        .unwrap()
        .try_get("like_count")
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn postgres_concurrent_match_creation() {
    let pool = connect().await;
    let (user, company, _) = seed(&pool).await;
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), "unused");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = state.match_service.clone();
            tokio::spawn(async move {
                service
                    .create_match(
                        user,
                        company,
                        match_backend::models::matches::InitiatedBy::User,
                        None,
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().expect("every caller succeeds");
    }

    let rows: i64 = sqlx::query("SELECT COUNT(*) AS n FROM matches WHERE user_id = $1 AND company_id = $2")
        .bind(user)
        .bind(company)
        .fetch_one(&pool)
        .await
        .unwrap()
        .try_get("n")
        .unwrap();
    assert_eq!(rows, 1);

    let chats: i64 = sqlx::query("SELECT COUNT(*) AS n FROM chats WHERE user_id = $1 AND company_id = $2")
        .bind(user)
        .bind(company)
        .fetch_one(&pool)
        .await
        .unwrap()
        .try_get("n")
        .unwrap();
    assert_eq!(chats, 1);
}
