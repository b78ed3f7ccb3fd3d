use chrono::Duration;
use drill_core::model::{AttemptRecord, ModuleId, UserId};
use drill_core::time::fixed_now;
use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

fn attempt(module: &str, score: u8, secs: u64, offset_secs: i64) -> AttemptRecord {
    AttemptRecord::new(
        ModuleId::new(module).unwrap(),
        score,
        secs,
        fixed_now() + Duration::seconds(offset_secs),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_folds_attempts_into_progress_document() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_fold?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::generate();
    assert!(repo.get_progress(user).await.unwrap().is_none());

    for (i, score) in [40_u8, 70, 55].into_iter().enumerate() {
        let offset = i64::try_from(i).unwrap() * 60;
        repo.record_attempt(user, &attempt("phishing-awareness", score, 120, offset))
            .await
            .unwrap();
    }

    let progress = repo.get_progress(user).await.unwrap().expect("progress row");
    let module = ModuleId::new("phishing-awareness").unwrap();
    let bucket = progress.module(&module).unwrap();
    assert_eq!(bucket.attempts(), 3);
    assert_eq!(bucket.best_score(), 70);
    assert_eq!(bucket.time_spent_seconds(), 360);
    assert_eq!(progress.total_modules_completed(), 3);
    assert_eq!(progress.total_score(), 165);
    assert_eq!(progress.total_time_spent(), 360);
}

#[tokio::test]
async fn sqlite_lists_history_newest_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_history?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::generate();
    let other = UserId::generate();
    repo.record_attempt(user, &attempt("password-security", 20, 30, 0))
        .await
        .unwrap();
    repo.record_attempt(user, &attempt("network-security", 85, 30, 10))
        .await
        .unwrap();
    repo.record_attempt(other, &attempt("password-security", 100, 30, 15))
        .await
        .unwrap();
    repo.record_attempt(user, &attempt("password-security", 60, 30, 20))
        .await
        .unwrap();

    let all = repo.list_attempts(user, None, 10).await.unwrap();
    let scores: Vec<u8> = all.iter().map(AttemptRecord::score).collect();
    assert_eq!(scores, vec![60, 85, 20]);

    let module = ModuleId::new("password-security").unwrap();
    let scoped = repo.list_attempts(user, Some(&module), 10).await.unwrap();
    let scores: Vec<u8> = scoped.iter().map(AttemptRecord::score).collect();
    assert_eq!(scores, vec![60, 20]);

    let limited = repo.list_attempts(user, None, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].completed_at(), fixed_now() + Duration::seconds(20));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_migrate_twice?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let storage = Storage::sqlite(url).await.expect("storage");
    let user = UserId::generate();
    let progress = storage
        .progress
        .record_attempt(user, &attempt("network-security", 90, 600, 0))
        .await
        .unwrap();
    assert_eq!(progress.total_modules_completed(), 1);
}
