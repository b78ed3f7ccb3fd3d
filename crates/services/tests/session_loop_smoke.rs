use drill_core::model::{AnswerValue, FeedbackTier, ItemKind, ModuleId, UserId};
use drill_core::time::fixed_now;
use services::catalog::{NETWORK_SECURITY, PASSWORD_SECURITY};
use services::{AppServices, Clock, SessionPhase, Step};
use storage::repository::Storage;

#[tokio::test(start_paused = true)]
async fn completed_sessions_fold_into_persisted_progress() {
    let storage = Storage::in_memory();
    let user = UserId::generate();
    let services =
        AppServices::from_storage(&storage, Clock::fixed(fixed_now()), user, Default::default())
            .unwrap();

    for _ in 0..2 {
        let mut session = services.training().open_session(NETWORK_SECURITY).unwrap();
        session.start().unwrap();
        let mut last = None;
        while let Some(item) = session.current_item() {
            let ItemKind::MultipleChoice { correct, .. } = item.kind() else {
                panic!("network challenges are multiple choice");
            };
            let answer = AnswerValue::Choice(correct.clone());
            last = Some(session.submit(answer).await.unwrap());
        }
        let Some(Step::Completed { result, .. }) = last else {
            panic!("session should complete on the last answer");
        };
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.feedback_tier(), FeedbackTier::Excellent);
        assert_eq!(session.phase(), SessionPhase::Results);
    }

    let progress = services.progress().progress().await.unwrap();
    let network = ModuleId::new(NETWORK_SECURITY).unwrap();
    let bucket = progress.module(&network).unwrap();
    assert_eq!(bucket.attempts(), 2);
    assert_eq!(bucket.best_score(), 100);
    assert_eq!(progress.total_modules_completed(), 2);
    assert_eq!(progress.total_score(), 200);

    let stored = storage.progress.get_progress(user).await.unwrap();
    assert_eq!(stored, Some(progress));

    let next = services.catalog().next_module(&network).map(|m| m.id().clone());
    assert_eq!(next, None);
}

#[tokio::test(start_paused = true)]
async fn abandoned_session_leaves_progress_empty() {
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        UserId::generate(),
        Default::default(),
    )
    .unwrap();

    let mut session = services.training().open_session(PASSWORD_SECURITY).unwrap();
    session.start().unwrap();
    session
        .submit(AnswerValue::Choice("weak".into()))
        .await
        .unwrap();
    session.abandon();

    let progress = services.progress().progress().await.unwrap();
    assert_eq!(progress.total_modules_completed(), 0);
    assert!(services.progress().history(None, 10).await.unwrap().is_empty());
}
