mod common;

use std::sync::Arc;

use common::{three_sections, MockApi, RecordingNotifier};
use meka_fill::error::{AppError, SessionError};
use meka_fill::models::{Answer, ResponseStatus};
use meka_fill::services::NoticeLevel;
use meka_fill::{FillFlow, FlushOutcome, NavOutcome, SessionHandle};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn flow_with(api: MockApi) -> (FillFlow, Arc<MockApi>, Arc<RecordingNotifier>) {
    let api = Arc::new(api);
    let notifier = Arc::new(RecordingNotifier::default());
    let flow = FillFlow::new(SessionHandle::new(), api.clone(), notifier.clone());
    (flow, api, notifier)
}

#[tokio::test]
async fn test_open_seeds_session_from_server() {
    let existing = vec![
        Answer::new("q1", Some(json!({"text": "saved"})), None),
        Answer::new("q3", Some(json!({"boolean": true})), Some("checked".to_string())),
    ];
    let (flow, _api, _notifier) = flow_with(MockApi::new(three_sections()).with_existing(existing));

    assert_ok!(flow.open("r1", "f1").await);

    let session = flow.session();
    assert_eq!(session.response_id().as_deref(), Some("r1"));
    assert_eq!(session.current_section_index(), 0);
    assert!(session.dirty_answers().is_empty());
    assert_eq!(session.answer("q3").unwrap().comment.as_deref(), Some("checked"));
    assert_eq!(session.read(|s| s.sections().len()), 3);
}

#[tokio::test]
async fn test_open_twice_with_unsynced_drafts_is_rejected() {
    let (flow, _api, _notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    flow.session().set_answer("q1", Some(json!({"text": "draft"})));

    let err = assert_err!(flow.open("r1", "f1").await);
    assert!(matches!(err, AppError::Session(SessionError::UnsyncedDrafts { .. })));
    assert!(flow.session().answer("q1").unwrap().dirty);
}

#[tokio::test]
async fn test_navigation_flushes_before_moving() {
    let (flow, api, _notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);

    assert_eq!(flow.prev_section().await, NavOutcome::Unchanged(0));
    assert_eq!(api.upsert_count(), 0);

    flow.session().set_answer("q1", Some(json!({"text": "ok"})));
    assert_eq!(flow.next_section().await, NavOutcome::Moved(1));
    assert_eq!(api.upsert_count(), 1);
    assert!(flow.session().dirty_answers().is_empty());

    flow.session().set_answer("q3", Some(json!({"boolean": false})));
    assert_eq!(flow.go_to_section(2).await, NavOutcome::Moved(2));
    assert_eq!(api.upsert_count(), 2);

    assert_eq!(flow.next_section().await, NavOutcome::ReachedReview);
    assert_eq!(flow.session().current_section_index(), 2);

    assert_eq!(flow.prev_section().await, NavOutcome::Moved(1));
}

#[tokio::test]
async fn test_navigation_proceeds_when_autosave_fails() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    api.set_fail_upsert(true);

    flow.session().set_answer("q1", Some(json!({"text": "offline"})));
    assert_eq!(flow.next_section().await, NavOutcome::Moved(1));

    assert!(flow.session().answer("q1").unwrap().dirty);
    assert!(notifier.errors()[0].starts_with("Auto-save failed: "));
}

#[tokio::test]
async fn test_submit_flushes_then_submits_and_resets() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    flow.session().set_answer("q1", Some(json!({"text": "done"})));
    flow.session().set_comment("q4", "signed on paper");

    let response = assert_ok!(flow.submit().await);

    assert_eq!(response.status, ResponseStatus::Submitted);
    assert_eq!(api.upsert_count(), 1);
    assert_eq!(api.upsert(0).len(), 2);
    assert_eq!(api.submitted(), vec!["r1".to_string()]);
    assert_eq!(flow.session().response_id(), None);
    assert!(flow.session().read(|s| s.answers().is_empty()));

    let notices = notifier.notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Success);
    assert_eq!(notices.last().unwrap().message, "Response submitted!");
}

#[tokio::test]
async fn test_submit_keeps_session_when_save_fails() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    flow.session().set_answer("q1", Some(json!({"text": "pending"})));
    api.set_fail_upsert(true);

    assert_err!(flow.submit().await);

    assert!(api.submitted().is_empty());
    assert_eq!(flow.session().response_id().as_deref(), Some("r1"));
    assert!(flow.session().answer("q1").unwrap().dirty);
    assert!(notifier.errors()[0].starts_with("Failed to save answers: "));

    // 恢复后可以重试
    api.set_fail_upsert(false);
    assert_ok!(flow.submit().await);
    assert_eq!(api.submitted(), vec!["r1".to_string()]);
}

#[tokio::test]
async fn test_submit_failure_preserves_session() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    flow.session().set_answer("q1", Some(json!({"text": "x"})));
    api.set_fail_submit(true);

    let err = assert_err!(flow.submit().await);
    assert!(err.to_string().contains("Required questions missing"));

    // 答案已保存，会话仍然保留
    assert_eq!(flow.session().response_id().as_deref(), Some("r1"));
    assert!(flow.session().dirty_answers().is_empty());
    assert_eq!(
        flow.session().answer("q1").unwrap().value,
        Some(json!({"text": "x"}))
    );
    assert!(notifier.errors()[0].contains("Required questions missing"));
}

#[tokio::test]
async fn test_save_syncs_drafts_and_keeps_session() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);

    assert!(matches!(flow.save().await, FlushOutcome::Idle));
    assert_eq!(api.upsert_count(), 0);

    flow.session().set_answer("q2", Some(json!({"number": 3})));
    flow.session().set_comment("q3", "rechecked");
    assert!(matches!(flow.save().await, FlushOutcome::Synced(2)));

    assert!(api.submitted().is_empty());
    assert_eq!(flow.session().response_id().as_deref(), Some("r1"));
    assert!(flow.session().dirty_answers().is_empty());
    assert_eq!(
        flow.session().answer("q2").unwrap().value,
        Some(json!({"number": 3}))
    );
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_failed_save_reports_and_keeps_drafts() {
    let (flow, api, notifier) = flow_with(MockApi::new(three_sections()));
    assert_ok!(flow.open("r1", "f1").await);
    api.set_fail_upsert(true);

    flow.session().set_answer("q1", Some(json!({"text": "later"})));
    assert!(flow.save().await.is_failed());

    assert!(flow.session().answer("q1").unwrap().dirty);
    assert_eq!(flow.session().response_id().as_deref(), Some("r1"));
    assert!(notifier.errors()[0].starts_with("Failed to save answers: "));
}

#[tokio::test]
async fn test_submit_without_session_is_rejected() {
    let (flow, api, _notifier) = flow_with(MockApi::new(three_sections()));

    let err = assert_err!(flow.submit().await);
    assert!(matches!(err, AppError::Session(SessionError::NotInitialized)));
    assert!(api.submitted().is_empty());
}
