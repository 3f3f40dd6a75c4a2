//! Integration tests for session state and history-cache consistency.
//!
//! The collaborators are mocked in-process: a `MockStore` that counts calls
//! and can be told to fail, and a `MockService` that echoes one analysis
//! per requested style.

use std::sync::{Mutex, Once};

use async_trait::async_trait;
use trendlens::service::{AnalysisService, HistoryStore, ServiceError, ServiceResult};
use trendlens::session::{SessionError, SessionState, SubmissionPhase};
use trendlens::styles::{StyleSelection, Tone, Viewpoint};
use trendlens::types::{AnalysisResult, HistoryRecord, IncomingFile, SubmissionPayload};

static INIT_TRACING: Once = Once::new();

/// Route session log output through the test writer so dropped-file
/// warnings and cache-refresh lines show up with `--nocapture`.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn image(name: &str, marker: u8) -> IncomingFile {
    IncomingFile {
        name: name.to_string(),
        bytes: vec![marker],
        mime_type: "image/png".to_string(),
    }
}

fn text_file(name: &str) -> IncomingFile {
    IncomingFile {
        name: name.to_string(),
        bytes: vec![0],
        mime_type: "text/plain".to_string(),
    }
}

fn record(id: &str, name: &str) -> HistoryRecord {
    HistoryRecord {
        id: id.to_string(),
        name: name.to_string(),
        timestamp_millis: 1_700_000_000_000,
        user_context: String::new(),
        analyses: vec![],
    }
}

fn staged_session() -> SessionState {
    let mut session = SessionState::new();
    session.add_attachments(vec![image("chart.png", 1)]);
    let mut selection = StyleSelection::new();
    selection.select_tone(Tone::Formal);
    selection.select_viewpoint(Viewpoint::Tech);
    session.set_style_selection(&selection);
    session
}

#[derive(Default)]
struct MockStore {
    records: Mutex<Vec<HistoryRecord>>,
    fail_rename: bool,
    fail_list: bool,
    list_calls: Mutex<usize>,
    rename_calls: Mutex<usize>,
}

impl MockStore {
    fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn rename_calls(&self) -> usize {
        *self.rename_calls.lock().unwrap()
    }
}

#[async_trait]
impl HistoryStore for MockStore {
    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>> {
        *self.list_calls.lock().unwrap() += 1;
        if self.fail_list {
            return Err(ServiceError::new("history backend unavailable"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn rename(&self, id: &str, name: &str) -> ServiceResult<()> {
        *self.rename_calls.lock().unwrap() += 1;
        if self.fail_rename {
            return Err(ServiceError::new("rename rejected"));
        }
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.name = name.to_string();
                Ok(())
            }
            None => Err(ServiceError::new("record not found")),
        }
    }

    async fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(ServiceError::new("record not found"));
        }
        Ok(())
    }
}

struct MockService {
    fail: bool,
}

#[async_trait]
impl AnalysisService for MockService {
    async fn analyze(&self, payload: &SubmissionPayload) -> ServiceResult<Vec<AnalysisResult>> {
        if self.fail {
            return Err(ServiceError::new("analysis failed"));
        }
        Ok(payload
            .styles
            .iter()
            .map(|style| AnalysisResult {
                style: style.clone(),
                analysis_text: "# ok".to_string(),
            })
            .collect())
    }
}

mod attachment_tests {
    use super::*;

    #[test]
    fn test_mixed_batch_keeps_only_images_in_order() {
        init_tracing();
        let mut session = SessionState::new();
        let accepted = session.add_attachments(vec![
            image("a.png", 1),
            text_file("notes.txt"),
            image("b.png", 2),
        ]);
        assert_eq!(accepted, 2);
        let attachments = session.attachments();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].bytes, vec![1]);
        assert_eq!(attachments[1].bytes, vec![2]);
    }

    #[test]
    fn test_out_of_range_removal_changes_nothing() {
        let mut session = SessionState::new();
        session.add_attachments(vec![image("a.png", 1), image("b.png", 2)]);
        let before = session.attachments().to_vec();
        assert!(!session.remove_attachment(2));
        assert_eq!(session.attachments(), before.as_slice());
    }

    #[test]
    fn test_removal_by_position() {
        let mut session = SessionState::new();
        session.add_attachments(vec![image("a.png", 1), image("b.png", 2)]);
        assert!(session.remove_attachment(0));
        assert_eq!(session.attachments().len(), 1);
        assert_eq!(session.attachments()[0].bytes, vec![2]);
    }
}

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_submit_yields_one_result_per_style() {
        let mut session = staged_session();
        let service = MockService { fail: false };
        let results = session.submit(&service).await.expect("submit");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].style, "formal_tech");
        assert_eq!(session.phase(), SubmissionPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_staged_input() {
        let mut session = staged_session();
        let service = MockService { fail: true };
        let err = session.submit(&service).await.expect_err("should fail");
        assert!(matches!(err, SessionError::Service(_)));
        assert_eq!(session.phase(), SubmissionPhase::Failed);
        assert_eq!(session.attachments().len(), 1);
        assert_eq!(session.style_keys().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_is_rejected_while_in_flight() {
        let mut session = staged_session();
        session.begin_submission().expect("begin");
        let service = MockService { fail: false };
        let err = session.submit(&service).await.expect_err("guarded");
        assert!(matches!(err, SessionError::SubmissionInFlight));
    }
}

mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_replaces_cache_wholesale() {
        init_tracing();
        let store = MockStore::with_records(vec![record("a1", "one"), record("a2", "two")]);
        let mut session = SessionState::new();
        session.refresh_history(&store).await.expect("refresh");
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let good = MockStore::with_records(vec![record("a1", "one")]);
        let mut session = SessionState::new();
        session.refresh_history(&good).await.expect("seed cache");

        let bad = MockStore {
            fail_list: true,
            ..MockStore::default()
        };
        let err = session.refresh_history(&bad).await.expect_err("should fail");
        assert!(matches!(err, SessionError::Service(_)));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].name, "one");
    }

    #[tokio::test]
    async fn test_successful_rename_refetches_exactly_once() {
        let store = MockStore::with_records(vec![record("a1", "old name")]);
        let mut session = SessionState::new();
        session
            .rename_history_record(&store, "a1", "new name")
            .await
            .expect("rename");
        assert_eq!(store.list_calls(), 1);
        assert_eq!(session.history()[0].name, "new name");
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_cache_untouched() {
        let seed = MockStore::with_records(vec![record("a1", "old name")]);
        let mut session = SessionState::new();
        session.refresh_history(&seed).await.expect("seed cache");
        let before = session.history().to_vec();

        let store = MockStore {
            records: Mutex::new(vec![record("a1", "old name")]),
            fail_rename: true,
            ..MockStore::default()
        };
        let err = session
            .rename_history_record(&store, "a1", "new name")
            .await
            .expect_err("should fail");
        assert!(matches!(err, SessionError::Service(_)));
        assert_eq!(store.list_calls(), 0);
        assert_eq!(session.history(), before.as_slice());
    }

    #[tokio::test]
    async fn test_empty_rename_target_never_reaches_the_store() {
        let store = MockStore::with_records(vec![record("a1", "old name")]);
        let mut session = SessionState::new();
        let err = session
            .rename_history_record(&store, "a1", "   ")
            .await
            .expect_err("validation");
        assert!(matches!(err, SessionError::EmptyRenameTarget));
        assert_eq!(store.rename_calls(), 0);
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_refetches_and_drops_the_record() {
        let store = MockStore::with_records(vec![record("a1", "one"), record("a2", "two")]);
        let mut session = SessionState::new();
        session.refresh_history(&store).await.expect("seed cache");

        session
            .delete_history_record(&store, "a1")
            .await
            .expect("delete");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].id, "a2");
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cache_untouched() {
        let store = MockStore::with_records(vec![record("a1", "one")]);
        let mut session = SessionState::new();
        session.refresh_history(&store).await.expect("seed cache");
        let calls_after_seed = store.list_calls();

        let err = session
            .delete_history_record(&store, "missing")
            .await
            .expect_err("should fail");
        assert!(matches!(err, SessionError::Service(_)));
        assert_eq!(store.list_calls(), calls_after_seed);
        assert_eq!(session.history().len(), 1);
    }
}
