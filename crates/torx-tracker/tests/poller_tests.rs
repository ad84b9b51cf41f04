//! End-to-end tracking against a scripted batch service and a real store

use std::time::Duration;
use torx_domain::traits::RecordStore;
use torx_domain::{BatchId, BatchJob, BatchStatus, FileId, ProjectId, RequestCounts};
use torx_llm::MockBatchService;
use torx_store::SqliteStore;
use torx_tracker::{
    reconcile_payload, ManualClock, PollOutcome, Poller, RecoveryFile, Submitter, TrackerConfig,
    TrackerError,
};

fn result_line(custom_id: &str, content: &str) -> String {
    serde_json::json!({
        "id": format!("req_{}", custom_id),
        "custom_id": custom_id,
        "response": {
            "status_code": 200,
            "body": {"choices": [{"message": {"role": "assistant", "content": content}}]}
        },
        "error": null
    })
    .to_string()
}

fn payload(name: &str) -> String {
    serde_json::json!({
        "bid_submission_documents_part_1": {
            "2_individual_documents": {"required_documents": [format!("สำเนาบัตรประชาชน {}", name)]}
        }
    })
    .to_string()
}

fn job(status: BatchStatus) -> BatchJob {
    BatchJob::new(BatchId::new("batch_1"), status)
}

fn completed_with_output(content: &str, service: &MockBatchService) -> BatchJob {
    service.add_file(FileId::new("file-out"), content);
    job(BatchStatus::Completed).with_output(FileId::new("file-out"))
}

#[tokio::test]
async fn test_three_pending_then_completed() {
    let service = MockBatchService::new();
    service.push_status(job(BatchStatus::Validating));
    service.push_status(job(BatchStatus::InProgress));
    service.push_status(job(BatchStatus::Finalizing));
    let output = [
        result_line("a.pdf", &payload("a")),
        result_line("b.pdf", &payload("b")),
    ]
    .join("\n");
    service.push_status(completed_with_output(&output, &service));

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let outcome = poller.run(&BatchId::new("batch_1"), &mut store).await.unwrap();

    match outcome {
        PollOutcome::Completed { report, .. } => {
            assert_eq!(report.saved, 2);
            assert_eq!(report.failed, 0);
        }
        other => panic!("expected completion, got {:?}", other),
    }

    // The loop sleeps after every pending status rather than between checks:
    // three pending observations give three intervals, none after the
    // terminal check
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(120); 3]);
    assert_eq!(service.retrieve_count(), 4);
    assert_eq!(service.content_count(), 1);
    assert_eq!(poller.metrics().pending_polls, 3);
    assert_eq!(poller.metrics().elapsed_minutes(), 6);
    assert_eq!(store.list_projects().unwrap().len(), 2);
}

#[tokio::test]
async fn test_transient_errors_use_backoff() {
    let service = MockBatchService::new();
    service.push_error("connection reset");
    service.push_status(job(BatchStatus::InProgress));
    service.push_error("502 bad gateway");
    service.push_status(completed_with_output(&result_line("a.pdf", "{}"), &service));

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let outcome = poller.run(&BatchId::new("batch_1"), &mut store).await.unwrap();
    assert_eq!(outcome.status(), BatchStatus::Completed);
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(60),
            Duration::from_secs(120),
            Duration::from_secs(60)
        ]
    );
    assert_eq!(poller.metrics().transient_errors, 2);
}

#[tokio::test]
async fn test_terminal_failure_stops_without_reconcile() {
    let service = MockBatchService::new();
    service.push_status(job(BatchStatus::InProgress));
    service.push_status(job(BatchStatus::Failed).with_error("invalid_json_line (line 2): bad"));

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let outcome = poller.run(&BatchId::new("batch_1"), &mut store).await.unwrap();
    assert!(matches!(&outcome, PollOutcome::Failed { job } if job.errors.len() == 1));
    assert_eq!(service.retrieve_count(), 2);
    assert_eq!(service.content_count(), 0);
    assert_eq!(clock.sleeps().len(), 1);

    match outcome.into_result() {
        Err(TrackerError::JobFailed { status, detail, .. }) => {
            assert_eq!(status, BatchStatus::Failed);
            assert!(detail.contains("invalid_json_line"));
        }
        other => panic!("expected JobFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_and_cancelled_are_failures() {
    for status in [BatchStatus::Expired, BatchStatus::Cancelled] {
        let service = MockBatchService::new();
        service.push_status(job(status));
        let mut store = SqliteStore::in_memory().unwrap();
        let mut poller = Poller::new(&service, ManualClock::new(), TrackerConfig::default());

        let outcome = poller.run(&BatchId::new("batch_1"), &mut store).await.unwrap();
        assert!(matches!(outcome, PollOutcome::Failed { .. }));
    }
}

#[tokio::test]
async fn test_cancelling_is_pending() {
    let service = MockBatchService::new();
    service.push_status(job(BatchStatus::Cancelling));
    service.push_status(job(BatchStatus::Cancelled));

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let outcome = poller.run(&BatchId::new("batch_1"), &mut store).await.unwrap();
    assert_eq!(outcome.status(), BatchStatus::Cancelled);
    assert_eq!(clock.sleeps().len(), 1);
}

#[tokio::test]
async fn test_check_once_pending_does_not_wait() {
    let service = MockBatchService::new();
    service.push_status(
        BatchJob {
            request_counts: Some(RequestCounts {
                total: 10,
                completed: 4,
                failed: 0,
            }),
            ..job(BatchStatus::InProgress)
        },
    );

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let outcome = poller.check_once(&BatchId::new("batch_1"), &mut store).await.unwrap();
    assert!(matches!(outcome, PollOutcome::Pending(ref j) if j.status == BatchStatus::InProgress));
    assert!(clock.sleeps().is_empty());
    assert_eq!(service.content_count(), 0);
}

#[tokio::test]
async fn test_check_once_completed_reconciles() {
    let service = MockBatchService::new();
    service.push_status(completed_with_output(&result_line("x.pdf", &payload("x")), &service));

    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, ManualClock::new(), TrackerConfig::default());

    let outcome = poller.check_once(&BatchId::new("batch_1"), &mut store).await.unwrap();
    assert!(matches!(outcome, PollOutcome::Completed { ref report, .. } if report.saved == 1));
    assert!(store.get_record(&ProjectId::new("x")).unwrap().is_some());
}

#[tokio::test]
async fn test_check_once_returns_query_errors() {
    let service = MockBatchService::new();
    service.push_error("timeout");

    let clock = ManualClock::new();
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, clock.clone(), TrackerConfig::default());

    let result = poller.check_once(&BatchId::new("batch_1"), &mut store).await;
    assert!(matches!(result, Err(TrackerError::Remote(_))));
    assert!(clock.sleeps().is_empty());
    assert_eq!(service.retrieve_count(), 1);
}

#[tokio::test]
async fn test_completed_without_output_is_an_error() {
    let service = MockBatchService::new();
    service.push_status(job(BatchStatus::Completed));

    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, ManualClock::new(), TrackerConfig::default());

    let result = poller.run(&BatchId::new("batch_1"), &mut store).await;
    assert!(matches!(result, Err(TrackerError::MissingOutput(_))));
}

#[test]
fn test_five_lines_one_invalid() {
    let lines = [
        result_line("p1.pdf", &payload("1")),
        result_line("p2.pdf", &payload("2")),
        result_line("p3.pdf", "ขออภัย ไม่พบข้อมูล"),
        result_line("p4.pdf", &payload("4")),
        result_line("p5.pdf", &payload("5")),
    ];
    let mut store = SqliteStore::in_memory().unwrap();

    let report = reconcile_payload(&lines.join("\n"), &mut store).unwrap();
    assert_eq!(report.lines, 5);
    assert_eq!(report.saved, 4);
    assert_eq!(report.failed, 1);

    let ids: Vec<String> = store
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|s| s.project_id.to_string())
        .collect();
    assert_eq!(ids.len(), 4);
    assert!(!ids.contains(&"p3".to_string()));
}

#[test]
fn test_reconcile_is_idempotent_and_lossless() {
    let content = result_line("66019.pdf", &payload("ก"));
    let mut store = SqliteStore::in_memory().unwrap();

    reconcile_payload(&content, &mut store).unwrap();
    let report = reconcile_payload(&content, &mut store).unwrap();
    assert_eq!(report.saved, 1);

    assert_eq!(store.list_projects().unwrap().len(), 1);
    let record = store.get_record(&ProjectId::new("66019")).unwrap().unwrap();
    assert_eq!(record.payload, payload("ก"));
}

#[tokio::test]
async fn test_submit_then_resume_from_recovery_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let job_file = dir.path().join("batch_input_pg.jsonl");
    std::fs::write(&job_file, "{}\n").unwrap();

    let service = MockBatchService::new();
    let recovery = RecoveryFile::new(dir.path().join("current_batch_id.txt"));
    let submitted = Submitter::new(&service, recovery.clone())
        .submit(&job_file)
        .await
        .unwrap();

    // A later invocation only has the recovery file
    let resumed = recovery.load().unwrap().unwrap();
    assert_eq!(resumed, submitted.id);

    service.push_status(completed_with_output(&result_line("a.pdf", "{}"), &service));
    let mut store = SqliteStore::in_memory().unwrap();
    let mut poller = Poller::new(&service, ManualClock::new(), TrackerConfig::default());
    let outcome = poller.check_once(&resumed, &mut store).await.unwrap();
    assert_eq!(outcome.status(), BatchStatus::Completed);
}
