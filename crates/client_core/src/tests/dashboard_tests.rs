use super::*;
use crate::test_support::ScriptedBackend;
use chrono::{TimeZone, Utc};

fn record(id: &str, status: PatentStatus) -> PatentRecord {
    PatentRecord {
        id: PatentId::new(id),
        title: format!("Patent {id}"),
        summary: "Vibrating hinge".to_string(),
        status,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
        transaction_hash: None,
    }
}

fn form() -> PatentSubmissionForm {
    PatentSubmissionForm {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        wallet_address: "0xaa".to_string(),
        raw_idea: "A hinge that shakes off dust".to_string(),
    }
}

#[test]
fn empty_list_renders_empty_state() {
    assert_eq!(
        render_patent_list(&[]),
        PatentListView::Empty {
            message: EMPTY_LIST_MESSAGE
        }
    );
}

#[test]
fn renders_one_entry_per_record_with_fixed_status_labels() {
    let records = vec![
        record("p-1", PatentStatus::Draft),
        record("p-2", PatentStatus::Submitted),
        record("p-3", PatentStatus::OnBlockchain),
        record("p-4", PatentStatus::Rejected),
    ];

    let PatentListView::Entries(entries) = render_patent_list(&records) else {
        panic!("expected entries");
    };
    let labels: Vec<_> = entries.iter().map(|entry| entry.status_label).collect();
    assert_eq!(labels, vec!["Draft", "Submitted", "On blockchain", "Rejected"]);
    assert_eq!(entries[0].created_at, "2024-05-01 10:30");
    assert_eq!(entries[3].id, PatentId::new("p-4"));
}

#[test]
fn blank_idea_is_rejected_before_request() {
    let blank = PatentSubmissionForm {
        raw_idea: " ".to_string(),
        ..form()
    };
    assert!(matches!(
        blank.to_request(),
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn submit_stores_result_and_enables_chain_registration() {
    let backend = ScriptedBackend::new();
    let mut controller = DashboardController::new(backend.clone());

    let result = controller.submit(&form()).await.expect("submit");

    assert_eq!(result.patent_id, PatentId::new("patent-1"));
    assert!(controller.view().can_register_on_chain());
    assert_eq!(
        controller.view().notice.as_ref().map(|n| n.severity),
        Some(NoticeSeverity::Success)
    );
    assert_eq!(backend.calls(), vec!["submit_patent"]);
}

#[tokio::test]
async fn register_on_chain_records_hash_and_reloads_list() {
    let backend = ScriptedBackend::new();
    backend
        .patents
        .lock()
        .expect("lock")
        .push(record("patent-1", PatentStatus::OnBlockchain));
    let mut controller = DashboardController::new(backend.clone());
    controller.submit(&form()).await.expect("submit");

    let hash = controller.register_on_chain().await.expect("register");

    assert_eq!(hash, "0.0.1234@1714557600.000");
    let view = controller.view();
    assert_eq!(
        view.last_submission
            .as_ref()
            .and_then(|s| s.transaction_hash.as_deref()),
        Some("0.0.1234@1714557600.000")
    );
    assert!(!view.can_register_on_chain());
    assert!(view.loaded);
    assert_eq!(view.patents.len(), 1);
    assert_eq!(
        backend.calls(),
        vec!["submit_patent", "register_blockchain", "list_patents"]
    );
}

#[tokio::test]
async fn register_on_chain_without_submission_is_rejected_locally() {
    let backend = ScriptedBackend::new();
    let mut controller = DashboardController::new(backend.clone());

    let err = controller.register_on_chain().await.expect_err("nothing submitted");

    assert!(matches!(err, ClientError::MissingContext("patent id")));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_previous_list_and_shows_timed_notice() {
    let backend = ScriptedBackend::new();
    backend
        .patents
        .lock()
        .expect("lock")
        .push(record("p-1", PatentStatus::Draft));
    let mut controller = DashboardController::new(backend.clone());
    controller.reload().await.expect("first load");

    backend.fail_next("list_patents", 502, Some("Database unavailable"));
    controller.reload().await.expect_err("second load");

    let view = controller.view();
    assert_eq!(view.patents.len(), 1);
    assert!(!view.busy);
    let notice = view.notice.as_ref().expect("notice");
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert_eq!(notice.message, "Error: Database unavailable");
}

#[tokio::test]
async fn tab_selection_is_published() {
    let backend = ScriptedBackend::new();
    let mut controller = DashboardController::new(backend);
    let updates = controller.subscribe();

    controller.select_tab(DashboardTab::Patents);

    assert_eq!(updates.borrow().tab, DashboardTab::Patents);
    assert_eq!(controller.view().patent_list(), PatentListView::Empty {
        message: EMPTY_LIST_MESSAGE
    });
}
