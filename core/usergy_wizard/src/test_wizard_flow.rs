use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::catalog::{AiTechField, BasicField, DeviceField};
use crate::config::WizardConfig;
use crate::criteria::FieldRef;
use crate::errors::{GatewayError, LaunchError, NavigationError, ValidationError, WizardError};
use crate::gateway::InMemoryGateway;
use crate::invariants;
use crate::launch::LaunchState;
use crate::navigator::{Gating, Step};
use crate::session::{NoticeLevel, WizardSession};
use crate::types::{Project, ProjectId, ProjectStatus};

fn draft_project() -> Project {
    Project {
        id: ProjectId::new("proj-1"),
        name: "Mobile checkout".into(),
        description: "Find friction in the new checkout".into(),
        target_tester_count: 0,
        recruiting_criteria: None,
        screening_config: None,
        survey_config: None,
        status: ProjectStatus::Draft,
        launch_date: None,
    }
}

async fn setup() -> (Arc<InMemoryGateway>, WizardSession) {
    setup_with(WizardConfig::default()).await
}

async fn setup_with(config: WizardConfig) -> (Arc<InMemoryGateway>, WizardSession) {
    let gw = Arc::new(InMemoryGateway::new());
    gw.insert(draft_project());
    let session = WizardSession::open(gw.clone(), &ProjectId::new("proj-1"), config)
        .await
        .expect("open");
    (gw, session)
}

fn stored(gw: &InMemoryGateway) -> Project {
    gw.get(&ProjectId::new("proj-1")).expect("stored project")
}

#[tokio::test]
async fn test_open_unknown_project_is_fatal() {
    let gw = Arc::new(InMemoryGateway::new());
    let err = WizardSession::open(gw, &ProjectId::new("ghost"), WizardConfig::default())
        .await
        .err()
        .expect("open should fail");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_save_rejects_zero_without_network_call() {
    let (gw, mut session) = setup().await;
    session.set_user_count("0");

    let err = session.save_criteria().await.unwrap_err();
    assert!(matches!(err, WizardError::Validation(ValidationError::InvalidUserCount)));
    assert_eq!(gw.update_calls(), 0);
    assert_eq!(session.active_step(), Step::TesterRecruiting);
    assert_eq!(session.notices().len(), 1);
    assert_eq!(session.notices()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_save_rejects_non_numeric_without_network_call() {
    let (gw, mut session) = setup().await;
    session.set_user_count("fifty");
    assert!(session.save_criteria().await.is_err());
    assert_eq!(gw.update_calls(), 0);
    assert_eq!(session.draft().user_count, "fifty");
}

#[tokio::test]
async fn test_save_fifty_persists_both_counts() {
    let (gw, mut session) = setup().await;
    session.set_user_count("50");
    session.toggle(FieldRef::Basic(BasicField::Country), "us");
    session.toggle(FieldRef::AiTech(AiTechField::AiFrequency), "daily");
    session.toggle_device("smartphone");

    assert_eq!(session.save_criteria().await.unwrap(), Step::Screening);
    assert_eq!(gw.update_calls(), 1);

    let p = stored(&gw);
    assert_eq!(p.target_tester_count, 50);
    let criteria = p.recruiting_criteria.as_ref().unwrap();
    assert_eq!(criteria.user_count, 50);
    assert!(criteria.profile.basic_profile.get(BasicField::Country).contains("us"));
    assert!(criteria.profile.devices.contains("smartphone"));
    invariants::assert_all_project_invariants(&p);
    assert_eq!(session.project(), &p);
}

#[tokio::test]
async fn test_save_twice_is_idempotent() {
    let (gw, mut session) = setup().await;
    session.set_user_count("12");
    session.toggle(FieldRef::Device(DeviceField::Browser), "firefox");

    session.save_criteria().await.unwrap();
    let first = stored(&gw);
    session.go_to(Step::TesterRecruiting).unwrap();
    session.save_criteria().await.unwrap();
    let second = stored(&gw);

    assert_eq!(first, second);
    assert_eq!(gw.update_calls(), 2);
}

#[tokio::test]
async fn test_resave_replaces_criteria_wholesale() {
    let (gw, mut session) = setup().await;
    let field = FieldRef::Basic(BasicField::Language);
    session.set_user_count("10");
    session.toggle(field, "english");
    session.toggle(field, "french");
    session.save_criteria().await.unwrap();

    session.toggle(field, "english");
    session.save_criteria().await.unwrap();

    let lang = stored(&gw)
        .recruiting_criteria
        .unwrap()
        .profile
        .basic_profile
        .get(BasicField::Language);
    assert_eq!(lang.iter().collect::<Vec<_>>(), vec!["french"]);
}

#[tokio::test]
async fn test_backend_failure_preserves_draft_and_is_retryable() {
    let (gw, mut session) = setup().await;
    session.set_user_count("30");
    session.toggle(FieldRef::Basic(BasicField::Gender), "female");
    let before = session.draft().clone();

    gw.fail_next_updates(1);
    let err = session.save_criteria().await.unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(session.draft(), &before);
    assert_eq!(session.active_step(), Step::TesterRecruiting);
    assert!(stored(&gw).recruiting_criteria.is_none());
    assert_eq!(session.notices().len(), 1);

    assert_eq!(session.save_criteria().await.unwrap(), Step::Screening);
    assert_eq!(stored(&gw).target_tester_count, 30);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let config = WizardConfig {
        request_timeout: Duration::from_millis(50),
        ..WizardConfig::default()
    };
    let (gw, mut session) = setup_with(config).await;
    session.set_user_count("8");
    gw.set_delay(Some(Duration::from_millis(500)));

    let err = session.save_criteria().await.unwrap_err();
    assert!(matches!(err, WizardError::Gateway(GatewayError::Timeout(_))));
    assert!(!session.draft().is_saving);
    assert!(stored(&gw).recruiting_criteria.is_none());

    gw.set_delay(None);
    assert!(session.save_criteria().await.is_ok());
}

#[tokio::test]
async fn test_cancelled_save_leaves_session_untouched() {
    let (gw, mut session) = setup().await;
    session.set_user_count("25");
    gw.set_delay(Some(Duration::from_millis(300)));
    let token = session.cancellation_token();

    let (result, ()) = tokio::join!(session.save_criteria(), async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    assert!(matches!(result, Err(WizardError::Gateway(GatewayError::Cancelled))));
    assert!(session.is_closed());
    assert_eq!(session.active_step(), Step::TesterRecruiting);
    assert!(session.project().recruiting_criteria.is_none());
    assert!(session.notices().is_empty());
    assert!(!session.draft().is_saving);
    assert!(stored(&gw).recruiting_criteria.is_none());

    // Closed sessions refuse further checkpoints.
    assert!(session.save_criteria().await.is_err());
}

#[tokio::test]
async fn test_details_checkpoint() {
    let gw = Arc::new(InMemoryGateway::new());
    let mut p = draft_project();
    p.name = String::new();
    gw.insert(p);
    let mut session = WizardSession::open(gw.clone(), &ProjectId::new("proj-1"), WizardConfig::default())
        .await
        .unwrap();
    assert_eq!(session.active_step(), Step::ProjectDetails);

    session.set_name("   ");
    assert!(matches!(
        session.save_details().await,
        Err(WizardError::Validation(ValidationError::MissingProjectName))
    ));
    assert_eq!(gw.update_calls(), 0);

    session.set_name("  Banking app  ");
    session.set_description("Sign-up funnel");
    assert_eq!(session.save_details().await.unwrap(), Step::TesterRecruiting);
    let stored = stored(&gw);
    assert_eq!(stored.name, "Banking app");
    assert_eq!(stored.description, "Sign-up funnel");
}

#[tokio::test]
async fn test_launch_gated_until_all_steps_visited() {
    let (_gw, mut session) = setup().await;
    // Details were complete on open, recruiting is active.
    session.set_user_count("10");
    session.save_criteria().await.unwrap();
    assert_eq!(session.active_step(), Step::Screening);

    let err = session.go_to(Step::Launch).unwrap_err();
    assert!(matches!(
        err,
        WizardError::Navigation(NavigationError::Locked { ref missing, .. }) if missing == &vec![Step::Surveys]
    ));

    assert_eq!(session.next_step().unwrap(), Step::Surveys);
    assert_eq!(session.next_step().unwrap(), Step::Launch);
    assert_eq!(session.back(), Step::Surveys);
    assert_eq!(session.go_to(Step::Launch).unwrap(), Step::Launch);
}

#[tokio::test]
async fn test_free_navigation_variant() {
    let config = WizardConfig {
        gating: Gating::Free,
        ..WizardConfig::default()
    };
    let (_gw, mut session) = setup_with(config).await;
    assert_eq!(session.go_to(Step::Launch).unwrap(), Step::Launch);
}

#[tokio::test]
async fn test_launch_without_payment_form_is_noop() {
    let (gw, mut session) = setup().await;
    session.set_user_count("50");
    let err = session.launch().await.unwrap_err();
    assert!(matches!(err, WizardError::Launch(LaunchError::PaymentFormNotShown)));
    assert_eq!(gw.update_calls(), 0);
    assert_eq!(session.launch_state(), LaunchState::AwaitingPayment);
    assert_eq!(stored(&gw).status, ProjectStatus::Draft);
}

#[tokio::test]
async fn test_full_wizard_to_launch() {
    let (gw, mut session) = setup().await;
    session.set_user_count("50");
    session.toggle(FieldRef::Basic(BasicField::AgeRange), "25-34");
    session.save_criteria().await.unwrap();
    session.next_step().unwrap();
    session.next_step().unwrap();
    assert_eq!(session.active_step(), Step::Launch);

    let summary = session.launch_summary();
    assert_eq!(summary.cost.total, 1750);
    invariants::assert_cost_consistent(&summary.cost);

    session.show_payment_form();
    assert!(session.payment_form_shown());
    session.launch().await.unwrap();

    let p = stored(&gw);
    assert_eq!(p.status, ProjectStatus::Launched);
    assert_eq!(p.target_tester_count, 50);
    assert!(p.launch_date.is_some());
    invariants::assert_status_monotonic(ProjectStatus::Draft, p.status);
    invariants::assert_all_project_invariants(&p);
    assert_eq!(session.launch_state(), LaunchState::Launched);
    assert_eq!(session.notices().last().map(|n| n.level), Some(NoticeLevel::Info));

    let err = session.launch().await.unwrap_err();
    assert!(matches!(err, WizardError::Launch(LaunchError::AlreadyLaunched)));
    assert_eq!(gw.update_calls(), 2);
}

#[tokio::test]
async fn test_launch_failure_returns_to_ready() {
    let (gw, mut session) = setup().await;
    session.set_user_count("40");
    session.show_payment_form();
    gw.fail_next_updates(1);

    assert!(session.launch().await.is_err());
    assert_eq!(session.launch_state(), LaunchState::Ready);
    assert!(session.last_launch_error().is_some());
    assert_eq!(session.draft().user_count, "40");
    assert!(!session.draft().is_launching);
    assert_eq!(stored(&gw).status, ProjectStatus::Draft);

    session.launch().await.unwrap();
    assert_eq!(stored(&gw).status, ProjectStatus::Launched);
}

#[tokio::test]
async fn test_abandoned_launch_can_be_retried() {
    let (gw, mut session) = setup().await;
    session.set_user_count("30");
    session.show_payment_form();
    gw.set_delay(Some(Duration::from_millis(300)));

    let abandoned = tokio::time::timeout(Duration::from_millis(20), session.launch()).await;
    assert!(abandoned.is_err());
    assert_eq!(session.launch_state(), LaunchState::Ready);
    assert!(!session.draft().is_launching);
    assert!(session.can_launch());
    assert_eq!(session.last_launch_error(), Some("launch abandoned"));

    gw.set_delay(None);
    session.launch().await.unwrap();
    assert_eq!(session.launch_state(), LaunchState::Launched);
    assert_eq!(stored(&gw).status, ProjectStatus::Launched);
    assert!(!session.can_launch());
}

#[tokio::test]
async fn test_launch_requires_valid_user_count() {
    let (gw, mut session) = setup().await;
    session.show_payment_form();
    session.set_user_count("");
    assert!(matches!(
        session.launch().await,
        Err(WizardError::Validation(ValidationError::InvalidUserCount))
    ));
    assert_eq!(gw.update_calls(), 0);
    assert_eq!(session.launch_state(), LaunchState::Ready);
}

#[tokio::test]
async fn test_launched_project_reopens_launched() {
    let (gw, mut session) = setup().await;
    session.set_user_count("5");
    session.show_payment_form();
    session.launch().await.unwrap();

    let reopened = WizardSession::open(gw.clone(), &ProjectId::new("proj-1"), WizardConfig::default())
        .await
        .unwrap();
    assert_eq!(reopened.launch_state(), LaunchState::Launched);
    assert_eq!(reopened.draft().user_count, "5");
}

#[tokio::test]
async fn test_summary_counts_questions() {
    let gw = Arc::new(InMemoryGateway::new());
    let mut p = draft_project();
    p.screening_config = Some(json!({ "questions": [{ "q": "Do you shop online?" }] }));
    p.survey_config = Some(json!({ "questions": [{}, {}] }));
    gw.insert(p);
    let mut session = WizardSession::open(gw, &ProjectId::new("proj-1"), WizardConfig::default())
        .await
        .unwrap();
    session.set_user_count("3");

    let summary = session.launch_summary();
    assert_eq!(summary.screening_questions, 1);
    assert_eq!(summary.survey_questions, 2);
    assert_eq!(summary.cost.total, 105);
    // Recruiting is the only incomplete step.
    assert_eq!(session.active_step(), Step::TesterRecruiting);
}
