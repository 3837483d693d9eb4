//! # Wizard session
//!
//! One running wizard over one project. The session owns the local draft,
//! the step navigator and the launch state machine, and is handed its
//! gateway and configuration explicitly when it is opened.
//!
//! ## Checkpoints
//!
//! The draft is only written at three explicit checkpoints
//! ([`WizardSession::save_details`], [`WizardSession::save_criteria`],
//! [`WizardSession::launch`]). Each one validates locally first, then sends
//! a single update. A failure keeps the draft as it was and leaves a notice
//! for the user; the same call can simply be repeated.
//!
//! ## In-flight requests
//!
//! While a checkpoint is in flight the matching `is_saving`/`is_launching`
//! flag is raised and a second checkpoint is refused with
//! [`WizardError::Busy`]. Every call is bounded by the configured timeout
//! and raced against the session's [`CancellationToken`]; once the token is
//! cancelled a late response is dropped without touching session state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::WizardConfig;
use crate::cost::{CostSummary, PRICE_PER_USER};
use crate::criteria::{parse_user_count, CriteriaTab, FieldRef, RecruitingCriteria, TargetingProfile};
use crate::errors::{GatewayError, LaunchError, Result, ValidationError, WizardError};
use crate::filter::FilterSelection;
use crate::gateway::ProjectGateway;
use crate::launch::{LaunchCommit, LaunchState, LaunchSummary};
use crate::navigator::{Step, StepNavigator};
use crate::types::{Project, ProjectId, ProjectUpdate};

/// Local, unsaved copy of what the user is editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDraft {
    pub name: String,
    pub description: String,
    /// Raw text of the tester-count input.
    pub user_count: String,
    pub profile: TargetingProfile,
    pub active_tab: CriteriaTab,
    pub is_saving: bool,
    pub is_launching: bool,
}

impl WizardDraft {
    pub fn from_project(project: &Project) -> Self {
        let (user_count, profile) = match &project.recruiting_criteria {
            Some(c) => (c.user_count, c.profile.clone()),
            None => (project.target_tester_count, TargetingProfile::default()),
        };
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            user_count: if user_count > 0 {
                user_count.to_string()
            } else {
                String::new()
            },
            profile,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Upper bound on undismissed notices held by a session.
pub const MAX_NOTICES: usize = 8;

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Clears an in-flight flag when dropped, including when the request
/// future itself is dropped half way.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Rolls a `Launching` commit back to `Ready` if the launch future is
/// dropped before the gateway answers.
struct PendingLaunch<'a> {
    commit: &'a mut LaunchCommit,
    settled: bool,
}

impl<'a> PendingLaunch<'a> {
    fn new(commit: &'a mut LaunchCommit) -> Self {
        Self {
            commit,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for PendingLaunch<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.commit.fail("launch abandoned");
        }
    }
}

/// Bound `fut` by `timeout` and abandon it when `token` is cancelled.
async fn guarded<T>(
    token: &CancellationToken,
    timeout: Duration,
    fut: impl Future<Output = std::result::Result<T, GatewayError>>,
) -> std::result::Result<T, GatewayError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(GatewayError::Cancelled),
        res = tokio::time::timeout(timeout, fut) => match res {
            Ok(inner) => inner,
            Err(_) => Err(GatewayError::Timeout(timeout)),
        },
    }
}

pub struct WizardSession {
    gateway: Arc<dyn ProjectGateway>,
    config: WizardConfig,
    project: Project,
    draft: WizardDraft,
    navigator: StepNavigator,
    launch: LaunchCommit,
    notices: Vec<Notice>,
    cancel: CancellationToken,
}

impl WizardSession {
    /// Load `id` and start on its first incomplete step.
    pub async fn open(
        gateway: Arc<dyn ProjectGateway>,
        id: &ProjectId,
        config: WizardConfig,
    ) -> Result<Self> {
        let cancel = CancellationToken::new();
        let project = guarded(&cancel, config.request_timeout, gateway.fetch_project(id))
            .await
            .map_err(|e| {
                error!("Failed to open wizard for project {id}: {e}");
                WizardError::from(e)
            })?;

        info!("Wizard opened for project {}", project.id);
        Ok(Self::from_project(gateway, project, config))
    }

    /// Start a session over an already loaded record.
    pub fn from_project(gateway: Arc<dyn ProjectGateway>, project: Project, config: WizardConfig) -> Self {
        let navigator = StepNavigator::new(config.gating, &project.completed_steps());
        Self {
            draft: WizardDraft::from_project(&project),
            launch: LaunchCommit::for_project(&project),
            navigator,
            project,
            gateway,
            config,
            notices: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────

    /// Last state known to be persisted.
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn active_step(&self) -> Step {
        self.navigator.active()
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn launch_state(&self) -> LaunchState {
        self.launch.state()
    }

    pub fn payment_form_shown(&self) -> bool {
        self.launch.payment_form_shown()
    }

    /// Whether the launch button should be enabled.
    pub fn can_launch(&self) -> bool {
        self.launch.can_launch() && !self.draft.is_saving
    }

    pub fn last_launch_error(&self) -> Option<&str> {
        self.launch.last_error()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Token the host cancels when the wizard goes away.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ─────────────────────────────────────────────────────────
    // Draft edits (local only)
    // ─────────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_user_count(&mut self, input: impl Into<String>) {
        self.draft.user_count = input.into();
    }

    pub fn select_tab(&mut self, tab: CriteriaTab) {
        self.draft.active_tab = tab;
    }

    pub fn selection(&self, field: FieldRef) -> FilterSelection {
        self.draft.profile.selection(field)
    }

    /// Store the complete new selection of `field`.
    pub fn set_selection(&mut self, field: FieldRef, selection: FilterSelection) {
        self.draft.profile.set_selection(field, selection);
    }

    pub fn toggle(&mut self, field: FieldRef, value: &str) {
        self.draft.profile.toggle(field, value);
    }

    pub fn remove(&mut self, field: FieldRef, value: &str) {
        let next = self.draft.profile.selection(field).removed(value);
        self.draft.profile.set_selection(field, next);
    }

    pub fn toggle_device(&mut self, device: &str) {
        self.draft.profile.toggle_device(device);
    }

    pub fn cost_summary(&self) -> CostSummary {
        CostSummary::from_input(&self.draft.user_count, PRICE_PER_USER)
    }

    pub fn launch_summary(&self) -> LaunchSummary {
        LaunchSummary::new(&self.project, self.cost_summary())
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────

    pub fn go_to(&mut self, step: Step) -> Result<Step> {
        self.navigator.request(step).map_err(|e| {
            self.push(NoticeLevel::Error, e.to_string());
            WizardError::from(e)
        })
    }

    /// Continue from a step that has no checkpoint of its own.
    pub fn next_step(&mut self) -> Result<Step> {
        self.navigator.advance().map_err(|e| {
            self.push(NoticeLevel::Error, e.to_string());
            WizardError::from(e)
        })
    }

    pub fn back(&mut self) -> Step {
        self.navigator.back()
    }

    pub fn show_payment_form(&mut self) {
        self.launch.show_payment_form();
    }

    // ─────────────────────────────────────────────────────────
    // Checkpoints
    // ─────────────────────────────────────────────────────────

    /// Save name and description, then move on to recruiting.
    pub async fn save_details(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let name = self.draft.name.trim().to_string();
        if name.is_empty() {
            return Err(self.reject(ValidationError::MissingProjectName));
        }
        let update = ProjectUpdate::details(name, self.draft.description.clone());

        self.checkpoint(update, "project details").await?;
        self.advance_to(Step::TesterRecruiting)
    }

    /// "Save & Continue" on the recruiting step.
    ///
    /// Writes the whole criteria record plus `targetTesterCount` in one
    /// update and advances to screening.
    pub async fn save_criteria(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let criteria = match RecruitingCriteria::from_input(&self.draft.user_count, self.draft.profile.clone()) {
            Ok(c) => c,
            Err(e) => return Err(self.reject(e)),
        };
        let update = ProjectUpdate::criteria(criteria);

        self.checkpoint(update, "recruiting criteria").await?;
        self.advance_to(Step::Screening)
    }

    /// Mark the project launched. A no-op error until the payment form has
    /// been shown.
    pub async fn launch(&mut self) -> Result<()> {
        self.ensure_idle()?;
        if !self.launch.payment_form_shown() {
            return Err(LaunchError::PaymentFormNotShown.into());
        }
        let user_count = match parse_user_count(&self.draft.user_count) {
            Some(n) => n,
            None => return Err(self.reject(ValidationError::InvalidUserCount)),
        };
        let update = self.launch.begin(user_count, Utc::now())?;

        let id = self.project.id.clone();
        let result = {
            let _flag = InFlight::raise(&mut self.draft.is_launching);
            let mut pending = PendingLaunch::new(&mut self.launch);
            let res = guarded(
                &self.cancel,
                self.config.request_timeout,
                self.gateway.update_project(&id, &update),
            )
            .await;
            pending.settle();
            res
        };

        match result {
            Ok(()) if !self.cancel.is_cancelled() => {
                self.launch.succeed();
                self.project.apply(&update);
                info!("Project {id} launched with {user_count} testers");
                self.push(NoticeLevel::Info, "Project launched".to_string());
                Ok(())
            }
            Ok(()) | Err(GatewayError::Cancelled) => {
                self.launch.fail("cancelled");
                Err(GatewayError::Cancelled.into())
            }
            Err(e) => {
                warn!("Launch of project {id} failed: {e}");
                self.launch.fail(e.to_string());
                Err(self.surface(e))
            }
        }
    }

    /// Abandon the session. In-flight calls resolve to `Cancelled` and
    /// their responses are ignored.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    // ─────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<()> {
        if self.is_closed() {
            return Err(GatewayError::Cancelled.into());
        }
        if self.draft.is_saving || self.draft.is_launching {
            return Err(WizardError::Busy);
        }
        Ok(())
    }

    /// Send one checkpoint update and fold it into the known record.
    async fn checkpoint(&mut self, update: ProjectUpdate, what: &str) -> Result<()> {
        let id = self.project.id.clone();
        let result = {
            let _flag = InFlight::raise(&mut self.draft.is_saving);
            guarded(
                &self.cancel,
                self.config.request_timeout,
                self.gateway.update_project(&id, &update),
            )
            .await
        };

        match result {
            Ok(()) if !self.cancel.is_cancelled() => {
                self.project.apply(&update);
                info!("Saved {what} for project {id}");
                Ok(())
            }
            Ok(()) | Err(GatewayError::Cancelled) => Err(GatewayError::Cancelled.into()),
            Err(e) => {
                warn!("Saving {what} for project {id} failed: {e}");
                Err(self.surface(e))
            }
        }
    }

    fn advance_to(&mut self, step: Step) -> Result<Step> {
        Ok(self.navigator.request(step)?)
    }

    fn reject(&mut self, e: ValidationError) -> WizardError {
        self.push(NoticeLevel::Error, e.to_string());
        e.into()
    }

    fn surface(&mut self, e: GatewayError) -> WizardError {
        if matches!(e, GatewayError::NotFound(_)) {
            error!("Project {} no longer exists", self.project.id);
        }
        self.push(NoticeLevel::Error, e.to_string());
        e.into()
    }

    /// Repeats of the newest notice are folded into it, and only the
    /// latest [`MAX_NOTICES`] are kept.
    fn push(&mut self, level: NoticeLevel, message: String) {
        let notice = Notice { level, message };
        if self.notices.last() == Some(&notice) {
            return;
        }
        if self.notices.len() == MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }
}
