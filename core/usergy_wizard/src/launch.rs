//! # Launch commit
//!
//! ```text
//! AwaitingPayment ──(payment form shown)──► Ready ──(launch)──► Launching
//!                                             ▲                     │
//!                                             └──── failure ────────┤
//!                                                                   ▼
//!                                                               Launched
//! ```
//!
//! The only precondition is that the payment form has been shown. Card
//! details are not captured or checked anywhere in this crate.

use chrono::{DateTime, Utc};

use crate::cost::CostSummary;
use crate::errors::LaunchError;
use crate::types::{Project, ProjectStatus, ProjectUpdate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchState {
    #[default]
    AwaitingPayment,
    Ready,
    Launching,
    Launched,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchCommit {
    state: LaunchState,
    last_error: Option<String>,
}

impl LaunchCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the commit state for a project opened in the wizard.
    pub fn for_project(project: &Project) -> Self {
        let state = if project.status >= ProjectStatus::Launched {
            LaunchState::Launched
        } else {
            LaunchState::AwaitingPayment
        };
        Self {
            state,
            last_error: None,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn payment_form_shown(&self) -> bool {
        !matches!(self.state, LaunchState::AwaitingPayment)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The launch button is enabled only in `Ready`.
    pub fn can_launch(&self) -> bool {
        self.state == LaunchState::Ready
    }

    pub fn show_payment_form(&mut self) {
        if self.state == LaunchState::AwaitingPayment {
            self.state = LaunchState::Ready;
        }
    }

    /// Enter `Launching` and return the single update to send.
    pub fn begin(&mut self, user_count: u32, now: DateTime<Utc>) -> Result<ProjectUpdate, LaunchError> {
        match self.state {
            LaunchState::AwaitingPayment => Err(LaunchError::PaymentFormNotShown),
            LaunchState::Launching => Err(LaunchError::AlreadyLaunching),
            LaunchState::Launched => Err(LaunchError::AlreadyLaunched),
            LaunchState::Ready => {
                self.state = LaunchState::Launching;
                self.last_error = None;
                Ok(ProjectUpdate::launch(user_count, now))
            }
        }
    }

    pub fn succeed(&mut self) {
        if self.state == LaunchState::Launching {
            self.state = LaunchState::Launched;
        }
    }

    /// Back to `Ready` so the user can retry.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.state == LaunchState::Launching {
            self.state = LaunchState::Ready;
            self.last_error = Some(reason.into());
        }
    }
}

/// Read-only figures shown on the launch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSummary {
    pub cost: CostSummary,
    pub screening_questions: usize,
    pub survey_questions: usize,
}

impl LaunchSummary {
    pub fn new(project: &Project, cost: CostSummary) -> Self {
        Self {
            cost,
            screening_questions: project.screening_question_count(),
            survey_questions: project.survey_question_count(),
        }
    }
}
