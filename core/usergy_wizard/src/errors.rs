//! Wizard-wide error types.
//!
//! Failures fall into three classes:
//!
//! | Class        | Source                               | Session outcome             |
//! |--------------|--------------------------------------|-----------------------------|
//! | Validation   | local checks, never reaches network  | recoverable, draft kept     |
//! | Persistence  | gateway / backend failure            | recoverable, retryable      |
//! | Not found    | stale or invalid project id          | fatal to the session        |

use std::time::Duration;

use thiserror::Error;

use crate::navigator::Step;
use crate::types::ProjectId;

/// Rejected locally before any gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter the number of testers you need (a whole number greater than 0)")]
    InvalidUserCount,

    #[error("Project name is required")]
    MissingProjectName,

    #[error("Unknown option `{value}` for field `{field}`")]
    UnknownOption { field: String, value: String },

    #[error("Unknown device `{0}`")]
    UnknownDevice(String),

    #[error("Status cannot move from {from} to {to}")]
    StatusRegression { from: String, to: String },
}

/// Failure reported by a [`crate::gateway::ProjectGateway`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Project {0} not found")]
    NotFound(ProjectId),

    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend refused the payload (validation at the boundary).
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Step `{target}` is locked until {missing:?} have been visited")]
    Locked { target: Step, missing: Vec<Step> },

    #[error("`{0}` is the last step")]
    NoNextStep(Step),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("Add a payment method before launching")]
    PaymentFormNotShown,

    #[error("Launch already in progress")]
    AlreadyLaunching,

    #[error("Project is already launched")]
    AlreadyLaunched,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// A save or launch is already in flight for this session.
    #[error("Another request is still in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WizardError {
    /// The session's project no longer exists; nothing else can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WizardError::Gateway(GatewayError::NotFound(_)))
    }

    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal() && !matches!(self, WizardError::Config(_))
    }

    /// True for errors raised before any network traffic.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WizardError::Validation(_)
                | WizardError::Navigation(_)
                | WizardError::Launch(_)
                | WizardError::Busy
        )
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
