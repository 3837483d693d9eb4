//! # Usergy Project Wizard
//!
//! Client-side model of the Usergy project configuration wizard: the flow a
//! client walks through to describe a testing project, target testers and
//! launch a paid campaign.
//!
//! | Step              | Entry point(s)                                        |
//! |-------------------|-------------------------------------------------------|
//! | Open              | [`WizardSession::open`]                               |
//! | Project details   | `set_name`, `set_description`, `save_details`         |
//! | Tester recruiting | `toggle`, `set_selection`, `set_user_count`, `save_criteria` |
//! | Screening/surveys | `go_to`, `next_step` (configured elsewhere)           |
//! | Launch            | `show_payment_form`, `launch`, `launch_summary`       |
//!
//! ## Architecture
//!
//! Pure state lives in [`filter`], [`criteria`], [`navigator`], [`cost`] and
//! [`launch`]; none of them perform I/O. [`session`] wires them together and
//! talks to the backend only through the [`gateway::ProjectGateway`] trait,
//! at explicit checkpoints.

pub mod catalog;
pub mod config;
pub mod cost;
pub mod criteria;
pub mod errors;
pub mod filter;
pub mod gateway;
pub mod launch;
pub mod navigator;
pub mod session;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_wizard_flow;

pub use config::WizardConfig;
pub use cost::{CostSummary, PRICE_PER_USER};
pub use criteria::{CriteriaTab, FieldRef, RecruitingCriteria, TargetingProfile};
pub use errors::{GatewayError, LaunchError, NavigationError, ValidationError, WizardError};
pub use filter::FilterSelection;
pub use gateway::{HttpGateway, InMemoryGateway, ProjectGateway};
pub use launch::{LaunchCommit, LaunchState, LaunchSummary};
pub use navigator::{Gating, Step, StepNavigator};
pub use session::{Notice, NoticeLevel, WizardDraft, WizardSession};
pub use types::{NewProject, Project, ProjectId, ProjectStatus, ProjectUpdate};
