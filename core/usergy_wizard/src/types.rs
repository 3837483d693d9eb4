//! # Types
//!
//! Records exchanged with the project store.
//!
//! ## Status as a forward-only lifecycle
//!
//! ```text
//! Draft ──► Launched ──► Completed
//! ```
//!
//! The wizard only ever performs `Draft -> Launched`, and stamps
//! `launch_date` in the same update. Nothing moves a status backwards.
//!
//! ## Partial updates
//!
//! [`ProjectUpdate`] names only the fields to overwrite; absent fields are
//! left untouched by the store. Nested fields (`recruiting_criteria`) are
//! replaced as a whole, never merged.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::criteria::RecruitingCriteria;
use crate::errors::ValidationError;
use crate::navigator::Step;

/// Store-assigned project identifier. Opaque to the wizard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Being configured; not visible to testers.
    #[default]
    Draft,
    /// Paid for and recruiting.
    Launched,
    /// All testing finished.
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Launched => "launched",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ProjectStatus::Draft),
            "launched" => Some(ProjectStatus::Launched),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    /// Staying put or moving forward is allowed; moving back is not.
    pub fn can_transition_to(self, to: ProjectStatus) -> bool {
        to >= self
    }

    pub fn check_transition(self, to: ProjectStatus) -> Result<(), ValidationError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(ValidationError::StatusRegression {
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_tester_count: u32,
    #[serde(default)]
    pub recruiting_criteria: Option<RecruitingCriteria>,
    /// Owned by the screening step; only its question count is read here.
    #[serde(default)]
    pub screening_config: Option<Value>,
    /// Owned by the surveys step; only its question count is read here.
    #[serde(default)]
    pub survey_config: Option<Value>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub launch_date: Option<DateTime<Utc>>,
}

impl Project {
    /// Steps whose data is already present on the record.
    pub fn completed_steps(&self) -> Vec<Step> {
        let mut done = Vec::new();
        if !self.name.trim().is_empty() {
            done.push(Step::ProjectDetails);
        }
        if self
            .recruiting_criteria
            .as_ref()
            .is_some_and(|c| c.user_count > 0)
        {
            done.push(Step::TesterRecruiting);
        }
        if self.screening_config.is_some() {
            done.push(Step::Screening);
        }
        if self.survey_config.is_some() {
            done.push(Step::Surveys);
        }
        if self.status >= ProjectStatus::Launched {
            done.push(Step::Launch);
        }
        done
    }

    pub fn screening_question_count(&self) -> usize {
        question_count(self.screening_config.as_ref())
    }

    pub fn survey_question_count(&self) -> usize {
        question_count(self.survey_config.as_ref())
    }

    /// Apply a partial update: named fields overwrite, the rest stay.
    pub fn apply(&mut self, update: &ProjectUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &update.description {
            self.description.clone_from(description);
        }
        if let Some(count) = update.target_tester_count {
            self.target_tester_count = count;
        }
        if let Some(criteria) = &update.recruiting_criteria {
            self.recruiting_criteria = Some(criteria.clone());
        }
        if let Some(config) = &update.screening_config {
            self.screening_config = Some(config.clone());
        }
        if let Some(config) = &update.survey_config {
            self.survey_config = Some(config.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(date) = update.launch_date {
            self.launch_date = Some(date);
        }
    }
}

/// Number of entries in a config's `questions` array; 0 if absent or malformed.
pub fn question_count(config: Option<&Value>) -> usize {
    config
        .and_then(|c| c.get("questions"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Fields supplied when a project is first created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingProjectName);
        }
        Ok(())
    }
}

/// A partial-field update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tester_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiting_criteria: Option<RecruitingCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<DateTime<Utc>>,
}

impl ProjectUpdate {
    /// Checkpoint write of the recruiting step.
    pub fn criteria(criteria: RecruitingCriteria) -> Self {
        Self {
            target_tester_count: Some(criteria.user_count),
            recruiting_criteria: Some(criteria),
            ..Self::default()
        }
    }

    /// Checkpoint write of the details step.
    pub fn details(name: String, description: String) -> Self {
        Self {
            name: Some(name),
            description: Some(description),
            ..Self::default()
        }
    }

    /// Terminal write of the launch step.
    pub fn launch(user_count: u32, at: DateTime<Utc>) -> Self {
        Self {
            target_tester_count: Some(user_count),
            status: Some(ProjectStatus::Launched),
            launch_date: Some(at),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Boundary validation, run by the store before anything is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingProjectName);
            }
        }
        if let Some(criteria) = &self.recruiting_criteria {
            criteria.validate()?;
        }
        Ok(())
    }
}
