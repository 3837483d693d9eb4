//! # Step navigation
//!
//! The wizard's five steps form a strict order:
//!
//! ```text
//! ProjectDetails ─► TesterRecruiting ─► Screening ─► Surveys ─► Launch
//! ```
//!
//! Any step may be requested directly. Under [`Gating::RequireVisited`],
//! `Launch` stays locked until each of the four preceding steps has been
//! visited at least once; visiting is sticky and nothing is invalidated by
//! moving backwards. The navigator has no terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    ProjectDetails,
    TesterRecruiting,
    Screening,
    Surveys,
    Launch,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::ProjectDetails,
        Step::TesterRecruiting,
        Step::Screening,
        Step::Surveys,
        Step::Launch,
    ];

    /// Steps that must be visited before `Launch` unlocks.
    pub const PREREQUISITES: [Step; 4] = [
        Step::ProjectDetails,
        Step::TesterRecruiting,
        Step::Screening,
        Step::Surveys,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::ProjectDetails => "project-details",
            Step::TesterRecruiting => "tester-recruiting",
            Step::Screening => "screening",
            Step::Surveys => "surveys",
            Step::Launch => "launch",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which navigator variant is in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gating {
    /// Direct jump to any step.
    Free,
    /// `Launch` requires every prerequisite step to have been visited.
    #[default]
    RequireVisited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigator {
    active: Step,
    visited: [bool; 5],
    gating: Gating,
}

impl StepNavigator {
    /// Start on the first incomplete step; `ProjectDetails` when every step
    /// is already complete. Completed steps count as visited.
    pub fn new(gating: Gating, completed: &[Step]) -> Self {
        let active = Step::ALL
            .into_iter()
            .find(|s| !completed.contains(s))
            .unwrap_or(Step::ProjectDetails);

        let mut visited = [false; 5];
        for step in completed {
            visited[step.index()] = true;
        }
        visited[active.index()] = true;

        Self {
            active,
            visited,
            gating,
        }
    }

    pub fn active(&self) -> Step {
        self.active
    }

    pub fn gating(&self) -> Gating {
        self.gating
    }

    pub fn is_visited(&self, step: Step) -> bool {
        self.visited[step.index()]
    }

    /// Prerequisites still missing before `step` can be entered.
    pub fn missing_for(&self, step: Step) -> Vec<Step> {
        if self.gating == Gating::Free || step != Step::Launch {
            return Vec::new();
        }
        Step::PREREQUISITES
            .into_iter()
            .filter(|s| !self.is_visited(*s))
            .collect()
    }

    pub fn can_enter(&self, step: Step) -> bool {
        self.missing_for(step).is_empty()
    }

    /// Jump straight to `target`.
    pub fn request(&mut self, target: Step) -> Result<Step, NavigationError> {
        let missing = self.missing_for(target);
        if !missing.is_empty() {
            return Err(NavigationError::Locked { target, missing });
        }
        self.active = target;
        self.visited[target.index()] = true;
        Ok(target)
    }

    /// Move to the step after the active one.
    pub fn advance(&mut self) -> Result<Step, NavigationError> {
        let next = self
            .active
            .next()
            .ok_or(NavigationError::NoNextStep(self.active))?;
        self.request(next)
    }

    /// Step back one; a no-op on the first step.
    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.active.previous() {
            self.active = prev;
        }
        self.active
    }
}
