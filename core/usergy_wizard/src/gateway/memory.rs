//! In-process gateway backed by a map. Used by tests and by hosts that
//! embed the wizard without a project store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GatewayResult, ProjectGateway};
use crate::errors::GatewayError;
use crate::types::{NewProject, Project, ProjectId, ProjectStatus, ProjectUpdate};

#[derive(Default)]
pub struct InMemoryGateway {
    projects: Mutex<HashMap<ProjectId, Project>>,
    next_id: AtomicUsize,
    updates: AtomicUsize,
    fail_updates: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as-is.
    pub fn insert(&self, project: Project) {
        self.lock().insert(project.id.clone(), project);
    }

    pub fn get(&self, id: &ProjectId) -> Option<Project> {
        self.lock().get(id).cloned()
    }

    /// Number of `update_project` calls that reached the gateway.
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make the next `n` updates fail with a backend error.
    pub fn fail_next_updates(&self, n: usize) {
        self.fail_updates.store(n, Ordering::SeqCst);
    }

    /// Hold every call for `delay` before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProjectId, Project>> {
        self.projects.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

#[async_trait]
impl ProjectGateway for InMemoryGateway {
    async fn create_project(&self, new: NewProject) -> GatewayResult<Project> {
        new.validate()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        self.pause().await;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let project = Project {
            id: ProjectId::new(format!("project-{n}")),
            name: new.name,
            description: new.description,
            target_tester_count: 0,
            recruiting_criteria: None,
            screening_config: None,
            survey_config: None,
            status: ProjectStatus::Draft,
            launch_date: None,
        };
        self.insert(project.clone());
        Ok(project)
    }

    async fn fetch_project(&self, id: &ProjectId) -> GatewayResult<Project> {
        self.pause().await;
        self.get(id).ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn update_project(&self, id: &ProjectId, update: &ProjectUpdate) -> GatewayResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let failing = self
            .fail_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::Backend("injected failure".to_string()));
        }

        update
            .validate()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        let mut projects = self.lock();
        let project = projects
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        if let Some(status) = update.status {
            project
                .status
                .check_transition(status)
                .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        }
        project.apply(update);
        Ok(())
    }
}
