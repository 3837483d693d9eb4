//! SQLite-backed implementation of the wizard's project gateway.
//!
//! Payloads are validated here, at the boundary, before they reach the
//! database: unknown option values, blank names and status regressions are
//! refused with [`GatewayError::Rejected`].

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};
use usergy_wizard::gateway::GatewayResult;
use usergy_wizard::{
    GatewayError, NewProject, Project, ProjectGateway, ProjectId, ProjectStatus, ProjectUpdate,
};
use uuid::Uuid;

use crate::db;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_gateway(err: StoreError) -> GatewayError {
    match err {
        StoreError::NotFound(id) => GatewayError::NotFound(ProjectId::new(id)),
        StoreError::Invalid(e) => GatewayError::Rejected(e.to_string()),
        other => {
            error!("Project store failure: {other}");
            GatewayError::Backend(other.to_string())
        }
    }
}

#[async_trait]
impl ProjectGateway for SqliteGateway {
    async fn create_project(&self, new: NewProject) -> GatewayResult<Project> {
        new.validate()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;

        let project = Project {
            id: ProjectId::new(Uuid::new_v4().to_string()),
            name: new.name.trim().to_string(),
            description: new.description,
            target_tester_count: 0,
            recruiting_criteria: None,
            screening_config: None,
            survey_config: None,
            status: ProjectStatus::Draft,
            launch_date: None,
        };
        db::insert_project(&self.pool, &project)
            .await
            .map_err(to_gateway)?;
        info!("Created project {}", project.id);
        Ok(project)
    }

    async fn fetch_project(&self, id: &ProjectId) -> GatewayResult<Project> {
        db::get_project(&self.pool, id.as_str())
            .await
            .map_err(to_gateway)?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn update_project(&self, id: &ProjectId, update: &ProjectUpdate) -> GatewayResult<()> {
        update
            .validate()
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        db::update_project(&self.pool, id.as_str(), update)
            .await
            .map_err(to_gateway)?;
        info!("Updated project {id}");
        Ok(())
    }
}
