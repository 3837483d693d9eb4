//! Gateway client for the project store REST API.
//!
//! | Operation        | Request                    | Success            |
//! |------------------|----------------------------|--------------------|
//! | `create_project` | `POST /projects`           | `201` + project    |
//! | `fetch_project`  | `GET /projects/:id`        | `200` + project    |
//! | `update_project` | `PATCH /projects/:id`      | `204`              |
//!
//! `404` maps to [`GatewayError::NotFound`], `422` to
//! [`GatewayError::Rejected`], anything else non-2xx to
//! [`GatewayError::Backend`].

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{GatewayResult, ProjectGateway};
use crate::errors::GatewayError;
use crate::types::{NewProject, Project, ProjectId, ProjectUpdate};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, id: &ProjectId) -> String {
        format!("{}/projects/{}", self.base_url, id)
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Backend(e.to_string())
}

/// Turn a non-success response into the matching gateway error.
async fn error_for(resp: Response, id: Option<&ProjectId>) -> GatewayError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => GatewayError::NotFound(id.clone()),
        (StatusCode::UNPROCESSABLE_ENTITY, _) | (StatusCode::BAD_REQUEST, _) => {
            GatewayError::Rejected(message)
        }
        _ => GatewayError::Backend(format!("{status}: {message}")),
    }
}

#[async_trait]
impl ProjectGateway for HttpGateway {
    async fn create_project(&self, new: NewProject) -> GatewayResult<Project> {
        let resp = self
            .client
            .post(format!("{}/projects", self.base_url))
            .json(&new)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(error_for(resp, None).await);
        }
        let project: Project = resp.json().await.map_err(transport)?;
        debug!("Created project {}", project.id);
        Ok(project)
    }

    async fn fetch_project(&self, id: &ProjectId) -> GatewayResult<Project> {
        let resp = self
            .client
            .get(self.project_url(id))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(error_for(resp, Some(id)).await);
        }
        resp.json().await.map_err(transport)
    }

    async fn update_project(&self, id: &ProjectId, update: &ProjectUpdate) -> GatewayResult<()> {
        let resp = self
            .client
            .patch(self.project_url(id))
            .json(update)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(error_for(resp, Some(id)).await);
        }
        debug!("Updated project {id}");
        Ok(())
    }
}
