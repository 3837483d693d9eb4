//! # Persistence gateway
//!
//! The wizard's only view of the backend. It reads one project record when
//! a session opens and writes it back at explicit checkpoints:
//!
//! | Checkpoint          | Fields written                                   |
//! |---------------------|--------------------------------------------------|
//! | Save details        | `name`, `description`                            |
//! | Save & Continue     | `recruitingCriteria`, `targetTesterCount`        |
//! | Launch              | `status`, `targetTesterCount`, `launchDate`      |
//!
//! Every write is a full replacement of the named fields, so retrying a
//! failed checkpoint is always safe.

use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::types::{NewProject, Project, ProjectId, ProjectUpdate};

pub mod http;
pub mod memory;

pub use http::HttpGateway;
pub use memory::InMemoryGateway;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[async_trait]
pub trait ProjectGateway: Send + Sync {
    async fn create_project(&self, new: NewProject) -> GatewayResult<Project>;

    /// `GatewayError::NotFound` when `id` does not exist.
    async fn fetch_project(&self, id: &ProjectId) -> GatewayResult<Project>;

    /// Overwrite only the fields named in `update`.
    async fn update_project(&self, id: &ProjectId, update: &ProjectUpdate) -> GatewayResult<()>;
}
