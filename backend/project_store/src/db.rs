//! Database layer: migrations, project reads and partial-field writes.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;
use usergy_wizard::{Project, ProjectId, ProjectStatus, ProjectUpdate, RecruitingCriteria};

use crate::errors::{Result, StoreError};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    // Make sure the file is created if it doesn't exist yet.
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    let url = if url.contains(":memory:") || url.contains("mode=") {
        url
    } else if url.contains('?') {
        format!("{url}&mode=rwc")
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Row mapping
// ─────────────────────────────────────────────────────────

/// A project row as stored; JSON columns are still text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_tester_count: i64,
    pub recruiting_criteria: Option<String>,
    pub screening_config: Option<String>,
    pub survey_config: Option<String>,
    pub status: String,
    pub launch_date: Option<String>,
}

impl ProjectRow {
    pub fn into_project(self) -> Result<Project> {
        let corrupt = |reason: String| StoreError::CorruptRow {
            id: self.id.clone(),
            reason,
        };

        let target_tester_count = u32::try_from(self.target_tester_count)
            .map_err(|_| corrupt(format!("tester count {}", self.target_tester_count)))?;
        let status = ProjectStatus::parse(&self.status)
            .ok_or_else(|| corrupt(format!("status {}", self.status)))?;
        let launch_date = self
            .launch_date
            .as_deref()
            .map(|s| {
                DateTime::parse_from_rfc3339(s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| corrupt(format!("launch date {s}: {e}")))
            })
            .transpose()?;
        let recruiting_criteria = parse_json::<RecruitingCriteria>(self.recruiting_criteria.as_deref())?;
        let screening_config = parse_json::<Value>(self.screening_config.as_deref())?;
        let survey_config = parse_json::<Value>(self.survey_config.as_deref())?;

        Ok(Project {
            id: ProjectId::new(self.id),
            name: self.name,
            description: self.description,
            target_tester_count,
            recruiting_criteria,
            screening_config,
            survey_config,
            status,
            launch_date,
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: Option<&str>) -> Result<Option<T>> {
    raw.map(serde_json::from_str::<T>).transpose().map_err(StoreError::from)
}

fn to_json<T: serde::Serialize>(value: Option<&T>) -> Result<Option<String>> {
    value.map(|v| serde_json::to_string(v)).transpose().map_err(StoreError::from)
}

// ─────────────────────────────────────────────────────────
// Project writes
// ─────────────────────────────────────────────────────────

pub async fn insert_project(pool: &SqlitePool, project: &Project) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO projects
            (id, name, description, target_tester_count, recruiting_criteria,
             screening_config, survey_config, status, launch_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(project.id.as_str())
    .bind(&project.name)
    .bind(&project.description)
    .bind(i64::from(project.target_tester_count))
    .bind(to_json(project.recruiting_criteria.as_ref())?)
    .bind(to_json(project.screening_config.as_ref())?)
    .bind(to_json(project.survey_config.as_ref())?)
    .bind(project.status.as_str())
    .bind(project.launch_date.map(|d| d.to_rfc3339()))
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite only the fields named in `update`, in one transaction.
///
/// A status that would move backwards is rejected before anything is
/// written. Returns `NotFound` when the id is unknown.
pub async fn update_project(pool: &SqlitePool, id: &str, update: &ProjectUpdate) -> Result<()> {
    let mut tx = pool.begin().await?;

    let current: Option<(String,)> = sqlx::query_as("SELECT status FROM projects WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let (current,) = current.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if let Some(next) = update.status {
        let current = ProjectStatus::parse(&current).ok_or_else(|| StoreError::CorruptRow {
            id: id.to_string(),
            reason: format!("status {current}"),
        })?;
        current.check_transition(next)?;
    }

    // NULL binds leave the column as it is.
    sqlx::query(
        r#"
        UPDATE projects SET
            name                = COALESCE(?1, name),
            description         = COALESCE(?2, description),
            target_tester_count = COALESCE(?3, target_tester_count),
            recruiting_criteria = COALESCE(?4, recruiting_criteria),
            screening_config    = COALESCE(?5, screening_config),
            survey_config       = COALESCE(?6, survey_config),
            status              = COALESCE(?7, status),
            launch_date         = COALESCE(?8, launch_date),
            updated_at          = strftime('%s', 'now')
        WHERE id = ?9
        "#,
    )
    .bind(update.name.as_deref())
    .bind(update.description.as_deref())
    .bind(update.target_tester_count.map(i64::from))
    .bind(to_json(update.recruiting_criteria.as_ref())?)
    .bind(to_json(update.screening_config.as_ref())?)
    .bind(to_json(update.survey_config.as_ref())?)
    .bind(update.status.map(ProjectStatus::as_str))
    .bind(update.launch_date.map(|d| d.to_rfc3339()))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Project reads
// ─────────────────────────────────────────────────────────

pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Option<Project>> {
    let row = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, name, description, target_tester_count, recruiting_criteria,
               screening_config, survey_config, status, launch_date
        FROM   projects
        WHERE  id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(ProjectRow::into_project).transpose()
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}
