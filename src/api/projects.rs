//! Compose project endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /environments/{env}/projects`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// `docker-compose.yml` content.
    pub compose_content: String,
    /// `.env` content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_content: Option<String>,
    /// Project name.
    pub name: String,
}

/// Body of `PUT /environments/{env}/projects/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    /// `docker-compose.yml` content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_content: Option<String>,
    /// `.env` content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_content: Option<String>,
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateProjectRequest {
    /// Returns true when the request carries compose or env content.
    #[must_use]
    pub const fn changes_content(&self) -> bool {
        self.compose_content.is_some() || self.env_content.is_some()
    }
}

/// Body of `DELETE /environments/{env}/projects/{id}/destroy`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyProjectOptions {
    /// Remove project files from disk.
    pub remove_files: bool,
    /// Remove named volumes.
    pub remove_volumes: bool,
}

/// A compose project as returned by the API.
///
/// Create responses omit the compose and env contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Project directory on the host.
    #[serde(default, deserialize_with = "super::nullable")]
    pub path: String,
    /// Number of services in the compose file.
    #[serde(default, deserialize_with = "super::nullable")]
    pub service_count: i64,
    /// Number of running services.
    #[serde(default, deserialize_with = "super::nullable")]
    pub running_count: i64,
    /// Aggregate status.
    #[serde(default, deserialize_with = "super::nullable")]
    pub status: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub updated_at: String,
    /// `docker-compose.yml` content.
    #[serde(default)]
    pub compose_content: Option<String>,
    /// `.env` content.
    #[serde(default)]
    pub env_content: Option<String>,
}

/// Lifecycle actions available on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    /// `docker compose up`.
    Up,
    /// `docker compose down`.
    Down,
    /// Pull and recreate.
    Redeploy,
    /// Pull images.
    Pull,
}

impl ProjectAction {
    /// Path suffix for the action endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Redeploy => "redeploy",
            Self::Pull => "pull",
        }
    }

    /// The action that brings a project to the desired running state.
    #[must_use]
    pub const fn for_running(running: bool) -> Self {
        if running { Self::Up } else { Self::Down }
    }
}

impl std::fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn project_path(environment_id: &str, project_id: &str) -> String {
    format!(
        "environments/{}/projects/{}",
        segment(environment_id),
        segment(project_id)
    )
}

impl ArcaneClient {
    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_project(
        &self,
        environment_id: &str,
        request: &CreateProjectRequest,
    ) -> Result<Project> {
        self.post(
            &format!("environments/{}/projects", segment(environment_id)),
            request,
        )
        .await
    }

    /// Fetches a project including its compose and env contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_project(&self, environment_id: &str, project_id: &str) -> Result<Project> {
        self.get(&project_path(environment_id, project_id)).await
    }

    /// Updates a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_project(
        &self,
        environment_id: &str,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project> {
        self.put(&project_path(environment_id, project_id), request)
            .await
    }

    /// Destroys a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn destroy_project(
        &self,
        environment_id: &str,
        project_id: &str,
        options: DestroyProjectOptions,
    ) -> Result<()> {
        self.delete_with_body(
            &format!("{}/destroy", project_path(environment_id, project_id)),
            &options,
        )
        .await
    }

    /// Runs a lifecycle action (`up`, `down`, `redeploy`, `pull`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn project_action(
        &self,
        environment_id: &str,
        project_id: &str,
        action: ProjectAction,
    ) -> Result<()> {
        self.post_action(&format!(
            "{}/{action}",
            project_path(environment_id, project_id)
        ))
        .await
    }
}
