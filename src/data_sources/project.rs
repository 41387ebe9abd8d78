//! Projects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_project_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPathData {
    /// Environment to search.
    pub environment_id: String,
    /// Project ID.
    pub id: String,
    /// Project name.
    pub name: Option<String>,
    /// Compose file content.
    pub compose_content: Option<String>,
    /// Env file content.
    pub env_content: Option<String>,
    /// Project directory on the host.
    pub path: Option<String>,
    /// Compose status.
    pub status: Option<String>,
    /// Number of services.
    pub service_count: Option<i64>,
    /// Number of running services.
    pub running_count: Option<i64>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

/// Looks up a project with its compose and env content.
#[derive(Debug, Clone)]
pub struct ProjectPathDataSource {
    client: ArcaneClient,
}

impl ProjectPathDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ProjectPathDataSource {
    type Model = ProjectPathData;

    fn type_name(&self) -> &'static str {
        "arcane_project_path"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a compose project.")
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("compose_content", AttributeType::String).sensitive())
            .attribute(Attribute::computed("env_content", AttributeType::String).sensitive())
            .attribute(Attribute::computed("path", AttributeType::String))
            .attribute(Attribute::computed("status", AttributeType::String))
            .attribute(Attribute::computed("service_count", AttributeType::Int64))
            .attribute(Attribute::computed("running_count", AttributeType::Int64))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: ProjectPathData) -> Result<ProjectPathData> {
        let project = lookup(
            self.client
                .get_project(&config.environment_id, &config.id)
                .await,
            "project",
        )?;
        Ok(ProjectPathData {
            environment_id: config.environment_id,
            id: project.id,
            name: Some(project.name),
            compose_content: project.compose_content,
            env_content: project.env_content,
            path: Some(project.path),
            status: Some(project.status),
            service_count: Some(project.service_count),
            running_count: Some(project.running_count),
            created_at: Some(project.created_at),
            updated_at: Some(project.updated_at),
        })
    }
}
