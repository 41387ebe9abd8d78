//! Git repositories and GitOps syncs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::content::parse_env;
use crate::error::Result;
use crate::resources::{auth_type_from_api, non_empty, string_or_null};
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_git_repository`. Credentials are never exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitRepositoryData {
    /// Lookup key.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Clone URL.
    pub url: Option<String>,
    /// `none`, `token` or `ssh`.
    pub auth_type: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the repository is enabled.
    pub enabled: Option<bool>,
    /// Username for token auth.
    pub username: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

/// Looks up a git repository.
#[derive(Debug, Clone)]
pub struct GitRepositoryDataSource {
    client: ArcaneClient,
}

impl GitRepositoryDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for GitRepositoryDataSource {
    type Model = GitRepositoryData;

    fn type_name(&self) -> &'static str {
        "arcane_git_repository"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a git repository.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("url", AttributeType::String))
            .attribute(Attribute::computed("auth_type", AttributeType::String))
            .attribute(Attribute::computed("description", AttributeType::String))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("username", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: GitRepositoryData) -> Result<GitRepositoryData> {
        let repo = lookup(
            self.client.get_git_repository(&config.id).await,
            "git repository",
        )?;
        Ok(GitRepositoryData {
            auth_type: Some(auth_type_from_api(&repo.auth_type)),
            id: repo.id,
            name: Some(repo.name),
            url: Some(repo.url),
            description: string_or_null(repo.description),
            enabled: Some(repo.enabled),
            username: string_or_null(repo.username),
            created_at: Some(repo.created_at),
            updated_at: Some(repo.updated_at),
        })
    }
}

/// Attributes of `data.arcane_gitops_sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitOpsSyncData {
    /// Environment to search.
    pub environment_id: String,
    /// Sync ID.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Source repository.
    pub repository_id: Option<String>,
    /// Tracked branch.
    pub branch: Option<String>,
    /// Compose file path inside the repository.
    pub compose_path: Option<String>,
    /// Project name; null when unset.
    pub project_name: Option<String>,
    /// Automatic sync flag.
    pub auto_sync: Option<bool>,
    /// Interval in minutes; null when not positive.
    pub sync_interval: Option<i64>,
    /// Whether the sync is enabled.
    pub enabled: Option<bool>,
    /// Variables of the synced project's env file.
    pub environment_variables: Option<BTreeMap<String, String>>,
    /// Managed project.
    pub project_id: Option<String>,
    /// Last sync time.
    pub last_sync_at: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

/// Looks up a GitOps sync and the env variables of its project.
#[derive(Debug, Clone)]
pub struct GitOpsSyncDataSource {
    client: ArcaneClient,
}

impl GitOpsSyncDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }

    /// Env variables of the project, or `None` if anything along the way fails.
    async fn project_variables(
        &self,
        environment_id: &str,
        project_id: &str,
    ) -> Option<BTreeMap<String, String>> {
        match self.client.get_project(environment_id, project_id).await {
            Ok(project) => project.env_content.as_deref().and_then(parse_env),
            Err(e) => {
                debug!("Could not load project {project_id} for env variables: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl DataSource for GitOpsSyncDataSource {
    type Model = GitOpsSyncData;

    fn type_name(&self) -> &'static str {
        "arcane_gitops_sync"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a GitOps sync.")
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("repository_id", AttributeType::String))
            .attribute(Attribute::computed("branch", AttributeType::String))
            .attribute(Attribute::computed("compose_path", AttributeType::String))
            .attribute(Attribute::computed("project_name", AttributeType::String))
            .attribute(Attribute::computed("auto_sync", AttributeType::Bool))
            .attribute(Attribute::computed("sync_interval", AttributeType::Int64))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
            .attribute(
                Attribute::computed("environment_variables", AttributeType::StringMap)
                    .describe("Variables parsed from the synced project's .env file."),
            )
            .attribute(Attribute::computed("project_id", AttributeType::String))
            .attribute(Attribute::computed("last_sync_at", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: GitOpsSyncData) -> Result<GitOpsSyncData> {
        let sync = lookup(
            self.client
                .get_gitops_sync(&config.environment_id, &config.id)
                .await,
            "gitops sync",
        )?;

        let project_id = non_empty(sync.project_id.as_ref());
        let environment_variables = match &project_id {
            Some(project_id) => {
                self.project_variables(&config.environment_id, project_id)
                    .await
            }
            None => None,
        };

        Ok(GitOpsSyncData {
            environment_id: config.environment_id,
            id: sync.id,
            name: Some(sync.name),
            repository_id: Some(sync.repository_id),
            branch: Some(sync.branch),
            compose_path: Some(sync.compose_path),
            project_name: string_or_null(sync.project_name),
            auto_sync: Some(sync.auto_sync),
            sync_interval: (sync.sync_interval > 0).then_some(sync.sync_interval),
            enabled: Some(sync.enabled),
            environment_variables,
            project_id,
            last_sync_at: non_empty(sync.last_sync_at.as_ref()),
            created_at: Some(sync.created_at),
            updated_at: Some(sync.updated_at),
        })
    }
}
