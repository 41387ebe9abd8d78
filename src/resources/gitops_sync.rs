//! `arcane_gitops_sync`: keeps a project in sync with a compose file in git.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone, split_import_id};
use crate::api::{ArcaneClient, CreateGitOpsSyncRequest, GitOpsSync, UpdateGitOpsSyncRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_gitops_sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitOpsSyncModel {
    /// Sync ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Display name.
    pub name: String,
    /// Source repository.
    pub repository_id: String,
    /// Branch to track.
    pub branch: String,
    /// Compose file path inside the repository.
    pub compose_path: String,
    /// Name of the project created by the sync.
    pub project_name: Option<String>,
    /// Sync automatically on an interval.
    pub auto_sync: Option<bool>,
    /// Interval in minutes.
    pub sync_interval: Option<i64>,
    /// Whether the sync is enabled.
    pub enabled: Option<bool>,
    /// Managed project, once synced.
    pub project_id: Option<String>,
    /// Last sync time.
    pub last_sync_at: Option<String>,
    /// Last synced commit.
    pub last_sync_commit: Option<String>,
    /// Last sync status.
    pub last_sync_status: Option<String>,
    /// Last sync error.
    pub last_sync_error: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl GitOpsSyncModel {
    fn refresh(&mut self, sync: GitOpsSync) {
        self.name = sync.name;
        self.repository_id = sync.repository_id;
        self.branch = sync.branch;
        self.compose_path = sync.compose_path;
        self.project_name = Some(sync.project_name);
        self.auto_sync = Some(sync.auto_sync);
        self.sync_interval = Some(sync.sync_interval);
        self.enabled = Some(sync.enabled);
        self.updated_at = Some(sync.updated_at);
        self.project_id = sync.project_id;
        self.last_sync_at = sync.last_sync_at;
        self.last_sync_commit = sync.last_sync_commit;
        self.last_sync_status = sync.last_sync_status;
        self.last_sync_error = sync.last_sync_error;
    }
}

/// Manages GitOps syncs.
#[derive(Debug, Clone)]
pub struct GitOpsSyncResource {
    client: ArcaneClient,
}

impl GitOpsSyncResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for GitOpsSyncResource {
    type Model = GitOpsSyncModel;

    fn type_name(&self) -> &'static str {
        "arcane_gitops_sync"
    }

    fn schema(&self) -> Schema {
        Schema::new("Syncs a compose project from a git repository.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace())
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::required("repository_id", AttributeType::String))
            .attribute(Attribute::required("branch", AttributeType::String))
            .attribute(
                Attribute::required("compose_path", AttributeType::String)
                    .describe("Path to the compose file inside the repository."),
            )
            .attribute(Attribute::optional_computed("project_name", AttributeType::String))
            .attribute(Attribute::optional_computed("auto_sync", AttributeType::Bool))
            .attribute(
                Attribute::optional_computed("sync_interval", AttributeType::Int64)
                    .describe("Sync interval in minutes."),
            )
            .attribute(Attribute::optional_computed("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("project_id", AttributeType::String))
            .attribute(Attribute::computed("last_sync_at", AttributeType::String))
            .attribute(Attribute::computed("last_sync_commit", AttributeType::String))
            .attribute(Attribute::computed("last_sync_status", AttributeType::String))
            .attribute(Attribute::computed("last_sync_error", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn create(&self, plan: GitOpsSyncModel) -> Result<GitOpsSyncModel> {
        let request = CreateGitOpsSyncRequest {
            name: plan.name.clone(),
            repository_id: plan.repository_id.clone(),
            branch: plan.branch.clone(),
            compose_path: plan.compose_path.clone(),
            project_name: plan.project_name.clone(),
            auto_sync: plan.auto_sync,
            sync_interval: plan.sync_interval,
            enabled: plan.enabled,
        };

        info!(
            "Creating gitops sync {} in environment {}",
            request.name, plan.environment_id
        );
        let sync = self
            .client
            .create_gitops_sync(&plan.environment_id, &request)
            .await
            .context("create gitops sync")?;

        let mut state = GitOpsSyncModel {
            id: sync.id.clone(),
            environment_id: if sync.environment_id.is_empty() {
                plan.environment_id
            } else {
                sync.environment_id.clone()
            },
            created_at: Some(sync.created_at.clone()),
            ..GitOpsSyncModel::default()
        };
        state.refresh(sync);
        Ok(state)
    }

    async fn read(&self, mut state: GitOpsSyncModel) -> Result<Option<GitOpsSyncModel>> {
        let Some(sync) = found(
            self.client
                .get_gitops_sync(&state.environment_id, &state.id)
                .await,
            "gitops sync",
            &state.id,
        )
        .context("read gitops sync")?
        else {
            return Ok(None);
        };
        state.refresh(sync);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: GitOpsSyncModel,
        mut state: GitOpsSyncModel,
    ) -> Result<GitOpsSyncModel> {
        let request = UpdateGitOpsSyncRequest {
            name: Some(plan.name),
            repository_id: Some(plan.repository_id),
            branch: Some(plan.branch),
            compose_path: Some(plan.compose_path),
            project_name: plan.project_name,
            auto_sync: plan.auto_sync,
            sync_interval: plan.sync_interval,
            enabled: plan.enabled,
        };

        info!("Updating gitops sync {}", state.id);
        let sync = self
            .client
            .update_gitops_sync(&state.environment_id, &state.id, &request)
            .await
            .context("update gitops sync")?;

        state.refresh(sync);
        Ok(state)
    }

    async fn delete(&self, state: GitOpsSyncModel) -> Result<()> {
        info!("Deleting gitops sync {}", state.id);
        gone(
            self.client
                .delete_gitops_sync(&state.environment_id, &state.id)
                .await,
            "gitops sync",
            &state.id,
        )
        .context("delete gitops sync")
    }

    async fn import(&self, id: &str) -> Result<GitOpsSyncModel> {
        let (environment_id, sync_id) = split_import_id(id, &[':'], "env_id:sync_id")?;
        Ok(GitOpsSyncModel {
            id: sync_id,
            environment_id,
            ..GitOpsSyncModel::default()
        })
    }
}
