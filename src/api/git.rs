//! Git repository and GitOps sync endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /customize/git-repositories`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGitRepositoryRequest {
    /// Repository name.
    pub name: String,
    /// Clone URL.
    pub url: String,
    /// API auth type (`none`, `http`, `ssh`).
    pub auth_type: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the repository is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Private SSH key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    /// HTTP token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// HTTP user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Body of `PUT /customize/git-repositories/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGitRepositoryRequest {
    /// Repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Clone URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// API auth type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the repository is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Private SSH key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    /// HTTP token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// HTTP user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A git repository definition. Secrets are never returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    /// Repository ID.
    pub id: String,
    /// Repository name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Clone URL.
    #[serde(default, deserialize_with = "super::nullable")]
    pub url: String,
    /// API auth type.
    #[serde(default, deserialize_with = "super::nullable")]
    pub auth_type: String,
    /// Whether the repository is enabled.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
    /// HTTP user.
    #[serde(default, deserialize_with = "super::nullable")]
    pub username: String,
    /// Description.
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub updated_at: String,
}

/// Body of `POST /environments/{env}/gitops-syncs`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGitOpsSyncRequest {
    /// Sync name.
    pub name: String,
    /// Source repository ID.
    pub repository_id: String,
    /// Branch to follow.
    pub branch: String,
    /// Compose file path inside the repository.
    pub compose_path: String,
    /// Target project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Sync automatically on an interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<bool>,
    /// Interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval: Option<i64>,
    /// Whether the sync is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Body of `PUT /environments/{env}/gitops-syncs/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGitOpsSyncRequest {
    /// Sync name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Source repository ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<String>,
    /// Branch to follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Compose file path inside the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_path: Option<String>,
    /// Target project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Sync automatically on an interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<bool>,
    /// Interval in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_interval: Option<i64>,
    /// Whether the sync is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// A GitOps sync job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitOpsSync {
    /// Sync ID.
    pub id: String,
    /// Sync name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Owning environment.
    #[serde(default, deserialize_with = "super::nullable")]
    pub environment_id: String,
    /// Source repository ID.
    #[serde(default, deserialize_with = "super::nullable")]
    pub repository_id: String,
    /// Branch.
    #[serde(default, deserialize_with = "super::nullable")]
    pub branch: String,
    /// Compose file path.
    #[serde(default, deserialize_with = "super::nullable")]
    pub compose_path: String,
    /// Target project name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub project_name: String,
    /// Project created by the sync.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Auto sync flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub auto_sync: bool,
    /// Interval in seconds.
    #[serde(default, deserialize_with = "super::nullable")]
    pub sync_interval: i64,
    /// Enabled flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
    /// Last sync time.
    #[serde(default)]
    pub last_sync_at: Option<String>,
    /// Last synced commit.
    #[serde(default)]
    pub last_sync_commit: Option<String>,
    /// Last sync status.
    #[serde(default)]
    pub last_sync_status: Option<String>,
    /// Last sync error.
    #[serde(default)]
    pub last_sync_error: Option<String>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub updated_at: String,
}

fn gitops_path(environment_id: &str, id: &str) -> String {
    format!(
        "environments/{}/gitops-syncs/{}",
        segment(environment_id),
        segment(id)
    )
}

impl ArcaneClient {
    /// Creates a git repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_git_repository(
        &self,
        request: &CreateGitRepositoryRequest,
    ) -> Result<GitRepository> {
        self.post("customize/git-repositories", request).await
    }

    /// Fetches a git repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_git_repository(&self, id: &str) -> Result<GitRepository> {
        self.get(&format!("customize/git-repositories/{}", segment(id)))
            .await
    }

    /// Updates a git repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_git_repository(
        &self,
        id: &str,
        request: &UpdateGitRepositoryRequest,
    ) -> Result<GitRepository> {
        self.put(
            &format!("customize/git-repositories/{}", segment(id)),
            request,
        )
        .await
    }

    /// Deletes a git repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_git_repository(&self, id: &str) -> Result<()> {
        self.delete(&format!("customize/git-repositories/{}", segment(id)))
            .await
    }

    /// Creates a GitOps sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_gitops_sync(
        &self,
        environment_id: &str,
        request: &CreateGitOpsSyncRequest,
    ) -> Result<GitOpsSync> {
        self.post(
            &format!("environments/{}/gitops-syncs", segment(environment_id)),
            request,
        )
        .await
    }

    /// Fetches a GitOps sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_gitops_sync(&self, environment_id: &str, id: &str) -> Result<GitOpsSync> {
        self.get(&gitops_path(environment_id, id)).await
    }

    /// Updates a GitOps sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_gitops_sync(
        &self,
        environment_id: &str,
        id: &str,
        request: &UpdateGitOpsSyncRequest,
    ) -> Result<GitOpsSync> {
        self.put(&gitops_path(environment_id, id), request).await
    }

    /// Deletes a GitOps sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_gitops_sync(&self, environment_id: &str, id: &str) -> Result<()> {
        self.delete(&gitops_path(environment_id, id)).await
    }
}
