//! `arcane_git_repository`: a git remote used by GitOps syncs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone, non_empty, string_or_null};
use crate::api::{
    ArcaneClient, CreateGitRepositoryRequest, GitRepository, UpdateGitRepositoryRequest,
};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// Maps the configured auth type to the API value (`token` is `http`).
pub(crate) fn auth_type_to_api(auth_type: &str) -> String {
    match auth_type {
        "token" => "http".to_string(),
        other => other.to_string(),
    }
}

/// Maps the API auth type back to the configured value.
pub(crate) fn auth_type_from_api(auth_type: &str) -> String {
    match auth_type {
        "http" => "token".to_string(),
        other => other.to_string(),
    }
}

/// State of an `arcane_git_repository`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitRepositoryModel {
    /// Repository ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Clone URL.
    pub url: String,
    /// `none`, `token` or `ssh`.
    pub auth_type: String,
    /// Description.
    pub description: Option<String>,
    /// Whether the repository is enabled.
    pub enabled: Option<bool>,
    /// Private key for `ssh` auth.
    pub ssh_key: Option<String>,
    /// Access token for `token` auth.
    pub token: Option<String>,
    /// Username for `token` auth.
    pub username: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl GitRepositoryModel {
    /// Applies a response. Empty description and username keep `fallback`.
    fn refresh(&mut self, repo: GitRepository, fallback: &Self) {
        self.name = repo.name;
        self.url = repo.url;
        self.auth_type = auth_type_from_api(&repo.auth_type);
        self.enabled = Some(repo.enabled);
        self.description = string_or_null(repo.description).or_else(|| fallback.description.clone());
        self.username = string_or_null(repo.username).or_else(|| fallback.username.clone());
    }
}

/// Manages git repositories.
#[derive(Debug, Clone)]
pub struct GitRepositoryResource {
    client: ArcaneClient,
}

impl GitRepositoryResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for GitRepositoryResource {
    type Model = GitRepositoryModel;

    fn type_name(&self) -> &'static str {
        "arcane_git_repository"
    }

    fn schema(&self) -> Schema {
        Schema::new("A git repository used as a GitOps source.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::required("url", AttributeType::String))
            .attribute(
                Attribute::required("auth_type", AttributeType::String)
                    .describe("Authentication type: none, token or ssh."),
            )
            .attribute(Attribute::optional("description", AttributeType::String))
            .attribute(Attribute::optional("enabled", AttributeType::Bool))
            .attribute(Attribute::optional("ssh_key", AttributeType::String).sensitive())
            .attribute(Attribute::optional("token", AttributeType::String).sensitive())
            .attribute(Attribute::optional("username", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn create(&self, plan: GitRepositoryModel) -> Result<GitRepositoryModel> {
        let request = CreateGitRepositoryRequest {
            name: plan.name.clone(),
            url: plan.url.clone(),
            auth_type: auth_type_to_api(&plan.auth_type),
            description: plan.description.clone(),
            enabled: plan.enabled,
            ssh_key: non_empty(plan.ssh_key.as_ref()),
            token: non_empty(plan.token.as_ref()),
            username: non_empty(plan.username.as_ref()),
        };

        info!("Creating git repository {}", request.name);
        let repo = self
            .client
            .create_git_repository(&request)
            .await
            .context("create git repository")?;

        let mut state = GitRepositoryModel {
            id: repo.id.clone(),
            created_at: Some(repo.created_at.clone()),
            updated_at: Some(repo.updated_at.clone()),
            ssh_key: plan.ssh_key.clone(),
            token: plan.token.clone(),
            ..GitRepositoryModel::default()
        };
        state.refresh(repo, &plan);
        Ok(state)
    }

    async fn read(&self, mut state: GitRepositoryModel) -> Result<Option<GitRepositoryModel>> {
        let Some(repo) = found(
            self.client.get_git_repository(&state.id).await,
            "git repository",
            &state.id,
        )
        .context("read git repository")?
        else {
            return Ok(None);
        };
        let previous = state.clone();
        state.refresh(repo, &previous);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: GitRepositoryModel,
        mut state: GitRepositoryModel,
    ) -> Result<GitRepositoryModel> {
        let request = UpdateGitRepositoryRequest {
            name: Some(plan.name.clone()),
            url: Some(plan.url.clone()),
            auth_type: Some(auth_type_to_api(&plan.auth_type)),
            description: plan.description.clone(),
            enabled: plan.enabled,
            ssh_key: non_empty(plan.ssh_key.as_ref()),
            token: non_empty(plan.token.as_ref()),
            username: non_empty(plan.username.as_ref()),
        };

        info!("Updating git repository {}", state.id);
        let repo = self
            .client
            .update_git_repository(&state.id, &request)
            .await
            .context("update git repository")?;

        state.refresh(repo, &plan);
        state.ssh_key = plan.ssh_key;
        state.token = plan.token;
        Ok(state)
    }

    async fn delete(&self, state: GitRepositoryModel) -> Result<()> {
        info!("Deleting git repository {}", state.id);
        gone(
            self.client.delete_git_repository(&state.id).await,
            "git repository",
            &state.id,
        )
        .context("delete git repository")
    }

    async fn import(&self, id: &str) -> Result<GitRepositoryModel> {
        Ok(GitRepositoryModel {
            id: id.to_string(),
            ..GitRepositoryModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, GitRepositoryResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, GitRepositoryResource::new(client))
    }

    fn repo_json(username: &str) -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "id": "g1",
                "name": "infra",
                "url": "https://git.example.com/infra.git",
                "authType": "http",
                "enabled": true,
                "username": username,
                "description": "",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }
        })
    }

    #[test]
    fn test_auth_type_mapping() {
        assert_eq!(auth_type_to_api("token"), "http");
        assert_eq!(auth_type_to_api("ssh"), "ssh");
        assert_eq!(auth_type_from_api("http"), "token");
        assert_eq!(auth_type_from_api("none"), "none");
    }

    #[tokio::test]
    async fn test_create_maps_auth_and_keeps_secrets() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/customize/git-repositories"))
            .and(body_json(json!({
                "name": "infra",
                "url": "https://git.example.com/infra.git",
                "authType": "http",
                "description": "deploy repo",
                "token": "glpat-123",
                "username": "ci"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(repo_json("")))
            .expect(1)
            .mount(&server)
            .await;

        let plan = GitRepositoryModel {
            name: "infra".into(),
            url: "https://git.example.com/infra.git".into(),
            auth_type: "token".into(),
            description: Some("deploy repo".into()),
            token: Some("glpat-123".into()),
            username: Some("ci".into()),
            ssh_key: Some(String::new()),
            ..GitRepositoryModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.auth_type, "token");
        assert_eq!(state.token.as_deref(), Some("glpat-123"));
        assert_eq!(state.description.as_deref(), Some("deploy repo"));
        assert_eq!(state.username.as_deref(), Some("ci"));
    }

    #[tokio::test]
    async fn test_read_prefers_api_username() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/customize/git-repositories/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("deploy-bot")))
            .mount(&server)
            .await;

        let state = GitRepositoryModel {
            id: "g1".into(),
            username: Some("ci".into()),
            token: Some("glpat-123".into()),
            ..GitRepositoryModel::default()
        };
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.username.as_deref(), Some("deploy-bot"));
        assert_eq!(refreshed.token.as_deref(), Some("glpat-123"));
        assert_eq!(refreshed.description, None);
    }
}
