//! `arcane_project_path`: a compose project whose content lives in local files.
//!
//! The files are read at plan time so that edits show up as drift. In
//! content-hash mode only SHA-256 digests are stored in state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::project::{destroy, parse_project_import, refetch, set_running};
use super::{Resource, found, non_empty};
use crate::api::{ArcaneClient, CreateProjectRequest, Project, UpdateProjectRequest};
use crate::content::{ContentHasher, read_content};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_project_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPathModel {
    /// Project ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Project name.
    pub name: String,
    /// Path to `docker-compose.yml`.
    pub compose_path: String,
    /// Path to `.env`.
    pub env_path: Option<String>,
    /// Store digests instead of contents.
    pub content_hash_mode: Option<bool>,
    /// Compose content (content mode).
    pub compose_content: Option<String>,
    /// Env content (content mode).
    pub env_content: Option<String>,
    /// Compose digest (hash mode).
    pub compose_content_hash: Option<String>,
    /// Env digest (hash mode).
    pub env_content_hash: Option<String>,
    /// Desired running state; unset leaves the lifecycle alone.
    pub running: Option<bool>,
    /// Project directory on the host.
    pub path: Option<String>,
    /// Aggregate status.
    pub status: Option<String>,
    /// Number of services.
    pub service_count: Option<i64>,
    /// Number of running services.
    pub running_count: Option<i64>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Remove project files on destroy.
    pub remove_files: Option<bool>,
    /// Remove volumes on destroy.
    pub remove_volumes: Option<bool>,
}

impl ProjectPathModel {
    fn hash_mode(&self) -> bool {
        self.content_hash_mode.unwrap_or(false)
    }

    fn refresh(&mut self, project: Project) {
        self.name = project.name;
        self.path = Some(project.path);
        self.status = Some(project.status);
        self.service_count = Some(project.service_count);
        self.running_count = Some(project.running_count);
        self.created_at = Some(project.created_at);
        self.updated_at = Some(project.updated_at);
    }

    /// Stores the sent content as digests or as text depending on the mode.
    /// Whatever the other mode stored is cleared.
    fn store_content(&mut self, compose: &str, env: Option<&str>) {
        if self.hash_mode() {
            let hasher = ContentHasher::new();
            self.compose_content_hash = Some(hasher.hash(compose));
            self.env_content_hash = env.map(|e| hasher.hash(e));
            self.compose_content = None;
            self.env_content = None;
        } else {
            self.compose_content = Some(compose.to_string());
            self.env_content = env.map(str::to_string);
            self.compose_content_hash = None;
            self.env_content_hash = None;
        }
    }
}

/// Manages compose projects backed by local files.
#[derive(Debug, Clone)]
pub struct ProjectPathResource {
    client: ArcaneClient,
}

impl ProjectPathResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ProjectPathResource {
    type Model = ProjectPathModel;

    fn type_name(&self) -> &'static str {
        "arcane_project_path"
    }

    fn schema(&self) -> Schema {
        Schema::new("A compose project read from local files.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(
                Attribute::required("compose_path", AttributeType::String)
                    .describe("Filesystem path to docker-compose.yml."),
            )
            .attribute(
                Attribute::optional("env_path", AttributeType::String)
                    .describe("Filesystem path to .env."),
            )
            .attribute(
                Attribute::optional("content_hash_mode", AttributeType::Bool)
                    .describe("Store only content hashes in state instead of file contents."),
            )
            .attribute(Attribute::computed("compose_content", AttributeType::String).sensitive())
            .attribute(Attribute::computed("env_content", AttributeType::String).sensitive())
            .attribute(
                Attribute::computed("compose_content_hash", AttributeType::String).sensitive(),
            )
            .attribute(Attribute::computed("env_content_hash", AttributeType::String).sensitive())
            .attribute(Attribute::optional("running", AttributeType::Bool))
            .attribute(Attribute::computed("path", AttributeType::String))
            .attribute(Attribute::computed("status", AttributeType::String))
            .attribute(Attribute::computed("service_count", AttributeType::Int64))
            .attribute(Attribute::computed("running_count", AttributeType::Int64))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
            .attribute(Attribute::optional("remove_files", AttributeType::Bool))
            .attribute(Attribute::optional("remove_volumes", AttributeType::Bool))
    }

    async fn modify_plan(&self, mut plan: ProjectPathModel) -> Result<ProjectPathModel> {
        let hasher = ContentHasher::new();
        let compose = read_content("compose", &plan.compose_path)?;
        if plan.hash_mode() {
            let digest = hasher.hash(&compose);
            let unchanged = plan
                .compose_content_hash
                .as_deref()
                .is_some_and(|old| ContentHasher::hashes_match(old, &digest));
            if !unchanged {
                debug!("Compose file {} changed", plan.compose_path);
            }
            plan.compose_content_hash = Some(digest);
        } else {
            plan.compose_content = Some(compose);
        }

        if let Some(env_path) = &plan.env_path {
            let env = read_content("env", env_path)?;
            if plan.hash_mode() {
                plan.env_content_hash = Some(hasher.hash(&env));
            } else {
                plan.env_content = Some(env);
            }
        }
        Ok(plan)
    }

    async fn create(&self, plan: ProjectPathModel) -> Result<ProjectPathModel> {
        let compose = match non_empty(plan.compose_content.as_ref()) {
            Some(compose) => compose,
            None => read_content("compose", &plan.compose_path)?,
        };
        let env = match &plan.env_path {
            Some(env_path) => Some(read_content("env", env_path)?),
            None => non_empty(plan.env_content.as_ref()),
        };

        let environment_id = plan.environment_id.clone();
        let request = CreateProjectRequest {
            compose_content: compose.clone(),
            env_content: env.clone(),
            name: plan.name.clone(),
        };

        info!(
            "Creating project {} from {} in environment {environment_id}",
            request.name, plan.compose_path
        );
        let mut project = self
            .client
            .create_project(&environment_id, &request)
            .await
            .context("create project")?;

        if let Some(running) = plan.running {
            set_running(&self.client, &environment_id, &project.id, running).await?;
            if let Some(details) = refetch(&self.client, &environment_id, &project.id).await {
                project.status = details.status;
                project.running_count = details.running_count;
                project.service_count = details.service_count;
                project.updated_at = details.updated_at;
            }
        }

        let mut state = plan;
        state.id.clone_from(&project.id);
        state.refresh(project);
        state.store_content(&compose, env.as_deref());
        Ok(state)
    }

    async fn read(&self, mut state: ProjectPathModel) -> Result<Option<ProjectPathModel>> {
        let Some(project) = found(
            self.client
                .get_project(&state.environment_id, &state.id)
                .await,
            "project",
            &state.id,
        )
        .context("read project")?
        else {
            return Ok(None);
        };
        state.refresh(project);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: ProjectPathModel,
        mut state: ProjectPathModel,
    ) -> Result<ProjectPathModel> {
        let environment_id = state.environment_id.clone();
        let project_id = state.id.clone();

        let compose = match non_empty(plan.compose_content.as_ref()) {
            Some(compose) if !plan.hash_mode() => compose,
            _ => read_content("compose", &plan.compose_path)?,
        };
        let env = match (non_empty(plan.env_content.as_ref()), &plan.env_path) {
            (Some(env), _) => Some(env),
            (None, Some(env_path)) => Some(read_content("env", env_path)?),
            (None, None) => None,
        };

        let request = UpdateProjectRequest {
            compose_content: Some(compose.clone()).filter(|c| !c.is_empty()),
            env_content: env.clone(),
            name: Some(plan.name.clone()),
        };

        info!("Updating project {project_id} from {}", plan.compose_path);
        let project = self
            .client
            .update_project(&environment_id, &project_id, &request)
            .await
            .context("update project")?;

        state.compose_path.clone_from(&plan.compose_path);
        state.env_path.clone_from(&plan.env_path);
        state.content_hash_mode = plan.content_hash_mode;
        state.remove_files = plan.remove_files;
        state.remove_volumes = plan.remove_volumes;
        state.refresh(project);
        state.store_content(&compose, env.as_deref());

        if let Some(desired) = plan.running {
            if desired != state.running.unwrap_or(false) {
                set_running(&self.client, &environment_id, &project_id, desired).await?;
                if let Some(details) = refetch(&self.client, &environment_id, &project_id).await
                {
                    state.status = Some(details.status);
                }
                state.running = Some(desired);
            }
        }
        Ok(state)
    }

    async fn delete(&self, state: ProjectPathModel) -> Result<()> {
        destroy(
            &self.client,
            &state.environment_id,
            &state.id,
            state.remove_files,
            state.remove_volumes,
        )
        .await
    }

    async fn import(&self, id: &str) -> Result<ProjectPathModel> {
        let (environment_id, project_id) = parse_project_import(id)?;
        Ok(ProjectPathModel {
            id: project_id,
            environment_id,
            ..ProjectPathModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPOSE: &str = "services:\n  web:\n    image: nginx\n";
    const ENV: &str = "PORT=8080\n";

    async fn setup() -> (MockServer, ProjectPathResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, ProjectPathResource::new(client))
    }

    fn write_files(dir: &TempDir) -> (String, String) {
        let compose = dir.path().join("docker-compose.yml");
        let env = dir.path().join(".env");
        fs::write(&compose, COMPOSE).expect("write compose");
        fs::write(&env, ENV).expect("write env");
        (
            compose.to_string_lossy().to_string(),
            env.to_string_lossy().to_string(),
        )
    }

    fn created() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "id": "p1",
                "name": "web",
                "path": "/data/projects/web",
                "status": "stopped",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn test_modify_plan_loads_contents() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, env_path) = write_files(&dir);
        let (_server, resource) = setup().await;

        let plan = ProjectPathModel {
            compose_path,
            env_path: Some(env_path),
            ..ProjectPathModel::default()
        };
        let planned = resource.modify_plan(plan).await.expect("plan");
        assert_eq!(planned.compose_content.as_deref(), Some(COMPOSE));
        assert_eq!(planned.env_content.as_deref(), Some(ENV));
        assert_eq!(planned.compose_content_hash, None);
    }

    #[tokio::test]
    async fn test_modify_plan_hash_mode() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, _) = write_files(&dir);
        let (_server, resource) = setup().await;

        let plan = ProjectPathModel {
            compose_path,
            content_hash_mode: Some(true),
            ..ProjectPathModel::default()
        };
        let planned = resource.modify_plan(plan).await.expect("plan");
        assert_eq!(planned.compose_content, None);
        assert_eq!(
            planned.compose_content_hash,
            Some(ContentHasher::new().hash(COMPOSE))
        );
    }

    #[tokio::test]
    async fn test_missing_compose_file_fails_plan() {
        let (_server, resource) = setup().await;
        let plan = ProjectPathModel {
            compose_path: "/nonexistent/docker-compose.yml".into(),
            ..ProjectPathModel::default()
        };
        let err = resource.modify_plan(plan).await.expect_err("missing file");
        assert!(err.to_string().contains("read compose file failed"));
    }

    #[tokio::test]
    async fn test_create_hash_mode_stores_digests_only() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, env_path) = write_files(&dir);
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects"))
            .and(body_json(json!({
                "composeContent": COMPOSE,
                "envContent": ENV,
                "name": "web"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(created()))
            .expect(1)
            .mount(&server)
            .await;

        let plan = ProjectPathModel {
            environment_id: "0".into(),
            name: "web".into(),
            compose_path,
            env_path: Some(env_path),
            content_hash_mode: Some(true),
            ..ProjectPathModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        let hasher = ContentHasher::new();
        assert_eq!(state.id, "p1");
        assert_eq!(state.compose_content, None);
        assert_eq!(state.env_content, None);
        assert_eq!(state.compose_content_hash, Some(hasher.hash(COMPOSE)));
        assert_eq!(state.env_content_hash, Some(hasher.hash(ENV)));
    }

    #[tokio::test]
    async fn test_read_keeps_local_content() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "p1",
                    "name": "web",
                    "status": "running",
                    "composeContent": "something else",
                    "updatedAt": "2024-02-01T00:00:00Z"
                }
            })))
            .mount(&server)
            .await;

        let state = ProjectPathModel {
            id: "p1".into(),
            environment_id: "0".into(),
            compose_content: Some(COMPOSE.into()),
            ..ProjectPathModel::default()
        };
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.compose_content.as_deref(), Some(COMPOSE));
        assert_eq!(refreshed.updated_at.as_deref(), Some("2024-02-01T00:00:00Z"));
        assert_eq!(refreshed.status.as_deref(), Some("running"));
    }

    fn existing(compose_path: String, env_path: Option<String>) -> ProjectPathModel {
        ProjectPathModel {
            id: "p1".into(),
            environment_id: "0".into(),
            name: "web".into(),
            compose_path,
            env_path,
            compose_content: Some("services: {}\n".into()),
            running: Some(false),
            ..ProjectPathModel::default()
        }
    }

    async fn mount_get(server: &MockServer, status: &str) {
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "p1", "name": "web", "status": status}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_update_hash_mode_rereads_compose_file() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, env_path) = write_files(&dir);
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .and(body_json(json!({
                "composeContent": COMPOSE,
                "envContent": ENV,
                "name": "web"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(created()))
            .expect(1)
            .mount(&server)
            .await;

        let state = existing(compose_path.clone(), Some(env_path.clone()));
        let plan = ProjectPathModel {
            content_hash_mode: Some(true),
            compose_content: Some("stale compose".into()),
            ..existing(compose_path, Some(env_path))
        };
        let updated = resource.update(plan, state).await.expect("update");
        let hasher = ContentHasher::new();
        assert_eq!(updated.content_hash_mode, Some(true));
        assert_eq!(updated.compose_content, None);
        assert_eq!(updated.env_content, None);
        assert_eq!(updated.compose_content_hash, Some(hasher.hash(COMPOSE)));
        assert_eq!(updated.env_content_hash, Some(hasher.hash(ENV)));
    }

    #[tokio::test]
    async fn test_update_content_mode_prefers_planned_env() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, env_path) = write_files(&dir);
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .and(body_json(json!({
                "composeContent": COMPOSE,
                "envContent": "PORT=9090\n",
                "name": "web"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(created()))
            .expect(1)
            .mount(&server)
            .await;

        let hasher = ContentHasher::new();
        let state = ProjectPathModel {
            content_hash_mode: Some(true),
            compose_content: None,
            compose_content_hash: Some(hasher.hash("services: {}\n")),
            env_content_hash: Some(hasher.hash(ENV)),
            ..existing(compose_path.clone(), Some(env_path.clone()))
        };
        let plan = ProjectPathModel {
            compose_content: Some(COMPOSE.into()),
            env_content: Some("PORT=9090\n".into()),
            ..existing(compose_path, Some(env_path))
        };
        let updated = resource.update(plan, state).await.expect("update");
        assert_eq!(updated.content_hash_mode, None);
        assert_eq!(updated.compose_content.as_deref(), Some(COMPOSE));
        assert_eq!(updated.env_content.as_deref(), Some("PORT=9090\n"));
        assert_eq!(updated.compose_content_hash, None);
        assert_eq!(updated.env_content_hash, None);
    }

    #[tokio::test]
    async fn test_update_starts_project_when_running_changes() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, _) = write_files(&dir);
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(created()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/up"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_get(&server, "running").await;

        let plan = ProjectPathModel {
            running: Some(true),
            ..existing(compose_path.clone(), None)
        };
        let updated = resource
            .update(plan, existing(compose_path, None))
            .await
            .expect("update");
        assert_eq!(updated.running, Some(true));
        assert_eq!(updated.status.as_deref(), Some("running"));
        assert_eq!(updated.env_content, None);
    }

    #[tokio::test]
    async fn test_update_leaves_lifecycle_when_running_unchanged() {
        let dir = TempDir::new().expect("temp dir");
        let (compose_path, _) = write_files(&dir);
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(created()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let updated = resource
            .update(
                existing(compose_path.clone(), None),
                existing(compose_path, None),
            )
            .await
            .expect("update");
        assert_eq!(updated.running, Some(false));
        assert_eq!(updated.status.as_deref(), Some("stopped"));
    }

    #[tokio::test]
    async fn test_delete_sends_destroy_options() {
        let (server, resource) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/environments/0/projects/p1/destroy"))
            .and(body_json(json!({"removeFiles": false, "removeVolumes": true})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let state = ProjectPathModel {
            remove_volumes: Some(true),
            ..existing("docker-compose.yml".into(), None)
        };
        tokio_test::assert_ok!(resource.delete(state).await);
    }

    #[tokio::test]
    async fn test_import_parses_environment_and_project() {
        let (_server, resource) = setup().await;
        let model = resource.import("0:p1").await.expect("import");
        assert_eq!((model.environment_id.as_str(), model.id.as_str()), ("0", "p1"));
        assert_eq!(model.compose_path, "");
        tokio_test::assert_err!(resource.import("p1").await);
    }
}
