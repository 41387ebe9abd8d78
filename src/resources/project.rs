//! `arcane_project`: a compose project with inline content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Resource, found, gone, split_import_id};
use crate::api::{
    ArcaneClient, CreateProjectRequest, DestroyProjectOptions, Project, ProjectAction,
    UpdateProjectRequest,
};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_project`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectModel {
    /// Project ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Project name.
    pub name: String,
    /// `docker-compose.yml` content.
    pub compose_content: String,
    /// `.env` content.
    pub env_content: Option<String>,
    /// Desired running state; unset leaves the lifecycle alone.
    pub running: Option<bool>,
    /// Redeploy after content changes (default true).
    pub redeploy_on_update: Option<bool>,
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

impl ProjectModel {
    fn refresh(&mut self, project: &Project) {
        self.name.clone_from(&project.name);
        self.path = Some(project.path.clone());
        self.status = Some(project.status.clone());
        self.service_count = Some(project.service_count);
        self.running_count = Some(project.running_count);
        self.created_at = Some(project.created_at.clone());
        if let Some(compose) = &project.compose_content {
            self.compose_content.clone_from(compose);
        }
        if let Some(env) = &project.env_content {
            self.env_content = Some(env.clone());
        }
    }
}

/// Runs `up` or `down` to reach the desired running state.
pub(super) async fn set_running(
    client: &ArcaneClient,
    environment_id: &str,
    project_id: &str,
    running: bool,
) -> Result<()> {
    let action = ProjectAction::for_running(running);
    info!("Project {project_id}: {action}");
    client
        .project_action(environment_id, project_id, action)
        .await
        .context(&format!("project {action}"))
}

/// Re-reads a project after a lifecycle action. Failures keep the old view.
pub(super) async fn refetch(
    client: &ArcaneClient,
    environment_id: &str,
    project_id: &str,
) -> Option<Project> {
    match client.get_project(environment_id, project_id).await {
        Ok(project) => Some(project),
        Err(e) => {
            debug!("Refresh of project {project_id} after lifecycle action failed: {e}");
            None
        }
    }
}

/// Parses an `env_id:project_id` import ID.
pub(super) fn parse_project_import(id: &str) -> Result<(String, String)> {
    split_import_id(id, &[':'], "env_id:project_id")
}

/// Destroys a project, treating 404 as success.
pub(super) async fn destroy(
    client: &ArcaneClient,
    environment_id: &str,
    project_id: &str,
    remove_files: Option<bool>,
    remove_volumes: Option<bool>,
) -> Result<()> {
    let options = DestroyProjectOptions {
        remove_files: remove_files.unwrap_or(false),
        remove_volumes: remove_volumes.unwrap_or(false),
    };
    info!("Destroying project {project_id}");
    gone(
        client
            .destroy_project(environment_id, project_id, options)
            .await,
        "project",
        project_id,
    )
    .context("destroy project")
}

/// Manages compose projects whose content is given inline.
#[derive(Debug, Clone)]
pub struct ProjectResource {
    client: ArcaneClient,
}

impl ProjectResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ProjectResource {
    type Model = ProjectModel;

    fn type_name(&self) -> &'static str {
        "arcane_project"
    }

    fn schema(&self) -> Schema {
        Schema::new("A compose project deployed to an environment.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(
                Attribute::required("compose_content", AttributeType::String)
                    .describe("docker-compose.yml content."),
            )
            .attribute(
                Attribute::optional("env_content", AttributeType::String)
                    .describe(".env content."),
            )
            .attribute(Attribute::optional("running", AttributeType::Bool).describe(
                "true runs compose up, false compose down; unset leaves the lifecycle alone.",
            ))
            .attribute(
                Attribute::optional_computed("redeploy_on_update", AttributeType::Bool)
                    .default_value(true)
                    .describe("Redeploy after compose or env content changes."),
            )
            .attribute(Attribute::computed("path", AttributeType::String))
            .attribute(Attribute::computed("status", AttributeType::String))
            .attribute(Attribute::computed("service_count", AttributeType::Int64))
            .attribute(Attribute::computed("running_count", AttributeType::Int64))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
            .attribute(
                Attribute::optional("remove_files", AttributeType::Bool)
                    .describe("Remove files on destroy."),
            )
            .attribute(
                Attribute::optional("remove_volumes", AttributeType::Bool)
                    .describe("Remove volumes on destroy."),
            )
    }

    async fn create(&self, plan: ProjectModel) -> Result<ProjectModel> {
        let environment_id = plan.environment_id.clone();
        let request = CreateProjectRequest {
            compose_content: plan.compose_content.clone(),
            env_content: plan.env_content.clone(),
            name: plan.name.clone(),
        };

        info!("Creating project {} in environment {environment_id}", request.name);
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

        Ok(ProjectModel {
            id: project.id,
            name: project.name,
            path: Some(project.path),
            status: Some(project.status),
            service_count: Some(project.service_count),
            running_count: Some(project.running_count),
            created_at: Some(project.created_at),
            updated_at: Some(project.updated_at),
            ..plan
        })
    }

    async fn read(&self, mut state: ProjectModel) -> Result<Option<ProjectModel>> {
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
        state.refresh(&project);
        Ok(Some(state))
    }

    async fn update(&self, plan: ProjectModel, mut state: ProjectModel) -> Result<ProjectModel> {
        let environment_id = state.environment_id.clone();
        let project_id = state.id.clone();
        let request = UpdateProjectRequest {
            compose_content: Some(plan.compose_content.clone()),
            env_content: plan.env_content.clone(),
            name: Some(plan.name.clone()),
        };

        info!("Updating project {project_id}");
        let mut project = self
            .client
            .update_project(&environment_id, &project_id, &request)
            .await
            .context("update project")?;
        state.name.clone_from(&plan.name);
        state.compose_content.clone_from(&plan.compose_content);
        state.env_content.clone_from(&plan.env_content);

        let redeploy = plan.redeploy_on_update.unwrap_or(true);
        let wants_running = plan.running.unwrap_or(true);
        if request.changes_content() && redeploy && wants_running {
            info!("Project {project_id}: {}", ProjectAction::Redeploy);
            self.client
                .project_action(&environment_id, &project_id, ProjectAction::Redeploy)
                .await
                .context("project redeploy")?;
            if let Some(details) = refetch(&self.client, &environment_id, &project_id).await {
                project.status = details.status;
            }
        }

        if let Some(desired) = plan.running {
            if desired != state.running.unwrap_or(false) {
                set_running(&self.client, &environment_id, &project_id, desired).await?;
                if let Some(details) = refetch(&self.client, &environment_id, &project_id).await
                {
                    project.status = details.status;
                }
                state.running = Some(desired);
            }
        }

        state.refresh(&project);
        state.redeploy_on_update = plan.redeploy_on_update;
        state.remove_files = plan.remove_files;
        state.remove_volumes = plan.remove_volumes;
        Ok(state)
    }

    async fn delete(&self, state: ProjectModel) -> Result<()> {
        destroy(
            &self.client,
            &state.environment_id,
            &state.id,
            state.remove_files,
            state.remove_volumes,
        )
        .await
    }

    async fn import(&self, id: &str) -> Result<ProjectModel> {
        let (environment_id, project_id) = parse_project_import(id)?;
        Ok(ProjectModel {
            id: project_id,
            environment_id,
            ..ProjectModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPOSE: &str = "services:\n  web:\n    image: nginx\n";

    async fn setup() -> (MockServer, ProjectResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, ProjectResource::new(client))
    }

    fn project_json(status: &str, compose: Option<&str>) -> serde_json::Value {
        let running_count = i64::from(status == "running");
        let mut data = json!({
            "id": "p1",
            "name": "web",
            "path": "/data/projects/web",
            "serviceCount": 1,
            "runningCount": running_count,
            "status": status,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        });
        if let Some(compose) = compose {
            data["composeContent"] = json!(compose);
        }
        json!({"success": true, "data": data})
    }

    fn state() -> ProjectModel {
        ProjectModel {
            id: "p1".into(),
            environment_id: "0".into(),
            name: "web".into(),
            compose_content: COMPOSE.into(),
            running: Some(true),
            redeploy_on_update: Some(true),
            status: Some("running".into()),
            ..ProjectModel::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_running_brings_project_up() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects"))
            .and(body_json(json!({"composeContent": COMPOSE, "name": "web"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(project_json("stopped", None)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/up"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(project_json("running", Some(COMPOSE))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let plan = ProjectModel {
            environment_id: "0".into(),
            name: "web".into(),
            compose_content: COMPOSE.into(),
            running: Some(true),
            ..ProjectModel::default()
        };
        let created = resource.create(plan).await.expect("create");
        assert_eq!(created.id, "p1");
        assert_eq!(created.status.as_deref(), Some("running"));
        assert_eq!(created.running_count, Some(1));
        assert_eq!(created.running, Some(true));
    }

    #[tokio::test]
    async fn test_read_takes_server_content_but_not_updated_at() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(project_json("running", Some("services: {}\n"))),
            )
            .mount(&server)
            .await;

        let mut before = state();
        before.updated_at = Some("old".into());
        let after = resource.read(before).await.expect("read").expect("exists");
        assert_eq!(after.compose_content, "services: {}\n");
        assert_eq!(after.updated_at.as_deref(), Some("old"));
        assert_eq!(after.path.as_deref(), Some("/data/projects/web"));
    }

    #[tokio::test]
    async fn test_update_redeploys_and_keeps_sent_content() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json("running", None)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/redeploy"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json("running", None)))
            .mount(&server)
            .await;

        let plan = ProjectModel {
            compose_content: "services:\n  web:\n    image: nginx:1.27\n".into(),
            env_content: Some("TAG=1.27\n".into()),
            ..state()
        };
        let updated = resource.update(plan, state()).await.expect("update");
        assert_eq!(
            updated.compose_content,
            "services:\n  web:\n    image: nginx:1.27\n"
        );
        assert_eq!(updated.env_content.as_deref(), Some("TAG=1.27\n"));
    }

    #[tokio::test]
    async fn test_update_skips_redeploy_when_disabled() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json("running", None)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/redeploy"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let plan = ProjectModel {
            redeploy_on_update: Some(false),
            ..state()
        };
        let updated = resource.update(plan, state()).await.expect("update");
        assert_eq!(updated.redeploy_on_update, Some(false));
    }

    #[tokio::test]
    async fn test_update_stops_project() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json("running", None)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/down"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(project_json("stopped", None)))
            .mount(&server)
            .await;

        let plan = ProjectModel {
            running: Some(false),
            ..state()
        };
        let updated = resource.update(plan, state()).await.expect("update");
        assert_eq!(updated.running, Some(false));
        assert_eq!(updated.status.as_deref(), Some("stopped"));
    }

    #[tokio::test]
    async fn test_delete_sends_destroy_options() {
        let (server, resource) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/environments/0/projects/p1/destroy"))
            .and(body_json(json!({"removeFiles": true, "removeVolumes": false})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let state = ProjectModel {
            remove_files: Some(true),
            ..state()
        };
        tokio_test::assert_ok!(resource.delete(state).await);
    }

    #[tokio::test]
    async fn test_import_requires_environment() {
        let (_server, resource) = setup().await;
        let model = resource.import("0:p1").await.expect("import");
        assert_eq!((model.environment_id.as_str(), model.id.as_str()), ("0", "p1"));
        tokio_test::assert_err!(resource.import("p1").await);
    }
}
