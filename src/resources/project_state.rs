//! `arcane_project_state`: the running state of an existing project.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::project::{parse_project_import, set_running};
use super::{Resource, found};
use crate::api::ArcaneClient;
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_project_state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStateModel {
    /// `env_id:project_id`.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Managed project.
    pub project_id: String,
    /// Whether the project should run.
    pub running: bool,
    /// Status reported by the API.
    pub status: Option<String>,
}

/// Drives a project up or down without owning it.
#[derive(Debug, Clone)]
pub struct ProjectStateResource {
    client: ArcaneClient,
}

impl ProjectStateResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }

    async fn status(&self, environment_id: &str, project_id: &str) -> Result<String> {
        let project = self
            .client
            .get_project(environment_id, project_id)
            .await
            .context("get project")?;
        Ok(project.status)
    }
}

#[async_trait]
impl Resource for ProjectStateResource {
    type Model = ProjectStateModel;

    fn type_name(&self) -> &'static str {
        "arcane_project_state"
    }

    fn schema(&self) -> Schema {
        Schema::new("Running state of a project (compose up / down).")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace())
            .attribute(Attribute::required("project_id", AttributeType::String).replace())
            .attribute(
                Attribute::required("running", AttributeType::Bool)
                    .describe("Whether the project should be running."),
            )
            .attribute(Attribute::computed("status", AttributeType::String))
    }

    async fn create(&self, plan: ProjectStateModel) -> Result<ProjectStateModel> {
        set_running(&self.client, &plan.environment_id, &plan.project_id, plan.running).await?;
        let status = self.status(&plan.environment_id, &plan.project_id).await?;
        Ok(ProjectStateModel {
            id: format!("{}:{}", plan.environment_id, plan.project_id),
            status: Some(status),
            ..plan
        })
    }

    async fn read(&self, mut state: ProjectStateModel) -> Result<Option<ProjectStateModel>> {
        let Some(project) = found(
            self.client
                .get_project(&state.environment_id, &state.project_id)
                .await,
            "project",
            &state.project_id,
        )
        .context("get project")?
        else {
            return Ok(None);
        };
        state.status = Some(project.status);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: ProjectStateModel,
        mut state: ProjectStateModel,
    ) -> Result<ProjectStateModel> {
        if plan.running == state.running {
            debug!("Project {} already in desired state", state.project_id);
        } else {
            set_running(
                &self.client,
                &state.environment_id,
                &state.project_id,
                plan.running,
            )
            .await?;
        }
        state.status = Some(self.status(&state.environment_id, &state.project_id).await?);
        state.running = plan.running;
        Ok(state)
    }

    async fn delete(&self, state: ProjectStateModel) -> Result<()> {
        debug!("Releasing project {} without stopping it", state.project_id);
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<ProjectStateModel> {
        let (environment_id, project_id) = parse_project_import(id)?;
        Ok(ProjectStateModel {
            id: id.to_string(),
            environment_id,
            project_id,
            ..ProjectStateModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ProjectStateResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, ProjectStateResource::new(client))
    }

    async fn mount_status(server: &MockServer, status: &str) {
        Mock::given(method("GET"))
            .and(path("/api/environments/0/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "p1", "status": status}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_create_runs_down_and_builds_id() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/projects/p1/down"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_status(&server, "stopped").await;

        let plan = ProjectStateModel {
            environment_id: "0".into(),
            project_id: "p1".into(),
            running: false,
            ..ProjectStateModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.id, "0:p1");
        assert_eq!(state.status.as_deref(), Some("stopped"));
    }

    #[tokio::test]
    async fn test_update_without_change_only_reads() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        mount_status(&server, "running").await;

        let state = ProjectStateModel {
            id: "0:p1".into(),
            environment_id: "0".into(),
            project_id: "p1".into(),
            running: true,
            status: Some("stopped".into()),
        };
        let updated = resource
            .update(state.clone(), state)
            .await
            .expect("update");
        assert_eq!(updated.status.as_deref(), Some("running"));
    }

    #[tokio::test]
    async fn test_import_keeps_composite_id() {
        let (_server, resource) = setup().await;
        let model = resource.import("0:p1").await.expect("import");
        assert_eq!(model.id, "0:p1");
        assert_eq!(model.project_id, "p1");
    }
}
