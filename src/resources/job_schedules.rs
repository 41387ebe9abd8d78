//! `arcane_job_schedules`: cron schedules of an environment's background jobs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Resource;
use crate::api::{ArcaneClient, JobSchedules, UpdateJobSchedulesRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_job_schedules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSchedulesModel {
    /// Same as `environment_id`.
    pub id: String,
    /// Target environment.
    pub environment_id: String,
    /// Analytics heartbeat.
    pub analytics_heartbeat_interval: Option<String>,
    /// Image auto-update check.
    pub auto_update_interval: Option<String>,
    /// Environment health probe.
    pub environment_health_interval: Option<String>,
    /// Event log cleanup.
    pub event_cleanup_interval: Option<String>,
    /// GitOps sync.
    pub gitops_sync_interval: Option<String>,
    /// Image polling.
    pub polling_interval: Option<String>,
    /// Scheduled prune.
    pub scheduled_prune_interval: Option<String>,
}

/// Overwrites a configured schedule with the server's value.
fn overwrite(field: &mut Option<String>, server: String) {
    if field.is_some() {
        *field = Some(server);
    }
}

impl JobSchedulesModel {
    fn to_request(&self) -> UpdateJobSchedulesRequest {
        UpdateJobSchedulesRequest {
            analytics_heartbeat_interval: self.analytics_heartbeat_interval.clone(),
            auto_update_interval: self.auto_update_interval.clone(),
            environment_health_interval: self.environment_health_interval.clone(),
            event_cleanup_interval: self.event_cleanup_interval.clone(),
            gitops_sync_interval: self.gitops_sync_interval.clone(),
            polling_interval: self.polling_interval.clone(),
            scheduled_prune_interval: self.scheduled_prune_interval.clone(),
        }
    }

    fn refresh(&mut self, schedules: JobSchedules) {
        overwrite(
            &mut self.analytics_heartbeat_interval,
            schedules.analytics_heartbeat_interval,
        );
        overwrite(&mut self.auto_update_interval, schedules.auto_update_interval);
        overwrite(
            &mut self.environment_health_interval,
            schedules.environment_health_interval,
        );
        overwrite(&mut self.event_cleanup_interval, schedules.event_cleanup_interval);
        overwrite(&mut self.gitops_sync_interval, schedules.gitops_sync_interval);
        overwrite(&mut self.polling_interval, schedules.polling_interval);
        overwrite(
            &mut self.scheduled_prune_interval,
            schedules.scheduled_prune_interval,
        );
    }
}

/// Manages job schedules.
#[derive(Debug, Clone)]
pub struct JobSchedulesResource {
    client: ArcaneClient,
}

impl JobSchedulesResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }

    async fn apply(
        &self,
        mut plan: JobSchedulesModel,
        environment_id: String,
    ) -> Result<JobSchedulesModel> {
        info!("Updating job schedules of environment {environment_id}");
        self.client
            .update_job_schedules(&environment_id, &plan.to_request())
            .await
            .context("update job schedules")?;
        let schedules = self
            .client
            .get_job_schedules(&environment_id)
            .await
            .context("read job schedules")?;

        plan.id.clone_from(&environment_id);
        plan.environment_id = environment_id;
        plan.refresh(schedules);
        Ok(plan)
    }
}

#[async_trait]
impl Resource for JobSchedulesResource {
    type Model = JobSchedulesModel;

    fn type_name(&self) -> &'static str {
        "arcane_job_schedules"
    }

    fn schema(&self) -> Schema {
        let cron = |name: &'static str| {
            Attribute::optional(name, AttributeType::String)
                .describe("Cron expression with seconds, e.g. '0 */5 * * * *'.")
        };
        Schema::new("Cron schedules of an environment's background jobs.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(cron("analytics_heartbeat_interval"))
            .attribute(cron("auto_update_interval"))
            .attribute(cron("environment_health_interval"))
            .attribute(cron("event_cleanup_interval"))
            .attribute(cron("gitops_sync_interval"))
            .attribute(cron("polling_interval"))
            .attribute(cron("scheduled_prune_interval"))
    }

    async fn create(&self, plan: JobSchedulesModel) -> Result<JobSchedulesModel> {
        let environment_id = plan.environment_id.clone();
        self.apply(plan, environment_id).await
    }

    async fn read(&self, mut state: JobSchedulesModel) -> Result<Option<JobSchedulesModel>> {
        self.client
            .get_job_schedules(&state.environment_id)
            .await
            .context("read job schedules")?;
        state.id.clone_from(&state.environment_id);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: JobSchedulesModel,
        state: JobSchedulesModel,
    ) -> Result<JobSchedulesModel> {
        self.apply(plan, state.environment_id).await
    }

    async fn delete(&self, state: JobSchedulesModel) -> Result<()> {
        debug!(
            "Job schedules of environment {} stay as configured",
            state.environment_id
        );
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<JobSchedulesModel> {
        Ok(JobSchedulesModel {
            environment_id: id.to_string(),
            ..JobSchedulesModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, JobSchedulesResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, JobSchedulesResource::new(client))
    }

    fn schedules_json() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "analyticsHeartbeatInterval": "0 0 * * * *",
                "autoUpdateInterval": "0 0 2 * * *",
                "environmentHealthInterval": "0 */1 * * * *",
                "eventCleanupInterval": "0 0 3 * * *",
                "gitopsSyncInterval": "0 */10 * * * *",
                "pollingInterval": "0 */5 * * * *",
                "scheduledPruneInterval": "0 0 1 * * 0"
            }
        })
    }

    #[tokio::test]
    async fn test_create_only_tracks_configured_schedules() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/job-schedules"))
            .and(body_json(json!({"pollingInterval": "0 */5 * * * *"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedules_json()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/job-schedules"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedules_json()))
            .mount(&server)
            .await;

        let plan = JobSchedulesModel {
            environment_id: "0".into(),
            polling_interval: Some("0 */5 * * * *".into()),
            ..JobSchedulesModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.id, "0");
        assert_eq!(state.polling_interval.as_deref(), Some("0 */5 * * * *"));
        assert_eq!(state.auto_update_interval, None);
        assert_eq!(state.scheduled_prune_interval, None);
    }

    #[tokio::test]
    async fn test_read_keeps_state_values() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/job-schedules"))
            .respond_with(ResponseTemplate::new(200).set_body_json(schedules_json()))
            .mount(&server)
            .await;

        let state = JobSchedulesModel {
            environment_id: "0".into(),
            polling_interval: Some("0 */1 * * * *".into()),
            ..JobSchedulesModel::default()
        };
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.id, "0");
        assert_eq!(refreshed.polling_interval.as_deref(), Some("0 */1 * * * *"));
    }

    #[tokio::test]
    async fn test_delete_is_noop() {
        let (_server, resource) = setup().await;
        let state = resource.import("0").await.expect("import");
        tokio_test::assert_ok!(resource.delete(state).await);
    }
}
