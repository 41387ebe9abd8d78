//! Environment settings, job schedules and notification providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::resources::{JobSchedulesModel, NotificationModel, stringify_config};
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    /// Environment to read.
    pub environment_id: String,
    /// Every public setting keyed by API name.
    pub settings: Option<BTreeMap<String, String>>,
}

/// Reads all settings of an environment.
#[derive(Debug, Clone)]
pub struct SettingsDataSource {
    client: ArcaneClient,
}

impl SettingsDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for SettingsDataSource {
    type Model = SettingsData;

    fn type_name(&self) -> &'static str {
        "arcane_settings"
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads the settings of an environment.")
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::computed("settings", AttributeType::StringMap))
    }

    async fn read(&self, config: SettingsData) -> Result<SettingsData> {
        let settings = lookup(
            self.client.get_settings(&config.environment_id).await,
            "settings",
        )?;
        Ok(SettingsData {
            environment_id: config.environment_id,
            settings: Some(settings),
        })
    }
}

/// Reads the job schedules of an environment.
#[derive(Debug, Clone)]
pub struct JobSchedulesDataSource {
    client: ArcaneClient,
}

impl JobSchedulesDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for JobSchedulesDataSource {
    type Model = JobSchedulesModel;

    fn type_name(&self) -> &'static str {
        "arcane_job_schedules"
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads the cron schedules of an environment's background jobs.")
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::computed("analytics_heartbeat_interval", AttributeType::String))
            .attribute(Attribute::computed("auto_update_interval", AttributeType::String))
            .attribute(Attribute::computed("environment_health_interval", AttributeType::String))
            .attribute(Attribute::computed("event_cleanup_interval", AttributeType::String))
            .attribute(Attribute::computed("gitops_sync_interval", AttributeType::String))
            .attribute(Attribute::computed("polling_interval", AttributeType::String))
            .attribute(Attribute::computed("scheduled_prune_interval", AttributeType::String))
    }

    async fn read(&self, config: JobSchedulesModel) -> Result<JobSchedulesModel> {
        let schedules = lookup(
            self.client.get_job_schedules(&config.environment_id).await,
            "job schedules",
        )?;
        Ok(JobSchedulesModel {
            id: config.environment_id.clone(),
            environment_id: config.environment_id,
            analytics_heartbeat_interval: Some(schedules.analytics_heartbeat_interval),
            auto_update_interval: Some(schedules.auto_update_interval),
            environment_health_interval: Some(schedules.environment_health_interval),
            event_cleanup_interval: Some(schedules.event_cleanup_interval),
            gitops_sync_interval: Some(schedules.gitops_sync_interval),
            polling_interval: Some(schedules.polling_interval),
            scheduled_prune_interval: Some(schedules.scheduled_prune_interval),
        })
    }
}

/// Reads one notification provider's settings.
#[derive(Debug, Clone)]
pub struct NotificationDataSource {
    client: ArcaneClient,
}

impl NotificationDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for NotificationDataSource {
    type Model = NotificationModel;

    fn type_name(&self) -> &'static str {
        "arcane_notification"
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads the settings of a notification provider.")
            .attribute(Attribute::required("environment_id", AttributeType::String))
            .attribute(Attribute::required("provider_name", AttributeType::String))
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("config", AttributeType::StringMap).sensitive())
    }

    async fn read(&self, config: NotificationModel) -> Result<NotificationModel> {
        let settings = lookup(
            self.client
                .get_notification(&config.environment_id, &config.provider_name)
                .await,
            "notification",
        )?;
        Ok(NotificationModel {
            id: format!("{}:{}", config.environment_id, settings.provider),
            environment_id: config.environment_id,
            provider_name: settings.provider,
            enabled: settings.enabled,
            config: stringify_config(settings.config),
        })
    }
}
