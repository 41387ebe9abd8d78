//! Environment settings and background job schedules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// One public setting as reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Setting {
    /// Setting key (camelCase).
    #[serde(deserialize_with = "super::nullable")]
    pub key: String,
    /// Value type hint.
    #[serde(default, rename = "type", deserialize_with = "super::nullable")]
    pub kind: String,
    /// Value, always a string.
    #[serde(default, deserialize_with = "super::nullable")]
    pub value: String,
}

/// Cron expressions of the environment's background jobs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSchedules {
    /// Analytics heartbeat.
    #[serde(default, deserialize_with = "super::nullable")]
    pub analytics_heartbeat_interval: String,
    /// Image auto-update check.
    #[serde(default, deserialize_with = "super::nullable")]
    pub auto_update_interval: String,
    /// Environment health probe.
    #[serde(default, deserialize_with = "super::nullable")]
    pub environment_health_interval: String,
    /// Event log cleanup.
    #[serde(default, deserialize_with = "super::nullable")]
    pub event_cleanup_interval: String,
    /// GitOps sync.
    #[serde(default, deserialize_with = "super::nullable")]
    pub gitops_sync_interval: String,
    /// Image polling.
    #[serde(default, deserialize_with = "super::nullable")]
    pub polling_interval: String,
    /// Scheduled prune.
    #[serde(default, deserialize_with = "super::nullable")]
    pub scheduled_prune_interval: String,
}

/// Body of `PUT /environments/{env}/job-schedules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobSchedulesRequest {
    /// Analytics heartbeat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_heartbeat_interval: Option<String>,
    /// Image auto-update check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_update_interval: Option<String>,
    /// Environment health probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_health_interval: Option<String>,
    /// Event log cleanup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_cleanup_interval: Option<String>,
    /// GitOps sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitops_sync_interval: Option<String>,
    /// Image polling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polling_interval: Option<String>,
    /// Scheduled prune.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_prune_interval: Option<String>,
}

impl ArcaneClient {
    /// Writes a set of settings and returns the updated entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_settings(
        &self,
        environment_id: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<Vec<Setting>> {
        self.put(
            &format!("environments/{}/settings", segment(environment_id)),
            values,
        )
        .await
    }

    /// Reads every public setting as a key/value map.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_settings(&self, environment_id: &str) -> Result<BTreeMap<String, String>> {
        let settings: Vec<Setting> = self
            .get_raw(&format!("environments/{}/settings", segment(environment_id)))
            .await?;
        Ok(settings.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// Fetches the job schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_job_schedules(&self, environment_id: &str) -> Result<JobSchedules> {
        self.get(&format!(
            "environments/{}/job-schedules",
            segment(environment_id)
        ))
        .await
    }

    /// Updates the job schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_job_schedules(
        &self,
        environment_id: &str,
        request: &UpdateJobSchedulesRequest,
    ) -> Result<JobSchedules> {
        self.put(
            &format!("environments/{}/job-schedules", segment(environment_id)),
            request,
        )
        .await
    }
}
