//! Notification provider settings. These endpoints answer without the
//! usual response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of the notification upsert call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationUpdate {
    /// Provider key (`discord`, `email`, ...).
    pub provider: String,
    /// Whether the provider is active.
    pub enabled: bool,
    /// Provider-specific configuration.
    pub config: Map<String, Value>,
}

/// Stored notification settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationSettings {
    /// Numeric row ID.
    #[serde(default, deserialize_with = "super::nullable")]
    pub id: i64,
    /// Provider key.
    #[serde(default, deserialize_with = "super::nullable")]
    pub provider: String,
    /// Whether the provider is active.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
    /// Provider-specific configuration.
    #[serde(default, deserialize_with = "super::nullable")]
    pub config: Map<String, Value>,
}

fn settings_path(environment_id: &str) -> String {
    format!(
        "environments/{}/notifications/settings",
        segment(environment_id)
    )
}

impl ArcaneClient {
    /// Creates or replaces the settings of one provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn upsert_notification(
        &self,
        environment_id: &str,
        request: &NotificationUpdate,
    ) -> Result<NotificationSettings> {
        self.post_raw(&settings_path(environment_id), request).await
    }

    /// Fetches the settings of one provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_notification(
        &self,
        environment_id: &str,
        provider: &str,
    ) -> Result<NotificationSettings> {
        self.get_raw(&format!(
            "{}/{}",
            settings_path(environment_id),
            segment(provider)
        ))
        .await
    }

    /// Removes the settings of one provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_notification(&self, environment_id: &str, provider: &str) -> Result<()> {
        self.delete(&format!(
            "{}/{}",
            settings_path(environment_id),
            segment(provider)
        ))
        .await
    }
}
