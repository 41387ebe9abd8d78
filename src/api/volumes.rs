//! Docker volume endpoints. Volumes are addressed by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /environments/{env}/volumes`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolumeRequest {
    /// Volume name.
    pub name: String,
    /// Volume driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Driver options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_opts: Option<BTreeMap<String, String>>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

/// A Docker volume.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume ID (usually equal to the name).
    #[serde(default, deserialize_with = "super::nullable")]
    pub id: String,
    /// Volume name.
    #[serde(deserialize_with = "super::nullable")]
    pub name: String,
    /// Driver.
    #[serde(default, deserialize_with = "super::nullable")]
    pub driver: String,
    /// Mount point on the host.
    #[serde(default, deserialize_with = "super::nullable")]
    pub mountpoint: String,
    /// Scope.
    #[serde(default, deserialize_with = "super::nullable")]
    pub scope: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Whether a container uses the volume.
    #[serde(default, deserialize_with = "super::nullable")]
    pub in_use: bool,
    /// Size in bytes.
    #[serde(default, deserialize_with = "super::nullable")]
    pub size: i64,
    /// IDs of containers using the volume.
    #[serde(default, deserialize_with = "super::nullable")]
    pub containers: Vec<String>,
    /// Driver options.
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
    /// Labels.
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
}

fn volume_path(environment_id: &str, name: &str) -> String {
    format!(
        "environments/{}/volumes/{}",
        segment(environment_id),
        segment(name)
    )
}

impl ArcaneClient {
    /// Creates a volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_volume(
        &self,
        environment_id: &str,
        request: &CreateVolumeRequest,
    ) -> Result<Volume> {
        self.post(
            &format!("environments/{}/volumes", segment(environment_id)),
            request,
        )
        .await
    }

    /// Fetches a volume by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_volume(&self, environment_id: &str, name: &str) -> Result<Volume> {
        self.get(&volume_path(environment_id, name)).await
    }

    /// Deletes a volume by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_volume(&self, environment_id: &str, name: &str) -> Result<()> {
        self.delete(&volume_path(environment_id, name)).await
    }
}
