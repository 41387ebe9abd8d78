//! Container endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /environments/{env}/containers`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContainerRequest {
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Remove the container when it exits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_remove: Option<bool>,
    /// Command override.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// CPU limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,
    /// Entrypoint override.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entrypoint: Vec<String>,
    /// `KEY=VALUE` environment entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    /// Memory limit in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    /// Networks to attach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    /// Container port to host port.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub ports: BTreeMap<String, String>,
    /// Run privileged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    /// Restart policy name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
    /// User to run as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Volume bindings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    /// Working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    /// Hostname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Domain name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domainname: Option<String>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    /// Allocate a TTY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tty: Option<bool>,
    /// Attach stdin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_stdin: Option<bool>,
    /// Attach stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_stdout: Option<bool>,
    /// Attach stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_stderr: Option<bool>,
    /// Keep stdin open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_stdin: Option<bool>,
    /// Close stdin after the first client detaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin_once: Option<bool>,
    /// Disable networking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_disabled: Option<bool>,
}

/// Container summary returned by create and get.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container ID.
    pub id: String,
    /// Container name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Image reference.
    #[serde(default, deserialize_with = "super::nullable")]
    pub image: String,
    /// Runtime status.
    #[serde(default, deserialize_with = "super::nullable")]
    pub status: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created: String,
}

/// Strips a `/proto` suffix from every key and value (`"8080/tcp"` → `"8080"`).
#[must_use]
pub fn normalize_ports(ports: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    fn strip(value: &str) -> String {
        value.split_once('/').map_or(value, |(port, _)| port).to_string()
    }
    ports.iter().map(|(k, v)| (strip(k), strip(v))).collect()
}

impl ArcaneClient {
    /// Creates a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_container(
        &self,
        environment_id: &str,
        request: &CreateContainerRequest,
    ) -> Result<Container> {
        self.post(
            &format!("environments/{}/containers", segment(environment_id)),
            request,
        )
        .await
    }

    /// Fetches a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_container(&self, environment_id: &str, id: &str) -> Result<Container> {
        self.get(&format!(
            "environments/{}/containers/{}",
            segment(environment_id),
            segment(id)
        ))
        .await
    }

    /// Deletes a container. `force` and `volumes` are only sent when true.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_container(
        &self,
        environment_id: &str,
        id: &str,
        force: bool,
        volumes: bool,
    ) -> Result<()> {
        let mut query = Vec::new();
        if force {
            query.push(("force", "true"));
        }
        if volumes {
            query.push(("volumes", "true"));
        }
        self.delete_with_query(
            &format!(
                "environments/{}/containers/{}",
                segment(environment_id),
                segment(id)
            ),
            &query,
        )
        .await
    }
}
