//! Docker network endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Driver options for a new network.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCreateOptions {
    /// Network driver (`bridge`, `overlay`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Allow manual container attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachable: Option<bool>,
    /// Restrict external access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    /// Enable IPv6.
    #[serde(rename = "enableIPv6", skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Reject duplicate names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duplicate: Option<bool>,
    /// Swarm routing-mesh network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<bool>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    /// Driver-specific options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
}

/// Body of `POST /environments/{env}/networks`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateNetworkRequest {
    /// Network name.
    pub name: String,
    /// Creation options.
    pub options: NetworkCreateOptions,
}

/// Response of a network create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkCreated {
    /// New network ID.
    #[serde(alias = "Id")]
    pub id: String,
}

/// Network details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network ID.
    pub id: String,
    /// Network name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Driver.
    #[serde(default, deserialize_with = "super::nullable")]
    pub driver: String,
    /// Attachable flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub attachable: bool,
    /// Internal flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub internal: bool,
    /// IPv4 enabled.
    #[serde(default, rename = "enableIPv4", deserialize_with = "super::nullable")]
    pub enable_ipv4: bool,
    /// IPv6 enabled.
    #[serde(default, rename = "enableIPv6", deserialize_with = "super::nullable")]
    pub enable_ipv6: bool,
    /// Scope (`local`, `swarm`).
    #[serde(default, deserialize_with = "super::nullable")]
    pub scope: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created: String,
    /// Labels.
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    /// Driver options.
    #[serde(default)]
    pub options: Option<BTreeMap<String, String>>,
}

fn network_path(environment_id: &str, id: &str) -> String {
    format!(
        "environments/{}/networks/{}",
        segment(environment_id),
        segment(id)
    )
}

impl ArcaneClient {
    /// Creates a network and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_network(
        &self,
        environment_id: &str,
        request: &CreateNetworkRequest,
    ) -> Result<NetworkCreated> {
        self.post(
            &format!("environments/{}/networks", segment(environment_id)),
            request,
        )
        .await
    }

    /// Fetches network details.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_network(&self, environment_id: &str, id: &str) -> Result<Network> {
        self.get(&network_path(environment_id, id)).await
    }

    /// Deletes a network.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_network(&self, environment_id: &str, id: &str) -> Result<()> {
        self.delete(&network_path(environment_id, id)).await
    }
}
