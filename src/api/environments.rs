//! Environment endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /environments`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    /// Agent API URL.
    pub api_url: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Access token for the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Bootstrap token for the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_token: Option<String>,
    /// Whether the environment is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Authenticate the agent with a generated API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_api_key: Option<bool>,
}

/// Body of `PUT /environments/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentRequest {
    /// Agent API URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Access token for the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Bootstrap token for the agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_token: Option<String>,
    /// Whether the environment is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Ask the server to issue a new agent API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regenerate_api_key: Option<bool>,
}

/// An Arcane environment (a managed Docker host).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment ID.
    pub id: String,
    /// Agent API URL.
    #[serde(default, deserialize_with = "super::nullable")]
    pub api_url: String,
    /// Display name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Connection status.
    #[serde(default, deserialize_with = "super::nullable")]
    pub status: String,
    /// Whether the environment is enabled.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
    /// Agent API key; only returned when generated.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct PairRequest {
    rotate: bool,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    token: String,
}

impl ArcaneClient {
    /// Creates an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> Result<Environment> {
        self.post("environments", request).await
    }

    /// Fetches an environment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_environment(&self, id: &str) -> Result<Environment> {
        self.get(&format!("environments/{}", segment(id))).await
    }

    /// Updates an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_environment(
        &self,
        id: &str,
        request: &UpdateEnvironmentRequest,
    ) -> Result<Environment> {
        self.put(&format!("environments/{}", segment(id)), request)
            .await
    }

    /// Deletes an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_environment(&self, id: &str) -> Result<()> {
        self.delete(&format!("environments/{}", segment(id))).await
    }

    /// Generates (or rotates) the agent pairing token of an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn pair_agent(&self, environment_id: &str, rotate: bool) -> Result<String> {
        let response: PairResponse = self
            .post(
                &format!("environments/{}/agent/pair", segment(environment_id)),
                &PairRequest { rotate },
            )
            .await?;
        Ok(response.token)
    }
}
