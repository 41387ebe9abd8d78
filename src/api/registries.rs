//! Container registry credential endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /container-registries`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistryRequest {
    /// Registry URL.
    pub url: String,
    /// Login user.
    pub username: String,
    /// Access token or password.
    pub token: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allow plain HTTP / self-signed TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    /// Whether the credentials are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Body of `PUT /container-registries/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistryRequest {
    /// Registry URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Login user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Access token or password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allow plain HTTP / self-signed TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    /// Whether the credentials are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Stored registry credentials. The token is never returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// Registry ID.
    pub id: String,
    /// Registry URL.
    #[serde(default, deserialize_with = "super::nullable")]
    pub url: String,
    /// Login user.
    #[serde(default, deserialize_with = "super::nullable")]
    pub username: String,
    /// Description.
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: String,
    /// Insecure flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub insecure: bool,
    /// Enabled flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub updated_at: String,
}

impl ArcaneClient {
    /// Creates registry credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_registry(&self, request: &CreateRegistryRequest) -> Result<Registry> {
        self.post("container-registries", request).await
    }

    /// Fetches registry credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_registry(&self, id: &str) -> Result<Registry> {
        self.get(&format!("container-registries/{}", segment(id)))
            .await
    }

    /// Updates registry credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_registry(
        &self,
        id: &str,
        request: &UpdateRegistryRequest,
    ) -> Result<Registry> {
        self.put(&format!("container-registries/{}", segment(id)), request)
            .await
    }

    /// Deletes registry credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_registry(&self, id: &str) -> Result<()> {
        self.delete(&format!("container-registries/{}", segment(id)))
            .await
    }
}
