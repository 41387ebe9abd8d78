//! API key endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /api-keys`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    /// Key name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expiry as an RFC 3339 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Body of `PUT /api-keys/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKeyRequest {
    /// Key name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expiry as an RFC 3339 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// API key metadata. `key` is only present in the create response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Key ID.
    pub id: String,
    /// Key name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Secret key value.
    #[serde(default)]
    pub key: Option<String>,
    /// Visible prefix of the key.
    #[serde(default, deserialize_with = "super::nullable")]
    pub key_prefix: String,
    /// Owner.
    #[serde(default, deserialize_with = "super::nullable")]
    pub user_id: String,
    /// Expiry.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Last use.
    #[serde(default)]
    pub last_used_at: Option<String>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "super::nullable")]
    pub created_at: String,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ArcaneClient {
    /// Creates an API key; the response carries the secret once.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_api_key(&self, request: &CreateApiKeyRequest) -> Result<ApiKey> {
        self.post("api-keys", request).await
    }

    /// Fetches API key metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_api_key(&self, id: &str) -> Result<ApiKey> {
        self.get(&format!("api-keys/{}", segment(id))).await
    }

    /// Updates an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_api_key(&self, id: &str, request: &UpdateApiKeyRequest) -> Result<ApiKey> {
        self.put(&format!("api-keys/{}", segment(id)), request).await
    }

    /// Revokes an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_api_key(&self, id: &str) -> Result<()> {
        self.delete(&format!("api-keys/{}", segment(id))).await
    }
}
