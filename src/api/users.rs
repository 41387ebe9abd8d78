//! User endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of `POST /users`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Initial password.
    pub password: String,
    /// Role names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Login name.
    pub username: String,
}

/// Body of `PUT /users/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Role names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// An Arcane user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: String,
    /// Login name.
    #[serde(deserialize_with = "super::nullable")]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Locale.
    #[serde(default)]
    pub locale: Option<String>,
    /// Role names.
    #[serde(default, deserialize_with = "super::nullable")]
    pub roles: Vec<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ArcaneClient {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        self.post("users", request).await
    }

    /// Fetches a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.get(&format!("users/{}", segment(id))).await
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> Result<User> {
        self.put(&format!("users/{}", segment(id)), request).await
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete(&format!("users/{}", segment(id))).await
    }
}
