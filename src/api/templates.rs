//! Compose template and template registry endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::client::{ArcaneClient, segment};

/// Body of template create and update calls.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    /// Template name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Compose document.
    pub content: String,
    /// Default `.env` document.
    pub env_content: String,
}

/// A compose template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template ID.
    pub id: String,
    /// Template name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Description.
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: String,
    /// Compose document.
    #[serde(default, deserialize_with = "super::nullable")]
    pub content: String,
    /// Default `.env` document.
    #[serde(default)]
    pub env_content: Option<String>,
    /// User-defined template.
    #[serde(default, deserialize_with = "super::nullable")]
    pub is_custom: bool,
    /// Template fetched from a registry.
    #[serde(default, deserialize_with = "super::nullable")]
    pub is_remote: bool,
    /// Source registry.
    #[serde(default)]
    pub registry_id: Option<String>,
}

/// Body of template registry create and update calls.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRegistryRequest {
    /// Registry name.
    pub name: String,
    /// Registry index URL.
    pub url: String,
    /// Description.
    pub description: String,
    /// Whether templates are fetched from the registry.
    pub enabled: bool,
}

/// A template registry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRegistry {
    /// Registry ID.
    pub id: String,
    /// Registry name.
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: String,
    /// Registry index URL.
    #[serde(default, deserialize_with = "super::nullable")]
    pub url: String,
    /// Description.
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: String,
    /// Enabled flag.
    #[serde(default, deserialize_with = "super::nullable")]
    pub enabled: bool,
}

impl ArcaneClient {
    /// Creates a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_template(&self, request: &TemplateRequest) -> Result<Template> {
        self.post("templates", request).await
    }

    /// Fetches a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_template(&self, id: &str) -> Result<Template> {
        self.get(&format!("templates/{}", segment(id))).await
    }

    /// Replaces a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_template(&self, id: &str, request: &TemplateRequest) -> Result<Template> {
        self.put(&format!("templates/{}", segment(id)), request).await
    }

    /// Deletes a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_template(&self, id: &str) -> Result<()> {
        self.delete(&format!("templates/{}", segment(id))).await
    }

    /// Creates a template registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_template_registry(
        &self,
        request: &TemplateRegistryRequest,
    ) -> Result<TemplateRegistry> {
        self.post("templates/registries", request).await
    }

    /// Fetches a template registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_template_registry(&self, id: &str) -> Result<TemplateRegistry> {
        self.get(&format!("templates/registries/{}", segment(id)))
            .await
    }

    /// Replaces a template registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn update_template_registry(
        &self,
        id: &str,
        request: &TemplateRegistryRequest,
    ) -> Result<TemplateRegistry> {
        self.put(&format!("templates/registries/{}", segment(id)), request)
            .await
    }

    /// Deletes a template registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_template_registry(&self, id: &str) -> Result<()> {
        self.delete(&format!("templates/registries/{}", segment(id)))
            .await
    }
}
