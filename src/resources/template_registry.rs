//! `arcane_template_registry`: a remote source of compose templates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone};
use crate::api::{ArcaneClient, TemplateRegistryRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_template_registry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateRegistryModel {
    /// Registry ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Registry index URL.
    pub url: String,
    /// Description.
    pub description: String,
    /// Whether templates are fetched from this registry.
    pub enabled: bool,
}

impl TemplateRegistryModel {
    fn to_request(&self) -> TemplateRegistryRequest {
        TemplateRegistryRequest {
            name: self.name.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
        }
    }
}

/// Manages template registries.
#[derive(Debug, Clone)]
pub struct TemplateRegistryResource {
    client: ArcaneClient,
}

impl TemplateRegistryResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TemplateRegistryResource {
    type Model = TemplateRegistryModel;

    fn type_name(&self) -> &'static str {
        "arcane_template_registry"
    }

    fn schema(&self) -> Schema {
        Schema::new("A remote template registry.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::required("url", AttributeType::String))
            .attribute(Attribute::required("description", AttributeType::String))
            .attribute(Attribute::required("enabled", AttributeType::Bool))
    }

    async fn create(&self, plan: TemplateRegistryModel) -> Result<TemplateRegistryModel> {
        info!("Creating template registry {}", plan.url);
        let registry = self
            .client
            .create_template_registry(&plan.to_request())
            .await
            .context("create template registry")?;

        Ok(TemplateRegistryModel {
            id: registry.id,
            name: registry.name,
            url: registry.url,
            enabled: registry.enabled,
            ..plan
        })
    }

    async fn read(
        &self,
        mut state: TemplateRegistryModel,
    ) -> Result<Option<TemplateRegistryModel>> {
        let Some(registry) = found(
            self.client.get_template_registry(&state.id).await,
            "template registry",
            &state.id,
        )
        .context("read template registry")?
        else {
            return Ok(None);
        };
        state.name = registry.name;
        state.url = registry.url;
        state.description = registry.description;
        state.enabled = registry.enabled;
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: TemplateRegistryModel,
        state: TemplateRegistryModel,
    ) -> Result<TemplateRegistryModel> {
        info!("Updating template registry {}", state.id);
        let registry = self
            .client
            .update_template_registry(&state.id, &plan.to_request())
            .await
            .context("update template registry")?;

        Ok(TemplateRegistryModel {
            id: registry.id,
            ..plan
        })
    }

    async fn delete(&self, state: TemplateRegistryModel) -> Result<()> {
        info!("Deleting template registry {}", state.id);
        gone(
            self.client.delete_template_registry(&state.id).await,
            "template registry",
            &state.id,
        )
        .context("delete template registry")
    }

    async fn import(&self, id: &str) -> Result<TemplateRegistryModel> {
        Ok(TemplateRegistryModel {
            id: id.to_string(),
            ..TemplateRegistryModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, TemplateRegistryResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, TemplateRegistryResource::new(client))
    }

    #[tokio::test]
    async fn test_update_returns_plan_with_id() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/templates/registries/tr1"))
            .and(body_json(json!({
                "name": "community",
                "url": "https://templates.example.com/index.json",
                "description": "Community templates",
                "enabled": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "tr1",
                    "name": "community",
                    "url": "https://templates.example.com/index.json",
                    "description": "server-side text",
                    "enabled": false
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = TemplateRegistryModel {
            id: "tr1".into(),
            name: "community".into(),
            url: "https://templates.example.com/index.json".into(),
            description: "Community templates".into(),
            enabled: true,
        };
        let plan = TemplateRegistryModel {
            enabled: false,
            ..state.clone()
        };
        let updated = resource.update(plan.clone(), state).await.expect("update");
        assert_eq!(updated, plan);
    }

    #[tokio::test]
    async fn test_read_404_drops_state() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/templates/registries/tr1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let state = resource.import("tr1").await.expect("import");
        assert_eq!(resource.read(state).await.expect("read"), None);
    }
}
