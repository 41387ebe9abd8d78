//! `arcane_container_registry`: credentials for a private image registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone, non_empty};
use crate::api::{ArcaneClient, CreateRegistryRequest, Registry, UpdateRegistryRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_container_registry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerRegistryModel {
    /// Registry ID.
    pub id: String,
    /// Registry URL.
    pub url: String,
    /// Username.
    pub username: String,
    /// Token or password; never returned by the API.
    pub token: String,
    /// Description.
    pub description: Option<String>,
    /// Skip TLS verification.
    pub insecure: Option<bool>,
    /// Whether the registry is used for pulls.
    pub enabled: Option<bool>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl ContainerRegistryModel {
    fn refresh(&mut self, registry: Registry) {
        self.url = registry.url;
        self.username = registry.username;
        self.description = Some(registry.description);
        self.insecure = Some(registry.insecure);
        self.enabled = Some(registry.enabled);
        self.created_at = Some(registry.created_at);
        self.updated_at = Some(registry.updated_at);
    }
}

/// Manages container registry credentials.
#[derive(Debug, Clone)]
pub struct ContainerRegistryResource {
    client: ArcaneClient,
}

impl ContainerRegistryResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ContainerRegistryResource {
    type Model = ContainerRegistryModel;

    fn type_name(&self) -> &'static str {
        "arcane_container_registry"
    }

    fn schema(&self) -> Schema {
        Schema::new("Credentials for a container image registry.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("url", AttributeType::String).describe("Registry URL"))
            .attribute(
                Attribute::required("username", AttributeType::String)
                    .describe("Registry username"),
            )
            .attribute(
                Attribute::required("token", AttributeType::String)
                    .sensitive()
                    .describe("Registry access token or password"),
            )
            .attribute(Attribute::optional("description", AttributeType::String))
            .attribute(Attribute::optional("insecure", AttributeType::Bool))
            .attribute(Attribute::optional("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn create(&self, plan: ContainerRegistryModel) -> Result<ContainerRegistryModel> {
        let request = CreateRegistryRequest {
            url: plan.url.clone(),
            username: plan.username.clone(),
            token: plan.token.clone(),
            description: plan.description.clone(),
            insecure: plan.insecure,
            enabled: plan.enabled,
        };

        info!("Creating container registry {}", request.url);
        let registry = self
            .client
            .create_registry(&request)
            .await
            .context("create registry")?;

        Ok(ContainerRegistryModel {
            id: registry.id,
            url: registry.url,
            created_at: Some(registry.created_at),
            updated_at: Some(registry.updated_at),
            ..plan
        })
    }

    async fn read(
        &self,
        mut state: ContainerRegistryModel,
    ) -> Result<Option<ContainerRegistryModel>> {
        let Some(registry) = found(
            self.client.get_registry(&state.id).await,
            "container registry",
            &state.id,
        )
        .context("read registry")?
        else {
            return Ok(None);
        };
        state.refresh(registry);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: ContainerRegistryModel,
        mut state: ContainerRegistryModel,
    ) -> Result<ContainerRegistryModel> {
        let token = non_empty(Some(&plan.token));
        let request = UpdateRegistryRequest {
            url: Some(plan.url.clone()),
            username: Some(plan.username.clone()),
            token: token.clone(),
            description: plan.description.clone(),
            insecure: plan.insecure,
            enabled: plan.enabled,
        };

        info!("Updating container registry {}", state.id);
        let registry = self
            .client
            .update_registry(&state.id, &request)
            .await
            .context("update registry")?;

        state.refresh(registry);
        if let Some(token) = token {
            state.token = token;
        }
        Ok(state)
    }

    async fn delete(&self, state: ContainerRegistryModel) -> Result<()> {
        info!("Deleting container registry {}", state.id);
        gone(
            self.client.delete_registry(&state.id).await,
            "container registry",
            &state.id,
        )
        .context("delete registry")
    }

    async fn import(&self, id: &str) -> Result<ContainerRegistryModel> {
        Ok(ContainerRegistryModel {
            id: id.to_string(),
            ..ContainerRegistryModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ContainerRegistryResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, ContainerRegistryResource::new(client))
    }

    fn registry_json() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "id": "r1",
                "url": "ghcr.io",
                "username": "bot",
                "description": "",
                "insecure": false,
                "enabled": true,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-02T00:00:00Z"
            }
        })
    }

    fn state() -> ContainerRegistryModel {
        ContainerRegistryModel {
            id: "r1".into(),
            url: "ghcr.io".into(),
            username: "bot".into(),
            token: "ghp_secret".into(),
            ..ContainerRegistryModel::default()
        }
    }

    #[tokio::test]
    async fn test_create_keeps_token() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/container-registries"))
            .and(body_json(json!({
                "url": "ghcr.io",
                "username": "bot",
                "token": "ghp_secret"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(registry_json()))
            .expect(1)
            .mount(&server)
            .await;

        let plan = ContainerRegistryModel {
            id: String::new(),
            ..state()
        };
        let created = resource.create(plan).await.expect("create");
        assert_eq!(created.id, "r1");
        assert_eq!(created.token, "ghp_secret");
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn test_read_keeps_token() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/container-registries/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(registry_json()))
            .mount(&server)
            .await;

        let refreshed = resource.read(state()).await.expect("read").expect("exists");
        assert_eq!(refreshed.token, "ghp_secret");
        assert_eq!(refreshed.enabled, Some(true));
    }

    #[tokio::test]
    async fn test_update_omits_empty_token() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/container-registries/r1"))
            .and(body_json(json!({"url": "ghcr.io", "username": "bot", "enabled": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(registry_json()))
            .expect(1)
            .mount(&server)
            .await;

        let plan = ContainerRegistryModel {
            token: String::new(),
            enabled: Some(true),
            ..state()
        };
        let updated = resource.update(plan, state()).await.expect("update");
        assert_eq!(updated.token, "ghp_secret");
    }
}
