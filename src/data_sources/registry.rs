//! Container registries, templates and template registries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::resources::{TemplateModel, TemplateRegistryModel, string_or_null};
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_container_registry`. The token is never exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerRegistryData {
    /// Lookup key.
    pub id: String,
    /// Registry URL.
    pub url: Option<String>,
    /// Login user.
    pub username: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Skip TLS verification.
    pub insecure: Option<bool>,
    /// Whether the registry is used.
    pub enabled: Option<bool>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

/// Looks up a container registry.
#[derive(Debug, Clone)]
pub struct ContainerRegistryDataSource {
    client: ArcaneClient,
}

impl ContainerRegistryDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ContainerRegistryDataSource {
    type Model = ContainerRegistryData;

    fn type_name(&self) -> &'static str {
        "arcane_container_registry"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a container registry.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("url", AttributeType::String))
            .attribute(Attribute::computed("username", AttributeType::String))
            .attribute(Attribute::computed("description", AttributeType::String))
            .attribute(Attribute::computed("insecure", AttributeType::Bool))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: ContainerRegistryData) -> Result<ContainerRegistryData> {
        let registry = lookup(self.client.get_registry(&config.id).await, "container registry")?;
        Ok(ContainerRegistryData {
            id: registry.id,
            url: Some(registry.url),
            username: Some(registry.username),
            description: string_or_null(registry.description),
            insecure: Some(registry.insecure),
            enabled: Some(registry.enabled),
            created_at: Some(registry.created_at),
            updated_at: Some(registry.updated_at),
        })
    }
}

/// Looks up a compose template.
#[derive(Debug, Clone)]
pub struct TemplateDataSource {
    client: ArcaneClient,
}

impl TemplateDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TemplateDataSource {
    type Model = TemplateModel;

    fn type_name(&self) -> &'static str {
        "arcane_template"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a compose template.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("description", AttributeType::String))
            .attribute(Attribute::computed("content", AttributeType::String))
            .attribute(Attribute::computed("env_content", AttributeType::String))
            .attribute(Attribute::computed("is_custom", AttributeType::Bool))
            .attribute(Attribute::computed("is_remote", AttributeType::Bool))
            .attribute(Attribute::computed("registry_id", AttributeType::String))
    }

    async fn read(&self, config: TemplateModel) -> Result<TemplateModel> {
        let template = lookup(self.client.get_template(&config.id).await, "template")?;
        Ok(TemplateModel {
            id: template.id,
            name: template.name,
            description: template.description,
            content: template.content,
            env_content: template.env_content.unwrap_or_default(),
            is_custom: Some(template.is_custom),
            is_remote: Some(template.is_remote),
            registry_id: template.registry_id,
        })
    }
}

/// Looks up a template registry.
#[derive(Debug, Clone)]
pub struct TemplateRegistryDataSource {
    client: ArcaneClient,
}

impl TemplateRegistryDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TemplateRegistryDataSource {
    type Model = TemplateRegistryModel;

    fn type_name(&self) -> &'static str {
        "arcane_template_registry"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up a template registry.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("url", AttributeType::String))
            .attribute(Attribute::computed("description", AttributeType::String))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
    }

    async fn read(&self, config: TemplateRegistryModel) -> Result<TemplateRegistryModel> {
        let registry = lookup(
            self.client.get_template_registry(&config.id).await,
            "template registry",
        )?;
        Ok(TemplateRegistryModel {
            id: registry.id,
            name: registry.name,
            url: registry.url,
            description: registry.description,
            enabled: registry.enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ArcaneClient {
        ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client")
    }

    #[tokio::test]
    async fn test_container_registry_empty_description_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/container-registries/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "r1",
                    "url": "ghcr.io",
                    "username": "bot",
                    "description": "",
                    "insecure": false,
                    "enabled": true
                }
            })))
            .mount(&server)
            .await;

        let source = ContainerRegistryDataSource::new(client(&server));
        let config = ContainerRegistryData {
            id: "r1".into(),
            ..ContainerRegistryData::default()
        };
        let data = source.read(config).await.expect("read");
        assert_eq!(data.url.as_deref(), Some("ghcr.io"));
        assert_eq!(data.description, None);
    }

    #[tokio::test]
    async fn test_template_without_env_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/templates/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "t1",
                    "name": "redis",
                    "description": "Redis cache",
                    "content": "services: {}\n",
                    "isCustom": false,
                    "isRemote": true,
                    "registryId": "tr1"
                }
            })))
            .mount(&server)
            .await;

        let source = TemplateDataSource::new(client(&server));
        let config = TemplateModel {
            id: "t1".into(),
            ..TemplateModel::default()
        };
        let data = source.read(config).await.expect("read");
        assert_eq!(data.env_content, "");
        assert_eq!(data.registry_id.as_deref(), Some("tr1"));
    }

    #[tokio::test]
    async fn test_template_registry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/templates/registries/tr9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = TemplateRegistryDataSource::new(client(&server));
        let config = TemplateRegistryModel {
            id: "tr9".into(),
            ..TemplateRegistryModel::default()
        };
        let err = source.read(config).await.expect_err("missing");
        assert_eq!(err.to_string(), "template registry not found");
    }
}
