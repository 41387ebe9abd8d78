//! The `arcane` provider: configuration plus the registry of every resource
//! and data source type.

use tracing::{debug, info};

use crate::api::ArcaneClient;
use crate::config::{ConfigValidator, ProviderConfig};
use crate::data_sources::{
    ApiKeyDataSource, ContainerDataSource, ContainerRegistryDataSource, DataSourceHandler,
    EnvironmentDataSource, GitOpsSyncDataSource, GitRepositoryDataSource, JobSchedulesDataSource,
    NetworkDataSource, NotificationDataSource, ProjectPathDataSource, SettingsDataSource,
    TemplateDataSource, TemplateRegistryDataSource, UserDataSource, VolumeDataSource,
};
use crate::error::{ResourceError, Result};
use crate::resources::{
    ApiKeyResource, ContainerRegistryResource, ContainerResource, EnvironmentResource,
    GitOpsSyncResource, GitRepositoryResource, JobSchedulesResource, NetworkResource,
    NotificationResource, ProjectPathResource, ProjectResource, ProjectStateResource,
    ResourceHandler, SettingsResource, TemplateRegistryResource, TemplateResource, UserResource,
    VolumeResource,
};
use crate::schema::{Attribute, AttributeType, Schema};

/// Matches `arcane_project` and its short form `project`.
fn matches(type_name: &str, name: &str) -> bool {
    type_name == name
        || type_name
            .strip_prefix(ArcaneProvider::TYPE_NAME)
            .and_then(|rest| rest.strip_prefix('_'))
            == Some(name)
}

/// A configured provider.
pub struct ArcaneProvider {
    client: ArcaneClient,
    resources: Vec<Box<dyn ResourceHandler>>,
    data_sources: Vec<Box<dyn DataSourceHandler>>,
}

impl std::fmt::Debug for ArcaneProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcaneProvider")
            .field("client", &self.client)
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .finish()
    }
}

impl ArcaneProvider {
    /// Provider type name; every resource is named `arcane_<name>`.
    pub const TYPE_NAME: &'static str = "arcane";

    /// Provider configuration schema.
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new("Manages an Arcane container platform.")
            .attribute(
                Attribute::optional("endpoint", AttributeType::String)
                    .describe("Base API URL. Defaults to http://localhost:3552/api."),
            )
            .attribute(
                Attribute::optional("api_key", AttributeType::String)
                    .sensitive()
                    .describe("API key. Falls back to ARCANE_API_KEY."),
            )
            .attribute(
                Attribute::optional("http_timeout", AttributeType::String)
                    .describe("Request timeout such as 90s or 2m. Defaults to 120s."),
            )
    }

    /// Resolves the configuration (with the `ARCANE_API_KEY` fallback) and
    /// builds the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no API key is set.
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        Self::configure_with(config, &ConfigValidator::new())
    }

    /// Like [`configure`](Self::configure) with an explicit validator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no API key is set.
    pub fn configure_with(config: &ProviderConfig, validator: &ConfigValidator) -> Result<Self> {
        let settings = validator.resolve(config)?;
        info!(
            "Configuring Arcane provider for {} (timeout {:?})",
            settings.endpoint, settings.timeout
        );
        Ok(Self::new(ArcaneClient::from_settings(&settings)?))
    }

    /// Builds the provider around an existing client.
    #[must_use]
    pub fn new(client: ArcaneClient) -> Self {
        let resources: Vec<Box<dyn ResourceHandler>> = vec![
            Box::new(UserResource::new(client.clone())),
            Box::new(EnvironmentResource::new(client.clone())),
            Box::new(ProjectResource::new(client.clone())),
            Box::new(ProjectStateResource::new(client.clone())),
            Box::new(ProjectPathResource::new(client.clone())),
            Box::new(ContainerResource::new(client.clone())),
            Box::new(NetworkResource::new(client.clone())),
            Box::new(VolumeResource::new(client.clone())),
            Box::new(ContainerRegistryResource::new(client.clone())),
            Box::new(GitRepositoryResource::new(client.clone())),
            Box::new(GitOpsSyncResource::new(client.clone())),
            Box::new(ApiKeyResource::new(client.clone())),
            Box::new(TemplateResource::new(client.clone())),
            Box::new(TemplateRegistryResource::new(client.clone())),
            Box::new(NotificationResource::new(client.clone())),
            Box::new(SettingsResource::new(client.clone())),
            Box::new(JobSchedulesResource::new(client.clone())),
        ];
        let data_sources: Vec<Box<dyn DataSourceHandler>> = vec![
            Box::new(ApiKeyDataSource::new(client.clone())),
            Box::new(ContainerDataSource::new(client.clone())),
            Box::new(EnvironmentDataSource::new(client.clone())),
            Box::new(GitRepositoryDataSource::new(client.clone())),
            Box::new(GitOpsSyncDataSource::new(client.clone())),
            Box::new(JobSchedulesDataSource::new(client.clone())),
            Box::new(NetworkDataSource::new(client.clone())),
            Box::new(NotificationDataSource::new(client.clone())),
            Box::new(ProjectPathDataSource::new(client.clone())),
            Box::new(ContainerRegistryDataSource::new(client.clone())),
            Box::new(SettingsDataSource::new(client.clone())),
            Box::new(TemplateDataSource::new(client.clone())),
            Box::new(TemplateRegistryDataSource::new(client.clone())),
            Box::new(UserDataSource::new(client.clone())),
            Box::new(VolumeDataSource::new(client.clone())),
        ];
        debug!(
            "Registered {} resources and {} data sources",
            resources.len(),
            data_sources.len()
        );

        Self {
            client,
            resources,
            data_sources,
        }
    }

    /// The shared API client.
    #[must_use]
    pub const fn client(&self) -> &ArcaneClient {
        &self.client
    }

    /// Every registered resource type.
    #[must_use]
    pub fn resources(&self) -> &[Box<dyn ResourceHandler>] {
        &self.resources
    }

    /// Every registered data source type.
    #[must_use]
    pub fn data_sources(&self) -> &[Box<dyn DataSourceHandler>] {
        &self.data_sources
    }

    /// Finds a resource by full (`arcane_project`) or short (`project`) name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownType`] if nothing matches.
    pub fn resource(&self, name: &str) -> Result<&dyn ResourceHandler> {
        self.resources
            .iter()
            .find(|r| matches(r.type_name(), name))
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                ResourceError::UnknownType {
                    category: "resource",
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Finds a data source by full or short name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownType`] if nothing matches.
    pub fn data_source(&self, name: &str) -> Result<&dyn DataSourceHandler> {
        self.data_sources
            .iter()
            .find(|d| matches(d.type_name(), name))
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                ResourceError::UnknownType {
                    category: "data source",
                    name: name.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn provider() -> ArcaneProvider {
        let client = ArcaneClient::new("http://localhost:3552/api", "key").expect("client");
        ArcaneProvider::new(client)
    }

    #[test]
    fn test_registers_every_type_once() {
        let provider = provider();
        let resources: BTreeSet<_> = provider.resources().iter().map(|r| r.type_name()).collect();
        let data_sources: BTreeSet<_> =
            provider.data_sources().iter().map(|d| d.type_name()).collect();

        assert_eq!(resources.len(), 17);
        assert_eq!(data_sources.len(), 15);
        assert!(resources.iter().all(|name| name.starts_with("arcane_")));
        assert!(data_sources.contains("arcane_gitops_sync"));
    }

    #[test]
    fn test_lookup_by_full_and_short_name() {
        let provider = provider();
        assert_eq!(
            provider.resource("arcane_project").expect("full").type_name(),
            "arcane_project"
        );
        assert_eq!(
            provider.resource("project_state").expect("short").type_name(),
            "arcane_project_state"
        );
        let Err(err) = provider.data_source("nope") else {
            panic!("unknown data source resolved");
        };
        assert_eq!(err.to_string(), "unknown data source type: nope");
        let Err(err) = provider.resource("arcane_nope") else {
            panic!("unknown resource resolved");
        };
        assert_eq!(err.to_string(), "unknown resource type: arcane_nope");
    }

    #[test]
    fn test_configure_requires_api_key() {
        let validator = ConfigValidator::with_env_api_key(None);
        let err = ArcaneProvider::configure_with(&ProviderConfig::default(), &validator)
            .expect_err("no key");
        assert!(err.to_string().to_lowercase().contains("api key"));
    }

    #[test]
    fn test_configure_with_env_key() {
        let validator = ConfigValidator::with_env_api_key(Some("from-env".to_string()));
        let config = ProviderConfig {
            endpoint: Some("https://arcane.example.com/api".to_string()),
            ..ProviderConfig::default()
        };
        let provider = ArcaneProvider::configure_with(&config, &validator).expect("configured");
        assert_eq!(
            provider.client().base_url().as_str(),
            "https://arcane.example.com/api/"
        );
    }
}
