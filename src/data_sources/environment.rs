//! Environments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::resources::non_empty;
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_environment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentData {
    /// Lookup key.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Agent API URL.
    pub api_url: Option<String>,
    /// Connection status.
    pub status: Option<String>,
    /// Whether the environment is enabled.
    pub enabled: Option<bool>,
    /// Agent API key, when the server returns one.
    pub api_key: Option<String>,
}

/// Looks up an environment by ID.
#[derive(Debug, Clone)]
pub struct EnvironmentDataSource {
    client: ArcaneClient,
}

impl EnvironmentDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for EnvironmentDataSource {
    type Model = EnvironmentData;

    fn type_name(&self) -> &'static str {
        "arcane_environment"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up an Arcane environment.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("api_url", AttributeType::String))
            .attribute(Attribute::computed("status", AttributeType::String))
            .attribute(Attribute::computed("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("api_key", AttributeType::String).sensitive())
    }

    async fn read(&self, config: EnvironmentData) -> Result<EnvironmentData> {
        let environment = lookup(self.client.get_environment(&config.id).await, "environment")?;
        Ok(EnvironmentData {
            api_key: non_empty(environment.api_key.as_ref()),
            id: environment.id,
            name: Some(environment.name),
            api_url: Some(environment.api_url),
            status: Some(environment.status),
            enabled: Some(environment.enabled),
        })
    }
}
