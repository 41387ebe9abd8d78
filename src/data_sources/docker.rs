//! Containers, networks and volumes of an environment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::resources::map_or_null;
use crate::schema::{Attribute, AttributeType, Schema};

fn environment_lookup(description: &'static str) -> Schema {
    Schema::new(description)
        .attribute(Attribute::required("environment_id", AttributeType::String))
        .attribute(Attribute::required("id", AttributeType::String))
}

/// Attributes of `data.arcane_container`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerData {
    /// Environment to search.
    pub environment_id: String,
    /// Container ID.
    pub id: String,
    /// Container name.
    pub name: Option<String>,
    /// Image reference.
    pub image: Option<String>,
    /// Creation timestamp.
    pub created: Option<String>,
    /// Runtime status.
    pub status: Option<String>,
}

/// Looks up a container.
#[derive(Debug, Clone)]
pub struct ContainerDataSource {
    client: ArcaneClient,
}

impl ContainerDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ContainerDataSource {
    type Model = ContainerData;

    fn type_name(&self) -> &'static str {
        "arcane_container"
    }

    fn schema(&self) -> Schema {
        environment_lookup("Looks up a container in an environment.")
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("image", AttributeType::String))
            .attribute(Attribute::computed("created", AttributeType::String))
            .attribute(Attribute::computed("status", AttributeType::String))
    }

    async fn read(&self, config: ContainerData) -> Result<ContainerData> {
        let container = lookup(
            self.client
                .get_container(&config.environment_id, &config.id)
                .await,
            "container",
        )?;
        Ok(ContainerData {
            environment_id: config.environment_id,
            id: container.id,
            name: Some(container.name),
            image: Some(container.image),
            created: Some(container.created),
            status: Some(container.status),
        })
    }
}

/// Attributes of `data.arcane_network`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkData {
    /// Environment to search.
    pub environment_id: String,
    /// Network ID.
    pub id: String,
    /// Network name.
    pub name: Option<String>,
    /// Driver.
    pub driver: Option<String>,
    /// Attachable flag.
    pub attachable: Option<bool>,
    /// Internal flag.
    pub internal: Option<bool>,
    /// IPv4 enabled.
    pub enable_ipv4: Option<bool>,
    /// IPv6 enabled.
    pub enable_ipv6: Option<bool>,
    /// Scope.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created: Option<String>,
    /// Labels.
    pub labels: Option<BTreeMap<String, String>>,
    /// Driver options.
    pub options: Option<BTreeMap<String, String>>,
}

/// Looks up a network.
#[derive(Debug, Clone)]
pub struct NetworkDataSource {
    client: ArcaneClient,
}

impl NetworkDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for NetworkDataSource {
    type Model = NetworkData;

    fn type_name(&self) -> &'static str {
        "arcane_network"
    }

    fn schema(&self) -> Schema {
        environment_lookup("Looks up a Docker network in an environment.")
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("driver", AttributeType::String))
            .attribute(Attribute::computed("attachable", AttributeType::Bool))
            .attribute(Attribute::computed("internal", AttributeType::Bool))
            .attribute(Attribute::computed("enable_ipv4", AttributeType::Bool))
            .attribute(Attribute::computed("enable_ipv6", AttributeType::Bool))
            .attribute(Attribute::computed("scope", AttributeType::String))
            .attribute(Attribute::computed("created", AttributeType::String))
            .attribute(Attribute::computed("labels", AttributeType::StringMap))
            .attribute(Attribute::computed("options", AttributeType::StringMap))
    }

    async fn read(&self, config: NetworkData) -> Result<NetworkData> {
        let network = lookup(
            self.client
                .get_network(&config.environment_id, &config.id)
                .await,
            "network",
        )?;
        Ok(NetworkData {
            environment_id: config.environment_id,
            id: network.id,
            name: Some(network.name),
            driver: Some(network.driver),
            attachable: Some(network.attachable),
            internal: Some(network.internal),
            enable_ipv4: Some(network.enable_ipv4),
            enable_ipv6: Some(network.enable_ipv6),
            scope: Some(network.scope),
            created: Some(network.created),
            labels: map_or_null(network.labels),
            options: map_or_null(network.options),
        })
    }
}

/// Attributes of `data.arcane_volume`. Volumes are identified by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeData {
    /// Environment to search.
    pub environment_id: String,
    /// Volume name.
    pub id: String,
    /// Volume name as reported by the API.
    pub name: Option<String>,
    /// Driver.
    pub driver: Option<String>,
    /// Driver options.
    pub driver_opts: Option<BTreeMap<String, String>>,
    /// Labels.
    pub labels: Option<BTreeMap<String, String>>,
    /// Host mount point.
    pub mountpoint: Option<String>,
    /// Scope.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

/// Looks up a volume.
#[derive(Debug, Clone)]
pub struct VolumeDataSource {
    client: ArcaneClient,
}

impl VolumeDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for VolumeDataSource {
    type Model = VolumeData;

    fn type_name(&self) -> &'static str {
        "arcane_volume"
    }

    fn schema(&self) -> Schema {
        environment_lookup("Looks up a Docker volume by name.")
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("driver", AttributeType::String))
            .attribute(Attribute::computed("driver_opts", AttributeType::StringMap))
            .attribute(Attribute::computed("labels", AttributeType::StringMap))
            .attribute(Attribute::computed("mountpoint", AttributeType::String))
            .attribute(Attribute::computed("scope", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
    }

    async fn read(&self, config: VolumeData) -> Result<VolumeData> {
        let volume = lookup(
            self.client
                .get_volume(&config.environment_id, &config.id)
                .await,
            "volume",
        )?;
        Ok(VolumeData {
            environment_id: config.environment_id,
            id: volume.name.clone(),
            name: Some(volume.name),
            driver: Some(volume.driver),
            driver_opts: map_or_null(volume.options),
            labels: map_or_null(volume.labels),
            mountpoint: Some(volume.mountpoint),
            scope: Some(volume.scope),
            created_at: Some(volume.created_at),
        })
    }
}
