//! `arcane_network`: a Docker network. Networks are immutable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::{Resource, found, gone, split_import_id};
use crate::api::{ArcaneClient, CreateNetworkRequest, Network, NetworkCreateOptions};
use crate::error::{ResourceError, Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_network`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkModel {
    /// Network ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Network name.
    pub name: String,
    /// Driver (`bridge` when unset).
    pub driver: Option<String>,
    /// Allow manual container attachment.
    pub attachable: Option<bool>,
    /// Restrict external access.
    pub internal: Option<bool>,
    /// IPv4 enabled.
    pub enable_ipv4: Option<bool>,
    /// IPv6 enabled.
    pub enable_ipv6: Option<bool>,
    /// Reject duplicate names.
    pub check_duplicate: Option<bool>,
    /// Swarm routing mesh.
    pub ingress: Option<bool>,
    /// Labels, as configured.
    pub labels: Option<BTreeMap<String, String>>,
    /// Driver options, as configured.
    pub options: Option<BTreeMap<String, String>>,
    /// `local` or `swarm`.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created: Option<String>,
}

impl NetworkModel {
    fn refresh(&mut self, network: Network) {
        self.id = network.id;
        self.name = network.name;
        self.driver = Some(network.driver);
        self.attachable = Some(network.attachable);
        self.internal = Some(network.internal);
        self.enable_ipv4 = Some(network.enable_ipv4);
        self.enable_ipv6 = Some(network.enable_ipv6);
        self.scope = Some(network.scope);
        self.created = Some(network.created);
    }
}

/// Manages Docker networks.
#[derive(Debug, Clone)]
pub struct NetworkResource {
    client: ArcaneClient,
}

impl NetworkResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for NetworkResource {
    type Model = NetworkModel;

    fn type_name(&self) -> &'static str {
        "arcane_network"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages a Docker network for container communication.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace())
            .attribute(Attribute::required("name", AttributeType::String).replace())
            .attribute(
                Attribute::optional_computed("driver", AttributeType::String)
                    .replace()
                    .describe("Network driver (bridge, overlay, host, macvlan)."),
            )
            .attribute(Attribute::optional_computed("attachable", AttributeType::Bool).replace())
            .attribute(Attribute::optional_computed("internal", AttributeType::Bool).replace())
            .attribute(Attribute::computed("enable_ipv4", AttributeType::Bool))
            .attribute(Attribute::optional_computed("enable_ipv6", AttributeType::Bool).replace())
            .attribute(Attribute::optional("check_duplicate", AttributeType::Bool).replace())
            .attribute(Attribute::optional("ingress", AttributeType::Bool).replace())
            .attribute(Attribute::optional("labels", AttributeType::StringMap).replace())
            .attribute(Attribute::optional("options", AttributeType::StringMap).replace())
            .attribute(Attribute::computed("scope", AttributeType::String))
            .attribute(Attribute::computed("created", AttributeType::String))
    }

    async fn create(&self, plan: NetworkModel) -> Result<NetworkModel> {
        let request = CreateNetworkRequest {
            name: plan.name.clone(),
            options: NetworkCreateOptions {
                driver: plan.driver.clone(),
                attachable: plan.attachable,
                internal: plan.internal,
                enable_ipv6: plan.enable_ipv6,
                check_duplicate: plan.check_duplicate,
                ingress: plan.ingress,
                labels: plan.labels.clone(),
                options: plan.options.clone(),
            },
        };

        info!(
            "Creating network {} in environment {}",
            request.name, plan.environment_id
        );
        let created = self
            .client
            .create_network(&plan.environment_id, &request)
            .await
            .context("create network")?;
        let network = self
            .client
            .get_network(&plan.environment_id, &created.id)
            .await
            .context("read network after create")?;

        let mut state = plan;
        state.refresh(network);
        Ok(state)
    }

    async fn read(&self, mut state: NetworkModel) -> Result<Option<NetworkModel>> {
        let Some(network) = found(
            self.client
                .get_network(&state.environment_id, &state.id)
                .await,
            "network",
            &state.id,
        )
        .context("read network")?
        else {
            return Ok(None);
        };
        state.refresh(network);
        Ok(Some(state))
    }

    async fn update(&self, _plan: NetworkModel, _state: NetworkModel) -> Result<NetworkModel> {
        Err(ResourceError::UpdateNotSupported { kind: "network" }.into())
    }

    async fn delete(&self, state: NetworkModel) -> Result<()> {
        info!("Deleting network {}", state.id);
        gone(
            self.client
                .delete_network(&state.environment_id, &state.id)
                .await,
            "network",
            &state.id,
        )
        .context("delete network")
    }

    async fn import(&self, id: &str) -> Result<NetworkModel> {
        let (environment_id, network_id) =
            split_import_id(id, &['/', ':'], "environment_id/network_id")?;
        Ok(NetworkModel {
            id: network_id,
            environment_id,
            ..NetworkModel::default()
        })
    }
}
