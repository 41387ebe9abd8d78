//! `arcane_container`: a standalone container.
//!
//! Every configuration attribute forces replacement; only the delete
//! behaviour flags can change in place.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::{Resource, found, gone, split_import_id};
use crate::api::{ArcaneClient, CreateContainerRequest, normalize_ports};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_container`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerModel {
    /// Container ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Remove the container when it exits.
    pub auto_remove: Option<bool>,
    /// Command override.
    pub command: Option<Vec<String>>,
    /// CPU limit.
    pub cpus: Option<f64>,
    /// Entrypoint override.
    pub entrypoint: Option<Vec<String>>,
    /// `KEY=VALUE` environment entries.
    pub environment: Option<Vec<String>>,
    /// Memory limit in bytes.
    pub memory: Option<i64>,
    /// Networks to attach.
    pub networks: Option<Vec<String>>,
    /// Container port to host port, as configured.
    pub ports: Option<BTreeMap<String, String>>,
    /// Run privileged.
    pub privileged: Option<bool>,
    /// Restart policy name.
    pub restart_policy: Option<String>,
    /// User to run as.
    pub user: Option<String>,
    /// Volume bindings.
    pub volumes: Option<Vec<String>>,
    /// Working directory.
    pub working_dir: Option<String>,
    /// Hostname.
    pub hostname: Option<String>,
    /// Domain name.
    pub domain_name: Option<String>,
    /// Labels.
    pub labels: Option<BTreeMap<String, String>>,
    /// Allocate a TTY.
    pub tty: Option<bool>,
    /// Attach stdin.
    pub attach_stdin: Option<bool>,
    /// Attach stdout.
    pub attach_stdout: Option<bool>,
    /// Attach stderr.
    pub attach_stderr: Option<bool>,
    /// Keep stdin open.
    pub open_stdin: Option<bool>,
    /// Close stdin after the first client detaches.
    pub stdin_once: Option<bool>,
    /// Disable networking.
    pub network_disabled: Option<bool>,
    /// Creation timestamp.
    pub created: Option<String>,
    /// Runtime status.
    pub status: Option<String>,
    /// Force removal of a running container.
    pub force_delete: Option<bool>,
    /// Remove anonymous volumes with the container.
    pub remove_volumes: Option<bool>,
}

impl ContainerModel {
    fn to_request(&self) -> CreateContainerRequest {
        CreateContainerRequest {
            name: self.name.clone(),
            image: self.image.clone(),
            auto_remove: self.auto_remove,
            command: self.command.clone().unwrap_or_default(),
            cpus: self.cpus,
            entrypoint: self.entrypoint.clone().unwrap_or_default(),
            environment: self.environment.clone().unwrap_or_default(),
            memory: self.memory,
            networks: self.networks.clone().unwrap_or_default(),
            ports: self
                .ports
                .as_ref()
                .map(normalize_ports)
                .unwrap_or_default(),
            privileged: self.privileged,
            restart_policy: self.restart_policy.clone(),
            user: self.user.clone(),
            volumes: self.volumes.clone().unwrap_or_default(),
            working_dir: self.working_dir.clone(),
            hostname: self.hostname.clone(),
            domainname: self.domain_name.clone(),
            labels: self.labels.clone(),
            tty: self.tty,
            attach_stdin: self.attach_stdin,
            attach_stdout: self.attach_stdout,
            attach_stderr: self.attach_stderr,
            open_stdin: self.open_stdin,
            stdin_once: self.stdin_once,
            network_disabled: self.network_disabled,
        }
    }
}

/// Manages standalone containers.
#[derive(Debug, Clone)]
pub struct ContainerResource {
    client: ArcaneClient,
}

impl ContainerResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ContainerResource {
    type Model = ContainerModel;

    fn type_name(&self) -> &'static str {
        "arcane_container"
    }

    fn schema(&self) -> Schema {
        use AttributeType::{Bool, Float64, Int64, String as Str, StringList, StringMap};

        let mut schema = Schema::new("A standalone Docker container.")
            .attribute(Attribute::computed("id", Str))
            .attribute(Attribute::required("environment_id", Str).describe("Environment ID"))
            .attribute(Attribute::required("name", Str).replace().describe("Container name"))
            .attribute(Attribute::required("image", Str).replace().describe("Image"));

        let replaced = [
            ("auto_remove", Bool),
            ("command", StringList),
            ("cpus", Float64),
            ("entrypoint", StringList),
            ("environment", StringList),
            ("memory", Int64),
            ("networks", StringList),
            ("ports", StringMap),
            ("privileged", Bool),
            ("restart_policy", Str),
            ("user", Str),
            ("volumes", StringList),
            ("working_dir", Str),
            ("hostname", Str),
            ("domain_name", Str),
            ("labels", StringMap),
            ("tty", Bool),
            ("attach_stdin", Bool),
            ("attach_stdout", Bool),
            ("attach_stderr", Bool),
            ("open_stdin", Bool),
            ("stdin_once", Bool),
            ("network_disabled", Bool),
        ];
        for (name, kind) in replaced {
            schema = schema.attribute(Attribute::optional(name, kind).replace());
        }

        schema
            .attribute(Attribute::computed("created", Str))
            .attribute(Attribute::computed("status", Str))
            .attribute(
                Attribute::optional("force_delete", Bool)
                    .describe("Force delete running container"),
            )
            .attribute(
                Attribute::optional("remove_volumes", Bool).describe("Remove volumes on delete"),
            )
    }

    async fn create(&self, plan: ContainerModel) -> Result<ContainerModel> {
        let request = plan.to_request();
        info!(
            "Creating container {} ({}) in environment {}",
            request.name, request.image, plan.environment_id
        );
        let container = self
            .client
            .create_container(&plan.environment_id, &request)
            .await
            .context("create container")?;

        Ok(ContainerModel {
            id: container.id,
            created: Some(container.created),
            status: Some(container.status),
            ..plan
        })
    }

    async fn read(&self, mut state: ContainerModel) -> Result<Option<ContainerModel>> {
        let Some(container) = found(
            self.client
                .get_container(&state.environment_id, &state.id)
                .await,
            "container",
            &state.id,
        )
        .context("read container")?
        else {
            return Ok(None);
        };
        state.name = container.name;
        state.image = container.image;
        state.created = Some(container.created);
        state.status = Some(container.status);
        Ok(Some(state))
    }

    async fn update(&self, plan: ContainerModel, state: ContainerModel) -> Result<ContainerModel> {
        Ok(ContainerModel {
            force_delete: plan.force_delete,
            remove_volumes: plan.remove_volumes,
            ..state
        })
    }

    async fn delete(&self, state: ContainerModel) -> Result<()> {
        info!("Deleting container {}", state.id);
        gone(
            self.client
                .delete_container(
                    &state.environment_id,
                    &state.id,
                    state.force_delete.unwrap_or(false),
                    state.remove_volumes.unwrap_or(false),
                )
                .await,
            "container",
            &state.id,
        )
        .context("delete container")
    }

    async fn import(&self, id: &str) -> Result<ContainerModel> {
        let (environment_id, container_id) = split_import_id(id, &[':'], "env_id:container_id")?;
        Ok(ContainerModel {
            id: container_id,
            environment_id,
            ..ContainerModel::default()
        })
    }
}
