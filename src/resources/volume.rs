//! `arcane_volume`: a named Docker volume.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::{Resource, found, gone, list_or_null, split_import_id};
use crate::api::{ArcaneClient, CreateVolumeRequest, Volume};
use crate::error::{ResourceError, Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_volume`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeModel {
    /// Volume ID.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Volume name; the API addresses volumes by name.
    pub name: String,
    /// Driver (`local` when unset).
    pub driver: Option<String>,
    /// Driver options, as configured.
    pub driver_opts: Option<BTreeMap<String, String>>,
    /// Labels, as configured.
    pub labels: Option<BTreeMap<String, String>>,
    /// Host mount point.
    pub mountpoint: Option<String>,
    /// Scope.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Whether a container uses the volume.
    pub in_use: Option<bool>,
    /// Size in bytes.
    pub size: Option<i64>,
    /// Containers using the volume.
    pub containers: Option<Vec<String>>,
}

impl VolumeModel {
    fn refresh(&mut self, volume: Volume) {
        self.id = volume.id;
        self.name = volume.name;
        self.driver = Some(volume.driver);
        self.mountpoint = Some(volume.mountpoint);
        self.scope = Some(volume.scope);
        self.created_at = Some(volume.created_at);
        self.in_use = Some(volume.in_use);
        self.size = Some(volume.size);
        self.containers = list_or_null(volume.containers);
    }
}

/// Manages Docker volumes.
#[derive(Debug, Clone)]
pub struct VolumeResource {
    client: ArcaneClient,
}

impl VolumeResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for VolumeResource {
    type Model = VolumeModel;

    fn type_name(&self) -> &'static str {
        "arcane_volume"
    }

    fn schema(&self) -> Schema {
        Schema::new("Manages a Docker volume for persistent storage.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace())
            .attribute(Attribute::required("name", AttributeType::String).replace())
            .attribute(
                Attribute::optional_computed("driver", AttributeType::String)
                    .replace()
                    .describe("Volume driver (e.g. local, nfs)."),
            )
            .attribute(Attribute::optional("driver_opts", AttributeType::StringMap).replace())
            .attribute(Attribute::optional("labels", AttributeType::StringMap).replace())
            .attribute(Attribute::computed("mountpoint", AttributeType::String))
            .attribute(Attribute::computed("scope", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("in_use", AttributeType::Bool))
            .attribute(Attribute::computed("size", AttributeType::Int64))
            .attribute(Attribute::computed("containers", AttributeType::StringList))
    }

    async fn create(&self, plan: VolumeModel) -> Result<VolumeModel> {
        let request = CreateVolumeRequest {
            name: plan.name.clone(),
            driver: plan.driver.clone(),
            driver_opts: plan.driver_opts.clone(),
            labels: plan.labels.clone(),
        };

        info!(
            "Creating volume {} in environment {}",
            request.name, plan.environment_id
        );
        let volume = self
            .client
            .create_volume(&plan.environment_id, &request)
            .await
            .context("create volume")?;

        let mut state = plan;
        state.refresh(volume);
        Ok(state)
    }

    async fn read(&self, mut state: VolumeModel) -> Result<Option<VolumeModel>> {
        let Some(volume) = found(
            self.client
                .get_volume(&state.environment_id, &state.name)
                .await,
            "volume",
            &state.name,
        )
        .context("read volume")?
        else {
            return Ok(None);
        };
        state.refresh(volume);
        Ok(Some(state))
    }

    async fn update(&self, _plan: VolumeModel, _state: VolumeModel) -> Result<VolumeModel> {
        Err(ResourceError::UpdateNotSupported { kind: "volume" }.into())
    }

    async fn delete(&self, state: VolumeModel) -> Result<()> {
        info!("Deleting volume {}", state.name);
        gone(
            self.client
                .delete_volume(&state.environment_id, &state.name)
                .await,
            "volume",
            &state.name,
        )
        .context("delete volume")
    }

    async fn import(&self, id: &str) -> Result<VolumeModel> {
        let (environment_id, name) =
            split_import_id(id, &['/', ':'], "environment_id/volume_name")?;
        Ok(VolumeModel {
            environment_id,
            name,
            ..VolumeModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, VolumeResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, VolumeResource::new(client))
    }

    fn volume_json(containers: &[&str]) -> serde_json::Value {
        let in_use = !containers.is_empty();
        json!({
            "success": true,
            "data": {
                "id": "data",
                "name": "data",
                "driver": "local",
                "mountpoint": "/var/lib/docker/volumes/data/_data",
                "scope": "local",
                "createdAt": "2024-01-01T00:00:00Z",
                "inUse": in_use,
                "size": 4096,
                "containers": containers
            }
        })
    }

    #[tokio::test]
    async fn test_create_nulls_empty_containers() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/volumes"))
            .respond_with(ResponseTemplate::new(201).set_body_json(volume_json(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let plan = VolumeModel {
            environment_id: "0".into(),
            name: "data".into(),
            ..VolumeModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.containers, None);
        assert_eq!(state.size, Some(4096));
        assert_eq!(state.driver.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn test_read_by_name() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/volumes/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(volume_json(&["c1"])))
            .expect(1)
            .mount(&server)
            .await;

        let state = resource
            .import("0/data")
            .await
            .expect("import");
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.containers, Some(vec!["c1".to_string()]));
        assert_eq!(refreshed.in_use, Some(true));
    }

    #[tokio::test]
    async fn test_update_is_rejected() {
        let (_server, resource) = setup().await;
        tokio_test::assert_err!(
            resource
                .update(VolumeModel::default(), VolumeModel::default())
                .await
        );
    }
}
