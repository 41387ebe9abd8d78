//! `arcane_environment`: a Docker host managed through an Arcane agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone};
use crate::api::{ArcaneClient, CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_environment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentModel {
    /// Environment ID.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Agent API URL.
    pub api_url: String,
    /// Agent access token; kept as configured.
    pub access_token: Option<String>,
    /// Agent bootstrap token; kept as configured.
    pub bootstrap_token: Option<String>,
    /// Generate an API key for agent pairing.
    pub use_api_key: Option<bool>,
    /// Ask for a fresh agent API key on the next update.
    pub regenerate_api_key: Option<bool>,
    /// Whether the environment is enabled.
    pub enabled: Option<bool>,
    /// Connection status.
    pub status: Option<String>,
    /// Agent API key, only known when the server generated one.
    pub api_key: Option<String>,
}

impl EnvironmentModel {
    fn refresh(&mut self, environment: &Environment) {
        self.name = Some(environment.name.clone());
        self.api_url.clone_from(&environment.api_url);
        self.status = Some(environment.status.clone());
        self.enabled = Some(environment.enabled);
    }
}

/// Manages Arcane environments.
#[derive(Debug, Clone)]
pub struct EnvironmentResource {
    client: ArcaneClient,
}

impl EnvironmentResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for EnvironmentResource {
    type Model = EnvironmentModel;

    fn type_name(&self) -> &'static str {
        "arcane_environment"
    }

    fn schema(&self) -> Schema {
        Schema::new("An Arcane environment (remote Docker host).")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::optional("name", AttributeType::String))
            .attribute(
                Attribute::required("api_url", AttributeType::String)
                    .describe("Agent API URL (e.g. http://host:agent-port)."),
            )
            .attribute(Attribute::optional("access_token", AttributeType::String).sensitive())
            .attribute(Attribute::optional("bootstrap_token", AttributeType::String).sensitive())
            .attribute(
                Attribute::optional("use_api_key", AttributeType::Bool)
                    .describe("Generate an API key for agent pairing."),
            )
            .attribute(
                Attribute::optional("regenerate_api_key", AttributeType::Bool)
                    .describe("Issue a new agent API key when the environment is updated."),
            )
            .attribute(Attribute::optional("enabled", AttributeType::Bool))
            .attribute(Attribute::computed("status", AttributeType::String))
            .attribute(
                Attribute::computed("api_key", AttributeType::String)
                    .sensitive()
                    .describe("Pairing API key, only returned when generated."),
            )
    }

    async fn create(&self, plan: EnvironmentModel) -> Result<EnvironmentModel> {
        let request = CreateEnvironmentRequest {
            api_url: plan.api_url.clone(),
            name: plan.name.clone(),
            access_token: plan.access_token.clone(),
            bootstrap_token: plan.bootstrap_token.clone(),
            enabled: plan.enabled,
            use_api_key: plan.use_api_key,
        };

        info!("Creating environment for {}", request.api_url);
        let environment = self
            .client
            .create_environment(&request)
            .await
            .context("create environment")?;

        Ok(EnvironmentModel {
            id: environment.id,
            api_url: environment.api_url,
            status: Some(environment.status),
            api_key: environment.api_key.filter(|k| !k.is_empty()),
            ..plan
        })
    }

    async fn read(&self, mut state: EnvironmentModel) -> Result<Option<EnvironmentModel>> {
        let Some(environment) = found(
            self.client.get_environment(&state.id).await,
            "environment",
            &state.id,
        )
        .context("read environment")?
        else {
            return Ok(None);
        };
        state.refresh(&environment);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: EnvironmentModel,
        mut state: EnvironmentModel,
    ) -> Result<EnvironmentModel> {
        let request = UpdateEnvironmentRequest {
            api_url: Some(plan.api_url.clone()),
            name: plan.name.clone(),
            access_token: plan.access_token.clone(),
            bootstrap_token: plan.bootstrap_token.clone(),
            enabled: plan.enabled,
            regenerate_api_key: plan.regenerate_api_key.filter(|r| *r),
        };

        info!("Updating environment {}", state.id);
        let environment = self
            .client
            .update_environment(&state.id, &request)
            .await
            .context("update environment")?;

        state.refresh(&environment);
        if plan.access_token.is_some() {
            state.access_token = plan.access_token;
        }
        if plan.bootstrap_token.is_some() {
            state.bootstrap_token = plan.bootstrap_token;
        }
        if plan.use_api_key.is_some() {
            state.use_api_key = plan.use_api_key;
        }
        state.regenerate_api_key = plan.regenerate_api_key;
        if let Some(key) = environment.api_key.filter(|k| !k.is_empty()) {
            state.api_key = Some(key);
        }
        Ok(state)
    }

    async fn delete(&self, state: EnvironmentModel) -> Result<()> {
        info!("Deleting environment {}", state.id);
        gone(
            self.client.delete_environment(&state.id).await,
            "environment",
            &state.id,
        )
        .context("delete environment")
    }

    async fn import(&self, id: &str) -> Result<EnvironmentModel> {
        Ok(EnvironmentModel {
            id: id.to_string(),
            ..EnvironmentModel::default()
        })
    }
}
