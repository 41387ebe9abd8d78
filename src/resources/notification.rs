//! `arcane_notification`: settings of one notification provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::info;

use super::{Resource, found, gone, map_or_null, split_import_id};
use crate::api::{ArcaneClient, NotificationUpdate};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// Renders provider configuration values as strings.
///
/// Strings pass through; everything else uses its JSON text (`true`, `5`).
/// An empty configuration becomes `None`.
pub(crate) fn stringify_config(config: Map<String, Value>) -> Option<BTreeMap<String, String>> {
    let values = config
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect();
    map_or_null(Some(values))
}

/// State of an `arcane_notification`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationModel {
    /// `env_id:provider`.
    pub id: String,
    /// Owning environment.
    pub environment_id: String,
    /// Provider key (`discord`, `email`, `slack`, ...).
    pub provider_name: String,
    /// Whether the provider is active.
    pub enabled: bool,
    /// Provider-specific configuration.
    pub config: Option<BTreeMap<String, String>>,
}

impl NotificationModel {
    fn request(&self, provider: &str) -> NotificationUpdate {
        NotificationUpdate {
            provider: provider.to_string(),
            enabled: self.enabled,
            config: self
                .config
                .iter()
                .flatten()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        }
    }
}

/// Manages notification provider settings.
#[derive(Debug, Clone)]
pub struct NotificationResource {
    client: ArcaneClient,
}

impl NotificationResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for NotificationResource {
    type Model = NotificationModel;

    fn type_name(&self) -> &'static str {
        "arcane_notification"
    }

    fn schema(&self) -> Schema {
        Schema::new("Notification provider settings for an environment.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace())
            .attribute(
                Attribute::required("provider_name", AttributeType::String)
                    .replace()
                    .describe("Provider key, e.g. discord, email, slack."),
            )
            .attribute(Attribute::required("enabled", AttributeType::Bool))
            .attribute(Attribute::optional("config", AttributeType::StringMap).sensitive())
    }

    async fn create(&self, plan: NotificationModel) -> Result<NotificationModel> {
        let request = plan.request(&plan.provider_name);
        info!(
            "Configuring {} notifications in environment {}",
            request.provider, plan.environment_id
        );
        let settings = self
            .client
            .upsert_notification(&plan.environment_id, &request)
            .await
            .context("upsert notification")?;

        Ok(NotificationModel {
            id: format!("{}:{}", plan.environment_id, settings.provider),
            environment_id: plan.environment_id,
            provider_name: settings.provider,
            enabled: settings.enabled,
            config: stringify_config(settings.config),
        })
    }

    async fn read(&self, mut state: NotificationModel) -> Result<Option<NotificationModel>> {
        let Some(settings) = found(
            self.client
                .get_notification(&state.environment_id, &state.provider_name)
                .await,
            "notification",
            &state.provider_name,
        )
        .context("read notification")?
        else {
            return Ok(None);
        };
        state.enabled = settings.enabled;
        state.config = stringify_config(settings.config);
        state.id = format!("{}:{}", state.environment_id, state.provider_name);
        Ok(Some(state))
    }

    async fn update(
        &self,
        plan: NotificationModel,
        mut state: NotificationModel,
    ) -> Result<NotificationModel> {
        let request = plan.request(&state.provider_name);
        info!(
            "Updating {} notifications in environment {}",
            request.provider, state.environment_id
        );
        let settings = self
            .client
            .upsert_notification(&state.environment_id, &request)
            .await
            .context("upsert notification")?;

        state.enabled = settings.enabled;
        state.config = stringify_config(settings.config);
        Ok(state)
    }

    async fn delete(&self, state: NotificationModel) -> Result<()> {
        info!(
            "Removing {} notifications from environment {}",
            state.provider_name, state.environment_id
        );
        gone(
            self.client
                .delete_notification(&state.environment_id, &state.provider_name)
                .await,
            "notification",
            &state.provider_name,
        )
        .context("delete notification")
    }

    async fn import(&self, id: &str) -> Result<NotificationModel> {
        let (environment_id, provider_name) = split_import_id(id, &[':'], "env_id:provider")?;
        Ok(NotificationModel {
            id: id.to_string(),
            environment_id,
            provider_name,
            ..NotificationModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, NotificationResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, NotificationResource::new(client))
    }

    #[test]
    fn test_stringify_config() {
        let config = json!({"url": "https://x", "tls": true, "port": 587});
        let Value::Object(config) = config else {
            panic!("object literal");
        };
        let values = stringify_config(config).expect("non-empty");
        assert_eq!(values["url"], "https://x");
        assert_eq!(values["tls"], "true");
        assert_eq!(values["port"], "587");
        assert_eq!(stringify_config(Map::new()), None);
    }

    #[tokio::test]
    async fn test_create_upserts_and_builds_id() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/notifications/settings"))
            .and(body_json(json!({
                "provider": "email",
                "enabled": true,
                "config": {"smtpHost": "mail.example.com"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "provider": "email",
                "enabled": true,
                "config": {"smtpHost": "mail.example.com", "smtpTls": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let plan = NotificationModel {
            environment_id: "0".into(),
            provider_name: "email".into(),
            enabled: true,
            config: Some(BTreeMap::from([(
                "smtpHost".to_string(),
                "mail.example.com".to_string(),
            )])),
            ..NotificationModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.id, "0:email");
        let config = state.config.expect("config");
        assert_eq!(config.get("smtpTls").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn test_update_upserts_with_state_provider() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/environments/0/notifications/settings"))
            .and(body_json(json!({"provider": "discord", "enabled": false, "config": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "provider": "discord",
                "enabled": false,
                "config": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = resource.import("0:discord").await.expect("import");
        let plan = NotificationModel {
            enabled: false,
            ..state.clone()
        };
        let updated = resource.update(plan, state).await.expect("update");
        assert!(!updated.enabled);
        assert_eq!(updated.config, None);
        assert_eq!(updated.id, "0:discord");
    }
}
