//! `arcane_settings`: environment-wide settings.
//!
//! Every setting is an optional string attribute named in `snake_case`; the
//! API uses the `camelCase` form of the same name. Only the settings present
//! in the configuration are written. Deleting the resource leaves the
//! settings on the server untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{Resource, map_or_null};
use crate::api::ArcaneClient;
use crate::error::{ResourceError, Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// Settings managed by `arcane_settings`, in attribute form.
pub const SETTING_NAMES: [&str; 48] = [
    "accent_color",
    "auth_local_enabled",
    "auth_oidc_config",
    "auth_password_policy",
    "auth_session_timeout",
    "auto_inject_env",
    "auto_update",
    "auto_update_interval",
    "base_server_url",
    "default_shell",
    "disk_usage_path",
    "docker_api_timeout",
    "docker_host",
    "docker_image_pull_timeout",
    "docker_prune_mode",
    "enable_gravatar",
    "environment_health_interval",
    "git_operation_timeout",
    "http_client_timeout",
    "keyboard_shortcuts_enabled",
    "max_image_upload_size",
    "mobile_navigation_mode",
    "mobile_navigation_show_labels",
    "oidc_admin_claim",
    "oidc_admin_value",
    "oidc_auto_redirect_to_provider",
    "oidc_client_id",
    "oidc_client_secret",
    "oidc_enabled",
    "oidc_issuer_url",
    "oidc_merge_accounts",
    "oidc_provider_logo_url",
    "oidc_provider_name",
    "oidc_scopes",
    "oidc_skip_tls_verify",
    "polling_enabled",
    "polling_interval",
    "projects_directory",
    "proxy_request_timeout",
    "registry_timeout",
    "scheduled_prune_build_cache",
    "scheduled_prune_containers",
    "scheduled_prune_enabled",
    "scheduled_prune_images",
    "scheduled_prune_interval",
    "scheduled_prune_networks",
    "scheduled_prune_volumes",
    "sidebar_hover_expansion",
];

/// `oidc_client_id` → `oidcClientId`.
fn api_key_for(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// State of an `arcane_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsModel {
    /// Same as `environment_id`.
    pub id: String,
    /// Target environment.
    pub environment_id: String,
    /// Configured settings keyed by attribute name.
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<String>>,
    /// Every setting of the environment after apply, keyed by API name.
    pub applied: Option<BTreeMap<String, String>>,
}

impl SettingsModel {
    /// Set values keyed by their API names.
    fn api_values(&self) -> Result<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        for (name, value) in &self.values {
            if !SETTING_NAMES.contains(&name.as_str()) {
                return Err(ResourceError::invalid(name.clone(), "unknown setting").into());
            }
            if let Some(value) = value {
                out.insert(api_key_for(name), value.clone());
            }
        }
        Ok(out)
    }
}

/// Manages environment settings.
#[derive(Debug, Clone)]
pub struct SettingsResource {
    client: ArcaneClient,
}

impl SettingsResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }

    async fn apply(&self, mut plan: SettingsModel, environment_id: String) -> Result<SettingsModel> {
        let values = plan.api_values()?;
        if values.is_empty() {
            debug!("No settings configured for environment {environment_id}");
        } else {
            info!(
                "Writing {} settings to environment {environment_id}",
                values.len()
            );
            self.client
                .update_settings(&environment_id, &values)
                .await
                .context("update settings")?;
        }

        let applied = self
            .client
            .get_settings(&environment_id)
            .await
            .context("read settings")?;
        plan.id.clone_from(&environment_id);
        plan.environment_id = environment_id;
        plan.applied = map_or_null(Some(applied));
        Ok(plan)
    }
}

#[async_trait]
impl Resource for SettingsResource {
    type Model = SettingsModel;

    fn type_name(&self) -> &'static str {
        "arcane_settings"
    }

    fn schema(&self) -> Schema {
        let schema = Schema::new("Environment settings.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("environment_id", AttributeType::String).replace());
        SETTING_NAMES
            .into_iter()
            .fold(schema, |schema, name| {
                schema.attribute(Attribute::optional(name, AttributeType::String))
            })
            .attribute(
                Attribute::computed("applied", AttributeType::StringMap)
                    .describe("All environment settings after apply."),
            )
    }

    async fn modify_plan(&self, plan: SettingsModel) -> Result<SettingsModel> {
        plan.api_values()?;
        Ok(plan)
    }

    async fn create(&self, plan: SettingsModel) -> Result<SettingsModel> {
        let environment_id = plan.environment_id.clone();
        self.apply(plan, environment_id).await
    }

    async fn read(&self, mut state: SettingsModel) -> Result<Option<SettingsModel>> {
        let applied = self
            .client
            .get_settings(&state.environment_id)
            .await
            .context("read settings")?;
        state.id.clone_from(&state.environment_id);
        state.applied = map_or_null(Some(applied));
        Ok(Some(state))
    }

    async fn update(&self, plan: SettingsModel, state: SettingsModel) -> Result<SettingsModel> {
        self.apply(plan, state.environment_id).await
    }

    async fn delete(&self, state: SettingsModel) -> Result<()> {
        debug!(
            "Leaving settings of environment {} in place",
            state.environment_id
        );
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<SettingsModel> {
        Ok(SettingsModel {
            environment_id: id.to_string(),
            ..SettingsModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, SettingsResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, SettingsResource::new(client))
    }

    async fn mount_get(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/environments/0/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"key": "projectsDirectory", "type": "string", "value": "/srv/projects"},
                {"key": "pollingEnabled", "type": "boolean", "value": "true"}
            ])))
            .mount(server)
            .await;
    }

    #[test]
    fn test_api_key_for() {
        assert_eq!(api_key_for("oidc_client_id"), "oidcClientId");
        assert_eq!(api_key_for("base_server_url"), "baseServerUrl");
        assert_eq!(api_key_for("accent_color"), "accentColor");
    }

    #[tokio::test]
    async fn test_create_writes_only_set_values() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/environments/0/settings"))
            .and(body_json(json!({"projectsDirectory": "/srv/projects"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"key": "projectsDirectory", "type": "string", "value": "/srv/projects"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_get(&server).await;

        let plan = json!({
            "environment_id": "0",
            "projects_directory": "/srv/projects",
            "accent_color": null
        });
        let state = crate::resources::ResourceHandler::create(&resource, plan).await.expect("create");
        assert_eq!(state["id"], "0");
        assert_eq!(state["projects_directory"], "/srv/projects");
        assert_eq!(state["applied"]["pollingEnabled"], "true");
    }

    #[tokio::test]
    async fn test_create_without_values_skips_write() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        mount_get(&server).await;

        let plan = SettingsModel {
            environment_id: "0".into(),
            ..SettingsModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.applied.map(|m| m.len()), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_setting_rejected() {
        let (_server, resource) = setup().await;
        let plan = SettingsModel {
            environment_id: "0".into(),
            values: BTreeMap::from([("colour".to_string(), Some("red".to_string()))]),
            ..SettingsModel::default()
        };
        let err = resource.modify_plan(plan).await.expect_err("unknown");
        assert!(err.to_string().contains("colour"));
    }

    #[tokio::test]
    async fn test_read_errors_propagate() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/environments/0/settings"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let state = resource.import("0").await.expect("import");
        tokio_test::assert_err!(resource.read(state).await);
    }
}
