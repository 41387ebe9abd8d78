//! `arcane_api_key`: an API key owned by the authenticated user.
//!
//! The secret is only returned by the create call and is carried in state
//! from then on.

use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone};
use crate::api::{ApiKey, ArcaneClient, CreateApiKeyRequest, UpdateApiKeyRequest};
use crate::error::{ResourceError, Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_api_key`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyModel {
    /// Key ID.
    pub id: String,
    /// Key name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Expiry as RFC 3339.
    pub expires_at: Option<String>,
    /// The secret; only known after create.
    pub key: Option<String>,
    /// Public prefix of the secret.
    pub key_prefix: Option<String>,
    /// Owning user.
    pub user_id: Option<String>,
    /// Last use.
    pub last_used_at: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl ApiKeyModel {
    fn refresh(&mut self, api_key: ApiKey) {
        self.id = api_key.id;
        self.name = api_key.name;
        self.description = api_key.description;
        self.expires_at = api_key.expires_at;
        self.key_prefix = Some(api_key.key_prefix);
        self.user_id = Some(api_key.user_id);
        self.last_used_at = api_key.last_used_at;
        self.created_at = Some(api_key.created_at);
        self.updated_at = api_key.updated_at;
    }
}

fn check_expiry(expires_at: Option<&String>) -> Result<()> {
    if let Some(value) = expires_at {
        DateTime::parse_from_rfc3339(value).map_err(|e| {
            ResourceError::invalid("expires_at", format!("'{value}' is not RFC 3339: {e}"))
        })?;
    }
    Ok(())
}

/// Manages API keys.
#[derive(Debug, Clone)]
pub struct ApiKeyResource {
    client: ArcaneClient,
}

impl ApiKeyResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ApiKeyResource {
    type Model = ApiKeyModel;

    fn type_name(&self) -> &'static str {
        "arcane_api_key"
    }

    fn schema(&self) -> Schema {
        Schema::new("An Arcane API key.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::optional("description", AttributeType::String))
            .attribute(
                Attribute::optional("expires_at", AttributeType::String)
                    .describe("Expiry timestamp (RFC 3339)."),
            )
            .attribute(
                Attribute::computed("key", AttributeType::String)
                    .sensitive()
                    .describe("Secret value, only available after creation."),
            )
            .attribute(Attribute::computed("key_prefix", AttributeType::String))
            .attribute(Attribute::computed("user_id", AttributeType::String))
            .attribute(Attribute::computed("last_used_at", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn modify_plan(&self, plan: ApiKeyModel) -> Result<ApiKeyModel> {
        check_expiry(plan.expires_at.as_ref())?;
        Ok(plan)
    }

    async fn create(&self, plan: ApiKeyModel) -> Result<ApiKeyModel> {
        check_expiry(plan.expires_at.as_ref())?;
        let request = CreateApiKeyRequest {
            name: plan.name.clone(),
            description: plan.description.clone(),
            expires_at: plan.expires_at.clone(),
        };

        info!("Creating API key {}", request.name);
        let api_key = self
            .client
            .create_api_key(&request)
            .await
            .context("create api key")?;

        let mut state = ApiKeyModel {
            key: api_key.key.clone(),
            ..ApiKeyModel::default()
        };
        state.refresh(api_key);
        state.last_used_at = None;
        Ok(state)
    }

    async fn read(&self, mut state: ApiKeyModel) -> Result<Option<ApiKeyModel>> {
        let Some(api_key) = found(
            self.client.get_api_key(&state.id).await,
            "api key",
            &state.id,
        )
        .context("read api key")?
        else {
            return Ok(None);
        };
        state.refresh(api_key);
        Ok(Some(state))
    }

    async fn update(&self, plan: ApiKeyModel, state: ApiKeyModel) -> Result<ApiKeyModel> {
        check_expiry(plan.expires_at.as_ref())?;
        let request = UpdateApiKeyRequest {
            name: Some(plan.name.clone()),
            description: plan.description.clone(),
            expires_at: plan.expires_at.clone(),
        };

        info!("Updating API key {}", state.id);
        let api_key = self
            .client
            .update_api_key(&state.id, &request)
            .await
            .context("update api key")?;

        let mut updated = ApiKeyModel {
            key: state.key,
            ..plan
        };
        updated.refresh(api_key);
        Ok(updated)
    }

    async fn delete(&self, state: ApiKeyModel) -> Result<()> {
        info!("Deleting API key {}", state.id);
        gone(self.client.delete_api_key(&state.id).await, "api key", &state.id)
            .context("delete api key")
    }

    async fn import(&self, id: &str) -> Result<ApiKeyModel> {
        Ok(ApiKeyModel {
            id: id.to_string(),
            ..ApiKeyModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ApiKeyResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, ApiKeyResource::new(client))
    }

    #[tokio::test]
    async fn test_create_captures_secret() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/api-keys"))
            .and(body_json(json!({"name": "ci", "expiresAt": "2030-01-01T00:00:00Z"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "k1",
                    "name": "ci",
                    "key": "arc_full_secret",
                    "keyPrefix": "arc_full",
                    "userId": "u1",
                    "expiresAt": "2030-01-01T00:00:00Z",
                    "lastUsedAt": "2024-01-01T00:00:00Z",
                    "createdAt": "2024-01-01T00:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let plan = ApiKeyModel {
            name: "ci".into(),
            expires_at: Some("2030-01-01T00:00:00Z".into()),
            ..ApiKeyModel::default()
        };
        let state = resource.create(plan).await.expect("create");
        assert_eq!(state.key.as_deref(), Some("arc_full_secret"));
        assert_eq!(state.key_prefix.as_deref(), Some("arc_full"));
        assert_eq!(state.last_used_at, None);
        assert_eq!(state.updated_at, None);
    }

    #[tokio::test]
    async fn test_update_preserves_secret() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/api-keys/k1"))
            .and(body_json(json!({"name": "ci-renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "k1",
                    "name": "ci-renamed",
                    "keyPrefix": "arc_full",
                    "userId": "u1",
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-02-01T00:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = ApiKeyModel {
            id: "k1".into(),
            name: "ci".into(),
            key: Some("arc_full_secret".into()),
            ..ApiKeyModel::default()
        };
        let plan = ApiKeyModel {
            name: "ci-renamed".into(),
            key: None,
            ..state.clone()
        };
        let updated = resource.update(plan, state).await.expect("update");
        assert_eq!(updated.key.as_deref(), Some("arc_full_secret"));
        assert_eq!(updated.name, "ci-renamed");
        assert_eq!(updated.updated_at.as_deref(), Some("2024-02-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_invalid_expiry_rejected_at_plan() {
        let (_server, resource) = setup().await;
        let plan = ApiKeyModel {
            name: "ci".into(),
            expires_at: Some("next tuesday".into()),
            ..ApiKeyModel::default()
        };
        let err = resource.modify_plan(plan).await.expect_err("bad timestamp");
        assert!(err.to_string().contains("expires_at"));
    }
}
