//! Users and API keys.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DataSource, lookup};
use crate::api::ArcaneClient;
use crate::error::Result;
use crate::resources::list_or_null;
use crate::schema::{Attribute, AttributeType, Schema};

/// Attributes of `data.arcane_user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    /// Lookup key.
    pub id: String,
    /// Login name.
    pub username: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Locale.
    pub locale: Option<String>,
    /// Role names.
    pub roles: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

/// Looks up a user by ID.
#[derive(Debug, Clone)]
pub struct UserDataSource {
    client: ArcaneClient,
}

impl UserDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    type Model = UserData;

    fn type_name(&self) -> &'static str {
        "arcane_user"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up an Arcane user.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("username", AttributeType::String))
            .attribute(Attribute::computed("display_name", AttributeType::String))
            .attribute(Attribute::computed("email", AttributeType::String))
            .attribute(Attribute::computed("locale", AttributeType::String))
            .attribute(Attribute::computed("roles", AttributeType::StringList))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: UserData) -> Result<UserData> {
        let user = lookup(self.client.get_user(&config.id).await, "user")?;
        Ok(UserData {
            id: user.id,
            username: Some(user.username),
            display_name: user.display_name,
            email: user.email,
            locale: user.locale,
            roles: list_or_null(user.roles),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

/// Attributes of `data.arcane_api_key`. The secret is never exposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyData {
    /// Lookup key.
    pub id: String,
    /// Key name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Expiry.
    pub expires_at: Option<String>,
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

/// Looks up an API key by ID.
#[derive(Debug, Clone)]
pub struct ApiKeyDataSource {
    client: ArcaneClient,
}

impl ApiKeyDataSource {
    /// Creates the data source.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ApiKeyDataSource {
    type Model = ApiKeyData;

    fn type_name(&self) -> &'static str {
        "arcane_api_key"
    }

    fn schema(&self) -> Schema {
        Schema::new("Looks up an API key. The secret itself is not available.")
            .attribute(Attribute::required("id", AttributeType::String))
            .attribute(Attribute::computed("name", AttributeType::String))
            .attribute(Attribute::computed("description", AttributeType::String))
            .attribute(Attribute::computed("expires_at", AttributeType::String))
            .attribute(Attribute::computed("key_prefix", AttributeType::String))
            .attribute(Attribute::computed("user_id", AttributeType::String))
            .attribute(Attribute::computed("last_used_at", AttributeType::String))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn read(&self, config: ApiKeyData) -> Result<ApiKeyData> {
        let key = lookup(self.client.get_api_key(&config.id).await, "api key")?;
        Ok(ApiKeyData {
            id: key.id,
            name: Some(key.name),
            description: key.description,
            expires_at: key.expires_at,
            key_prefix: Some(key.key_prefix),
            user_id: Some(key.user_id),
            last_used_at: key.last_used_at,
            created_at: Some(key.created_at),
            updated_at: key.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::DataSourceHandler;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ArcaneClient {
        ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client")
    }

    #[tokio::test]
    async fn test_user_empty_roles_are_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "u1", "username": "alice", "roles": []}
            })))
            .mount(&server)
            .await;

        let source = UserDataSource::new(client(&server));
        let doc = DataSourceHandler::read(&source, json!({"id": "u1"}))
            .await
            .expect("read");
        assert_eq!(doc["username"], "alice");
        assert!(doc["roles"].is_null());
    }

    #[tokio::test]
    async fn test_user_requires_id() {
        let server = MockServer::start().await;
        let source = UserDataSource::new(client(&server));
        tokio_test::assert_err!(DataSourceHandler::read(&source, json!({})).await);
    }

    #[tokio::test]
    async fn test_api_key_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/api-keys/k9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = ApiKeyDataSource::new(client(&server));
        let config = ApiKeyData {
            id: "k9".into(),
            ..ApiKeyData::default()
        };
        let err = DataSource::read(&source, config).await.expect_err("missing");
        assert_eq!(err.to_string(), "api key not found");
    }
}
