//! `arcane_user`: an Arcane login.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone, list_or_null};
use crate::api::{ArcaneClient, CreateUserRequest, UpdateUserRequest, User};
use crate::error::{ResourceError, Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

const MIN_PASSWORD_LEN: usize = 8;

/// State of an `arcane_user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserModel {
    /// User ID.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Password; never read back from the API.
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Locale such as `en-US`.
    pub locale: Option<String>,
    /// Role names.
    pub roles: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl UserModel {
    /// Copies the server's view of the user into the model.
    fn refresh(&mut self, user: User) {
        self.id = user.id;
        self.username = user.username;
        self.display_name = user.display_name;
        self.email = user.email;
        self.locale = user.locale;
        self.roles = list_or_null(user.roles);
        self.created_at = user.created_at;
        self.updated_at = user.updated_at;
    }
}

/// Manages Arcane users.
#[derive(Debug, Clone)]
pub struct UserResource {
    client: ArcaneClient,
}

impl UserResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ResourceError::invalid(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        )
        .into());
    }
    Ok(())
}

#[async_trait]
impl Resource for UserResource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "arcane_user"
    }

    fn schema(&self) -> Schema {
        Schema::new("An Arcane user account.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(
                Attribute::required("username", AttributeType::String)
                    .replace()
                    .describe("Login name. Changing forces a new user."),
            )
            .attribute(
                Attribute::required("password", AttributeType::String)
                    .sensitive()
                    .describe("Password, at least 8 characters."),
            )
            .attribute(Attribute::optional("display_name", AttributeType::String))
            .attribute(Attribute::optional("email", AttributeType::String))
            .attribute(
                Attribute::optional("locale", AttributeType::String)
                    .describe("Locale preference (e.g. en-US)."),
            )
            .attribute(Attribute::optional("roles", AttributeType::StringList))
            .attribute(Attribute::computed("created_at", AttributeType::String))
            .attribute(Attribute::computed("updated_at", AttributeType::String))
    }

    async fn create(&self, plan: UserModel) -> Result<UserModel> {
        check_password(&plan.password)?;
        let request = CreateUserRequest {
            username: plan.username.clone(),
            password: plan.password.clone(),
            display_name: plan.display_name.clone(),
            email: plan.email.clone(),
            locale: plan.locale.clone(),
            roles: plan.roles.clone().unwrap_or_default(),
        };

        info!("Creating user {}", request.username);
        let user = self.client.create_user(&request).await.context("create user")?;

        let mut state = UserModel {
            password: plan.password,
            ..UserModel::default()
        };
        state.refresh(user);
        Ok(state)
    }

    async fn read(&self, mut state: UserModel) -> Result<Option<UserModel>> {
        let Some(user) = found(
            self.client.get_user(&state.id).await,
            "user",
            &state.id,
        )
        .context("read user")?
        else {
            return Ok(None);
        };
        state.refresh(user);
        Ok(Some(state))
    }

    async fn update(&self, plan: UserModel, mut state: UserModel) -> Result<UserModel> {
        let password = Some(plan.password).filter(|p| !p.is_empty());
        if let Some(password) = &password {
            check_password(password)?;
        }
        let request = UpdateUserRequest {
            display_name: plan.display_name,
            email: plan.email,
            locale: plan.locale,
            password: password.clone(),
            roles: plan.roles.unwrap_or_default(),
        };

        info!("Updating user {}", state.id);
        let user = self
            .client
            .update_user(&state.id, &request)
            .await
            .context("update user")?;

        state.refresh(user);
        if let Some(password) = password {
            state.password = password;
        }
        Ok(state)
    }

    async fn delete(&self, state: UserModel) -> Result<()> {
        info!("Deleting user {}", state.id);
        gone(self.client.delete_user(&state.id).await, "user", &state.id).context("delete user")
    }

    async fn import(&self, id: &str) -> Result<UserModel> {
        Ok(UserModel {
            id: id.to_string(),
            ..UserModel::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, UserResource) {
        let server = MockServer::start().await;
        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "key").expect("client");
        (server, UserResource::new(client))
    }

    fn plan() -> UserModel {
        UserModel {
            username: "alice".into(),
            password: "s3cretpass".into(),
            email: Some("alice@example.com".into()),
            ..UserModel::default()
        }
    }

    #[tokio::test]
    async fn test_create_keeps_password_and_nulls_empty_roles() {
        let (server, resource) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(header("X-API-Key", "key"))
            .and(body_json(json!({
                "username": "alice",
                "password": "s3cretpass",
                "email": "alice@example.com"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {
                    "id": "u1",
                    "username": "alice",
                    "email": "alice@example.com",
                    "roles": [],
                    "createdAt": "2024-01-01T00:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = resource.create(plan()).await.expect("create");
        assert_eq!(state.id, "u1");
        assert_eq!(state.password, "s3cretpass");
        assert_eq!(state.roles, None);
        assert_eq!(state.display_name, None);
        assert_eq!(state.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (_server, resource) = setup().await;
        let mut plan = plan();
        plan.password = "short".into();
        let err = resource.create(plan).await.expect_err("too short");
        assert!(err.to_string().contains("password"));
    }

    #[tokio::test]
    async fn test_read_missing_user_drops_state() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("user not found"))
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..plan()
        };
        assert_eq!(resource.read(state).await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_read_preserves_password() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "u1", "username": "alice", "roles": ["admin"]}
            })))
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..plan()
        };
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.password, "s3cretpass");
        assert_eq!(refreshed.roles, Some(vec!["admin".to_string()]));
        assert_eq!(refreshed.email, None);
    }

    #[tokio::test]
    async fn test_read_accepts_null_collections() {
        let (server, resource) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "u1", "username": "alice", "roles": null, "email": null}
            })))
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..plan()
        };
        let refreshed = resource.read(state).await.expect("read").expect("exists");
        assert_eq!(refreshed.username, "alice");
        assert_eq!(refreshed.roles, None);
    }

    #[tokio::test]
    async fn test_update_omits_empty_password() {
        let (server, resource) = setup().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/u1"))
            .and(body_json(json!({"displayName": "Alice"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "u1", "username": "alice", "displayName": "Alice"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..plan()
        };
        let new_plan = UserModel {
            password: String::new(),
            email: None,
            display_name: Some("Alice".into()),
            ..state.clone()
        };
        let updated = resource.update(new_plan, state).await.expect("update");
        assert_eq!(updated.password, "s3cretpass");
        assert_eq!(updated.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_delete_tolerates_404() {
        let (server, resource) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..UserModel::default()
        };
        tokio_test::assert_ok!(resource.delete(state).await);
    }

    #[tokio::test]
    async fn test_delete_propagates_other_errors() {
        let (server, resource) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let state = UserModel {
            id: "u1".into(),
            ..UserModel::default()
        };
        let err = resource.delete(state).await.expect_err("500");
        assert_eq!(
            err.to_string(),
            "delete user failed: arcane API error: 500 Internal Server Error: boom"
        );
    }
}
