//! Managed resources.
//!
//! Every resource implements [`Resource`] over a typed model. The blanket
//! [`ResourceHandler`] implementation erases the model to JSON documents so
//! that a host (or the CLI) can drive any resource by type name.

mod api_key;
mod container;
mod container_registry;
mod environment;
mod git_repository;
mod gitops_sync;
mod job_schedules;
mod network;
mod notification;
mod project;
mod project_path;
mod project_state;
mod settings;
mod template;
mod template_registry;
mod user;
mod volume;

pub use api_key::{ApiKeyModel, ApiKeyResource};
pub use container::{ContainerModel, ContainerResource};
pub use container_registry::{ContainerRegistryModel, ContainerRegistryResource};
pub use environment::{EnvironmentModel, EnvironmentResource};
pub use git_repository::{GitRepositoryModel, GitRepositoryResource};
pub use gitops_sync::{GitOpsSyncModel, GitOpsSyncResource};
pub use job_schedules::{JobSchedulesModel, JobSchedulesResource};
pub use network::{NetworkModel, NetworkResource};
pub use notification::{NotificationModel, NotificationResource};
pub use project::{ProjectModel, ProjectResource};
pub use project_path::{ProjectPathModel, ProjectPathResource};
pub use project_state::{ProjectStateModel, ProjectStateResource};
pub use settings::{SettingsModel, SettingsResource};
pub use template::{TemplateModel, TemplateResource};
pub use template_registry::{TemplateRegistryModel, TemplateRegistryResource};
pub use user::{UserModel, UserResource};
pub use volume::{VolumeModel, VolumeResource};

pub(crate) use git_repository::auth_type_from_api;
pub(crate) use notification::stringify_config;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{ResourceError, Result};
use crate::schema::Schema;

/// A managed Arcane object.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Typed attribute document.
    type Model: Serialize + DeserializeOwned + Default + Send + Sync;

    /// Full type name, e.g. `arcane_project`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Adjusts a plan before it is shown or applied.
    async fn modify_plan(&self, plan: Self::Model) -> Result<Self::Model> {
        Ok(plan)
    }

    /// Creates the object and returns the new state.
    async fn create(&self, plan: Self::Model) -> Result<Self::Model>;

    /// Refreshes state. `None` means the object is gone and must be dropped.
    async fn read(&self, state: Self::Model) -> Result<Option<Self::Model>>;

    /// Moves the object from `state` towards `plan`.
    async fn update(&self, plan: Self::Model, state: Self::Model) -> Result<Self::Model>;

    /// Removes the object. An object that is already gone is not an error.
    async fn delete(&self, state: Self::Model) -> Result<()>;

    /// Builds a partial state from an import ID; `read` fills in the rest.
    async fn import(&self, _id: &str) -> Result<Self::Model> {
        Err(ResourceError::ImportNotSupported {
            resource: self.type_name(),
        }
        .into())
    }
}

/// Type-erased resource operating on JSON documents.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Full type name.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Applies defaults, checks the document and runs plan modification.
    async fn plan(&self, plan: Value) -> Result<Value>;

    /// Creates the object.
    async fn create(&self, plan: Value) -> Result<Value>;

    /// Refreshes state; `None` drops the object.
    async fn read(&self, state: Value) -> Result<Option<Value>>;

    /// Updates the object.
    async fn update(&self, plan: Value, state: Value) -> Result<Value>;

    /// Deletes the object.
    async fn delete(&self, state: Value) -> Result<()>;

    /// Imports an existing object.
    async fn import(&self, id: &str) -> Result<Value>;
}

#[async_trait]
impl<R: Resource> ResourceHandler for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    async fn plan(&self, plan: Value) -> Result<Value> {
        let model = prepare::<R::Model>(Resource::type_name(self), &Resource::schema(self), plan)?;
        encode(&Resource::modify_plan(self, model).await?)
    }

    async fn create(&self, plan: Value) -> Result<Value> {
        let model = prepare::<R::Model>(Resource::type_name(self), &Resource::schema(self), plan)?;
        encode(&Resource::create(self, model).await?)
    }

    async fn read(&self, state: Value) -> Result<Option<Value>> {
        match Resource::read(self, decode(state)?).await? {
            Some(model) => Ok(Some(encode(&model)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, plan: Value, state: Value) -> Result<Value> {
        let model = prepare::<R::Model>(Resource::type_name(self), &Resource::schema(self), plan)?;
        encode(&Resource::update(self, model, decode(state)?).await?)
    }

    async fn delete(&self, state: Value) -> Result<()> {
        Resource::delete(self, decode(state)?).await
    }

    async fn import(&self, id: &str) -> Result<Value> {
        encode(&Resource::import(self, id).await?)
    }
}

/// Checks a configuration document against a schema and decodes it.
pub(crate) fn prepare<M: DeserializeOwned>(
    type_name: &'static str,
    schema: &Schema,
    document: Value,
) -> Result<M> {
    let mut map = match document {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ResourceError::invalid(
                type_name,
                format!("expected an object, got {other}"),
            )
            .into());
        }
    };
    schema.apply_defaults(&mut map);
    schema.check(type_name, &map)?;
    decode(Value::Object(map))
}

pub(crate) fn decode<M: DeserializeOwned>(document: Value) -> Result<M> {
    Ok(serde_json::from_value(document)?)
}

pub(crate) fn encode<M: Serialize>(model: &M) -> Result<Value> {
    Ok(serde_json::to_value(model)?)
}

/// Maps a 404 on read to "drop from state".
pub(crate) fn found<T>(result: Result<T>, type_name: &str, id: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            warn!("{type_name} {id} no longer exists; removing from state");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Treats a 404 on delete as success.
pub(crate) fn gone(result: Result<()>, type_name: &str, id: &str) -> Result<()> {
    match result {
        Err(e) if e.is_not_found() => {
            debug!("{type_name} {id} already deleted");
            Ok(())
        }
        other => other,
    }
}

/// Splits an import ID of the form `left<sep>right` on the first separator.
pub(crate) fn split_import_id(
    id: &str,
    separators: &[char],
    expected: &'static str,
) -> Result<(String, String)> {
    let invalid = || ResourceError::InvalidImportId {
        id: id.to_string(),
        expected,
    };
    let (left, right) = id
        .split_once(|c| separators.contains(&c))
        .ok_or_else(invalid)?;
    if left.is_empty() || right.is_empty() {
        return Err(invalid().into());
    }
    Ok((left.to_string(), right.to_string()))
}

/// An empty list becomes null.
pub(crate) fn list_or_null(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

/// An empty (or absent) map becomes null.
pub(crate) fn map_or_null(
    values: Option<BTreeMap<String, String>>,
) -> Option<BTreeMap<String, String>> {
    values.filter(|m| !m.is_empty())
}

/// An empty string becomes null.
pub(crate) fn string_or_null(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A set, non-empty string.
pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_import_id() {
        let (env, id) = split_import_id("0:abc", &[':'], "env:id").expect("split");
        assert_eq!((env.as_str(), id.as_str()), ("0", "abc"));

        let (env, id) = split_import_id("0/abc", &[':', '/'], "env/id").expect("split");
        assert_eq!((env.as_str(), id.as_str()), ("0", "abc"));

        assert!(split_import_id("abc", &[':'], "env:id").is_err());
        assert!(split_import_id(":abc", &[':'], "env:id").is_err());
        assert!(split_import_id("0:", &[':'], "env:id").is_err());
    }

    #[test]
    fn test_split_import_id_message() {
        let err = split_import_id("nope", &[':'], "env_id:project_id").expect_err("no separator");
        assert_eq!(
            err.to_string(),
            "invalid import id 'nope': expected env_id:project_id"
        );
    }

    #[test]
    fn test_null_helpers() {
        assert_eq!(list_or_null(Vec::new()), None);
        assert_eq!(map_or_null(Some(BTreeMap::new())), None);
        assert_eq!(string_or_null(String::new()), None);
        assert_eq!(non_empty(Some(&String::new())), None);
        assert_eq!(non_empty(Some(&"x".to_string())), Some("x".to_string()));
    }
}
