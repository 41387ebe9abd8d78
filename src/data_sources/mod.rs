//! Read-only data sources.
//!
//! A data source takes its lookup keys from the configuration document and
//! returns the same document with every other attribute filled in. Unlike a
//! managed resource, a missing object is an error.

mod access;
mod docker;
mod environment;
mod git;
mod project;
mod registry;
mod settings;

pub use access::{ApiKeyDataSource, ApiKeyData, UserDataSource, UserData};
pub use docker::{
    ContainerData, ContainerDataSource, NetworkData, NetworkDataSource, VolumeData,
    VolumeDataSource,
};
pub use environment::{EnvironmentData, EnvironmentDataSource};
pub use git::{GitOpsSyncData, GitOpsSyncDataSource, GitRepositoryData, GitRepositoryDataSource};
pub use project::{ProjectPathData, ProjectPathDataSource};
pub use registry::{
    ContainerRegistryData, ContainerRegistryDataSource, TemplateDataSource,
    TemplateRegistryDataSource,
};
pub use settings::{
    JobSchedulesDataSource, NotificationDataSource, SettingsData, SettingsDataSource,
};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ResourceError, Result};
use crate::resources::{encode, prepare};
use crate::schema::Schema;

/// A read-only lookup.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Attribute document; lookup keys in, everything else out.
    type Model: Serialize + DeserializeOwned + Default + Send + Sync;

    /// Full type name, e.g. `arcane_environment`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Looks the object up.
    async fn read(&self, config: Self::Model) -> Result<Self::Model>;
}

/// Type-erased data source operating on JSON documents.
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    /// Full type name.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Checks the configuration and reads the object.
    async fn read(&self, config: Value) -> Result<Value>;
}

#[async_trait]
impl<D: DataSource> DataSourceHandler for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    async fn read(&self, config: Value) -> Result<Value> {
        let model =
            prepare::<D::Model>(DataSource::type_name(self), &DataSource::schema(self), config)?;
        encode(&DataSource::read(self, model).await?)
    }
}

/// Turns a 404 into a "not found" error for `kind`.
pub(crate) fn lookup<T>(result: Result<T>, kind: &'static str) -> Result<T> {
    match result {
        Err(e) if e.is_not_found() => Err(ResourceError::NotFound { kind }.into()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_lookup_maps_404() {
        let missing: Result<()> = Err(ApiError::status(404, "404 Not Found", "").into());
        let err = lookup(missing, "volume").expect_err("404");
        assert_eq!(err.to_string(), "volume not found");

        let failed: Result<()> = Err(ApiError::status(500, "500 Internal Server Error", "").into());
        let err = lookup(failed, "volume").expect_err("500");
        assert!(err.to_string().contains("500"));
    }
}
