//! Arcane REST API integration module.
//!
//! This module provides the typed HTTP client and the request/response
//! types of every API area the provider manages.

mod client;
mod users;
mod environments;
mod projects;
mod containers;
mod networks;
mod volumes;
mod registries;
mod git;
mod api_keys;
mod templates;
mod notifications;
mod settings;

pub use client::ArcaneClient;
use client::nullable;
pub use users::{CreateUserRequest, UpdateUserRequest, User};
pub use environments::{CreateEnvironmentRequest, Environment, UpdateEnvironmentRequest};
pub use projects::{
    CreateProjectRequest, DestroyProjectOptions, Project, ProjectAction, UpdateProjectRequest,
};
pub use containers::{Container, CreateContainerRequest, normalize_ports};
pub use networks::{CreateNetworkRequest, Network, NetworkCreateOptions, NetworkCreated};
pub use volumes::{CreateVolumeRequest, Volume};
pub use registries::{CreateRegistryRequest, Registry, UpdateRegistryRequest};
pub use git::{
    CreateGitOpsSyncRequest, CreateGitRepositoryRequest, GitOpsSync, GitRepository,
    UpdateGitOpsSyncRequest, UpdateGitRepositoryRequest,
};
pub use api_keys::{ApiKey, CreateApiKeyRequest, UpdateApiKeyRequest};
pub use templates::{Template, TemplateRegistry, TemplateRegistryRequest, TemplateRequest};
pub use notifications::{NotificationSettings, NotificationUpdate};
pub use settings::{JobSchedules, Setting, UpdateJobSchedulesRequest};
