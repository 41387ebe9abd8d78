//! `arcane_template`: a custom compose template.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Resource, found, gone};
use crate::api::{ArcaneClient, Template, TemplateRequest};
use crate::error::{Result, ResultExt};
use crate::schema::{Attribute, AttributeType, Schema};

/// State of an `arcane_template`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateModel {
    /// Template ID.
    pub id: String,
    /// Template name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Compose content.
    pub content: String,
    /// Env content.
    pub env_content: String,
    /// Created by a user rather than shipped.
    pub is_custom: Option<bool>,
    /// Comes from a remote registry.
    pub is_remote: Option<bool>,
    /// Source registry.
    pub registry_id: Option<String>,
}

impl TemplateModel {
    fn to_request(&self) -> TemplateRequest {
        TemplateRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            env_content: self.env_content.clone(),
        }
    }

    fn refresh_computed(&mut self, template: &Template) {
        self.is_custom = Some(template.is_custom);
        self.is_remote = Some(template.is_remote);
        self.registry_id.clone_from(&template.registry_id);
        if let Some(env) = &template.env_content {
            self.env_content.clone_from(env);
        }
    }
}

/// Manages compose templates.
#[derive(Debug, Clone)]
pub struct TemplateResource {
    client: ArcaneClient,
}

impl TemplateResource {
    /// Creates the resource.
    #[must_use]
    pub const fn new(client: ArcaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TemplateResource {
    type Model = TemplateModel;

    fn type_name(&self) -> &'static str {
        "arcane_template"
    }

    fn schema(&self) -> Schema {
        Schema::new("A compose template.")
            .attribute(Attribute::computed("id", AttributeType::String))
            .attribute(Attribute::required("name", AttributeType::String))
            .attribute(Attribute::required("description", AttributeType::String))
            .attribute(
                Attribute::required("content", AttributeType::String)
                    .describe("docker-compose.yml content."),
            )
            .attribute(
                Attribute::required("env_content", AttributeType::String)
                    .describe(".env content."),
            )
            .attribute(Attribute::computed("is_custom", AttributeType::Bool))
            .attribute(Attribute::computed("is_remote", AttributeType::Bool))
            .attribute(Attribute::computed("registry_id", AttributeType::String))
    }

    async fn create(&self, plan: TemplateModel) -> Result<TemplateModel> {
        info!("Creating template {}", plan.name);
        let template = self
            .client
            .create_template(&plan.to_request())
            .await
            .context("create template")?;

        let mut state = TemplateModel {
            id: template.id.clone(),
            name: template.name.clone(),
            content: template.content.clone(),
            ..plan
        };
        state.refresh_computed(&template);
        Ok(state)
    }

    async fn read(&self, mut state: TemplateModel) -> Result<Option<TemplateModel>> {
        let Some(template) = found(
            self.client.get_template(&state.id).await,
            "template",
            &state.id,
        )
        .context("read template")?
        else {
            return Ok(None);
        };
        state.refresh_computed(&template);
        state.name = template.name;
        state.description = template.description;
        state.content = template.content;
        Ok(Some(state))
    }

    async fn update(&self, plan: TemplateModel, state: TemplateModel) -> Result<TemplateModel> {
        info!("Updating template {}", state.id);
        let template = self
            .client
            .update_template(&state.id, &plan.to_request())
            .await
            .context("update template")?;

        let mut updated = TemplateModel {
            id: template.id.clone(),
            ..plan
        };
        updated.refresh_computed(&template);
        Ok(updated)
    }

    async fn delete(&self, state: TemplateModel) -> Result<()> {
        info!("Deleting template {}", state.id);
        gone(
            self.client.delete_template(&state.id).await,
            "template",
            &state.id,
        )
        .context("delete template")
    }
}
