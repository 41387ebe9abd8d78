//! Output formatting for CLI commands.
//!
//! Every formatter returns a `String`; printing stays in the binary.

use colored::Colorize;
use serde_json::{Value, json};
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::ProviderSettings;
use crate::schema::{Attribute, Schema};

use super::commands::OutputFormat;

/// Placeholder shown for sensitive values in text output.
const REDACTED: &str = "(sensitive)";

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Registered type row for table display.
#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Schema attribute row for table display.
#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Attribute> for AttributeRow {
    fn from(attribute: &Attribute) -> Self {
        let mut flags = Vec::new();
        if attribute.sensitive {
            flags.push("sensitive".to_string());
        }
        if attribute.requires_replace {
            flags.push("replace".to_string());
        }
        if let Some(default) = &attribute.default {
            flags.push(format!("default={default}"));
        }

        Self {
            name: attribute.name.to_string(),
            kind: attribute.kind.as_str().to_string(),
            mode: attribute.mode.as_str().to_string(),
            flags: flags.join(", "),
            description: attribute.description.to_string(),
        }
    }
}

/// Document value row for table display.
#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "Attribute")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a list of registered type names with their descriptions.
    #[must_use]
    pub fn format_types(&self, title: &str, types: &[(&str, &str)]) -> String {
        match self.format {
            OutputFormat::Json => {
                let names: Vec<&str> = types.iter().map(|(name, _)| *name).collect();
                serde_json::to_string_pretty(&names).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows: Vec<TypeRow> = types
                    .iter()
                    .map(|(name, description)| TypeRow {
                        name: (*name).to_string(),
                        description: (*description).to_string(),
                    })
                    .collect();

                let mut output = String::new();
                let _ = writeln!(output, "{} ({})", title.bold(), types.len());
                let _ = writeln!(output, "{}", Table::new(rows));
                output
            }
        }
    }

    /// Formats an attribute schema.
    #[must_use]
    pub fn format_schema(&self, type_name: &str, schema: &Schema) -> String {
        match self.format {
            OutputFormat::Json => {
                let document = json!({ "type": type_name, "schema": schema });
                serde_json::to_string_pretty(&document).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows: Vec<AttributeRow> =
                    schema.attributes.iter().map(AttributeRow::from).collect();

                let mut output = String::new();
                let _ = writeln!(output, "{}", type_name.bold());
                if !schema.description.is_empty() {
                    let _ = writeln!(output, "{}", schema.description.dimmed());
                }
                let _ = writeln!(output, "{}", Table::new(rows));
                output
            }
        }
    }

    /// Formats a resource or data source document.
    ///
    /// Text output hides attributes the schema marks as sensitive; JSON
    /// output is the document as-is so it can be fed back as state.
    #[must_use]
    pub fn format_document(&self, schema: &Schema, document: &Value) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(document).unwrap_or_default(),
            OutputFormat::Text => {
                let Some(fields) = document.as_object() else {
                    return document.to_string();
                };

                let rows: Vec<ValueRow> = fields
                    .iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(name, value)| {
                        let sensitive = schema.get(name).is_some_and(|a| a.sensitive);
                        ValueRow {
                            name: name.clone(),
                            value: if sensitive {
                                REDACTED.to_string()
                            } else {
                                Self::format_value(value)
                            },
                        }
                    })
                    .collect();

                Table::new(rows).to_string()
            }
        }
    }

    /// Formats resolved provider settings. The API key is never shown.
    #[must_use]
    pub fn format_settings(&self, settings: &ProviderSettings) -> String {
        let timeout = format!("{}s", settings.timeout.as_secs());
        match self.format {
            OutputFormat::Json => {
                let document = json!({
                    "endpoint": settings.endpoint,
                    "api_key": REDACTED,
                    "http_timeout": timeout,
                });
                serde_json::to_string_pretty(&document).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows = vec![
                    ValueRow {
                        name: "endpoint".to_string(),
                        value: settings.endpoint.clone(),
                    },
                    ValueRow {
                        name: "api_key".to_string(),
                        value: REDACTED.to_string(),
                    },
                    ValueRow {
                        name: "http_timeout".to_string(),
                        value: timeout,
                    },
                ];
                Table::new(rows).to_string()
            }
        }
    }

    /// Formats a success message.
    #[must_use]
    pub fn success(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = json!({ "status": "success", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✓".green()),
        }
    }

    /// Formats a warning message.
    #[must_use]
    pub fn warning(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = json!({ "status": "warning", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "⚠".yellow()),
        }
    }

    /// Renders one value for a table cell.
    fn format_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(Self::format_value)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}={}", Self::format_value(v)))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}
