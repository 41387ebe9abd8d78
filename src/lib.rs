// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Arcane Provider
//!
//! Declarative resources and data sources for the Arcane container
//! management platform.
//!
//! ## Overview
//!
//! Arcane manages Docker hosts ("environments") and the compose projects,
//! containers, networks and volumes that run on them. This crate exposes
//! that REST API as a set of typed resources a declarative host can drive:
//!
//! - Create, read, update, delete and import managed objects
//! - Look up existing objects through read-only data sources
//! - Keep compose and `.env` content in sync from local files
//! - Run project lifecycle actions (up, down, redeploy)
//!
//! ## Architecture
//!
//! 1. **Configuration**: `endpoint`, `api_key` and `http_timeout`, from
//!    `arcane.yaml`, the environment, or the host
//! 2. **Client**: [`ArcaneClient`] wraps every Arcane endpoint
//! 3. **Resources**: each [`Resource`] maps a typed model onto API calls
//! 4. **Provider**: [`ArcaneProvider`] registers every type by name
//!
//! ## Modules
//!
//! - [`api`]: Arcane REST client and wire types
//! - [`config`]: Provider configuration loading and validation
//! - [`schema`]: Attribute schemas
//! - [`resources`]: Managed resources
//! - [`data_sources`]: Read-only lookups
//! - [`content`]: File content and `.env` helpers
//! - [`provider`]: The provider registry
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! # arcane.yaml
//! endpoint: https://arcane.example.com/api
//! http_timeout: 2m
//! # api_key falls back to ARCANE_API_KEY
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod data_sources;
pub mod error;
pub mod provider;
pub mod resources;
pub mod schema;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::ArcaneClient;
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, ProviderConfig, ProviderSettings};
pub use data_sources::{DataSource, DataSourceHandler};
pub use error::{ArcaneError, Result};
pub use provider::ArcaneProvider;
pub use resources::{Resource, ResourceHandler};
pub use schema::{Attribute, AttributeType, Schema};
