//! Schema extension configuration
//!
//! An extension contributes schema text, dictionary entries, resolvers and data loaders.
//! [`SchemaExtensionConfiguration`] collects all of it ahead of the schema build.

mod configuration;
mod resource;

pub use configuration::SchemaExtensionConfiguration;
pub use resource::{EmbeddedResources, ResourceLocator};
