pub mod config;
pub mod error;
pub mod extension;
pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use config::{ExtensionConfig, LoadersConfig, SchemaConfig};
pub use error::{ExtensionError, Result};
pub use extension::{EmbeddedResources, ResourceLocator, SchemaExtensionConfiguration};
pub use loader::{
    BatchLoaderHandle, BatchLoaderWithContext, DataLoaderBuilder, DataLoaderHandle,
    DataLoaderOptions, DataLoaderRegistry, LoaderContext,
};
pub use schema::{DictionaryType, DynamicSchemaBuilder, Resolver, SchemaParserBuilder};
