//! GraphQL schema assembly
//!
//! This module defines the delegate builder capability extensions forward to, and the
//! `async_graphql` dynamic implementation of it.

mod dynamic;
mod parser;
mod scalars;

pub use dynamic::{to_field_value, to_type_ref, DynamicSchemaBuilder};
pub use parser::{DictionaryType, Resolver, SchemaParserBuilder};
pub use scalars::{declared_scalar, is_validated_scalar};
