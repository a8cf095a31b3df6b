//! Delegate builder capability
//!
//! The extension configuration never builds a schema itself. It forwards schema text,
//! dictionary entries and resolvers to an implementation of [`SchemaParserBuilder`],
//! which owns the actual parse/build step.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

/// Rust type bound to a GraphQL type name through a dictionary entry
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictionaryType {
    id: TypeId,
    name: &'static str,
}

impl DictionaryType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name, for diagnostics only
    pub fn rust_name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for DictionaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DictionaryType").field(&self.name).finish()
    }
}

/// Field resolvers for one GraphQL object type
///
/// Fields the resolver does not list fall back to reading the parent value.
pub trait Resolver: Send + Sync + 'static {
    /// GraphQL object type the resolver belongs to (e.g. `Query`)
    fn type_name(&self) -> &str;

    /// Field names handled by [`Resolver::resolve`]
    fn fields(&self) -> &[&str];

    fn resolve<'a>(&self, field: &str, ctx: ResolverContext<'a>) -> FieldFuture<'a>;
}

impl fmt::Debug for dyn Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("type_name", &self.type_name())
            .field("fields", &self.fields())
            .finish()
    }
}

/// Builder that receives forwarded schema configuration
pub trait SchemaParserBuilder {
    /// Bind a GraphQL type name to a Rust type
    fn dictionary(&mut self, name: &str, ty: DictionaryType);

    /// Append a schema definition document (SDL)
    fn schema_string(&mut self, schema: &str);

    fn resolvers(&mut self, resolvers: Vec<Arc<dyn Resolver>>);
}

impl<B: SchemaParserBuilder + ?Sized> SchemaParserBuilder for &mut B {
    fn dictionary(&mut self, name: &str, ty: DictionaryType) {
        (**self).dictionary(name, ty)
    }

    fn schema_string(&mut self, schema: &str) {
        (**self).schema_string(schema)
    }

    fn resolvers(&mut self, resolvers: Vec<Arc<dyn Resolver>>) {
        (**self).resolvers(resolvers)
    }
}

impl<B: SchemaParserBuilder + ?Sized> SchemaParserBuilder for Box<B> {
    fn dictionary(&mut self, name: &str, ty: DictionaryType) {
        (**self).dictionary(name, ty)
    }

    fn schema_string(&mut self, schema: &str) {
        (**self).schema_string(schema)
    }

    fn resolvers(&mut self, resolvers: Vec<Arc<dyn Resolver>>) {
        (**self).resolvers(resolvers)
    }
}
