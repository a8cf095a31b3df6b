//! Dynamic schema builder
//!
//! [`DynamicSchemaBuilder`] is the [`SchemaParserBuilder`] used when no other delegate
//! is supplied. It keeps every forwarded SDL document, merges `type` and `extend type`
//! definitions across documents, and produces an `async_graphql` dynamic schema with
//! the forwarded resolvers attached.

use crate::error::{ExtensionError, Result};
use crate::schema::parser::{DictionaryType, Resolver, SchemaParserBuilder};
use crate::schema::scalars::{declared_scalar, is_validated_scalar};

use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Schema,
    SchemaBuilder, TypeRef,
};
use async_graphql::parser::parse_schema;
use async_graphql::parser::types::{
    BaseType, EnumValueDefinition, FieldDefinition, InputValueDefinition, SchemaDefinition, Type,
    TypeDefinition, TypeKind, TypeSystemDefinition,
};
use async_graphql::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Collects forwarded configuration and builds an `async_graphql` dynamic schema
#[derive(Debug, Default)]
pub struct DynamicSchemaBuilder {
    documents: Vec<String>,
    dictionary: IndexMap<String, DictionaryType>,
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl SchemaParserBuilder for DynamicSchemaBuilder {
    fn dictionary(&mut self, name: &str, ty: DictionaryType) {
        if let Some(previous) = self.dictionary.insert(name.to_string(), ty) {
            if previous != ty {
                tracing::warn!(
                    "Dictionary entry {} rebound from {} to {}",
                    name,
                    previous.rust_name(),
                    ty.rust_name()
                );
            }
        }
    }

    fn schema_string(&mut self, schema: &str) {
        self.documents.push(schema.to_string());
    }

    fn resolvers(&mut self, resolvers: Vec<Arc<dyn Resolver>>) {
        self.resolvers.extend(resolvers);
    }
}

impl DynamicSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// SDL documents in the order they were forwarded
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn dictionary_type(&self, name: &str) -> Option<DictionaryType> {
        self.dictionary.get(name).copied()
    }

    /// GraphQL type name bound to the Rust type `T`, if any
    pub fn dictionary_name<T: 'static>(&self) -> Option<&str> {
        self.dictionary
            .iter()
            .find(|(_, ty)| ty.is::<T>())
            .map(|(name, _)| name.as_str())
    }

    /// Assemble the schema builder; callers may still attach data before `finish`
    pub fn build(&self) -> Result<SchemaBuilder> {
        let (types, roots) = self.collect_types()?;
        self.validate_dictionary(&types)?;
        let mut resolvers = self.field_resolvers(&types)?;

        let query = roots.query.clone().unwrap_or_else(|| "Query".to_string());
        if !matches!(types.get(&query).map(|t| &t.kind), Some(PendingKind::Object(_))) {
            return Err(ExtensionError::SchemaGeneration(format!(
                "Query type '{}' is not defined",
                query
            )));
        }

        let mutation = roots.operation_type(roots.mutation.as_deref(), "Mutation", &types);
        let subscription =
            roots.operation_type(roots.subscription.as_deref(), "Subscription", &types);
        if let Some(subscription) = subscription {
            return Err(ExtensionError::SchemaGeneration(format!(
                "Subscription type '{}' is not supported",
                subscription
            )));
        }

        tracing::info!(
            "Building schema with {} types from {} documents",
            types.len(),
            self.documents.len()
        );

        let mut builder = Schema::build(&query, mutation.as_deref(), None);
        for (name, pending) in types {
            let description = pending.description;
            builder = match pending.kind {
                PendingKind::Object(fields) => {
                    let field_resolvers = resolvers.remove(&name).unwrap_or_default();
                    builder.register(build_object(&name, description, fields, field_resolvers))
                }
                PendingKind::InputObject(fields) => {
                    let mut input = InputObject::new(&name);
                    if let Some(desc) = description {
                        input = input.description(desc);
                    }
                    for field in &fields {
                        input = input.field(build_input_value(field));
                    }
                    builder.register(input)
                }
                PendingKind::Enum(values) => {
                    let mut enum_type = Enum::new(&name);
                    if let Some(desc) = description {
                        enum_type = enum_type.description(desc);
                    }
                    for value in &values {
                        enum_type = enum_type.item(build_enum_item(value));
                    }
                    builder.register(enum_type)
                }
                PendingKind::Scalar => {
                    if is_validated_scalar(&name) {
                        tracing::debug!("Scalar {} validated as ISO 8601", name);
                    }
                    let mut scalar = declared_scalar(&name);
                    if let Some(desc) = description {
                        scalar = scalar.description(desc);
                    }
                    builder.register(scalar)
                }
            };
        }

        Ok(builder)
    }

    /// Build and validate the final schema
    pub fn finish(&self) -> Result<Schema> {
        let schema = self.build()?.finish()?;
        tracing::info!("Schema built successfully");
        Ok(schema)
    }

    /// Parse every document and merge definitions by type name
    fn collect_types(&self) -> Result<(IndexMap<String, PendingType>, Roots)> {
        let mut types = IndexMap::new();
        let mut extensions = Vec::new();
        let mut roots = Roots::default();

        for (index, document) in self.documents.iter().enumerate() {
            let document = parse_schema(document).map_err(|e| {
                ExtensionError::SchemaGeneration(format!(
                    "Failed to parse schema document {}: {}",
                    index + 1,
                    e
                ))
            })?;

            for definition in document.definitions {
                match definition {
                    TypeSystemDefinition::Type(definition) if definition.node.extend => {
                        extensions.push(definition.node);
                    }
                    TypeSystemDefinition::Type(definition) => {
                        define_type(&mut types, definition.node)?;
                    }
                    TypeSystemDefinition::Schema(definition) => roots.merge(definition.node),
                    TypeSystemDefinition::Directive(definition) => {
                        tracing::debug!(
                            "Ignoring directive definition @{}",
                            definition.node.name.node
                        );
                    }
                }
            }
        }

        for extension in extensions {
            extend_type(&mut types, extension)?;
        }

        Ok((types, roots))
    }

    fn validate_dictionary(&self, types: &IndexMap<String, PendingType>) -> Result<()> {
        for (name, ty) in &self.dictionary {
            if !types.contains_key(name) {
                return Err(ExtensionError::SchemaGeneration(format!(
                    "Dictionary entry '{}' ({}) does not match any schema type",
                    name,
                    ty.rust_name()
                )));
            }
        }
        Ok(())
    }

    /// Map of type name to field name to the resolver handling it
    fn field_resolvers(
        &self,
        types: &IndexMap<String, PendingType>,
    ) -> Result<HashMap<String, HashMap<String, Arc<dyn Resolver>>>> {
        let mut by_type: HashMap<String, HashMap<String, Arc<dyn Resolver>>> = HashMap::new();

        for resolver in &self.resolvers {
            let type_name = resolver.type_name();
            let fields = match types.get(type_name).map(|t| &t.kind) {
                Some(PendingKind::Object(fields)) => fields,
                _ => {
                    return Err(ExtensionError::SchemaGeneration(format!(
                        "Resolver for '{}' does not match any object type",
                        type_name
                    )))
                }
            };

            let entry = by_type.entry(type_name.to_string()).or_default();
            for field in resolver.fields() {
                if !fields.iter().any(|f| f.name.node.as_str() == *field) {
                    return Err(ExtensionError::SchemaGeneration(format!(
                        "Resolver for '{}' declares unknown field '{}'",
                        type_name, field
                    )));
                }
                if entry
                    .insert(field.to_string(), Arc::clone(resolver))
                    .is_some()
                {
                    return Err(ExtensionError::SchemaGeneration(format!(
                        "Field '{}.{}' has more than one resolver",
                        type_name, field
                    )));
                }
            }
        }

        Ok(by_type)
    }
}

#[derive(Debug, Default)]
struct Roots {
    /// Set once any `schema { .. }` definition is seen
    defined: bool,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl Roots {
    fn merge(&mut self, definition: SchemaDefinition) {
        self.defined = true;
        if let Some(query) = definition.query {
            self.query = Some(query.node.to_string());
        }
        if let Some(mutation) = definition.mutation {
            self.mutation = Some(mutation.node.to_string());
        }
        if let Some(subscription) = definition.subscription {
            self.subscription = Some(subscription.node.to_string());
        }
    }

    /// Without a schema definition, a type named after the operation is its root
    fn operation_type(
        &self,
        declared: Option<&str>,
        implicit: &str,
        types: &IndexMap<String, PendingType>,
    ) -> Option<String> {
        match declared {
            Some(name) => Some(name.to_string()),
            None if !self.defined && types.contains_key(implicit) => Some(implicit.to_string()),
            None => None,
        }
    }
}

struct PendingType {
    description: Option<String>,
    kind: PendingKind,
}

enum PendingKind {
    Object(Vec<FieldDefinition>),
    InputObject(Vec<InputValueDefinition>),
    Enum(Vec<EnumValueDefinition>),
    Scalar,
}

impl PendingKind {
    fn from_definition(name: &str, kind: TypeKind) -> Result<Self> {
        match kind {
            TypeKind::Object(object) => Ok(PendingKind::Object(
                object.fields.into_iter().map(|f| f.node).collect(),
            )),
            TypeKind::InputObject(input) => Ok(PendingKind::InputObject(
                input.fields.into_iter().map(|f| f.node).collect(),
            )),
            TypeKind::Enum(enum_type) => Ok(PendingKind::Enum(
                enum_type.values.into_iter().map(|v| v.node).collect(),
            )),
            TypeKind::Scalar => Ok(PendingKind::Scalar),
            TypeKind::Interface(_) => Err(unsupported(name, "Interface")),
            TypeKind::Union(_) => Err(unsupported(name, "Union")),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PendingKind::Object(_) => "object",
            PendingKind::InputObject(_) => "input object",
            PendingKind::Enum(_) => "enum",
            PendingKind::Scalar => "scalar",
        }
    }
}

fn unsupported(name: &str, kind: &str) -> ExtensionError {
    ExtensionError::SchemaGeneration(format!("{} type '{}' is not supported", kind, name))
}

fn define_type(
    types: &mut IndexMap<String, PendingType>,
    definition: TypeDefinition,
) -> Result<()> {
    let name = definition.name.node.to_string();
    if types.contains_key(&name) {
        return Err(ExtensionError::SchemaGeneration(format!(
            "Type '{}' is defined more than once",
            name
        )));
    }

    let kind = PendingKind::from_definition(&name, definition.kind)?;
    let description = definition.description.map(|d| d.node);
    types.insert(name, PendingType { description, kind });
    Ok(())
}

fn extend_type(
    types: &mut IndexMap<String, PendingType>,
    definition: TypeDefinition,
) -> Result<()> {
    let name = definition.name.node.to_string();
    let extension = PendingKind::from_definition(&name, definition.kind)?;
    let existing = types.get_mut(&name).ok_or_else(|| {
        ExtensionError::SchemaGeneration(format!("Cannot extend undefined type '{}'", name))
    })?;

    match (&mut existing.kind, extension) {
        (PendingKind::Object(fields), PendingKind::Object(more)) => {
            for field in more {
                if fields.iter().any(|f| f.name.node == field.name.node) {
                    return Err(ExtensionError::SchemaGeneration(format!(
                        "Field '{}.{}' is defined more than once",
                        name, field.name.node
                    )));
                }
                fields.push(field);
            }
        }
        (PendingKind::InputObject(fields), PendingKind::InputObject(more)) => fields.extend(more),
        (PendingKind::Enum(values), PendingKind::Enum(more)) => values.extend(more),
        (PendingKind::Scalar, PendingKind::Scalar) => {}
        (kind, extension) => {
            return Err(ExtensionError::SchemaGeneration(format!(
                "Cannot extend {} '{}' with {} definition",
                kind.label(),
                name,
                extension.label()
            )))
        }
    }

    Ok(())
}

fn build_object(
    name: &str,
    description: Option<String>,
    fields: Vec<FieldDefinition>,
    mut resolvers: HashMap<String, Arc<dyn Resolver>>,
) -> Object {
    let mut object = Object::new(name);
    if let Some(desc) = description {
        object = object.description(desc);
    }

    for definition in &fields {
        let field_name = definition.name.node.to_string();
        let resolver = resolvers.remove(&field_name);
        object = object.field(build_field(definition, resolver));
    }

    object
}

fn build_field(definition: &FieldDefinition, resolver: Option<Arc<dyn Resolver>>) -> Field {
    let field_name = definition.name.node.to_string();
    let type_ref = to_type_ref(&definition.ty.node);

    let mut field = match resolver {
        Some(resolver) => {
            let name_for_closure = field_name.clone();
            Field::new(field_name, type_ref, move |ctx| {
                resolver.resolve(&name_for_closure, ctx)
            })
        }
        None => {
            let name_for_closure = field_name.clone();
            Field::new(field_name, type_ref, move |ctx| {
                let field_name = name_for_closure.clone();
                FieldFuture::new(async move {
                    // Unresolved fields read the same-named entry of the parent object
                    let parent = ctx
                        .parent_value
                        .as_value()
                        .or_else(|| ctx.parent_value.downcast_ref::<Value>());

                    if let Some(Value::Object(obj)) = parent {
                        if let Some(value) = obj.get(field_name.as_str()) {
                            return Ok(Some(to_field_value(value.clone())));
                        }
                    }

                    Ok(Some(FieldValue::NULL))
                })
            })
        }
    };

    if let Some(desc) = &definition.description {
        field = field.description(desc.node.clone());
    }
    for argument in &definition.arguments {
        field = field.argument(build_input_value(&argument.node));
    }

    field
}

fn build_input_value(definition: &InputValueDefinition) -> InputValue {
    let mut input = InputValue::new(
        definition.name.node.to_string(),
        to_type_ref(&definition.ty.node),
    );
    if let Some(desc) = &definition.description {
        input = input.description(desc.node.clone());
    }
    if let Some(default) = &definition.default_value {
        input = input.default_value(default.node.clone());
    }
    input
}

fn build_enum_item(definition: &EnumValueDefinition) -> EnumItem {
    let mut item = EnumItem::new(definition.value.node.to_string());
    if let Some(desc) = &definition.description {
        item = item.description(desc.node.clone());
    }
    item
}

/// Convert a parsed SDL type into a dynamic type reference
pub fn to_type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(to_type_ref(inner))),
    };

    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

/// Lists become field value lists so object items keep resolving field by field
pub fn to_field_value<'a>(value: Value) -> FieldValue<'a> {
    match value {
        Value::List(items) => FieldValue::list(items.into_iter().map(to_field_value)),
        value => FieldValue::value(value),
    }
}
