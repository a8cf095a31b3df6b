use crate::error::{ExtensionError, Result};
use crate::extension::resource::ResourceLocator;
use crate::loader::{
    BatchLoaderHandle, DataLoaderBuilder, DataLoaderHandle, DataLoaderOptions, DataLoaderRegistry,
    LoaderContext, LoaderSnapshot,
};
use crate::schema::{DictionaryType, Resolver, SchemaParserBuilder};

use dashmap::DashMap;
use std::io::{self, Read};
use std::sync::Arc;

/// Configuration collected from one schema extension
///
/// Schema calls are forwarded to the wrapped [`SchemaParserBuilder`]. Data loaders and
/// batch loaders are kept by name until the wiring code reads them back. Loader
/// registration only needs `&self` and may happen from several threads at once.
pub struct SchemaExtensionConfiguration<B> {
    schema_builder: B,
    data_loaders: DashMap<String, DataLoaderHandle>,
    batch_loaders: DashMap<String, BatchLoaderHandle>,
}

impl<B: SchemaParserBuilder> SchemaExtensionConfiguration<B> {
    pub fn new(schema_builder: B) -> Self {
        Self {
            schema_builder,
            data_loaders: DashMap::new(),
            batch_loaders: DashMap::new(),
        }
    }

    /// Bind the GraphQL type `name` to a Rust type
    pub fn dictionary(&mut self, name: &str, ty: DictionaryType) -> &mut Self {
        tracing::debug!("Forwarding dictionary entry {} -> {}", name, ty.rust_name());
        self.schema_builder.dictionary(name, ty);
        self
    }

    pub fn schema_string(&mut self, schema: &str) -> &mut Self {
        tracing::debug!("Forwarding schema text ({} bytes)", schema.len());
        self.schema_builder.schema_string(schema);
        self
    }

    /// Read a schema resource and forward its text
    ///
    /// Nothing is forwarded when the resource is missing, unreadable or not UTF-8.
    pub fn schema_resource<L>(&mut self, locator: &L, name: &str) -> Result<&mut Self>
    where
        L: ResourceLocator + ?Sized,
    {
        let schema = read_resource(locator, name)?;
        tracing::debug!("Loaded schema resource {}", name);
        Ok(self.schema_string(&schema))
    }

    pub fn resolvers<I>(&mut self, resolvers: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Resolver>>,
    {
        let resolvers: Vec<Arc<dyn Resolver>> = resolvers.into_iter().collect();
        tracing::debug!("Forwarding {} resolvers", resolvers.len());
        self.schema_builder.resolvers(resolvers);
        self
    }

    /// Register a shared data loader under `key`, replacing any previous one
    pub fn data_loader(&self, key: &str, loader: DataLoaderHandle) -> &Self {
        tracing::debug!("Registering data loader {} ({})", key, loader.type_name());
        if self.data_loaders.insert(key.to_string(), loader).is_some() {
            tracing::warn!("Data loader '{}' replaced", key);
        }
        self
    }

    /// Register a batch loader under `key`, replacing any previous one
    pub fn batch_loader(&self, key: &str, loader: BatchLoaderHandle) -> &Self {
        tracing::debug!("Registering batch loader {} ({})", key, loader.type_name());
        if self.batch_loaders.insert(key.to_string(), loader).is_some() {
            tracing::warn!("Batch loader '{}' replaced", key);
        }
        self
    }

    /// Register a [`DataLoaderBuilder`] invoked once per request
    pub fn data_loader_builder<D: DataLoaderBuilder>(&self, key: &str, builder: D) -> &Self {
        self.batch_loader(key, BatchLoaderHandle::from_builder(builder))
    }

    pub fn data_loaders(&self) -> LoaderSnapshot<DataLoaderHandle> {
        snapshot(&self.data_loaders)
    }

    pub fn batch_loaders(&self) -> LoaderSnapshot<BatchLoaderHandle> {
        snapshot(&self.batch_loaders)
    }

    /// Loaders for one request, with fresh instances of every batch loader
    pub fn data_loader_registry(
        &self,
        options: &DataLoaderOptions,
        context: &LoaderContext,
    ) -> DataLoaderRegistry {
        DataLoaderRegistry::assemble(&self.data_loaders(), &self.batch_loaders(), options, context)
    }

    pub fn schema_builder(&self) -> &B {
        &self.schema_builder
    }

    pub fn schema_builder_mut(&mut self) -> &mut B {
        &mut self.schema_builder
    }

    /// Hand the collected configuration to the wiring code
    pub fn into_parts(
        self,
    ) -> (
        B,
        LoaderSnapshot<DataLoaderHandle>,
        LoaderSnapshot<BatchLoaderHandle>,
    ) {
        let data_loaders = self.data_loaders.into_iter().collect();
        let batch_loaders = self.batch_loaders.into_iter().collect();
        (self.schema_builder, data_loaders, batch_loaders)
    }
}

fn snapshot<V: Clone>(map: &DashMap<String, V>) -> LoaderSnapshot<V> {
    map.iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect()
}

fn read_resource<L: ResourceLocator + ?Sized>(locator: &L, name: &str) -> Result<String> {
    let wrap = |source: io::Error| ExtensionError::Resource {
        name: name.to_string(),
        source,
    };

    let mut reader = locator.open(name).map_err(wrap)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(wrap)?;

    String::from_utf8(bytes).map_err(|e| wrap(io::Error::new(io::ErrorKind::InvalidData, e)))
}
