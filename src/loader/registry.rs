use crate::loader::handle::{
    BatchLoaderHandle, BatchLoaderWithContext, ContextDataLoader, DataLoaderHandle, LoaderContext,
};
use crate::loader::options::DataLoaderOptions;
use crate::loader::snapshot::LoaderSnapshot;

use std::any::Any;
use std::collections::HashMap;

/// Data loaders available to a single request
///
/// Registered data loaders are shared as-is; every batch loader gets a fresh
/// `DataLoader` bound to the request's context. Attach the registry to a request with
/// `async_graphql::Request::data` and look loaders up from resolvers.
#[derive(Debug, Clone, Default)]
pub struct DataLoaderRegistry {
    loaders: HashMap<String, DataLoaderHandle>,
}

impl DataLoaderRegistry {
    /// Assemble the loaders for one request
    ///
    /// A key present in both mappings resolves to the batch loader instance.
    pub fn assemble(
        data_loaders: &LoaderSnapshot<DataLoaderHandle>,
        batch_loaders: &LoaderSnapshot<BatchLoaderHandle>,
        options: &DataLoaderOptions,
        context: &LoaderContext,
    ) -> Self {
        let mut loaders: HashMap<String, DataLoaderHandle> = data_loaders
            .iter()
            .map(|(key, handle)| (key.clone(), handle.clone()))
            .collect();

        for (key, batch_loader) in batch_loaders {
            let instance = batch_loader.instantiate(options, context);
            if loaders.insert(key.clone(), instance).is_some() {
                tracing::warn!(
                    "Batch loader '{}' shadows the data loader registered under the same key",
                    key
                );
            }
        }

        tracing::debug!("Assembled {} data loaders for request", loaders.len());

        Self { loaders }
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.loaders.get(key).and_then(DataLoaderHandle::downcast_ref::<T>)
    }

    /// Data loader instantiated from a registered [`BatchLoaderWithContext`]
    pub fn batch_loader<T>(&self, key: &str) -> Option<&ContextDataLoader<T>>
    where
        T: BatchLoaderWithContext,
    {
        self.get(key)
    }

    pub fn handle(&self, key: &str) -> Option<&DataLoaderHandle> {
        self.loaders.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}
