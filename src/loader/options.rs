use crate::loader::handle::{BatchLoaderWithContext, ContextDataLoader, ContextualLoader};

use async_graphql::dataloader::{DataLoader, HashMapCache};
use std::time::Duration;

/// Options applied to every data loader instantiated for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLoaderOptions {
    /// Maximum number of keys handed to a single batch load
    pub max_batch_size: usize,

    /// How long a loader waits for more keys before dispatching a batch
    pub delay: Duration,

    /// Whether loaded values are cached for the lifetime of the request
    pub cache: bool,
}

impl Default for DataLoaderOptions {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
            delay: Duration::from_millis(1),
            cache: true,
        }
    }
}

impl DataLoaderOptions {
    /// Wrap a contextual loader in a fresh `DataLoader` honoring these options
    pub fn instantiate<T: BatchLoaderWithContext>(
        &self,
        loader: ContextualLoader<T>,
    ) -> ContextDataLoader<T> {
        let data_loader = DataLoader::with_cache(loader, tokio::spawn, HashMapCache::new())
            .delay(self.delay)
            .max_batch_size(self.max_batch_size);
        data_loader.enable_all_cache(self.cache);
        data_loader
    }
}
