//! Opaque loader values
//!
//! Extensions register loaders of arbitrary types. The registry stores them behind
//! type-erased handles and only the code that registered a loader knows its concrete
//! type, recovered with `downcast_ref`.

use crate::loader::options::DataLoaderOptions;

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

/// `DataLoader` produced from a [`BatchLoaderWithContext`] for one request
pub type ContextDataLoader<T> = DataLoader<ContextualLoader<T>, HashMapCache>;

/// Request-scoped value handed to every batch load
#[derive(Clone, Default)]
pub struct LoaderContext {
    value: Option<Arc<dyn Any + Send + Sync>>,
}

impl LoaderContext {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Some(Arc::new(value)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_deref().and_then(|value| value.downcast_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderContext")
            .field("empty", &self.is_empty())
            .finish()
    }
}

/// Batch load function that also receives the request's [`LoaderContext`]
pub trait BatchLoaderWithContext: Send + Sync + 'static {
    type Key: Send + Sync + Hash + Eq + Clone + 'static;
    type Value: Send + Sync + Clone + 'static;
    type Error: Send + Clone + 'static;

    fn load(
        &self,
        keys: &[Self::Key],
        context: &LoaderContext,
    ) -> impl Future<Output = Result<HashMap<Self::Key, Self::Value>, Self::Error>> + Send;
}

/// Binds a batch loader to one request's context so it can drive a `DataLoader`
pub struct ContextualLoader<T> {
    loader: Arc<T>,
    context: LoaderContext,
}

impl<T> ContextualLoader<T> {
    pub fn new(loader: Arc<T>, context: LoaderContext) -> Self {
        Self { loader, context }
    }

    pub fn context(&self) -> &LoaderContext {
        &self.context
    }
}

impl<T: BatchLoaderWithContext> Loader<T::Key> for ContextualLoader<T> {
    type Value = T::Value;
    type Error = T::Error;

    async fn load(&self, keys: &[T::Key]) -> Result<HashMap<T::Key, T::Value>, T::Error> {
        tracing::debug!("Batch loading {} keys with {}", keys.len(), type_name::<T>());
        self.loader.load(keys, &self.context).await
    }
}

/// Produces a data loader from options, once per request
pub trait DataLoaderBuilder: Send + Sync + 'static {
    fn build_data_loader(&self, options: &DataLoaderOptions) -> DataLoaderHandle;
}

impl<F> DataLoaderBuilder for F
where
    F: Fn(&DataLoaderOptions) -> DataLoaderHandle + Send + Sync + 'static,
{
    fn build_data_loader(&self, options: &DataLoaderOptions) -> DataLoaderHandle {
        self(options)
    }
}

/// Type-erased data loader instance
#[derive(Clone)]
pub struct DataLoaderHandle {
    loader: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl DataLoaderHandle {
    pub fn new<T: Any + Send + Sync>(loader: T) -> Self {
        Self::from_arc(Arc::new(loader))
    }

    pub fn from_arc<T: Any + Send + Sync>(loader: Arc<T>) -> Self {
        Self {
            loader,
            type_name: type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.loader.downcast_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles refer to the same loader instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.loader), Arc::as_ptr(&other.loader))
    }
}

impl fmt::Debug for DataLoaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataLoaderHandle").field(&self.type_name).finish()
    }
}

type LoaderFactory = dyn Fn(&DataLoaderOptions, &LoaderContext) -> DataLoaderHandle + Send + Sync;

/// Type-erased batch loader function
///
/// Keeps the registered value for inspection and a factory that instantiates a fresh
/// data loader for each request.
#[derive(Clone)]
pub struct BatchLoaderHandle {
    loader: Arc<dyn Any + Send + Sync>,
    factory: Arc<LoaderFactory>,
    type_name: &'static str,
}

impl BatchLoaderHandle {
    pub fn new<T: BatchLoaderWithContext>(loader: T) -> Self {
        let loader = Arc::new(loader);
        let shared = Arc::clone(&loader);
        let factory = move |options: &DataLoaderOptions, context: &LoaderContext| {
            let contextual = ContextualLoader::new(Arc::clone(&shared), context.clone());
            DataLoaderHandle::new(options.instantiate(contextual))
        };

        Self {
            loader,
            factory: Arc::new(factory),
            type_name: type_name::<T>(),
        }
    }

    /// Wrap a [`DataLoaderBuilder`]; the request context is not passed to builders
    pub fn from_builder<B: DataLoaderBuilder>(builder: B) -> Self {
        let builder = Arc::new(builder);
        let shared = Arc::clone(&builder);
        let factory = move |options: &DataLoaderOptions, _context: &LoaderContext| {
            shared.build_data_loader(options)
        };

        Self {
            loader: builder,
            factory: Arc::new(factory),
            type_name: type_name::<B>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.loader.downcast_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.loader), Arc::as_ptr(&other.loader))
    }

    /// Build a fresh data loader for one request
    pub fn instantiate(
        &self,
        options: &DataLoaderOptions,
        context: &LoaderContext,
    ) -> DataLoaderHandle {
        (self.factory)(options, context)
    }
}

impl fmt::Debug for BatchLoaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BatchLoaderHandle").field(&self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares;

    impl BatchLoaderWithContext for Squares {
        type Key = i64;
        type Value = i64;
        type Error = String;

        async fn load(
            &self,
            keys: &[i64],
            context: &LoaderContext,
        ) -> Result<HashMap<i64, i64>, String> {
            let offset = context.get::<i64>().copied().unwrap_or(0);
            Ok(keys.iter().map(|k| (*k, k * k + offset)).collect())
        }
    }

    #[test]
    fn test_loader_context_downcast() {
        let context = LoaderContext::new(42_i64);
        assert_eq!(context.get::<i64>(), Some(&42));
        assert!(context.get::<String>().is_none());
        assert!(LoaderContext::empty().get::<i64>().is_none());
    }

    #[test]
    fn test_data_loader_handle_downcast() {
        let handle = DataLoaderHandle::new(String::from("loader"));
        assert_eq!(handle.downcast_ref::<String>().map(String::as_str), Some("loader"));
        assert!(handle.downcast_ref::<i64>().is_none());
        assert!(handle.type_name().contains("String"));
    }

    #[test]
    fn test_handle_clones_share_instance() {
        let handle = DataLoaderHandle::new(7_u8);
        let other = DataLoaderHandle::new(7_u8);
        assert!(handle.ptr_eq(&handle.clone()));
        assert!(!handle.ptr_eq(&other));
    }

    #[test]
    fn test_batch_loader_handle_keeps_loader() {
        let handle = BatchLoaderHandle::new(Squares);
        assert!(handle.downcast_ref::<Squares>().is_some());
        assert!(handle.type_name().ends_with("Squares"));
    }

    #[tokio::test]
    async fn test_instantiated_loader_uses_request_context() {
        let handle = BatchLoaderHandle::new(Squares);
        let context = LoaderContext::new(1_i64);
        let instance = handle.instantiate(&DataLoaderOptions::default(), &context);

        let loader = instance
            .downcast_ref::<ContextDataLoader<Squares>>()
            .expect("contextual data loader expected");
        assert_eq!(loader.loader().context().get::<i64>(), Some(&1));
        assert_eq!(loader.load_one(3).await.unwrap(), Some(10));
        assert_eq!(loader.load_one(4).await.unwrap(), Some(17));
    }

    #[tokio::test]
    async fn test_each_instantiation_is_fresh() {
        let handle = BatchLoaderHandle::new(Squares);
        let options = DataLoaderOptions::default();

        let first = handle.instantiate(&options, &LoaderContext::empty());
        let second = handle.instantiate(&options, &LoaderContext::new(100_i64));
        assert!(!first.ptr_eq(&second));

        let second = second.downcast_ref::<ContextDataLoader<Squares>>().unwrap();
        assert_eq!(second.load_one(2).await.unwrap(), Some(104));
    }

    #[test]
    fn test_builder_handle_instantiates_through_builder() {
        let handle = BatchLoaderHandle::from_builder(|options: &DataLoaderOptions| {
            DataLoaderHandle::new(options.max_batch_size)
        });
        let options = DataLoaderOptions {
            max_batch_size: 5,
            ..DataLoaderOptions::default()
        };

        let instance = handle.instantiate(&options, &LoaderContext::empty());
        assert_eq!(instance.downcast_ref::<usize>(), Some(&5));
    }
}
