//! Data loader registration and per-request instantiation

mod handle;
mod options;
mod registry;
mod snapshot;

pub use handle::{
    BatchLoaderHandle, BatchLoaderWithContext, ContextDataLoader, ContextualLoader,
    DataLoaderBuilder, DataLoaderHandle, LoaderContext,
};
pub use options::DataLoaderOptions;
pub use registry::DataLoaderRegistry;
pub use snapshot::LoaderSnapshot;
