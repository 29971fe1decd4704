//! Content loaders for reading battle data from files.

pub mod config;
pub mod factory;
pub mod unit_types;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use unit_types::{UnitCatalog, UnitTypeLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
