//! Catalog management commands.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Catalog directory when `--data-dir` is not given

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumina_luxe_core::{Product, ProductError, validate_catalog};
use lumina_luxe_storefront::catalog::{
    CATALOG_KEY, CatalogError, CatalogStore, FileStorage, KeyValueStorage, LoadSource,
    StorageError, default_products,
};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "data";

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// Catalog store failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Import file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Import file is not a product list.
    #[error("Invalid product JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Import file violates a product invariant.
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ProductError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Resolve the catalog directory.
pub fn data_dir(arg: Option<PathBuf>) -> PathBuf {
    dotenvy::dotenv().ok();

    arg.or_else(|| {
        std::env::var("STOREFRONT_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

async fn open(dir: &Path) -> Result<CatalogStore, CatalogCommandError> {
    let storage = Arc::new(FileStorage::new(dir));
    Ok(CatalogStore::load(storage).await?)
}

/// Write the raw persisted catalog to `out`, pretty-printed.
///
/// Does not seed; an empty store prints nothing and logs a warning.
///
/// # Errors
///
/// Returns an error if the store can't be read or the output can't be written.
pub async fn show(dir: &Path, out: &mut impl Write) -> Result<(), CatalogCommandError> {
    let storage = FileStorage::new(dir);
    let Some(raw) = storage.read(CATALOG_KEY).await? else {
        tracing::warn!(dir = %dir.display(), "No catalog stored yet");
        return Ok(());
    };

    match serde_json::from_str::<Vec<Product>>(&raw) {
        Ok(products) => writeln!(out, "{}", serde_json::to_string_pretty(&products)?)?,
        Err(e) => {
            tracing::warn!(error = %e, "Stored catalog is malformed, printing raw value");
            writeln!(out, "{raw}")?;
        }
    }
    Ok(())
}

/// Seed the default catalog if nothing valid is stored.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or written.
pub async fn seed(dir: &Path) -> Result<(), CatalogCommandError> {
    let store = open(dir).await?;
    match store.source() {
        LoadSource::Seeded => tracing::info!(count = store.len().await, "Default catalog written"),
        LoadSource::Persisted => {
            tracing::info!(count = store.len().await, "Catalog already present, left unchanged");
        }
    }
    Ok(())
}

/// Overwrite the catalog with the default set.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or written.
pub async fn reset(dir: &Path) -> Result<(), CatalogCommandError> {
    let store = open(dir).await?;
    store.replace(default_products()).await?;
    tracing::info!(count = store.len().await, "Catalog reset to defaults");
    Ok(())
}

/// Replace the catalog with a validated product list from `file`.
///
/// # Errors
///
/// Returns an error if the file can't be read, isn't a valid product list, or
/// the catalog can't be written. The stored catalog is untouched on error.
pub async fn import(dir: &Path, file: &Path) -> Result<usize, CatalogCommandError> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CatalogCommandError::Read {
            path: file.to_path_buf(),
            source,
        })?;
    let products: Vec<Product> = serde_json::from_str(&content)?;
    validate_catalog(&products)?;

    let count = products.len();
    let store = open(dir).await?;
    store.replace(products).await?;
    Ok(count)
}
