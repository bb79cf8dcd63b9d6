use thiserror::Error;

use crate::poems::CatalogError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("the poem library could not be loaded: {0}")]
    Catalog(#[from] CatalogError),
}
