use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Server(#[from] mongodb::error::Error),
    #[error("Failed to decode store document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
    #[error("Store rejected request: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid pipeline configuration: {0}")]
    Configuration(String),
    #[error("Invalid request: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Request cancelled")]
    Cancelled,
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}

impl From<mongodb::bson::de::Error> for CatalogError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}
