use thiserror::Error;

use crate::catalog::Rarity;

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Catalog has no items of rarity {rarity:?}")]
    CatalogTierEmpty { rarity: Rarity },

    #[error("Starter creature '{id}' is not a creature in the catalog")]
    UnknownStarter { id: String },

    #[error("Duplicate catalog id '{id}'")]
    DuplicateItem { id: String },

    #[error("Task {id} not found")]
    TaskNotFound { id: i64 },

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PetResult<T> = Result<T, PetError>;
