use async_graphql::ErrorExtensions;
use thiserror::Error;

pub type Result<T, E = TodoError> = std::result::Result<T, E>;

/// Code carried by input the schema or `validate` rejects.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("todo with id {0} not found")]
    NotFound(i32),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl TodoError {
    pub fn code(&self) -> &'static str {
        match self {
            TodoError::Validation(_) => VALIDATION_ERROR,
            TodoError::NotFound(_) => "NOT_FOUND",
            TodoError::Storage(_) | TodoError::Migration(_) => "STORAGE_ERROR",
        }
    }
}

impl ErrorExtensions for TodoError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}
