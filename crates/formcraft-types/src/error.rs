use thiserror::Error;

/// Errors from the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    #[error("blob too large: {0}")]
    TooLarge(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors related to form operations.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Description trop courte (minimum {min} caractères)")]
    SpecificationTooShort { min: usize },

    #[error("form not found: {0}")]
    NotFound(String),

    #[error("invalid form: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors related to submission collection.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Veuillez remplir au moins un champ (nom, email ou message)")]
    MissingContact,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
