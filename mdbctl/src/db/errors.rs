use thiserror::Error;

/// Unified error type for catalog operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Establishing or re-establishing the client connection failed
    #[error("failed to connect to MongoDB: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// Any other driver-reported failure
    #[error("MongoDB driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A document payload that cannot be represented as BSON
    #[error("{message}")]
    InvalidDocument { message: String },
}

/// Type alias for catalog operation results
pub type Result<T> = std::result::Result<T, DbError>;
