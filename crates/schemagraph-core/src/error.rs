use thiserror::Error;

/// Core error type shared across schemagraph crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or gateway failure.
    #[error("database error: {0}")]
    Db(String),
    /// The statistics source could not be reached at all.
    #[error("connection error: {0}")]
    Connection(String),
    /// A fact is missing an entity or column name.
    #[error("invalid fact: {0}")]
    InvalidFact(String),
    /// An identifier was not found in the catalog read during this pass.
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    /// Configuration could not be turned into a usable connection.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by schemagraph crates.
pub type Result<T> = std::result::Result<T, Error>;
