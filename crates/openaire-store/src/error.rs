use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database file not found: {0}")]
    DatabaseNotFound(std::path::PathBuf),

    #[error("no results for query")]
    NoResults,

    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("{0}")]
    Other(String),
}
