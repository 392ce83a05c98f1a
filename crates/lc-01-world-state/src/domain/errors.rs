use shared_types::errors::StoreError;
use thiserror::Error;

/// Rich query parse failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Query must contain a \"selector\" object")]
    MissingSelector,

    #[error("Unsupported operator {0} in selector")]
    UnsupportedOperator(String),

    #[error("\"fields\" must be an array of strings")]
    InvalidFields,
}

impl From<QueryError> for StoreError {
    fn from(err: QueryError) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}
