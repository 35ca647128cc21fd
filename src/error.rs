use thiserror::Error;
use std::io;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("table '{0}' already exists")]
    TableExists(String),
    #[error("table '{0}' not found")]
    TableNotFound(String),
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    #[error("column '{0}' has no type, expected <name>:<type>")]
    MissingType(String),
    #[error("type '{0}' is not supported, expected str, int or bool")]
    UnsupportedType(String),
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("got {actual} values, expected {expected} ({columns}); all fields are mandatory")]
    ValueCountMismatch {
        expected: usize,
        actual: usize,
        columns: String,
    },
    #[error("field '{0}' cannot be empty")]
    EmptyField(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("a where clause is required")]
    MissingWhere,
    #[error("the ID column cannot be updated")]
    IdentityImmutable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;
