//! Error taxonomy for parsing, naming and inference.
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The input is not JSON, or its top-level value is neither an object nor an array.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse json with start \"{excerpt}\"")]
    UnsupportedShape { excerpt: String },

    #[error("invalid JSON at {path}: {message}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },
}

/// No identifier could be derived for a class.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("cannot derive a class name from {raw:?}")]
    Empty { raw: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferError {
    #[error("field `{field}` of `{schema}` is {first} but a later occurrence is {second}")]
    ConflictingField {
        schema: String,
        field: String,
        first: String,
        second: String,
    },

    #[error("JSON nesting exceeds the depth limit of {limit}")]
    TooDeep { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Infer(#[from] InferError),
}
