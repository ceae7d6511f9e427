use thiserror::Error;

/// Failures the helpers can report.
///
/// Only `InvalidTypeName` and `Decode` ever leave the library as an `Err`
/// from the permissive entry points; the path variants are logged and
/// swallowed there, and returned only by the `resolve` forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown type name {0:?}")]
    InvalidTypeName(String),

    #[error("bad path: {0}")]
    BadPath(String),

    #[error("bad object: {0}")]
    BadObject(String),

    #[error("bad function at path: {0}")]
    MissingTarget(String),

    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
