//! Error handling module for the BIOS configuration store

use core::fmt;

/// Common error type used throughout the BIOS configuration store
///
/// Only [`Error::AttributeNotFound`] and [`Error::InvalidArgument`] ever cross
/// the capability interfaces. [`Error::Persistence`] is produced by the
/// persistence layer and is logged by the store rather than surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Attribute name is absent from the base table
    AttributeNotFound(String),
    /// Type mismatch, bound violation, duplicate boot option key or malformed value
    InvalidArgument(String),
    /// Encoding, decoding or file I/O failure while saving or loading the store
    Persistence(String),
}

impl Error {
    /// Returns true for [`Error::AttributeNotFound`]
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self, Error::AttributeNotFound(_))
    }

    /// Returns true for [`Error::InvalidArgument`]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AttributeNotFound(name) => write!(f, "Attribute not found: {}", name),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Persistence(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<bincode::error::EncodeError> for Error {
    fn from(err: bincode::error::EncodeError) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for Error {
    fn from(err: bincode::error::DecodeError) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

/// Result type for operations that can fail
pub type Result<T> = core::result::Result<T, Error>;

/// Creates a new attribute not found error
pub fn attribute_not_found(name: &str) -> Error {
    Error::AttributeNotFound(name.to_string())
}

/// Creates a new invalid argument error
pub fn invalid_argument(msg: &str) -> Error {
    Error::InvalidArgument(msg.to_string())
}

/// Creates a new persistence error
pub fn persistence(msg: &str) -> Error {
    Error::Persistence(msg.to_string())
}
