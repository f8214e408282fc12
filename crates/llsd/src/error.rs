//! LLSD codec error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlsdError {
    /// A native value has no LLSD counterpart.
    #[error("{0} cannot be serialized into LLSD; convert it to a supported type first")]
    UnsupportedType(String),
    /// The input is not well-formed markup.
    #[error("malformed LLSD document at byte {position}: {message}")]
    MalformedDocument { position: u64, message: String },
    /// Raised by a user `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl LlsdError {
    pub(crate) fn unsupported(type_name: impl Into<String>) -> Self {
        LlsdError::UnsupportedType(type_name.into())
    }

    pub(crate) fn malformed(position: u64, message: impl Into<String>) -> Self {
        LlsdError::MalformedDocument {
            position,
            message: message.into(),
        }
    }
}

impl serde::ser::Error for LlsdError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        LlsdError::Custom(msg.to_string())
    }
}
