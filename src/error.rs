//! Error types for the verb shell.

/// Failure of a setter to turn an option value into typed state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("a value is required")]
    MissingValue,

    #[error("`{value}` is not {expected}")]
    Invalid {
        value: String,
        expected: &'static str,
    },
}

/// Errors produced by the dispatch and registration layers.
///
/// Tokenizing and option resolution never fail; only setters and verb
/// registration can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bound setter rejected its value. Aborts the current dispatch only.
    #[error("option `{key}`: {source}")]
    Conversion {
        key: String,
        source: ConversionError,
    },

    #[error("{0} is a reserved verb")]
    ReservedVerb(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
