use thiserror::Error;

/// Errors that can occur when configuring or constructing a latency statistics buffer.
///
/// Once a buffer exists, none of its operations fail. Querying an empty buffer or a buffer with
/// degenerate timestamps yields well-defined zero values instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The buffer capacity was zero. A buffer must be able to hold at least one sample.
    #[error("buffer capacity must be at least 1")]
    ZeroCapacity,

    /// The sample interval was zero. At least one tick must separate recorded samples.
    #[error("sample interval must be at least 1")]
    ZeroSampleInterval,

    /// A configuration document contained a value that could not be accepted.
    #[error("invalid configuration value for '{key}': {problem}")]
    InvalidConfig {
        /// The configuration key that holds the offending value.
        key: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// A configuration document was not valid TOML.
    #[error("configuration is not valid TOML: {0}")]
    ConfigSyntax(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid_config(key: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for latency buffer operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
