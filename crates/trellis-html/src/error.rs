use thiserror::Error;

/// Error type returned by caller-supplied collaborators.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by caller-supplied collaborators.
pub type CallbackResult<T> = Result<T, CallbackError>;

/// Errors that abort a parse. There is never a partial result.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A required delimiter could not be found before the end of input.
    #[error("malformed markup: expected {expected} at or after byte {position}")]
    MalformedMarkup {
        /// What the scanner was looking for.
        expected: &'static str,
        /// Byte offset the search started from.
        position: usize,
    },

    /// A resolver, converter, text processor or ignore predicate failed.
    #[error(transparent)]
    Callback(#[from] CallbackError),
}

impl ParseError {
    pub(crate) const fn malformed(expected: &'static str, position: usize) -> Self {
        Self::MalformedMarkup { expected, position }
    }
}
