use thiserror::Error;

/// Errors returned by the clustering entry points in this crate.
///
/// Every precondition violation is reported before any clustering state is
/// allocated, so an `Err` never carries a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// An argument violates a precondition of the called entry point.
    #[error("invalid argument {name}: {message}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::invalid("eps", "must be positive, got -1");
        assert_eq!(err.to_string(), "invalid argument eps: must be positive, got -1");
    }
}
