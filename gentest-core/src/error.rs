//! Error types for gentest.

use thiserror::Error;

/// Main error type for gentest.
///
/// `Failure` and `Exception` describe a property that did not hold; they are
/// only produced when a caller asks for a failing property to be turned into
/// an error (see [`crate::Property::check`]). The runner itself reports
/// failing properties as data. The remaining variants are usage errors that
/// abort a run.
#[derive(Error, Debug)]
pub enum GentestError {
    /// The predicate returned false for the minimal counterexample.
    #[error("property `{property}` failed to hold, counterexample: {counterexample}")]
    Failure {
        property: String,
        counterexample: String,
    },

    /// The predicate panicked or returned an error for the minimal counterexample.
    #[error("property `{property}` raised {name}: {message}, counterexample: {counterexample}")]
    Exception {
        property: String,
        counterexample: String,
        name: String,
        message: String,
    },

    /// A filtered generator could not find an acceptable value.
    #[error("suchThat: could not find a suitable value after {tries} tries")]
    GenerationExhausted { tries: usize },

    /// A generator, property or run was constructed with invalid arguments.
    #[error("invalid usage: {message}")]
    Contract { message: String },

    /// The size parameter must be a positive integer.
    #[error("size must be a positive integer, got {size}")]
    InvalidSize { size: usize },

    /// Writing progress output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GentestError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        GentestError::Contract {
            message: message.into(),
        }
    }
}

/// Result type for gentest operations.
pub type Result<T> = std::result::Result<T, GentestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let exhausted = GentestError::GenerationExhausted { tries: 10 };
        assert_eq!(
            exhausted.to_string(),
            "suchThat: could not find a suitable value after 10 tries"
        );

        let failure = GentestError::Failure {
            property: "evens".to_string(),
            counterexample: "(1,)".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "property `evens` failed to hold, counterexample: (1,)"
        );
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let error: GentestError = io.into();
        assert!(matches!(error, GentestError::Io(_)));
    }
}
