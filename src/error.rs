//! Error types for verbkit.
//!
//! Option-grammar failures, handler-declared argument failures and
//! malformed command definitions each get their own enum. `VerbkitError`
//! wraps the ones that can escape to the binary.

use thiserror::Error;

/// Failure reported by the option-switch grammar.
///
/// The payload is the offending command-line text, shown to the user on a
/// line of its own below the headline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("I do not understand the option: {0}")]
    InvalidOption(String),

    #[error("The option in question is: {0}")]
    InvalidArgument(String),

    #[error("I am not sure what option you mean: {0}")]
    AmbiguousOption(String),

    #[error("I am not sure what argument you mean: {0}")]
    AmbiguousArgument(String),

    #[error("This is the option in question: {0}")]
    MissingArgument(String),

    /// Any other grammar failure.
    #[error("{0}")]
    Malformed(String),
}

impl GrammarError {
    /// Returns the one-line headline printed above the detail line.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::InvalidOption(_) => "Error: Invalid Option",
            Self::InvalidArgument(_) => "Error: You have entered an invalid argument to an option",
            Self::AmbiguousOption(_) | Self::AmbiguousArgument(_) => {
                "Error: You need to be clearer than that"
            }
            Self::MissingArgument(_) => "Error: You need to provide an argument with that option",
            Self::Malformed(_) => "Error: the command line is not as expected",
        }
    }
}

/// A required positional argument was missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the headline printed above the message.
    pub fn category(&self) -> &'static str {
        "Error: Missing argument"
    }
}

/// A command definition that cannot be dispatched safely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The same action name was declared twice in one registry.
    #[error("action '{0}' is declared more than once")]
    DuplicateAction(String),

    /// Detailed help was attached to a name that was never declared.
    #[error("help attached to undeclared action '{0}'")]
    HelpForUndeclaredAction(String),

    /// An action was declared without a handler to run it.
    #[error("action '{0}' has no handler")]
    MissingHandler(String),

    /// A handler was bound to a name that was never declared.
    #[error("handler bound to undeclared action '{0}'")]
    HandlerForUndeclaredAction(String),
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Main error type for verbkit operations that escape a dispatch run.
#[derive(Error, Debug)]
pub enum VerbkitError {
    /// Malformed command definition.
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Unreadable or invalid configuration file.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerbkitError {
    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Definition(_) => "Definition Error",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using VerbkitError.
pub type Result<T> = std::result::Result<T, VerbkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_display() {
        let err = GrammarError::InvalidOption("-x".to_string());
        assert_eq!(err.to_string(), "I do not understand the option: -x");
        assert_eq!(err.headline(), "Error: Invalid Option");
    }

    #[test]
    fn test_ambiguous_errors_share_headline() {
        let opt = GrammarError::AmbiguousOption("--al".to_string());
        let arg = GrammarError::AmbiguousArgument("--environment de".to_string());
        assert_eq!(opt.headline(), arg.headline());
        assert_eq!(
            arg.to_string(),
            "I am not sure what argument you mean: --environment de"
        );
    }

    #[test]
    fn test_missing_argument_display() {
        let err = GrammarError::MissingArgument("--environment".to_string());
        assert_eq!(
            err.headline(),
            "Error: You need to provide an argument with that option"
        );
        assert_eq!(
            err.to_string(),
            "This is the option in question: --environment"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Which file?");
        assert_eq!(err.to_string(), "Which file?");
        assert_eq!(err.category(), "Error: Missing argument");
    }

    #[test]
    fn test_definition_error_wraps() {
        let err: VerbkitError = DefinitionError::DuplicateAction("show".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Definition error: action 'show' is declared more than once"
        );
        assert_eq!(err.category(), "Definition Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VerbkitError>();
        assert_send_sync::<GrammarError>();
    }
}
