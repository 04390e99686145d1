//! Error types for schema construction and argument parsing.
//!
//! Schema errors are returned from registration calls and indicate a
//! programming mistake. Parse errors are produced per invocation and are
//! rendered to the user through the exit primitive with code 1.

use thiserror::Error;

/// Errors raised while registering options and actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An option was built without any alias.
    #[error("the option alias list is mandatory")]
    MissingAliases,

    /// An alias is empty once dashes and whitespace are trimmed.
    #[error("invalid option alias '{0}'")]
    InvalidAlias(String),

    /// The same alias maps to two different options within one action.
    #[error("found duplicated option '{alias}' in '{action}'; option names should be unique")]
    DuplicateOption { alias: String, action: String },

    /// Two sibling actions share a name.
    #[error("duplicated action name '{0}'")]
    DuplicatedActionName(String),
}

/// Errors raised while matching and validating an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing value after '{option}'.")]
    MissingValue { option: String },

    #[error("Option '{option}' does not take a value.")]
    UnexpectedValue { option: String },

    #[error("Missing required option '{option}'.")]
    MissingRequiredOption { option: String },

    #[error("Invalid value '{value}' for option '{option}'.")]
    InvalidOptionValue { option: String, value: String },

    #[error("Invalid value '{value}' for argument '{arg}'.")]
    InvalidArgValue { arg: String, value: String },

    #[error("Missing command argument '{arg}'.")]
    MissingActionArg { arg: String },

    #[error("Too many arguments passed to this action (expected {expected}, got {got}).")]
    TooManyActionArgs { expected: usize, got: usize },

    #[error("Unknown option '{option}'.")]
    UnknownOption { option: String },
}

impl ParseError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingValue { .. } => "MISSING_VALUE",
            Self::UnexpectedValue { .. } => "UNEXPECTED_VALUE",
            Self::MissingRequiredOption { .. } => "MISSING_REQUIRED_OPTION",
            Self::InvalidOptionValue { .. } => "INVALID_OPTION_VALUE",
            Self::InvalidArgValue { .. } => "INVALID_ARG_VALUE",
            Self::MissingActionArg { .. } => "MISSING_ACTION_ARG",
            Self::TooManyActionArgs { .. } => "TOO_MANY_ACTION_ARGS",
            Self::UnknownOption { .. } => "UNKNOWN_OPTION",
        }
    }

    /// Render the message shown to the user, including the `--help` hint.
    pub fn user_message(&self, exe: &str) -> String {
        format!("{}: {self}\nRun '{exe} --help' for help.", self.code())
    }
}

/// Errors raised while loading a program manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest does not define a program name")]
    MissingName,
}
