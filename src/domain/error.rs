//! Engine and application error types.

use serde::Serialize;
use std::fmt;

fn caret_line(input: &str, position: usize) -> String {
    format!("{}\n{}^", input, " ".repeat(position))
}

/// An unrecognized character in formula text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unexpected character '{character}' at position {position}")]
pub struct LexError {
    pub position: usize,
    pub character: char,
}

impl LexError {
    /// Format the error with a caret pointing at the offending character.
    pub fn display_with_context(&self, input: &str) -> String {
        format!("{}\n{}", caret_line(input, self.position), self)
    }
}

/// A parse error with position information for formula parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        format!("{}\n{}", caret_line(input, self.position), self)
    }
}

/// A series that violates the ascending, date-unique invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("dates out of order: {next} follows {previous}")]
    Unsorted {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },

    #[error("duplicate date {date}")]
    DuplicateDate { date: chrono::NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    LexError,
    ParseError,
    ReferenceError,
    TypeError,
    InsufficientDataError,
    DivisionByZeroError,
    ComplexityLimitError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::LexError => "LexError",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::InsufficientDataError => "InsufficientDataError",
            ErrorKind::DivisionByZeroError => "DivisionByZeroError",
            ErrorKind::ComplexityLimitError => "ComplexityLimitError",
        };
        f.write_str(name)
    }
}

/// The single failure type returned by parsing and evaluating a formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown series or function '{name}'")]
    Reference { name: String },

    #[error("type error: {message}")]
    Type { message: String },

    #[error("insufficient data for {function}: {message}")]
    InsufficientData { function: String, message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("formula has {nodes} nodes, exceeding the limit of {limit}")]
    ComplexityLimit { nodes: usize, limit: usize },
}

impl EngineError {
    pub fn reference(name: impl Into<String>) -> Self {
        EngineError::Reference { name: name.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        EngineError::Type {
            message: message.into(),
        }
    }

    pub fn insufficient(function: &str, message: impl Into<String>) -> Self {
        EngineError::InsufficientData {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Lex(_) => ErrorKind::LexError,
            EngineError::Parse(_) => ErrorKind::ParseError,
            EngineError::Reference { .. } => ErrorKind::ReferenceError,
            EngineError::Type { .. } => ErrorKind::TypeError,
            EngineError::InsufficientData { .. } => ErrorKind::InsufficientDataError,
            EngineError::DivisionByZero => ErrorKind::DivisionByZeroError,
            EngineError::ComplexityLimit { .. } => ErrorKind::ComplexityLimitError,
        }
    }

    /// Source position for lexing and parsing failures.
    pub fn position(&self) -> Option<usize> {
        match self {
            EngineError::Lex(e) => Some(e.position),
            EngineError::Parse(e) => Some(e.position),
            _ => None,
        }
    }

    /// Render the error, adding a caret diagnostic when a source position is known.
    pub fn display_with_context(&self, formula: &str) -> String {
        match self {
            EngineError::Lex(e) => e.display_with_context(formula),
            EngineError::Parse(e) => e.display_with_context(formula),
            other => other.to_string(),
        }
    }
}

/// Serializable error shape: `{ kind, message, position? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl From<&EngineError> for ErrorReport {
    fn from(err: &EngineError) -> Self {
        ErrorReport {
            kind: err.kind(),
            message: err.to_string(),
            position: err.position(),
        }
    }
}

/// Top-level error type for econcalc.
#[derive(Debug, thiserror::Error)]
pub enum EconcalcError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to load series {name}: {reason}")]
    Data { name: String, reason: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EconcalcError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            EconcalcError::Io(_) => 1,
            EconcalcError::ConfigParse { .. }
            | EconcalcError::ConfigMissing { .. }
            | EconcalcError::ConfigInvalid { .. } => 2,
            EconcalcError::Data { .. } => 3,
            EconcalcError::Engine(EngineError::Lex(_) | EngineError::Parse(_)) => 4,
            EconcalcError::Engine(_) => 5,
        }
    }
}

impl From<&EconcalcError> for std::process::ExitCode {
    fn from(err: &EconcalcError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
