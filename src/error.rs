//! Error types for TOON serialization and deserialization.
//!
//! This module provides comprehensive error reporting with contextual information
//! to help diagnose and fix TOON format issues.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: Invalid TOON syntax with line/column information
//! - **Type Mismatches**: Attempted to deserialize to incompatible type
//! - **Indentation Errors**: Incorrect nesting/indentation (TOON uses 2-space indents)
//! - **I/O Errors**: File reading/writing failures
//!
//! ## Error Context
//!
//! All parsing errors include:
//! - Line and column numbers
//! - Context showing the problematic code
//! - Helpful suggestions for common mistakes
//!
//! ## Examples
//!
//! ```rust
//! use serde_toon::{from_str, Error, ToonValue};
//!
//! let result: Result<ToonValue, Error> = from_str("invalid: [malformed");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//!     // Error messages include line numbers and suggestions
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during TOON serialization/deserialization.
///
/// Each error variant includes contextual information to aid debugging.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Syntax error with detailed context
    #[error("Syntax error at line {line}, column {col}:\n{context}\n{msg}{suggestion}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
        suggestion: String,
    },

    /// Type mismatch during deserialization
    #[error("Type mismatch at line {line}, column {col}: expected {expected}, found {found}")]
    TypeMismatch {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Indentation error in nested structures
    #[error("Indentation error at line {line}, column {col}:\n{context}\nExpected {expected} spaces, found {found} spaces\nHelp: TOON uses 2-space indentation for nested objects")]
    IndentationError {
        line: usize,
        col: usize,
        expected: usize,
        found: usize,
        context: String,
    },

    /// Unsupported type for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Invalid TOON format
    #[error("Invalid TOON format at line {line}, column {col}: {msg}")]
    InvalidFormat {
        line: usize,
        col: usize,
        msg: String,
    },

    /// Unexpected end of input
    #[error(
        "Unexpected end of input at line {line}, column {col}\n{context}\nExpected: {expected}"
    )]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
        context: String,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),

    /// Generic message
    #[error("{0}")]
    Message(String),

    /// Array/object header missing its colon, unbalanced brackets, or a non-numeric length.
    #[error("Malformed header at line {line}: {msg}")]
    MalformedHeader { line: usize, msg: String },

    /// Declared array length differs from the number of elements actually present.
    #[error("Length mismatch at line {line}: header declared {declared} item(s), found {actual}")]
    LengthMismatch {
        line: usize,
        declared: usize,
        actual: usize,
    },

    /// A row or field used a delimiter other than the one declared by the enclosing header.
    #[error("Delimiter mismatch at line {line}: expected '{expected}', found '{found}'")]
    DelimiterMismatch {
        line: usize,
        expected: char,
        found: char,
    },

    /// An unknown escape sequence appeared inside a quoted string.
    #[error("Bad escape at line {line}, column {col}: unknown escape sequence '\\{escape}'")]
    BadEscape {
        line: usize,
        col: usize,
        escape: char,
    },

    /// A quoted string had no closing quote on the same line.
    #[error("Unterminated string at line {line}, column {col}")]
    UnterminatedString { line: usize, col: usize },

    /// The event stream ended mid-value (e.g. a trailing key with no value).
    #[error("Incomplete event stream: {msg}")]
    IncompleteStream { msg: String },

    /// Path expansion merged an object with a primitive or array at the same path.
    #[error("Expansion conflict at path {path}: object vs {kind}")]
    ExpansionConflict { path: String, kind: String },

    /// A decode option is not supported in the requested mode (e.g. `expandPaths` while streaming).
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// Use [`Error::syntax_with_context`] for more detailed error messages.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toon::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: String::new(),
            suggestion: String::new(),
        }
    }

    /// Creates a syntax error with full context and helpful suggestion.
    ///
    /// This provides richer error messages than [`Error::syntax`] by including
    /// the problematic code context and an optional suggestion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toon::Error;
    ///
    /// let err = Error::syntax_with_context(
    ///     10,
    ///     5,
    ///     "missing colon",
    ///     "name Alice",
    ///     Some("Did you mean 'name: Alice'?"),
    /// );
    /// assert!(err.to_string().contains("Help:"));
    /// ```
    pub fn syntax_with_context(
        line: usize,
        col: usize,
        msg: &str,
        context: &str,
        suggestion: Option<&str>,
    ) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
            suggestion: suggestion
                .map(|s| format!("\nHelp: {}", s))
                .unwrap_or_default(),
        }
    }

    /// Creates a type mismatch error when deserialization fails due to incompatible types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toon::Error;
    ///
    /// let err = Error::type_mismatch(5, 10, "integer", "string");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an indentation error (TOON uses 2-space indentation for nested objects).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toon::Error;
    ///
    /// let err = Error::indentation_error(8, 1, 2, 4, "  name: Alice");
    /// assert!(err.to_string().contains("Expected 2 spaces"));
    /// ```
    pub fn indentation_error(
        line: usize,
        col: usize,
        expected: usize,
        found: usize,
        context: &str,
    ) -> Self {
        Error::IndentationError {
            line,
            col,
            expected,
            found,
            context: context.to_string(),
        }
    }

    /// Creates an invalid format error for malformed TOON syntax.
    pub fn invalid_format(line: usize, col: usize, msg: &str) -> Self {
        Error::InvalidFormat {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-file error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str, context: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an unsupported type error for types that cannot be serialized to TOON.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toon::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a malformed-header error (missing colon, unbalanced brackets, bad length).
    pub fn malformed_header(line: usize, msg: impl Into<String>) -> Self {
        Error::MalformedHeader {
            line,
            msg: msg.into(),
        }
    }

    /// Creates a length-mismatch error between a header's declared length and the actual count.
    pub fn length_mismatch(line: usize, declared: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            line,
            declared,
            actual,
        }
    }

    /// Creates a delimiter-mismatch error.
    pub fn delimiter_mismatch(line: usize, expected: char, found: char) -> Self {
        Error::DelimiterMismatch {
            line,
            expected,
            found,
        }
    }

    /// Creates a bad-escape error for an unrecognized escape sequence.
    pub fn bad_escape(line: usize, col: usize, escape: char) -> Self {
        Error::BadEscape { line, col, escape }
    }

    /// Creates an unterminated-string error.
    pub fn unterminated_string(line: usize, col: usize) -> Self {
        Error::UnterminatedString { line, col }
    }

    /// Creates an incomplete-event-stream error.
    pub fn incomplete_stream(msg: impl Into<String>) -> Self {
        Error::IncompleteStream { msg: msg.into() }
    }

    /// Creates a path-expansion conflict error.
    pub fn expansion_conflict(path: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::ExpansionConflict {
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// Creates an unsupported-option error.
    pub fn unsupported_option(msg: impl Into<String>) -> Self {
        Error::UnsupportedOption(msg.into())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
