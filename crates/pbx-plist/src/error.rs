//! Error types for plist parsing.

/// Errors from reading ASCII plist text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlistError {
    /// A character that cannot start or continue the current production.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input ended inside a value.
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: &'static str },

    /// A `/* ... */` comment that is never closed.
    #[error("unterminated comment starting at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },

    /// Non-whitespace content after the root value.
    #[error("trailing content at {line}:{column}")]
    TrailingContent { line: usize, column: usize },

    /// The document root is not a dictionary.
    #[error("document root must be a dictionary")]
    RootNotDictionary,
}

/// Result alias for plist operations.
pub type PlistResult<T> = Result<T, PlistError>;
