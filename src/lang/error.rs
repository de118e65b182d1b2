//! Toolchain error type shared by the lexer, parser and interpreter.

use std::fmt;

/// Result type for toolchain operations.
pub type LangResult<T> = Result<T, LangError>;

/// Error categories, named after the JavaScript error classes they map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Type,
    Reference,
    Range,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Range => "RangeError",
        }
    }
}

/// An error produced while lexing, parsing, transforming or executing.
///
/// `line`/`column` are 1-based; both zero means "no source position"
/// (runtime errors have no position in this engine).
#[derive(Debug, Clone, PartialEq)]
pub struct LangError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl LangError {
    pub fn syntax<S: Into<String>>(message: S, line: usize, column: usize) -> Self {
        LangError {
            kind: ErrorKind::Syntax,
            message: message.into(),
            line,
            column,
        }
    }

    pub fn type_error<S: Into<String>>(message: S) -> Self {
        LangError {
            kind: ErrorKind::Type,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn reference<S: Into<String>>(message: S) -> Self {
        LangError {
            kind: ErrorKind::Reference,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn range<S: Into<String>>(message: S) -> Self {
        LangError {
            kind: ErrorKind::Range,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(
                f,
                "{}: {} ({}:{})",
                self.kind.name(),
                self.message,
                self.line,
                self.column
            )
        } else {
            write!(f, "{}: {}", self.kind.name(), self.message)
        }
    }
}

impl std::error::Error for LangError {}
