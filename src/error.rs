use std::fmt::{self, Display};
use std::iter;

use thiserror::Error;

/// Half-open range `[start, end)` of character offsets into the scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering a single character at `index`.
    pub const fn at(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Resource,
}

/// Every recoverable failure of scanning, parsing or table generation.
///
/// Each variant carries a human-readable message together with the span of the input
/// that caused it, so a presentation layer can underline the fault region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// The input contains a character (or character sequence) that is not part of any token.
    #[error("lexical error at {span}: {message}")]
    Lexical { message: String, span: Span },

    /// The token sequence does not form a well-formed formula.
    #[error("syntax error at {span}: {message}")]
    Syntax { message: String, span: Span },

    /// The requested enumeration exceeds the configured bound.
    #[error("resource error: {message}")]
    Resource { message: String, span: Span },
}

impl FormulaError {
    pub fn lexical<S: Into<String>>(message: S, span: Span) -> Self {
        Self::Lexical {
            message: message.into(),
            span,
        }
    }

    pub fn syntax<S: Into<String>>(message: S, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn resource<S: Into<String>>(message: S, span: Span) -> Self {
        Self::Resource {
            message: message.into(),
            span,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical { .. } => ErrorKind::Lexical,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::Resource { .. } => ErrorKind::Resource,
        }
    }

    pub const fn span(&self) -> Span {
        match self {
            Self::Lexical { span, .. } | Self::Syntax { span, .. } | Self::Resource { span, .. } => {
                *span
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexical { message, .. }
            | Self::Syntax { message, .. }
            | Self::Resource { message, .. } => message,
        }
    }

    /// Renders `input` on one line with a caret underline below the error span.
    ///
    /// Spans that reach past the input (the end-of-input token) are underlined one
    /// column beyond the last character.
    pub fn highlight(&self, input: &str) -> String {
        let line: String = input
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        let span = self.span();
        let width = span.len().max(1);

        let underline: String = iter::repeat(' ')
            .take(span.start)
            .chain(iter::repeat('^').take(width))
            .collect();

        format!("{line}\n{underline}")
    }
}
