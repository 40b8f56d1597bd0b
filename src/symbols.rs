use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::error::Span;

/// Canonical token kinds. Every accepted spelling of a connective maps onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Variable reference, by index into the alphabetically sorted variable table.
    Var(usize),
    And,
    Or,
    Not,
    Implies,
    Iff,
    True,
    False,
    OpenParen,
    CloseParen,
    Eof,
}

impl TokenKind {
    pub const fn is_binary_operator(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Implies | Self::Iff)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = Notation::Unicode.symbols();
        match self {
            Self::Var(_) => f.write_str("variable"),
            Self::And => write!(f, "'{}'", symbols.and),
            Self::Or => write!(f, "'{}'", symbols.or),
            Self::Not => write!(f, "'{}'", symbols.not),
            Self::Implies => write!(f, "'{}'", symbols.implies),
            Self::Iff => write!(f, "'{}'", symbols.iff),
            Self::True => write!(f, "'{}'", symbols.top),
            Self::False => write!(f, "'{}'", symbols.bot),
            Self::OpenParen => f.write_str("'('"),
            Self::CloseParen => f.write_str("')'"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Display glyphs of one notation.
///
/// `not` is followed by a space when the glyph is a word or a macro, otherwise the operand
/// would fuse with it on rescanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSet {
    pub top: &'static str,
    pub bot: &'static str,
    pub not: &'static str,
    pub and: &'static str,
    pub or: &'static str,
    pub implies: &'static str,
    pub iff: &'static str,
}

/// Concrete syntax used when rendering a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    #[default]
    Unicode,
    Ascii,
    Latex,
    English,
}

impl Notation {
    const fn variants<'a>() -> &'a [Self] {
        &[Self::Unicode, Self::Ascii, Self::Latex, Self::English]
    }

    fn matches(&self, s: &str) -> bool {
        match self {
            Self::Unicode => matches!(s, "unicode" | "Unicode" | "u" | "utf8"),
            Self::Ascii => matches!(s, "ascii" | "Ascii" | "ASCII" | "a"),
            Self::Latex => matches!(s, "latex" | "LaTeX" | "tex" | "l"),
            Self::English => matches!(s, "english" | "English" | "words" | "e"),
        }
    }

    pub const fn symbols(self) -> SymbolSet {
        match self {
            Self::Unicode => SymbolSet {
                top: "⊤",
                bot: "⊥",
                not: "¬",
                and: "∧",
                or: "∨",
                implies: "→",
                iff: "↔",
            },
            Self::Ascii => SymbolSet {
                top: "T",
                bot: "F",
                not: "~",
                and: "/\\",
                or: "\\/",
                implies: "->",
                iff: "<->",
            },
            Self::Latex => SymbolSet {
                top: "\\top",
                bot: "\\bot",
                not: "\\lnot ",
                and: "\\land",
                or: "\\lor",
                implies: "\\to",
                iff: "\\leftrightarrow",
            },
            Self::English => SymbolSet {
                top: "true",
                bot: "false",
                not: "not ",
                and: "and",
                or: "or",
                implies: "implies",
                iff: "iff",
            },
        }
    }
}

impl Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
            Self::Latex => "latex",
            Self::English => "english",
        })
    }
}

impl FromStr for Notation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants()
            .iter()
            .find(|variant| variant.matches(s))
            .ok_or_else(|| anyhow::anyhow!("cannot parse {s} as notation"))
            .copied()
    }
}
