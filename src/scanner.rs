use std::collections::BTreeSet;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{FormulaError, Span};
use crate::log::targets::SCANNER as LOG_SCANNER;
use crate::symbols::{Token, TokenKind};

lazy_static! {
    /// Any character outside the accepted alphabet.
    static ref ILLEGAL: Regex =
        Regex::new(r"[^A-Za-z0-9_\s\\/<>\-\~\^()\&\|=!∧∨→↔⊤⊥¬]").expect("illegal-character pattern");

    /// Operator spellings, longest first so that no alias shadows a longer one it prefixes.
    static ref OPERATORS: Vec<(&'static str, TokenKind)> = {
        let mut aliases = ALIASES.to_vec();
        aliases.sort_by_key(|(alias, _)| std::cmp::Reverse(alias.chars().count()));
        aliases
    };
}

const ALIASES: &[(&str, TokenKind)] = &[
    ("/\\", TokenKind::And),
    ("&&", TokenKind::And),
    ("&", TokenKind::And),
    ("and", TokenKind::And),
    ("∧", TokenKind::And),
    ("\\land", TokenKind::And),
    ("\\wedge", TokenKind::And),
    ("^", TokenKind::And),
    ("\\/", TokenKind::Or),
    ("||", TokenKind::Or),
    ("or", TokenKind::Or),
    ("∨", TokenKind::Or),
    ("\\lor", TokenKind::Or),
    ("\\vee", TokenKind::Or),
    ("->", TokenKind::Implies),
    ("=>", TokenKind::Implies),
    ("→", TokenKind::Implies),
    ("implies", TokenKind::Implies),
    ("\\to", TokenKind::Implies),
    ("\\rightarrow", TokenKind::Implies),
    ("\\Rightarrow", TokenKind::Implies),
    ("<->", TokenKind::Iff),
    ("<=>", TokenKind::Iff),
    ("↔", TokenKind::Iff),
    ("iff", TokenKind::Iff),
    ("\\leftrightarrow", TokenKind::Iff),
    ("\\Leftrightarrow", TokenKind::Iff),
    ("~", TokenKind::Not),
    ("not", TokenKind::Not),
    ("!", TokenKind::Not),
    ("¬", TokenKind::Not),
    ("\\lnot", TokenKind::Not),
    ("\\neg", TokenKind::Not),
    ("T", TokenKind::True),
    ("⊤", TokenKind::True),
    ("true", TokenKind::True),
    ("\\top", TokenKind::True),
    ("F", TokenKind::False),
    ("⊥", TokenKind::False),
    ("false", TokenKind::False),
    ("\\bot", TokenKind::False),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
];

/// Identifier-shaped words that denote constants or connectives and can never name a variable.
pub const RESERVED_WORDS: &[&str] = &[
    "T", "F", "and", "or", "not", "iff", "implies", "true", "false",
];

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Token stream together with the variable table its `Var` indices refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    pub tokens: Vec<Token>,
    pub vars: Vec<String>,
}

/// Token before variable numbering: variables still carry their name.
enum RawToken<'a> {
    Symbol(TokenKind, Span),
    Var(&'a str, Span),
}

/// Scans `input` into tokens terminated by [`TokenKind::Eof`].
///
/// Variables are numbered by the alphabetical order of their names, independent of the
/// order in which they first appear.
pub fn scan(input: &str) -> Result<Scanned, FormulaError> {
    check_alphabet(input)?;

    let (raw, names) = scan_named(input)?;
    let vars: Vec<String> = names.into_iter().map(str::to_string).collect();

    let index: FxHashMap<&str, usize> = vars
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let tokens: Vec<Token> = raw
        .into_iter()
        .map(|t| match t {
            RawToken::Symbol(kind, span) => Token::new(kind, span),
            RawToken::Var(name, span) => Token::new(TokenKind::Var(index[name]), span),
        })
        .collect();

    log::debug!(
        target: LOG_SCANNER,
        "scanned {} tokens, variables [{}]",
        tokens.len(),
        vars.iter().join(", ")
    );

    Ok(Scanned { tokens, vars })
}

fn check_alphabet(input: &str) -> Result<(), FormulaError> {
    match ILLEGAL.find(input) {
        Some(m) => {
            let position = input[..m.start()].chars().count();
            Err(FormulaError::lexical(
                format!("illegal character '{}'", m.as_str()),
                Span::at(position),
            ))
        }
        None => Ok(()),
    }
}

/// First pass: tokenizes with variables left by name and collects the distinct names.
fn scan_named(input: &str) -> Result<(Vec<RawToken<'_>>, BTreeSet<&str>), FormulaError> {
    // (byte offset, char) per character, so spans can be reported in characters
    let chars: Vec<(usize, char)> = input.char_indices().collect();

    let mut tokens = Vec::new();
    let mut names = BTreeSet::new();
    let mut pos = 0;

    while let Some(&(offset, c)) = chars.get(pos) {
        let rest = &input[offset..];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if let Some(word) = variable_at(rest) {
            let len = word.chars().count();
            log::trace!(target: LOG_SCANNER, "variable {word} at {pos}");
            names.insert(word);
            tokens.push(RawToken::Var(word, Span::new(pos, pos + len)));
            pos += len;
        } else if let Some((alias, kind)) = operator_at(rest) {
            let len = alias.chars().count();
            log::trace!(target: LOG_SCANNER, "{alias} as {kind} at {pos}");
            tokens.push(RawToken::Symbol(kind, Span::new(pos, pos + len)));
            pos += len;
        } else {
            return Err(FormulaError::lexical(
                format!("the character '{c}' does not start any operator"),
                Span::at(pos),
            ));
        }
    }

    tokens.push(RawToken::Symbol(TokenKind::Eof, Span::at(chars.len())));

    Ok((tokens, names))
}

/// Reads a full identifier at the start of `rest` unless it is a reserved word.
fn variable_at(rest: &str) -> Option<&str> {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }

    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let word = &rest[..end];

    (!is_reserved_word(word)).then_some(word)
}

fn operator_at(rest: &str) -> Option<(&'static str, TokenKind)> {
    OPERATORS
        .iter()
        .find(|(alias, _)| rest.starts_with(alias))
        .copied()
}
