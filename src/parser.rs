use std::io::BufRead;
use std::iter::Peekable;
use std::slice::Iter;
use std::str::FromStr;

use itertools::Itertools;

use crate::ast::Expr;
use crate::error::{FormulaError, Span};
use crate::log::targets::PARSER as LOG_PARSER;
use crate::scanner::{scan, Scanned};
use crate::symbols::{Notation, Token, TokenKind};
use crate::truth_table::{TableConfig, TruthTable, TruthTableEntry};

type TokenReader<'a> = Peekable<Iter<'a, Token>>;

/// A scanned and parsed formula together with its variable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormula {
    pub vars: Vec<String>,
    pub expr: Expr,
    /// Span of the whole input, reported by errors that have no single fault position.
    pub span: Span,
}

impl ParsedFormula {
    pub fn new(contents: &mut dyn BufRead) -> anyhow::Result<Self> {
        let mut src = String::new();
        contents.read_to_string(&mut src)?;

        Ok(src.parse()?)
    }

    pub fn eval(&self, assignment: &[bool]) -> bool {
        self.expr.eval(assignment)
    }

    pub fn render(&self, notation: Notation) -> String {
        self.expr.render(&self.vars, notation)
    }

    pub fn truth_table(&self, config: &TableConfig) -> Result<TruthTable, FormulaError> {
        TruthTable::build(self, config)
    }

    pub fn name2var(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| v == name)
    }

    pub fn var2name(&self, var: usize) -> &str {
        &self.vars[var]
    }

    /// Parses an assignment of the form `p=T, q=false`, binding every variable exactly once.
    pub fn parse_assignment(&self, src: &str) -> anyhow::Result<Vec<bool>> {
        let mut assignment: Vec<Option<bool>> = vec![None; self.vars.len()];

        for binding in src.split(',').map(str::trim).filter(|b| !b.is_empty()) {
            let (name, value) = binding
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("expected name=value, got {binding}"))?;
            let (name, value) = (name.trim(), value.trim());

            let var = self
                .name2var(name)
                .ok_or_else(|| anyhow::anyhow!("unknown variable {name}"))?;

            let value = match value.parse::<TruthTableEntry>()? {
                TruthTableEntry::True => true,
                TruthTableEntry::False => false,
                TruthTableEntry::Any => anyhow::bail!("{name} must be bound to true or false"),
            };

            if assignment[var].replace(value).is_some() {
                anyhow::bail!("{name} is assigned more than once");
            }
        }

        let missing = assignment
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| self.var2name(i))
            .join(", ");

        if !missing.is_empty() {
            anyhow::bail!("no value given for {missing}");
        }

        Ok(assignment.into_iter().flatten().collect())
    }
}

impl FromStr for ParsedFormula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Scanned { tokens, vars } = scan(s)?;
        let expr = parse(&tokens)?;

        log::debug!(target: LOG_PARSER, "parsed formula of {} nodes", expr.size());

        Ok(Self {
            vars,
            expr,
            span: Span::new(0, s.chars().count()),
        })
    }
}

/// Deepest nesting of operators and parentheses the parser accepts.
///
/// Evaluating, rendering and dropping an [`Expr`] recurse once per level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses a token sequence terminated by [`TokenKind::Eof`] into an expression.
///
/// Precedence from tightest to loosest: not, and, or, implies (right-associative), iff.
pub fn parse(tokens: &[Token]) -> Result<Expr, FormulaError> {
    let mut reader = tokens.iter().peekable();

    let result = parse_iff(&mut reader, 0)?;

    match reader.next() {
        Some(Token {
            kind: TokenKind::Eof,
            ..
        }) => Ok(result),
        Some(Token {
            kind: TokenKind::CloseParen,
            span,
        }) => Err(FormulaError::syntax(
            "unmatched ')' without a preceding '('",
            *span,
        )),
        Some(token) => Err(FormulaError::syntax(
            format!("unexpected {} after a complete formula", token.kind),
            token.span,
        )),
        None => Err(missing_eof(tokens)),
    }
}

fn parse_iff(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    let mut left = parse_implies(tokens, depth)?;
    let mut level = depth;

    while let Some(op) = next_if_kind(tokens, TokenKind::Iff) {
        level = descend(tokens, level)?;
        let right = parse_operand(tokens, op, level, parse_implies)?;
        left = Expr::iff(left, right);
    }

    Ok(left)
}

fn parse_implies(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    let left = parse_or(tokens, depth)?;

    match next_if_kind(tokens, TokenKind::Implies) {
        Some(op) => {
            let level = descend(tokens, depth)?;
            let right = parse_operand(tokens, op, level, parse_implies)?;
            Ok(Expr::implies(left, right))
        }
        None => Ok(left),
    }
}

fn parse_or(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    let mut left = parse_and(tokens, depth)?;
    let mut level = depth;

    while let Some(op) = next_if_kind(tokens, TokenKind::Or) {
        level = descend(tokens, level)?;
        let right = parse_operand(tokens, op, level, parse_and)?;
        left = Expr::or(left, right);
    }

    Ok(left)
}

fn parse_and(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    let mut left = parse_unary(tokens, depth)?;
    let mut level = depth;

    while let Some(op) = next_if_kind(tokens, TokenKind::And) {
        level = descend(tokens, level)?;
        let right = parse_operand(tokens, op, level, parse_unary)?;
        left = Expr::and(left, right);
    }

    Ok(left)
}

fn parse_unary(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    match next_if_kind(tokens, TokenKind::Not) {
        Some(op) => {
            let level = descend(tokens, depth)?;
            let negated = parse_operand(tokens, op, level, parse_unary)?;
            Ok(Expr::not(negated))
        }
        None => parse_atom(tokens, depth),
    }
}

fn parse_atom(tokens: &mut TokenReader, depth: usize) -> Result<Expr, FormulaError> {
    let Some(token) = tokens.next() else {
        return Err(FormulaError::syntax("unexpected end of input", Span::default()));
    };

    match token.kind {
        TokenKind::True => Ok(Expr::True),
        TokenKind::False => Ok(Expr::False),
        TokenKind::Var(index) => Ok(Expr::Var(index)),
        TokenKind::OpenParen => {
            let level = descend(tokens, depth)?;
            parse_parenthesized(tokens, token, level)
        }
        TokenKind::Eof => Err(FormulaError::syntax("unexpected end of input", token.span)),
        kind => Err(FormulaError::syntax(
            format!("expected an operand but found {kind}"),
            token.span,
        )),
    }
}

fn parse_parenthesized(
    tokens: &mut TokenReader,
    open: &Token,
    depth: usize,
) -> Result<Expr, FormulaError> {
    let subform = parse_iff(tokens, depth)?;

    if next_if_kind(tokens, TokenKind::CloseParen).is_some() {
        return Ok(subform);
    }

    match tokens.peek() {
        Some(token) => Err(FormulaError::syntax(
            format!(
                "unmatched '(' at {}: expected ')' but found {}",
                open.span.start, token.kind
            ),
            token.span,
        )),
        None => Err(FormulaError::syntax(
            format!("unmatched '(' at {}", open.span.start),
            open.span,
        )),
    }
}

/// Parses the operand following `op`, reporting a missing operand against the token found instead.
fn parse_operand(
    tokens: &mut TokenReader,
    op: &Token,
    depth: usize,
    operand: fn(&mut TokenReader, usize) -> Result<Expr, FormulaError>,
) -> Result<Expr, FormulaError> {
    let role = if op.kind.is_binary_operator() {
        "right operand"
    } else {
        "operand"
    };

    match tokens.peek().copied().copied() {
        Some(token) if starts_operand(token.kind) => operand(tokens, depth),
        Some(Token {
            kind: TokenKind::Eof,
            span,
        }) => Err(FormulaError::syntax(
            format!("unexpected end of input: missing {role} of {}", op.kind),
            span,
        )),
        Some(token) => Err(FormulaError::syntax(
            format!("missing {role} of {} before {}", op.kind, token.kind),
            token.span,
        )),
        None => Err(FormulaError::syntax(
            format!("missing {role} of {}", op.kind),
            Span::at(op.span.end),
        )),
    }
}

/// One level deeper, or a resource error spanning the whole input once the bound is reached.
fn descend(tokens: &TokenReader, depth: usize) -> Result<usize, FormulaError> {
    if depth < MAX_NESTING_DEPTH {
        return Ok(depth + 1);
    }

    // the remaining tokens end with Eof, which starts at the input length
    let end = tokens.clone().last().map_or(0, |t| t.span.start);
    log::warn!(target: LOG_PARSER, "formula nests deeper than {MAX_NESTING_DEPTH} levels");

    Err(FormulaError::resource(
        format!("the formula nests deeper than {MAX_NESTING_DEPTH} levels"),
        Span::new(0, end),
    ))
}

const fn starts_operand(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Var(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Not
            | TokenKind::OpenParen
    )
}

fn next_if_kind<'a>(tokens: &mut TokenReader<'a>, kind: TokenKind) -> Option<&'a Token> {
    tokens.next_if(|t| t.kind == kind)
}

fn missing_eof(tokens: &[Token]) -> FormulaError {
    let end = tokens.last().map_or(0, |t| t.span.end);
    FormulaError::syntax("token sequence is not terminated", Span::at(end))
}
