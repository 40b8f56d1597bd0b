use std::fmt::{self, Display};

use crate::symbols::Notation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    And,
    Or,
    Implies,
    Iff,
}

impl BinaryOperator {
    pub const fn apply(self, l: bool, r: bool) -> bool {
        match self {
            Self::And => l && r,
            Self::Or => l || r,
            Self::Implies => !l || r,
            Self::Iff => l == r,
        }
    }

    pub const fn symbol(self, notation: Notation) -> &'static str {
        let symbols = notation.symbols();
        match self {
            Self::And => symbols.and,
            Self::Or => symbols.or,
            Self::Implies => symbols.implies,
            Self::Iff => symbols.iff,
        }
    }
}

/// Abstract syntax tree of a propositional formula.
///
/// Variables are stored by index into the variable table produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    False,
    True,
    Var(usize),
    Not(Box<Expr>),
    BinaryOp(BinaryOperator, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn not(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    pub fn binary(op: BinaryOperator, l: Self, r: Self) -> Self {
        Self::BinaryOp(op, Box::new(l), Box::new(r))
    }

    pub fn and(l: Self, r: Self) -> Self {
        Self::binary(BinaryOperator::And, l, r)
    }

    pub fn or(l: Self, r: Self) -> Self {
        Self::binary(BinaryOperator::Or, l, r)
    }

    pub fn implies(l: Self, r: Self) -> Self {
        Self::binary(BinaryOperator::Implies, l, r)
    }

    pub fn iff(l: Self, r: Self) -> Self {
        Self::binary(BinaryOperator::Iff, l, r)
    }

    /// Evaluates the formula under `assignment`, where `assignment[i]` is the value of variable `i`.
    ///
    /// # Panics
    ///
    /// Panics if a variable index is out of range for `assignment`.
    pub fn eval(&self, assignment: &[bool]) -> bool {
        match self {
            Self::False => false,
            Self::True => true,
            Self::Var(i) => assignment[*i],
            Self::Not(f) => !f.eval(assignment),
            Self::BinaryOp(op, l, r) => {
                let l = l.eval(assignment);
                let r = r.eval(assignment);
                op.apply(l, r)
            }
        }
    }

    /// Fully parenthesized rendering in the given notation.
    ///
    /// # Panics
    ///
    /// Panics if a variable index has no entry in `vars`.
    pub fn render(&self, vars: &[String], notation: Notation) -> String {
        self.display(vars, notation).to_string()
    }

    pub const fn display<'a>(&'a self, vars: &'a [String], notation: Notation) -> Rendered<'a> {
        Rendered {
            expr: self,
            vars,
            notation,
        }
    }

    /// Rewrites every variable index through `f`.
    pub fn remap_vars<F: Fn(usize) -> usize>(&self, f: &F) -> Self {
        match self {
            Self::False => Self::False,
            Self::True => Self::True,
            Self::Var(i) => Self::Var(f(*i)),
            Self::Not(e) => Self::not(e.remap_vars(f)),
            Self::BinaryOp(op, l, r) => Self::binary(*op, l.remap_vars(f), r.remap_vars(f)),
        }
    }

    /// Largest variable index referenced by the formula, if any.
    pub fn max_var(&self) -> Option<usize> {
        match self {
            Self::False | Self::True => None,
            Self::Var(i) => Some(*i),
            Self::Not(e) => e.max_var(),
            Self::BinaryOp(_, l, r) => l.max_var().max(r.max_var()),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::False | Self::True | Self::Var(_) => 1,
            Self::Not(e) => 1 + e.size(),
            Self::BinaryOp(_, l, r) => 1 + l.size() + r.size(),
        }
    }
}

/// [`Display`] adaptor binding an expression to its variable names and a notation.
pub struct Rendered<'a> {
    expr: &'a Expr,
    vars: &'a [String],
    notation: Notation,
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self.notation.symbols();
        match self.expr {
            Expr::False => f.write_str(symbols.bot),
            Expr::True => f.write_str(symbols.top),
            Expr::Var(i) => f.write_str(&self.vars[*i]),
            Expr::Not(e) => write!(
                f,
                "{}{}",
                symbols.not,
                e.display(self.vars, self.notation)
            ),
            Expr::BinaryOp(op, l, r) => write!(
                f,
                "({} {} {})",
                l.display(self.vars, self.notation),
                op.symbol(self.notation),
                r.display(self.vars, self.notation)
            ),
        }
    }
}
