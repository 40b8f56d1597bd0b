use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::error::{FormulaError, Span};
use crate::log::targets::TABLE as LOG_TABLE;
use crate::parser::ParsedFormula;
use crate::symbols::Notation;

/// Default bound on the number of variables a table may be built for (about a million rows).
pub const DEFAULT_MAX_VARIABLES: usize = 20;

/// Hard ceiling so that `2^n` always fits in a `u64` row counter.
const ABSOLUTE_MAX_VARIABLES: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Single variable assignment in a truth table.
///
/// The variable assignments in a truth table can be one of True, False or Any.
/// [`True`] is assigned when the variable can only be assigned a 'true' value;
/// [`False`] is assigned when the variable can only be 'false'.
/// When the variable can either be true or false, [`Any`] is used; as a row filter it
/// selects every row regardless of its result.
///
/// [`Any`]: TruthTableEntry::Any
/// [`True`]: TruthTableEntry::True
/// [`False`]: TruthTableEntry::False
pub enum TruthTableEntry {
    /// Assigned when the variable can only be true
    True,
    /// Assigned when the variable can only be false
    False,
    /// Assigned when the variable can either be true or false
    Any,
}

impl TruthTableEntry {
    const fn variants<'a>() -> &'a [Self] {
        &[Self::True, Self::False, Self::Any]
    }

    fn matches(&self, s: &str) -> bool {
        match self {
            Self::True => matches!(s, "true" | "True" | "t" | "T" | "1"),
            Self::False => matches!(s, "false" | "False" | "f" | "F" | "0"),
            Self::Any => matches!(s, "any" | "Any" | "a" | "A" | "*"),
        }
    }

    pub fn is_true(self) -> bool {
        self == Self::True
    }

    pub fn is_false(self) -> bool {
        self == Self::False
    }

    /// Whether a boolean value is covered by this entry.
    pub const fn admits(self, value: bool) -> bool {
        match self {
            Self::True => value,
            Self::False => !value,
            Self::Any => true,
        }
    }
}

impl From<bool> for TruthTableEntry {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl Display for TruthTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::True => "True",
            Self::False => "False",
            Self::Any => "Any",
        })
    }
}

impl FromStr for TruthTableEntry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants()
            .iter()
            .find(|variant| variant.matches(s))
            .ok_or_else(|| anyhow::anyhow!("cannot parse {s} as truth-table entry"))
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub max_variables: usize,
}

impl TableConfig {
    pub fn new(max_variables: usize) -> Self {
        Self {
            max_variables: max_variables.min(ABSOLUTE_MAX_VARIABLES),
        }
    }

    /// Refuses an enumeration over `count` variables before any row is computed.
    pub fn check(&self, count: usize, span: Span) -> Result<u64, FormulaError> {
        let bound = self.max_variables.min(ABSOLUTE_MAX_VARIABLES);

        if count > bound {
            log::warn!(
                target: LOG_TABLE,
                "refusing to enumerate {count} variables (bound {bound})"
            );
            return Err(FormulaError::resource(
                format!(
                    "the formula has {count} variables; at most {bound} are supported ({} rows)",
                    1u64 << bound
                ),
                span,
            ));
        }

        Ok(1u64 << count)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VARIABLES)
    }
}

/// Assignment for row `row` of a table over `count` variables.
///
/// Row 0 assigns true to every variable and the last row assigns false to every variable;
/// variable 0 is the most significant bit.
pub fn assignment(row: u64, count: usize) -> Vec<bool> {
    let last = (1u64 << count) - 1;
    let bits = last - row;

    (0..count)
        .map(|i| (bits >> (count - 1 - i)) & 1 == 1)
        .collect()
}

/// All `2^count` assignments in table order.
pub fn assignments(count: usize) -> impl Iterator<Item = Vec<bool>> {
    (0..1u64 << count).map(move |row| assignment(row, count))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub assignment: Vec<bool>,
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    pub vars: Vec<String>,
    /// The formula rendered in [`Notation::Unicode`].
    pub formula: String,
    pub rows: Vec<Row>,
}

impl TruthTable {
    /// Evaluates `formula` under every assignment of its variables.
    ///
    /// Fails with a resource error, before enumerating anything, when the formula has more
    /// variables than `config` allows.
    pub fn build(formula: &ParsedFormula, config: &TableConfig) -> Result<Self, FormulaError> {
        let count = formula.vars.len();
        debug_assert!(formula.expr.max_var().map_or(true, |var| var < count));

        let rows = config.check(count, formula.span)?;

        log::debug!(target: LOG_TABLE, "enumerating {rows} rows over {count} variables");

        let rows = assignments(count)
            .map(|assignment| {
                let result = formula.eval(&assignment);
                log::trace!(target: LOG_TABLE, "{assignment:?} -> {result}");
                Row { assignment, result }
            })
            .collect();

        Ok(Self {
            vars: formula.vars.clone(),
            formula: formula.render(Notation::Unicode),
            rows,
        })
    }

    /// Rows whose result is admitted by `filter`.
    pub fn filtered(&self, filter: TruthTableEntry) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| filter.admits(row.result))
    }

    pub fn models(&self) -> usize {
        self.filtered(TruthTableEntry::True).count()
    }

    pub fn is_tautology(&self) -> bool {
        self.rows.iter().all(|row| row.result)
    }

    pub fn is_contradiction(&self) -> bool {
        self.rows.iter().all(|row| !row.result)
    }

    pub fn is_satisfiable(&self) -> bool {
        !self.is_contradiction()
    }
}
