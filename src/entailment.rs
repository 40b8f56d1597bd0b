//! Entailment checking for `TELL`/`ASK` knowledge bases.
//!
//! A knowledge-base file consists of a `TELL` line, followed by clauses separated by `;`
//! (possibly spread over several lines), an `ASK` line and a single query formula:
//!
//! ```text
//! TELL
//! p2 => p3; p3 => p1; c => e; b & e => f; f & g => h; p1 => d; p1 & p3 => c; a; b; p2;
//! ASK
//! d
//! ```
//!
//! Clauses may also be written as reverse implications, `head <= body`. Besides truth-table
//! checking, knowledge bases made of Horn clauses can be decided by forward or backward
//! chaining.

use std::collections::{BTreeSet, VecDeque};
use std::fmt::{self, Display};
use std::io::BufRead;

use anyhow::Context;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, Span};
use crate::log::targets::ENTAILMENT as LOG_ENTAILMENT;
use crate::parser::ParsedFormula;
use crate::symbols::Notation;
use crate::truth_table::{assignments, TableConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    /// Variables of all clauses and the query, sorted alphabetically.
    pub vars: Vec<String>,
    pub clauses: Vec<Expr>,
    pub query: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entailment {
    /// The query holds in every model of the knowledge base; `models` counts those models.
    Entailed { models: usize },
    /// Some model of the knowledge base falsifies the query.
    NotEntailed { counterexample: Vec<bool> },
}

impl Entailment {
    pub const fn is_entailed(&self) -> bool {
        matches!(self, Self::Entailed { .. })
    }
}

impl Display for Entailment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entailed { models } => write!(f, "YES: {models}"),
            Self::NotEntailed { .. } => f.write_str("NO"),
        }
    }
}

/// How a knowledge base is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InferenceMethod {
    /// Truth-table model checking; works for any clauses.
    #[default]
    Tt,
    /// Forward chaining over Horn clauses.
    Fc,
    /// Backward chaining over Horn clauses.
    Bc,
}

/// Outcome of forward or backward chaining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// The query was derived; `symbols` lists the symbols established on the way, ending in the query.
    Derived { symbols: Vec<String> },
    NotDerived,
}

impl Derivation {
    pub const fn is_derived(&self) -> bool {
        matches!(self, Self::Derived { .. })
    }
}

impl Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Derived { symbols } => write!(f, "YES: {}", symbols.iter().join(", ")),
            Self::NotDerived => f.write_str("NO"),
        }
    }
}

/// A definite clause `body₁ ∧ … ∧ bodyₙ → head`. Facts have an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HornClause {
    /// Sorted and free of duplicates.
    pub body: Vec<usize>,
    pub head: usize,
}

impl HornClause {
    /// Reads a fact `p` or a rule `p ∧ q → r`; `None` for anything else.
    pub fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Var(head) => Some(Self {
                body: Vec::new(),
                head: *head,
            }),
            Expr::BinaryOp(BinaryOperator::Implies, body, head) => {
                let Expr::Var(head) = head.as_ref() else {
                    return None;
                };

                let mut atoms = Vec::new();
                conjuncts(body, &mut atoms)?;
                atoms.sort_unstable();
                atoms.dedup();

                Some(Self {
                    body: atoms,
                    head: *head,
                })
            }
            _ => None,
        }
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }
}

fn conjuncts(expr: &Expr, atoms: &mut Vec<usize>) -> Option<()> {
    match expr {
        Expr::True => Some(()),
        Expr::Var(var) => {
            atoms.push(*var);
            Some(())
        }
        Expr::BinaryOp(BinaryOperator::And, l, r) => {
            conjuncts(l, atoms)?;
            conjuncts(r, atoms)
        }
        _ => None,
    }
}

/// Rewrites `head <= body` as `(body) -> (head)`. `<=>` is left alone.
fn reverse_implication(clause: &str) -> Option<String> {
    clause
        .match_indices("<=")
        .find(|&(i, _)| !clause[i + 2..].starts_with('>'))
        .map(|(i, _)| format!("({}) -> ({})", &clause[i + 2..], &clause[..i]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Tell,
    Ask,
}

impl KnowledgeBase {
    pub fn new(contents: &mut dyn BufRead) -> anyhow::Result<Self> {
        let mut tell = Vec::new();
        let mut ask = Vec::new();
        let mut section = Section::Preamble;

        for line in contents.lines() {
            let line = line?;
            let line = line.trim();

            match (line, section) {
                ("TELL", _) => section = Section::Tell,
                ("ASK", _) => section = Section::Ask,
                ("", _) | (_, Section::Preamble) => {}
                (_, Section::Tell) => tell.push(line.to_string()),
                (_, Section::Ask) => ask.push(line.to_string()),
            }
        }

        let clauses: Vec<String> = tell
            .iter()
            .flat_map(|line| line.split(';'))
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(str::to_string)
            .collect();

        let query = ask.join(" ");
        anyhow::ensure!(!query.is_empty(), "the knowledge base has no ASK query");

        Self::from_formulas(&clauses, &query)
    }

    /// Parses every clause and the query separately and merges their variable tables.
    pub fn from_formulas<S: AsRef<str>>(clauses: &[S], query: &str) -> anyhow::Result<Self> {
        let parsed_clauses: Vec<ParsedFormula> = clauses
            .iter()
            .map(|clause| {
                let clause = clause.as_ref();
                let parsed = match reverse_implication(clause) {
                    Some(rewritten) => rewritten.parse::<ParsedFormula>(),
                    None => clause.parse::<ParsedFormula>(),
                };
                parsed.with_context(|| format!("in clause `{clause}`"))
            })
            .collect::<anyhow::Result<_>>()?;

        let parsed_query: ParsedFormula = query
            .parse()
            .with_context(|| format!("in query `{query}`"))?;

        let vars: Vec<String> = parsed_clauses
            .iter()
            .chain([&parsed_query])
            .flat_map(|f| f.vars.iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let index: FxHashMap<&str, usize> = vars
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let merge = |f: &ParsedFormula| f.expr.remap_vars(&|local| index[f.var2name(local)]);

        let clauses = parsed_clauses.iter().map(merge).collect();
        let query = merge(&parsed_query);

        Ok(Self {
            vars,
            clauses,
            query,
        })
    }

    /// Whether every clause holds under `assignment`.
    pub fn holds(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| clause.eval(assignment))
    }

    /// Decides whether the clauses entail the query by enumerating every assignment.
    pub fn entails(&self, config: &TableConfig) -> Result<Entailment, FormulaError> {
        let count = self.vars.len();
        let rows = config.check(count, Span::default())?;

        log::debug!(
            target: LOG_ENTAILMENT,
            "checking {} clauses over {rows} assignments",
            self.clauses.len()
        );

        let mut models = 0;

        for assignment in assignments(count).filter(|a| self.holds(a)) {
            if !self.query.eval(&assignment) {
                log::debug!(target: LOG_ENTAILMENT, "counterexample {assignment:?}");
                return Ok(Entailment::NotEntailed {
                    counterexample: assignment,
                });
            }
            models += 1;
        }

        Ok(Entailment::Entailed { models })
    }

    /// The clauses as Horn clauses, failing on the first clause that is not one.
    pub fn horn_clauses(&self) -> anyhow::Result<Vec<HornClause>> {
        self.clauses
            .iter()
            .map(|clause| {
                HornClause::from_expr(clause).ok_or_else(|| {
                    anyhow::anyhow!(
                        "`{}` is not a Horn clause",
                        clause.render(&self.vars, Notation::Unicode)
                    )
                })
            })
            .collect()
    }

    fn query_symbol(&self) -> anyhow::Result<usize> {
        match self.query {
            Expr::Var(query) => Ok(query),
            _ => anyhow::bail!(
                "chaining needs a single symbol as query, got `{}`",
                self.query.render(&self.vars, Notation::Unicode)
            ),
        }
    }

    fn names(&self, symbols: &[usize]) -> Vec<String> {
        symbols.iter().map(|&s| self.vars[s].clone()).collect()
    }

    /// Decides the query by forward chaining from the facts.
    ///
    /// The derived symbols are listed in the order they were established, up to the query.
    pub fn forward_chain(&self) -> anyhow::Result<Derivation> {
        let rules = self.horn_clauses()?;
        let query = self.query_symbol()?;

        let mut remaining: Vec<usize> = rules.iter().map(|rule| rule.body.len()).collect();
        let mut inferred = vec![false; self.vars.len()];
        let mut agenda: VecDeque<usize> = rules
            .iter()
            .filter(|rule| rule.is_fact())
            .map(|rule| rule.head)
            .collect();
        let mut derived = Vec::new();

        while let Some(symbol) = agenda.pop_front() {
            if inferred[symbol] {
                continue;
            }
            inferred[symbol] = true;
            derived.push(symbol);

            if symbol == query {
                log::debug!(
                    target: LOG_ENTAILMENT,
                    "forward chaining derived {} symbols",
                    derived.len()
                );
                return Ok(Derivation::Derived {
                    symbols: self.names(&derived),
                });
            }

            for (rule, count) in rules.iter().zip(remaining.iter_mut()) {
                if rule.body.contains(&symbol) {
                    *count -= 1;
                    if *count == 0 {
                        agenda.push_back(rule.head);
                    }
                }
            }
        }

        log::debug!(
            target: LOG_ENTAILMENT,
            "forward chaining stalled after {} symbols",
            derived.len()
        );
        Ok(Derivation::NotDerived)
    }

    /// Decides the query by backward chaining from it.
    ///
    /// The symbols of the proof are listed with every symbol after the ones it depends on.
    pub fn backward_chain(&self) -> anyhow::Result<Derivation> {
        let rules = self.horn_clauses()?;
        let query = self.query_symbol()?;

        let mut prover = BackwardChainer {
            rules: &rules,
            proving: vec![false; self.vars.len()],
            proved: vec![false; self.vars.len()],
            chain: Vec::new(),
        };

        if prover.prove(query) {
            Ok(Derivation::Derived {
                symbols: self.names(&prover.chain),
            })
        } else {
            Ok(Derivation::NotDerived)
        }
    }
}

struct BackwardChainer<'a> {
    rules: &'a [HornClause],
    /// Goals on the current path; reaching one again fails that branch.
    proving: Vec<bool>,
    proved: Vec<bool>,
    /// Proved symbols in the order they were established.
    chain: Vec<usize>,
}

impl BackwardChainer<'_> {
    fn prove(&mut self, goal: usize) -> bool {
        if self.proved[goal] {
            return true;
        }
        if self.proving[goal] {
            return false;
        }

        self.proving[goal] = true;
        let rules = self.rules;
        let mut found = false;

        for rule in rules.iter().filter(|rule| rule.head == goal) {
            let mark = self.chain.len();

            if rule.body.iter().all(|&atom| self.prove(atom)) {
                found = true;
                break;
            }

            // forget a partial proof
            for symbol in self.chain.drain(mark..) {
                self.proved[symbol] = false;
            }
        }

        self.proving[goal] = false;

        if found {
            self.proved[goal] = true;
            self.chain.push(goal);
        }

        found
    }
}
