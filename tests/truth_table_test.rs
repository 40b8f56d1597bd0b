use pretty_assertions::assert_eq;

use truthtab::truth_table::{assignment, assignments, Row};
use truthtab::{
    ErrorKind, Expr, FormulaError, ParsedFormula, Span, TableConfig, TruthTable, TruthTableEntry,
    DEFAULT_MAX_VARIABLES,
};

fn table(src: &str) -> Result<TruthTable, FormulaError> {
    src.parse::<ParsedFormula>()?
        .truth_table(&TableConfig::default())
}

fn results(table: &TruthTable) -> Vec<bool> {
    table.rows.iter().map(|row| row.result).collect()
}

#[test]
fn test_conjunction_table() -> Result<(), FormulaError> {
    let table = table("p /\\ q")?;

    assert_eq!(table.vars, vec!["p", "q"]);
    assert_eq!(table.formula, "(p ∧ q)");
    assert_eq!("p /\\ q".parse::<ParsedFormula>()?.expr.max_var(), Some(1));
    assert_eq!("T -> F".parse::<ParsedFormula>()?.expr.max_var(), None);
    assert_eq!(
        table.rows,
        vec![
            Row {
                assignment: vec![true, true],
                result: true
            },
            Row {
                assignment: vec![true, false],
                result: false
            },
            Row {
                assignment: vec![false, true],
                result: false
            },
            Row {
                assignment: vec![false, false],
                result: false
            },
        ]
    );

    Ok(())
}

#[test]
fn test_enumeration_order() {
    assert_eq!(assignment(0, 3), vec![true, true, true]);
    assert_eq!(assignment(1, 3), vec![true, true, false]);
    assert_eq!(assignment(4, 3), vec![false, true, true]);
    assert_eq!(assignment(7, 3), vec![false, false, false]);

    assert_eq!(assignments(0).collect::<Vec<_>>(), vec![Vec::<bool>::new()]);
    assert_eq!(assignments(1).collect::<Vec<_>>(), vec![vec![true], vec![false]]);
}

#[test]
fn test_row_count() -> Result<(), FormulaError> {
    let test_strs = ["T", "a", "a | b", "a & b & c", "(a -> b) <-> (c | d)", "a&b&c&d&e&f&g&h"];

    for src in test_strs {
        let formula: ParsedFormula = src.replace('|', "||").parse()?;
        let table = formula.truth_table(&TableConfig::default())?;

        assert_eq!(table.rows.len(), 1 << formula.vars.len(), "{src}");
        assert!(table.rows[0].assignment.iter().all(|v| *v), "{src}");
        assert!(table.rows.last().is_some_and(|row| row.assignment.iter().all(|v| !v)), "{src}");
    }

    Ok(())
}

#[test]
fn test_vacuous_implication() -> Result<(), FormulaError> {
    let formula: ParsedFormula = "p -> q".parse()?;
    assert!(formula.eval(&[false, false]));

    // F -> F holds regardless of the assignment
    let vacuous = Expr::implies(Expr::False, Expr::False);
    for assignment in assignments(3) {
        assert!(vacuous.eval(&assignment));
    }

    assert!(table("F -> F")?.is_tautology());

    Ok(())
}

#[test]
fn test_de_morgan() {
    let (a, b) = (Expr::Var(0), Expr::Var(1));

    let conjunction = Expr::not(Expr::and(a.clone(), b.clone()));
    let disjunction = Expr::or(Expr::not(a.clone()), Expr::not(b.clone()));
    let negated_disjunction = Expr::not(Expr::or(a.clone(), b.clone()));
    let conjoined_negations = Expr::and(Expr::not(a), Expr::not(b));

    for assignment in assignments(2) {
        assert_eq!(conjunction.eval(&assignment), disjunction.eval(&assignment));
        assert_eq!(
            negated_disjunction.eval(&assignment),
            conjoined_negations.eval(&assignment)
        );
    }
}

#[test]
fn test_connectives() -> Result<(), FormulaError> {
    assert_eq!(results(&table("p || q")?), vec![true, true, true, false]);
    assert_eq!(results(&table("p -> q")?), vec![true, false, true, true]);
    assert_eq!(results(&table("p <-> q")?), vec![true, false, false, true]);
    assert_eq!(results(&table("~p")?), vec![false, true]);
    assert_eq!(results(&table("true")?), vec![true]);

    Ok(())
}

#[test]
fn test_classification() -> Result<(), FormulaError> {
    let tautology = table("p \\/ ~p")?;
    assert!(tautology.is_tautology());
    assert!(tautology.is_satisfiable());
    assert_eq!(tautology.models(), 2);

    let contradiction = table("p /\\ ~p")?;
    assert!(contradiction.is_contradiction());
    assert!(!contradiction.is_satisfiable());
    assert_eq!(contradiction.models(), 0);

    let contingent = table("p -> q")?;
    assert!(!contingent.is_tautology());
    assert!(!contingent.is_contradiction());
    assert_eq!(contingent.models(), 3);

    Ok(())
}

#[test]
fn test_too_many_variables() -> Result<(), FormulaError> {
    let src = (0..25).map(|i| format!("x{i}")).collect::<Vec<_>>().join(" & ");
    let formula: ParsedFormula = src.parse()?;

    let err = formula
        .truth_table(&TableConfig::default())
        .expect_err("25 variables exceed the default bound");

    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(err.span(), Span::new(0, src.chars().count()));
    assert!(err.message().contains("25"), "{err}");

    Ok(())
}

#[test]
fn test_config_bound() -> Result<(), FormulaError> {
    assert_eq!(TableConfig::default().max_variables, DEFAULT_MAX_VARIABLES);
    assert_eq!(TableConfig::new(1000).max_variables, 63);

    let formula: ParsedFormula = "a & b & c".parse()?;
    assert!(formula.truth_table(&TableConfig::new(2)).is_err());
    assert_eq!(formula.truth_table(&TableConfig::new(3))?.rows.len(), 8);

    Ok(())
}

#[test]
fn test_filter() -> Result<(), FormulaError> {
    let table = table("p -> q")?;

    assert_eq!(table.filtered(TruthTableEntry::True).count(), 3);
    assert_eq!(table.filtered(TruthTableEntry::False).count(), 1);
    assert_eq!(table.filtered(TruthTableEntry::Any).count(), 4);

    Ok(())
}

#[test]
fn test_truth_table_entry_from_str() -> anyhow::Result<()> {
    assert_eq!("T".parse::<TruthTableEntry>()?, TruthTableEntry::True);
    assert_eq!("0".parse::<TruthTableEntry>()?, TruthTableEntry::False);
    assert_eq!("*".parse::<TruthTableEntry>()?, TruthTableEntry::Any);
    assert!("maybe".parse::<TruthTableEntry>().is_err());

    assert!(TruthTableEntry::from(true).is_true());
    assert!(TruthTableEntry::from(false).is_false());
    assert_eq!(format!("{:>6}", TruthTableEntry::True), "  True");

    Ok(())
}

#[test]
fn test_write_text() -> anyhow::Result<()> {
    let table = table("p /\\ q")?;

    let mut out = Vec::new();
    table.write_text(&mut out, TruthTableEntry::Any)?;

    assert_eq!(
        String::from_utf8(out)?,
        [
            " p | q | (p ∧ q) ",
            "---+---+---------",
            " T | T |    T    ",
            " T | F |    F    ",
            " F | T |    F    ",
            " F | F |    F    ",
            "",
        ]
        .join("\n")
    );

    Ok(())
}

#[test]
fn test_write_csv() -> anyhow::Result<()> {
    let table = table("p -> q")?;

    let mut out = Vec::new();
    table.write_csv(&mut out, TruthTableEntry::False)?;

    assert_eq!(String::from_utf8(out)?, "p,q,(p → q)\nTrue,False,False\n");

    Ok(())
}
