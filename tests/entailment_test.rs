use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use pretty_assertions::assert_eq;

use truthtab::entailment::{Derivation, Entailment, HornClause, KnowledgeBase};
use truthtab::{ErrorKind, Expr, FormulaError, TableConfig};

fn file_assert_verdict<P: AsRef<Path>>(file: P) {
    let path = file.as_ref();

    // leading comment lines hold `# expect: ...` (truth table) and `# expect fc|bc: ...`
    let mut expectations = Vec::new();
    for line in BufReader::new(File::open(path).expect("Could not open input file")).lines() {
        let line = line.expect("Could not read expectation");
        let Some(expectation) = line.strip_prefix("# expect") else {
            break;
        };
        let (method, expected) = expectation
            .split_once(':')
            .expect("expectations are written as `# expect <method>: <verdict>`");
        expectations.push((method.trim().to_string(), expected.trim().to_string()));
    }
    assert!(!expectations.is_empty(), "{} has no expectation", path.display());

    let f = File::open(path).expect("Could not open input file");
    let kb = KnowledgeBase::new(&mut BufReader::new(f)).expect("Could not parse input file");

    for (method, expected) in expectations {
        let verdict = match method.as_str() {
            "" => kb
                .entails(&TableConfig::default())
                .expect("Could not decide entailment")
                .to_string(),
            "fc" => kb.forward_chain().expect("Could not chain forward").to_string(),
            "bc" => kb.backward_chain().expect("Could not chain backward").to_string(),
            other => panic!("unknown method {other} in {}", path.display()),
        };

        assert_eq!(verdict, expected, "{} ({method})", path.display());
    }
}

#[test]
fn test_kb_files() {
    for file in glob::glob("tests/data/kb/*.txt").unwrap() {
        let f = file.unwrap();
        println!("testing {}", f.display());
        file_assert_verdict(f);
    }
}

#[test]
fn test_merged_variables() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["q", "r -> q"], "p || r")?;

    assert_eq!(kb.vars, vec!["p", "q", "r"]);
    assert_eq!(
        kb.clauses,
        vec![Expr::Var(1), Expr::implies(Expr::Var(2), Expr::Var(1))]
    );
    assert_eq!(kb.query, Expr::or(Expr::Var(0), Expr::Var(2)));

    Ok(())
}

#[test]
fn test_counterexample() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["a -> b"], "b")?;

    let verdict = kb.entails(&TableConfig::default())?;

    // first model (in table order) of a -> b that falsifies b
    assert_eq!(
        verdict,
        Entailment::NotEntailed {
            counterexample: vec![false, false]
        }
    );
    assert!(!verdict.is_entailed());
    assert_eq!(verdict.to_string(), "NO");

    Ok(())
}

#[test]
fn test_inconsistent_kb_entails_anything() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["a", "~a"], "b")?;

    assert_eq!(
        kb.entails(&TableConfig::default())?,
        Entailment::Entailed { models: 0 }
    );

    Ok(())
}

#[test]
fn test_clause_errors_carry_context() {
    let err = KnowledgeBase::from_formulas(&["a", "b &"], "a").expect_err("clause is incomplete");

    assert!(format!("{err:#}").contains("in clause `b &`"), "{err:#}");

    let formula_error = err
        .downcast_ref::<FormulaError>()
        .expect("the root cause is a formula error");
    assert_eq!(formula_error.kind(), ErrorKind::Syntax);
}

#[test]
fn test_missing_query() {
    let src = "TELL\na; b;\n";

    assert!(KnowledgeBase::new(&mut BufReader::new(src.as_bytes())).is_err());
}

#[test]
fn test_resource_bound() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["a & b", "c"], "d")?;

    let err = kb
        .entails(&TableConfig::new(3))
        .expect_err("four variables exceed the bound");
    assert_eq!(err.kind(), ErrorKind::Resource);

    Ok(())
}

#[test]
fn test_forward_chain_order() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["a -> b", "b & c -> d", "c", "a"], "d")?;

    assert_eq!(
        kb.forward_chain()?,
        Derivation::Derived {
            symbols: vec!["c".into(), "a".into(), "b".into(), "d".into()]
        }
    );
    assert_eq!(kb.forward_chain()?.to_string(), "YES: c, a, b, d");

    Ok(())
}

#[test]
fn test_backward_chain_keeps_only_the_proof() -> anyhow::Result<()> {
    // the first rule for d needs e, which is never established
    let kb = KnowledgeBase::from_formulas(&["a & e -> d", "b -> d", "a", "b", "c"], "d")?;

    let derivation = kb.backward_chain()?;
    assert!(derivation.is_derived());
    assert_eq!(derivation.to_string(), "YES: b, d");

    Ok(())
}

#[test]
fn test_chaining_agrees_with_truth_table() -> anyhow::Result<()> {
    let clauses = ["p -> q", "q & r -> s", "t -> u", "p", "r"];

    for query in ["s", "q", "u", "t"] {
        let kb = KnowledgeBase::from_formulas(&clauses, query)?;
        let entailed = kb.entails(&TableConfig::default())?.is_entailed();

        assert_eq!(kb.forward_chain()?.is_derived(), entailed, "{query}");
        assert_eq!(kb.backward_chain()?.is_derived(), entailed, "{query}");
    }

    Ok(())
}

#[test]
fn test_fact_query() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["a", "a -> b"], "a")?;

    assert_eq!(kb.forward_chain()?.to_string(), "YES: a");
    assert_eq!(kb.backward_chain()?.to_string(), "YES: a");

    Ok(())
}

#[test]
fn test_horn_clauses() -> anyhow::Result<()> {
    let kb = KnowledgeBase::from_formulas(&["c & a & c -> b", "a", "T & a -> c"], "b")?;

    assert_eq!(
        kb.horn_clauses()?,
        vec![
            HornClause {
                body: vec![0, 2],
                head: 1
            },
            HornClause {
                body: Vec::new(),
                head: 0
            },
            HornClause {
                body: vec![0],
                head: 2
            },
        ]
    );
    assert!(kb.horn_clauses()?[1].is_fact());

    Ok(())
}

#[test]
fn test_non_horn_clause_is_rejected() -> anyhow::Result<()> {
    for clause in ["a || b", "~a", "a -> b & c", "(a -> b) -> c", "a <-> b"] {
        let kb = KnowledgeBase::from_formulas(&[clause, "a"], "b")?;

        let err = kb.forward_chain().expect_err(clause);
        assert!(err.to_string().contains("is not a Horn clause"), "{clause}: {err}");
        assert!(kb.backward_chain().is_err(), "{clause}");

        // truth-table checking still decides it
        kb.entails(&TableConfig::default())?;
    }

    let kb = KnowledgeBase::from_formulas(&["a"], "a & a")?;
    let err = kb.backward_chain().expect_err("query is not a symbol");
    assert!(err.to_string().contains("single symbol"), "{err}");

    Ok(())
}

#[test]
fn test_reverse_implication() -> anyhow::Result<()> {
    let reversed = KnowledgeBase::from_formulas(&["d <= p1 & p2", "a <=> b"], "d")?;
    let forward = KnowledgeBase::from_formulas(&["p1 & p2 -> d", "a <=> b"], "d")?;

    assert_eq!(reversed, forward);

    let err = KnowledgeBase::from_formulas(&["d <="], "d").expect_err("empty body");
    assert!(format!("{err:#}").contains("in clause `d <=`"), "{err:#}");

    Ok(())
}
