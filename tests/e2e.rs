use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use truthtab::parser_io::ParseTree;
use truthtab::{ParsedFormula, TableConfig, TruthTable};

fn file_table<P: AsRef<Path>>(file: P) -> TruthTable {
    let f = File::open(file).unwrap();

    let input_parsed =
        ParsedFormula::new(&mut BufReader::new(f)).expect("Could not parse input file");

    input_parsed
        .truth_table(&TableConfig::default())
        .expect("Could not build truth table")
}

#[test]
fn test_files_tautology() {
    for file in glob::glob("tests/data/*_is_tautology.txt").unwrap() {
        let f = file.unwrap();
        println!("testing {}", f.display());
        assert!(file_table(&f).is_tautology(), "{}", f.display());
    }
}

#[test]
fn test_files_contradiction() {
    for file in glob::glob("tests/data/*_is_contradiction.txt").unwrap() {
        let f = file.unwrap();
        println!("testing {}", f.display());
        assert!(file_table(&f).is_contradiction(), "{}", f.display());
    }
}

#[test]
fn test_parse_tree_dot() -> anyhow::Result<()> {
    let formula: ParsedFormula = "~p -> q".parse()?;
    let tree = ParseTree::new(&formula.expr, &formula.vars);

    assert_eq!(tree.labels, vec!["→", "¬", "p", "q"]);
    assert_eq!(
        tree.edges,
        vec![
            (1, String::new(), 2),
            (0, "L".to_string(), 1),
            (0, "R".to_string(), 3),
        ]
    );

    let mut out = Vec::new();
    tree.render_dot(&mut out)?;
    let dot = String::from_utf8(out)?;

    assert!(dot.starts_with("digraph parse_tree {"));
    assert!(dot.contains("n_0 -> n_1"));
    assert!(dot.contains("n_0 -> n_3"));

    Ok(())
}
