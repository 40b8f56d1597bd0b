use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use truthtab::entailment::{Entailment, InferenceMethod, KnowledgeBase};
use truthtab::parser_io::ParseTree;
use truthtab::{
    FormulaError, Notation, ParsedFormula, TableConfig, TruthTableEntry, DEFAULT_MAX_VARIABLES,
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Prints the truth table of a propositional formula", long_about = None)]
struct Args {
    #[clap(value_name = "FORMULA")]
    /// The formula to evaluate, e.g. "p /\ q -> r"
    formula: Option<String>,

    #[clap(short, long, value_parser, conflicts_with = "formula")]
    /// Read the formula from a file instead
    input: Option<PathBuf>,

    #[clap(long, value_parser, conflicts_with_all = ["formula", "input"])]
    /// Decide a TELL/ASK knowledge base by truth-table model checking
    kb: Option<PathBuf>,

    #[clap(short, long, value_enum, default_value_t = InferenceMethod::Tt)]
    /// How to decide the knowledge base: truth table, forward or backward chaining
    method: InferenceMethod,

    #[clap(short, long, value_name = "ASSIGNMENT")]
    /// Evaluate a single assignment, e.g. "p=T, q=F", instead of printing the whole table
    assign: Option<String>,

    #[clap(short, long, default_value = "any")]
    /// Only print rows whose result is true, false or any
    filter: TruthTableEntry,

    #[clap(short, long, default_value = "unicode")]
    /// Notation used to print the formula (unicode, ascii, latex or english)
    notation: Notation,

    #[clap(long)]
    /// Output the truth table as CSV
    csv: bool,

    #[clap(short, long)]
    /// Output the parse tree in dot (GraphViz) format
    dot: bool,

    #[clap(short, long, value_parser)]
    /// The output filename (or stdout if not provided)
    output: Option<PathBuf>,

    #[clap(long, env = "TRUTHTAB_MAX_VARS", default_value_t = DEFAULT_MAX_VARIABLES)]
    /// Refuse to enumerate formulas with more variables than this
    max_vars: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse_from(wild::args_os());
    let config = TableConfig::new(args.max_vars);

    let mut writer = if let Some(output_file) = &args.output {
        let file = File::create(output_file)
            .with_context(|| format!("cannot create {}", output_file.display()))?;
        Box::new(BufWriter::new(file)) as Box<dyn Write>
    } else {
        Box::new(BufWriter::new(io::stdout())) as Box<dyn Write>
    };

    if let Some(kb_file) = &args.kb {
        let file =
            File::open(kb_file).with_context(|| format!("cannot open {}", kb_file.display()))?;
        let kb = KnowledgeBase::new(&mut BufReader::new(file))?;

        match args.method {
            InferenceMethod::Tt => {
                let verdict = kb.entails(&config)?;
                writeln!(writer, "{verdict}")?;

                if let Entailment::NotEntailed { counterexample } = &verdict {
                    for (name, value) in kb.vars.iter().zip(counterexample) {
                        writeln!(writer, "  {name} = {}", TruthTableEntry::from(*value))?;
                    }
                }
            }
            InferenceMethod::Fc => writeln!(writer, "{}", kb.forward_chain()?)?,
            InferenceMethod::Bc => writeln!(writer, "{}", kb.backward_chain()?)?,
        }

        writer.flush()?;
        return Ok(());
    }

    let src = match (&args.formula, &args.input) {
        (Some(formula), _) => formula.clone(),
        (None, Some(input)) => std::fs::read_to_string(input)
            .with_context(|| format!("cannot read {}", input.display()))?,
        (None, None) => anyhow::bail!("provide a formula or an input file"),
    };
    let src = src.trim_end();

    let formula: ParsedFormula = src.parse().map_err(|e| report(src, e))?;

    if args.dot {
        ParseTree::new(&formula.expr, &formula.vars).render_dot(&mut writer)?;
    } else if let Some(assignment) = &args.assign {
        let assignment = formula.parse_assignment(assignment)?;
        writeln!(
            writer,
            "{} = {}",
            formula.render(args.notation),
            TruthTableEntry::from(formula.eval(&assignment))
        )?;
    } else {
        let mut table = formula.truth_table(&config).map_err(|e| report(src, e))?;
        table.formula = formula.render(args.notation);

        if args.csv {
            table.write_csv(&mut writer, args.filter)?;
        } else {
            table.write_text(&mut writer, args.filter)?;
        }
    }

    // flush the writer before dropping it
    writer.flush()?;

    Ok(())
}

/// Attaches the highlighted input to a formula error.
fn report(src: &str, err: FormulaError) -> anyhow::Error {
    let highlighted = err.highlight(src);
    anyhow::Error::new(err).context(format!("cannot process formula\n{highlighted}"))
}
