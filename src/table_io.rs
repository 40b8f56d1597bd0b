use std::io::{self, Write};

use itertools::Itertools;

use crate::truth_table::{Row, TruthTable, TruthTableEntry};

const fn cell(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

impl TruthTable {
    /// Writes the rows admitted by `filter` as an aligned plain-text table.
    pub fn write_text<W: Write>(&self, writer: &mut W, filter: TruthTableEntry) -> io::Result<()> {
        let headers: Vec<&str> = self
            .vars
            .iter()
            .map(String::as_str)
            .chain([self.formula.as_str()])
            .collect();
        let widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

        writeln!(
            writer,
            " {} ",
            headers
                .iter()
                .zip(widths.iter().copied())
                .map(|(h, w)| format!("{h:^w$}"))
                .join(" | ")
        )?;
        writeln!(
            writer,
            "-{}-",
            widths.iter().map(|w| "-".repeat(*w)).join("-+-")
        )?;

        for row in self.filtered(filter) {
            let cells = row.assignment.iter().chain([&row.result]).map(|v| cell(*v));

            writeln!(
                writer,
                " {} ",
                cells
                    .zip(widths.iter().copied())
                    .map(|(c, w)| format!("{c:^w$}"))
                    .join(" | ")
            )?;
        }

        Ok(())
    }

    /// Writes the rows admitted by `filter` as CSV, with the variables and the rendered
    /// formula as header.
    pub fn write_csv<W: Write>(&self, writer: W, filter: TruthTableEntry) -> csv::Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(self.vars.iter().chain([&self.formula]))?;

        for Row { assignment, result } in self.filtered(filter) {
            csv_writer.write_record(
                assignment
                    .iter()
                    .chain([result])
                    .map(|v| TruthTableEntry::from(*v).to_string()),
            )?;
        }

        csv_writer.flush()?;

        Ok(())
    }
}
