//! Text protocol through which the operators of the delete relaxation are handed to the
//! heuristic of the search component.
//!
//! ```text
//! <effect>
//! <precondition 1>
//! ...
//! <precondition k>
//! cost
//! <weight>
//! ... (other operators)
//! end_operators
//! ```

use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;

use crate::errors::OperatorFileError;
use crate::relaxation::GroundOperator;
use crate::{IntValue, Res, config};

pub const COST_MARKER: &str = "cost";
pub const END_MARKER: &str = "end_operators";

/// Writes the operators in the given order.
pub fn write_operators<'a, W: Write>(
    operators: impl IntoIterator<Item = &'a GroundOperator>,
    out: &mut W,
) -> std::io::Result<()> {
    for op in operators {
        writeln!(out, "{}", op.effect)?;
        for pre in &op.preconditions {
            writeln!(out, "{pre}")?;
        }
        writeln!(out, "{COST_MARKER}")?;
        writeln!(out, "{}", op.weight)?;
    }
    writeln!(out, "{END_MARKER}")
}

/// Writes the operators to a file, sorted to make the output reproducible.
pub fn write_operators_file<'a>(
    operators: impl IntoIterator<Item = &'a GroundOperator>,
    path: impl AsRef<Path>,
) -> Res<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_operators(operators.into_iter().sorted(), &mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("Error while writing operators to {}", path.display()))?;
    tracing::debug!("operators written to {}", path.display());
    Ok(())
}

/// Writes the operators to the file designated by `ARIES_GROUNDING_OPERATORS_FILE`.
pub fn write_default_operators_file<'a>(operators: impl IntoIterator<Item = &'a GroundOperator>) -> Res<PathBuf> {
    let path = PathBuf::from(config::OPERATORS_FILE.get_ref());
    write_operators_file(operators, &path)?;
    Ok(path)
}

/// Operator as read back from the text protocol, with propositions identified by their text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParsedOperator {
    pub effect: String,
    pub preconditions: Vec<String>,
    pub cost: IntValue,
}

struct Lines<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> Lines<R> {
    fn next_line(&mut self) -> Result<String, OperatorFileError> {
        match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                Ok(line?)
            }
            None => Err(OperatorFileError::UnexpectedEnd(self.line_number)),
        }
    }
}

/// Reads operators until the `end_operators` marker.
pub fn read_operators(reader: impl BufRead) -> Result<Vec<ParsedOperator>, OperatorFileError> {
    let mut lines = Lines {
        lines: reader.lines(),
        line_number: 0,
    };
    let mut operators = Vec::new();
    let mut line = lines.next_line()?;
    while line != END_MARKER {
        let effect = line;
        let mut preconditions = Vec::new();
        line = lines.next_line()?;
        while line != COST_MARKER {
            preconditions.push(line);
            line = lines.next_line()?;
        }
        let text = lines.next_line()?;
        let cost = text.trim().parse().map_err(|_| OperatorFileError::InvalidCost {
            line: lines.line_number,
            text: text.clone(),
        })?;
        operators.push(ParsedOperator {
            effect,
            preconditions,
            cost,
        });
        line = lines.next_line()?;
    }
    Ok(operators)
}
