use thiserror::Error;

use crate::{GroundAtom, Sym};

/// Fatal errors of a grounding pass.
///
/// Candidates that turn out to be unreachable are not errors: they are silently excluded
/// from the output.
#[derive(Error, Debug)]
pub enum GroundingError {
    /// The reachability model and the task disagree on the arity of a schema.
    #[error("reachable atom {atom:?} has {found} arguments but schema `{schema}` declares {expected} parameters")]
    MissingArguments {
        schema: Sym,
        atom: GroundAtom,
        expected: usize,
        found: usize,
    },
    #[error("parameter {0} is not bound to any object")]
    UnboundParameter(Sym),
    #[error("no initial value for numeric fluent {0:?}")]
    UnassignedFluent(GroundAtom),
}

#[derive(Error, Debug)]
pub enum OperatorFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input after line {0} (missing `end_operators`?)")]
    UnexpectedEnd(usize),
    #[error("line {line}: invalid operator cost `{text}`")]
    InvalidCost { line: usize, text: String },
}
