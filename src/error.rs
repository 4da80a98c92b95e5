use crate::maps::MapError;
use crate::parse::ParseError;
use crate::roll::EvalError;

/// Any failure the interpreter can produce, from source text to final value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Map(#[from] MapError),
}
