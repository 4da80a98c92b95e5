mod ctx;
mod error;
mod roller;
mod value;

pub use ctx::{RollContext, DEFAULT_MAX_ROLLS};
pub use error::{EvalError, MappingError};
pub use roller::{DefaultRoller, Roller};
pub use value::{CompoundResult, Value};

#[cfg(test)]
pub(crate) use roller::{FixedRoller, StepRoller};

use crate::maps::DiceMapRegistry;
use crate::parse::ast::Ast;

/// Evaluates a parsed YADN string with the given roller and registry.
pub fn eval<R: Roller>(
    ast: &Ast,
    roller: R,
    registry: &DiceMapRegistry,
) -> Result<CompoundResult, EvalError> {
    RollContext::new(roller, registry).eval(ast)
}
