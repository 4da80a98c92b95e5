//! An interpreter for YADN ("Yet Another Dice Notation").
//!
//! A YADN string is lexed, parsed, and evaluated into one value per
//! `;`-separated roll. Beyond plain arithmetic and dice, the notation covers
//! exploding dice, dice pools and their transformations, success counting,
//! comparisons, random and boolean choice, and mapping rolled numbers through
//! named translation tables.
//!
//! ```
//! let result = yadn::roll_str("2+3*4").unwrap();
//! assert_eq!(result, "14");
//! ```
//!
//! Randomness is injectable: anything implementing [`Roller`] (every
//! [`rand::Rng`] does) can drive the dice.
//!
//! ```
//! use rand::SeedableRng;
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(42);
//! let registry = yadn::DiceMapRegistry::new();
//! let result = yadn::roll_with("3d6", rng, &registry).unwrap();
//! let total = result.single().and_then(yadn::Value::as_int).unwrap();
//! assert!((3..=18).contains(&total));
//! ```

mod common;
mod error;
pub mod maps;
mod ops;
pub mod parse;
pub mod roll;

pub use common::{BotchPolicy, Int, Pool, Qualifier, Ruleset, WildDiePolicy};
pub use error::Error;
pub use maps::{DiceMap, DiceMapDef, DiceMapRegistry, MapError};
pub use parse::{parse, ParseError, ParseErrorKind};
pub use roll::{
    CompoundResult, DefaultRoller, EvalError, MappingError, RollContext, Roller, Value,
};

/// Interprets a YADN string with the thread RNG and no registered dice maps.
pub fn roll(yadn: &str) -> Result<CompoundResult, Error> {
    let registry = DiceMapRegistry::new();
    roll_with(yadn, rand::thread_rng(), &registry)
}

/// Interprets a YADN string and renders the result back to YADN text.
pub fn roll_str(yadn: &str) -> Result<String, Error> {
    Ok(roll(yadn)?.to_string())
}

/// Interprets a YADN string with an explicit roller and dice-map registry.
pub fn roll_with<R: Roller>(
    yadn: &str,
    roller: R,
    registry: &DiceMapRegistry,
) -> Result<CompoundResult, Error> {
    let ast = parse(yadn)?;
    Ok(roll::eval(&ast, roller, registry)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::FixedRoller;

    #[test]
    fn roll_handles_a_full_expression() {
        let result = roll("(2+3*4)d1").unwrap();
        assert_eq!(result.single(), Some(&Value::Int(14)));
    }

    #[test]
    fn roll_str_renders_compound_results() {
        assert_eq!(roll_str("1+1; [2,4]pa3; \"hi\"").unwrap(), "2; [4]; \"hi\"");
    }

    #[test]
    fn parse_errors_surface_through_the_top_level() {
        let err = roll("3d").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("unexpected end of input"));
    }

    #[test]
    fn eval_errors_surface_through_the_top_level() {
        let err = roll("1/0").unwrap_err();
        assert_eq!(err, Error::Eval(EvalError::ZeroDivision));
    }

    #[test]
    fn registered_maps_reach_the_evaluator() {
        let mut registry = DiceMapRegistry::new();
        registry
            .load_str("faces\n1 blank\n2 blank\n3 boost\n4 success\n")
            .unwrap();
        let result = roll_with(r#"1d4m"faces""#, FixedRoller::new([3]), &registry).unwrap();
        assert_eq!(result.single(), Some(&Value::Text("boost".into())));
    }
}
