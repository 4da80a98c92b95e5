use crate::common::Int;

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum EvalError {
    #[error("dice must have at least 1 side, got {0}")]
    InvalidDieSize(Int),
    #[error("cannot roll {0} dice")]
    InvalidDieCount(Int),
    #[error("cannot apply {op} to an empty pool")]
    EmptyPool { op: &'static str },
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("cannot take a modulus by zero")]
    ZeroModulo,
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
    #[error("cannot raise to the negative power {0}")]
    NegativeExponent(Int),
    #[error("{op} expected {expected}, got {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("concatenation produced {0:?}, which is not a number")]
    BadConcat(String),
    #[error("cannot apply qualifier '{qualifier}' to {found}")]
    CannotQualify {
        qualifier: &'static str,
        found: &'static str,
    },
    #[error("exceeded the maximum number of dice rolls")]
    TooManyRolls,
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum MappingError {
    #[error("no dice map named {0:?} is registered")]
    UnknownMap(String),
    #[error("ordinal {ordinal} is not defined in dice map {name:?}")]
    UnmappedOrdinal { name: String, ordinal: Int },
}
