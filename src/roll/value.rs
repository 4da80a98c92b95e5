use super::error::EvalError;
use crate::common::{Int, NonEmpty, Pool, Qualifier};
use std::fmt;

/// The result of evaluating one roll.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(Int),
    Bool(bool),
    Text(String),
    Pool(Pool),
    /// An options list built by `:`, awaiting a choice.
    Options(NonEmpty<Value>),
    /// Produced by dice-map definitions; renders as nothing.
    None,
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "a number",
            Self::Bool(_) => "a boolean",
            Self::Text(_) => "text",
            Self::Pool(_) => "a pool",
            Self::Options(_) => "an options list",
            Self::None => "nothing",
        }
    }

    pub fn as_int(&self) -> Option<Int> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pool(&self) -> Option<&Pool> {
        match self {
            Self::Pool(pool) => Some(pool),
            _ => None,
        }
    }

    pub(crate) fn into_int(self, op: &'static str) -> Result<Int, EvalError> {
        match self {
            Self::Int(n) => Ok(n),
            other => Err(EvalError::TypeMismatch {
                op,
                expected: "a number",
                found: other.kind(),
            }),
        }
    }

    pub(crate) fn into_pool(self, op: &'static str) -> Result<Pool, EvalError> {
        match self {
            Self::Pool(pool) => Ok(pool),
            other => Err(EvalError::TypeMismatch {
                op,
                expected: "a pool",
                found: other.kind(),
            }),
        }
    }

    /// Applies a trailing output qualifier.
    pub fn qualify(self, qualifier: Qualifier) -> Result<Self, EvalError> {
        match qualifier {
            Qualifier::Bool => match self {
                Self::Bool(_) => Ok(self),
                Self::Int(n) => Ok(Self::Bool(n != 0)),
                other => Err(cannot_qualify(qualifier, &other)),
            },
            Qualifier::Int => match self {
                Self::Int(_) => Ok(self),
                Self::Bool(b) => Ok(Self::Int(Int::from(b))),
                other => Err(cannot_qualify(qualifier, &other)),
            },
            Qualifier::Str => Ok(match self {
                Self::Text(_) => self,
                other => Self::Text(other.to_string()),
            }),
        }
    }
}

fn cannot_qualify(qualifier: Qualifier, value: &Value) -> EvalError {
    EvalError::CannotQualify {
        qualifier: qualifier.name(),
        found: value.kind(),
    }
}

impl fmt::Display for Value {
    /// Renders the value back to YADN.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(true) => f.write_str("T"),
            Self::Bool(false) => f.write_str("F"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Pool(pool) => {
                f.write_str("[")?;
                for (i, member) in pool.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("]")
            }
            Self::Options(options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{option}")?;
                }
                Ok(())
            }
            Self::None => Ok(()),
        }
    }
}

/// The values of every `;`-separated roll of one input string, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundResult(Vec<Value>);

impl CompoundResult {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// The lone value, for single-roll inputs.
    pub fn single(&self) -> Option<&Value> {
        match self.values() {
            [value] => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for CompoundResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for value in self.values() {
            if matches!(value, Value::None) {
                continue;
            }
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec1::vec1;

    #[test]
    fn values_render_back_to_notation() {
        assert_eq!(Value::Int(-12).to_string(), "-12");
        assert_eq!(Value::Bool(true).to_string(), "T");
        assert_eq!(Value::Text("spam".into()).to_string(), "\"spam\"");
        assert_eq!(Value::Pool(vec![4, 10]).to_string(), "[4, 10]");
        assert_eq!(
            Value::Options(vec1![Value::Text("a".into()), Value::Int(3)]).to_string(),
            "\"a\":3",
        );
        assert_eq!(Value::None.to_string(), "");
    }

    #[test]
    fn compound_results_join_rolls_and_skip_map_definitions() {
        let result = CompoundResult::new(vec![
            Value::None,
            Value::Int(7),
            Value::Text("hit".into()),
        ]);
        assert_eq!(result.to_string(), "7; \"hit\"");
        assert!(result.single().is_none());
    }

    #[test]
    fn qualifiers_coerce_between_numbers_and_booleans() {
        assert_eq!(
            Value::Int(0).qualify(Qualifier::Bool),
            Ok(Value::Bool(false)),
        );
        assert_eq!(Value::Int(3).qualify(Qualifier::Bool), Ok(Value::Bool(true)));
        assert_eq!(Value::Bool(true).qualify(Qualifier::Int), Ok(Value::Int(1)));
        assert_eq!(
            Value::Pool(vec![1]).qualify(Qualifier::Int),
            Err(EvalError::CannotQualify {
                qualifier: "int",
                found: "a pool",
            }),
        );
    }

    #[test]
    fn str_qualifier_renders_anything() {
        assert_eq!(
            Value::Int(15).qualify(Qualifier::Str),
            Ok(Value::Text("15".into())),
        );
        assert_eq!(
            Value::Text("keep".into()).qualify(Qualifier::Str),
            Ok(Value::Text("keep".into())),
        );
    }
}
