use super::error::{EvalError, MappingError};
use super::roller::{DefaultRoller, Roller};
use super::value::{CompoundResult, Value};
use crate::common::{BinaryOperator, Int, Pool, Ruleset, UnaryOperator};
use crate::maps::{DiceMap, DiceMapRegistry};
use crate::ops::{self, PoolOperate, PoolOperator};
use crate::parse::ast::{Ast, Node};
use std::collections::BTreeMap;
use vec1::vec1;

type EResult<T> = Result<T, EvalError>;

pub const DEFAULT_MAX_ROLLS: usize = 1000;

/// Evaluation state for one YADN string: the random source, dice-map
/// lookups, house rules, and the roll budget that bounds exploding dice.
pub struct RollContext<'m, R = DefaultRoller> {
    roller: R,
    registry: &'m DiceMapRegistry,
    /// Maps defined by literals in the input; they shadow the registry and
    /// live only as long as the context.
    locals: BTreeMap<String, DiceMap>,
    rules: Ruleset,
    max_rolls: Option<usize>,
    rolls: usize,
}

impl<'m, R: Roller> RollContext<'m, R> {
    pub fn new(roller: R, registry: &'m DiceMapRegistry) -> Self {
        Self {
            roller,
            registry,
            locals: BTreeMap::new(),
            rules: Ruleset::default(),
            max_rolls: Some(DEFAULT_MAX_ROLLS),
            rolls: 0,
        }
    }

    pub fn with_ruleset(mut self, rules: Ruleset) -> Self {
        self.rules = rules;
        self
    }

    /// `None` removes the budget entirely; exploding dice are then unbounded.
    pub fn with_max_rolls(mut self, max_rolls: Option<usize>) -> Self {
        self.max_rolls = max_rolls;
        self
    }

    /// Defines a context-local map, shadowing the registry.
    pub fn add_map(&mut self, name: impl Into<String>, map: DiceMap) {
        self.locals.insert(name.into(), map);
    }

    pub fn eval(&mut self, ast: &Ast) -> EResult<CompoundResult> {
        self.rolls = 0;
        let mut values = Vec::with_capacity(ast.rolls.len());
        for roll in &ast.rolls {
            values.push(self.eval_node(roll)?);
        }
        Ok(CompoundResult::new(values))
    }

    /// Rolls one die, charging it against the roll budget.
    pub(crate) fn draw(&mut self, size: Int) -> EResult<Int> {
        if size < 1 {
            return Err(EvalError::InvalidDieSize(size));
        }
        if let Some(max) = self.max_rolls {
            if self.rolls >= max {
                return Err(EvalError::TooManyRolls);
            }
        }
        self.rolls += 1;
        Ok(self.roller.roll(size))
    }

    fn eval_node(&mut self, node: &Node) -> EResult<Value> {
        match node {
            Node::Int(x) => Ok(Value::Int(*x)),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Text(s) => Ok(Value::Text(s.clone())),
            Node::Pool(pool) => Ok(Value::Pool(pool.clone())),
            Node::Map(def) => {
                self.locals.insert(def.name.clone(), def.entries.clone());
                Ok(Value::None)
            }
            Node::Group(inner) => self.eval_node(inner),
            Node::Qualified(inner, qualifier) => self.eval_node(inner)?.qualify(*qualifier),
            Node::Mapped(expr, name) => {
                let ordinal = self.eval_int(expr, "m")?;
                let text = self.lookup(name, ordinal)?;
                Ok(Value::Text(text))
            }
            Node::Unary(op, operand) => self.eval_unary(*op, operand),
            Node::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs),
        }
    }

    fn eval_unary(&mut self, op: UnaryOperator, operand: &Node) -> EResult<Value> {
        match op {
            UnaryOperator::Neg => {
                let x = self.eval_int(operand, "-")?;
                x.checked_neg()
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow("-"))
            }
            UnaryOperator::Concatenate => {
                let pool = self.eval_pool(operand, "C")?;
                ops::pool_concatenate(&pool).map(Value::Int)
            }
            UnaryOperator::Count => {
                let pool = self.eval_pool(operand, "N")?;
                Ok(Value::Int(ops::pool_count(&pool)))
            }
            UnaryOperator::Sum => {
                let pool = self.eval_pool(operand, "S")?;
                ops::pool_sum(&pool).map(Value::Int)
            }
            UnaryOperator::PickOne => match self.eval_node(operand)? {
                Value::Options(options) => Ok(ops::pick(&mut self.roller, &options)),
                other => Err(EvalError::TypeMismatch {
                    op: "?",
                    expected: "an options list",
                    found: other.kind(),
                }),
            },
        }
    }

    fn eval_binary(&mut self, op: BinaryOperator, lhs: &Node, rhs: &Node) -> EResult<Value> {
        use BinaryOperator as B;
        match op {
            B::Pow | B::Mul | B::Div | B::Mod | B::Add | B::Sub => {
                let a = self.eval_int(lhs, op.symbol())?;
                let b = self.eval_int(rhs, op.symbol())?;
                arithmetic(op, a, b).map(Value::Int)
            }
            B::Die
            | B::ExplodingDie
            | B::ConcatDie
            | B::KeepHighDie
            | B::KeepLowDie
            | B::WildDie
            | B::DicePool
            | B::ExplodingPool => {
                let num = self.eval_int(lhs, op.symbol())?;
                let size = self.eval_int(rhs, op.symbol())?;
                self.eval_dice(op, num, size)
            }
            B::PoolKeepAbove
            | B::PoolKeepBelow
            | B::PoolCap
            | B::PoolFloor
            | B::PoolKeepHigh
            | B::PoolKeepLow
            | B::PoolRemove
            | B::PoolModulo => {
                let pool = self.eval_pool(lhs, op.symbol())?;
                let arg = self.eval_int(rhs, op.symbol())?;
                pool_transform(op).operate(&pool, arg).map(Value::Pool)
            }
            B::Successes => {
                let pool = self.eval_pool(lhs, "ns")?;
                let target = self.eval_int(rhs, "ns")?;
                Ok(Value::Int(ops::count_successes(&pool, target)))
            }
            B::SuccessesBotch => {
                let pool = self.eval_pool(lhs, "nb")?;
                let target = self.eval_int(rhs, "nb")?;
                Ok(Value::Int(ops::count_successes_with_botch(
                    &pool,
                    target,
                    self.rules.botch,
                )))
            }
            B::LessThan | B::GreaterThan | B::LessEqual | B::GreaterEqual | B::Equal
            | B::NotEqual => {
                let a = self.eval_int(lhs, op.symbol())?;
                let b = self.eval_int(rhs, op.symbol())?;
                Ok(Value::Bool(match op {
                    B::LessThan => a < b,
                    B::GreaterThan => a > b,
                    B::LessEqual => a <= b,
                    B::GreaterEqual => a >= b,
                    B::Equal => a == b,
                    B::NotEqual => a != b,
                    _ => unreachable!(),
                }))
            }
            B::Options => {
                let lhs = self.eval_node(lhs)?;
                let rhs = self.eval_node(rhs)?;
                let options = match lhs {
                    Value::Options(mut options) => {
                        options.push(rhs);
                        options
                    }
                    other => vec1![other, rhs],
                };
                Ok(Value::Options(options))
            }
            B::Choice => {
                let lhs = self.eval_node(lhs)?;
                let rhs = self.eval_node(rhs)?;
                match (lhs, rhs) {
                    (Value::Bool(flag), Value::Options(options)) => ops::choose(flag, &options),
                    (other, Value::Options(_)) => Err(EvalError::TypeMismatch {
                        op: "?",
                        expected: "a boolean before an options list",
                        found: other.kind(),
                    }),
                    (lhs, rhs) => Ok(ops::pick(&mut self.roller, &vec1![lhs, rhs])),
                }
            }
        }
    }

    fn eval_dice(&mut self, op: BinaryOperator, num: Int, size: Int) -> EResult<Value> {
        use BinaryOperator as B;
        let wild_policy = self.rules.wild_die;
        match op {
            B::Die => ops::die(self, num, size).map(Value::Int),
            B::ExplodingDie => ops::exploding_die(self, num, size).map(Value::Int),
            B::ConcatDie => ops::concat_die(self, num, size).map(Value::Int),
            B::KeepHighDie => ops::keep_high_die(self, num, size).map(Value::Int),
            B::KeepLowDie => ops::keep_low_die(self, num, size).map(Value::Int),
            B::WildDie => ops::wild_die(self, num, size, wild_policy).map(Value::Int),
            B::DicePool => ops::dice_pool(self, num, size).map(Value::Pool),
            B::ExplodingPool => ops::exploding_pool(self, num, size).map(Value::Pool),
            _ => unreachable!(),
        }
    }

    fn eval_int(&mut self, node: &Node, op: &'static str) -> EResult<Int> {
        self.eval_node(node)?.into_int(op)
    }

    fn eval_pool(&mut self, node: &Node, op: &'static str) -> EResult<Pool> {
        self.eval_node(node)?.into_pool(op)
    }

    fn lookup(&self, name: &str, ordinal: Int) -> Result<String, MappingError> {
        let map = self
            .locals
            .get(name)
            .or_else(|| self.registry.get(name))
            .ok_or_else(|| MappingError::UnknownMap(name.to_owned()))?;
        map.get(&ordinal)
            .cloned()
            .ok_or_else(|| MappingError::UnmappedOrdinal {
                name: name.to_owned(),
                ordinal,
            })
    }
}

fn arithmetic(op: BinaryOperator, a: Int, b: Int) -> EResult<Int> {
    use BinaryOperator as B;
    match op {
        B::Add => a.checked_add(b).ok_or(EvalError::Overflow("+")),
        B::Sub => a.checked_sub(b).ok_or(EvalError::Overflow("-")),
        B::Mul => a.checked_mul(b).ok_or(EvalError::Overflow("*")),
        B::Div => ops::floor_div(a, b),
        B::Mod => {
            if b == 0 {
                Err(EvalError::ZeroModulo)
            } else {
                Ok(ops::floor_mod(a, b))
            }
        }
        B::Pow => {
            if b < 0 {
                return Err(EvalError::NegativeExponent(b));
            }
            let exp = u32::try_from(b).map_err(|_| EvalError::Overflow("^"))?;
            a.checked_pow(exp).ok_or(EvalError::Overflow("^"))
        }
        _ => unreachable!(),
    }
}

fn pool_transform(op: BinaryOperator) -> PoolOperator {
    use BinaryOperator as B;
    match op {
        B::PoolKeepAbove => ops::KeepAbove.into(),
        B::PoolKeepBelow => ops::KeepBelow.into(),
        B::PoolCap => ops::Cap.into(),
        B::PoolFloor => ops::Floor.into(),
        B::PoolKeepHigh => ops::KeepHigh.into(),
        B::PoolKeepLow => ops::KeepLow.into(),
        B::PoolRemove => ops::Remove.into(),
        B::PoolModulo => ops::Modulo.into(),
        _ => unreachable!(),
    }
}
