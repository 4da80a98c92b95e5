use std::fmt;
use std::str::FromStr;

/// The only numeric type in YADN.
pub type Int = i64;

/// An ordered collection of rolled or literal values. Order is meaningful
/// (keep-high/keep-low resolve ties by position) and duplicates are allowed.
pub type Pool = Vec<Int>;

pub(crate) type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnaryOperator {
    Neg,
    Concatenate,
    Count,
    Sum,
    PickOne,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Concatenate => "C",
            Self::Count => "N",
            Self::Sum => "S",
            Self::PickOne => "?",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOperator {
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Die,
    ExplodingDie,
    ConcatDie,
    KeepHighDie,
    KeepLowDie,
    WildDie,
    DicePool,
    ExplodingPool,
    PoolKeepAbove,
    PoolKeepBelow,
    PoolCap,
    PoolFloor,
    PoolKeepHigh,
    PoolKeepLow,
    PoolRemove,
    PoolModulo,
    Successes,
    SuccessesBotch,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    Options,
    Choice,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pow => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Die => "d",
            Self::ExplodingDie => "d!",
            Self::ConcatDie => "dc",
            Self::KeepHighDie => "dh",
            Self::KeepLowDie => "dl",
            Self::WildDie => "dw",
            Self::DicePool => "dp",
            Self::ExplodingPool => "dp!",
            Self::PoolKeepAbove => "pa",
            Self::PoolKeepBelow => "pb",
            Self::PoolCap => "pc",
            Self::PoolFloor => "pf",
            Self::PoolKeepHigh => "ph",
            Self::PoolKeepLow => "pl",
            Self::PoolRemove => "pr",
            Self::PoolModulo => "p%",
            Self::Successes => "ns",
            Self::SuccessesBotch => "nb",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Options => ":",
            Self::Choice => "?",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A trailing output qualifier (`'int'`, `'bool'`, `'str'`) adjusting how the
/// final value of a roll is typed and rendered.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Qualifier {
    Bool,
    Int,
    Str,
}

impl Qualifier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Str => "str",
        }
    }
}

impl FromStr for Qualifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("bool") {
            Ok(Self::Bool)
        } else if s.eq_ignore_ascii_case("int") {
            Ok(Self::Int)
        } else if s.eq_ignore_ascii_case("str") {
            Ok(Self::Str)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happens when the wild die (`dw`) opens on its minimum face. On any
/// other first roll the wild die simply adds to the plain dice.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum WildDiePolicy {
    /// The wild result stands in for the lowest plain die.
    #[default]
    ReplaceLowest,
    /// The wild result is added anyway.
    Supplement,
    /// The whole roll totals zero.
    ZeroRoll,
}

/// Controls success-minus-botch counting (`nb`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BotchPolicy {
    /// The die value that counts as a botch.
    pub botch: Int,
    /// Clamp the net result at zero instead of letting it go negative.
    pub floor_at_zero: bool,
}

impl Default for BotchPolicy {
    fn default() -> Self {
        Self {
            botch: 1,
            floor_at_zero: false,
        }
    }
}

/// House-rule knobs honored by the evaluator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Ruleset {
    pub wild_die: WildDiePolicy,
    pub botch: BotchPolicy,
}
