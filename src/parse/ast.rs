use crate::common::{BinaryOperator, Int, Pool, Qualifier, UnaryOperator};
use crate::maps::DiceMapDef;

/// A parsed YADN string: one or more `;`-separated rolls.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub rolls: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Int(Int),
    Bool(bool),
    Text(String),
    Pool(Pool),
    /// A dice-map literal; evaluating it registers the map for later rolls.
    Map(DiceMapDef),
    Group(Box<Node>),
    Unary(UnaryOperator, Box<Node>),
    Binary(BinaryOperator, Box<Node>, Box<Node>),
    /// `expr m "name"`.
    Mapped(Box<Node>, String),
    /// `expr 'qualifier'`.
    Qualified(Box<Node>, Qualifier),
}

impl Node {
    pub(crate) fn unary(op: UnaryOperator, operand: Node) -> Self {
        Self::Unary(op, Box::new(operand))
    }

    pub(crate) fn binary(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}
