use super::ast::{Ast, Node};
use super::lexer::{lexer, Lexer, TokenKind};
use crate::common::{BinaryOperator, UnaryOperator};
use logos_iter::LogosIter;
use std::ops::Range;

type PResult<T> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind} at {}..{}: {slice:?}", .span.start, .span.end)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected {expected}")]
    UnexpectedToken { expected: &'static str },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unrecognized input")]
    LexError,
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { lexer: lexer(s) }
    }

    pub fn parse(mut self) -> PResult<Ast> {
        let mut rolls = vec![self.parse_roll()?];
        while self.eat(&TokenKind::RollDelim) {
            rolls.push(self.parse_roll()?);
        }
        if self.peek().is_some() {
            return self.unexpected("an operator or end of input");
        }
        Ok(Ast { rolls })
    }

    fn peek(&mut self) -> Option<&TokenKind> {
        self.lexer.peek()
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.lexer.next();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, expected: &'static str) -> PResult<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            self.unexpected(expected)
        }
    }

    /// Consumes the offending token (if any) so the error's span and slice
    /// point at it, then reports failure.
    fn unexpected<T>(&mut self, expected: &'static str) -> PResult<T> {
        let kind = match self.lexer.next() {
            None => ParseErrorKind::UnexpectedEnd { expected },
            Some(TokenKind::Error) => ParseErrorKind::LexError,
            Some(_) => ParseErrorKind::UnexpectedToken { expected },
        };
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_owned(),
        })
    }

    fn parse_roll(&mut self) -> PResult<Node> {
        let expr = self.parse_expression()?;
        if let Some(TokenKind::Qualifier(_)) = self.peek() {
            match self.lexer.next() {
                Some(TokenKind::Qualifier(q)) => Ok(Node::Qualified(Box::new(expr), q)),
                _ => unreachable!(),
            }
        } else {
            Ok(expr)
        }
    }

    fn parse_expression(&mut self) -> PResult<Node> {
        self.parse_mapping()
    }

    fn parse_mapping(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_choice()?;
        while self.eat(&TokenKind::Mapping) {
            let name = self.expect_text("a quoted map name")?;
            lhs = Node::Mapped(Box::new(lhs), name);
        }
        Ok(lhs)
    }

    fn parse_choice(&mut self) -> PResult<Node> {
        if self.eat(&TokenKind::Choice) {
            let options = self.parse_options()?;
            return Ok(Node::unary(UnaryOperator::PickOne, options));
        }
        let mut lhs = self.parse_options()?;
        while self.eat(&TokenKind::Choice) {
            let rhs = self.parse_options()?;
            lhs = Node::binary(BinaryOperator::Choice, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_options(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_comparison()?;
        while self.eat(&TokenKind::Options) {
            let rhs = self.parse_comparison()?;
            lhs = Node::binary(BinaryOperator::Options, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_successes()?;
        while let Some(op) = self.peek().and_then(comparison_op) {
            self.lexer.next();
            let rhs = self.parse_successes()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_successes(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_pool_prefix()?;
        while let Some(op) = self.peek().and_then(successes_op) {
            self.lexer.next();
            let rhs = self.parse_pool_prefix()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_pool_prefix(&mut self) -> PResult<Node> {
        let op = match self.peek() {
            Some(TokenKind::Concatenate) => Some(UnaryOperator::Concatenate),
            Some(TokenKind::Count) => Some(UnaryOperator::Count),
            Some(TokenKind::Sum) => Some(UnaryOperator::Sum),
            _ => None,
        };
        match op {
            Some(op) => {
                self.lexer.next();
                let operand = self.parse_pool_transform()?;
                Ok(Node::unary(op, operand))
            }
            None => self.parse_pool_transform(),
        }
    }

    fn parse_pool_transform(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_dice()?;
        while let Some(op) = self.peek().and_then(pool_transform_op) {
            self.lexer.next();
            let rhs = self.parse_dice()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_dice(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_addition()?;
        while let Some(op) = self.peek().and_then(dice_op) {
            self.lexer.next();
            let rhs = self.parse_addition()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_addition(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_multiplication()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOperator::Add,
                Some(TokenKind::Minus) => BinaryOperator::Sub,
                _ => break,
            };
            self.lexer.next();
            let rhs = self.parse_multiplication()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOperator::Mul,
                Some(TokenKind::Slash) => BinaryOperator::Div,
                Some(TokenKind::Percent) => BinaryOperator::Mod,
                _ => break,
            };
            self.lexer.next();
            let rhs = self.parse_power()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_power(&mut self) -> PResult<Node> {
        let lhs = self.parse_unary()?;
        if self.eat(&TokenKind::Caret) {
            // Right-associative.
            let rhs = self.parse_power()?;
            Ok(Node::binary(BinaryOperator::Pow, lhs, rhs))
        } else {
            Ok(lhs)
        }
    }

    fn parse_unary(&mut self) -> PResult<Node> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_unary()?;
            Ok(Node::unary(UnaryOperator::Neg, operand))
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> PResult<Node> {
        match self.peek() {
            Some(
                TokenKind::Integer(_)
                | TokenKind::Boolean(_)
                | TokenKind::Text(_)
                | TokenKind::Pool(_)
                | TokenKind::Map(_),
            ) => match self.lexer.next() {
                Some(TokenKind::Integer(x)) => Ok(Node::Int(x)),
                Some(TokenKind::Boolean(b)) => Ok(Node::Bool(b)),
                Some(TokenKind::Text(s)) => Ok(Node::Text(s)),
                Some(TokenKind::Pool(p)) => Ok(Node::Pool(p)),
                Some(TokenKind::Map(def)) => Ok(Node::Map(def)),
                _ => unreachable!(),
            },
            Some(TokenKind::GroupOpen) => {
                self.lexer.next();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::GroupClose, "a closing parenthesis")?;
                Ok(Node::Group(Box::new(inner)))
            }
            _ => self.unexpected("a value"),
        }
    }

    fn expect_text(&mut self, expected: &'static str) -> PResult<String> {
        match self.peek() {
            Some(TokenKind::Text(_)) => match self.lexer.next() {
                Some(TokenKind::Text(s)) => Ok(s),
                _ => unreachable!(),
            },
            _ => self.unexpected(expected),
        }
    }
}

fn comparison_op(token: &TokenKind) -> Option<BinaryOperator> {
    Some(match token {
        TokenKind::LessThan => BinaryOperator::LessThan,
        TokenKind::GreaterThan => BinaryOperator::GreaterThan,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Equal => BinaryOperator::Equal,
        TokenKind::NotEqual => BinaryOperator::NotEqual,
        _ => return None,
    })
}

fn successes_op(token: &TokenKind) -> Option<BinaryOperator> {
    Some(match token {
        TokenKind::Successes => BinaryOperator::Successes,
        TokenKind::SuccessesBotch => BinaryOperator::SuccessesBotch,
        _ => return None,
    })
}

fn pool_transform_op(token: &TokenKind) -> Option<BinaryOperator> {
    Some(match token {
        TokenKind::PoolKeepAbove => BinaryOperator::PoolKeepAbove,
        TokenKind::PoolKeepBelow => BinaryOperator::PoolKeepBelow,
        TokenKind::PoolCap => BinaryOperator::PoolCap,
        TokenKind::PoolFloor => BinaryOperator::PoolFloor,
        TokenKind::PoolKeepHigh => BinaryOperator::PoolKeepHigh,
        TokenKind::PoolKeepLow => BinaryOperator::PoolKeepLow,
        TokenKind::PoolRemove => BinaryOperator::PoolRemove,
        TokenKind::PoolModulo => BinaryOperator::PoolModulo,
        _ => return None,
    })
}

fn dice_op(token: &TokenKind) -> Option<BinaryOperator> {
    Some(match token {
        TokenKind::Die => BinaryOperator::Die,
        TokenKind::ExplodingDie => BinaryOperator::ExplodingDie,
        TokenKind::ConcatDie => BinaryOperator::ConcatDie,
        TokenKind::KeepHighDie => BinaryOperator::KeepHighDie,
        TokenKind::KeepLowDie => BinaryOperator::KeepLowDie,
        TokenKind::WildDie => BinaryOperator::WildDie,
        TokenKind::DicePool => BinaryOperator::DicePool,
        TokenKind::ExplodingPool => BinaryOperator::ExplodingPool,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Qualifier;
    use BinaryOperator as B;
    use UnaryOperator as U;

    fn int(x: i64) -> Node {
        Node::Int(x)
    }

    fn bin(op: B, lhs: Node, rhs: Node) -> Node {
        Node::binary(op, lhs, rhs)
    }

    fn text(s: &str) -> Node {
        Node::Text(s.to_owned())
    }

    fn check(s: &str, expected: Node) {
        let ast = Parser::new(s).parse().unwrap();
        assert_eq!(ast.rolls, vec![expected], "input: {s}");
    }

    fn check_err(s: &str, kind: ParseErrorKind) {
        let err = Parser::new(s).parse().unwrap_err();
        assert_eq!(err.kind, kind, "input: {s}");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        check("2+3*4", bin(B::Add, int(2), bin(B::Mul, int(3), int(4))));
    }

    #[test]
    fn addition_is_left_associative() {
        check("10-2-3", bin(B::Sub, bin(B::Sub, int(10), int(2)), int(3)));
    }

    #[test]
    fn exponentiation_is_right_associative() {
        check("2^3^2", bin(B::Pow, int(2), bin(B::Pow, int(3), int(2))));
    }

    #[test]
    fn negation_binds_tighter_than_exponentiation() {
        check(
            "-2^2",
            bin(B::Pow, Node::unary(U::Neg, int(2)), int(2)),
        );
    }

    #[test]
    fn arithmetic_binds_tighter_than_dice() {
        check("3d6", bin(B::Die, int(3), int(6)));
        check("3d6+2", bin(B::Die, int(3), bin(B::Add, int(6), int(2))));
        check(
            "(3d6)+2",
            bin(
                B::Add,
                Node::Group(Box::new(bin(B::Die, int(3), int(6)))),
                int(2),
            ),
        );
    }

    #[test]
    fn dice_operators_chain_left_to_right() {
        check(
            "2d4d6",
            bin(B::Die, bin(B::Die, int(2), int(4)), int(6)),
        );
        check("5dp10", bin(B::DicePool, int(5), int(10)));
        check("5g!10", bin(B::ExplodingPool, int(5), int(10)));
    }

    #[test]
    fn pool_transforms_chain_over_a_pool() {
        check(
            "[5,1,9]pc6ph2",
            bin(
                B::PoolKeepHigh,
                bin(B::PoolCap, Node::Pool(vec![5, 1, 9]), int(6)),
                int(2),
            ),
        );
    }

    #[test]
    fn degeneration_prefixes_wrap_pool_transforms() {
        check(
            "S[1,2]pa1",
            Node::unary(
                U::Sum,
                bin(B::PoolKeepAbove, Node::Pool(vec![1, 2]), int(1)),
            ),
        );
        check("N[3,4]", Node::unary(U::Count, Node::Pool(vec![3, 4])));
    }

    #[test]
    fn success_counting_applies_after_transforms() {
        check(
            "[4,6,2,6]ns5",
            bin(B::Successes, Node::Pool(vec![4, 6, 2, 6]), int(5)),
        );
        check(
            "5dp6nb4",
            bin(B::SuccessesBotch, bin(B::DicePool, int(5), int(6)), int(4)),
        );
    }

    #[test]
    fn comparisons_sit_above_arithmetic() {
        check(
            "1+1==2",
            bin(B::Equal, bin(B::Add, int(1), int(1)), int(2)),
        );
    }

    #[test]
    fn options_and_choice() {
        check(
            r#""a":"b":"c""#,
            bin(
                B::Options,
                bin(B::Options, text("a"), text("b")),
                text("c"),
            ),
        );
        check(
            r#"T?"yes":"no""#,
            bin(
                B::Choice,
                Node::Bool(true),
                bin(B::Options, text("yes"), text("no")),
            ),
        );
        check(
            r#"?"a":"b""#,
            Node::unary(U::PickOne, bin(B::Options, text("a"), text("b"))),
        );
    }

    #[test]
    fn mapping_takes_a_quoted_name() {
        check(
            r#"1d4m"faces""#,
            Node::Mapped(Box::new(bin(B::Die, int(1), int(4))), "faces".into()),
        );
        check_err(
            "1d4m faces",
            ParseErrorKind::LexError,
        );
        check_err(
            "1d4m",
            ParseErrorKind::UnexpectedEnd {
                expected: "a quoted map name",
            },
        );
    }

    #[test]
    fn qualifiers_attach_to_a_whole_roll() {
        check(
            "3+4 'str'",
            Node::Qualified(
                Box::new(bin(B::Add, int(3), int(4))),
                Qualifier::Str,
            ),
        );
    }

    #[test]
    fn rolls_split_on_semicolons() {
        let ast = Parser::new("1;2d6").parse().unwrap();
        assert_eq!(ast.rolls.len(), 2);
        assert_eq!(ast.rolls[0], int(1));
        assert_eq!(ast.rolls[1], bin(B::Die, int(2), int(6)));
    }

    #[test]
    fn map_literal_parses_as_an_atom() {
        let ast = Parser::new(r#"{"hits" = 1:"miss"}"#).parse().unwrap();
        assert!(matches!(ast.rolls[0], Node::Map(_)));
    }

    #[test]
    fn missing_operand_is_a_parse_error() {
        check_err("3d", ParseErrorKind::UnexpectedEnd { expected: "a value" });
        check_err("", ParseErrorKind::UnexpectedEnd { expected: "a value" });
    }

    #[test]
    fn unbalanced_group_is_a_parse_error() {
        check_err(
            "(1+2",
            ParseErrorKind::UnexpectedEnd {
                expected: "a closing parenthesis",
            },
        );
    }

    #[test]
    fn trailing_input_is_a_parse_error() {
        check_err(
            "1 2",
            ParseErrorKind::UnexpectedToken {
                expected: "an operator or end of input",
            },
        );
    }

    #[test]
    fn unrecognized_input_is_reported_with_its_slice() {
        let err = Parser::new("1 & 2").parse().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LexError);
        assert_eq!(err.slice, "&");
        assert_eq!(err.span, 2..3);
    }
}
