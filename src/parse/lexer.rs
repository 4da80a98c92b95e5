//! Tokenization. Three cooperating lexers: the top-level [`TokenKind`], plus
//! sub-lexers for the pool and dice-map literal grammars. A bracketed literal
//! is matched whole at the top level, its interior is lexed by the dedicated
//! sub-lexer, and the composite value re-enters the stream as a single token.

use crate::common::{Int, Pool, Qualifier};
use crate::maps::{DiceMap, DiceMapDef};
use logos::Logos;

pub(crate) type Lexer<'a> = logos_iter::PeekableLexer<'a, logos::Lexer<'a, TokenKind>, TokenKind>;

pub(crate) fn lexer(s: &str) -> Lexer {
    logos_iter::LogosIter::peekable_lexer(TokenKind::lexer(s))
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Integer(Int),
    #[token("T", |_| true)]
    #[token("F", |_| false)]
    Boolean(bool),
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()).to_owned())]
    Text(String),
    #[regex(r"'[^']*'", lex_qualifier)]
    Qualifier(Qualifier),
    #[regex(r"\[[^\[\]]*\]", lex_pool)]
    Pool(Pool),
    // Quoted runs may contain braces, so the literal ends at the first
    // unquoted closing brace.
    #[regex(r#"\{([^{}"]|"[^"]*")*\}"#, lex_map)]
    Map(DiceMapDef),

    #[token("(")]
    GroupOpen,
    #[token(")")]
    GroupClose,
    #[token(";")]
    RollDelim,

    #[token("^")]
    Caret,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[token("d")]
    Die,
    #[token("d!")]
    ExplodingDie,
    #[token("dc")]
    ConcatDie,
    #[token("dh")]
    KeepHighDie,
    #[token("dl")]
    KeepLowDie,
    #[token("dw")]
    WildDie,
    #[token("dp")]
    #[token("g")]
    DicePool,
    #[token("dp!")]
    #[token("g!")]
    ExplodingPool,

    #[token("pa")]
    PoolKeepAbove,
    #[token("pb")]
    PoolKeepBelow,
    #[token("pc")]
    PoolCap,
    #[token("pf")]
    PoolFloor,
    #[token("ph")]
    PoolKeepHigh,
    #[token("pl")]
    PoolKeepLow,
    #[token("pr")]
    PoolRemove,
    #[token("p%")]
    PoolModulo,

    #[token("C")]
    Concatenate,
    #[token("N")]
    Count,
    #[token("S")]
    Sum,

    #[token("ns")]
    Successes,
    #[token("nb")]
    SuccessesBotch,

    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,

    #[token("?")]
    Choice,
    #[token(":")]
    Options,
    #[token("m")]
    Mapping,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

fn unquote(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

fn lex_qualifier(lex: &mut logos::Lexer<TokenKind>) -> Option<Qualifier> {
    unquote(lex.slice()).trim().parse().ok()
}

fn lex_pool(lex: &mut logos::Lexer<TokenKind>) -> Option<Pool> {
    pool_members(unquote(lex.slice()))
}

fn lex_map(lex: &mut logos::Lexer<TokenKind>) -> Option<DiceMapDef> {
    map_def(unquote(lex.slice()))
}

/// Pool literal sub-grammar: `member (, member)*`, or nothing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum PoolToken {
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Member(Int),
    #[token(",")]
    Delim,
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

fn pool_members(src: &str) -> Option<Pool> {
    let mut members = Pool::new();
    let mut want_member = true;
    for token in PoolToken::lexer(src) {
        match token {
            PoolToken::Member(x) if want_member => {
                members.push(x);
                want_member = false;
            }
            PoolToken::Delim if !want_member => want_member = true,
            _ => return None,
        }
    }
    // A trailing delimiter leaves a dangling member slot.
    if want_member && !members.is_empty() {
        return None;
    }
    Some(members)
}

/// Map literal sub-grammar: `"name" = ordinal:"text" (, ordinal:"text")*`.
#[derive(Logos, Debug, Clone, PartialEq)]
enum MapToken {
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Ordinal(Int),
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()).to_owned())]
    Text(String),
    #[token("=")]
    NameDelim,
    #[token(":")]
    KvDelim,
    #[token(",")]
    PairDelim,
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

fn map_def(src: &str) -> Option<DiceMapDef> {
    let mut tokens = MapToken::lexer(src);
    let name = match tokens.next()? {
        MapToken::Text(name) => name,
        _ => return None,
    };
    if tokens.next()? != MapToken::NameDelim {
        return None;
    }

    let mut entries = DiceMap::new();
    loop {
        let ordinal = match tokens.next()? {
            MapToken::Ordinal(n) if n >= 1 => n,
            _ => return None,
        };
        if tokens.next()? != MapToken::KvDelim {
            return None;
        }
        let value = match tokens.next()? {
            MapToken::Text(value) => value,
            _ => return None,
        };
        if entries.insert(ordinal, value).is_some() {
            return None;
        }
        match tokens.next() {
            Some(MapToken::PairDelim) => continue,
            None => break,
            Some(_) => return None,
        }
    }
    Some(DiceMapDef { name, entries })
}
