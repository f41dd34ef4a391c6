//! SNBT parser.
//!
//! Grammar, informally:
//!
//! ```text
//! compound := '{' (key ':' value (',' key ':' value)*)? '}'
//! list     := '[' (value (',' value)*)? ']'
//! array    := '[' ('B' | 'I' | 'L') ';' (word (',' word)*)? ']'
//! value    := compound | list | array | quoted | word
//! key      := quoted | word
//! ```
//!
//! Bare words are numbers when they parse as one: suffixes `b s l f d` select
//! the width, an unsuffixed integer is an `int` and an unsuffixed decimal is a
//! `double`. `true` and `false` are bytes. Non-finite floats are written
//! `NaNf`, `inff`, `-infd` and so on. Anything else is a string.

use std::mem;

use thiserror::Error;

use crate::lexer::{ArrayKind, LexError, Lexer, Position, Token};
use crate::value::{Compound, Tag, TagKind};

/// Deepest nesting of compounds and lists accepted in one input.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found:?} near {at}")]
    Unexpected {
        expected: &'static str,
        found: Token,
        at: Position,
    },

    #[error("list mixes {first} and {other} elements near {at}")]
    MixedList {
        first: TagKind,
        other: TagKind,
        at: Position,
    },

    #[error("nesting deeper than {max} levels near {at}", max = MAX_DEPTH)]
    TooDeep { at: Position },

    #[error("invalid {kind} element '{literal}' near {at}")]
    InvalidArrayElement {
        kind: TagKind,
        literal: String,
        at: Position,
    },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    token_at: Position,
    depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let token_at = lexer.position();
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            token_at,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        self.token_at = self.lexer.position();
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: self.current_token.clone(),
            at: self.token_at,
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(what));
        }
        self.advance()?;
        Ok(())
    }

    /// Parses a complete input consisting of exactly one compound.
    pub fn parse_compound(&mut self) -> Result<Compound, ParseError> {
        if !self.check(&Token::LBrace) {
            return Err(self.unexpected("'{'"));
        }
        let compound = self.compound()?;
        self.expect(Token::Eof, "end of input")?;
        Ok(compound)
    }

    /// Parses a complete input consisting of exactly one value.
    pub fn parse_tag(&mut self) -> Result<Tag, ParseError> {
        let tag = self.value()?;
        self.expect(Token::Eof, "end of input")?;
        Ok(tag)
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth == MAX_DEPTH {
            return Err(ParseError::TooDeep { at: self.token_at });
        }
        self.depth += 1;
        Ok(())
    }

    fn value(&mut self) -> Result<Tag, ParseError> {
        match &self.current_token {
            Token::LBrace => Ok(Tag::Compound(self.compound()?)),
            Token::LBracket => self.list(),
            Token::ArrayStart(kind) => {
                let kind = *kind;
                self.array(kind)
            }
            Token::Quoted(_) | Token::Word(_) => match self.advance()? {
                Token::Quoted(s) => Ok(Tag::String(s)),
                Token::Word(w) => Ok(classify_word(&w)),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("a value")),
        }
    }

    fn compound(&mut self) -> Result<Compound, ParseError> {
        self.expect(Token::LBrace, "'{'")?;
        self.descend()?;
        let mut compound = Compound::new();

        while !self.check(&Token::RBrace) {
            let key = match &self.current_token {
                Token::Quoted(_) | Token::Word(_) => match self.advance()? {
                    Token::Quoted(k) | Token::Word(k) => k,
                    _ => unreachable!(),
                },
                _ => return Err(self.unexpected("a key")),
            };
            self.expect(Token::Colon, "':'")?;
            let value = self.value()?;
            compound.insert(key, value);

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma, "',' or '}'")?;
            }
        }

        self.expect(Token::RBrace, "'}'")?;
        self.depth -= 1;
        Ok(compound)
    }

    fn list(&mut self) -> Result<Tag, ParseError> {
        self.expect(Token::LBracket, "'['")?;
        self.descend()?;
        let mut items: Vec<Tag> = Vec::new();

        while !self.check(&Token::RBracket) {
            let at = self.token_at;
            let item = self.value()?;
            if let Some(first) = items.first()
                && first.kind() != item.kind()
            {
                return Err(ParseError::MixedList {
                    first: first.kind(),
                    other: item.kind(),
                    at,
                });
            }
            items.push(item);

            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma, "',' or ']'")?;
            }
        }

        self.expect(Token::RBracket, "']'")?;
        self.depth -= 1;
        Ok(Tag::List(items))
    }

    fn array(&mut self, kind: ArrayKind) -> Result<Tag, ParseError> {
        self.advance()?;
        let mut bytes = Vec::new();
        let mut ints = Vec::new();
        let mut longs = Vec::new();

        while !self.check(&Token::RBracket) {
            let at = self.token_at;
            let word = match &self.current_token {
                Token::Word(_) => match self.advance()? {
                    Token::Word(w) => w,
                    _ => unreachable!(),
                },
                _ => return Err(self.unexpected("a number")),
            };
            let element = classify_word(&word);
            let invalid = |kind| ParseError::InvalidArrayElement {
                kind,
                literal: word.clone(),
                at,
            };
            match (kind, element) {
                (ArrayKind::Byte, Tag::Byte(b)) => bytes.push(b),
                (ArrayKind::Byte, Tag::Int(i)) => {
                    bytes.push(i8::try_from(i).map_err(|_| invalid(TagKind::ByteArray))?)
                }
                (ArrayKind::Int, Tag::Int(i)) => ints.push(i),
                (ArrayKind::Long, Tag::Long(l)) => longs.push(l),
                (ArrayKind::Long, Tag::Int(i)) => longs.push(i64::from(i)),
                (ArrayKind::Byte, _) => return Err(invalid(TagKind::ByteArray)),
                (ArrayKind::Int, _) => return Err(invalid(TagKind::IntArray)),
                (ArrayKind::Long, _) => return Err(invalid(TagKind::LongArray)),
            }

            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma, "',' or ']'")?;
            }
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(match kind {
            ArrayKind::Byte => Tag::ByteArray(bytes),
            ArrayKind::Int => Tag::IntArray(ints),
            ArrayKind::Long => Tag::LongArray(longs),
        })
    }
}

fn looks_numeric(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Interprets a bare SNBT word as a number, boolean byte or string.
fn classify_word(word: &str) -> Tag {
    match word {
        "true" => return Tag::Byte(1),
        "false" => return Tag::Byte(0),
        _ => {}
    }
    let (body, suffix) = match word.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&word[..i], Some(c.to_ascii_lowercase())),
        _ => (word, None),
    };
    let non_finite = matches!((body, suffix), ("NaN" | "inf", Some('f' | 'd')));
    if !looks_numeric(word) && !non_finite {
        return Tag::String(word.to_string());
    }
    let parsed = match suffix {
        Some('b') => body.parse().ok().map(Tag::Byte),
        Some('s') => body.parse().ok().map(Tag::Short),
        Some('l') => body.parse().ok().map(Tag::Long),
        Some('f') => body.parse().ok().map(Tag::Float),
        Some('d') => body.parse().ok().map(Tag::Double),
        Some(_) => None,
        None => body.parse().ok().map(Tag::Int).or_else(|| {
            body.contains(['.', 'e', 'E'])
                .then(|| body.parse().ok().map(Tag::Double))
                .flatten()
        }),
    };
    parsed.unwrap_or_else(|| Tag::String(word.to_string()))
}

/// Parses SNBT text holding a single compound.
///
/// # Examples
///
/// ```
/// use nbt_query::parser::parse_compound;
///
/// let item = parse_compound("{Damage: 10, Count: 1b, Name: 'Sword'}").unwrap();
/// assert_eq!(item.get_int("Damage"), Some(10));
/// assert_eq!(item.get_byte("Count"), Some(1));
/// assert_eq!(item.get_string("Name"), Some("Sword"));
/// ```
pub fn parse_compound(text: &str) -> Result<Compound, ParseError> {
    Parser::new(Lexer::new(text))?.parse_compound()
}

/// Parses SNBT text holding a single value of any kind.
pub fn parse_tag(text: &str) -> Result<Tag, ParseError> {
    Parser::new(Lexer::new(text))?.parse_tag()
}
