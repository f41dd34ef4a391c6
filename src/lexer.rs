//! Tokenizer for SNBT, the textual form of a tagged-value tree.

use std::fmt;

use thiserror::Error;

/// Character offset into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string starting at {0}")]
    UnterminatedString(Position),

    #[error("invalid escape sequence '\\{ch}' at {at}")]
    InvalidEscape { ch: char, at: Position },

    #[error("unexpected character '{ch}' at {at}")]
    UnexpectedChar { ch: char, at: Position },
}

/// Element kind prefix of a typed array, as in `[I; 1, 2, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Byte,
    Int,
    Long,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    /// `[B;`, `[I;` or `[L;`, consumed as one token
    ArrayStart(ArrayKind),
    Colon,
    Comma,
    /// Quoted string, escapes resolved
    Quoted(String),
    /// Unquoted run of `[A-Za-z0-9_\-.+]`; a key, a number or a bare string
    Word(String),
    Eof,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '+')
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn position(&self) -> Position {
        Position(self.position)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char().filter(|c| is_word_char(*c)) {
            result.push(ch);
            self.advance();
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position();
        let mut result = String::new();
        self.advance();

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(c @ ('"' | '\'' | '\\')) => result.push(c),
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                at: self.position(),
                            });
                        }
                        None => return Err(LexError::UnterminatedString(start)),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString(start))
    }

    /// `[` directly followed by `B;`, `I;` or `L;` (whitespace allowed before `;`).
    fn array_prefix(&self) -> Option<(ArrayKind, usize)> {
        let kind = match self.peek_char(1)? {
            'B' => ArrayKind::Byte,
            'I' => ArrayKind::Int,
            'L' => ArrayKind::Long,
            _ => return None,
        };
        let mut offset = 2;
        while self.peek_char(offset).is_some_and(char::is_whitespace) {
            offset += 1;
        }
        (self.peek_char(offset)? == ';').then_some((kind, offset + 1))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('{') => {
                self.advance();
                Token::LBrace
            }
            Some('}') => {
                self.advance();
                Token::RBrace
            }
            Some('[') => match self.array_prefix() {
                Some((kind, len)) => {
                    self.position += len;
                    Token::ArrayStart(kind)
                }
                None => {
                    self.advance();
                    Token::LBracket
                }
            },
            Some(']') => {
                self.advance();
                Token::RBracket
            }
            Some(':') => {
                self.advance();
                Token::Colon
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some(quote @ ('"' | '\'')) => Token::Quoted(self.read_string(quote)?),
            Some(ch) if is_word_char(ch) => Token::Word(self.read_word()),
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    at: self.position(),
                });
            }
        };
        Ok(token)
    }
}
