use std::fmt;

use super::{ParseError, ParseErrorKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Ident(&'a str),
    Number(&'a str),
    Punct(char),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(ident) => write!(f, "`{ident}`"),
            Self::Number(number) => write!(f, "number `{number}`"),
            Self::Punct(punct) => write!(f, "`{punct}`"),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

#[derive(Debug)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

const fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ',' | ':')
}

impl<'a> Lexer<'a> {
    pub const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub const fn end(&self) -> usize {
        self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Consumes chars while `accept(previous, current)` holds.
    fn take_while(&mut self, mut accept: impl FnMut(Option<char>, char) -> bool) -> &'a str {
        let start = self.pos;
        let mut previous = None;

        for c in self.rest().chars() {
            if !accept(previous, c) {
                break;
            }
            self.pos += c.len_utf8();
            previous = Some(c);
        }

        &self.src[start..self.pos]
    }

    /// `Ok(None)` at the end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned<'a>>, ParseError> {
        self.take_while(|_, c| c.is_whitespace());

        let offset = self.pos;
        let Some(c) = self.rest().chars().next() else {
            return Ok(None);
        };

        let token = if is_punct(c) {
            self.pos += c.len_utf8();
            Token::Punct(c)
        } else if c.is_alphabetic() || c == '_' {
            Token::Ident(self.take_while(|_, c| c.is_alphanumeric() || c == '_'))
        } else if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') {
            Token::Number(self.take_while(|previous, c| {
                let sign = matches!(c, '-' | '+') && matches!(previous, None | Some('e' | 'E'));
                sign || c.is_alphanumeric() || c == '.'
            }))
        } else {
            return Err(ParseError {
                offset,
                kind: ParseErrorKind::UnexpectedChar(c),
            });
        };

        Ok(Some(Spanned { token, offset }))
    }
}
