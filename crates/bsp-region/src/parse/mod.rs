//! Reads the text produced by [`BspTree::dump`] back into a tree.
//!
//! Boxes are identified by their exact bits: identical boxes anywhere in the
//! input become a single element, numbered in order of first appearance.
//! `-0.0` and `0.0` are different coordinates here.

use geometry::{Aabb, InvalidGeometry, OrderedAabb};
use indexmap::IndexSet;
use thiserror::Error;
use tracing::instrument;

use crate::{
    BspTree, MAX_TREE_DEPTH,
    node::{ElementId, Node, Split, SplitType},
};

mod lexer;

use lexer::{Lexer, Spanned, Token};

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometry),
    #[error("invalid split interval [{min}, {max}]")]
    InvalidSplit { min: f32, max: f32 },
    #[error("nodes nested deeper than {limit}")]
    TooDeep { limit: usize },
    #[error("more distinct boxes than element ids")]
    TooManyElements,
    #[error("trailing input after the root node")]
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the input.
    pub offset: usize,
    pub kind: ParseErrorKind,
}

/// Parses a tree dump. The result has no [`BuildReport`](crate::BuildReport).
#[instrument(skip_all, fields(input_len = input.len()))]
pub fn parse_tree(input: &str) -> Result<BspTree, ParseError> {
    let mut parser = Parser {
        lexer: Lexer::new(input),
        peeked: None,
        elements: IndexSet::new(),
    };

    let root = parser.node(0)?;

    if let Some(extra) = parser.advance()? {
        return Err(ParseError {
            offset: extra.offset,
            kind: ParseErrorKind::TrailingInput,
        });
    }

    let elements = parser.elements.into_iter().map(Aabb::from).collect();
    Ok(BspTree::from_parts(root, elements, None))
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanned<'a>>,
    elements: IndexSet<OrderedAabb>,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Result<Option<Spanned<'a>>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked)
    }

    fn advance(&mut self) -> Result<Option<Spanned<'a>>, ParseError> {
        match self.peeked.take() {
            Some(spanned) => Ok(Some(spanned)),
            None => self.lexer.next_token(),
        }
    }

    /// The next token, which must exist.
    fn require(&mut self, expected: &'static str) -> Result<Spanned<'a>, ParseError> {
        self.advance()?.ok_or_else(|| ParseError {
            offset: self.lexer.end(),
            kind: ParseErrorKind::UnexpectedEof { expected },
        })
    }

    fn unexpected(expected: &'static str, found: Spanned<'_>) -> ParseError {
        ParseError {
            offset: found.offset,
            kind: ParseErrorKind::UnexpectedToken {
                expected,
                found: found.token.to_string(),
            },
        }
    }

    fn punct(&mut self, punct: char, expected: &'static str) -> Result<(), ParseError> {
        let spanned = self.require(expected)?;
        match spanned.token {
            Token::Punct(c) if c == punct => Ok(()),
            _ => Err(Self::unexpected(expected, spanned)),
        }
    }

    fn keyword(&mut self, keyword: &'static str) -> Result<Spanned<'a>, ParseError> {
        let spanned = self.require(keyword)?;
        match spanned.token {
            Token::Ident(ident) if ident == keyword => Ok(spanned),
            _ => Err(Self::unexpected(keyword, spanned)),
        }
    }

    /// `name ":"`
    fn field(&mut self, name: &'static str) -> Result<(), ParseError> {
        self.keyword(name)?;
        self.punct(':', "`:`")
    }

    fn number(&mut self) -> Result<f32, ParseError> {
        let spanned = self.require("number")?;

        // `inf` and `NaN` lex as identifiers
        let (Token::Number(text) | Token::Ident(text)) = spanned.token else {
            return Err(Self::unexpected("number", spanned));
        };

        text.parse().map_err(|_| ParseError {
            offset: spanned.offset,
            kind: ParseErrorKind::InvalidNumber(text.to_owned()),
        })
    }

    /// `node := "Node" "(" split "," node "," node ")" | "Leaf" "(" "[" aabbs "]" ")"`
    fn node(&mut self, depth: usize) -> Result<Node, ParseError> {
        let spanned = self.require("`Node` or `Leaf`")?;

        match spanned.token {
            Token::Ident("Node") => {
                if depth >= MAX_TREE_DEPTH {
                    return Err(ParseError {
                        offset: spanned.offset,
                        kind: ParseErrorKind::TooDeep {
                            limit: MAX_TREE_DEPTH,
                        },
                    });
                }

                self.punct('(', "`(`")?;
                let split = self.split()?;
                self.punct(',', "`,`")?;
                let left = self.node(depth + 1)?;
                self.punct(',', "`,`")?;
                let right = self.node(depth + 1)?;
                self.punct(')', "`)`")?;

                Ok(Node::Split(split, Box::new(left), Box::new(right)))
            }
            Token::Ident("Leaf") => {
                self.punct('(', "`(`")?;
                let ids = self.leaf_contents()?;
                self.punct(')', "`)`")?;

                Ok(Node::Leaf(ids))
            }
            _ => Err(Self::unexpected("`Node` or `Leaf`", spanned)),
        }
    }

    /// `"[" [ aabb { "," aabb } ] "]"`
    fn leaf_contents(&mut self) -> Result<Vec<ElementId>, ParseError> {
        self.punct('[', "`[`")?;

        let mut ids = Vec::new();

        if matches!(self.peek()?, Some(Spanned { token: Token::Punct(']'), .. })) {
            self.advance()?;
            return Ok(ids);
        }

        loop {
            let offset = self
                .peek()?
                .map_or_else(|| self.lexer.end(), |spanned| spanned.offset);
            let aabb = self.aabb()?;

            let (index, _) = self.elements.insert_full(aabb.into());
            let id = u32::try_from(index).map_err(|_| ParseError {
                offset,
                kind: ParseErrorKind::TooManyElements,
            })?;
            ids.push(ElementId(id));

            let spanned = self.require("`,` or `]`")?;
            match spanned.token {
                Token::Punct(',') => {}
                Token::Punct(']') => return Ok(ids),
                _ => return Err(Self::unexpected("`,` or `]`", spanned)),
            }
        }
    }

    /// `"Split" "{" "split_type" ":" type "," "min" ":" num "," "max" ":" num "}"`
    fn split(&mut self) -> Result<Split, ParseError> {
        let start = self.keyword("Split")?.offset;
        self.punct('{', "`{`")?;

        self.field("split_type")?;
        let spanned = self.require("split type")?;
        let split_type = match spanned.token {
            Token::Ident("Vertical") => SplitType::Vertical,
            Token::Ident("Horizontal") => SplitType::Horizontal,
            _ => return Err(Self::unexpected("`Vertical` or `Horizontal`", spanned)),
        };
        self.punct(',', "`,`")?;

        self.field("min")?;
        let min = self.number()?;
        self.punct(',', "`,`")?;

        self.field("max")?;
        let max = self.number()?;
        self.punct('}', "`}`")?;

        let valid = min.is_finite() && max.is_finite() && min <= max;
        if !valid {
            return Err(ParseError {
                offset: start,
                kind: ParseErrorKind::InvalidSplit { min, max },
            });
        }

        Ok(Split {
            split_type,
            min,
            max,
        })
    }

    /// `"Aabb" "{" "mins" ":" vec2 "," "maxs" ":" vec2 "}"`
    fn aabb(&mut self) -> Result<Aabb, ParseError> {
        let start = self.keyword("Aabb")?.offset;
        self.punct('{', "`{`")?;

        self.field("mins")?;
        let mins = self.vec2()?;
        self.punct(',', "`,`")?;

        self.field("maxs")?;
        let maxs = self.vec2()?;
        self.punct('}', "`}`")?;

        Aabb::new(mins, maxs).map_err(|err| ParseError {
            offset: start,
            kind: err.into(),
        })
    }

    /// `"[" num "," num "]"`
    fn vec2(&mut self) -> Result<[f32; 2], ParseError> {
        self.punct('[', "`[`")?;
        let x = self.number()?;
        self.punct(',', "`,`")?;
        let y = self.number()?;
        self.punct(']', "`]`")?;

        Ok([x, y])
    }
}
