//! Restricted arithmetic over a single placeholder `x`.
//!
//! Accepted tokens: decimal literals, `x`, `+ - * / ^`, parentheses and
//! whitespace. Anything else is rejected at parse time.

use core::fmt;

use thiserror::Error;

use crate::{Series, TransformError};

const MAX_LEN: usize = 256;
const MAX_DEPTH: usize = 32;

/// Why a formula was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Character outside the whitelist.
    #[error("unsupported character '{ch}' at {pos}")]
    UnexpectedChar {
        /// Offending character.
        ch: char,
        /// Byte offset.
        pos: usize,
    },
    /// Identifier other than the placeholder.
    #[error("unknown identifier '{0}'")]
    UnknownIdent(String),
    /// Number that does not parse.
    #[error("invalid number '{0}'")]
    BadNumber(String),
    /// Input ended mid-expression.
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    /// Token in a position where it is not allowed.
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    /// Formula is empty.
    #[error("empty formula")]
    Empty,
    /// Formula exceeds length or nesting limits.
    #[error("formula too complex")]
    TooComplex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    X,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::X => f.write_str("x"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Caret => f.write_str("^"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut out = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut lit = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        lit.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: f64 = lit.parse().map_err(|_| ParseError::BadNumber(lit.clone()))?;
                out.push(Token::Num(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if ident == "x" || ident == "X" {
                    out.push(Token::X);
                } else {
                    return Err(ParseError::UnknownIdent(ident));
                }
            }
            _ => {
                let tok = match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => return Err(ParseError::UnexpectedChar { ch, pos }),
                };
                out.push(tok);
                chars.next();
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    X,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::X => x,
            Self::Neg(e) => -e.eval(x),
            Self::Add(a, b) => a.eval(x) + b.eval(x),
            Self::Sub(a, b) => a.eval(x) - b.eval(x),
            Self::Mul(a, b) => a.eval(x) * b.eval(x),
            Self::Div(a, b) => a.eval(x) / b.eval(x),
            Self::Pow(a, b) => a.eval(x).powf(b.eval(x)),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.peek();
        self.pos += 1;
        t
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooComplex);
        }
        Ok(())
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        while let Some(t @ (Token::Plus | Token::Minus)) = self.peek() {
            self.bump();
            let rhs = self.term()?;
            lhs = if t == Token::Plus {
                Expr::Add(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Sub(Box::new(lhs), Box::new(rhs))
            };
        }
        Ok(lhs)
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while let Some(t @ (Token::Star | Token::Slash)) = self.peek() {
            self.bump();
            let rhs = self.unary()?;
            lhs = if t == Token::Star {
                Expr::Mul(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Div(Box::new(lhs), Box::new(rhs))
            };
        }
        Ok(lhs)
    }

    // unary := '-' unary | power
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(Token::Minus) {
            self.bump();
            self.enter()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.power()
    }

    // power := atom ('^' unary)?   (right-associative)
    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Caret) {
            self.bump();
            self.enter()?;
            let exp = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Pow(Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.bump() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::X) => Ok(Expr::X),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    Some(t) => Err(ParseError::UnexpectedToken(t.to_string())),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            Some(t) => Err(ParseError::UnexpectedToken(t.to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

/// A parsed formula, ready to evaluate point by point.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse `src`.
    ///
    /// # Errors
    /// Returns `TransformError::Formula` for anything outside the accepted grammar.
    pub fn parse(src: &str) -> Result<Self, TransformError> {
        Self::parse_inner(src).map_err(|e| TransformError::Formula {
            formula: src.to_string(),
            reason: e.to_string(),
        })
    }

    fn parse_inner(src: &str) -> Result<Self, ParseError> {
        if src.len() > MAX_LEN {
            return Err(ParseError::TooComplex);
        }
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut p = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = p.expr()?;
        if let Some(t) = p.peek() {
            return Err(ParseError::UnexpectedToken(t.to_string()));
        }
        Ok(Self {
            source: src.to_string(),
            expr,
        })
    }

    /// Formula text as supplied.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with the placeholder bound to `x`. Non-finite results are `None`.
    #[must_use]
    pub fn eval(&self, x: f64) -> Option<f64> {
        Some(self.expr.eval(x)).filter(|v| v.is_finite())
    }

    /// Evaluate at every present point; absent points stay absent.
    #[must_use]
    pub fn apply(&self, series: &Series) -> Series {
        series.with_values(series.values().map(|v| v.and_then(|x| self.eval(x))))
    }
}
