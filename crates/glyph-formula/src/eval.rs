//! Sandboxed arithmetic evaluation.
//!
//! Formula fragments originate from user-entered sheet content, so this
//! is deliberately not a general-purpose expression engine: the grammar
//! is `+ - * / ( )` over decimal literals, with unary minus, and
//! nothing else. Any other character is a lex error.

use logos::Logos;

use crate::error::{FormulaError, FormulaResult};

/// Token type for the arithmetic grammar.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Evaluate an arithmetic expression to a floating-point result.
///
/// Division by zero follows IEEE semantics and yields an infinity
/// rather than an error; callers treating the result as a damage bound
/// may clamp as they see fit.
pub fn evaluate(expression: &str) -> FormulaResult<f64> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(expression).spanned() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(FormulaError::UnexpectedCharacter(span.start)),
        }
    }
    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let value = parser.expression()?;
    match parser.peek() {
        None => Ok(value),
        Some(extra) => Err(FormulaError::UnexpectedToken(extra.to_string())),
    }
}

/// Recursive-descent parser over the lexed token stream.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expression := term (('+' | '-') term)*
    fn expression(&mut self) -> FormulaResult<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> FormulaResult<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// factor := '-' factor | number | '(' expression ')'
    fn factor(&mut self) -> FormulaResult<f64> {
        match self.advance() {
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(FormulaError::UnexpectedToken(other.to_string())),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(other) => Err(FormulaError::UnexpectedToken(other.to_string())),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}
