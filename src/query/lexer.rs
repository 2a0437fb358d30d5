use std::{fmt, iter::Peekable, str::CharIndices};

use crate::query::errors::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // identifiers & keywords
    Ident(String),

    // literals
    Number(String),
    String(String),

    // punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    // operators
    Eq,
    Lt,
    Le,
    Gt,
    Ge,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "'{s}'"),
            Token::Number(s) => write!(f, "number {s}"),
            Token::String(s) => write!(f, "string '{s}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Eq => f.write_str("'='"),
            Token::Lt => f.write_str("'<'"),
            Token::Le => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Ge => f.write_str("'>='"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Whole input, terminated by a single `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut out = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            out.push(spanned);
            if done {
                return Ok(out);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Spanned, ParseError> {
        self.skip_whitespace();

        let (position, c) = match self.chars.next() {
            Some(next) => next,
            None => {
                return Ok(Spanned {
                    token: Token::Eof,
                    position: self.input.len(),
                });
            }
        };

        let token = match c {
            // ---------- punctuation ----------
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,

            // ---------- operators ----------
            '=' => {
                self.consume('=');
                Token::Eq
            }
            '<' => {
                if self.consume('=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.consume('=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }

            // ---------- string literal ----------
            '\'' | '"' => {
                let mut s = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, ch)) if ch == c => break,
                        Some((_, ch)) => s.push(ch),
                        None => return Err(ParseError::UnterminatedString { position }),
                    }
                }
                Token::String(s)
            }

            // ---------- number ----------
            c if c.is_ascii_digit() || (c == '-' && self.peek_is(|n| n.is_ascii_digit())) => {
                let mut num = c.to_string();
                while let Some(ch) = self.next_if(|ch| ch.is_ascii_digit() || ch == '.') {
                    num.push(ch);
                }
                Token::Number(num)
            }

            // ---------- identifier ----------
            c if is_ident_start(c) => {
                let mut ident = c.to_string();
                while let Some(ch) = self.next_if(is_ident_continue) {
                    ident.push(ch);
                }
                Token::Ident(ident)
            }

            ch => return Err(ParseError::UnexpectedChar { ch, position }),
        };

        Ok(Spanned { token, position })
    }

    fn consume(&mut self, expected: char) -> bool {
        self.next_if(|c| c == expected).is_some()
    }

    fn next_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        self.chars.next_if(|&(_, c)| pred(c)).map(|(_, c)| c)
    }

    fn peek_is(&mut self, pred: impl Fn(char) -> bool) -> bool {
        self.chars.peek().is_some_and(|&(_, c)| pred(c))
    }

    fn skip_whitespace(&mut self) {
        while self.next_if(char::is_whitespace).is_some() {}
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
