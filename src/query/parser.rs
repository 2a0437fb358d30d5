use crate::{
    catalog::Catalog,
    common::{types::DataType, value::Value},
    query::{
        ast::{Operator, Predicate, QueryNode},
        errors::ParseError,
        lexer::{Spanned, Token, Tokenizer},
    },
};

/// Parses query text into a predicate tree, binding every literal to the
/// catalog type of the attribute it is compared with.
///
/// ```text
/// age RANGE [20, 35] AND NOT age = 30
/// (city = 'Pune' OR city = 'Agra') AND joined >= '2024-01-01'
/// ```
pub fn parse_query(input: &str, catalog: &Catalog) -> Result<QueryNode, ParseError> {
    let tokens = Tokenizer::new(input).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        catalog,
    };

    let node = parser.parse_or()?;
    parser.expect(Token::Eof, "end of input")?;
    Ok(node)
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    catalog: &'a Catalog,
}

impl Parser<'_> {
    fn parse_or(&mut self) -> Result<QueryNode, ParseError> {
        let mut node = self.parse_and()?;
        while self.keyword("OR") {
            let rhs = self.parse_and()?;
            node = QueryNode::or(node, rhs);
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<QueryNode, ParseError> {
        let mut node = self.parse_unary()?;
        while self.keyword("AND") {
            let rhs = self.parse_unary()?;
            node = QueryNode::and(node, rhs);
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<QueryNode, ParseError> {
        if self.keyword("NOT") {
            return Ok(QueryNode::not(self.parse_unary()?));
        }

        if self.peek().token == Token::LParen {
            self.advance();
            let inner = self.parse_or()?;
            self.expect(Token::RParen, "')'")?;
            return Ok(inner);
        }

        self.parse_predicate().map(QueryNode::Predicate)
    }

    fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        let Spanned { token, position } = self.advance();
        let attribute = match token {
            Token::Ident(name) => name,
            other => return Err(self.unexpected("attribute name", other, position)),
        };

        let data_type =
            self.catalog
                .data_type(&attribute)
                .ok_or_else(|| ParseError::UnknownAttribute {
                    attribute: attribute.clone(),
                    position,
                })?;

        let Spanned { token, position } = self.advance();
        let operator = match token {
            Token::Eq => Operator::Eq,
            Token::Lt => Operator::Lt,
            Token::Le => Operator::Le,
            Token::Gt => Operator::Gt,
            Token::Ge => Operator::Ge,
            Token::Ident(kw) if kw.eq_ignore_ascii_case("RANGE") => {
                return self.parse_range(attribute, data_type);
            }
            other => return Err(self.unexpected("comparison operator", other, position)),
        };

        let value = self.literal(data_type)?;
        Ok(Predicate::new(attribute, operator, value))
    }

    /// `low high` or `[low, high]`
    fn parse_range(&mut self, attribute: String, data_type: DataType) -> Result<Predicate, ParseError> {
        let bracketed = self.peek().token == Token::LBracket;
        if bracketed {
            self.advance();
        }

        let low = self.literal(data_type)?;
        if bracketed {
            self.expect(Token::Comma, "','")?;
        }
        let high = self.literal(data_type)?;
        if bracketed {
            self.expect(Token::RBracket, "']'")?;
        }

        Ok(Predicate::range(attribute, low, high))
    }

    fn literal(&mut self, data_type: DataType) -> Result<Value, ParseError> {
        let Spanned { token, position } = self.advance();
        let raw = match token {
            Token::Number(s) | Token::String(s) | Token::Ident(s) => s,
            other => return Err(self.unexpected("literal", other, position)),
        };

        Value::parse(data_type, &raw).map_err(|source| ParseError::InvalidLiteral { source, position })
    }

    fn keyword(&mut self, kw: &str) -> bool {
        let hit = matches!(&self.peek().token, Token::Ident(w) if w.eq_ignore_ascii_case(kw));
        if hit {
            self.advance();
        }
        hit
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        let Spanned { token, position } = self.advance();
        if token == expected {
            Ok(())
        } else {
            Err(self.unexpected(what, token, position))
        }
    }

    fn unexpected(&self, expected: &str, found: Token, position: usize) -> ParseError {
        match found {
            Token::Eof => ParseError::UnexpectedEof { position },
            found => ParseError::Expected {
                expected: expected.to_string(),
                found: found.to_string(),
                position,
            },
        }
    }

    fn peek(&self) -> &Spanned {
        &self.tokens[self.pos]
    }

    /// Never moves past the trailing `Eof`.
    fn advance(&mut self) -> Spanned {
        let spanned = self.tokens[self.pos].clone();
        if spanned.token != Token::Eof {
            self.pos += 1;
        }
        spanned
    }
}
