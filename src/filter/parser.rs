//! Recursive-descent parser for the SCIM filter grammar, built over the
//! token stream from [`super::lexer`].
//!
//! ```text
//! filter      := orExpr
//! orExpr      := andExpr ( "or" andExpr )*
//! andExpr     := term   ( "and" term )*
//! term        := "(" filter ")" | predicate
//! predicate   := attrPath ws op ( ws value )?
//! op          := "eq" | "co" | "sw" | "pr" | "gt" | "ge" | "lt" | "le"
//! attrPath    := [ schemaURI ":" ] attrName [ "." subAttrName ]
//! value       := quotedString | bareLiteral
//! ```

use super::ast::{AttributePath, CompareOp, Filter, FilterValue};
use super::lexer::{tokenize, Token, TokenKind};
use crate::error::{GatewayError, Result};

/// Parse a SCIM filter string into its AST.
pub fn parse(input: &str) -> Result<Filter> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.chars().count(),
    };
    let filter = parser.parse_or()?;
    if let Some(tok) = parser.peek() {
        return Err(GatewayError::invalid_filter(
            tok.position,
            format!("unexpected trailing token after filter: {:?}", tok.kind),
        ));
    }
    Ok(filter)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eof_position(&self) -> usize {
        self.tokens.last().map(|t| t.position + 1).unwrap_or(self.input_len)
    }

    fn word_keyword_matches(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Word(w), .. }) if w.eq_ignore_ascii_case(keyword))
    }

    fn parse_or(&mut self) -> Result<Filter> {
        let mut children = vec![self.parse_and()?];
        while self.word_keyword_matches("or") {
            self.advance();
            children.push(self.parse_and()?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Filter::Or(children)
        })
    }

    fn parse_and(&mut self) -> Result<Filter> {
        let mut children = vec![self.parse_term()?];
        while self.word_keyword_matches("and") {
            self.advance();
            children.push(self.parse_term()?);
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Filter::And(children)
        })
    }

    fn parse_term(&mut self) -> Result<Filter> {
        if matches!(self.peek(), Some(Token { kind: TokenKind::LParen, .. })) {
            self.advance();
            let inner = self.parse_or()?;
            match self.advance() {
                Some(Token { kind: TokenKind::RParen, .. }) => Ok(inner),
                Some(tok) => Err(GatewayError::invalid_filter(
                    tok.position,
                    "expected ')'".to_string(),
                )),
                None => Err(GatewayError::invalid_filter(self.eof_position(), "expected ')'")),
            }
        } else {
            self.parse_predicate()
        }
    }

    fn parse_predicate(&mut self) -> Result<Filter> {
        let path_tok = self.advance().ok_or_else(|| {
            GatewayError::invalid_filter(self.eof_position(), "expected attribute path")
        })?;
        let path_word = match &path_tok.kind {
            TokenKind::Word(w) => w.clone(),
            other => {
                return Err(GatewayError::invalid_filter(
                    path_tok.position,
                    format!("expected attribute path, found {other:?}"),
                ))
            }
        };
        let attr = parse_attr_path(&path_word);

        let op_tok = self.advance().ok_or_else(|| {
            GatewayError::invalid_filter(self.eof_position(), "expected comparison operator")
        })?;
        let op_word = match &op_tok.kind {
            TokenKind::Word(w) => w.clone(),
            other => {
                return Err(GatewayError::invalid_filter(
                    op_tok.position,
                    format!("expected comparison operator, found {other:?}"),
                ))
            }
        };
        let op = CompareOp::parse_keyword(&op_word).ok_or_else(|| {
            GatewayError::invalid_filter(op_tok.position, format!("unknown operator '{op_word}'"))
        })?;

        if op == CompareOp::Pr {
            return Ok(Filter::Compare { op, attr, value: None });
        }

        let value_tok = self.advance().ok_or_else(|| {
            GatewayError::invalid_filter(self.eof_position(), "expected filter value")
        })?;
        let value = match &value_tok.kind {
            TokenKind::QuotedString(s) => FilterValue::Str(s.clone()),
            TokenKind::Word(w) => parse_bare_literal(w, value_tok.position)?,
            other => {
                return Err(GatewayError::invalid_filter(
                    value_tok.position,
                    format!("expected filter value, found {other:?}"),
                ))
            }
        };

        Ok(Filter::Compare { op, attr, value: Some(value) })
    }
}

fn parse_attr_path(word: &str) -> AttributePath {
    let (schema_uri, rest) = match word.rfind(':') {
        Some(idx) => (Some(word[..idx].to_string()), &word[idx + 1..]),
        None => (None, word),
    };
    let (attr_name, sub_attr_name) = match rest.find('.') {
        Some(idx) => (rest[..idx].to_string(), Some(rest[idx + 1..].to_string())),
        None => (rest.to_string(), None),
    };
    AttributePath {
        schema_uri,
        attr_name,
        sub_attr_name,
    }
}

fn parse_bare_literal(word: &str, position: usize) -> Result<FilterValue> {
    if word.eq_ignore_ascii_case("true") {
        return Ok(FilterValue::Bool(true));
    }
    if word.eq_ignore_ascii_case("false") {
        return Ok(FilterValue::Bool(false));
    }
    word.parse::<i64>().map(FilterValue::Int).map_err(|_| {
        GatewayError::invalid_filter(
            position,
            format!("bare literal '{word}' is not true, false, or an integer"),
        )
    })
}
