use pest::{Parser, Position, error::ErrorVariant, iterators::Pair};
use pest_derive::Parser;

use crate::ast::{Location, Token, TokenKind};
use crate::error::Result;

#[derive(Parser)]
#[grammar = "src/prototype.pest"]
pub struct PrototypeTokenizer;

impl PrototypeTokenizer {
    /// Scan prototype source into a flat token list.
    ///
    /// Whitespace (newlines included) separates tokens and is never emitted.
    /// Characters that are not brackets, separators, pointers or part of an
    /// identifier come out as single [`TokenKind::Char`] tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
        let mut pairs = PrototypeTokenizer::parse(Rule::file, source).map_err(Box::new)?;
        let file = pairs.next().ok_or_else(|| {
            Box::new(pest::error::Error::<Rule>::new_from_pos(
                ErrorVariant::CustomError {
                    message: "parser returned no file rule".to_string(),
                },
                Position::from_start(source),
            ))
        })?;

        let tokens: Vec<Token> = file.into_inner().filter_map(Self::token).collect();
        log::debug!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
        Ok(tokens)
    }

    fn token(pair: Pair<'_, Rule>) -> Option<Token<'_>> {
        let kind = match pair.as_rule() {
            Rule::brace_begin => TokenKind::BraceBegin,
            Rule::brace_end => TokenKind::BraceEnd,
            Rule::arg_separator => TokenKind::ArgSeparator,
            Rule::pointer => TokenKind::Pointer,
            Rule::ident => TokenKind::Ident,
            Rule::symbol => TokenKind::Char,
            _ => return None,
        };
        let (line, column) = pair.as_span().start_pos().line_col();
        Some(Token::new(kind, pair.as_str(), Location::new(line, column)))
    }
}

/// Shorthand for [`PrototypeTokenizer::tokenize`]
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
    PrototypeTokenizer::tokenize(source)
}
