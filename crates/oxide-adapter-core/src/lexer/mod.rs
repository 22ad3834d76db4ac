//! Statement-level SQL lexer.
//!
//! Adapters do not parse SQL, but a few of their rewrites need to find clause
//! boundaries in a pre-rendered statement (the top-level `FROM` of a
//! `SELECT`, a trailing `ORDER BY`). This lexer produces just enough
//! structure for that: keywords, identifiers, literals and punctuation, each
//! with the byte span it covers. Literal contents, quoted identifiers and
//! comments never produce keywords, so text such as `'FROM'` or `[from]` is
//! not mistaken for a clause boundary.

mod token;
mod tokenizer;

pub use token::{Keyword, Span, Token, TokenKind};
pub use tokenizer::Lexer;

/// A token together with the parenthesis depth it appears at.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthToken {
    /// The token.
    pub token: Token,
    /// Number of unclosed `(` before this token.
    pub depth: usize,
}

/// Tokenizes `sql` and annotates every token with its nesting depth.
///
/// Unbalanced closing parentheses never drive the depth below zero.
#[must_use]
pub fn tokens_with_depth(sql: &str) -> Vec<DepthToken> {
    let mut depth = 0usize;
    Lexer::new(sql)
        .tokenize()
        .into_iter()
        .map(|token| {
            let current = match token.kind {
                TokenKind::LeftParen => {
                    depth += 1;
                    depth - 1
                }
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    depth
                }
                _ => depth,
            };
            DepthToken {
                token,
                depth: current,
            }
        })
        .collect()
}

/// Finds the first top-level occurrence of `keyword` at or after token
/// index `from`.
#[must_use]
pub fn find_top_level(tokens: &[DepthToken], keyword: Keyword, from: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| t.depth == 0 && t.token.is_keyword(keyword))
        .map(|(i, _)| i)
}
