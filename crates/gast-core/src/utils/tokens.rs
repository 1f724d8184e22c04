use crate::ast::{Any, Location, Token};
use crate::visit::Visitor;

#[derive(Default)]
struct TokenCollector {
    tokens: Vec<Token>,
}

impl Visitor for TokenCollector {
    fn visit_token(&mut self, tok: &Token) {
        self.tokens.push(tok.clone());
    }
}

/// Every token of a node, fake and abstract ones included, in traversal order.
pub fn all_tokens(any: &Any) -> Vec<Token> {
    let mut collector = TokenCollector::default();
    collector.visit_any(any);
    collector.tokens
}

/// The source tokens of a node, in source order.
///
/// Synthesized and abstracted tokens are skipped: they have no position.
pub fn extract_tokens(any: &Any) -> Vec<Token> {
    let mut tokens: Vec<Token> = all_tokens(any)
        .into_iter()
        .filter(Token::is_origin)
        .collect();
    tokens.sort_by_key(|tok| tok.charpos());
    tokens.dedup();
    tokens
}

/// Source text of [`extract_tokens`], one entry per token.
pub fn token_strings(any: &Any) -> Vec<String> {
    extract_tokens(any)
        .iter()
        .map(|tok| tok.str_of().to_string())
        .collect()
}

/// First and last source location covered by a node.
pub fn range_of_any(any: &Any) -> Option<(Location, Location)> {
    let tokens = extract_tokens(any);
    let first = tokens.first()?.location()?.clone();
    let last = tokens.last()?.location()?.clone();
    Some((first, last))
}
