//! Type-reference parsing: primitives, parametric containers, and the
//! nullable (`?`) and non-empty-array (`+`) suffixes.

use wdl_core::DiagnosticKind;
use wdl_grammar::Token;
use wdl_grammar::TokenKind;

use crate::node::AstNode;
use crate::node::NodePayload;

use super::Parser;

impl Parser {
    /// Parses a type reference, starting at `current` (a `Type` or `Ident`
    /// token — a bare `Ident` names a user-defined struct type).
    ///
    /// `array`, `map`, and `pair` (case-insensitive) consume a bracketed
    /// parameter list; every type may then be suffixed with `+` (non-empty
    /// array) and/or `?` (nullable). The resulting `TypeNode`'s lexeme is
    /// the fully composed spelling, e.g. `Array[String]+?`.
    pub(super) fn parse_type(&mut self) -> AstNode {
        let start_token = self.current.clone();
        self.advance();

        let mut lexeme = start_token.lexeme.clone();
        let lowered = lexeme.to_lowercase();

        match lowered.as_str() {
            "array" => {
                lexeme.push_str(&self.consume_lexeme(TokenKind::LSquare, "Expect '[' to begin array declaration."));
                lexeme.push_str(&self.parse_type_argument());
                lexeme.push_str(&self.consume_lexeme(TokenKind::RSquare, "Expect ']' to end array declaration."));
                if self.match_kind(TokenKind::Plus) {
                    lexeme.push_str(&self.previous.lexeme);
                }
            }
            "map" => {
                lexeme.push_str(&self.consume_lexeme(TokenKind::LSquare, "Expect '[' to begin map declaration."));
                lexeme.push_str(&self.parse_type_argument());
                lexeme.push_str(&self.consume_lexeme(TokenKind::Comma, "Expect ',' to separate key and value types in map declaration."));
                lexeme.push(' ');
                lexeme.push_str(&self.parse_type_argument());
                lexeme.push_str(&self.consume_lexeme(TokenKind::RSquare, "Expect ']' to end map declaration."));
            }
            "pair" => {
                lexeme.push_str(&self.consume_lexeme(TokenKind::LSquare, "Expect '[' to begin pair declaration."));
                lexeme.push_str(&self.parse_type_argument());
                lexeme.push_str(&self.consume_lexeme(TokenKind::Comma, "Expect ',' to separate left and right types in pair declaration."));
                lexeme.push(' ');
                lexeme.push_str(&self.parse_type_argument());
                lexeme.push_str(&self.consume_lexeme(TokenKind::RSquare, "Expect ']' to end pair declaration."));
            }
            _ => {}
        }

        let nullable = self.match_kind(TokenKind::Question);
        if nullable {
            lexeme.push('?');
        }

        let token = Token::new(TokenKind::Type, lexeme, start_token.location, start_token.span);
        AstNode::new(start_token.location, NodePayload::TypeNode { token, nullable })
    }

    /// A single `Type` or `Ident` (user-defined type) argument inside a
    /// parametric type's brackets.
    fn parse_type_argument(&mut self) -> String {
        if self.check(TokenKind::Type) || self.check(TokenKind::Ident) {
            let lexeme = self.current.lexeme.clone();
            self.advance();
            lexeme
        } else {
            self.diagnostic_expected("Expect a type inside parametric type brackets.")
        }
    }

    /// Consumes `kind` if present and returns its lexeme; otherwise records
    /// a diagnostic and returns an empty string, keeping the composed type
    /// spelling well-formed even after an error.
    fn consume_lexeme(&mut self, kind: TokenKind, message: &str) -> String {
        match self.expect(kind, message) {
            Some(tok) => tok.lexeme,
            None => String::new(),
        }
    }

    /// Records an `Expected` diagnostic at the current token and returns an
    /// empty placeholder, used where the surrounding code needs a `String`
    /// back even on failure.
    fn diagnostic_expected(&mut self, message: &str) -> String {
        self.diagnostic_here(DiagnosticKind::Expected(message.to_string()));
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use wdl_grammar::Lexer;

    use super::*;

    fn parse_type(source: &str) -> (AstNode, super::super::Parser) {
        let mut parser = super::super::Parser::new(Lexer::new(source));
        let node = parser.parse_type();
        (node, parser)
    }

    fn lexeme_of(node: &AstNode) -> String {
        match node.payload.as_ref() {
            NodePayload::TypeNode { token, .. } => token.lexeme.clone(),
            other => panic!("expected TypeNode, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_plain_primitive_type() {
        let (node, parser) = parse_type("String");
        assert_eq!(lexeme_of(&node), "String");
        assert!(parser.is_healthy());
    }

    #[test]
    fn it_parses_a_nullable_primitive_type() {
        let (node, _) = parse_type("Int?");
        match node.payload.as_ref() {
            NodePayload::TypeNode { nullable, .. } => assert!(nullable),
            other => panic!("expected TypeNode, got {other:?}"),
        }
    }

    #[test]
    fn it_composes_a_nonempty_nullable_array_type() {
        let (node, parser) = parse_type("Array[String]+?");
        assert_eq!(lexeme_of(&node), "Array[String]+?");
        assert!(parser.is_healthy());
    }

    #[test]
    fn it_composes_a_map_type() {
        let (node, parser) = parse_type("Map[String, File]");
        assert_eq!(lexeme_of(&node), "Map[String, File]");
        assert!(parser.is_healthy());
    }

    #[test]
    fn it_composes_a_pair_type() {
        let (node, parser) = parse_type("Pair[Int, Int]");
        assert_eq!(lexeme_of(&node), "Pair[Int, Int]");
        assert!(parser.is_healthy());
    }

    #[test]
    fn it_allows_a_user_defined_struct_name_as_a_type_argument() {
        let (node, parser) = parse_type("Array[Sample]");
        assert_eq!(lexeme_of(&node), "Array[Sample]");
        assert!(parser.is_healthy());
    }
}
