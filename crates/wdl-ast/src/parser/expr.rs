//! The expression grammar: assignment down through primary, plus the
//! ternary `if … then … else …` form (which lives at unary precedence,
//! sharing the `IfStmt` node shape with the parenthesized-condition
//! statement form parsed in `mod.rs`).

use wdl_core::DiagnosticKind;
use wdl_grammar::TokenKind;

use crate::node::AstNode;
use crate::node::NodePayload;

use super::Parser;

impl Parser {
    /// `expr := assign_expr`
    pub(super) fn parse_expr(&mut self) -> AstNode {
        self.parse_assign_expr()
    }

    /// `assign_expr := logor_expr ("=" assign_expr)?` (right-associative)
    fn parse_assign_expr(&mut self) -> AstNode {
        let node = self.parse_logor_expr();
        if self.match_kind(TokenKind::Assign) {
            let location = node.location;
            let right = Box::new(self.parse_assign_expr());
            return AstNode::new(
                location,
                NodePayload::AssignExpr {
                    left: Box::new(node),
                    right,
                },
            );
        }
        node
    }

    /// `logor_expr := logand_expr (("||" | "or") logand_expr)*`
    fn parse_logor_expr(&mut self) -> AstNode {
        let mut node = self.parse_logand_expr();
        while self.check(TokenKind::Or) || self.check(TokenKind::LogicalOr) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_logand_expr());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `logand_expr := equality_expr (("&&" | "and") equality_expr)*`
    fn parse_logand_expr(&mut self) -> AstNode {
        let mut node = self.parse_equality_expr();
        while self.check(TokenKind::And) || self.check(TokenKind::LogicalAnd) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_equality_expr());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `equality_expr := comparison_expr (("==" | "!=") comparison_expr)*`
    fn parse_equality_expr(&mut self) -> AstNode {
        let mut node = self.parse_comparison_expr();
        while self.check(TokenKind::Equality) || self.check(TokenKind::Neq) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_comparison_expr());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `comparison_expr := term_expr (("<" | "<=" | ">" | ">=") term_expr)*`
    fn parse_comparison_expr(&mut self) -> AstNode {
        let mut node = self.parse_term_expr();
        while matches!(
            self.current.kind,
            TokenKind::LessThan | TokenKind::LessOrEqual | TokenKind::GreaterThan | TokenKind::GreaterOrEqual
        ) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_term_expr());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `term_expr := factor_expr (("+" | "-") factor_expr)*`
    fn parse_term_expr(&mut self) -> AstNode {
        let mut node = self.parse_factor_expr();
        while self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_factor_expr());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `factor_expr := unary_expr (("*" | "/") unary_expr)*`
    fn parse_factor_expr(&mut self) -> AstNode {
        let mut node = self.parse_unary();
        while self.check(TokenKind::Star) || self.check(TokenKind::FSlash) {
            let op = self.advance();
            let location = node.location;
            let right = Box::new(self.parse_unary());
            node = AstNode::new(
                location,
                NodePayload::BinaryExpr {
                    left: Box::new(node),
                    op,
                    right,
                },
            );
        }
        node
    }

    /// `unary_expr := ("-" | "!" | "not") unary_expr | ternary_if | primary_expr`
    fn parse_unary(&mut self) -> AstNode {
        if self.check(TokenKind::Minus) || self.check(TokenKind::Not) || self.check(TokenKind::LogicalNot) {
            let op = self.advance();
            let location = op.location;
            let operand = Box::new(self.parse_unary());
            return AstNode::new(location, NodePayload::UnaryExpr { op, operand });
        }
        if self.check(TokenKind::If) {
            self.advance();
            return self.parse_ternary_if();
        }
        self.parse_primary()
    }

    /// `"if" already consumed. expr "then" expr ("else" expr)?`
    ///
    /// Unlike the parenthesized-condition statement form, the ternary's
    /// branches are expressions, not statements — this is what lets
    /// `if a then 1 + 2 else 3` nest directly inside a variable initializer.
    fn parse_ternary_if(&mut self) -> AstNode {
        let location = self.previous.location;
        let condition = Box::new(self.parse_expr());
        self.expect(TokenKind::Then, "Expect 'then' after if condition.");
        let then_branch = Box::new(self.parse_expr());
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };
        AstNode::new(
            location,
            NodePayload::IfStmt {
                condition,
                then_branch,
                else_branch,
            },
        )
    }

    /// `primary_expr := literal | member_access | func_call | ident | array
    ///    | map | pair | "(" expr ")"`
    fn parse_primary(&mut self) -> AstNode {
        let location = self.current.location;

        if matches!(
            self.current.kind,
            TokenKind::NumberLiteral | TokenKind::StringLiteral | TokenKind::BooleanLiteral
        ) {
            let token = self.advance();
            return AstNode::new(location, NodePayload::Literal { token });
        }

        if self.check(TokenKind::Ident) && self.peek_is(TokenKind::Dot) {
            let object_token = self.advance();
            let object = Box::new(AstNode::new(location, NodePayload::Ident { token: object_token }));
            self.expect(TokenKind::Dot, "Expect '.' after object identifier.");
            // The member may itself be a func call or another member access,
            // enabling chains like `a.b.c()`.
            let member = Box::new(self.parse_expr());
            return AstNode::new(location, NodePayload::MemberAccess { object, member });
        }

        if self.check(TokenKind::Ident) {
            let name = self.advance();
            if !self.match_kind(TokenKind::LParen) {
                return AstNode::new(location, NodePayload::Ident { token: name });
            }
            let callee = Box::new(AstNode::new(location, NodePayload::Ident { token: name }));
            return self.finish_func_call(location, callee);
        }

        if self.match_kind(TokenKind::LSquare) {
            return self.parse_array_expr(location);
        }

        if self.match_kind(TokenKind::LCurly) {
            return self.parse_map_expr(location);
        }

        if self.match_kind(TokenKind::LParen) {
            return self.parse_pair_expr(location);
        }

        self.diagnostic_here(DiagnosticKind::Expected("Expect expression.".to_string()));
        self.advance();
        AstNode::new(location, NodePayload::Literal { token: self.previous.clone() })
    }

    /// `"(" already consumed for the callee. arg_list? ")"`, with an
    /// optional leading `default=expr` argument.
    pub(super) fn finish_func_call(&mut self, location: wdl_core::SourceLocation, callee: Box<AstNode>) -> AstNode {
        let mut args = Vec::new();
        let mut default_arg = None;

        if !self.check(TokenKind::RParen) {
            loop {
                if args.len() >= self.limits.max_args {
                    self.diagnostic(wdl_core::Diagnostic::error(DiagnosticKind::TooMany {
                        what: "arguments",
                        max: self.limits.max_args,
                    }));
                }
                if self.check(TokenKind::Default) {
                    self.advance();
                    self.expect(TokenKind::Assign, "Expect '=' after default parameter.");
                    default_arg = Some(Box::new(self.parse_expr()));
                } else {
                    args.push(self.parse_expr());
                }
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expect a closing ')' after function arguments.");

        AstNode::new(
            location,
            NodePayload::FuncCall {
                callee,
                args,
                default_arg,
            },
        )
    }

    /// `"[" already consumed. (expr ("," expr)*)? "]"`
    fn parse_array_expr(&mut self, location: wdl_core::SourceLocation) -> AstNode {
        let mut elements = Vec::new();
        if !self.check(TokenKind::RSquare) {
            loop {
                if elements.len() >= self.limits.max_list_items {
                    self.diagnostic(wdl_core::Diagnostic::error(DiagnosticKind::TooMany {
                        what: "elements",
                        max: self.limits.max_list_items,
                    }));
                }
                elements.push(self.parse_expr());
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RSquare, "Expect a closing ']' after array elements.");
        AstNode::new(location, NodePayload::ArrayExpr { elements })
    }

    /// `"{" already consumed. (Endl* expr ":" expr ("," expr ":" expr)*)? Endl* "}"`
    fn parse_map_expr(&mut self, location: wdl_core::SourceLocation) -> AstNode {
        let mut entries = Vec::new();
        while self.match_kind(TokenKind::Endl) {}
        if !self.check(TokenKind::RCurly) {
            loop {
                while self.match_kind(TokenKind::Endl) {}
                if entries.len() >= self.limits.max_list_items {
                    self.diagnostic(wdl_core::Diagnostic::error(DiagnosticKind::TooMany {
                        what: "elements",
                        max: self.limits.max_list_items,
                    }));
                }
                let key = self.parse_expr();
                self.expect(TokenKind::Colon, "Expect ':' after map key.");
                let value = self.parse_expr();
                entries.push((key, value));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        while self.match_kind(TokenKind::Endl) {}
        self.expect(TokenKind::RCurly, "Expect a closing '}' after map elements.");
        AstNode::new(location, NodePayload::MapExpr { entries })
    }

    /// `"(" already consumed. expr "," expr ")"`
    fn parse_pair_expr(&mut self, location: wdl_core::SourceLocation) -> AstNode {
        while self.match_kind(TokenKind::Endl) {}
        let first = Box::new(self.parse_expr());
        self.expect(TokenKind::Comma, "Expect ',' between pair elements.");
        let second = Box::new(self.parse_expr());
        while self.match_kind(TokenKind::Endl) {}
        self.expect(TokenKind::RParen, "Expect a closing ')' after pair elements.");
        AstNode::new(location, NodePayload::PairExpr { first, second })
    }
}

#[cfg(test)]
mod tests {
    use wdl_grammar::Lexer;

    use super::*;

    fn parse_expr(source: &str) -> (AstNode, super::super::Parser) {
        let mut parser = super::super::Parser::new(Lexer::new(source));
        let node = parser.parse_expr();
        (node, parser)
    }

    #[test]
    fn it_gives_multiplication_higher_precedence_than_addition() {
        let (node, parser) = parse_expr("1 + 2 * 3");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::BinaryExpr { op, right, .. } => {
                assert_eq!(op.lexeme, "+");
                assert!(matches!(right.payload.as_ref(), NodePayload::BinaryExpr { .. }));
            }
            other => panic!("expected BinaryExpr, got {other:?}"),
        }
    }

    #[test]
    fn it_right_associates_assignment() {
        let (node, parser) = parse_expr("a = b = 1");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::AssignExpr { right, .. } => {
                assert!(matches!(right.payload.as_ref(), NodePayload::AssignExpr { .. }));
            }
            other => panic!("expected AssignExpr, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_the_ternary_if_form_with_expression_branches() {
        let (node, parser) = parse_expr("if a && b then 1 + 2 else 3");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::IfStmt { condition, then_branch, else_branch } => {
                assert!(matches!(condition.payload.as_ref(), NodePayload::BinaryExpr { .. }));
                assert!(matches!(then_branch.payload.as_ref(), NodePayload::BinaryExpr { .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("expected IfStmt, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_member_access_chain() {
        let (node, parser) = parse_expr("a.b.c");
        assert!(parser.is_healthy());
        assert!(matches!(node.payload.as_ref(), NodePayload::MemberAccess { .. }));
    }

    #[test]
    fn it_parses_a_function_call_with_a_default_argument() {
        let (node, parser) = parse_expr("select_first(default=1, x)");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::FuncCall { args, default_arg, .. } => {
                assert_eq!(args.len(), 1);
                assert!(default_arg.is_some());
            }
            other => panic!("expected FuncCall, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_array_literals() {
        let (node, parser) = parse_expr("[1, 2, 3]");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::ArrayExpr { elements } => assert_eq!(elements.len(), 3),
            other => panic!("expected ArrayExpr, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_map_literals() {
        let (node, parser) = parse_expr("{ \"a\": 1, \"b\": 2 }");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::MapExpr { entries } => assert_eq!(entries.len(), 2),
            other => panic!("expected MapExpr, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_pair_literals() {
        let (node, parser) = parse_expr("(1, 2)");
        assert!(parser.is_healthy());
        assert!(matches!(node.payload.as_ref(), NodePayload::PairExpr { .. }));
    }

    #[test]
    fn it_recognizes_unicode_logical_operators_as_synonyms() {
        let (node, parser) = parse_expr("a ∧ b");
        assert!(parser.is_healthy());
        match node.payload.as_ref() {
            NodePayload::BinaryExpr { op, .. } => assert_eq!(op.lexeme, "∧"),
            other => panic!("expected BinaryExpr, got {other:?}"),
        }
    }
}
