//! Class/task/workflow member grammar: `call` constructs, `parameter_meta`/
//! `meta` blocks, `command <<< … >>>` blocks, and the `input`/`output`/
//! `runtime` subsections.

use std::sync::OnceLock;

use regex::Regex;
use wdl_core::Diagnostic;
use wdl_core::DiagnosticKind;
use wdl_grammar::Token;
use wdl_grammar::TokenKind;

use crate::node::AstNode;
use crate::node::NodePayload;

use super::Parser;

/// The `~{identifier}` interpolation pattern scanned out of a command body.
fn interpolation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"~\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("pattern is a fixed, valid regex"))
}

impl Parser {
    /// Parses the member sequence inside a class/task/workflow's `{ … }`,
    /// already positioned just past the opening `{`.
    pub(super) fn parse_class_members(&mut self) -> Vec<AstNode> {
        let mut members = Vec::new();

        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Endl) {
                continue;
            }

            if self.check(TokenKind::Call) {
                members.push(self.parse_call_decl());
                continue;
            }
            if self.check(TokenKind::Meta) {
                members.push(self.parse_meta_decl());
                continue;
            }
            if self.check(TokenKind::Command) {
                members.push(self.parse_command_decl());
                continue;
            }
            if self.check(TokenKind::Input) {
                self.advance();
                members.push(self.parse_input_decl());
                self.consume_terminators();
                continue;
            }
            if self.check(TokenKind::Output) {
                self.advance();
                members.push(self.parse_output_decl());
                self.consume_terminators();
                continue;
            }
            if self.check(TokenKind::Runtime) {
                self.advance();
                members.push(self.parse_runtime_decl());
                self.consume_terminators();
                continue;
            }

            if !self.check(TokenKind::Type) {
                self.diagnostic(Diagnostic::error(DiagnosticKind::Expected(
                    "Expected type keyword at start of class member.".to_string(),
                )));
                break;
            }

            members.push(self.parse_var_or_func_decl());
            self.consume_terminators();
        }
        self.expect(TokenKind::RCurly, "Expect '}' to close class body.");
        members
    }

    /// `"call" Ident ("." Ident)? ("as" Ident)? ("{" "input" ":" arg_list? "}")?`
    pub(super) fn parse_call_decl(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "call"

        let object_token = self
            .expect(TokenKind::Ident, "Expect identifier for call construct.")
            .unwrap_or_else(|| self.previous.clone());
        let object_location = object_token.location;
        let mut callee = AstNode::new(object_location, NodePayload::Ident { token: object_token });

        if self.match_kind(TokenKind::Dot) {
            let member_token = self
                .expect(TokenKind::Ident, "Expect identifier for call construct member access.")
                .unwrap_or_else(|| self.previous.clone());
            let member_location = member_token.location;
            let member = Box::new(AstNode::new(member_location, NodePayload::Ident { token: member_token }));
            callee = AstNode::new(
                location,
                NodePayload::MemberAccess {
                    object: Box::new(callee),
                    member,
                },
            );
        }

        let alias = if self.match_kind(TokenKind::As) {
            self.expect(TokenKind::Ident, "Expect identifier for call construct alias.")
        } else {
            None
        };

        let mut args = Vec::new();
        if self.match_kind(TokenKind::LCurly) {
            self.consume_terminators();
            if self.match_kind(TokenKind::Input) {
                self.expect(TokenKind::Colon, "Expect ':' after call construct input keyword.");
                args = self.parse_call_arg_list();
            }
            self.consume_terminators();
            self.expect(TokenKind::RCurly, "Expect '}' to close call construct body.");
        }

        AstNode::new(
            location,
            NodePayload::CallDecl {
                callee: Box::new(callee),
                alias,
                args,
            },
        )
    }

    /// `Ident "=" expr ("," Ident "=" expr)*`
    fn parse_call_arg_list(&mut self) -> Vec<(Token, AstNode)> {
        let mut args = Vec::new();
        loop {
            self.consume_terminators();
            if self.check(TokenKind::RCurly) {
                break;
            }
            if args.len() >= self.limits.max_args {
                self.diagnostic(Diagnostic::error(DiagnosticKind::TooMany {
                    what: "call construct inputs",
                    max: self.limits.max_args,
                }));
            }
            let name = self
                .expect(TokenKind::Ident, "Expect identifier for call construct input.")
                .unwrap_or_else(|| self.previous.clone());
            self.expect(TokenKind::Assign, "Expect '=' after call construct input identifier.");
            let value = self.parse_expr();
            args.push((name, value));
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        args
    }

    /// `("meta" | "parameter_meta") "{" (Ident ":" "{" (Ident ":" expr)* "}")* "}"`
    fn parse_meta_decl(&mut self) -> AstNode {
        let location = self.current.location;
        let name = self.advance(); // "meta" / "parameter_meta"
        self.expect(TokenKind::LCurly, "Expect '{' to begin meta body.");

        let mut members = Vec::new();
        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Endl) {
                continue;
            }
            let member_name = self
                .expect(TokenKind::Ident, "Expect identifier for meta member.")
                .unwrap_or_else(|| self.previous.clone());
            self.expect(TokenKind::Colon, "Expect ':' after meta member identifier.");

            let value = if self.check(TokenKind::LCurly) {
                self.advance();
                self.parse_meta_object()
            } else {
                self.parse_expr()
            };
            members.push((member_name, value));
            self.consume_terminators();
        }
        self.expect(TokenKind::RCurly, "Expect '}' to close meta body.");

        AstNode::new(location, NodePayload::MetaDecl { name, members })
    }

    /// A nested `{ ident: expr, … }` object inside a `meta`/`parameter_meta`
    /// member, represented as a `MapExpr` whose keys are `Ident` nodes.
    fn parse_meta_object(&mut self) -> AstNode {
        let location = self.previous.location;
        let mut entries = Vec::new();
        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Endl) {
                continue;
            }
            let key_token = self
                .expect(TokenKind::Ident, "Expect identifier for meta member property.")
                .unwrap_or_else(|| self.previous.clone());
            let key_location = key_token.location;
            let key = AstNode::new(key_location, NodePayload::Ident { token: key_token });
            self.expect(TokenKind::Colon, "Expect ':' after meta member property identifier.");
            let value = self.parse_expr();
            entries.push((key, value));
            self.consume_terminators();
        }
        self.expect(TokenKind::RCurly, "Expect '}' to close meta member body.");
        AstNode::new(location, NodePayload::MapExpr { entries })
    }

    /// A `command <<< … >>>` block. The lexer has already captured the raw
    /// body as a single `Command` token; this just scans it for
    /// `~{identifier}` interpolations.
    fn parse_command_decl(&mut self) -> AstNode {
        let location = self.current.location;
        let body = self.advance(); // the Command token

        let interpolations = interpolation_pattern()
            .captures_iter(&body.lexeme)
            .map(|cap| {
                let name = cap.get(1).expect("group 1 is required by the pattern").as_str();
                Token::new(TokenKind::Ident, name, body.location, body.span)
            })
            .collect();

        AstNode::new(
            location,
            NodePayload::CommandDecl {
                body,
                interpolations,
            },
        )
    }

    /// `"input" already consumed. "{" block "}"`
    fn parse_input_decl(&mut self) -> AstNode {
        let location = self.previous.location;
        self.expect(TokenKind::LCurly, "Expect '{' to begin input body.");
        let body = Box::new(self.parse_block());
        AstNode::new(location, NodePayload::InputDecl { body })
    }

    /// `"output" already consumed. "{" block "}"`
    fn parse_output_decl(&mut self) -> AstNode {
        let location = self.previous.location;
        self.expect(TokenKind::LCurly, "Expect '{' to begin output body.");
        let body = Box::new(self.parse_block());
        AstNode::new(location, NodePayload::OutputDecl { body })
    }

    /// `"runtime" already consumed. "{" (Ident ":" expr)* "}"`
    fn parse_runtime_decl(&mut self) -> AstNode {
        let location = self.previous.location;
        self.expect(TokenKind::LCurly, "Expect '{' to begin runtime body.");

        let mut members = Vec::new();
        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Endl) {
                continue;
            }
            let name = match self.expect(TokenKind::Ident, "Expected identifier for runtime member.") {
                Some(tok) => tok,
                None => break,
            };
            self.expect(TokenKind::Colon, "Expect ':' after runtime member identifier.");
            let value = self.parse_expr();
            members.push((name, value));
            self.consume_terminators();
        }
        self.expect(TokenKind::RCurly, "Expect '}' to close runtime body.");

        AstNode::new(location, NodePayload::RuntimeDecl { members })
    }
}

#[cfg(test)]
mod tests {
    use wdl_grammar::Lexer;

    use super::*;
    use super::super::Parser;

    fn members_of(source: &str) -> (Vec<AstNode>, Parser) {
        let mut parser = Parser::new(Lexer::new(source));
        parser.advance(); // consume the leading '{' the caller would normally have matched
        let members = parser.parse_class_members();
        (members, parser)
    }

    #[test]
    fn it_parses_a_runtime_block() {
        let (members, parser) = members_of("{\n  runtime {\n    docker: \"ubuntu\"\n    memory: \"4 GB\"\n  }\n}");
        assert!(parser.is_healthy());
        assert_eq!(members.len(), 1);
        match members[0].payload.as_ref() {
            NodePayload::RuntimeDecl { members } => assert_eq!(members.len(), 2),
            other => panic!("expected RuntimeDecl, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_nested_parameter_meta_block() {
        let (members, parser) = members_of(
            "{\n  parameter_meta {\n    sample: {\n      help: \"a sample\"\n    }\n  }\n}",
        );
        assert!(parser.is_healthy());
        match members[0].payload.as_ref() {
            NodePayload::MetaDecl { name, members } => {
                assert_eq!(name.lexeme, "parameter_meta");
                assert_eq!(members.len(), 1);
                assert!(matches!(members[0].1.payload.as_ref(), NodePayload::MapExpr { .. }));
            }
            other => panic!("expected MetaDecl, got {other:?}"),
        }
    }

    #[test]
    fn it_extracts_interpolations_from_a_command_block() {
        let (members, parser) = members_of("{\n  command <<<\n    echo ~{greeting} ~{name}\n  >>>\n}");
        assert!(parser.is_healthy());
        match members[0].payload.as_ref() {
            NodePayload::CommandDecl { interpolations, .. } => {
                assert_eq!(interpolations.len(), 2);
                assert_eq!(interpolations[0].lexeme, "greeting");
                assert_eq!(interpolations[1].lexeme, "name");
            }
            other => panic!("expected CommandDecl, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_call_construct_with_alias_and_inputs() {
        let (members, parser) = members_of(
            "{\n  call lib.greet as greeting {\n    input:\n      name = \"world\"\n  }\n}",
        );
        assert!(parser.is_healthy());
        match members[0].payload.as_ref() {
            NodePayload::CallDecl { callee, alias, args } => {
                assert!(matches!(callee.payload.as_ref(), NodePayload::MemberAccess { .. }));
                assert_eq!(alias.as_ref().expect("alias").lexeme, "greeting");
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].0.lexeme, "name");
            }
            other => panic!("expected CallDecl, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_bare_call_construct_without_alias_or_inputs() {
        let (members, parser) = members_of("{\n  call greet\n}");
        assert!(parser.is_healthy());
        match members[0].payload.as_ref() {
            NodePayload::CallDecl { alias, args, .. } => {
                assert!(alias.is_none());
                assert!(args.is_empty());
            }
            other => panic!("expected CallDecl, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_an_aliased_call_construct_with_no_member_access() {
        let (members, parser) = members_of("{\n  call greet as g\n}");
        assert!(parser.is_healthy());
        match members[0].payload.as_ref() {
            NodePayload::CallDecl { callee, alias, args } => {
                assert!(matches!(callee.payload.as_ref(), NodePayload::Ident { token } if token.lexeme == "greet"));
                assert_eq!(alias.as_ref().expect("alias").lexeme, "g");
                assert!(args.is_empty());
            }
            other => panic!("expected CallDecl, got {other:?}"),
        }
    }
}
