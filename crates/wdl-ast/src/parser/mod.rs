//! The recursive-descent parser.
//!
//! Grammar productions are split across submodules by concern, mirroring
//! how the grammar this parser is grounded on splits its own rule
//! functions: [`mod@types`] for type references, [`mod@expr`] for the
//! expression precedence chain, and [`mod@members`] for the class/task/
//! workflow member grammar (`call`, `meta`, `command`, `input`/`output`/
//! `runtime`). This file holds the token-stream plumbing and the
//! declaration-level grammar (`program`, `version`, `import`, `struct`,
//! `class`, `func`/`var`, `block`, statements).

mod expr;
mod members;
mod types;

use wdl_core::Diagnostic;
use wdl_core::DiagnosticKind;
use wdl_core::Limits;
use wdl_core::Severity;
use wdl_grammar::Lexer;
use wdl_grammar::Token;
use wdl_grammar::TokenKind;

use crate::node::AstNode;
use crate::node::NodePayload;

/// Whether the parser has seen an unrecoverable-for-acceptance error.
///
/// The parser never stops parsing on an error — it always produces a
/// `Program` node — but callers use this flag to decide whether to trust
/// the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No error diagnostic has been recorded yet.
    Healthy,
    /// At least one error diagnostic has been recorded.
    Errored,
}

/// Translates a token stream into a [`AstNode`] tree rooted at `Program`.
///
/// Holds exactly one token of lookahead (`current`) plus the token already
/// consumed (`previous`); a second token of lookahead, when the grammar
/// needs it to disambiguate a declaration or a member access, is obtained
/// by cloning the lexer and lexing once from the clone (see [`Parser::peek_kind`]).
pub struct Parser {
    /// The token source.
    lexer: Lexer,
    /// The token currently being examined.
    current: Token,
    /// The most recently consumed token.
    previous: Token,
    /// Diagnostics collected so far, in the order encountered.
    diagnostics: Vec<Diagnostic>,
    /// Whether an error has been recorded.
    state: State,
    /// The configured list-size caps.
    limits: Limits,
}

impl Parser {
    /// Creates a new parser over `lexer`, using [`Limits::DEFAULT`].
    pub fn new(lexer: Lexer) -> Self {
        Self::with_limits(lexer, Limits::DEFAULT)
    }

    /// Creates a new parser over `lexer` with custom list-size [`Limits`].
    pub fn with_limits(mut lexer: Lexer, limits: Limits) -> Self {
        log::trace!("constructing parser");
        let mut diagnostics = Vec::new();
        let mut state = State::Healthy;
        let first = Self::pull_non_error(&mut lexer, &mut diagnostics, &mut state);
        Self {
            current: first.clone(),
            previous: first,
            lexer,
            diagnostics,
            state,
            limits,
        }
    }

    /// Parses the whole input and returns the `Program` root.
    ///
    /// Always returns a node, even on malformed input: diagnose-and-continue
    /// is the only error policy this parser has. Inspect [`Parser::is_healthy`]
    /// or [`Parser::diagnostics`] to decide whether to trust the result.
    pub fn parse_program(mut self) -> (AstNode, Vec<Diagnostic>) {
        let start = self.current.location;
        log::debug!("starting parse at {start}");

        let mut version = None;
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Ident) && self.current.lexeme.eq_ignore_ascii_case("version") {
                version = Some(Box::new(self.parse_version_decl()));
                continue;
            }

            if self.match_kind(TokenKind::Import) {
                loop {
                    imports.push(self.parse_import_decl());
                    if !self.match_kind(TokenKind::Import) {
                        break;
                    }
                }
                continue;
            }

            decls.push(self.parse_decl());
        }

        log::debug!(
            "finished parse: {} diagnostics, healthy = {}",
            self.diagnostics.len(),
            self.is_healthy()
        );

        let program = AstNode::new(
            start,
            NodePayload::Program {
                version,
                imports,
                decls,
            },
        );
        (program, self.diagnostics)
    }

    /// Whether no error-severity diagnostic has been recorded.
    pub fn is_healthy(&self) -> bool {
        self.state == State::Healthy
    }

    /// The diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `version NumberLiteral Endl?`
    fn parse_version_decl(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // the "version" identifier
        let literal = match self.expect(TokenKind::NumberLiteral, "Expect a version number after 'version' keyword.") {
            Some(tok) => tok,
            None => self.previous.clone(),
        };
        self.consume_terminators();
        AstNode::new(location, NodePayload::VersionDecl { literal })
    }

    /// `StringLiteral ("as" Ident)? Endl?`, the `import` keyword already
    /// consumed by the caller.
    fn parse_import_decl(&mut self) -> AstNode {
        let location = self.current.location;
        let path = match self.expect(TokenKind::StringLiteral, "Expect a string literal for import path.") {
            Some(tok) => tok,
            None => self.previous.clone(),
        };
        let alias = if self.match_kind(TokenKind::As) {
            self.expect(TokenKind::Ident, "Expect identifier after 'as' in import statement.")
        } else {
            None
        };
        self.consume_terminators();
        AstNode::new(location, NodePayload::ImportDecl { path, alias })
    }

    /// `decl := func_decl | class_decl | struct_decl | var_decl | stmt`
    fn parse_decl(&mut self) -> AstNode {
        if self.check(TokenKind::Type) {
            let lowered = self.current.lexeme.to_lowercase();
            if lowered == "struct" {
                self.advance();
                let node = self.parse_struct_decl();
                self.consume_terminators();
                return node;
            }
            if lowered == "task" || lowered == "workflow" || lowered == "class" {
                let class_kind = self.current.clone();
                self.advance();
                let node = self.parse_class_decl(class_kind);
                self.consume_terminators();
                return node;
            }
            let node = self.parse_var_or_func_decl();
            self.consume_terminators();
            return node;
        }

        let node = self.parse_stmt();
        self.consume_terminators();
        node
    }

    /// `"struct" already consumed. Ident "{" var_decl* "}"`
    fn parse_struct_decl(&mut self) -> AstNode {
        let location = self.previous.location;
        let name = self
            .expect(TokenKind::Ident, "Expect struct name.")
            .unwrap_or_else(|| self.previous.clone());
        self.expect(TokenKind::LCurly, "Expect '{' to begin struct body.");

        let mut fields = Vec::new();
        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            while self.match_kind(TokenKind::Endl) {}
            if self.check(TokenKind::RCurly) {
                break;
            }
            if !self.check(TokenKind::Type) {
                self.diagnostic(Diagnostic::error(DiagnosticKind::Expected(
                    "Expect type keyword at start of struct member.".to_string(),
                )));
                break;
            }
            fields.push(self.parse_var_decl());
            self.consume_terminators();
        }
        self.expect(TokenKind::RCurly, "Expect '}' to close struct body.");

        AstNode::new(location, NodePayload::StructDecl { name, fields })
    }

    /// `Type already consumed as class_kind. Ident "{" member* "}"`
    fn parse_class_decl(&mut self, class_kind: Token) -> AstNode {
        let location = class_kind.location;
        let name = self
            .expect(TokenKind::Ident, "Expect class name.")
            .unwrap_or_else(|| self.previous.clone());
        self.expect(TokenKind::LCurly, "Expect '{' to begin class body.");

        let members = self.parse_class_members();

        AstNode::new(
            location,
            NodePayload::ClassDecl {
                class_kind,
                name,
                members,
            },
        )
    }

    /// Shared by top-level declarations and `stmt`-position local
    /// declarations: `Type Ident (params)? ("(" params ")" "{" block "}")?`.
    fn parse_var_or_func_decl(&mut self) -> AstNode {
        let location = self.current.location;
        let ty = self.parse_type();

        let name = self
            .expect(TokenKind::Ident, "Expect variable name.")
            .unwrap_or_else(|| self.previous.clone());

        if self.match_kind(TokenKind::LParen) {
            let params = self.parse_param_list();
            self.expect(TokenKind::RParen, "Expect ')' after parameters.");
            self.expect(TokenKind::LCurly, "Expect '{' before function body.");
            let body = Box::new(self.parse_block());
            return AstNode::new(
                location,
                NodePayload::FuncDecl {
                    return_type: Box::new(ty),
                    name,
                    params,
                    body,
                },
            );
        }

        let init = if self.match_kind(TokenKind::Assign) {
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };

        AstNode::new(
            location,
            NodePayload::VarDecl {
                ty: Box::new(ty),
                name,
                init,
            },
        )
    }

    /// Parses `var_decl` where the type has already been established to be
    /// a `Type` token still sitting in `current` (used by struct fields,
    /// which the grounding grammar parses with `parse_var_decl` directly
    /// rather than through the func/var disambiguation path).
    fn parse_var_decl(&mut self) -> AstNode {
        self.parse_var_or_func_decl()
    }

    /// A comma-separated `Type Ident` parameter list, up to `)`.
    fn parse_param_list(&mut self) -> Vec<AstNode> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return params;
        }
        loop {
            if params.len() >= self.limits.max_params {
                self.diagnostic(Diagnostic::error(DiagnosticKind::TooMany {
                    what: "parameters",
                    max: self.limits.max_params,
                }));
            }
            let location = self.current.location;
            let ty = self.parse_type();
            let name = self
                .expect(TokenKind::Ident, "Expect parameter name.")
                .unwrap_or_else(|| self.previous.clone());
            params.push(AstNode::new(
                location,
                NodePayload::VarDecl {
                    ty: Box::new(ty),
                    name,
                    init: None,
                },
            ));
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        params
    }

    /// `"{" already consumed. (decl)* "}"`
    pub(crate) fn parse_block(&mut self) -> AstNode {
        let location = self.previous.location;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RCurly) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::Endl) {
                continue;
            }
            statements.push(self.parse_decl());
        }
        self.expect(TokenKind::RCurly, "Expect a closing '}' after block.");
        self.consume_terminators();
        AstNode::new(location, NodePayload::Block { statements })
    }

    /// Dispatches a single statement. The `if ... then ... else ...` ternary
    /// form lives in the expression grammar (see [`expr::Parser::parse_unary`]);
    /// this only handles the parenthesized-condition statement forms.
    fn parse_stmt(&mut self) -> AstNode {
        match self.current.kind {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Scatter => self.parse_scatter_stmt(),
            TokenKind::Call => self.parse_call_decl(),
            TokenKind::LCurly => {
                self.advance();
                self.parse_block()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// `"if" "(" expr ")" stmt ("else" stmt)?`
    fn parse_if_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "if"
        self.expect(TokenKind::LParen, "Expect '(' after if.");
        let condition = Box::new(self.parse_expr());
        self.expect(TokenKind::RParen, "Expect a closing ')' after if condition.");
        let then_branch = Box::new(self.parse_stmt());
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()))
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

    /// `"do" "{" stmt* "}" "while" "(" expr ")"`
    fn parse_do_while_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "do"
        self.expect(TokenKind::LCurly, "Expect '{' after 'do'.");
        let body = Box::new(self.parse_block());
        self.expect(TokenKind::While, "Expect 'while' after 'do' block.");
        self.expect(TokenKind::LParen, "Expect '(' after 'while'.");
        let condition = Box::new(self.parse_expr());
        self.expect(TokenKind::RParen, "Expect a closing ')' after 'while' condition.");
        AstNode::new(location, NodePayload::DoWhileStmt { condition, body })
    }

    /// `"while" "(" expr ")" stmt`
    fn parse_while_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "while"
        self.expect(TokenKind::LParen, "Expect '(' after 'while'.");
        let condition = Box::new(self.parse_expr());
        self.expect(TokenKind::RParen, "Expect a closing ')' after 'while' condition.");
        let body = Box::new(self.parse_stmt());
        AstNode::new(location, NodePayload::WhileStmt { condition, body })
    }

    /// `"return" expr? Endl`
    fn parse_return_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "return"
        let expr = if self.check(TokenKind::Endl) || self.check(TokenKind::Eof) {
            None
        } else {
            Some(Box::new(self.parse_expr()))
        };
        AstNode::new(location, NodePayload::ReturnStmt { expr })
    }

    /// `"scatter" "(" Ident "in" expr ")" "{" block "}"`
    fn parse_scatter_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        self.advance(); // "scatter"
        self.expect(TokenKind::LParen, "Expect '(' after scatter.");
        let loop_var = self
            .expect(TokenKind::Ident, "Expect identifier after scatter.")
            .unwrap_or_else(|| self.previous.clone());
        self.expect(TokenKind::In, "Expect 'in' after scatter identifier.");
        let collection = Box::new(self.parse_expr());
        self.expect(TokenKind::RParen, "Expect ')' after scatter in.");
        self.expect(TokenKind::LCurly, "Expect '{' after scatter in.");
        let body = Box::new(self.parse_block());
        AstNode::new(
            location,
            NodePayload::ScatterStmt {
                loop_var,
                collection,
                body,
            },
        )
    }

    /// A bare expression used as a statement.
    fn parse_expr_stmt(&mut self) -> AstNode {
        let location = self.current.location;
        let expr = Box::new(self.parse_expr());
        AstNode::new(location, NodePayload::ExprStmt { expr })
    }

    /// Shifts `previous ← current` and pulls the next non-error token from
    /// the lexer, returning the token that was just consumed.
    fn advance(&mut self) -> Token {
        self.previous = std::mem::replace(
            &mut self.current,
            Self::pull_non_error(&mut self.lexer, &mut self.diagnostics, &mut self.state),
        );
        self.previous.clone()
    }

    /// Pulls tokens from `lexer` until a non-`Error` one arrives, recording
    /// a diagnostic for each error token skipped.
    fn pull_non_error(lexer: &mut Lexer, diagnostics: &mut Vec<Diagnostic>, state: &mut State) -> Token {
        loop {
            let token = lexer.lex();
            if token.kind != TokenKind::Error {
                return token;
            }
            let kind = classify_lexer_error(&token);
            let diag = Diagnostic::error(kind).with_location(token.location).with_lexeme(token.lexeme.clone());
            log::error!("{diag}");
            diagnostics.push(diag);
            *state = State::Errored;
        }
    }

    /// Does `current` match `kind`?
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// If `current` matches `kind`, consumes it and returns `true`.
    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `current` if it matches `kind`; otherwise records an
    /// `Expected` diagnostic without consuming anything, so the caller can
    /// keep making progress.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.diagnostic_here(DiagnosticKind::Expected(message.to_string()));
            None
        }
    }

    /// Consumes any run of `Endl` tokens sitting at `current`. Declarations
    /// and statements use this instead of requiring exactly one terminator,
    /// since the lexer's newline collapse only guarantees single blank
    /// lines, not the absence of a `;` immediately followed by a newline.
    fn consume_terminators(&mut self) {
        while self.match_kind(TokenKind::Endl) {}
    }

    /// Clones the lexer and lexes once from the clone, returning the kind
    /// of the token that would follow `current` without consuming it.
    fn peek_kind(&self) -> TokenKind {
        let mut ahead = self.lexer.clone_for_peek();
        ahead.lex().kind
    }

    /// Whether the token following `current` (via [`Parser::peek_kind`]) is `kind`.
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Records a diagnostic built from the current token's location and
    /// lexeme (or the end-of-file marker).
    fn diagnostic_here(&mut self, kind: DiagnosticKind) {
        let mut diag = Diagnostic::error(kind).with_location(self.current.location);
        diag = if self.current.kind == TokenKind::Eof {
            diag.at_end()
        } else {
            diag.with_lexeme(self.current.lexeme.clone())
        };
        self.diagnostic(diag);
    }

    /// Records a pre-built diagnostic, updating [`State`] and emitting the
    /// matching log record.
    fn diagnostic(&mut self, diag: Diagnostic) {
        match diag.severity() {
            Severity::Error => {
                log::error!("{diag}");
                self.state = State::Errored;
            }
            Severity::Warning | Severity::Note => log::warn!("{diag}"),
        }
        self.diagnostics.push(diag);
    }
}

/// Classifies a lexer-produced `Error` token by inspecting its lexeme,
/// since the lexer itself reports the condition through the lexeme rather
/// than a dedicated error subtype.
fn classify_lexer_error(token: &Token) -> DiagnosticKind {
    if token.lexeme == "Unterminated command block" {
        DiagnosticKind::UnterminatedCommand
    } else if token.lexeme.starts_with('"') || token.lexeme.starts_with('\'') {
        DiagnosticKind::UnterminatedString
    } else if token.lexeme.matches('.').count() > 1 {
        DiagnosticKind::MalformedNumber
    } else {
        DiagnosticKind::UnexpectedCharacter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodePayload;

    fn parse(source: &str) -> (AstNode, Vec<Diagnostic>) {
        Parser::new(Lexer::new(source)).parse_program()
    }

    #[test]
    fn it_parses_an_empty_program_as_healthy() {
        let (program, diagnostics) = parse("");
        assert!(diagnostics.is_empty());
        match *program.payload {
            NodePayload::Program { version, imports, decls } => {
                assert!(version.is_none());
                assert!(imports.is_empty());
                assert!(decls.is_empty());
            }
            other => panic!("expected Program, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_a_version_statement() {
        let (program, diagnostics) = parse("version 1.0\n");
        assert!(diagnostics.is_empty());
        match *program.payload {
            NodePayload::Program { version: Some(version), .. } => match *version.payload {
                NodePayload::VersionDecl { literal } => assert_eq!(literal.lexeme, "1.0"),
                other => panic!("expected VersionDecl, got {other:?}"),
            },
            other => panic!("expected a version decl, got {other:?}"),
        }
    }

    #[test]
    fn it_parses_import_statements_with_and_without_alias() {
        let (program, diagnostics) = parse("import \"a.wdl\"\nimport \"b.wdl\" as B\n");
        assert!(diagnostics.is_empty());
        match *program.payload {
            NodePayload::Program { imports, .. } => {
                assert_eq!(imports.len(), 2);
                match imports[1].payload.as_ref() {
                    NodePayload::ImportDecl { alias: Some(alias), .. } => assert_eq!(alias.lexeme, "B"),
                    other => panic!("expected aliased import, got {other:?}"),
                }
            }
            other => panic!("expected Program, got {other:?}"),
        }
    }

    #[test]
    fn it_records_a_diagnostic_for_a_missing_closing_brace() {
        let (_, diagnostics) = parse("workflow W {\n");
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn it_disambiguates_functions_from_variables_by_the_following_token() {
        let (program, diagnostics) = parse("Int add(Int a, Int b) { return a + b }\n");
        assert!(diagnostics.is_empty());
        match *program.payload {
            NodePayload::Program { decls, .. } => match decls[0].payload.as_ref() {
                NodePayload::FuncDecl { name, params, .. } => {
                    assert_eq!(name.lexeme, "add");
                    assert_eq!(params.len(), 2);
                }
                other => panic!("expected FuncDecl, got {other:?}"),
            },
            other => panic!("expected Program, got {other:?}"),
        }
    }

    #[test]
    fn it_treats_a_struct_keyword_specially_even_though_it_lexes_as_type() {
        let (program, diagnostics) = parse("struct Sample {\n  String name\n}\n");
        assert!(diagnostics.is_empty());
        match *program.payload {
            NodePayload::Program { decls, .. } => match decls[0].payload.as_ref() {
                NodePayload::StructDecl { name, fields } => {
                    assert_eq!(name.lexeme, "Sample");
                    assert_eq!(fields.len(), 1);
                }
                other => panic!("expected StructDecl, got {other:?}"),
            },
            other => panic!("expected Program, got {other:?}"),
        }
    }
}
