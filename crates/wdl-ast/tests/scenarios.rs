//! End-to-end parsing scenarios, asserting directly on the produced
//! `AstNode` tree rather than on a serialized form.

use pretty_assertions::assert_eq;
use wdl_ast::NodePayload;
use wdl_ast::Parser;
use wdl_grammar::Lexer;

fn parse(source: &str) -> wdl_ast::AstNode {
    let (program, diagnostics) = Parser::new(Lexer::new(source)).parse_program();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    program
}

#[test]
fn empty_workflow() {
    let program = parse("version 1.0\nworkflow W { }\n");

    let NodePayload::Program { version, decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    let version = version.as_ref().expect("version decl");
    match version.payload.as_ref() {
        NodePayload::VersionDecl { literal } => assert_eq!(literal.lexeme, "1.0"),
        other => panic!("expected VersionDecl, got {other:?}"),
    }

    assert_eq!(decls.len(), 1);
    match decls[0].payload.as_ref() {
        NodePayload::ClassDecl { class_kind, name, members } => {
            assert_eq!(class_kind.lexeme, "workflow");
            assert_eq!(name.lexeme, "W");
            assert!(members.is_empty());
        }
        other => panic!("expected ClassDecl, got {other:?}"),
    }
}

#[test]
fn task_with_command_and_runtime() {
    let program = parse(
        "task hello {\n  input { String name }\n  command <<< echo ~{name} >>>\n  runtime { docker: \"alpine:3\" }\n  output { String out = stdout() }\n}\n",
    );

    let NodePayload::Program { decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    let NodePayload::ClassDecl { class_kind, name, members } = decls[0].payload.as_ref() else {
        panic!("expected ClassDecl");
    };
    assert_eq!(class_kind.lexeme, "task");
    assert_eq!(name.lexeme, "hello");
    assert_eq!(members.len(), 4);

    assert!(matches!(members[0].payload.as_ref(), NodePayload::InputDecl { .. }));

    match members[1].payload.as_ref() {
        NodePayload::CommandDecl { interpolations, .. } => {
            assert_eq!(interpolations.len(), 1);
            assert_eq!(interpolations[0].lexeme, "name");
        }
        other => panic!("expected CommandDecl, got {other:?}"),
    }

    match members[2].payload.as_ref() {
        NodePayload::RuntimeDecl { members } => {
            assert_eq!(members.len(), 1);
            assert_eq!(members[0].0.lexeme, "docker");
            match members[0].1.payload.as_ref() {
                NodePayload::Literal { token } => assert_eq!(token.lexeme, "\"alpine:3\""),
                other => panic!("expected Literal, got {other:?}"),
            }
        }
        other => panic!("expected RuntimeDecl, got {other:?}"),
    }

    match members[3].payload.as_ref() {
        NodePayload::OutputDecl { body } => match body.payload.as_ref() {
            NodePayload::Block { statements } => {
                assert_eq!(statements.len(), 1);
                match statements[0].payload.as_ref() {
                    NodePayload::VarDecl { name, init, .. } => {
                        assert_eq!(name.lexeme, "out");
                        assert!(init.is_some());
                    }
                    other => panic!("expected VarDecl, got {other:?}"),
                }
            }
            other => panic!("expected Block, got {other:?}"),
        },
        other => panic!("expected OutputDecl, got {other:?}"),
    }
}

#[test]
fn call_with_alias_and_inputs() {
    let program = parse("workflow W {\n  call tasks.map as m { input: x = 1, y = \"a\" }\n}\n");

    let NodePayload::Program { decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    let NodePayload::ClassDecl { members, .. } = decls[0].payload.as_ref() else {
        panic!("expected ClassDecl");
    };
    match members[0].payload.as_ref() {
        NodePayload::CallDecl { callee, alias, args } => {
            match callee.payload.as_ref() {
                NodePayload::MemberAccess { object, member } => {
                    assert!(matches!(object.payload.as_ref(), NodePayload::Ident { token } if token.lexeme == "tasks"));
                    assert!(matches!(member.payload.as_ref(), NodePayload::Ident { token } if token.lexeme == "map"));
                }
                other => panic!("expected MemberAccess, got {other:?}"),
            }
            assert_eq!(alias.as_ref().expect("alias").lexeme, "m");
            assert_eq!(args.len(), 2);
            assert_eq!(args[0].0.lexeme, "x");
            assert_eq!(args[1].0.lexeme, "y");
        }
        other => panic!("expected CallDecl, got {other:?}"),
    }
}

#[test]
fn parametric_and_nullable_type() {
    let program = parse("Array[String]+? names = [\"a\",\"b\"]\n");

    let NodePayload::Program { decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    match decls[0].payload.as_ref() {
        NodePayload::VarDecl { ty, name, init } => {
            assert_eq!(name.lexeme, "names");
            match ty.payload.as_ref() {
                NodePayload::TypeNode { token, nullable } => {
                    assert_eq!(token.lexeme, "Array[String]+?");
                    assert!(nullable);
                }
                other => panic!("expected TypeNode, got {other:?}"),
            }
            match init.as_ref().expect("initializer").payload.as_ref() {
                NodePayload::ArrayExpr { elements } => assert_eq!(elements.len(), 2),
                other => panic!("expected ArrayExpr, got {other:?}"),
            }
        }
        other => panic!("expected VarDecl, got {other:?}"),
    }
}

#[test]
fn ternary_expression_with_precedence() {
    let program = parse("Int x = if a && b then 1 + 2 else 3\n");

    let NodePayload::Program { decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    let NodePayload::VarDecl { init, .. } = decls[0].payload.as_ref() else {
        panic!("expected VarDecl");
    };
    match init.as_ref().expect("initializer").payload.as_ref() {
        NodePayload::IfStmt { condition, then_branch, else_branch } => {
            assert!(matches!(condition.payload.as_ref(), NodePayload::BinaryExpr { op, .. } if op.lexeme == "&&"));
            assert!(matches!(then_branch.payload.as_ref(), NodePayload::BinaryExpr { op, .. } if op.lexeme == "+"));
            match else_branch.as_ref().expect("else branch").payload.as_ref() {
                NodePayload::Literal { token } => assert_eq!(token.lexeme, "3"),
                other => panic!("expected Literal, got {other:?}"),
            }
        }
        other => panic!("expected IfStmt, got {other:?}"),
    }
}

#[test]
fn scatter_over_collection() {
    let program = parse("scatter (s in samples) { call align { input: sample = s } }\n");

    let NodePayload::Program { decls, .. } = program.payload.as_ref() else {
        panic!("expected Program");
    };
    match decls[0].payload.as_ref() {
        NodePayload::ScatterStmt { loop_var, collection, body } => {
            assert_eq!(loop_var.lexeme, "s");
            assert!(matches!(collection.payload.as_ref(), NodePayload::Ident { token } if token.lexeme == "samples"));
            match body.payload.as_ref() {
                NodePayload::Block { statements } => {
                    assert_eq!(statements.len(), 1);
                    assert!(matches!(statements[0].payload.as_ref(), NodePayload::CallDecl { .. }));
                }
                other => panic!("expected Block, got {other:?}"),
            }
        }
        other => panic!("expected ScatterStmt, got {other:?}"),
    }
}
