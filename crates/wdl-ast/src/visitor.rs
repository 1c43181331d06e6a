//! A single tree-walking visitor and a `write_tree` dump built on top of it,
//! replacing what would otherwise be two divergent print traversals with
//! one, parameterized over any [`std::fmt::Write`] sink.

use std::fmt;
use std::fmt::Write as _;

use crate::node::AstNode;
use crate::node::NodeKind;
use crate::node::NodePayload;

/// Callbacks invoked while walking an [`AstNode`] tree depth-first,
/// pre-order.
///
/// The default method bodies do nothing, so implementors only override the
/// hooks they care about — a lint pass interested only in `CallDecl`
/// doesn't need to stub out the other twenty-nine variants.
pub trait Visitor {
    /// Called once for every node, before any variant-specific children are
    /// visited.
    fn visit_node(&mut self, _node: &AstNode) {}
}

/// Walks `node` depth-first, pre-order, calling `visitor.visit_node` on
/// every node reached (including `node` itself).
pub fn walk(node: &AstNode, visitor: &mut impl Visitor) {
    visitor.visit_node(node);
    for child in children(node) {
        walk(child, visitor);
    }
}

/// The direct `AstNode` children of `node`, in source order. Tokens (leaf
/// data with no further node structure) are not yielded.
fn children(node: &AstNode) -> Vec<&AstNode> {
    match node.payload.as_ref() {
        NodePayload::Program { version, imports, decls } => {
            let mut out: Vec<&AstNode> = version.iter().map(|b| b.as_ref()).collect();
            out.extend(imports.iter());
            out.extend(decls.iter());
            out
        }
        NodePayload::VersionDecl { .. } | NodePayload::ImportDecl { .. } => Vec::new(),
        NodePayload::StructDecl { fields, .. } => fields.iter().collect(),
        NodePayload::ClassDecl { members, .. } => members.iter().collect(),
        NodePayload::FuncDecl { return_type, params, body, .. } => {
            let mut out = vec![return_type.as_ref()];
            out.extend(params.iter());
            out.push(body.as_ref());
            out
        }
        NodePayload::VarDecl { ty, init, .. } => {
            let mut out = vec![ty.as_ref()];
            out.extend(init.iter().map(|b| b.as_ref()));
            out
        }
        NodePayload::TypeNode { .. } => Vec::new(),
        NodePayload::Block { statements } => statements.iter().collect(),
        NodePayload::InputDecl { body } | NodePayload::OutputDecl { body } => vec![body.as_ref()],
        NodePayload::RuntimeDecl { members } => members.iter().map(|(_, v)| v).collect(),
        NodePayload::MetaDecl { members, .. } => members.iter().map(|(_, v)| v).collect(),
        NodePayload::CommandDecl { .. } => Vec::new(),
        NodePayload::CallDecl { callee, args, .. } => {
            let mut out = vec![callee.as_ref()];
            out.extend(args.iter().map(|(_, v)| v));
            out
        }
        NodePayload::MemberAccess { object, member } => vec![object.as_ref(), member.as_ref()],
        NodePayload::IfStmt { condition, then_branch, else_branch } => {
            let mut out = vec![condition.as_ref(), then_branch.as_ref()];
            out.extend(else_branch.iter().map(|b| b.as_ref()));
            out
        }
        NodePayload::WhileStmt { condition, body } | NodePayload::DoWhileStmt { condition, body } => {
            vec![condition.as_ref(), body.as_ref()]
        }
        NodePayload::ScatterStmt { collection, body, .. } => vec![collection.as_ref(), body.as_ref()],
        NodePayload::ReturnStmt { expr } => expr.iter().map(|b| b.as_ref()).collect(),
        NodePayload::ExprStmt { expr } => vec![expr.as_ref()],
        NodePayload::BinaryExpr { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        NodePayload::UnaryExpr { operand, .. } => vec![operand.as_ref()],
        NodePayload::AssignExpr { left, right } => vec![left.as_ref(), right.as_ref()],
        NodePayload::Literal { .. } | NodePayload::Ident { .. } => Vec::new(),
        NodePayload::FuncCall { callee, args, default_arg } => {
            let mut out = vec![callee.as_ref()];
            out.extend(args.iter());
            out.extend(default_arg.iter().map(|b| b.as_ref()));
            out
        }
        NodePayload::ArrayExpr { elements } => elements.iter().collect(),
        NodePayload::MapExpr { entries } => entries.iter().flat_map(|(k, v)| [k, v]).collect(),
        NodePayload::PairExpr { first, second } => vec![first.as_ref(), second.as_ref()],
    }
}

/// A one-line label describing `node`'s shape and any inline scalar data
/// (names, operators, literal lexemes) it carries.
fn label(node: &AstNode) -> String {
    match node.payload.as_ref() {
        NodePayload::Program { .. } => "Program".to_string(),
        NodePayload::VersionDecl { literal } => format!("VersionDecl {}", literal.lexeme),
        NodePayload::ImportDecl { path, alias } => match alias {
            Some(alias) => format!("ImportDecl {} as {}", path.lexeme, alias.lexeme),
            None => format!("ImportDecl {}", path.lexeme),
        },
        NodePayload::StructDecl { name, .. } => format!("StructDecl {}", name.lexeme),
        NodePayload::ClassDecl { class_kind, name, .. } => format!("ClassDecl({}) {}", class_kind.lexeme, name.lexeme),
        NodePayload::FuncDecl { name, .. } => format!("FuncDecl {}", name.lexeme),
        NodePayload::VarDecl { name, .. } => format!("VarDecl {}", name.lexeme),
        NodePayload::TypeNode { token, nullable } => format!("TypeNode {}{}", token.lexeme, if *nullable { " (nullable)" } else { "" }),
        NodePayload::Block { .. } => "Block".to_string(),
        NodePayload::InputDecl { .. } => "InputDecl".to_string(),
        NodePayload::OutputDecl { .. } => "OutputDecl".to_string(),
        NodePayload::RuntimeDecl { .. } => "RuntimeDecl".to_string(),
        NodePayload::MetaDecl { name, .. } => format!("MetaDecl {}", name.lexeme),
        NodePayload::CommandDecl { interpolations, .. } => format!("CommandDecl ({} interpolations)", interpolations.len()),
        NodePayload::CallDecl { alias, .. } => match alias {
            Some(alias) => format!("CallDecl as {}", alias.lexeme),
            None => "CallDecl".to_string(),
        },
        NodePayload::MemberAccess { .. } => "MemberAccess".to_string(),
        NodePayload::IfStmt { .. } => "IfStmt".to_string(),
        NodePayload::WhileStmt { .. } => "WhileStmt".to_string(),
        NodePayload::DoWhileStmt { .. } => "DoWhileStmt".to_string(),
        NodePayload::ScatterStmt { loop_var, .. } => format!("ScatterStmt {}", loop_var.lexeme),
        NodePayload::ReturnStmt { .. } => "ReturnStmt".to_string(),
        NodePayload::ExprStmt { .. } => "ExprStmt".to_string(),
        NodePayload::BinaryExpr { op, .. } => format!("BinaryExpr {}", op.lexeme),
        NodePayload::UnaryExpr { op, .. } => format!("UnaryExpr {}", op.lexeme),
        NodePayload::AssignExpr { .. } => "AssignExpr".to_string(),
        NodePayload::Literal { token } => format!("Literal {}", token.lexeme),
        NodePayload::Ident { token } => format!("Ident {}", token.lexeme),
        NodePayload::FuncCall { .. } => "FuncCall".to_string(),
        NodePayload::ArrayExpr { .. } => "ArrayExpr".to_string(),
        NodePayload::MapExpr { .. } => "MapExpr".to_string(),
        NodePayload::PairExpr { .. } => "PairExpr".to_string(),
    }
}

/// Writes an indented textual dump of `node` to `sink`.
///
/// Used for debugging and for the crate's own tests, not as a stable
/// serialization format.
pub fn write_tree(node: &AstNode, sink: &mut impl fmt::Write) -> fmt::Result {
    write_tree_indented(node, sink, 0)
}

/// Recursive helper for [`write_tree`], tracking indentation depth.
fn write_tree_indented(node: &AstNode, sink: &mut impl fmt::Write, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        sink.write_str("  ")?;
    }
    writeln!(sink, "{} @ {}", label(node), node.location)?;
    for child in children(node) {
        write_tree_indented(child, sink, depth + 1)?;
    }
    Ok(())
}

/// Returns the indented textual dump of `node` as an owned `String`.
pub fn tree_to_string(node: &AstNode) -> String {
    let mut out = String::new();
    write_tree(node, &mut out).expect("writing to a String never fails");
    out
}

/// A [`Visitor`] that counts how many nodes of each [`NodeKind`] a tree
/// contains. Used by tests that want to assert on tree shape without
/// hand-rolling a full structural comparison.
#[derive(Debug, Default)]
pub struct KindCounter {
    counts: std::collections::HashMap<NodeKind, usize>,
}

impl KindCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many nodes of `kind` were visited.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

impl Visitor for KindCounter {
    fn visit_node(&mut self, node: &AstNode) {
        *self.counts.entry(node.kind).or_insert(0) += 1;
    }
}
