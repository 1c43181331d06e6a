//! The AST node tagged union.

use wdl_core::SourceLocation;
use wdl_grammar::Token;

/// A discriminant identifying which [`NodePayload`] variant a node carries.
///
/// Kept alongside `payload` (rather than matched out of it on every read) so
/// callers that only care about shape — a pretty-printer deciding how much
/// indentation to use, say — don't need to destructure the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// See [`NodePayload::Program`].
    Program,
    /// See [`NodePayload::VersionDecl`].
    VersionDecl,
    /// See [`NodePayload::ImportDecl`].
    ImportDecl,
    /// See [`NodePayload::StructDecl`].
    StructDecl,
    /// See [`NodePayload::ClassDecl`].
    ClassDecl,
    /// See [`NodePayload::FuncDecl`].
    FuncDecl,
    /// See [`NodePayload::VarDecl`].
    VarDecl,
    /// See [`NodePayload::TypeNode`].
    TypeNode,
    /// See [`NodePayload::Block`].
    Block,
    /// See [`NodePayload::InputDecl`].
    InputDecl,
    /// See [`NodePayload::OutputDecl`].
    OutputDecl,
    /// See [`NodePayload::RuntimeDecl`].
    RuntimeDecl,
    /// See [`NodePayload::MetaDecl`].
    MetaDecl,
    /// See [`NodePayload::CommandDecl`].
    CommandDecl,
    /// See [`NodePayload::CallDecl`].
    CallDecl,
    /// See [`NodePayload::MemberAccess`].
    MemberAccess,
    /// See [`NodePayload::IfStmt`].
    IfStmt,
    /// See [`NodePayload::WhileStmt`].
    WhileStmt,
    /// See [`NodePayload::DoWhileStmt`].
    DoWhileStmt,
    /// See [`NodePayload::ScatterStmt`].
    ScatterStmt,
    /// See [`NodePayload::ReturnStmt`].
    ReturnStmt,
    /// See [`NodePayload::ExprStmt`].
    ExprStmt,
    /// See [`NodePayload::BinaryExpr`].
    BinaryExpr,
    /// See [`NodePayload::UnaryExpr`].
    UnaryExpr,
    /// See [`NodePayload::AssignExpr`].
    AssignExpr,
    /// See [`NodePayload::Literal`].
    Literal,
    /// See [`NodePayload::Ident`].
    Ident,
    /// See [`NodePayload::FuncCall`].
    FuncCall,
    /// See [`NodePayload::ArrayExpr`].
    ArrayExpr,
    /// See [`NodePayload::MapExpr`].
    MapExpr,
    /// See [`NodePayload::PairExpr`].
    PairExpr,
}

/// A named member of a `runtime`, `meta`/`parameter_meta`, `call`, or
/// function-call argument list: `(name, value)`.
pub type Member = (Token, AstNode);

/// A single entry of a `MapExpr` literal: `key : value`.
pub type MapEntry = (AstNode, AstNode);

/// The tagged union of AST node shapes.
///
/// Every variant corresponds 1:1 with a row of the node-shape table: the
/// root `Program`, declarations, statements, and expressions all live in
/// this one closed enum rather than a type hierarchy, so a tree walk is a
/// single `match` rather than a chain of downcasts.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    /// The document root.
    Program {
        /// The `version` statement, if present.
        version: Option<Box<AstNode>>,
        /// `import` statements, in source order.
        imports: Vec<AstNode>,
        /// Top-level declarations (structs, tasks, workflows, functions,
        /// variables), in source order.
        decls: Vec<AstNode>,
    },
    /// A `version N.N` statement.
    VersionDecl {
        /// The version number token.
        literal: Token,
    },
    /// An `import "path" (as Alias)?` statement.
    ImportDecl {
        /// The imported path, as its string literal token.
        path: Token,
        /// The `as` alias, if present.
        alias: Option<Token>,
    },
    /// A `struct Name { fields }` declaration.
    StructDecl {
        /// The struct's name.
        name: Token,
        /// The struct's fields, each a [`NodePayload::VarDecl`].
        fields: Vec<AstNode>,
    },
    /// A `task`/`workflow`/`class` declaration.
    ClassDecl {
        /// The keyword token that introduced this declaration (`task`,
        /// `workflow`, or `class`), retained so callers can tell which kind
        /// of container this is without re-deriving it from member shape.
        class_kind: Token,
        /// The declaration's name.
        name: Token,
        /// The declaration's members, in source order.
        members: Vec<AstNode>,
    },
    /// A named function/method declaration.
    FuncDecl {
        /// The return type.
        return_type: Box<AstNode>,
        /// The function's name.
        name: Token,
        /// Parameters, each a [`NodePayload::VarDecl`].
        params: Vec<AstNode>,
        /// The function body.
        body: Box<AstNode>,
    },
    /// A typed variable declaration: a field or a local.
    VarDecl {
        /// The declared type.
        ty: Box<AstNode>,
        /// The variable's name.
        name: Token,
        /// The initializer expression, if present.
        init: Option<Box<AstNode>>,
    },
    /// A type reference, possibly parametric and/or nullable.
    TypeNode {
        /// The composed type spelling, e.g. `Array[String]+?`. Carried as a
        /// token so the node retains a source location and lexeme without a
        /// second, parallel string field.
        token: Token,
        /// Whether this type was suffixed with `?`.
        nullable: bool,
    },
    /// A brace-delimited sequence of statements.
    Block {
        /// The statements, in source order.
        statements: Vec<AstNode>,
    },
    /// An `input { … }` subsection.
    InputDecl {
        /// The subsection's body.
        body: Box<AstNode>,
    },
    /// An `output { … }` subsection.
    OutputDecl {
        /// The subsection's body.
        body: Box<AstNode>,
    },
    /// A `runtime { … }` subsection.
    RuntimeDecl {
        /// `key: expr` members, in source order.
        members: Vec<Member>,
    },
    /// A `meta { … }` or `parameter_meta { … }` subsection.
    MetaDecl {
        /// The keyword token that introduced it (`meta` or
        /// `parameter_meta`), since both share one payload shape.
        name: Token,
        /// `key: value` members. A value may itself be a [`NodePayload::MapExpr`]
        /// to represent a nested meta object.
        members: Vec<Member>,
    },
    /// A `command <<< … >>>` block.
    CommandDecl {
        /// The raw command body, exactly as captured by the lexer.
        body: Token,
        /// The `~{ident}` interpolations found in the body, in order of
        /// appearance.
        interpolations: Vec<Token>,
    },
    /// A `call` construct.
    CallDecl {
        /// The callee, always a [`NodePayload::MemberAccess`].
        callee: Box<AstNode>,
        /// The `as alias` name, if present.
        alias: Option<Token>,
        /// `name = expr` input arguments, in source order.
        args: Vec<Member>,
    },
    /// A `object.member` access, or the callee position of a `call`.
    MemberAccess {
        /// The object being accessed.
        object: Box<AstNode>,
        /// The member. May itself be a [`NodePayload::FuncCall`] for chained
        /// method calls.
        member: Box<AstNode>,
    },
    /// An `if cond then a else b` conditional, used for both the statement
    /// form and the ternary expression form.
    IfStmt {
        /// The condition.
        condition: Box<AstNode>,
        /// The taken branch.
        then_branch: Box<AstNode>,
        /// The alternative branch, if present.
        else_branch: Option<Box<AstNode>>,
    },
    /// A `while (cond) { body }` loop.
    WhileStmt {
        /// The loop condition.
        condition: Box<AstNode>,
        /// The loop body.
        body: Box<AstNode>,
    },
    /// A `do { body } while (cond)` loop.
    DoWhileStmt {
        /// The loop condition.
        condition: Box<AstNode>,
        /// The loop body.
        body: Box<AstNode>,
    },
    /// A `scatter (x in collection) { body }` block.
    ScatterStmt {
        /// The loop variable's name.
        loop_var: Token,
        /// The collection expression iterated over.
        collection: Box<AstNode>,
        /// The scatter body.
        body: Box<AstNode>,
    },
    /// A `return expr?` statement.
    ReturnStmt {
        /// The returned expression, if present.
        expr: Option<Box<AstNode>>,
    },
    /// An expression used as a statement.
    ExprStmt {
        /// The expression.
        expr: Box<AstNode>,
    },
    /// A binary operator expression.
    BinaryExpr {
        /// The left operand.
        left: Box<AstNode>,
        /// The operator token.
        op: Token,
        /// The right operand.
        right: Box<AstNode>,
    },
    /// A prefix unary operator expression.
    UnaryExpr {
        /// The operator token.
        op: Token,
        /// The operand.
        operand: Box<AstNode>,
    },
    /// An `lvalue = expr` assignment.
    AssignExpr {
        /// The assignment target.
        left: Box<AstNode>,
        /// The assigned value.
        right: Box<AstNode>,
    },
    /// A literal value (string, number, or boolean).
    Literal {
        /// The literal token, carrying its value payload for numbers.
        token: Token,
    },
    /// A bare identifier reference.
    Ident {
        /// The identifier token.
        token: Token,
    },
    /// A function call.
    FuncCall {
        /// The called function, usually an [`NodePayload::Ident`] or
        /// [`NodePayload::MemberAccess`].
        callee: Box<AstNode>,
        /// The positional/keyword arguments.
        args: Vec<AstNode>,
        /// A leading `default=expr` argument, if present.
        default_arg: Option<Box<AstNode>>,
    },
    /// An `[a, b, c]` array literal.
    ArrayExpr {
        /// The elements, in source order.
        elements: Vec<AstNode>,
    },
    /// A `{k: v, …}` map literal.
    MapExpr {
        /// The entries, in source order.
        entries: Vec<MapEntry>,
    },
    /// A `(first, second)` pair literal.
    PairExpr {
        /// The first element.
        first: Box<AstNode>,
        /// The second element.
        second: Box<AstNode>,
    },
}

impl NodePayload {
    /// The [`NodeKind`] discriminant for this payload.
    fn kind(&self) -> NodeKind {
        match self {
            Self::Program { .. } => NodeKind::Program,
            Self::VersionDecl { .. } => NodeKind::VersionDecl,
            Self::ImportDecl { .. } => NodeKind::ImportDecl,
            Self::StructDecl { .. } => NodeKind::StructDecl,
            Self::ClassDecl { .. } => NodeKind::ClassDecl,
            Self::FuncDecl { .. } => NodeKind::FuncDecl,
            Self::VarDecl { .. } => NodeKind::VarDecl,
            Self::TypeNode { .. } => NodeKind::TypeNode,
            Self::Block { .. } => NodeKind::Block,
            Self::InputDecl { .. } => NodeKind::InputDecl,
            Self::OutputDecl { .. } => NodeKind::OutputDecl,
            Self::RuntimeDecl { .. } => NodeKind::RuntimeDecl,
            Self::MetaDecl { .. } => NodeKind::MetaDecl,
            Self::CommandDecl { .. } => NodeKind::CommandDecl,
            Self::CallDecl { .. } => NodeKind::CallDecl,
            Self::MemberAccess { .. } => NodeKind::MemberAccess,
            Self::IfStmt { .. } => NodeKind::IfStmt,
            Self::WhileStmt { .. } => NodeKind::WhileStmt,
            Self::DoWhileStmt { .. } => NodeKind::DoWhileStmt,
            Self::ScatterStmt { .. } => NodeKind::ScatterStmt,
            Self::ReturnStmt { .. } => NodeKind::ReturnStmt,
            Self::ExprStmt { .. } => NodeKind::ExprStmt,
            Self::BinaryExpr { .. } => NodeKind::BinaryExpr,
            Self::UnaryExpr { .. } => NodeKind::UnaryExpr,
            Self::AssignExpr { .. } => NodeKind::AssignExpr,
            Self::Literal { .. } => NodeKind::Literal,
            Self::Ident { .. } => NodeKind::Ident,
            Self::FuncCall { .. } => NodeKind::FuncCall,
            Self::ArrayExpr { .. } => NodeKind::ArrayExpr,
            Self::MapExpr { .. } => NodeKind::MapExpr,
            Self::PairExpr { .. } => NodeKind::PairExpr,
        }
    }
}

/// A single AST node.
///
/// `payload` is boxed so that recursive variants (almost all of them) don't
/// make [`NodePayload`] infinitely sized, and so that a tree's interior
/// nodes are a single pointer wide regardless of which variant they hold.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    /// This node's shape discriminant.
    pub kind: NodeKind,
    /// Where this node begins in the source.
    pub location: SourceLocation,
    /// The node's data.
    pub payload: Box<NodePayload>,
}

impl AstNode {
    /// Creates a new node, deriving `kind` from `payload`.
    pub fn new(location: SourceLocation, payload: NodePayload) -> Self {
        Self {
            kind: payload.kind(),
            location,
            payload: Box::new(payload),
        }
    }
}
