//! An abstract syntax tree and recursive-descent parser for the Workflow
//! Description Language (WDL).
//!
//! ```
//! use wdl_ast::Parser;
//! use wdl_grammar::Lexer;
//!
//! let lexer = Lexer::new("version 1.0\nworkflow W { }\n");
//! let (program, diagnostics) = Parser::new(lexer).parse_program();
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.kind, wdl_ast::NodeKind::Program);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::missing_docs_in_private_items)]

mod node;
mod parser;
mod visitor;

pub use node::AstNode;
pub use node::MapEntry;
pub use node::Member;
pub use node::NodeKind;
pub use node::NodePayload;
pub use parser::Parser;
pub use visitor::tree_to_string;
pub use visitor::walk;
pub use visitor::write_tree;
pub use visitor::KindCounter;
pub use visitor::Visitor;
