//! Lexical analysis for the Workflow Description Language (WDL).
//!
//! This crate owns the token vocabulary ([`TokenKind`]) and the [`Lexer`]
//! that turns normalized source text into a stream of [`Token`]s. It has no
//! notion of grammar productions — that lives one layer up, in `wdl-ast`.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::missing_docs_in_private_items)]

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::Literal;
pub use token::Token;
pub use token::TokenKind;
