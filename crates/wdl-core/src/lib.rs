//! Common functionality used across the `wdl-front` family of crates.
//!
//! This crate has no knowledge of WDL grammar or tokens; it only defines the
//! source-position and diagnostic types shared by [`wdl-grammar`][1] and
//! [`wdl-ast`][2], plus the [`Limits`] that bound list sizes during parsing.
//!
//! [1]: https://docs.rs/wdl-grammar
//! [2]: https://docs.rs/wdl-ast

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::missing_docs_in_private_items)]

mod diagnostic;
mod limits;
mod location;

pub use diagnostic::Diagnostic;
pub use diagnostic::DiagnosticKind;
pub use diagnostic::Severity;
pub use limits::Limits;
pub use location::SourceLocation;
pub use location::Span;
