//! Configurable hard caps on list sizes during parsing.

/// Hard caps on the sizes of the various comma-separated lists the parser
/// accumulates (function parameters, call arguments, array/map elements).
///
/// Exceeding a limit is reported as a [`DiagnosticKind::TooMany`][crate::DiagnosticKind::TooMany]
/// diagnostic but is not fatal: the parser keeps consuming the list so that
/// later input is not misinterpreted.
///
/// The defaults match the 255-element cap used throughout the grammar this
/// crate is grounded on; embedders that want to tolerate larger lists (for
/// example, an IDE integration that would rather flag the list in a lint
/// pass than refuse to parse it) can relax them via [`Parser::with_limits`][1].
///
/// [1]: https://docs.rs/wdl-ast/latest/wdl_ast/struct.Parser.html#method.with_limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The maximum number of parameters in a function or method
    /// declaration.
    pub max_params: usize,
    /// The maximum number of arguments in a function call or `call`
    /// construct's input list.
    pub max_args: usize,
    /// The maximum number of elements in an array or map literal.
    pub max_list_items: usize,
}

impl Limits {
    /// The default limits: 255 for every list, matching the grammar this
    /// crate is grounded on.
    pub const DEFAULT: Self = Self {
        max_params: 255,
        max_args: 255,
        max_list_items: 255,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
