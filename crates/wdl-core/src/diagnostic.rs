//! Diagnostics displayed to users.

use std::fmt;

use crate::SourceLocation;

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Severity {
    /// The diagnostic is an error: the parser could not make sense of the
    /// input at this location and recorded an error node or skipped a token.
    Error,
    /// The diagnostic is a warning: parsing succeeded, but the input is
    /// suspicious.
    Warning,
    /// The diagnostic is informational.
    Note,
}

impl Severity {
    /// The tag used when rendering a diagnostic line (e.g. `ERROR`).
    fn tag(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Note => "NOTE",
        }
    }
}

/// The category of condition a [`Diagnostic`] reports.
///
/// Grouping messages behind an enum (rather than building every message with
/// ad hoc `format!` calls at the call site) keeps the wording of each
/// category consistent and gives a single place to adjust it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticKind {
    /// An unrecognized byte or code point was encountered outside of a
    /// string literal or command body.
    #[error("unexpected character")]
    UnexpectedCharacter,
    /// A string literal was not closed before the end of the source.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A `command <<< … >>>` block was not closed before the end of the
    /// source.
    #[error("unterminated command block")]
    UnterminatedCommand,
    /// A numeric literal contained more than one `.`.
    #[error("malformed number literal: multiple decimal points")]
    MalformedNumber,
    /// A specific token kind was expected but not found.
    #[error("{0}")]
    Expected(String),
    /// A list (parameters, arguments, array/map elements) exceeded the
    /// configured [`Limits`][crate::Limits].
    #[error("too many {what} (maximum is {max})")]
    TooMany {
        /// What kind of list overflowed (e.g. `"parameters"`).
        what: &'static str,
        /// The configured maximum.
        max: usize,
    },
    /// An unsupported WDL version was named in a `version` statement.
    #[error("unsupported WDL version `{0}`")]
    UnsupportedVersion(String),
}

/// A diagnostic to display to the user.
///
/// Renders via [`Display`][fmt::Display] to the line format
/// `[SEVERITY] [line N] at 'lexeme': message`, matching the format emitted
/// by this crate's own internal logging (see `wdl-ast`'s use of the `log`
/// facade).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    severity: Severity,
    /// The underlying condition.
    kind: DiagnosticKind,
    /// The location of the offending token, if any (absent only for
    /// diagnostics synthesized without a current token, which does not
    /// happen in this crate today but is left possible for embedders).
    location: Option<SourceLocation>,
    /// The lexeme of the offending token (`"end"`'s lexeme is the literal
    /// text `"end"` per the `Eof` convention from the specification).
    lexeme: String,
    /// True when the offending token was `Eof` (renders "at end" instead of
    /// "at '<lexeme>'").
    at_end: bool,
}

impl Diagnostic {
    /// Creates a new error-severity diagnostic.
    pub fn error(kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            location: None,
            lexeme: String::new(),
            at_end: false,
        }
    }

    /// Creates a new warning-severity diagnostic.
    pub fn warning(kind: DiagnosticKind) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            location: None,
            lexeme: String::new(),
            at_end: false,
        }
    }

    /// Attaches the location of the offending token.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches the lexeme of the offending token.
    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = lexeme.into();
        self
    }

    /// Marks this diagnostic as having occurred at end-of-file.
    pub fn at_end(mut self) -> Self {
        self.at_end = true;
        self
    }

    /// The severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The underlying condition.
    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    /// The location of the offending token, if known.
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.location.map(|l| l.line).unwrap_or(0);
        write!(f, "[{}] [line {line}] ", self.severity.tag())?;
        if self.at_end {
            write!(f, "at end")?;
        } else {
            write!(f, "at '{}'", self.lexeme)?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for Diagnostic {}
