//! The lexer implementation.
//!
//! The lexer is a hand-written, pull-driven scanner over the normalized
//! source text. It is deliberately not built on a regex-automaton lexer
//! generator: the command-block capture (scan raw text until the literal
//! `>>>`) and the multi-dot numeric-literal check need to inspect a
//! contiguous run of characters under their own custom rule rather than a
//! single longest-match regex, so a small hand-rolled state machine is the
//! more direct tool here — the same shape the grammar this crate is
//! grounded on uses.

use std::rc::Rc;

use wdl_core::SourceLocation;
use wdl_core::Span;

use crate::token::Literal;
use crate::token::Token;
use crate::token::TokenKind;

/// Reserved words, matched case-insensitively on the lowercased lexeme.
///
/// `command` is deliberately absent: it never survives as a standalone
/// keyword token. Recognizing the identifier `command` instead triggers the
/// heredoc capture in [`Lexer::lex`], which returns a single
/// [`TokenKind::Command`] token carrying the body.
const RESERVED_WORDS: &[(&str, TokenKind)] = &[
    ("and", TokenKind::LogicalAnd),
    ("or", TokenKind::LogicalOr),
    ("xor", TokenKind::Xor),
    ("not", TokenKind::LogicalNot),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("then", TokenKind::Then),
    ("do", TokenKind::Do),
    ("while", TokenKind::While),
    ("return", TokenKind::Return),
    ("task", TokenKind::Type),
    ("workflow", TokenKind::Type),
    ("struct", TokenKind::Type),
    ("class", TokenKind::Type),
    ("input", TokenKind::Input),
    ("output", TokenKind::Output),
    ("runtime", TokenKind::Runtime),
    ("parameter_meta", TokenKind::Meta),
    ("meta", TokenKind::Meta),
    ("call", TokenKind::Call),
    ("import", TokenKind::Import),
    ("as", TokenKind::As),
    ("scatter", TokenKind::Scatter),
    ("in", TokenKind::In),
    ("default", TokenKind::Default),
    ("true", TokenKind::BooleanLiteral),
    ("false", TokenKind::BooleanLiteral),
    // Type words (§4.1 rule 8).
    ("int", TokenKind::Type),
    ("float", TokenKind::Type),
    ("string", TokenKind::Type),
    ("bool", TokenKind::Type),
    ("boolean", TokenKind::Type),
    ("char", TokenKind::Type),
    ("file", TokenKind::Type),
    ("array", TokenKind::Type),
    ("map", TokenKind::Type),
    ("pair", TokenKind::Type),
];

/// Looks up a reserved/type keyword by its lowercased spelling.
fn reserved_word(lowercased: &str) -> Option<TokenKind> {
    RESERVED_WORDS
        .iter()
        .find(|(word, _)| *word == lowercased)
        .map(|(_, kind)| *kind)
}

/// Normalizes source text: CRLF → LF, stray CR dropped, runs of consecutive
/// LF collapsed to one, and a leading UTF-8 BOM stripped.
fn normalize(source: &str) -> String {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut last_was_newline = false;

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    continue;
                }
                if !last_was_newline {
                    result.push('\n');
                }
                last_was_newline = true;
            }
            '\n' => {
                if !last_was_newline {
                    result.push('\n');
                }
                last_was_newline = true;
            }
            other => {
                result.push(other);
                last_was_newline = false;
            }
        }
    }

    result
}

/// The WDL lexer.
///
/// Cloning a `Lexer` is cheap: the normalized source is held behind an
/// [`Rc<str>`] (shared, never mutated after construction) and the rest of
/// the state is a handful of integers, so [`Lexer::clone`] never copies the
/// source text. This is what lets [`Parser::peek`][1] clone the lexer for a
/// one-token lookahead without it being an O(source) operation.
///
/// [1]: https://docs.rs/wdl-ast/latest/wdl_ast/struct.Parser.html#method.peek
#[derive(Debug, Clone)]
pub struct Lexer {
    /// The normalized source text.
    source: Rc<str>,
    /// The byte offset of the current character.
    position: usize,
    /// The 1-based line of the current character.
    line: u32,
    /// The 1-based column of the current character.
    column: u32,
}

impl Lexer {
    /// Creates a new lexer over `source`, normalizing it first.
    pub fn new(source: &str) -> Self {
        log::trace!("constructing lexer over {} bytes of source", source.len());
        Self {
            source: Rc::from(normalize(source)),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns an independent copy of this lexer, positioned identically.
    ///
    /// Mutating the clone (by calling [`Lexer::lex`]) never affects the
    /// original.
    pub fn clone_for_peek(&self) -> Self {
        self.clone()
    }

    /// The current location, i.e. the location that the next token returned
    /// by [`Lexer::lex`] will start at (assuming no intervening whitespace
    /// or comments — the real start location is recomputed after those are
    /// skipped).
    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position as u32)
    }

    /// The current character, or `None` at end of input.
    fn current(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// The character after the current one, or `None` if there isn't one.
    fn peek_char(&self) -> Option<char> {
        let mut chars = self.source[self.position..].chars();
        chars.next()?;
        chars.next()
    }

    /// Advances past the current character by one codepoint, updating line
    /// and column bookkeeping.
    fn bump(&mut self) {
        if let Some(c) = self.current() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips contiguous spaces and tabs (but not newlines, which are
    /// meaningful tokens).
    fn skip_horizontal_whitespace(&mut self) {
        while matches!(self.current(), Some(' ') | Some('\t')) {
            self.bump();
        }
    }

    /// Skips a `#` or `//` comment, up to (but not including) the
    /// terminating newline.
    fn skip_comment(&mut self) {
        while !matches!(self.current(), None | Some('\n')) {
            self.bump();
        }
    }

    /// Produces the next token.
    ///
    /// Never blocks. Returns a [`TokenKind::Eof`] token forever once the
    /// input is exhausted.
    pub fn lex(&mut self) -> Token {
        loop {
            self.skip_horizontal_whitespace();
            match self.current() {
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some('/') if self.peek_char() == Some('/') => {
                    self.skip_comment();
                    continue;
                }
                _ => break,
            }
        }

        let start = self.location();
        let start_pos = self.position;

        let Some(c) = self.current() else {
            return Token::new(TokenKind::Eof, "", start, Span::new(start_pos as u32, 0));
        };

        macro_rules! single {
            ($kind:expr) => {{
                self.bump();
                self.finish(start, start_pos, $kind)
            }};
        }

        match c {
            '\n' => {
                self.bump();
                self.finish(start, start_pos, TokenKind::Endl)
            }
            ';' => single!(TokenKind::Endl),
            '(' => single!(TokenKind::LParen),
            ')' => single!(TokenKind::RParen),
            '{' => single!(TokenKind::LCurly),
            '}' => single!(TokenKind::RCurly),
            '[' => single!(TokenKind::LSquare),
            ']' => single!(TokenKind::RSquare),
            ':' => single!(TokenKind::Colon),
            ',' => single!(TokenKind::Comma),
            '.' => single!(TokenKind::Dot),
            '?' => single!(TokenKind::Question),
            '%' => single!(TokenKind::Modulo),
            '+' => single!(TokenKind::Plus),
            '-' => single!(TokenKind::Minus),
            '*' => single!(TokenKind::Star),
            '\\' => single!(TokenKind::BSlash),
            '=' => {
                self.bump();
                if self.current() == Some('=') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::Equality)
                } else {
                    self.finish(start, start_pos, TokenKind::Assign)
                }
            }
            '!' => {
                self.bump();
                if self.current() == Some('=') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::Neq)
                } else {
                    self.finish(start, start_pos, TokenKind::Not)
                }
            }
            '&' => {
                self.bump();
                if self.current() == Some('&') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::And)
                } else {
                    self.finish(start, start_pos, TokenKind::Ampersand)
                }
            }
            '|' => {
                self.bump();
                if self.current() == Some('|') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::Or)
                } else {
                    self.finish(start, start_pos, TokenKind::Pipe)
                }
            }
            '~' => single!(TokenKind::Ellipses),
            '<' => {
                self.bump();
                if self.current() == Some('=') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::LessOrEqual)
                } else if self.current() == Some('<') {
                    self.bump();
                    if self.current() == Some('<') {
                        self.bump();
                        self.finish(start, start_pos, TokenKind::LShiftAssign)
                    } else {
                        self.finish(start, start_pos, TokenKind::LShift)
                    }
                } else {
                    self.finish(start, start_pos, TokenKind::LessThan)
                }
            }
            '>' => {
                self.bump();
                if self.current() == Some('=') {
                    self.bump();
                    self.finish(start, start_pos, TokenKind::GreaterOrEqual)
                } else if self.current() == Some('>') {
                    self.bump();
                    if self.current() == Some('>') {
                        self.bump();
                        self.finish(start, start_pos, TokenKind::RShiftAssign)
                    } else {
                        self.finish(start, start_pos, TokenKind::RShift)
                    }
                } else {
                    self.finish(start, start_pos, TokenKind::GreaterThan)
                }
            }
            '/' => single!(TokenKind::FSlash),
            '"' | '\'' => self.lex_string(c, start, start_pos),
            '0'..='9' => self.lex_number(start, start_pos),
            c if c.is_alphabetic() || c == '_' => self.lex_identifier(start, start_pos),
            '\u{2227}' => single!(TokenKind::LogicalAnd),
            '\u{2228}' => single!(TokenKind::LogicalOr),
            '\u{00ac}' => single!(TokenKind::Xor),
            _ => {
                self.bump();
                let lexeme = self.source[start_pos..self.position].to_string();
                log::warn!("unexpected character {lexeme:?} at {start}");
                Token::new(TokenKind::Error, lexeme, start, self.span_from(start_pos))
            }
        }
    }

    /// Builds the [`Span`] from `start_pos` to the current position.
    fn span_from(&self, start_pos: usize) -> Span {
        Span::from_bounds(start_pos as u32, self.position as u32)
    }

    /// Builds a [`Token`] whose lexeme is the source slice from `start_pos`
    /// to the current position.
    fn finish(&self, start: SourceLocation, start_pos: usize, kind: TokenKind) -> Token {
        let lexeme = self.source[start_pos..self.position].to_string();
        Token::new(kind, lexeme, start, self.span_from(start_pos))
    }

    /// Lexes a quoted string literal. The lexeme includes the surrounding
    /// quote characters; escape sequences are not interpreted at this stage
    /// (they are simply part of the lexeme).
    fn lex_string(&mut self, quote: char, start: SourceLocation, start_pos: usize) -> Token {
        self.bump(); // opening quote
        loop {
            match self.current() {
                None => {
                    let lexeme = self.source[start_pos..self.position].to_string();
                    log::warn!("unterminated string literal starting at {start}");
                    return Token::new(TokenKind::Error, lexeme, start, self.span_from(start_pos));
                }
                Some(c) if c == quote => {
                    self.bump();
                    return self.finish(start, start_pos, TokenKind::StringLiteral);
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// Lexes a numeric literal: digits, at most one `.`, with `_` allowed
    /// as a separator anywhere in the run.
    fn lex_number(&mut self, start: SourceLocation, start_pos: usize) -> Token {
        let mut dots = 0u32;
        while let Some(c) = self.current() {
            match c {
                '0'..='9' | '_' => self.bump(),
                '.' => {
                    dots += 1;
                    self.bump();
                }
                _ => break,
            }
        }

        let lexeme = self.source[start_pos..self.position].to_string();
        let span = self.span_from(start_pos);

        if dots > 1 {
            log::warn!("malformed number literal {lexeme:?} at {start}");
            return Token::new(TokenKind::Error, lexeme, start, span);
        }

        let cleaned: String = lexeme.chars().filter(|c| *c != '_').collect();
        let literal = if dots == 1 {
            Literal::Float(cleaned.parse().unwrap_or(0.0))
        } else {
            Literal::Integer(cleaned.parse().unwrap_or(0))
        };

        Token::new(TokenKind::NumberLiteral, lexeme, start, span).with_literal(literal)
    }

    /// Lexes an identifier, reassigning its kind if it matches a reserved
    /// word (§4.1 rule 3), and handling the `command <<< … >>>`
    /// heredoc-capture special case (§4.1 rule 4).
    fn lex_identifier(&mut self, start: SourceLocation, start_pos: usize) -> Token {
        self.bump();
        while matches!(self.current(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }

        let lexeme = self.source[start_pos..self.position].to_string();
        let lowercased = lexeme.to_lowercase();

        if lowercased == "command" {
            return self.lex_command_block(start, start_pos);
        }

        let kind = reserved_word(&lowercased).unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, start, self.span_from(start_pos))
    }

    /// Captures a `command <<< … >>>` block as a single [`TokenKind::Command`]
    /// token whose lexeme is the raw text between the markers.
    ///
    /// Per §4.1 rule 4: the lexer reads the following `<<<` opener and then
    /// scans raw text until the literal sequence `>>>`. If that sequence is
    /// never found, the result is an unterminated-command-block error.
    fn lex_command_block(&mut self, start: SourceLocation, start_pos: usize) -> Token {
        self.skip_horizontal_whitespace();
        while self.current() == Some('\n') {
            self.bump();
            self.skip_horizontal_whitespace();
        }

        if self.current() != Some('<') || !self.source[self.position..].starts_with("<<<") {
            log::warn!("expected '<<<' after 'command' keyword at {start}");
            let lexeme = self.source[start_pos..self.position].to_string();
            return Token::new(TokenKind::Error, lexeme, start, self.span_from(start_pos));
        }
        self.bump();
        self.bump();
        self.bump();

        let body_start = self.position;
        match self.source[self.position..].find(">>>") {
            Some(offset) => {
                let body_end = body_start + offset;
                let body = self.source[body_start..body_end].to_string();
                // Advance past the body and the closing `>>>`, keeping line
                // and column counters correct by walking character-by-character.
                while self.position < body_end + 3 {
                    self.bump();
                }
                Token::new(TokenKind::Command, body, start, self.span_from(start_pos))
            }
            None => {
                self.position = self.source.len();
                log::warn!("unterminated command block starting at {start}");
                Token::new(
                    TokenKind::Error,
                    "Unterminated command block",
                    start,
                    self.span_from(start_pos),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.lex();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn it_collapses_consecutive_newlines() {
        let lexer = Lexer::new("a\n\n\n\nb");
        assert_eq!(lexer.source.matches('\n').count(), 1);
    }

    #[test]
    fn it_normalizes_crlf_to_lf() {
        let lexer = Lexer::new("a\r\nb\rc");
        assert_eq!(&*lexer.source, "a\nb\nc");
    }

    #[test]
    fn it_strips_a_leading_bom() {
        let lexer = Lexer::new("\u{feff}version");
        assert_eq!(&*lexer.source, "version");
    }

    #[test]
    fn it_lexes_simple_punctuation() {
        assert_eq!(
            kinds("(){}[]:,.?%"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LCurly,
                TokenKind::RCurly,
                TokenKind::LSquare,
                TokenKind::RSquare,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Question,
                TokenKind::Modulo,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn it_disambiguates_shift_family_operators() {
        assert_eq!(
            kinds("< <= << <<< > >= >> >>>"),
            vec![
                TokenKind::LessThan,
                TokenKind::LessOrEqual,
                TokenKind::LShift,
                TokenKind::LShiftAssign,
                TokenKind::GreaterThan,
                TokenKind::GreaterOrEqual,
                TokenKind::RShift,
                TokenKind::RShiftAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn it_maps_mathematical_unicode_operators() {
        assert_eq!(
            kinds("\u{2227} \u{2228} \u{00ac}"),
            vec![TokenKind::LogicalAnd, TokenKind::LogicalOr, TokenKind::Xor, TokenKind::Eof]
        );
    }

    #[test]
    fn it_reassigns_reserved_words_case_insensitively() {
        assert_eq!(kinds("AND Or XOR"), vec![TokenKind::LogicalAnd, TokenKind::LogicalOr, TokenKind::Xor, TokenKind::Eof]);
    }

    #[test]
    fn it_recognizes_type_keywords() {
        for word in ["Int", "Float", "String", "Boolean", "Array", "Map", "Pair", "File"] {
            let tokens = lex_all(word);
            assert_eq!(tokens[0].kind, TokenKind::Type, "{word} should lex as Type");
        }
    }

    #[test]
    fn it_parses_integer_literal_payload() {
        let tokens = lex_all("42");
        assert_eq!(tokens[0].literal, Some(Literal::Integer(42)));
    }

    #[test]
    fn it_parses_float_literal_payload() {
        let tokens = lex_all("3.14");
        assert_eq!(tokens[0].literal, Some(Literal::Float(3.14)));
    }

    #[test]
    fn it_allows_underscore_separators_in_numbers() {
        let tokens = lex_all("1_000_000");
        assert_eq!(tokens[0].literal, Some(Literal::Integer(1_000_000)));
    }

    #[test]
    fn it_flags_multiple_decimal_points_as_an_error() {
        let tokens = lex_all("1.2.3");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn it_captures_a_command_block_body_verbatim() {
        let tokens = lex_all("command <<< echo ~{name} >>>");
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(tokens[0].lexeme, " echo ~{name} ");
    }

    #[test]
    fn it_flags_an_unterminated_command_block() {
        let tokens = lex_all("command <<< echo hi");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn it_treats_semicolons_and_newlines_as_endl() {
        assert_eq!(kinds("a;\nb"), vec![TokenKind::Ident, TokenKind::Endl, TokenKind::Endl, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn it_skips_hash_and_slash_comments() {
        assert_eq!(kinds("a # comment\nb // another\nc"), vec![
            TokenKind::Ident,
            TokenKind::Endl,
            TokenKind::Ident,
            TokenKind::Endl,
            TokenKind::Ident,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn it_flags_unterminated_strings() {
        let tokens = lex_all("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn it_does_not_process_escapes_so_a_backslash_quote_terminates_the_string() {
        // No escape processing at this stage (§4.1 rule 5): the backslash is
        // ordinary content, so the quote immediately following it ends the
        // literal. What remains (`b"`) lexes as an identifier followed by a
        // fresh, here-unterminated string.
        let tokens = lex_all(r#""a\"b""#);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "\"a\\\"");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].lexeme, "b");
        assert_eq!(tokens[2].kind, TokenKind::Error);
    }

    #[test]
    fn it_clones_without_affecting_the_original() {
        let mut lexer = Lexer::new("a b");
        let mut clone = lexer.clone_for_peek();
        let peeked = clone.lex();
        assert_eq!(peeked.kind, TokenKind::Ident);
        let original = lexer.lex();
        assert_eq!(original.kind, TokenKind::Ident);
        assert_eq!(original.lexeme, "a");
    }
}
