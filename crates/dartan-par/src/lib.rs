//! dartan-par - Parser (syntactic analyzer) for the Dart subset.
//!
//! A recursive-descent parser over the token stream of `dartan-lex`.
//! Statements are recognized by one- and two-token lookahead;
//! expressions use Pratt parsing with the precedence ladder defined in
//! [`expr::bp`]. The classic dangling-else ambiguity is resolved by
//! binding every `else` to the nearest open `if`, which the recursive
//! structure does naturally.
//!
//! The parser never gives up: an unexpected token produces one syntax
//! diagnostic and the parser resynchronizes at the next statement
//! boundary (`;`, `}`, or a statement-starting keyword), so a single
//! run reports as many independent errors as possible. A (possibly
//! partial) [`Program`] is always returned.
//!
//! # Example
//!
//! ```
//! use dartan_par::parse_source;
//!
//! let (program, errors) = parse_source("int x = 5; x = 10;");
//! assert!(errors.is_empty());
//! assert_eq!(program.statements.len(), 2);
//! ```

pub mod ast;

mod edge_cases;
mod expr;
mod stmt;

pub use ast::*;

use dartan_lex::{tokenize, Token, TokenKind};
use dartan_util::{Diagnostic, Handler, Span};

/// Parse a token stream into a [`Program`] plus syntax diagnostics.
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let handler = Handler::new();
    let program = {
        let mut parser = Parser::new(tokens, &handler);
        parser.parse_program()
    };
    (program, handler.into_diagnostics())
}

/// Convenience: tokenize and parse in one step.
///
/// Lexical diagnostics are discarded; callers that need them run the
/// lexer separately (the driver does).
pub fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let (tokens, _) = tokenize(source);
    parse(tokens)
}

/// Recursive descent parser.
pub struct Parser<'a> {
    /// Token stream from the lexer.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Diagnostic collector of the syntactic pass.
    handler: &'a Handler,

    /// Synthesized end-of-input token, lazily positioned after the last
    /// real token.
    eof: Token,

    /// An unexpected end of input is reported exactly once.
    reported_eof: bool,
}

impl<'a> Parser<'a> {
    /// Create a parser over `tokens` reporting into `handler`.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        let eof_span = tokens
            .last()
            .map(|t| Span::point(t.span.end, t.span.line, t.span.column))
            .unwrap_or(Span::new(0, 0, 1, 1));
        Self {
            tokens,
            position: 0,
            handler,
            eof: Token::new(TokenKind::Eof, "", eof_span),
            reported_eof: false,
        }
    }

    /// Parse the whole token stream into a program.
    ///
    /// Statements that fail to parse are dropped and the parser
    /// resynchronizes; the surviving statements still form a tree.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let before = self.position;
            match self.parse_stmt() {
                Some(stmt) => statements.push(stmt),
                None => {
                    if self.position == before {
                        self.advance();
                    }
                    self.recover_to_sync_point();
                }
            }
        }

        Program { statements }
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// Current token (an `Eof` token past the end).
    pub(crate) fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    /// Kind of the current token.
    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Current index into the token stream (used by recovery loops to
    /// guarantee progress).
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Kind of the token `offset` positions ahead.
    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.position + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Advance to the next token.
    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    /// Consume and return the current token.
    pub(crate) fn bump(&mut self) -> Token {
        let token = self.current().clone();
        self.advance();
        token
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given kind; report and return `None`
    /// otherwise.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<Token> {
        if self.kind() == kind {
            Some(self.bump())
        } else {
            self.error_expected(expected);
            None
        }
    }

    // =========================================================================
    // ERROR REPORTING AND RECOVERY
    // =========================================================================

    /// Report the current token as unexpected.
    pub(crate) fn error_unexpected(&mut self) {
        self.error_with_detail(None);
    }

    /// Report the current token as unexpected, naming what was expected.
    pub(crate) fn error_expected(&mut self, expected: &str) {
        self.error_with_detail(Some(expected));
    }

    fn error_with_detail(&mut self, expected: Option<&str>) {
        if self.kind() == TokenKind::Eof {
            if !self.reported_eof {
                self.reported_eof = true;
                self.handler.emit(Diagnostic::syntax(
                    self.current().span.line,
                    "Error sintáctico: fin de entrada inesperado".to_string(),
                ));
            }
            return;
        }

        let token = self.current();
        let line = token.span.line;
        let message = match expected {
            Some(expected) => format!(
                "Error sintáctico en línea {}: token inesperado '{}' ({}), se esperaba {}",
                line, token.lexeme, token.kind, expected
            ),
            None => format!(
                "Error sintáctico en línea {}: token inesperado '{}' ({})",
                line, token.lexeme, token.kind
            ),
        };
        self.handler.emit(Diagnostic::syntax(line, message));
    }

    /// Skip ahead to the next statement boundary.
    ///
    /// Stops after a `;`, or right before a `}` or a statement-starting
    /// keyword, so the enclosing production can pick up from there.
    pub(crate) fn recover_to_sync_point(&mut self) {
        while !self.is_at_end() {
            match self.kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Return
                | TokenKind::Class
                | TokenKind::Var
                | TokenKind::Final
                | TokenKind::Const
                | TokenKind::Void => return,
                _ => self.advance(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_program() {
        let (program, errors) = parse_source("");
        assert!(program.statements.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_partial_tree_on_error() {
        // The bad second statement is dropped, the rest survives.
        let (program, errors) = parse_source("int a = 1; int b = ; int c = 3;");
        assert!(!errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_multiple_errors_reported() {
        let (_, errors) = parse_source("int a = ; int b = ;");
        assert_eq!(errors.len(), 2);
        for error in &errors {
            assert!(error.message.starts_with("Error sintáctico en línea"));
        }
    }

    #[test]
    fn test_unexpected_eof_reported_once() {
        let (_, errors) = parse_source("if (a");
        let eof_errors: Vec<_> = errors
            .iter()
            .filter(|e| e.message.contains("fin de entrada"))
            .collect();
        assert_eq!(eof_errors.len(), 1);
    }

    #[test]
    fn test_error_message_names_token() {
        let (_, errors) = parse_source("int x = );");
        assert!(!errors.is_empty());
        assert!(errors[0].message.contains("')'"));
        assert!(errors[0].message.contains("RPAREN"));
        assert!(errors[0].message.contains("línea 1"));
    }

    #[test]
    fn test_recovery_at_statement_keyword() {
        // Error inside the first statement; parsing must resume at
        // `while` without consuming it.
        let (program, errors) = parse_source("int x = @; while (true) { }");
        // '@' is a lexical error; the parser then sees `int x = ;`.
        let _ = errors;
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Stmt::While(_))));
    }
}
