//! Main lexer implementation for the Dart subset.
//!
//! The lexer dispatches on the first character of every token and hands
//! multi-character operators to one `lex_*` helper per family, ordered so
//! the longest match always wins (`>>>` before `>>` before `>`, `...?`
//! before `...` before `..`). Illegal characters are reported and
//! skipped; the scan continues with the next byte.

use dartan_util::{Diagnostic, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token, TokenKind, TokenValue};

/// Tokenize a complete source string.
///
/// Returns every recognized token (the `Eof` sentinel is not included)
/// together with the lexical diagnostics. The lexer never aborts.
///
/// # Example
///
/// ```
/// use dartan_lex::tokenize;
///
/// let (tokens, errors) = tokenize("var x = 1; @");
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(errors.len(), 1);
/// assert!(errors[0].message.contains("'@'"));
/// ```
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let handler = Handler::new();
    let mut tokens = Vec::new();
    {
        let mut lexer = Lexer::new(source, &handler);
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
    }
    (tokens, handler.into_diagnostics())
}

/// Compute the 1-based column of a byte offset.
///
/// Scans back to the previous line feed and counts bytes plus one, which
/// is exactly how the lexer assigns columns while scanning forward.
///
/// # Example
///
/// ```
/// use dartan_lex::find_column;
///
/// let source = "ab\ncdef";
/// assert_eq!(find_column(source, 0), 1);
/// assert_eq!(find_column(source, 5), 3);
/// ```
pub fn find_column(source: &str, offset: usize) -> u32 {
    let offset = offset.min(source.len());
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    (offset - line_start + 1) as u32
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The lexer state machine.
///
/// Holds a [`Cursor`] over the source and the diagnostic handler of the
/// lexical pass. Tokens are produced on demand by [`Lexer::next_token`].
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Diagnostic collector of this pass.
    handler: &'a Handler,

    /// Byte offset where the current token starts.
    token_start: usize,

    /// Line of the current token start.
    token_start_line: u32,

    /// Column of the current token start.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source` reporting into `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Produce the next token, or an `Eof` token at end of input.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return Token::new(TokenKind::Eof, "", self.span());
            }

            return match self.cursor.current_char() {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '[' => self.single(TokenKind::LBracket),
                ']' => self.single(TokenKind::RBracket),
                ';' => self.single(TokenKind::Semicolon),
                ',' => self.single(TokenKind::Comma),
                ':' => self.single(TokenKind::Colon),
                '^' => self.single(TokenKind::Caret),

                '+' => self.lex_plus(),
                '-' => self.lex_minus(),
                '*' => self.lex_star(),
                '/' => self.lex_slash(),
                '%' => self.lex_percent(),
                '~' => self.lex_tilde(),
                '=' => self.lex_equals(),
                '!' => self.lex_bang(),
                '<' => self.lex_less(),
                '>' => self.lex_greater(),
                '&' => self.lex_ampersand(),
                '|' => self.lex_pipe(),
                '?' => self.lex_question(),
                '.' => self.lex_dot(),

                '"' | '\'' => self.lex_string(),

                c if is_ident_start(c) => self.lex_identifier(),
                c if c.is_ascii_digit() => self.lex_number(),

                c => {
                    self.handler.emit(Diagnostic::lexical(
                        self.token_start_line,
                        self.token_start_column,
                        format!(
                            "Carácter ilegal '{}' en línea {}, columna {}",
                            c, self.token_start_line, self.token_start_column
                        ),
                    ));
                    self.cursor.advance();
                    continue;
                }
            };
        }
    }

    /// Skip whitespace, `//` line comments and `/* … */` block comments.
    ///
    /// Line feeds inside comments advance the line counter through the
    /// cursor. An unterminated block comment is a lexical diagnostic.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.char_at(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                '/' if self.cursor.char_at(1) == '*' => {
                    let line = self.cursor.line();
                    let column = self.cursor.column();
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        if self.cursor.is_at_end() {
                            self.handler.emit(Diagnostic::lexical(
                                line,
                                column,
                                format!(
                                    "Comentario de bloque sin cerrar en línea {}, columna {}",
                                    line, column
                                ),
                            ));
                            break;
                        }
                        if self.cursor.current_char() == '*' && self.cursor.char_at(1) == '/' {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Identifier or reserved word.
    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, self.span())
    }

    /// Number literal: `[0-9]+(\.[0-9]+)?`. No exponent, hex or
    /// underscore forms in this subset.
    fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        // A dot only belongs to the number when digits follow; `1.foo`
        // stays NUMBER_INT DOT ID.
        let is_double =
            self.cursor.current_char() == '.' && self.cursor.char_at(1).is_ascii_digit();

        if is_double {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(self.token_start);
            let value = text.parse::<f64>().unwrap_or_else(|_| {
                self.report_at_token_start(format!(
                    "Número '{}' inválido en línea {}, columna {}",
                    text, self.token_start_line, self.token_start_column
                ));
                0.0
            });
            Token::with_value(
                TokenKind::NumberDouble,
                text,
                TokenValue::Double(value),
                self.span(),
            )
        } else {
            let text = self.cursor.slice_from(self.token_start);
            let value = text.parse::<i64>().unwrap_or_else(|_| {
                self.report_at_token_start(format!(
                    "Número entero '{}' fuera de rango en línea {}, columna {}",
                    text, self.token_start_line, self.token_start_column
                ));
                0
            });
            Token::with_value(
                TokenKind::NumberInt,
                text,
                TokenValue::Int(value),
                self.span(),
            )
        }
    }

    /// String literal, single- or double-quoted.
    ///
    /// The body may contain any character except a bare backslash or a
    /// line feed; `\` followed by any character is kept intact in the
    /// value. No raw/triple strings, no interpolation.
    fn lex_string(&mut self) -> Token {
        let quote = self.cursor.current_char();
        self.cursor.advance();

        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() || c == '\n' {
                self.report_at_token_start(format!(
                    "Cadena sin cerrar en línea {}, columna {}",
                    self.token_start_line, self.token_start_column
                ));
                let body = self.cursor.slice_from(self.token_start + 1).to_string();
                let lexeme = self.cursor.slice_from(self.token_start);
                return Token::with_value(
                    TokenKind::Str,
                    lexeme,
                    TokenValue::Str(body),
                    self.span(),
                );
            }
            if c == quote {
                break;
            }
            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    continue; // the EOF branch above reports on the next turn
                }
            }
            self.cursor.advance();
        }

        // Body without the delimiters; the closing quote is still pending.
        let body = self.cursor.slice_from(self.token_start + 1).to_string();
        self.cursor.advance();
        let lexeme = self.cursor.slice_from(self.token_start);
        Token::with_value(TokenKind::Str, lexeme, TokenValue::Str(body), self.span())
    }

    /// `+`, `++` or `+=`.
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            self.make(TokenKind::PlusPlus)
        } else if self.cursor.match_char('=') {
            self.make(TokenKind::PlusEq)
        } else {
            self.make(TokenKind::Plus)
        }
    }

    /// `-`, `--` or `-=`.
    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            self.make(TokenKind::MinusMinus)
        } else if self.cursor.match_char('=') {
            self.make(TokenKind::MinusEq)
        } else {
            self.make(TokenKind::Minus)
        }
    }

    /// `*` or `*=`.
    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::StarEq)
        } else {
            self.make(TokenKind::Star)
        }
    }

    /// `/` or `/=`. Comments were already consumed by the skipper.
    fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::SlashEq)
        } else {
            self.make(TokenKind::Slash)
        }
    }

    /// `%` or `%=`.
    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::PercentEq)
        } else {
            self.make(TokenKind::Percent)
        }
    }

    /// `~` or `~/`.
    fn lex_tilde(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('/') {
            self.make(TokenKind::TildeSlash)
        } else {
            self.make(TokenKind::Tilde)
        }
    }

    /// `=`, `==` or `=>`.
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::EqEq)
        } else if self.cursor.match_char('>') {
            self.make(TokenKind::FatArrow)
        } else {
            self.make(TokenKind::Eq)
        }
    }

    /// `!` or `!=`.
    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::BangEq)
        } else {
            self.make(TokenKind::Bang)
        }
    }

    /// `<`, `<=` or `<<`.
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::LtEq)
        } else if self.cursor.match_char('<') {
            self.make(TokenKind::Shl)
        } else {
            self.make(TokenKind::Lt)
        }
    }

    /// `>`, `>=`, `>>` or `>>>`.
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make(TokenKind::GtEq)
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('>') {
                self.make(TokenKind::Ushr)
            } else {
                self.make(TokenKind::Shr)
            }
        } else {
            self.make(TokenKind::Gt)
        }
    }

    /// `&` or `&&`.
    fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.make(TokenKind::AmpAmp)
        } else {
            self.make(TokenKind::Amp)
        }
    }

    /// `|` or `||`.
    fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            self.make(TokenKind::PipePipe)
        } else {
            self.make(TokenKind::Pipe)
        }
    }

    /// `?`, `??`, `?.` or `?..`.
    fn lex_question(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('?') {
            self.make(TokenKind::QuestionQuestion)
        } else if self.cursor.match_char('.') {
            if self.cursor.match_char('.') {
                self.make(TokenKind::QuestionDotDot)
            } else {
                self.make(TokenKind::QuestionDot)
            }
        } else {
            self.make(TokenKind::Question)
        }
    }

    /// `.`, `..`, `...` or `...?`.
    fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            if self.cursor.match_char('.') {
                if self.cursor.match_char('?') {
                    self.make(TokenKind::EllipsisQuestion)
                } else {
                    self.make(TokenKind::Ellipsis)
                }
            } else {
                self.make(TokenKind::DotDot)
            }
        } else {
            self.make(TokenKind::Dot)
        }
    }

    /// Consume one character and emit a single-character token.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make(kind)
    }

    /// Build a token from the recorded token start to the cursor.
    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.cursor.slice_from(self.token_start), self.span())
    }

    fn span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    fn report_at_token_start(&self, message: String) {
        self.handler.emit(Diagnostic::lexical(
            self.token_start_line,
            self.token_start_column,
            message,
        ));
    }
}
