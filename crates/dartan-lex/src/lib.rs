//! dartan-lex - Lexical analyzer for the Dart subset.
//!
//! Transforms UTF-8 source text into a finite sequence of [`Token`]s.
//! Whitespace, `//` line comments and `/* … */` block comments are
//! skipped; line feeds inside comments still advance the line counter.
//! Tokens are resolved by maximal munch: the longest matching kind wins,
//! so `>>>` is one token, not three, and `...?` never splits.
//!
//! The lexer never aborts. An illegal character produces one
//! [`Diagnostic`](dartan_util::Diagnostic) and is skipped; everything the
//! lexer could recognize is still returned.
//!
//! # Example
//!
//! ```
//! use dartan_lex::{tokenize, TokenKind};
//!
//! let (tokens, errors) = tokenize("final x = 5;");
//! assert!(errors.is_empty());
//! let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Final,
//!         TokenKind::Ident,
//!         TokenKind::Eq,
//!         TokenKind::NumberInt,
//!         TokenKind::Semicolon,
//!     ]
//! );
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use cursor::Cursor;
pub use lexer::{find_column, tokenize, Lexer};
pub use token::{keyword_from_ident, Token, TokenKind, TokenValue};
