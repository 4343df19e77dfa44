//! Diagnostic module - the structured error model shared by all passes.
//!
//! Each analysis pass produces a list of [`Diagnostic`] values tagged with
//! the [`Phase`] that found them. Diagnostics are accumulated, never
//! thrown: a pass always runs to the end of its input and reports
//! everything it found. The [`Handler`] is the per-pass collector; a fresh
//! one is created for every analysis so runs never share state.
//!
//! Message texts are Spanish, matching the historical report format of the
//! analyzer ("Error sintáctico en línea N: …", "Línea N: …").

use std::cell::RefCell;
use std::fmt;

/// The analysis pass a diagnostic originates from.
///
/// Reports and merged error lists are ordered Lexical, then Syntax, then
/// Semantic, which is also the pipeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Tokenizer errors (illegal characters, bad literals)
    Lexical,
    /// Parser errors (unexpected token, unexpected end of input)
    Syntax,
    /// Analyzer errors (names, types, mutability, control flow)
    Semantic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "Léxico"),
            Phase::Syntax => write!(f, "Sintáctico"),
            Phase::Semantic => write!(f, "Semántico"),
        }
    }
}

/// A single structured error.
///
/// The message always embeds the line number; `line` and `column` carry the
/// same information in machine-readable form so callers (GUI, reports) can
/// jump to the location without re-parsing the text.
///
/// # Examples
///
/// ```
/// use dartan_util::Diagnostic;
///
/// let d = Diagnostic::lexical(3, 7, "Carácter ilegal '@' en línea 3, columna 7");
/// assert_eq!(d.line, 3);
/// assert_eq!(d.column, Some(7));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Pass that produced the diagnostic
    pub phase: Phase,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based); only the lexer knows exact columns
    pub column: Option<u32>,
    /// Human-readable message (Spanish, contains the line number)
    pub message: String,
}

impl Diagnostic {
    /// Create a lexical diagnostic with an exact column.
    pub fn lexical(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Lexical,
            line,
            column: Some(column),
            message: message.into(),
        }
    }

    /// Create a syntax diagnostic.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Syntax,
            line,
            column: None,
            message: message.into(),
        }
    }

    /// Create a semantic diagnostic.
    pub fn semantic(line: u32, message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Semantic,
            line,
            column: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

/// Per-pass diagnostic collector.
///
/// Diagnostics are appended in the order they are found, which for every
/// pass is source order. The handler uses interior mutability so that
/// read-only walks can still report.
///
/// # Examples
///
/// ```
/// use dartan_util::{Diagnostic, Handler};
///
/// let handler = Handler::new();
/// assert!(!handler.has_errors());
/// handler.emit(Diagnostic::syntax(1, "Error sintáctico en línea 1: token inesperado ';'"));
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check whether any diagnostic has been reported.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of diagnostics reported so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Consume the handler, yielding the collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}
