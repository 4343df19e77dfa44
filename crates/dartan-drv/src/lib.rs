//! dartan-drv - Driver and library facade of the Dart analyzer.
//!
//! Orchestrates the three passes over one in-memory source string and
//! exposes them in the shape collaborators (GUI, reports, CLI)
//! consume:
//!
//! - [`tokenize`] - lexical pass only
//! - [`parse_syntax`] - lexer feeding the parser
//! - [`analyze_semantic`] - full pipeline, semantic diagnostics only
//! - [`analyze_all`] - all three passes with per-pass error lists
//!
//! Every call builds fresh analyzer instances; nothing is shared
//! between runs, so concurrent analyses on separate calls are safe.
//!
//! # Example
//!
//! ```
//! use dartan_drv::analyze_all;
//!
//! let result = analyze_all("final int k = 1; k = 2;");
//! assert!(result.lexical_errors.is_empty());
//! assert!(result.syntax_errors.is_empty());
//! assert_eq!(result.semantic_errors.len(), 1);
//! assert!(!result.is_clean());
//! ```

pub mod report;

use dartan_lex::Token;
use dartan_par::ast::Program;
use dartan_util::Diagnostic;
use tracing::debug;

/// Result of the lexical pass.
pub struct LexAnalysis {
    pub tokens: Vec<Token>,
    pub errors: Vec<Diagnostic>,
}

/// Result of the syntactic pass. The program is always present; on
/// errors it holds whatever statements survived recovery.
pub struct SyntaxAnalysis {
    pub program: Program,
    pub errors: Vec<Diagnostic>,
}

/// Result of the semantic pass.
pub struct SemanticAnalysis {
    pub errors: Vec<Diagnostic>,
}

/// Results of all three passes over one source text.
pub struct FullAnalysis {
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<Diagnostic>,
    pub syntax_errors: Vec<Diagnostic>,
    pub semantic_errors: Vec<Diagnostic>,
}

impl FullAnalysis {
    /// Every diagnostic, merged in pass order: lexical, then syntax,
    /// then semantic.
    pub fn all_errors(&self) -> Vec<Diagnostic> {
        let mut merged = Vec::with_capacity(
            self.lexical_errors.len() + self.syntax_errors.len() + self.semantic_errors.len(),
        );
        merged.extend(self.lexical_errors.iter().cloned());
        merged.extend(self.syntax_errors.iter().cloned());
        merged.extend(self.semantic_errors.iter().cloned());
        merged
    }

    /// True when no pass found anything.
    pub fn is_clean(&self) -> bool {
        self.lexical_errors.is_empty()
            && self.syntax_errors.is_empty()
            && self.semantic_errors.is_empty()
    }
}

/// Run the lexical pass.
pub fn tokenize(source: &str) -> LexAnalysis {
    let (tokens, errors) = dartan_lex::tokenize(source);
    debug!(
        tokens = tokens.len(),
        errores = errors.len(),
        "análisis léxico completado"
    );
    LexAnalysis { tokens, errors }
}

/// Run the lexer and parser.
pub fn parse_syntax(source: &str) -> SyntaxAnalysis {
    let (tokens, _) = dartan_lex::tokenize(source);
    let (program, errors) = dartan_par::parse(tokens);
    debug!(
        sentencias = program.statements.len(),
        errores = errors.len(),
        "análisis sintáctico completado"
    );
    SyntaxAnalysis { program, errors }
}

/// Run the full pipeline, keeping only the semantic diagnostics.
pub fn analyze_semantic(source: &str) -> SemanticAnalysis {
    let (tokens, _) = dartan_lex::tokenize(source);
    let (program, _) = dartan_par::parse(tokens);
    let errors = dartan_sem::analyze(&program);
    debug!(errores = errors.len(), "análisis semántico completado");
    SemanticAnalysis { errors }
}

/// Run the three passes sequentially over the same source.
pub fn analyze_all(source: &str) -> FullAnalysis {
    let (tokens, lexical_errors) = dartan_lex::tokenize(source);
    let (program, syntax_errors) = dartan_par::parse(tokens.clone());
    let semantic_errors = dartan_sem::analyze(&program);
    FullAnalysis {
        tokens,
        lexical_errors,
        syntax_errors,
        semantic_errors,
    }
}
