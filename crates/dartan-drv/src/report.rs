//! Plain-text report files, one per pass.
//!
//! Reports carry a banner, the requesting user, a timestamp, the token
//! table (lexical report only), per-pass statistics and the error
//! list. They are a serialization of finished results: writing them
//! can fail, analysis cannot be affected by it.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use dartan_util::Diagnostic;

use crate::{FullAnalysis, LexAnalysis};

const RULE: &str = "================================================================================";

/// Errors of the report writer.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report directory could not be created.
    #[error("no se pudo crear el directorio de reportes '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A report file could not be written.
    #[error("no se pudo escribir el reporte '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes per-pass reports into one directory.
pub struct ReportWriter {
    dir: PathBuf,
    user: String,
}

impl ReportWriter {
    /// Create a writer for `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>, user: impl Into<String>) -> Result<Self, ReportError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ReportError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            user: user.into(),
        })
    }

    /// Write the lexical report (token table plus errors).
    pub fn write_lexical(&self, analysis: &LexAnalysis) -> Result<PathBuf, ReportError> {
        let mut body = String::new();
        self.banner(&mut body, "ANÁLISIS LÉXICO - DART");

        let _ = writeln!(body, "{}", RULE);
        let _ = writeln!(body, "  TOKENS RECONOCIDOS");
        let _ = writeln!(body, "{}\n", RULE);
        let _ = writeln!(body, "{:<6} | {:<20} | {:<6} | VALOR", "#", "TIPO", "LÍNEA");
        let _ = writeln!(body, "{}", "-".repeat(80));
        for (index, token) in analysis.tokens.iter().enumerate() {
            let _ = writeln!(
                body,
                "{:<6} | {:<20} | {:<6} | {}",
                index + 1,
                token.kind.name(),
                token.span.line,
                token.lexeme
            );
        }

        let _ = writeln!(body, "\n{}", RULE);
        let _ = writeln!(body, "  ESTADÍSTICAS");
        let _ = writeln!(body, "{}\n", RULE);
        let _ = writeln!(
            body,
            " Total de tokens reconocidos: {}",
            analysis.tokens.len()
        );
        let _ = writeln!(
            body,
            " Total de errores léxicos: {}",
            analysis.errors.len()
        );

        self.error_section(&mut body, &analysis.errors);
        self.write_file("lexico", body)
    }

    /// Write the syntactic report.
    pub fn write_syntax(&self, errors: &[Diagnostic]) -> Result<PathBuf, ReportError> {
        let body = self.phase_report("ANÁLISIS SINTÁCTICO - DART", "sintácticos", errors);
        self.write_file("sintactico", body)
    }

    /// Write the semantic report.
    pub fn write_semantic(&self, errors: &[Diagnostic]) -> Result<PathBuf, ReportError> {
        let body = self.phase_report("ANÁLISIS SEMÁNTICO - DART", "semánticos", errors);
        self.write_file("semantico", body)
    }

    /// Write all three reports for a full analysis, returning their
    /// paths in pass order.
    pub fn write_all(&self, analysis: &FullAnalysis) -> Result<Vec<PathBuf>, ReportError> {
        let lexical = self.write_lexical(&LexAnalysis {
            tokens: analysis.tokens.clone(),
            errors: analysis.lexical_errors.clone(),
        })?;
        let syntax = self.write_syntax(&analysis.syntax_errors)?;
        let semantic = self.write_semantic(&analysis.semantic_errors)?;
        Ok(vec![lexical, syntax, semantic])
    }

    fn phase_report(&self, title: &str, kind: &str, errors: &[Diagnostic]) -> String {
        let mut body = String::new();
        self.banner(&mut body, title);
        let _ = writeln!(body, " Total de errores {}: {}", kind, errors.len());
        self.error_section(&mut body, errors);
        body
    }

    fn banner(&self, body: &mut String, title: &str) {
        let now = Local::now();
        let _ = writeln!(body, "{}", RULE);
        let _ = writeln!(body, "  {}", title);
        let _ = writeln!(body, "  Proyecto: Dartan");
        let _ = writeln!(body, "{}\n", RULE);
        let _ = writeln!(body, " Usuario: {}", self.user);
        let _ = writeln!(body, " Fecha y hora: {}\n", now.format("%d/%m/%Y %H:%M:%S"));
    }

    fn error_section(&self, body: &mut String, errors: &[Diagnostic]) {
        if errors.is_empty() {
            return;
        }
        let _ = writeln!(body, "\n{}", RULE);
        let _ = writeln!(body, "  ERRORES ENCONTRADOS");
        let _ = writeln!(body, "{}\n", RULE);
        for error in errors {
            let _ = writeln!(body, " {}", error.message);
        }
    }

    fn write_file(&self, prefix: &str, body: String) -> Result<PathBuf, ReportError> {
        let timestamp = Local::now().format("%d-%m-%Y-%Hh%M");
        let path = self
            .dir
            .join(format!("{}-{}-{}.txt", prefix, self.user, timestamp));
        fs::write(&path, body).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Directory the reports land in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
