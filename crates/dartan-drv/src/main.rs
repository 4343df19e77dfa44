//! Dartan CLI - static analysis for a Dart subset from the command
//! line.
//!
//! One subcommand per pass plus `all`; every subcommand prints its
//! findings to stdout and exits nonzero when any requested pass
//! produced diagnostics, so the binary composes with shell scripts and
//! CI checks.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dartan_drv::report::ReportWriter;
use dartan_drv::{analyze_all, analyze_semantic, parse_syntax, tokenize};
use dartan_util::Diagnostic;

/// Dartan - analizador léxico, sintáctico y semántico de Dart
#[derive(Parser, Debug)]
#[command(name = "dartan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Analizador estático para un subconjunto de Dart", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "DARTAN_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Análisis léxico: imprime la tabla de tokens
    Lex(AnalyzeArgs),

    /// Análisis sintáctico
    Parse(AnalyzeArgs),

    /// Análisis semántico
    Check(AnalyzeArgs),

    /// Las tres fases en orden
    All(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Archivo Dart a analizar
    file: PathBuf,

    /// Directorio donde escribir el reporte de la fase
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Usuario que figura en los reportes
    #[arg(long, default_value = "anon")]
    user: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(error_count) if error_count == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

/// Run the selected pass(es), returning the number of diagnostics.
fn run(cli: Cli) -> Result<usize> {
    match cli.command {
        Commands::Lex(args) => {
            let source = read_source(&args.file)?;
            let analysis = tokenize(&source);

            println!("{:<6} | {:<20} | {:<6} | VALOR", "#", "TIPO", "LÍNEA");
            println!("{}", "-".repeat(60));
            for (index, token) in analysis.tokens.iter().enumerate() {
                println!(
                    "{:<6} | {:<20} | {:<6} | {}",
                    index + 1,
                    token.kind.name(),
                    token.span.line,
                    token.lexeme
                );
            }
            print_errors(&analysis.errors);

            if let Some(dir) = &args.report_dir {
                let writer = ReportWriter::new(dir, &args.user)?;
                let path = writer.write_lexical(&analysis)?;
                println!("Log: {}", path.display());
            }
            Ok(analysis.errors.len())
        }

        Commands::Parse(args) => {
            let source = read_source(&args.file)?;
            let analysis = parse_syntax(&source);

            if analysis.errors.is_empty() {
                println!("Análisis sintáctico correcto");
            } else {
                print_errors(&analysis.errors);
            }

            if let Some(dir) = &args.report_dir {
                let writer = ReportWriter::new(dir, &args.user)?;
                let path = writer.write_syntax(&analysis.errors)?;
                println!("Log: {}", path.display());
            }
            Ok(analysis.errors.len())
        }

        Commands::Check(args) => {
            let source = read_source(&args.file)?;
            let analysis = analyze_semantic(&source);

            if analysis.errors.is_empty() {
                println!("Análisis semántico correcto");
            } else {
                print_errors(&analysis.errors);
            }

            if let Some(dir) = &args.report_dir {
                let writer = ReportWriter::new(dir, &args.user)?;
                let path = writer.write_semantic(&analysis.errors)?;
                println!("Log: {}", path.display());
            }
            Ok(analysis.errors.len())
        }

        Commands::All(args) => {
            let source = read_source(&args.file)?;
            let analysis = analyze_all(&source);

            let merged = analysis.all_errors();
            if merged.is_empty() {
                println!("Análisis completo sin errores");
            } else {
                print_errors(&merged);
            }

            if let Some(dir) = &args.report_dir {
                let writer = ReportWriter::new(dir, &args.user)?;
                for path in writer.write_all(&analysis)? {
                    println!("Log: {}", path.display());
                }
            }
            Ok(merged.len())
        }
    }
}

fn read_source(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer el archivo '{}'", path.display()))
}

fn print_errors(errors: &[Diagnostic]) {
    for error in errors {
        println!("{}", error);
    }
}
