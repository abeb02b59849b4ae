//! spl-drv — the `splc` driver: argument parsing, stage orchestration,
//! diagnostic aggregation, and file I/O around the five library crates that
//! do the actual compiling.
//!
//! Library crates return concrete `thiserror` error types and never touch
//! the filesystem or `std::process::ExitCode`; this crate is the only place
//! that reads a source file, writes an output file, or decides an exit
//! code. Internal errors (I/O, an `EmitError`) are collapsed into
//! `anyhow::Error` at this boundary — the library crates' callers don't
//! need to match on them, only this one outermost call site does.

pub mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

pub use cli::Cli;

use spl_gen::{emit_basic, generate, render_intermediate};
use spl_lex::Lexer;
use spl_par::printer::print_program;
use spl_par::{assign_ids, Parser};
use spl_sem::{check_scopes, check_types, dump_scope_tree};
use spl_util::{Handler, Interner};

/// Exit codes per the CLI contract: 0 clean, 1 any diagnostic in a stage
/// that ran, 2 an internal/fatal failure (I/O, codegen/emitter invariant).
const EXIT_SUCCESS: u8 = 0;
const EXIT_DIAGNOSTICS: u8 = 1;
const EXIT_INTERNAL: u8 = 2;

/// Runs the full driver for one invocation, returning the process exit code.
/// Never panics on user-facing input — any failure reachable from a
/// malformed `.spl` file is reported through `ExitCode`, not `Result`'s `Err`
/// arm, which is reserved for the handful of conditions that mean `splc`
/// itself has a bug (an `anyhow` error bubbling out of `main` is exactly
/// that signal).
pub fn run(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose);

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", cli.input.display());
            return Ok(ExitCode::from(EXIT_INTERNAL));
        }
    };

    let mut interner = Interner::new();

    tracing::info!("Lexing...");
    let tokens = match Lexer::tokenize(&source, &mut interner) {
        Ok(t) => t,
        Err(e) => {
            println!("LexicalError: {e}");
            return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
        }
    };

    tracing::info!("Parsing...");
    let mut program = match Parser::parse_program(&tokens, &interner) {
        Ok(p) => p,
        Err(e) => {
            println!("SyntaxError: {e}");
            return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
        }
    };
    assign_ids(&mut program);

    if cli.print_ast {
        print!("{}", print_program(&program, &interner));
    }

    tracing::info!("Checking scopes...");
    let mut scope_handler = Handler::new();
    let resolution = check_scopes(&program, &interner, &mut scope_handler);

    if cli.dump_scopes {
        print!("{}", dump_scope_tree(&resolution.symtab, &interner));
    }

    if cli.check_scopes {
        if scope_handler.has_errors() {
            println!("Naming error(s):");
            for diag in scope_handler.diagnostics() {
                println!("{diag}");
            }
        } else {
            println!("Variable Naming and Function Naming accepted");
        }
    }

    if scope_handler.has_errors() {
        if !cli.check_scopes {
            for diag in scope_handler.diagnostics() {
                println!("{diag}");
            }
        }
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }

    let needs_types = cli.type_check || cli.codegen || cli.emit_basic;
    if !needs_types {
        return Ok(ExitCode::from(EXIT_SUCCESS));
    }

    tracing::info!("Type checking...");
    let mut type_handler = Handler::new();
    let _ = check_types(&program, &resolution, &interner, &mut type_handler);

    if cli.type_check {
        if type_handler.has_errors() {
            for diag in type_handler.diagnostics() {
                println!("{diag}");
            }
        } else {
            println!("Type checking passed");
        }
    }

    if type_handler.has_errors() {
        if !cli.type_check {
            for diag in type_handler.diagnostics() {
                println!("{diag}");
            }
        }
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }

    if !cli.codegen && !cli.emit_basic {
        return Ok(ExitCode::from(EXIT_SUCCESS));
    }

    tracing::info!("Generating code...");
    let lines = match generate(&program, &interner) {
        Ok(lines) => lines,
        Err(e) => {
            println!("EmitterError: {e}");
            return Ok(ExitCode::from(EXIT_INTERNAL));
        }
    };

    if cli.codegen {
        let path = output_path(&cli.input, cli.out.as_deref(), "txt");
        let text = render_intermediate(&lines);
        write_output(&path, &text)?;
    }

    if cli.emit_basic {
        tracing::info!("Emitting BASIC...");
        let basic = match emit_basic(&lines) {
            Ok(text) => text,
            Err(e) => {
                println!("EmitterError: {e}");
                return Ok(ExitCode::from(EXIT_INTERNAL));
            }
        };
        let path = output_path(&cli.input, cli.out.as_deref(), "bas");
        write_output(&path, &basic)?;
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// `<input-stem>.<ext>` unless `--out` overrides it.
fn output_path(input: &Path, out: Option<&Path>, ext: &str) -> PathBuf {
    if let Some(out) = out {
        return out.to_path_buf();
    }
    input.with_extension(ext)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("could not write {}", path.display()))
}
