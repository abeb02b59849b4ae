//! The `splc` command line, parsed with `clap`'s derive API, narrowed to
//! one flat flag set over a single positional input rather than
//! subcommands, since SPL compilation has no notion of project scaffolding
//! or multi-command workflows.

use std::path::PathBuf;

use clap::Parser;

/// `splc` — compiles an SPL source file to numbered BASIC, or stops partway
/// through the pipeline to report on an earlier stage.
#[derive(Parser, Debug)]
#[command(name = "splc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SPL compiler frontend and BASIC lowering backend", long_about = None)]
pub struct Cli {
    /// SPL source file to compile.
    pub input: PathBuf,

    /// Pretty-print the parsed AST to stdout.
    #[arg(long)]
    pub print_ast: bool,

    /// Run scope analysis and report naming errors.
    #[arg(long)]
    pub check_scopes: bool,

    /// Print the full scope tree with entries.
    #[arg(long)]
    pub dump_scopes: bool,

    /// Run the type checker.
    #[arg(long)]
    pub type_check: bool,

    /// Write the intermediate (unnumbered) listing.
    #[arg(long)]
    pub codegen: bool,

    /// Run the full pipeline and write numbered BASIC.
    #[arg(long)]
    pub emit_basic: bool,

    /// Override the output path for `--codegen`/`--emit-basic`.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Emit stage-by-stage progress on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_input_path() {
        let cli = Cli::parse_from(["splc", "hello.spl"]);
        assert_eq!(cli.input, PathBuf::from("hello.spl"));
        assert!(!cli.emit_basic);
    }

    #[test]
    fn parses_combined_flags() {
        let cli = Cli::parse_from(["splc", "hello.spl", "--check-scopes", "--type-check", "-v"]);
        assert!(cli.check_scopes);
        assert!(cli.type_check);
        assert!(cli.verbose);
    }

    #[test]
    fn parses_out_override() {
        let cli = Cli::parse_from(["splc", "hello.spl", "--emit-basic", "--out", "custom.bas"]);
        assert_eq!(cli.out, Some(PathBuf::from("custom.bas")));
    }
}
