use std::process::ExitCode;

use clap::Parser as _;
use spl_drv::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match spl_drv::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::from(2)
        }
    }
}
