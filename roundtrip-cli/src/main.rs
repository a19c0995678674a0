//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use roundtrip_cli::CliError;

fn main() {
    match roundtrip_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("roundtrip: {err}");
            std::process::exit(1);
        }
    }
}
