use fabric::cli::initialize_from_arguments;
use std::{env, process::ExitCode};

/// Without arguments, main runs the basic simulation
fn main() -> ExitCode {
    println!("Fabric v{}", env!("CARGO_PKG_VERSION"));
    match initialize_from_arguments() {
        Ok(()) => {
            println!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
