use clap::Parser;
use heatmap_maker::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(cli::run_until_shutdown(
        cli::run(args),
        tokio::signal::ctrl_c(),
    ));

    match result {
        Ok(true) => process::exit(0),
        // Per-sheet failures have already been reported
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
