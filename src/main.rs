use std::process;

use clap::Parser;
use csvrows::cli::{Args, run};

fn main() {
    let args = Args::parse();

    if let Err(error) = run(&args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
