//! Lode CLI — load and execute module files.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input or module format error
//! - 2: Incompatible module version
//! - 3: Runtime fault during execution

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "dump" => commands::dump(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: lode <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <module.lodm> [--debug|-d]   Execute a module and print its result");
    eprintln!("  dump <module.lodm>               Show header, disassembly, and constants");
}
