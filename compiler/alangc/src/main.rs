//! Alang CLI

use alangc::commands::{build_file, parse_build_options, parse_run_options, run_file};

fn main() {
    alangc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let Some((path, flags)) = split_path(&args[2..]) else {
                eprintln!("Usage: alang run <file> [--loop-limit=<n|none>]");
                std::process::exit(1);
            };
            let options = parse_run_options(&flags).unwrap_or_else(|msg| usage_error(&msg));
            run_file(path, &options);
        }
        "build" => {
            let Some((path, flags)) = split_path(&args[2..]) else {
                eprintln!("Usage: alang build <file> [--no-presolve] [--emit=ir|none]");
                std::process::exit(1);
            };
            let options = parse_build_options(&flags).unwrap_or_else(|msg| usage_error(&msg));
            build_file(path, &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("alang {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Separate the first non-flag argument (the file) from the flags.
fn split_path(args: &[String]) -> Option<(&str, Vec<String>)> {
    let index = args.iter().position(|a| !a.starts_with("--"))?;
    let flags = args
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, a)| a.clone())
        .collect();
    Some((args[index].as_str(), flags))
}

fn usage_error(msg: &str) -> ! {
    eprintln!("error: {msg}");
    eprintln!("Run `alang help` for usage.");
    std::process::exit(1);
}

fn print_usage() {
    println!("alang - s-expression interpreter and graph compiler");
    println!();
    println!("Usage: alang <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>       Interpret a program");
    println!("  build <file>     Lower to a control-flow graph, verify and dump it");
    println!("  help             Show this help message");
    println!("  version          Show version information");
    println!();
    println!("Run options:");
    println!("  --loop-limit=<n|none>  Abort a while loop after n iterations (default 1000000)");
    println!();
    println!("Build options:");
    println!("  --no-presolve          Resolve callee arities at call sites only");
    println!("  --emit=<ir|none>       What to print on success (default: ir)");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=alang_graph=debug) for trace output.");
}
