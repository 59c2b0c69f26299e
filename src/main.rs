use anyhow::{Context, Result};
use clap::Parser;
use dux::{eval_program, parse, repl, Environment, Object};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Interpreter for the Dux scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run. Starts an interactive session when omitted.
    file: Option<PathBuf>,
}

/// Installs a stderr subscriber, but only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &Path) -> Result<i32> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (program, errors) = parse(&source);
    if !errors.is_empty() {
        for msg in errors {
            eprintln!("\t{}", msg);
        }
        return Ok(1);
    }
    let env = Environment::new().into_env();
    let evaluated = eval_program(&program, &env);
    println!("{}", evaluated);
    Ok(match evaluated {
        Object::Error { .. } => 1,
        _ => 0,
    })
}

fn run_repl() -> Result<i32> {
    println!("Welcome to the Dux language interpreter!");
    let stdin = io::stdin();
    let stdout = io::stdout();
    repl::start(stdin.lock(), stdout.lock())?;
    Ok(0)
}

fn main() {
    init_tracing();
    let args = Args::parse();
    let result = match &args.file {
        Some(path) => run_file(path),
        None => run_repl(),
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {:?}", err);
            std::process::exit(1);
        }
    }
}
