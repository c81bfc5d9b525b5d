//! `fibsum` — sums the first `n` Fibonacci numbers across a pool of worker
//! threads, writes the result to a text file, and reports the elapsed time.

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use fibonacci_sum::fibonacci;

/// Concurrent segmented Fibonacci summation.
#[derive(Parser)]
#[command(name = "fibsum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of Fibonacci terms to sum
    #[arg(short = 'n', long, default_value_t = 1_000_000)]
    terms: usize,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// File the result line is written to
    #[arg(short, long, default_value = "fibonacci_result.txt")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.workers == 0 {
        return Err("at least one worker is required".into());
    }

    let started = Instant::now();
    let sum = fibonacci::sum_segmented(cli.terms, cli.workers)?;
    let elapsed = started.elapsed();

    let mut file = File::create(&cli.output)?;
    writeln!(file, "Somme des Fib({}) = {}", cli.terms, sum)?;

    println!("Temps d'exécution: {:?}", elapsed);
    println!(
        "Résultat et temps d'exécution écrits dans '{}'.",
        cli.output.display()
    );

    Ok(())
}
