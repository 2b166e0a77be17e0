use clap::{Parser, ValueEnum};
use colored::Colorize;
use library_lending::{Library, LibraryDisplay};
use tracing_subscriber::EnvFilter;

mod scenarios;

use scenarios::DemoConfig;

/// Which demonstration to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Three books, two users, every success and failure path
    Small,
    /// Generated catalog with a fixed loan plan
    Catalog,
    /// Generated catalog with seeded random loans
    Random,
}

/// Command-line arguments for the library lending demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::Small)]
    scenario: Scenario,

    /// Number of generated books (catalog and random scenarios)
    #[arg(long, default_value_t = 50)]
    books: usize,

    /// Number of generated users (catalog and random scenarios)
    #[arg(long, default_value_t = 10)]
    users: usize,

    /// Upper bound of loans drawn per user (random scenario)
    #[arg(long, default_value_t = 5)]
    max_loans: usize,

    /// Seed for the random scenario, same seed gives the same loans
    #[arg(long, default_value_t = 2025)]
    seed: u64,

    /// Print the final library state as JSON
    #[arg(long)]
    json: bool,

    /// Log every state change
    #[arg(short, long)]
    verbose: bool,
}

impl From<&Args> for DemoConfig {
    fn from(args: &Args) -> Self {
        Self { books: args.books, users: args.users, max_loans: args.max_loans, seed: args.seed }
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("{}", "Library Lending Demonstration".green().bold());
    println!("=====================================");

    let config = DemoConfig::from(&args);
    tracing::info!(scenario = ?args.scenario, ?config, "starting demo");

    let library: Library = match args.scenario {
        Scenario::Small => scenarios::small(),
        Scenario::Catalog => scenarios::catalog(&config),
        Scenario::Random => scenarios::random(&config),
    };

    scenarios::section("Statistics");
    print!("{}", LibraryDisplay::stats_summary(&library));
    println!();
    LibraryDisplay::print_histogram(&library);

    if args.json {
        match serde_json::to_string_pretty(&library.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize library snapshot"),
        }
    }

    println!("\n{}", "Demonstration complete!".green().bold());
}
