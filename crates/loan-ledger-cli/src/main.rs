mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process;

use loan_ledger_core::Currency;

use commands::loans::{AddArgs, DeleteArgs, EditArgs, ShowArgs};
use commands::quote::QuoteArgs;
use commands::Context;

/// Record, edit and review loans
#[derive(Parser)]
#[command(
    name = "loans",
    version,
    about = "Record, edit and review loans",
    long_about = "A small loan ledger backed by a local SQLite file. Monthly payments use \
                  simple interest spread evenly over the term; settled loans always show \
                  zero payments. Ids freed by deletion are reused, smallest first."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Ledger database file (default: $LOAN_LEDGER_DB, then ./loan_system.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Currency symbol used for formatted amounts (always two decimals)
    #[arg(long, default_value = "php", global = true)]
    currency: CurrencyArg,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new loan
    Add(AddArgs),
    /// List every loan
    List,
    /// Show a single loan
    Show(ShowArgs),
    /// Edit a loan; omitted fields keep their current values
    Edit(EditArgs),
    /// Delete a loan and make its id reusable
    Delete(DeleteArgs),
    /// List ids waiting to be reused
    Recycled,
    /// Preview payments for a loan without recording it
    Quote(QuoteArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CurrencyArg {
    Php,
    Usd,
    Eur,
    Gbp,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Php => Currency::PHP,
            CurrencyArg::Usd => Currency::USD,
            CurrencyArg::Eur => Currency::EUR,
            CurrencyArg::Gbp => Currency::GBP,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("{}: logger unavailable: {}", "warning".yellow().bold(), e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = Context::new(cli.db, cli.currency.into());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Add(args) => commands::loans::run_add(&ctx, args),
        Commands::List => commands::loans::run_list(&ctx),
        Commands::Show(args) => commands::loans::run_show(&ctx, args),
        Commands::Edit(args) => commands::loans::run_edit(&ctx, args),
        Commands::Delete(args) => commands::loans::run_delete(&ctx, args),
        Commands::Recycled => commands::loans::run_recycled(&ctx),
        Commands::Quote(args) => commands::quote::run_quote(args),
        Commands::Version => {
            println!("loans {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
