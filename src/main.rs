use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use pocket_ledger::cli::{
    handle_backup_command, handle_category_command, handle_stats_command,
    handle_transaction_command, BackupCommands, CategoryCommands, StatsArgs, TransactionCommands,
};
use pocket_ledger::config::{LedgerPaths, Settings};
use pocket_ledger::services::CategoryService;
use pocket_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Personal finance tracker",
    long_about = "Record expenses and income by category, browse them by day or \
                  date range, and see where the money went."
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Spending by category
    Stats(StatsArgs),

    /// Backup and restore
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(level_for(cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("exiting with error: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;
    debug!(base = %paths.base_dir().display(), "storage ready");

    let seeded = CategoryService::new(&storage).seed_defaults()?;
    if !seeded.is_empty() {
        debug!(count = seeded.len(), "first run, default categories created");
    }

    match cli.command {
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Stats(args)) => handle_stats_command(&storage, &settings, args)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, cmd)?,
        Some(Commands::Config) => {
            println!("Pocket Ledger Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Store file:       {}", paths.store_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Backup archive:   {}", paths.backup_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Week starts on:   {}", settings.week_start());
        }
        None => {
            println!("Pocket Ledger - personal finance tracker");
            println!();
            println!("Run 'ledger --help' for usage information.");
        }
    }

    Ok(())
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("pocket_ledger={},ledger={}", level, level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
