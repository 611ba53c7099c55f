use std::{
    fs::OpenOptions,
    io,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use outlay::{
    db::initialize,
    repl::Repl,
    stores::sqlite::{
        SqliteCategoryStore, SqliteExpenseStore, SqlitePaymentMethodStore, SqliteReportStore,
        SqliteUserStore,
    },
};

/// A command-line expense tracker with per-user ledgers and aggregate
/// reports.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path for the application log.
    #[arg(long, default_value = "outlay.log")]
    log_path: String,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let connection = Connection::open(&args.db_path).unwrap_or_else(|error| {
        eprintln!("Could not open the database at {}: {error}", args.db_path);
        exit(1);
    });

    if let Err(error) = initialize(&connection) {
        eprintln!("Could not initialize the database schema: {error}");
        exit(1);
    }

    tracing::info!("opened database at {}", args.db_path);

    let connection = Arc::new(Mutex::new(connection));

    let mut repl = Repl::new(
        SqliteUserStore::new(connection.clone()),
        SqliteCategoryStore::new(connection.clone()),
        SqlitePaymentMethodStore::new(connection.clone()),
        SqliteExpenseStore::new(connection.clone()),
        SqliteReportStore::new(connection),
    );

    repl.run()
}

/// Log to a file rather than stdout, which belongs to the menu.
///
/// `RUST_LOG` overrides the default `info` level.
fn setup_logging(log_path: &str) {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(file_log)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
