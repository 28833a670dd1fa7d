//! Parcel tracker command-line front end.
//!
//! # Responsibility
//! - Parse flags and dispatch one parcel operation per invocation.
//! - Own the SQLite connection that the repository borrows.

use clap::{Args, Parser, Subcommand};
use log::info;
use parcel_core::{
    default_log_level, init_logging, open_db, ClientId, Parcel, ParcelNumber, ParcelService,
    ParcelStatus, SqliteParcelRepository,
};
use std::error::Error;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "tracker.db";

#[derive(Debug, Parser)]
#[command(name = "parcel", version)]
#[command(about = "Track parcels stored in a local SQLite database", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new parcel and print its number
    Add(AddArgs),
    /// Print one parcel as JSON
    Get { number: ParcelNumber },
    /// Print all parcels of a client as a JSON array
    List {
        #[arg(long)]
        client: ClientId,
    },
    /// Overwrite the status of a parcel
    SetStatus { number: ParcelNumber, status: String },
    /// Change the address of a registered parcel
    SetAddress { number: ParcelNumber, address: String },
    /// Delete a registered parcel
    Delete { number: ParcelNumber },
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    client: ClientId,
    #[arg(long)]
    address: String,
    /// Initial status
    #[arg(long, default_value = ParcelStatus::REGISTERED)]
    status: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let conn = open_db(&cli.db)?;
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn)?);

    match cli.command {
        Commands::Add(args) => {
            let mut parcel = Parcel::new(args.client, args.address);
            parcel.status = ParcelStatus::from(args.status);
            let number = service.add(&parcel)?;
            info!("event=cli_add module=cli status=ok number={number}");
            println!("{number}");
        }
        Commands::Get { number } => {
            let parcel = service.get(number)?;
            println!("{}", serde_json::to_string_pretty(&parcel)?);
        }
        Commands::List { client } => {
            let parcels = service.list_by_client(client)?;
            println!("{}", serde_json::to_string_pretty(&parcels)?);
        }
        Commands::SetStatus { number, status } => {
            service.set_status(number, &ParcelStatus::from(status))?;
        }
        Commands::SetAddress { number, address } => {
            service.set_address(number, &address)?;
        }
        Commands::Delete { number } => {
            service.delete(number)?;
        }
    }

    Ok(())
}
