//! taskplan API server binary.
//!
//! This binary creates the concrete storage backend and passes it to the
//! API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use taskplan::api::{self, ApiError, Config, DEFAULT_PORT};
use taskplan::config::{StoreKind, get_data_dir};
use taskplan::db::{Database, DbError, JsonFileDatabase, MemoryDatabase, SqliteDatabase};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(taskplan::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(taskplan::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(taskplan::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "taskplan-api")]
#[command(author, version, about = "taskplan API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Storage backend
    #[arg(long, value_enum, env = "TASKPLAN_STORE", default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// Data directory (defaults to XDG data directory: ~/.local/share/taskplan)
    #[arg(long, env = "TASKPLAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// SQLite database file (defaults to <data-dir>/taskplan.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

async fn serve<D: Database + 'static>(config: Config, db: D) -> Result<(), BinaryError> {
    // Run migrations before starting the server
    db.migrate().await?;
    println!("Storage ready");

    api::run(config, db).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        host: cli.host,
        port: cli.port,
    };
    let data_dir = get_data_dir(cli.data_dir);

    println!();
    println!("🚀 taskplan API server starting...");
    println!("   Tools:    http://{}:{}/invoke", cli.host, cli.port);
    println!("   RPC:      http://{}:{}/rpc", cli.host, cli.port);
    println!("   MCP:      http://{}:{}/mcp", cli.host, cli.port);
    println!("   Docs:     http://{}:{}/docs", cli.host, cli.port);
    println!("   Store:    {}", cli.store);
    println!();

    match cli.store {
        StoreKind::Memory => serve(config, MemoryDatabase::new()).await?,
        StoreKind::Json => {
            println!("Opening JSON store at {:?}", data_dir);
            let db = JsonFileDatabase::open(&data_dir)
                .await
                .map_err(BinaryError::from)?;
            serve(config, db).await?
        }
        StoreKind::Sqlite => {
            let db_path = cli.db.unwrap_or_else(|| data_dir.join(taskplan::config::DB_FILE));
            println!("Opening database at {:?}", db_path);

            // Ensure parent directory exists
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent).map_err(BinaryError::from)?;
            }

            let db = SqliteDatabase::open(&db_path)
                .await
                .map_err(BinaryError::from)?;
            serve(config, db).await?
        }
    }

    Ok(())
}
