//! folio CLI - admin view over the portfolio data store.

use clap::{Parser, Subcommand};
use folio::config::{Config, load_config};
use folio::core::{MessageDb, MessageInput};
use folio::{Result, cli};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
/// - Dirty working directory: "0.1.0-dev (abc1234-dirty)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("FOLIO_GIT_HASH");
    const IS_RELEASE: &str = env!("FOLIO_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version = version(), about = "Portfolio message and visitor store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a contact-form message.
    Submit {
        /// Sender name.
        #[arg(long)]
        name: Option<String>,

        /// Sender email.
        #[arg(long)]
        email: Option<String>,

        /// Subject line.
        #[arg(long)]
        subject: Option<String>,

        /// Message text.
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List messages, newest first.
    List {
        /// Only show unread messages.
        #[arg(short, long)]
        unread: bool,

        /// Maximum number of messages. Defaults to the itemsPerPage setting.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one message in full.
    Show {
        /// Message ID.
        id: String,
    },

    /// Mark a message as read.
    Read {
        /// Message ID.
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        /// Mark every message as read.
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Delete a message.
    Delete {
        /// Message ID.
        #[arg(required_unless_present = "all")]
        id: Option<String>,

        /// Delete every message.
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },

    /// Search name, email, subject and body (case-insensitive).
    Search {
        /// Text to look for.
        query: String,
    },

    /// Record a page visit.
    Visit,

    /// Show dashboard statistics.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show settings, or update them with KEY=VALUE pairs.
    Settings {
        /// Assignments such as theme=light or itemsPerPage=20.
        assignments: Vec<String>,
    },

    /// Write a backup of all data.
    Export {
        /// Output file. Defaults to folio-backup-<date>.json.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore data from a backup file.
    Import {
        /// Backup file.
        input: PathBuf,
    },

    /// Delete all data and restore defaults.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(db: &MessageDb, command: Commands) -> Result<()> {
    match command {
        Commands::Submit {
            name,
            email,
            subject,
            message,
        } => cli::messages::submit(
            db,
            MessageInput {
                name,
                email,
                subject,
                body: message,
            },
        ),
        Commands::List { unread, limit } => cli::messages::list(db, unread, limit),
        Commands::Show { id } => cli::messages::show(db, &id),
        Commands::Read { id, all } => cli::messages::read(db, id.as_deref(), all),
        Commands::Delete { id, all } => cli::messages::delete(db, id.as_deref(), all),
        Commands::Search { query } => cli::messages::search(db, &query),
        Commands::Visit => cli::stats::visit(db),
        Commands::Stats { json } => cli::stats::run(db, json),
        Commands::Settings { assignments } => cli::settings::run(db, &assignments),
        Commands::Export { output } => cli::backup::export(db, output.as_deref()),
        Commands::Import { input } => cli::backup::import(db, &input),
        Commands::Reset { yes } => cli::backup::reset(db, yes),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = load_config().and_then(|config| {
        init_tracing(&config);
        let db = cli::open_db(&config)?;
        dispatch(&db, cli.command)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("folio: error: {e}");
            ExitCode::FAILURE
        }
    }
}
