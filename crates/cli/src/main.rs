//! DAVE CLI, the main entry point.
//!
//! Commands:
//! - `onboard`   Write the default config and storage directory
//! - `chat`      Interactive chat or single-message mode
//! - `ask`       Show how the knowledge table scores a query
//! - `history`   List or clear stored conversations
//! - `feedback`  Rate an answer by message id
//! - `patterns`  Most frequently asked questions
//! - `serve`     Start the HTTP API
//! - `status`    Show configuration and store contents

use clap::{ArgGroup, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dave",
    about = "DAVE, the FAQ assistant for database administration tools",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Session to act as (defaults to a new session per run)
    #[arg(long, global = true, env = "DAVE_SESSION")]
    session: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines (useful with `serve`)
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and storage
    Onboard,

    /// Chat with DAVE
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the scored knowledge matches for a query (nothing is stored)
    Ask {
        /// The question to look up
        query: Vec<String>,
    },

    /// List or clear conversations
    History {
        /// Include every session, not only the current one
        #[arg(long)]
        all: bool,

        /// Delete the current session's conversations
        #[arg(long)]
        clear: bool,

        /// Required together with --clear
        #[arg(long, requires = "clear")]
        confirm: bool,
    },

    /// Rate an assistant answer
    #[command(group(ArgGroup::new("rating").required(true).args(["helpful", "not_helpful"])))]
    Feedback {
        /// Id of the assistant message (msg_...)
        message_id: String,

        #[arg(long)]
        helpful: bool,

        #[arg(long)]
        not_helpful: bool,

        /// Optional free-text comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Show the most frequently asked questions
    Patterns {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and store status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let session = cli.session;
    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message } => commands::chat::run(session, message).await?,
        Commands::Ask { query } => commands::ask::run(&query.join(" ")).await?,
        Commands::History {
            all,
            clear,
            confirm,
        } => commands::history::run(session, all, clear, confirm).await?,
        Commands::Feedback {
            message_id,
            helpful,
            not_helpful: _,
            comment,
        } => commands::feedback::run(session, &message_id, helpful, comment).await?,
        Commands::Patterns { limit } => commands::patterns::run(limit).await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Status => commands::status::run(session).await?,
    }

    Ok(())
}
