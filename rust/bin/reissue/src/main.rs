//! `reissue`: command-line client for the ID-card reissue dashboard.
//!
//! Manages contexts (server + default student) and drives the dashboard
//! engine from a terminal.

mod commands;
mod config;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reissue_client::ReissueForm;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "reissue", about = "ID-card reissue dashboard client")]
struct Cli {
    /// Path to client config file (default: ~/.reissue/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Backend URL. Overrides REISSUE_SERVER and the current context.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Show request progress.
    Status {
        /// Register number (default: the context's).
        register_number: Option<String>,
        /// JSON file with already-archived requests.
        #[arg(long)]
        archived: Option<PathBuf>,
    },

    /// List previous requests: accepted first, then archived.
    History {
        register_number: Option<String>,
        #[arg(long)]
        archived: Option<PathBuf>,
    },

    /// Acknowledge pickup and move the accepted card to history.
    Ack { register_number: Option<String> },

    /// Submit a new reissue request.
    Submit {
        #[arg(long)]
        register_number: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        section: String,
        #[arg(long)]
        reason: String,
        /// Date of birth (YYYY-MM-DD).
        #[arg(long)]
        dob: String,
        #[arg(long)]
        library_code: String,
    },

    /// Ask the backend whether a student may apply.
    Eligibility { register_number: Option<String> },

    /// Check that the backend is up.
    Health,

    /// Poll status until interrupted.
    Watch {
        register_number: Option<String>,
        /// Seconds between polls.
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },

    /// Run the eligibility smoke test against the backend.
    Validate,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        register_number: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        register_number: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(CliConfig::default_path);
    let as_json = match cli.output.as_str() {
        "json" => true,
        "table" => false,
        other => anyhow::bail!("Unknown output format \"{}\"; use table or json.", other),
    };

    // Context management works on the file alone.
    let command = match cli.command {
        Commands::Context { action } => {
            return match action {
                ContextAction::Create {
                    name,
                    server,
                    register_number,
                } => commands::context::create(
                    &name,
                    server.as_deref(),
                    register_number.as_deref(),
                    &config_path,
                ),
                ContextAction::List => commands::context::list(&config_path),
                ContextAction::Set {
                    name,
                    server,
                    register_number,
                } => commands::context::set(
                    &name,
                    server.as_deref(),
                    register_number.as_deref(),
                    &config_path,
                ),
                ContextAction::Delete { name } => commands::context::delete(&name, &config_path),
            };
        }
        Commands::Use {
            what: UseWhat::Context { name },
        } => return commands::context::use_context(&name, &config_path),
        Commands::Version => {
            println!("reissue cli v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        other => other,
    };

    let config = CliConfig::load(&config_path)?;
    let env_server = std::env::var(config::SERVER_ENV).ok();
    let server = config.resolve_server(cli.server.as_deref(), env_server.as_deref());
    tracing::debug!("using server {}", server);

    match command {
        Commands::Status {
            register_number,
            archived,
        } => {
            let id = config.resolve_register_number(register_number.as_deref())?;
            let archived = commands::dashboard::load_archived(archived.as_deref())?;
            commands::dashboard::status(&server, &id, archived, as_json).await?;
        }

        Commands::History {
            register_number,
            archived,
        } => {
            let id = config.resolve_register_number(register_number.as_deref())?;
            let archived = commands::dashboard::load_archived(archived.as_deref())?;
            commands::dashboard::history(&server, &id, archived, as_json).await?;
        }

        Commands::Ack { register_number } => {
            let id = config.resolve_register_number(register_number.as_deref())?;
            commands::dashboard::ack(&server, &id, as_json).await?;
        }

        Commands::Submit {
            register_number,
            name,
            department,
            year,
            section,
            reason,
            dob,
            library_code,
        } => {
            let form = ReissueForm {
                register_number: config.resolve_register_number(register_number.as_deref())?,
                name,
                department,
                year,
                section,
                reason,
                dob,
                library_code,
            };
            commands::form::submit(&server, form, as_json).await?;
        }

        Commands::Eligibility { register_number } => {
            let id = config.resolve_register_number(register_number.as_deref())?;
            commands::form::eligibility(&server, &id, as_json).await?;
        }

        Commands::Health => commands::health::health(&server).await?,

        Commands::Watch {
            register_number,
            interval,
        } => {
            if interval == 0 {
                anyhow::bail!("--interval must be at least 1 second.");
            }
            let id = config.resolve_register_number(register_number.as_deref())?;
            commands::dashboard::watch(&server, &id, Duration::from_secs(interval), as_json)
                .await?;
        }

        Commands::Validate => commands::validate::validate(&server, as_json).await?,

        Commands::Context { .. } | Commands::Use { .. } | Commands::Version => {}
    }

    Ok(())
}
