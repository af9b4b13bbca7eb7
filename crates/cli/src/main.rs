//! FreightDesk CLI - terminal client for the admin GraphQL API.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in ~/.freightdesk/session.json)
//! FREIGHTDESK_PASSWORD=... fd-cli login -e dana@freightdesk.dev
//!
//! # Who am I?
//! fd-cli whoami
//!
//! # List the second page of active branches, newest name first
//! fd-cli list branches --page 2 --filter status=ACTIVE --sort name.desc
//!
//! # Preview the page-number window
//! fd-cli pages 7 12
//!
//! # Delete two positions
//! fd-cli delete positions 12 13
//!
//! # Sign out
//! fd-cli logout
//! ```
//!
//! # Environment Variables
//!
//! - `FREIGHTDESK_API_URL` - GraphQL endpoint
//! - `FREIGHTDESK_SESSION_FILE` - Session file location
//! - `FREIGHTDESK_PASSWORD` - Password for `login`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use freightdesk_admin::config::ApiConfig;
use freightdesk_admin::graphql::ApiClient;
use freightdesk_admin::resources::{Branch, Currency, FleetType, Position};
use freightdesk_admin::services::SessionService;
use secrecy::SecretString;

mod commands;
mod storage;

use commands::resources::ListArgs;
use commands::{CommandError, Context};
use storage::FileStorage;

#[derive(Parser)]
#[command(name = "fd-cli")]
#[command(author, version, about = "FreightDesk CLI")]
struct Cli {
    /// GraphQL endpoint
    #[arg(
        long,
        env = "FREIGHTDESK_API_URL",
        default_value = "http://localhost:8000/graphql"
    )]
    api_url: String,

    /// Where the session is kept [default: ~/.freightdesk/session.json]
    #[arg(long, env = "FREIGHTDESK_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "FREIGHTDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List one page of a resource
    List {
        resource: ResourceKind,

        #[command(flatten)]
        table: TableArgs,
    },
    /// Show the page-number window for a page
    Pages {
        /// 1-based current page
        current: u32,

        /// Total number of pages
        total: u32,
    },
    /// Delete rows by ID
    Delete {
        resource: ResourceKind,

        /// Row IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Branches,
    Currencies,
    FleetTypes,
    Positions,
}

#[derive(Args)]
struct TableArgs {
    /// 1-based page number
    #[arg(long)]
    page: Option<u32>,

    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long)]
    per_page: Option<u32>,

    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// Sort column, `name` or `name.desc`
    #[arg(long, visible_alias = "order-by")]
    sort: Option<String>,

    /// Column filter, `key=value[,value...]`; repeatable
    #[arg(short, long = "filter")]
    filters: Vec<String>,

    /// Comma-separated columns to show
    #[arg(long)]
    columns: Option<String>,
}

impl From<TableArgs> for ListArgs {
    fn from(args: TableArgs) -> Self {
        Self {
            page: args.page,
            per_page: args.per_page,
            search: args.search,
            sort: args.sort,
            filters: args.filters,
            columns: args.columns,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    if let Commands::Pages { current, total } = cli.command {
        return commands::resources::pages(current, total);
    }

    let api = ApiClient::new(&ApiConfig::parse(&cli.api_url)?);
    let path = cli
        .session_file
        .or_else(FileStorage::default_path)
        .unwrap_or_else(|| PathBuf::from(".freightdesk-session.json"));
    tracing::debug!(path = %path.display(), "Using session file");

    let ctx = Context {
        api,
        session: SessionService::load(FileStorage::new(path)).await?,
    };

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, SecretString::from(password)).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::List { resource, table } => {
            let args = ListArgs::from(table);
            match resource {
                ResourceKind::Branches => commands::resources::list::<Branch>(&ctx, &args).await?,
                ResourceKind::Currencies => {
                    commands::resources::list::<Currency>(&ctx, &args).await?;
                }
                ResourceKind::FleetTypes => {
                    commands::resources::list::<FleetType>(&ctx, &args).await?;
                }
                ResourceKind::Positions => {
                    commands::resources::list::<Position>(&ctx, &args).await?;
                }
            }
        }
        // Needs no session; answered above.
        Commands::Pages { .. } => {}
        Commands::Delete { resource, ids } => match resource {
            ResourceKind::Branches => commands::resources::delete::<Branch>(&ctx, &ids).await?,
            ResourceKind::Currencies => {
                commands::resources::delete::<Currency>(&ctx, &ids).await?;
            }
            ResourceKind::FleetTypes => {
                commands::resources::delete::<FleetType>(&ctx, &ids).await?;
            }
            ResourceKind::Positions => {
                commands::resources::delete::<Position>(&ctx, &ids).await?;
            }
        },
    }
    Ok(())
}
