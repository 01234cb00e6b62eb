//! Running the CLI

// Allow exits because in this file we ideally handle all errors with known exit codes
#![allow(clippy::exit)]
#![allow(clippy::print_stdout)]

use crate::db::models::{genre, publication, tag};
use crate::db::{self, DatabaseConnection};
use crate::service::comment::CommentService;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Read-only access to the publication database.
/// Connects to `--database-url`, or `DATABASE_URL`, or a local `SQLite` file.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database url, e.g. `postgres://localhost/habr` or `sqlite://habr.sqlite3?mode=rwc`.
    #[arg(short, long)]
    database_url: Option<String>,
    /// habr cli subcommands
    #[command(subcommand)]
    subcommands: Subcommands,
}

///
#[derive(Clone, clap::Subcommand)]
enum Subcommands {
    /// Create or update the database schema
    Migrate,
    /// Print a page of publications, newest first
    Publications {
        /// 1-indexed page number.
        #[arg(short, long, default_value_t = 1)]
        page: i64,
        /// Only publications of this genre.
        #[arg(short, long)]
        genre: Option<i64>,
    },
    /// Print a single publication
    Publication {
        /// Publication id.
        id: i64,
        /// Count this read as a view.
        #[arg(long)]
        count_view: bool,
    },
    /// Print the best authors and publications
    Best,
    /// Print all genres
    Genres,
    /// Print all tags
    Tags,
    /// Print a page of comments for moderation
    Comments {
        /// 1-indexed page number.
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
}

///
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entrypoint to application
pub fn run() {
    init_tracing();
    tracing::debug!("Starting application");
    let cli = Cli::parse();
    let db_url = db::init::database_url(cli.database_url.as_deref());
    let result: anyhow::Result<()> = async_std::task::block_on(async {
        let conn = db::init::connect(&db_url).await?;
        execute(&conn, cli.subcommands).await
    });
    if let Err(err) = result {
        tracing::error!("error: could not complete command. Confirm that DATABASE_URL is set correctly.");
        tracing::error!("Error: {:?}", err);
        std::process::exit(1);
    }
}

/// Run a single subcommand against an open connection.
async fn execute(conn: &DatabaseConnection, subcommand: Subcommands) -> anyhow::Result<()> {
    match subcommand {
        Subcommands::Migrate => {
            // `connect` has already applied the migrations.
            tracing::info!("Database is up to date");
        }
        Subcommands::Publications { page, genre: None } => {
            print_json(&publication::Manager::find_page(conn, page).await?)?;
        }
        Subcommands::Publications {
            page,
            genre: Some(genre_id),
        } => {
            print_json(&publication::Manager::find_page_by_genre(conn, genre_id, page).await?)?;
        }
        Subcommands::Publication { id, count_view } => {
            if count_view {
                publication::Manager::update_views_count(conn, id).await?;
            }
            let Some(found) = publication::Manager::find_by_id(conn, id).await? else {
                anyhow::bail!("Publication {id} not found");
            };
            print_json(&found)?;
        }
        Subcommands::Best => {
            let best = json!({
                "users": publication::Manager::find_best_users(conn).await?,
                "publications": publication::Manager::find_best_publications(conn).await?,
                "week": publication::Manager::get_best_mini_publications(conn).await?,
            });
            print_json(&best)?;
        }
        Subcommands::Genres => print_json(&genre::Manager::find_all(conn).await?)?,
        Subcommands::Tags => print_json(&tag::Manager::find_all(conn).await?)?,
        Subcommands::Comments { page } => {
            let service = CommentService::new(conn.clone());
            print_json(&service.get_all_admin_comments(page).await?)?;
        }
    }
    Ok(())
}

/// Pretty-print a value as JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
