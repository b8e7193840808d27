mod shell;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use libris_client::{view, ApiError, BookApi, BookGateway, CatalogApp};
use libris_db::{Book, BookId, BookPatch, NewBook};
use libris_kernel::settings::{Settings, TelemetrySettings};

#[derive(Parser, Debug)]
#[command(name = "libris", version, about = "Library catalog service and client")]
struct Cli {
    /// Catalog endpoint, e.g. http://localhost:3000/api/books
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the catalog HTTP service
    Serve,
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Subcommand, Debug)]
enum ClientCommand {
    /// Print every book, newest first
    List,
    /// Print one book
    Show { id: String },
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        category: String,
    },
    /// Change some fields of a book
    Update {
        id: String,
        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Delete a book
    Delete { id: String },
    /// Interactive catalog editor
    Shell,
}

#[derive(Args, Debug)]
struct UpdateFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;

    match cli.command {
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            libris_app::run(settings).await
        }
        Command::Client(command) => run_client(command, cli.api_url, &settings).await,
    }
}

async fn run_client(
    command: ClientCommand,
    api_url: Option<String>,
    settings: &Settings,
) -> anyhow::Result<()> {
    // Client commands only log problems unless RUST_LOG says otherwise.
    libris_telemetry::init(&TelemetrySettings {
        filter: "warn".to_string(),
        ..settings.telemetry.clone()
    })?;

    let api_url = api_url.unwrap_or_else(|| settings.client.api_url.clone());
    let api = BookApi::new(&api_url);
    tracing::debug!(api_url = %api.base_url(), "using catalog endpoint");

    match command {
        ClientCommand::List => {
            let mut app = CatalogApp::new(api);
            app.load().await;
            print!("{}", view::render(app.state()));
            match app.state().error() {
                Some(message) => Err(anyhow!("{message}")),
                None => Ok(()),
            }
        }
        ClientCommand::Show { id } => {
            let book = api.get(&parse_id(&id)?).await.map_err(user_error)?;
            print_book(&book);
            Ok(())
        }
        ClientCommand::Add {
            title,
            author,
            category,
        } => {
            let book = api
                .create(&NewBook::new(title, author, category))
                .await
                .map_err(user_error)?;
            print_book(&book);
            Ok(())
        }
        ClientCommand::Update { id, fields } => {
            let patch = BookPatch {
                title: fields.title,
                author: fields.author,
                category: fields.category,
            };
            let book = api
                .update(&parse_id(&id)?, &patch)
                .await
                .map_err(user_error)?;
            print_book(&book);
            Ok(())
        }
        ClientCommand::Delete { id } => {
            let message = api.delete(&parse_id(&id)?).await.map_err(user_error)?;
            println!("{message}");
            Ok(())
        }
        ClientCommand::Shell => shell::run(CatalogApp::new(api)).await,
    }
}

fn parse_id(raw: &str) -> anyhow::Result<BookId> {
    raw.parse::<BookId>().map_err(|_| anyhow!("Invalid ID"))
}

fn user_error(err: ApiError) -> anyhow::Error {
    tracing::debug!(error = %err, "request failed");
    anyhow!("{}", err.user_message())
}

fn print_book(book: &Book) {
    println!("{}", book.id);
    println!("  title:    {}", book.title);
    println!("  author:   {}", book.author);
    println!("  category: {}", book.category);
    println!("  created:  {}", book.created_at);
    println!("  updated:  {}", book.updated_at);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_flags_are_optional() {
        let cli = Cli::try_parse_from([
            "libris",
            "update",
            "0190a6a0-0000-7000-8000-000000000000",
            "--title",
            "Dune",
        ])
        .unwrap();

        match cli.command {
            Command::Client(ClientCommand::Update { id, fields }) => {
                assert_eq!(id, "0190a6a0-0000-7000-8000-000000000000");
                assert_eq!(fields.title.as_deref(), Some("Dune"));
                assert!(fields.author.is_none());
                assert!(fields.category.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn add_requires_every_field() {
        assert!(Cli::try_parse_from(["libris", "add", "--title", "Dune"]).is_err());
    }

    #[test]
    fn malformed_id_is_rejected_locally() {
        assert_eq!(parse_id("12").unwrap_err().to_string(), "Invalid ID");
    }
}
