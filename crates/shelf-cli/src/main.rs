//! `shelf` — terminal client for the Shelf book catalog.
//!
//! # Usage
//!
//! ```
//! shelf --url http://localhost:5000
//! shelf --config ~/.config/shelf/config.toml
//! shelf add "Dune" "Frank Herbert" --description "Desert planet"
//! shelf list
//! ```
//!
//! Without a subcommand the interactive TUI starts.

mod app;
mod client;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::{Deserialize, Serialize};
use shelf_core::book::{Book, BookFields, BookId};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "shelf", about = "Terminal client for the Shelf book catalog")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the shelf server (default: http://localhost:5000).
  #[arg(long, env = "SHELF_URL")]
  url: Option<String>,

  /// Write logs to this file. The TUI logs nowhere otherwise.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print every book in the catalog.
  List,
  /// Print one book.
  Get { id: BookId },
  /// Create a book and print it with its assigned id.
  Add {
    title:       String,
    author:      String,
    #[arg(short, long, default_value = "")]
    description: String,
  },
  /// Replace a book's fields. Omitted fields keep their current value.
  Edit {
    id:          BookId,
    #[arg(long)]
    title:       Option<String>,
    #[arg(long)]
    author:      Option<String>,
    #[arg(long)]
    description: Option<String>,
  },
  /// Delete a book.
  Delete { id: BookId },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(&args)?;

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  tracing::info!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;

  match args.command {
    Some(command) => run_command(&client, command).await,
    None => run_tui(client).await,
  }
}

/// File logging when `--log-file` is given; stderr for one-shot commands;
/// nothing for the TUI, which owns the terminal.
fn init_tracing(args: &Args) -> Result<()> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));

  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else if args.command.is_some() {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── One-shot commands ────────────────────────────────────────────────────────

async fn run_command(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List => print_json(&client.list_books().await?),
    Command::Get { id } => print_json(&client.get_book(id).await?),
    Command::Add { title, author, description } => {
      let fields = BookFields { title, author, description };
      print_json(&client.create_book(&fields).await?)
    }
    Command::Edit { id, title, author, description } => {
      let edit = BookEdit { title, author, description };
      print_json(&edit_book(client, id, edit).await?)
    }
    Command::Delete { id } => {
      client.delete_book(id).await?;
      print_json(&serde_json::json!({ "deleted": id }))
    }
  }
}

/// Field overrides for `shelf edit`. `None` keeps the stored value.
#[derive(Debug, Default)]
struct BookEdit {
  title:       Option<String>,
  author:      Option<String>,
  description: Option<String>,
}

impl BookEdit {
  fn apply(self, fields: &mut BookFields) {
    if let Some(title) = self.title {
      fields.title = title;
    }
    if let Some(author) = self.author {
      fields.author = author;
    }
    if let Some(description) = self.description {
      fields.description = description;
    }
  }
}

/// Fetch book `id`, overlay `edit`, write it back, and return the stored
/// result.
async fn edit_book(client: &ApiClient, id: BookId, edit: BookEdit) -> client::Result<Book> {
  let mut fields = client.get_book(id).await?.fields();
  edit.apply(&mut fields);
  client.update_book(id, &fields).await?;
  client.get_book(id).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A frame showing the loading state is on screen; now do the request.
    if app.has_pending() {
      app.run_pending().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use shelf_core::book::NewBook;

  use crate::client::test_server::server;

  #[tokio::test]
  async fn edit_keeps_omitted_fields() {
    let client = server().await;
    let book = client
      .create_book(&NewBook::new("Dune", "Herbert").with_description("Desert planet").into())
      .await
      .unwrap();

    let edit = BookEdit { author: Some("Frank Herbert".into()), ..Default::default() };
    let edited = edit_book(&client, book.id, edit).await.unwrap();

    assert_eq!(edited.id, book.id);
    assert_eq!(edited.title, "Dune");
    assert_eq!(edited.author, "Frank Herbert");
    assert_eq!(edited.description, "Desert planet");
    assert_eq!(edited.created_at, book.created_at);
    assert_eq!(client.get_book(book.id).await.unwrap(), edited);
  }

  #[tokio::test]
  async fn edit_can_clear_description() {
    let client = server().await;
    let book = client
      .create_book(&NewBook::new("Dune", "Herbert").with_description("Desert planet").into())
      .await
      .unwrap();

    let edit = BookEdit { description: Some(String::new()), ..Default::default() };
    let edited = edit_book(&client, book.id, edit).await.unwrap();
    assert_eq!(edited.description, "");
    assert_eq!(edited.title, "Dune");
  }

  #[tokio::test]
  async fn edit_of_missing_book_fails_and_creates_nothing() {
    let client = server().await;
    let err = edit_book(&client, 42, BookEdit::default()).await.unwrap_err();
    assert!(matches!(err, client::ClientError::Status { status, .. } if status == 404));
    assert!(client.list_books().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn blank_title_edit_is_rejected_by_the_server() {
    let client = server().await;
    let book = client
      .create_book(&NewBook::new("Dune", "Herbert").into())
      .await
      .unwrap();

    let edit = BookEdit { title: Some("  ".into()), ..Default::default() };
    let err = edit_book(&client, book.id, edit).await.unwrap_err();
    assert!(matches!(err, client::ClientError::Status { status, .. } if status == 400));
    assert_eq!(client.get_book(book.id).await.unwrap().title, "Dune");
  }
}
