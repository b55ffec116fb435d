//! Application state machine and event dispatcher.
//!
//! Key handling never performs I/O directly. It records a pending request and
//! switches the affected view into its loading state; the event loop draws
//! that state and only then calls [`App::run_pending`].

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shelf_core::book::{Book, BookFields, BookId};

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// The catalog table.
  BookList,
  /// The create/edit form.
  BookForm,
  /// Waiting for the user to confirm deletion of a book.
  ConfirmDelete(BookId),
}

// ─── Book list view ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLoad {
  Loading,
  Failed(String),
  Ready,
}

/// The list screen's own copy of the catalog.
///
/// It is replaced wholesale by a fetch and otherwise only shrinks when a
/// delete succeeds; nothing else writes to it.
#[derive(Debug)]
pub struct BookListView {
  books:      Vec<Book>,
  pub cursor: usize,
  pub load:   ListLoad,
}

impl BookListView {
  fn new() -> Self {
    Self {
      books:  Vec::new(),
      cursor: 0,
      load:   ListLoad::Loading,
    }
  }

  pub fn books(&self) -> &[Book] { &self.books }

  pub fn selected(&self) -> Option<&Book> { self.books.get(self.cursor) }

  fn begin_load(&mut self) { self.load = ListLoad::Loading; }

  fn loaded(&mut self, books: Vec<Book>) {
    self.books = books;
    self.cursor = self.cursor.min(self.books.len().saturating_sub(1));
    self.load = ListLoad::Ready;
  }

  fn failed(&mut self, message: String) { self.load = ListLoad::Failed(message); }

  /// Drop a deleted book without refetching.
  fn remove(&mut self, id: BookId) {
    self.books.retain(|b| b.id != id);
    self.cursor = self.cursor.min(self.books.len().saturating_sub(1));
  }

  fn move_down(&mut self) {
    if self.cursor + 1 < self.books.len() {
      self.cursor += 1;
    }
  }

  fn move_up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }
}

// ─── Book form view ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Title,
  Author,
  Description,
}

impl FormField {
  fn next(self) -> Self {
    match self {
      Self::Title => Self::Author,
      Self::Author => Self::Description,
      Self::Description => Self::Title,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Title => Self::Description,
      Self::Author => Self::Title,
      Self::Description => Self::Author,
    }
  }
}

/// State of the create/edit form.
#[derive(Debug)]
pub struct BookFormView {
  /// `Some(id)` when editing an existing book, `None` when creating.
  pub editing: Option<BookId>,
  pub fields:  BookFields,
  pub focus:   FormField,
  /// Label of the request in flight, if any.
  pub busy:    Option<&'static str>,
  /// Inline error shown above the fields.
  pub error:   Option<String>,
}

impl BookFormView {
  fn blank() -> Self {
    Self {
      editing: None,
      fields:  BookFields::default(),
      focus:   FormField::Title,
      busy:    None,
      error:   None,
    }
  }

  fn editing(id: BookId) -> Self {
    Self {
      editing: Some(id),
      busy: Some("Loading details…"),
      ..Self::blank()
    }
  }

  fn focused_mut(&mut self) -> &mut String {
    match self.focus {
      FormField::Title => &mut self.fields.title,
      FormField::Author => &mut self.fields.author,
      FormField::Description => &mut self.fields.description,
    }
  }
}

// ─── Pending requests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
  LoadList,
  LoadBook(BookId),
  Save,
  Delete(BookId),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen:     Screen,
  pub list:       BookListView,
  pub form:       BookFormView,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  pending:        Option<Pending>,
  client:         Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] whose first action is to fetch the catalog.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen:     Screen::BookList,
      list:       BookListView::new(),
      form:       BookFormView::blank(),
      status_msg: String::new(),
      pending:    Some(Pending::LoadList),
      client:     Arc::new(client),
    }
  }

  pub fn has_pending(&self) -> bool { self.pending.is_some() }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// Perform the recorded request, if any, and fold its outcome into state.
  pub async fn run_pending(&mut self) {
    let Some(pending) = self.pending.take() else { return };
    tracing::debug!(?pending, "running request");

    match pending {
      Pending::LoadList => match self.client.list_books().await {
        Ok(books) => self.list.loaded(books),
        Err(e) => {
          tracing::warn!(error = %e, "failed to fetch books");
          self.list.failed(format!("Failed to fetch books: {e}"));
        }
      },

      Pending::LoadBook(id) => {
        match self.client.get_book(id).await {
          Ok(book) => self.form.fields = book.fields(),
          Err(e) => {
            self.form.error = Some(format!("Failed to fetch book details: {e}"));
          }
        }
        self.form.busy = None;
      }

      Pending::Save => {
        let result = match self.form.editing {
          Some(id) => self.client.update_book(id, &self.form.fields).await,
          None => self.client.create_book(&self.form.fields).await.map(|_| ()),
        };
        self.form.busy = None;
        match result {
          Ok(()) => {
            self.status_msg = format!("Saved \u{201c}{}\u{201d}", self.form.fields.title);
            self.show_list(true);
          }
          Err(e) => {
            tracing::warn!(error = %e, "failed to save book");
            self.form.error = Some(format!("Failed to save book: {e}"));
          }
        }
      }

      Pending::Delete(id) => {
        match self.client.delete_book(id).await {
          Ok(()) => {
            self.list.remove(id);
            self.status_msg = format!("Deleted book {id}");
          }
          Err(e) => {
            tracing::warn!(id, error = %e, "failed to delete book");
            self.status_msg = format!("Failed to delete book: {e}");
          }
        }
        self.screen = Screen::BookList;
      }
    }
  }

  fn reload_list(&mut self) {
    self.list.begin_load();
    self.pending = Some(Pending::LoadList);
  }

  fn show_list(&mut self, refetch: bool) {
    self.screen = Screen::BookList;
    self.form = BookFormView::blank();
    if refetch {
      self.reload_list();
    }
  }

  fn open_form(&mut self, editing: Option<BookId>) {
    self.status_msg.clear();
    self.screen = Screen::BookForm;
    match editing {
      Some(id) => {
        self.form = BookFormView::editing(id);
        self.pending = Some(Pending::LoadBook(id));
      }
      None => self.form = BookFormView::blank(),
    }
  }

  fn submit(&mut self) {
    if let Err(e) = self.form.fields.validate() {
      self.form.error = Some(capitalise(&e.to_string()));
      return;
    }
    self.form.error = None;
    self.form.busy = Some("Saving…");
    self.pending = Some(Pending::Save);
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Some terminals also report releases and repeats.
    if key.kind != KeyEventKind::Press {
      return true;
    }

    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.screen.clone() {
      Screen::BookList => self.handle_list_key(key),
      Screen::BookForm => {
        self.handle_form_key(key);
        true
      }
      Screen::ConfirmDelete(id) => {
        self.handle_confirm_key(key, id);
        true
      }
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('q') {
      return false;
    }
    // The last outcome stays up until the next keypress, then hints return.
    self.status_msg.clear();

    match self.list.load {
      ListLoad::Loading => {}
      ListLoad::Failed(_) => {
        if key.code == KeyCode::Char('r') {
          self.reload_list();
        }
      }
      ListLoad::Ready => self.handle_ready_list_key(key.code),
    }
    true
  }

  fn handle_ready_list_key(&mut self, code: KeyCode) {
    match code {
      KeyCode::Down | KeyCode::Char('j') => self.list.move_down(),
      KeyCode::Up | KeyCode::Char('k') => self.list.move_up(),
      KeyCode::Char('r') => self.reload_list(),
      KeyCode::Char('a') => self.open_form(None),
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(id) = self.list.selected().map(|b| b.id) {
          self.open_form(Some(id));
        }
      }
      KeyCode::Delete | KeyCode::Char('d') => {
        if let Some(id) = self.list.selected().map(|b| b.id) {
          self.screen = Screen::ConfirmDelete(id);
        }
      }
      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    if self.form.busy.is_some() {
      return;
    }

    match key.code {
      KeyCode::Esc => self.show_list(false),
      KeyCode::Tab | KeyCode::Down => self.form.focus = self.form.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.form.focus = self.form.focus.prev(),
      KeyCode::Enter => self.submit(),
      KeyCode::Backspace => {
        self.form.focused_mut().pop();
      }
      KeyCode::Char(c) => self.form.focused_mut().push(c),
      _ => {}
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent, id: BookId) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        self.status_msg = "Deleting…".into();
        self.pending = Some(Pending::Delete(id));
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        self.screen = Screen::BookList;
      }
      _ => {}
    }
  }
}

fn capitalise(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use shelf_core::book::NewBook;
  use tokio::net::TcpListener;

  use crate::client::{
    ApiConfig,
    test_server::{serve_on, server},
  };

  async fn loaded_app(client: ApiClient) -> App {
    let mut app = App::new(client);
    app.run_pending().await;
    assert_eq!(app.list.load, ListLoad::Ready);
    app
  }

  fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
  }

  fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  #[test]
  fn remove_clamps_cursor() {
    let mut view = BookListView::new();
    view.loaded(
      (1..=3)
        .map(|id| Book {
          id,
          title: format!("Book {id}"),
          author: "A".into(),
          description: String::new(),
          created_at: chrono::Utc::now(),
        })
        .collect(),
    );
    view.cursor = 2;
    view.remove(3);
    assert_eq!(view.cursor, 1);
    assert_eq!(view.books().len(), 2);
  }

  #[tokio::test]
  async fn starts_loading_then_shows_empty_catalog() {
    let mut app = App::new(server().await);
    assert_eq!(app.list.load, ListLoad::Loading);
    assert!(app.has_pending());

    app.run_pending().await;
    assert_eq!(app.list.load, ListLoad::Ready);
    assert!(app.list.books().is_empty());
  }

  #[tokio::test]
  async fn create_through_form_returns_to_refetched_list() {
    let client = server().await;
    let mut app = loaded_app(client.clone()).await;

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.screen, Screen::BookForm);
    assert_eq!(app.form.fields, BookFields::default());

    type_text(&mut app, "Dune");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Herbert");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form.busy, Some("Saving…"));

    app.run_pending().await;
    assert_eq!(app.screen, Screen::BookList);
    assert_eq!(app.list.load, ListLoad::Loading);

    app.run_pending().await;
    assert_eq!(app.list.books().len(), 1);
    assert_eq!(app.list.books()[0].title, "Dune");
    assert_eq!(client.list_books().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn blank_required_field_is_caught_before_any_request() {
    let client = server().await;
    let mut app = loaded_app(client.clone()).await;

    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Dune");
    press(&mut app, KeyCode::Enter);

    assert!(!app.has_pending());
    assert_eq!(app.form.error.as_deref(), Some("Author is required"));
    assert_eq!(app.form.fields.title, "Dune");
    assert!(client.list_books().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn edit_prepopulates_and_saves() {
    let client = server().await;
    let book = client
      .create_book(&NewBook::new("Dune", "Herbert").with_description("Sand").into())
      .await
      .unwrap();
    let mut app = loaded_app(client.clone()).await;

    press(&mut app, KeyCode::Char('e'));
    assert_eq!(app.form.editing, Some(book.id));
    assert!(app.form.busy.is_some());

    app.run_pending().await;
    assert_eq!(app.form.fields, book.fields());

    type_text(&mut app, " Messiah");
    press(&mut app, KeyCode::Enter);
    app.run_pending().await;
    app.run_pending().await;

    assert_eq!(app.list.books()[0].title, "Dune Messiah");
    let stored = client.get_book(book.id).await.unwrap();
    assert_eq!(stored.title, "Dune Messiah");
    assert_eq!(stored.description, "Sand");
    assert_eq!(stored.created_at, book.created_at);
  }

  #[tokio::test]
  async fn failed_save_keeps_entered_data() {
    let client = server().await;
    let book = client
      .create_book(&NewBook::new("Dune", "Herbert").into())
      .await
      .unwrap();
    let mut app = loaded_app(client.clone()).await;

    press(&mut app, KeyCode::Enter);
    app.run_pending().await;
    type_text(&mut app, "!");

    // Someone else deletes it before we save.
    client.delete_book(book.id).await.unwrap();

    press(&mut app, KeyCode::Enter);
    app.run_pending().await;

    assert_eq!(app.screen, Screen::BookForm);
    assert!(app.form.error.as_deref().unwrap().starts_with("Failed to save book"));
    assert_eq!(app.form.fields.title, "Dune!");
    assert!(app.form.busy.is_none());
  }

  #[tokio::test]
  async fn delete_requires_confirmation_and_updates_locally() {
    let client = server().await;
    for title in ["Dune", "Emma"] {
      client
        .create_book(&NewBook::new(title, "Someone").into())
        .await
        .unwrap();
    }
    let mut app = loaded_app(client.clone()).await;

    press(&mut app, KeyCode::Char('d'));
    assert!(matches!(app.screen, Screen::ConfirmDelete(_)));
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.screen, Screen::BookList);
    assert!(!app.has_pending());
    assert_eq!(client.list_books().await.unwrap().len(), 2);

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));
    app.run_pending().await;

    assert_eq!(app.screen, Screen::BookList);
    assert!(!app.has_pending(), "delete must not trigger a refetch");
    let titles: Vec<_> = app.list.books().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Emma"]);
    assert_eq!(client.list_books().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn unreachable_server_shows_error_and_retry_recovers() {
    // Reserve a port, then free it so the first fetch is refused.
    let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);

    let client = ApiClient::new(ApiConfig { base_url: format!("http://{addr}") }).unwrap();
    let mut app = App::new(client);
    app.run_pending().await;
    assert!(matches!(&app.list.load, ListLoad::Failed(m) if m.starts_with("Failed to fetch books")));

    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.screen, Screen::BookList, "no form while the list is broken");

    serve_on(TcpListener::bind(addr).await.unwrap()).await;
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.list.load, ListLoad::Loading);
    app.run_pending().await;
    assert_eq!(app.list.load, ListLoad::Ready);
  }

  #[tokio::test]
  async fn key_releases_are_ignored() {
    let mut app = loaded_app(server().await).await;
    press(&mut app, KeyCode::Char('a'));

    let mut release = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    assert!(app.handle_key(release));
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.form.fields.title, "x");
  }

  #[tokio::test]
  async fn status_message_clears_on_next_list_key() {
    let client = server().await;
    client
      .create_book(&NewBook::new("Dune", "Herbert").into())
      .await
      .unwrap();
    let mut app = loaded_app(client).await;

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('y'));
    app.run_pending().await;
    assert_eq!(app.status_msg, "Deleted book 1");

    press(&mut app, KeyCode::Char('j'));
    assert!(app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn ctrl_c_and_q_quit() {
    let mut app = loaded_app(server().await).await;
    assert!(!app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!press(&mut app, KeyCode::Char('q')));

    press(&mut app, KeyCode::Char('a'));
    assert!(press(&mut app, KeyCode::Char('q')), "q is text inside the form");
    assert_eq!(app.form.fields.title, "q");
  }
}
