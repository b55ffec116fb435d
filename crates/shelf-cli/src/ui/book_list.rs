//! Book list pane — the catalog table.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, ListLoad};

/// Render the book list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let books = app.list.books();

  let block = Block::default()
    .title(format!(" Library Books ({}) ", books.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match &app.list.load {
    ListLoad::Loading => {
      f.render_widget(
        Paragraph::new("Loading collection…").style(Style::default().fg(Color::Gray)),
        inner,
      );
      return;
    }
    ListLoad::Failed(message) => {
      let text = vec![
        Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from("Ensure the server URL is correct and running, then press r to retry."),
      ];
      f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
      return;
    }
    ListLoad::Ready => {}
  }

  if books.is_empty() {
    f.render_widget(
      Paragraph::new(vec![
        Line::from("No books in the catalog."),
        Line::from(Span::styled(
          "Press a to add your first book.",
          Style::default().fg(Color::Gray),
        )),
      ]),
      inner,
    );
    return;
  }

  let header = Row::new(["Title", "Author", "Description"]).style(
    Style::default()
      .fg(Color::Gray)
      .add_modifier(Modifier::BOLD),
  );

  let rows = books.iter().map(|book| {
    let description = if book.description.is_empty() {
      Cell::from(Span::styled(
        "No description provided.",
        Style::default()
          .fg(Color::DarkGray)
          .add_modifier(Modifier::ITALIC),
      ))
    } else {
      Cell::from(book.description.as_str())
    };
    Row::new([
      Cell::from(Span::styled(
        book.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
      )),
      Cell::from(book.author.as_str()),
      description,
    ])
  });

  let mut state = TableState::default();
  state.select(Some(app.list.cursor));

  f.render_stateful_widget(
    Table::new(rows, [
      Constraint::Percentage(35),
      Constraint::Percentage(25),
      Constraint::Percentage(40),
    ])
    .header(header)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White),
    ),
    inner,
    &mut state,
  );
}
