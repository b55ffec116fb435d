//! TUI rendering — orchestrates all panes.

pub mod book_form;
pub mod book_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, ListLoad, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  match app.screen {
    Screen::BookList => book_list::draw(f, rows[1], app),
    Screen::BookForm => book_form::draw(f, rows[1], app),
    Screen::ConfirmDelete(id) => {
      book_list::draw(f, rows[1], app);
      draw_confirm(f, rows[1], app, id);
    }
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " shelf  library catalog",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, app: &App, id: shelf_core::book::BookId) {
  let title = app
    .list
    .books()
    .iter()
    .find(|b| b.id == id)
    .map(|b| b.title.as_str())
    .unwrap_or("this book");

  let popup = centered(area, 50, 5);
  let block = Block::default()
    .title(" Delete ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let text = vec![
    Line::from(format!("Are you sure you want to delete \u{201c}{title}\u{201d}?")),
    Line::from(""),
    Line::from(vec![
      Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
      Span::raw(" delete   "),
      Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw(" cancel"),
    ]),
  ];

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
    popup,
  );
}

/// A `width`×`height` rectangle centred in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    Screen::BookList => match app.list.load {
      ListLoad::Loading => ("LOADING", "q quit"),
      ListLoad::Failed(_) => ("ERROR", "r retry  q quit"),
      ListLoad::Ready => (
        "LIST",
        "↑↓/jk navigate  a add  e/Enter edit  d delete  r reload  q quit",
      ),
    },
    Screen::BookForm => ("FORM", "Tab next field  Enter save  Esc cancel"),
    Screen::ConfirmDelete(_) => ("CONFIRM", "y delete  n cancel"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
