//! Create/edit form pane.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, FormField};

/// Render the form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form = &app.form;
  let title = if form.editing.is_some() { " Edit Book " } else { " Add New Book " };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(busy) = form.busy {
    f.render_widget(
      Paragraph::new(busy).style(Style::default().fg(Color::Gray)),
      inner,
    );
    return;
  }

  let [error_area, title_area, author_area, description_area] = Layout::vertical([
    Constraint::Length(2),
    Constraint::Length(3),
    Constraint::Length(3),
    Constraint::Min(3),
  ])
  .areas(inner);

  if let Some(error) = &form.error {
    f.render_widget(
      Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        .wrap(Wrap { trim: true }),
      error_area,
    );
  }

  draw_field(f, title_area, "Book Title *", &form.fields.title, form.focus == FormField::Title);
  draw_field(f, author_area, "Author Name *", &form.fields.author, form.focus == FormField::Author);
  draw_field(
    f,
    description_area,
    "Description",
    &form.fields.description,
    form.focus == FormField::Description,
  );
}

fn draw_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let border = if focused {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let block = Block::default()
    .title(format!(" {label} "))
    .borders(Borders::ALL)
    .border_style(border);

  let mut spans = vec![Span::raw(value)];
  if focused {
    spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
  }

  f.render_widget(
    Paragraph::new(Line::from(spans))
      .block(block)
      .wrap(Wrap { trim: false }),
    area,
  );
}
