//! Meet-success screen — shown after a scan resolves to a person.

use meetchain_core::roster;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use uuid::Uuid;

use crate::app::App;

/// Render the meet-success panel into `area`.
pub fn draw<R>(f: &mut Frame, area: Rect, app: &App<R>, person_id: Uuid) {
  let block = Block::default()
    .title(" You met! ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Green));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage(30),
      Constraint::Length(6),
      Constraint::Min(0),
    ])
    .split(inner);

  let person = roster::lock(&app.roster).get(person_id).cloned();

  let lines = match person {
    Some(person) => vec![
      Line::from(Span::styled(
        person.name.clone(),
        Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )),
      Line::from(Span::styled(
        format!("Meeting #{}", person.meet_count),
        Style::default().fg(Color::Green),
      )),
      Line::from(Span::styled(
        person.title.clone(),
        Style::default().fg(Color::DarkGray),
      )),
      Line::from(""),
      Line::from(Span::styled(
        "Returning home shortly…",
        Style::default().fg(Color::DarkGray),
      )),
    ],
    // The record may have been replaced underneath us; render an inline
    // error rather than crashing.
    None => vec![Line::from(Span::styled(
      "That person is no longer in the roster.",
      Style::default().fg(Color::Red),
    ))],
  };

  f.render_widget(
    Paragraph::new(lines).alignment(Alignment::Center),
    rows[1],
  );
}
