//! Scan screen — live NFC scan status.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Render the scan panel into `area`.
pub fn draw<R>(f: &mut Frame, area: Rect, app: &App<R>) {
  let block = Block::default()
    .title(" NFC Scan ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // Centre the message vertically.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage(40),
      Constraint::Length(3),
      Constraint::Min(0),
    ])
    .split(inner);

  let mut lines = vec![Line::from(Span::styled(
    app.scan_message.clone(),
    Style::default().fg(Color::White),
  ))];
  if app.demo_mode() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "demo mode — [t] presents a registered tag, [u] an unknown one",
      Style::default().fg(Color::DarkGray),
    )));
  }

  f.render_widget(
    Paragraph::new(lines).alignment(Alignment::Center),
    rows[1],
  );
}
