//! Add-person screen — the registration form.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{AddField, App};

/// Render the registration form into `area`.
pub fn draw<R>(f: &mut Frame, area: Rect, app: &App<R>) {
  let block = Block::default()
    .title(" Add person ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let form = &app.add_form;

  let tag_value = if app.capturing_tag {
    "scanning…".to_string()
  } else {
    form
      .tag
      .clone()
      .unwrap_or_else(|| "press Enter to scan".to_string())
  };

  let rows: [(AddField, &str, String); 4] = [
    (AddField::Name, "Name *       ", format!("{}_", form.name)),
    (
      AddField::Relationship,
      "Relationship ",
      format!("‹ {} ›", form.relationship.label()),
    ),
    (AddField::Tag, "NFC tag      ", tag_value),
    (AddField::Notes, "Notes        ", format!("{}_", form.notes)),
  ];

  let mut lines = vec![Line::from("")];
  for (field, label, value) in rows {
    let focused = form.field == field;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let value_style = if focused {
      Style::default().fg(Color::White)
    } else {
      Style::default().fg(Color::Gray)
    };
    let marker = if focused { "▸ " } else { "  " };

    lines.push(Line::from(vec![
      Span::styled(marker, label_style),
      Span::styled(label, label_style),
      Span::styled(value, value_style),
    ]));
    lines.push(Line::from(""));
  }

  lines.push(Line::from(Span::styled(
    "  The tag pairs this person with a physical token; scans of it",
    Style::default().fg(Color::DarkGray),
  )));
  lines.push(Line::from(Span::styled(
    "  will count your meetings.",
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
