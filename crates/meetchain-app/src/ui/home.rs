//! Home screen — the roster list.

use chrono::{DateTime, Local, Utc};
use meetchain_core::{person::Relationship, roster};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

pub fn relationship_icon(relationship: Relationship) -> &'static str {
  match relationship {
    Relationship::Friend => "👤 ",
    Relationship::Partner => "💞 ",
    Relationship::Family => "👪 ",
  }
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
  match date {
    Some(d) => d.with_timezone(&Local).format("%Y-%m-%d").to_string(),
    None => "never".to_string(),
  }
}

/// Render the roster list into `area`.
pub fn draw<R>(f: &mut Frame, area: Rect, app: &App<R>) {
  let roster = roster::lock(&app.roster);

  let block = Block::default()
    .title(format!(" People ({}) ", roster.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if roster.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "No people yet. Press [a] to register someone.",
        Style::default().fg(Color::DarkGray),
      ))),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = roster
    .people()
    .iter()
    .enumerate()
    .map(|(i, person)| {
      let style = if i == app.list_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      let detail_style = if i == app.list_cursor {
        style
      } else {
        Style::default().fg(Color::DarkGray)
      };

      ListItem::new(Line::from(vec![
        Span::styled(relationship_icon(person.relationship), style),
        Span::styled(person.name.clone(), style),
        Span::styled(
          format!(
            "  {} meets · last {}",
            person.meet_count,
            format_date(person.last_meet_date)
          ),
          detail_style,
        ),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner,
    &mut state,
  );
}
