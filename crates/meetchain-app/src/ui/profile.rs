//! Profile screen — one person's details and memory log.

use meetchain_core::{memory::MemoryKind, person::Person, roster};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, Paragraph},
};
use uuid::Uuid;

use crate::app::{App, ProfileTab};

use super::home::{format_date, relationship_icon};

fn memory_icon(kind: MemoryKind) -> &'static str {
  match kind {
    MemoryKind::Youtube => "▶ ",
    MemoryKind::Spotify => "🎵 ",
    MemoryKind::Photo => "📷 ",
    MemoryKind::Note => "📝 ",
  }
}

/// Render the profile into `area`.
pub fn draw<R>(f: &mut Frame, area: Rect, app: &App<R>, person_id: Uuid) {
  let person = roster::lock(&app.roster).get(person_id).cloned();

  let Some(person) = person else {
    // Inline error state for a record that no longer exists.
    let block = Block::default()
      .title(" Profile ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "That person is no longer in the roster.",
        Style::default().fg(Color::Red),
      ))),
      inner,
    );
    return;
  };

  let title = format!(
    " {}{} — {} ",
    relationship_icon(person.relationship),
    person.name,
    match app.profile_tab {
      ProfileTab::Info => "info",
      ProfileTab::Memories => "memories",
    }
  );
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match app.profile_tab {
    ProfileTab::Info => draw_info(f, inner, &person),
    ProfileTab::Memories => draw_memories(f, inner, app, &person),
  }
}

// ─── Info tab ─────────────────────────────────────────────────────────────────

fn draw_info(f: &mut Frame, area: Rect, person: &Person) {
  let label = Style::default().fg(Color::DarkGray);
  let value = Style::default().fg(Color::White);

  let mut lines = vec![
    Line::from(vec![
      Span::styled("Relationship  ", label),
      Span::styled(person.relationship.label(), value),
    ]),
    Line::from(vec![
      Span::styled("Meetings      ", label),
      Span::styled(person.meet_count.to_string(), value),
    ]),
    Line::from(vec![
      Span::styled("Last met      ", label),
      Span::styled(format_date(person.last_meet_date), value),
    ]),
    Line::from(vec![
      Span::styled("Title         ", label),
      Span::styled(person.title.clone(), value),
    ]),
    Line::from(vec![
      Span::styled("NFC tag       ", label),
      Span::styled(
        person.nfc_tag_id.clone().unwrap_or_else(|| "none".into()),
        value,
      ),
    ]),
  ];

  if !person.notes.is_empty() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Notes", label)));
    lines.push(Line::from(Span::styled(person.notes.clone(), value)));
  }

  f.render_widget(Paragraph::new(lines), area);
}

// ─── Memories tab ─────────────────────────────────────────────────────────────

fn draw_memories<R>(f: &mut Frame, area: Rect, app: &App<R>, person: &Person) {
  // Reserve the bottom line for the input field while a note is typed.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(area);

  if person.memories.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        "No memories yet. Press [m] to add a note.",
        Style::default().fg(Color::DarkGray),
      ))),
      rows[0],
    );
  } else {
    let items: Vec<ListItem> = person
      .memories
      .iter()
      .map(|memory| {
        ListItem::new(Line::from(vec![
          Span::raw(memory_icon(memory.kind)),
          Span::styled(
            memory.content.clone(),
            Style::default().fg(Color::White),
          ),
          Span::styled(
            format!("  {}", format_date(Some(memory.created_at))),
            Style::default().fg(Color::DarkGray),
          ),
        ]))
      })
      .collect();
    f.render_widget(List::new(items), rows[0]);
  }

  if let Some(input) = &app.memory_input {
    f.render_widget(
      Paragraph::new(Line::from(vec![
        Span::styled(
          "New memory: ",
          Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{input}_"), Style::default().fg(Color::Yellow)),
      ])),
      rows[1],
    );
  }
}
