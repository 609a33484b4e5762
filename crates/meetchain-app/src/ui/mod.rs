//! TUI rendering — one module per screen plus the shared frame.

pub mod add_person;
pub mod home;
pub mod meet_success;
pub mod profile;
pub mod scan;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<R>(f: &mut Frame, app: &App<R>) {
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
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

fn draw_body<R>(f: &mut Frame, area: Rect, app: &App<R>) {
  match app.screen {
    Screen::Home => home::draw(f, area, app),
    Screen::Scan => scan::draw(f, area, app),
    Screen::MeetSuccess { person_id, .. } => {
      meet_success::draw(f, area, app, person_id)
    }
    Screen::Profile { person_id } => profile::draw(f, area, app, person_id),
    Screen::AddPerson => add_person::draw(f, area, app),
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " meetchain",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<R>(f: &mut Frame, area: Rect, app: &App<R>) {
  let (mode_label, hints) = match app.screen {
    Screen::Home => (
      "HOME",
      "↑↓/jk navigate  Enter profile  s scan  a add  q quit",
    ),
    Screen::Scan if app.demo_mode() => {
      ("SCAN", "t present tag  u unknown tag  Esc back  q quit")
    }
    Screen::Scan => ("SCAN", "Esc back  q quit"),
    Screen::MeetSuccess { .. } => ("MEET", "Enter/Esc home"),
    Screen::Profile { .. } if app.memory_input.is_some() => {
      ("MEMORY", "Type a note  Enter save  Esc cancel")
    }
    Screen::Profile { .. } => {
      ("PROFILE", "Tab info/memories  m add memory  Esc back  q quit")
    }
    Screen::AddPerson if app.capturing_tag && app.demo_mode() => {
      ("ADD", "t present tag  Esc cancel capture")
    }
    Screen::AddPerson if app.capturing_tag => ("ADD", "Esc cancel capture"),
    Screen::AddPerson => (
      "ADD",
      "Tab/↑↓ field  ←→ relationship  Enter submit (scan on tag field)  Esc cancel",
    ),
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
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
