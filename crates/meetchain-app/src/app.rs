//! Application state machine and event dispatcher.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use meetchain_core::{
  memory::Memory,
  person::{NewPerson, PLACEHOLDER_IMAGE, Person, Relationship},
  reader::TagReader,
  roster::{self, SharedRoster},
  store::RosterStore as _,
};
use meetchain_scan::{ScanEvent, ScanFlow, ScanOutcome};
use meetchain_store_sqlite::SqliteStore;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How long the meet-success screen lingers before returning home.
pub const MEET_SUCCESS_DWELL: Duration = Duration::from_secs(5);

// ─── Screen ───────────────────────────────────────────────────────────────────

/// The five navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Roster list.
  Home,
  /// Live scan with the running scan flow.
  Scan,
  /// Result view after a successful meet; auto-returns home at `until`.
  MeetSuccess { person_id: Uuid, until: Instant },
  /// One person's details and memories.
  Profile { person_id: Uuid },
  /// Registration form.
  AddPerson,
}

// ─── Add-person form ──────────────────────────────────────────────────────────

/// Which form field currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
  Name,
  Relationship,
  Tag,
  Notes,
}

impl AddField {
  fn next(self) -> Self {
    match self {
      Self::Name => Self::Relationship,
      Self::Relationship => Self::Tag,
      Self::Tag => Self::Notes,
      Self::Notes => Self::Name,
    }
  }

  fn prev(self) -> Self {
    match self {
      Self::Name => Self::Notes,
      Self::Relationship => Self::Name,
      Self::Tag => Self::Relationship,
      Self::Notes => Self::Tag,
    }
  }
}

/// In-progress registration form state.
#[derive(Debug)]
pub struct AddForm {
  pub name:         String,
  pub relationship: Relationship,
  pub tag:          Option<String>,
  pub notes:        String,
  pub field:        AddField,
}

impl Default for AddForm {
  fn default() -> Self {
    Self {
      name:         String::new(),
      relationship: Relationship::Friend,
      tag:          None,
      notes:        String::new(),
      field:        AddField::Name,
    }
  }
}

fn cycle_relationship(current: Relationship, forward: bool) -> Relationship {
  match (current, forward) {
    (Relationship::Friend, true) => Relationship::Partner,
    (Relationship::Partner, true) => Relationship::Family,
    (Relationship::Family, true) => Relationship::Friend,
    (Relationship::Friend, false) => Relationship::Family,
    (Relationship::Partner, false) => Relationship::Friend,
    (Relationship::Family, false) => Relationship::Partner,
  }
}

// ─── Profile ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
  Info,
  Memories,
}

// ─── Background tasks ─────────────────────────────────────────────────────────

/// Handles to the running scan flow; dropped (and cancelled) when the
/// scan screen is left.
struct ScanTask {
  cancel:  CancellationToken,
  events:  mpsc::UnboundedReceiver<ScanEvent>,
  outcome: oneshot::Receiver<ScanOutcome>,
}

/// One-shot tag read used by the add-person form.
struct TagCapture {
  result: oneshot::Receiver<Option<String>>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<R> {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Process-wide roster; also mutated by the scan flow task.
  pub roster: SharedRoster,

  /// Durable mirror; always written with the complete roster.
  pub store: Arc<SqliteStore>,

  /// The device NFC reader.
  pub reader: Arc<R>,

  /// Cursor position within the home list.
  pub list_cursor: usize,

  /// Message shown in the scan screen's centre panel.
  pub scan_message: String,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Which profile tab is visible.
  pub profile_tab: ProfileTab,

  /// In-progress memory note, when the user is typing one.
  pub memory_input: Option<String>,

  /// Registration form state.
  pub add_form: AddForm,

  /// Whether the form is waiting on a one-shot tag read.
  pub capturing_tag: bool,

  /// Demo mode: keystrokes present simulated tags through this sender.
  demo_tags: Option<mpsc::UnboundedSender<String>>,
  demo_seq:  u32,

  scan:        Option<ScanTask>,
  tag_capture: Option<TagCapture>,
}

impl<R> App<R> {
  pub fn new(
    roster: SharedRoster,
    store: Arc<SqliteStore>,
    reader: Arc<R>,
    demo_tags: Option<mpsc::UnboundedSender<String>>,
  ) -> Self {
    Self {
      screen: Screen::Home,
      roster,
      store,
      reader,
      list_cursor: 0,
      scan_message: String::new(),
      status_msg: String::new(),
      profile_tab: ProfileTab::Info,
      memory_input: None,
      add_form: AddForm::default(),
      capturing_tag: false,
      demo_tags,
      demo_seq: 0,
      scan: None,
      tag_capture: None,
    }
  }

  pub fn demo_mode(&self) -> bool {
    self.demo_tags.is_some()
  }

  /// The person under the home-list cursor, if any.
  pub fn cursor_person(&self) -> Option<Person> {
    roster::lock(&self.roster)
      .people()
      .get(self.list_cursor)
      .cloned()
  }

  // ── Per-frame upkeep ──────────────────────────────────────────────────────

  /// Drain background-task results and apply time-based transitions.
  /// Called once per frame, before drawing.
  pub fn tick(&mut self) {
    // Meet-success auto-return, unless the user already navigated away.
    if let Screen::MeetSuccess { until, .. } = self.screen
      && Instant::now() >= until
    {
      self.screen = Screen::Home;
    }

    if let Some(task) = &mut self.scan {
      while let Ok(event) = task.events.try_recv() {
        self.scan_message = match event {
          ScanEvent::AwaitingTag => "Hold a tag near the reader…".into(),
          ScanEvent::TagUnregistered { tag_id } => {
            format!("Tag {tag_id} is not registered. Still scanning…")
          }
          ScanEvent::ReadFailed => {
            "Scan failed. Trying again shortly…".into()
          }
        };
      }

      match task.outcome.try_recv() {
        Ok(outcome) => {
          self.scan = None;
          match outcome {
            ScanOutcome::Matched { person } => {
              self.screen = Screen::MeetSuccess {
                person_id: person.id,
                until:     Instant::now() + MEET_SUCCESS_DWELL,
              };
            }
            ScanOutcome::Unavailable => {
              self.scan_message =
                "NFC is not supported or is disabled on this device."
                  .into();
            }
            ScanOutcome::Cancelled => {}
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {}
        Err(oneshot::error::TryRecvError::Closed) => {
          self.scan = None;
        }
      }
    }

    if let Some(capture) = &mut self.tag_capture {
      match capture.result.try_recv() {
        Ok(read) => {
          self.tag_capture = None;
          self.capturing_tag = false;
          match read {
            Some(tag_id) => {
              self.status_msg = format!("Captured tag {tag_id}.");
              self.add_form.tag = Some(tag_id);
            }
            None => {
              self.status_msg =
                "Tag capture failed. Try again.".into();
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {}
        Err(oneshot::error::TryRecvError::Closed) => {
          self.tag_capture = None;
          self.capturing_tag = false;
        }
      }
    }
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Mirror the complete in-memory roster to storage. Failures are logged
  /// and shown in the status bar; the in-memory state stays authoritative.
  async fn persist(&mut self) {
    let snapshot = roster::lock(&self.roster).snapshot();
    if let Err(e) = self.store.save(&snapshot).await {
      tracing::warn!("failed to persist roster: {e}");
      self.status_msg = "Warning: changes could not be saved.".into();
    }
  }
}

impl<R> App<R>
where
  R: TagReader + 'static,
{
  // ── Scan flow lifecycle ───────────────────────────────────────────────────

  /// Enter the scan screen and spawn the scan flow.
  fn start_scan(&mut self) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let cancel = CancellationToken::new();

    let flow = ScanFlow::new(
      Arc::clone(&self.reader),
      Arc::clone(&self.store),
      Arc::clone(&self.roster),
      events_tx,
    );
    let token = cancel.clone();
    tokio::spawn(async move {
      let _ = outcome_tx.send(flow.run(token).await);
    });

    self.scan = Some(ScanTask {
      cancel,
      events: events_rx,
      outcome: outcome_rx,
    });
    self.scan_message = "Preparing NFC…".into();
    self.screen = Screen::Scan;
  }

  /// Leaving the scan screen must release the NFC hardware session.
  fn stop_scan(&mut self) {
    if let Some(task) = self.scan.take() {
      task.cancel.cancel();
    }
  }

  /// One-shot tag read for the registration form.
  fn start_tag_capture(&mut self) {
    let reader = Arc::clone(&self.reader);
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let read = if reader.initialize().await {
        reader.read_tag_id().await
      } else {
        None
      };
      let _ = tx.send(read);
    });
    self.tag_capture = Some(TagCapture { result: rx });
    self.capturing_tag = true;
    self.status_msg = "Hold a tag near the reader…".into();
  }

  async fn stop_tag_capture(&mut self) {
    self.tag_capture = None;
    self.capturing_tag = false;
    self.reader.cancel().await;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      self.shutdown().await;
      return Ok(false);
    }

    match self.screen {
      Screen::Home => self.handle_home_key(key).await,
      Screen::Scan => self.handle_scan_key(key).await,
      Screen::MeetSuccess { .. } => {
        self.handle_meet_success_key(key);
        Ok(true)
      }
      Screen::Profile { person_id } => {
        self.handle_profile_key(key, person_id).await
      }
      Screen::AddPerson => self.handle_add_key(key).await,
    }
  }

  /// Release background work before exiting.
  pub async fn shutdown(&mut self) {
    self.stop_scan();
    self.reader.cancel().await;
  }

  async fn handle_home_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => {
        self.shutdown().await;
        return Ok(false);
      }

      KeyCode::Down | KeyCode::Char('j') => {
        let len = roster::lock(&self.roster).len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(person) = self.cursor_person() {
          self.profile_tab = ProfileTab::Info;
          self.memory_input = None;
          self.screen = Screen::Profile { person_id: person.id };
        }
      }

      KeyCode::Char('s') => self.start_scan(),

      KeyCode::Char('a') => {
        self.add_form = AddForm::default();
        self.screen = Screen::AddPerson;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_scan_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => {
        self.shutdown().await;
        return Ok(false);
      }

      KeyCode::Esc => {
        self.stop_scan();
        self.screen = Screen::Home;
      }

      // Demo mode: simulate tag presentations from the keyboard.
      KeyCode::Char('t') if self.demo_mode() => {
        let tag = roster::lock(&self.roster)
          .people()
          .iter()
          .find_map(|p| p.nfc_tag_id.clone());
        match tag {
          Some(tag) => self.present_demo_tag(tag),
          None => {
            self.status_msg =
              "No tagged people to simulate. Register one first.".into();
          }
        }
      }
      KeyCode::Char('u') if self.demo_mode() => {
        self.present_demo_tag("DEMO-UNREGISTERED".into());
      }

      _ => {}
    }
    Ok(true)
  }

  fn handle_meet_success_key(&mut self, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
      self.screen = Screen::Home;
    }
  }

  async fn handle_profile_key(
    &mut self,
    key: KeyEvent,
    person_id: Uuid,
  ) -> anyhow::Result<bool> {
    // Memory input mode: printable keys go into the note.
    if self.memory_input.is_some() {
      self.handle_memory_input_key(key, person_id).await;
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => {
        self.shutdown().await;
        return Ok(false);
      }

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::Home;
      }

      KeyCode::Tab => {
        self.profile_tab = match self.profile_tab {
          ProfileTab::Info => ProfileTab::Memories,
          ProfileTab::Memories => ProfileTab::Info,
        };
      }

      KeyCode::Char('m') => {
        self.memory_input = Some(String::new());
        self.profile_tab = ProfileTab::Memories;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_memory_input_key(&mut self, key: KeyEvent, person_id: Uuid) {
    match key.code {
      KeyCode::Esc => {
        self.memory_input = None;
      }
      KeyCode::Enter => {
        let note = self.memory_input.take().unwrap_or_default();
        if note.trim().is_empty() {
          return;
        }
        let appended = {
          let mut roster = roster::lock(&self.roster);
          match roster.get(person_id).cloned() {
            Some(mut person) => {
              person.memories.push(Memory::note(note.trim()));
              roster.update(person);
              true
            }
            None => false,
          }
        };
        if appended {
          self.persist().await;
          self.status_msg = "Memory added.".into();
        } else {
          self.status_msg = "That person no longer exists.".into();
        }
      }
      KeyCode::Backspace => {
        if let Some(input) = &mut self.memory_input {
          input.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(input) = &mut self.memory_input {
          input.push(c);
        }
      }
      _ => {}
    }
  }

  async fn handle_add_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // While a capture is pending, only Esc (cancel) and the demo
    // presentation key are meaningful.
    if self.capturing_tag {
      match key.code {
        KeyCode::Esc => {
          self.stop_tag_capture().await;
          self.status_msg = "Tag capture cancelled.".into();
        }
        KeyCode::Char('t') if self.demo_mode() => {
          self.demo_seq += 1;
          let tag = format!("DEMO-TAG-{:04}", self.demo_seq);
          self.present_demo_tag(tag);
        }
        _ => {}
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Esc => {
        self.screen = Screen::Home;
      }

      KeyCode::Tab | KeyCode::Down => {
        self.add_form.field = self.add_form.field.next();
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.add_form.field = self.add_form.field.prev();
      }

      KeyCode::Left if self.add_form.field == AddField::Relationship => {
        self.add_form.relationship =
          cycle_relationship(self.add_form.relationship, false);
      }
      KeyCode::Right if self.add_form.field == AddField::Relationship => {
        self.add_form.relationship =
          cycle_relationship(self.add_form.relationship, true);
      }

      KeyCode::Enter => {
        if self.add_form.field == AddField::Tag {
          self.start_tag_capture();
        } else {
          self.submit_add_form().await;
        }
      }

      KeyCode::Backspace => match self.add_form.field {
        AddField::Name => {
          self.add_form.name.pop();
        }
        AddField::Notes => {
          self.add_form.notes.pop();
        }
        AddField::Tag => {
          self.add_form.tag = None;
        }
        AddField::Relationship => {}
      },

      KeyCode::Char(c) => match self.add_form.field {
        AddField::Name => self.add_form.name.push(c),
        AddField::Notes => self.add_form.notes.push(c),
        AddField::Relationship | AddField::Tag => {}
      },

      _ => {}
    }
    Ok(true)
  }

  /// Validate the form, register the person, and persist the complete
  /// roster.
  async fn submit_add_form(&mut self) {
    let name = self.add_form.name.trim().to_owned();
    if name.is_empty() {
      self.status_msg = "Name is required.".into();
      return;
    }

    let person = Person::new(NewPerson {
      name:         name.clone(),
      relationship: self.add_form.relationship,
      image_uri:    PLACEHOLDER_IMAGE.to_owned(),
      nfc_tag_id:   self.add_form.tag.take(),
      notes:        self.add_form.notes.trim().to_owned(),
    });

    roster::lock(&self.roster).add(person);
    self.persist().await;

    self.status_msg = format!("Added {name}.");
    self.add_form = AddForm::default();
    self.screen = Screen::Home;
  }

  fn present_demo_tag(&mut self, tag: String) {
    if let Some(sender) = &self.demo_tags {
      let _ = sender.send(tag);
    }
  }
}
