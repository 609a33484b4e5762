//! `meetchain` — terminal UI for the MeetChain roster.
//!
//! # Usage
//!
//! ```
//! meetchain --store ~/.local/share/meetchain/meetchain.db
//! meetchain --config ~/.config/meetchain/config.toml
//! meetchain --demo
//! ```

mod app;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use meetchain_core::{Roster, reader::TagReader, store::RosterStore as _};
use meetchain_nfc::{ChannelTransport, NfcAdapter, SocketTransport};
use meetchain_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/meetchain/meetchain.db";
const DEFAULT_NFC_SOCKET: &str = "/run/meetchain/nfc-bridge.sock";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "meetchain", about = "Terminal UI for the MeetChain roster")]
struct Args {
  /// Path to a TOML config file (store_path, nfc_socket).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Path to the SQLite roster store.
  #[arg(long, env = "MEETCHAIN_STORE")]
  store: Option<PathBuf>,

  /// Unix socket of the NFC reader bridge.
  #[arg(long, env = "MEETCHAIN_NFC_SOCKET")]
  nfc_socket: Option<PathBuf>,

  /// Run without hardware: keystrokes simulate tag presentations.
  #[arg(long)]
  demo: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  store_path: String,
  #[serde(default)]
  nfc_socket: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let store_path = expand_tilde(&args.store.unwrap_or_else(|| {
    if file_cfg.store_path.is_empty() {
      PathBuf::from(DEFAULT_STORE_PATH)
    } else {
      PathBuf::from(&file_cfg.store_path)
    }
  }));
  let nfc_socket = args.nfc_socket.unwrap_or_else(|| {
    if file_cfg.nfc_socket.is_empty() {
      PathBuf::from(DEFAULT_NFC_SOCKET)
    } else {
      PathBuf::from(&file_cfg.nfc_socket)
    }
  });

  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }

  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("opening store at {}", store_path.display()))?,
  );

  // Populate the in-memory roster from the durable mirror.
  let mut roster = Roster::new();
  roster.set_all(store.load().await);
  let roster = roster.into_shared();

  // Hardware or demo reader; the app is generic over either.
  if args.demo {
    let (transport, tags) = ChannelTransport::new();
    let reader = Arc::new(NfcAdapter::new(transport));
    let app = App::new(roster, store, reader, Some(tags));
    run(app).await
  } else {
    let reader = Arc::new(NfcAdapter::new(SocketTransport::new(nfc_socket)));
    let app = App::new(roster, store, reader, None);
    run(app).await
  }
}

/// Set up the terminal, run the event loop, and restore the terminal even
/// on error.
async fn run<R>(mut app: App<R>) -> Result<()>
where
  R: TagReader + 'static,
{
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<R>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<R>,
) -> Result<()>
where
  R: TagReader + 'static,
{
  loop {
    // Apply background-task results and timers before drawing.
    app.tick();

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
