//! The event loop: crossterm input and async completions arrive as
//! [`UiMsg`]s on one channel; each handler produces state transitions on the
//! [`UiState`] record and the tick redraws from a snapshot.

use crate::{
    clipboard,
    command::{Command, parse_command},
    render::{ExplainView, render_classification, render_explain_lines},
    state::{Notice, Phase, Tab, UiState},
    styles,
    view::{self, UiSnap},
};
use anyhow::Result;
use crossterm::{
    event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hearsay_client::{Classification, DetectorClient, ExplainReport, validate_claim, validate_url};
use hearsay_common::HearsayError;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use crate::shutdown::ShutdownHandle;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MAILBOX: usize = 256;

pub enum UiMsg {
    InputEvent(CtEvent),
    Tick,
    /// Route one submitted input line: command or check.
    Submit(String),
    /// Dispatch a check of the active tab, whatever the line looks like.
    Check,
    CheckDone {
        generation: u64,
        outcome: Result<Classification, HearsayError>,
    },
    ExplainDone {
        generation: u64,
        outcome: Result<ExplainReport, HearsayError>,
    },
    HealthDone(bool),
    ScrollUp,
    ScrollDown,
    Shutdown,
}

pub struct App {
    client: Arc<DetectorClient>,

    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,

    state: UiState,
    dirty: bool,
    spin_idx: usize,

    tx: mpsc::Sender<UiMsg>,
    rx: mpsc::Receiver<UiMsg>,
    shutdown: ShutdownHandle,
    stopping: bool,
}

impl App {
    pub fn new(client: DetectorClient) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        let (tx, rx) = mpsc::channel(MAILBOX);

        Ok(Self {
            client: Arc::new(client),
            term,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            state: UiState::default(),
            dirty: true,
            spin_idx: 0,
            tx,
            rx,
            shutdown: ShutdownHandle::new(),
            stopping: false,
        })
    }

    /// Run until quit. Restores the terminal on the way out.
    pub async fn run(mut self) -> Result<()> {
        crate::feeders::spawn_feeders(self.tx.clone(), self.shutdown.clone());
        self.probe_health();

        while let Some(msg) = self.rx.recv().await {
            self.handle(msg)?;
            if self.stopping {
                break;
            }
        }

        self.shutdown.signal();
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        Ok(())
    }

    fn handle(&mut self, msg: UiMsg) -> Result<()> {
        match msg {
            UiMsg::InputEvent(ev) => {
                if let CtEvent::Key(k) = ev
                    && let Some(next) = self.handle_key(k)
                {
                    let _ = self.tx.try_send(next);
                }
            }
            UiMsg::Submit(line) => self.route_submit(line),
            UiMsg::Check => self.dispatch_check(),
            UiMsg::CheckDone {
                generation,
                outcome,
            } => {
                if !self.state.is_current(generation) {
                    tracing::debug!(generation, "stale check completion dropped");
                    return Ok(());
                }
                match outcome {
                    Ok(reply) => {
                        let view = render_classification(&reply);
                        self.state.render_result(view);
                    }
                    Err(e) => self.state.fail(format!("Error: {e}")),
                }
                self.dirty = true;
            }
            UiMsg::ExplainDone {
                generation,
                outcome,
            } => {
                if !self.state.is_current(generation) {
                    tracing::debug!(generation, "stale explain completion dropped");
                    return Ok(());
                }
                match outcome {
                    Ok(report) => {
                        self.state.phase = Phase::Idle;
                        self.render_explain(ExplainView::from(&report));
                    }
                    Err(e) => self.state.fail(format!("Error: {e}")),
                }
                self.dirty = true;
            }
            UiMsg::HealthDone(healthy) => {
                self.state.api_healthy = Some(healthy);
                if healthy {
                    self.state
                        .push(Notice::new("✓ API is healthy".to_string(), styles::system()));
                } else {
                    self.state.push(Notice::new(
                        "✗ API connection failed — is the detector running?".to_string(),
                        styles::error(),
                    ));
                }
                self.dirty = true;
            }
            UiMsg::ScrollUp => {
                self.state.scroll = self.state.scroll.saturating_add(1);
                self.dirty = true;
            }
            UiMsg::ScrollDown => {
                self.state.scroll = self.state.scroll.saturating_sub(1);
                self.dirty = true;
            }
            UiMsg::Tick => {
                self.step_spinner();
                if self.state.step_bars() {
                    self.dirty = true;
                }
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            UiMsg::Shutdown => {
                self.stopping = true;
            }
        }

        Ok(())
    }

    // ---- input editing ----

    fn cursor_left(&mut self) {
        if self.state.cursor == 0 {
            return;
        }
        self.state.cursor -= 1;
        while self.state.cursor > 0 && !self.state.active_input().is_char_boundary(self.state.cursor)
        {
            self.state.cursor -= 1;
        }
    }

    fn cursor_right(&mut self) {
        let len = self.state.active_input().len();
        if self.state.cursor >= len {
            return;
        }
        self.state.cursor += 1;
        while self.state.cursor < len
            && !self.state.active_input().is_char_boundary(self.state.cursor)
        {
            self.state.cursor += 1;
        }
    }

    fn insert_char(&mut self, ch: char) {
        let cursor = self.state.cursor;
        self.state.active_input_mut().insert(cursor, ch);
        self.state.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.state.cursor == 0 {
            return;
        }
        let mut prev = self.state.cursor.saturating_sub(1);
        while prev > 0 && !self.state.active_input().is_char_boundary(prev) {
            prev -= 1;
        }
        let cursor = self.state.cursor;
        self.state.active_input_mut().drain(prev..cursor);
        self.state.cursor = prev;
    }

    fn delete(&mut self) {
        let len = self.state.active_input().len();
        if self.state.cursor >= len {
            return;
        }
        let start = self.state.cursor;
        let mut end = start + 1;
        while end < len && !self.state.active_input().is_char_boundary(end) {
            end += 1;
        }
        self.state.active_input_mut().drain(start..end);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UiMsg> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(UiMsg::Shutdown),
            // Platform-modifier + Enter always dispatches the active tab.
            (KeyCode::Enter, m)
                if m.contains(KeyModifiers::CONTROL) || m.contains(KeyModifiers::SUPER) =>
            {
                return Some(UiMsg::Check);
            }
            (KeyCode::Enter, _) => {
                let line = self.state.active_input().to_string();
                return Some(UiMsg::Submit(line));
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.state.switch_tab();
                self.dirty = true;
            }
            (KeyCode::PageUp, _) => {
                self.state.scroll = self.state.scroll.saturating_add(5);
                self.dirty = true;
            }
            (KeyCode::PageDown, _) => {
                self.state.scroll = self.state.scroll.saturating_sub(5);
                self.dirty = true;
            }
            (KeyCode::Up, _) => return Some(UiMsg::ScrollUp),
            (KeyCode::Down, _) => return Some(UiMsg::ScrollDown),
            (KeyCode::Left, _) => {
                self.cursor_left();
                self.dirty = true;
            }
            (KeyCode::Right, _) => {
                self.cursor_right();
                self.dirty = true;
            }
            (KeyCode::Home, _) => {
                self.state.cursor = 0;
                self.dirty = true;
            }
            (KeyCode::End, _) => {
                self.state.cursor = self.state.active_input().len();
                self.dirty = true;
            }
            (KeyCode::Backspace, _) => {
                self.backspace();
                self.dirty = true;
            }
            (KeyCode::Delete, _) => {
                self.delete();
                self.dirty = true;
            }
            (KeyCode::Esc, _) => {
                self.state.active_input_mut().clear();
                self.state.cursor = 0;
                self.dirty = true;
            }
            (KeyCode::Char(ch), _) => {
                self.insert_char(ch);
                self.dirty = true;
            }
            _ => {}
        }
        None
    }

    // ---- dispatch ----

    fn route_submit(&mut self, line: String) {
        let s = line.trim().to_string();
        if s.is_empty() {
            return;
        }

        if s.starts_with('/') {
            // The command was typed into the input box; consume it.
            self.state.active_input_mut().clear();
            self.state.cursor = 0;
            let cmd = parse_command(&s);
            self.handle_command(cmd);
            self.dirty = true;
            return;
        }

        self.dispatch_check();
    }

    fn dispatch_check(&mut self) {
        let raw = self.state.active_input().to_string();
        self.state.begin_validating();

        let validated = match self.state.tab {
            Tab::Claim => validate_claim(&raw).map(str::to_string),
            Tab::Url => validate_url(&raw).map(str::to_string),
        };
        let payload = match validated {
            Ok(p) => p,
            Err(e) => {
                self.state.fail(e.to_string());
                self.dirty = true;
                return;
            }
        };

        let generation = self.state.begin_loading();
        let tab = self.state.tab;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match tab {
                Tab::Claim => client.check_claim(&payload).await,
                Tab::Url => client.check_url(&payload).await,
            };
            let _ = tx
                .send(UiMsg::CheckDone {
                    generation,
                    outcome,
                })
                .await;
        });
        self.dirty = true;
    }

    fn dispatch_explain(&mut self) {
        if self.state.tab != Tab::Claim {
            self.state.push(Notice::new(
                "Explanations work on claim text — switch to the claim tab first.".to_string(),
                styles::dim(),
            ));
            return;
        }
        let raw = self.state.claim_input.clone();
        self.state.begin_validating();

        let payload = match validate_claim(&raw) {
            Ok(p) => p.to_string(),
            Err(e) => {
                self.state.fail(e.to_string());
                return;
            }
        };

        let generation = self.state.begin_loading();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = client.explain(&payload).await;
            let _ = tx
                .send(UiMsg::ExplainDone {
                    generation,
                    outcome,
                })
                .await;
        });
    }

    fn probe_health(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let healthy = client.health().await;
            let _ = tx.send(UiMsg::HealthDone(healthy)).await;
        });
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Help => {
                self.state
                    .push(Notice::new("Commands:".to_string(), styles::label()));
                for (verb, what) in [
                    ("/copy", "copy the last result as plain text"),
                    ("/explain", "show which words drove the verdict"),
                    ("/clear", "reset both inputs and hide results"),
                    ("/health", "re-check the API"),
                    ("/quit", "exit"),
                ] {
                    self.state.push(Notice::new(
                        format!("  {verb:<10} {what}"),
                        styles::value(),
                    ));
                }
                self.state.push(Notice::new(
                    "Tab switches tabs; Ctrl+Enter checks the active tab.".to_string(),
                    styles::dim(),
                ));
            }
            Command::Copy => self.copy_results(),
            Command::Clear => {
                self.state.clear_form();
                self.state
                    .push(Notice::new("✓ Cleared.".to_string(), styles::system()));
            }
            Command::Explain => self.dispatch_explain(),
            Command::Health => self.probe_health(),
            Command::Quit => {
                let _ = self.tx.try_send(UiMsg::Shutdown);
            }
            Command::Unknown(s) => {
                self.state
                    .push(Notice::new(format!("× Unknown command: {s}"), styles::error()));
                self.state
                    .push(Notice::new("Try `/help`.".to_string(), styles::dim()));
            }
        }
    }

    fn copy_results(&mut self) {
        let Some(panel) = &self.state.results else {
            self.state.push(Notice::new(
                "Nothing to copy yet — run a check first.".to_string(),
                styles::dim(),
            ));
            return;
        };
        let text = crate::render::copy_template(&panel.view);
        match clipboard::copy_to_clipboard(&text) {
            Ok(()) => {
                self.state.push(Notice::new(
                    "Results copied to clipboard!".to_string(),
                    styles::system(),
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.state.push(Notice::new(
                    format!("× Clipboard unavailable ({e}); result follows:"),
                    styles::error(),
                ));
                for line in text.lines() {
                    self.state
                        .push(Notice::new(format!("  {line}"), styles::value()));
                }
            }
        }
    }

    fn render_explain(&mut self, view: ExplainView) {
        for notice in render_explain_lines(&view) {
            self.state.push(notice);
        }
    }

    // ---- spinner & drawing ----

    fn spinner(&self) -> &'static str {
        if self.state.busy() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.state.busy() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = UiSnap {
            tab: self.state.tab,
            input: self.state.active_input().to_string(),
            input_cursor: self.state.cursor,
            busy: self.state.busy(),
            spinner: self.spinner(),
            api_healthy: self.state.api_healthy,
            results: self
                .state
                .results
                .as_ref()
                .map(|p| (p.view.clone(), p.bar_progress)),
            transcript: self.state.transcript.clone(),
            scroll: self.state.scroll,
        };

        view::draw(&mut self.term, &snap)
    }
}
