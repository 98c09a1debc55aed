//! The single UI state record and its transitions.
//!
//! Handlers only ever mutate this struct; the draw code takes a snapshot of
//! it and produces visual effects. That split keeps everything here testable
//! without a terminal.

use ratatui::style::Style;

use crate::render::ResultView;
use crate::styles;

/// Which input tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Claim,
    Url,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Claim => "Check Claim",
            Tab::Url => "Check URL",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Tab::Claim => Tab::Url,
            Tab::Url => Tab::Claim,
        }
    }
}

/// Lifecycle of one check operation. `Failed` is an edge, not a resting
/// state: surfacing the error drops straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Loading,
    Rendered,
}

/// Per-tick growth of the confidence bars. Bars start collapsed when a
/// result lands and grow to their target width over a few ticks (the second
/// phase of the two-phase render).
const BAR_ANIMATION_STEP: f64 = 0.2;

/// One styled transcript line (notices, errors, explanation output).
#[derive(Clone)]
pub struct Notice {
    pub text: String,
    pub style: Style,
}

impl Notice {
    pub fn new(text: String, style: Style) -> Self {
        Self { text, style }
    }
}

/// A rendered result plus its bar animation progress.
pub struct ResultPanel {
    pub view: ResultView,
    pub bar_progress: f64,
}

pub struct UiState {
    pub tab: Tab,
    pub claim_input: String,
    pub url_input: String,
    /// Byte offset of the caret within the active input.
    pub cursor: usize,
    pub phase: Phase,
    /// Token of the most recently dispatched request. A completion only
    /// applies when it carries the current value; bumping it invalidates
    /// everything in flight.
    generation: u64,
    pub results: Option<ResultPanel>,
    pub transcript: Vec<Notice>,
    /// Transcript scroll offset, counted from the bottom.
    pub scroll: usize,
    /// Result of the startup health probe, once it lands.
    pub api_healthy: Option<bool>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: Tab::Claim,
            claim_input: String::new(),
            url_input: String::new(),
            cursor: 0,
            phase: Phase::Idle,
            generation: 0,
            results: None,
            transcript: vec![Notice::new(
                "Enter a claim (or a URL on the URL tab), then press Ctrl+Enter. `/help` lists commands.".to_string(),
                styles::system(),
            )],
            scroll: 0,
            api_healthy: None,
        }
    }
}

impl UiState {
    pub fn active_input(&self) -> &str {
        match self.tab {
            Tab::Claim => &self.claim_input,
            Tab::Url => &self.url_input,
        }
    }

    pub fn active_input_mut(&mut self) -> &mut String {
        match self.tab {
            Tab::Claim => &mut self.claim_input,
            Tab::Url => &mut self.url_input,
        }
    }

    pub fn busy(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Enter the synchronous validation step of a check.
    pub fn begin_validating(&mut self) {
        self.phase = Phase::Validating;
    }

    /// Commit to a dispatch: bump the generation (invalidating any in-flight
    /// request) and enter `Loading`. Returns the new token.
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Failed edge: surface the message, clear loading, return to `Idle`.
    /// No results are shown.
    pub fn fail(&mut self, message: String) {
        self.push(Notice::new(format!("× {message}"), styles::error()));
        self.phase = Phase::Idle;
    }

    /// A result landed: show the panel with bars collapsed (animation phase
    /// one) and snap the transcript to the bottom so the panel is in view.
    pub fn render_result(&mut self, view: ResultView) {
        self.results = Some(ResultPanel {
            view,
            bar_progress: 0.0,
        });
        self.phase = Phase::Rendered;
        self.scroll = 0;
    }

    /// Advance the bar animation one tick. Returns true while still moving.
    pub fn step_bars(&mut self) -> bool {
        match self.results.as_mut() {
            Some(panel) if panel.bar_progress < 1.0 => {
                panel.bar_progress = (panel.bar_progress + BAR_ANIMATION_STEP).min(1.0);
                true
            }
            _ => false,
        }
    }

    /// Switch tabs: hide results and force `Idle`, invalidating anything in
    /// flight.
    pub fn switch_tab(&mut self) {
        self.tab = self.tab.other();
        self.cursor = self.active_input().len();
        self.results = None;
        self.phase = Phase::Idle;
        self.generation += 1;
    }

    /// Reset both inputs and hide results.
    pub fn clear_form(&mut self) {
        self.claim_input.clear();
        self.url_input.clear();
        self.cursor = 0;
        self.results = None;
        self.phase = Phase::Idle;
        self.generation += 1;
        self.scroll = 0;
    }

    pub fn push(&mut self, notice: Notice) {
        self.transcript.push(notice);
        self.scroll = 0;
    }
}
