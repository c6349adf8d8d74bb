//! Everything the scenes share, passed to every scene hook
//!
//! Scenes own no game data of their own beyond timers; the session, the
//! score store and the overlay shown on top of the corridor all live here.

use std::collections::HashMap;

use glam::Vec2;

use crate::highscores::{HighScoreEntry, MAX_HIGH_SCORES, ScoreStore};
use crate::settings::GameConfig;
use crate::sim::{Session, SessionSummary, SimEvent, TickInput, tick};

/// Seconds for a full fade in or out
pub const FADE_DURATION: f32 = 0.5;

/// A menu/UI button the platform reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Play,
    Tutorial,
    Pause,
    Resume,
    Restart,
    Quit,
    /// Open the statistics screen
    Stats,
    ShowLastGame,
    ShowBestGame,
    Back,
}

/// Which session the statistics screen charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsBoard {
    LastGame,
    BestGame,
}

/// Input as seen by one simulation tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub pressed: bool,
    pub was_pressed: bool,
    pub command: Option<UiCommand>,
}

impl InputSnapshot {
    /// Press started this tick
    pub fn clicked(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput::new(self.pressed, self.was_pressed)
    }
}

/// Turns text ids into display strings
pub trait Localizer {
    fn text(&self, key: &str) -> String;
}

/// English strings, with unknown ids shown as-is
#[derive(Debug, Clone)]
pub struct EnglishLocalizer {
    table: HashMap<&'static str, &'static str>,
}

impl Default for EnglishLocalizer {
    fn default() -> Self {
        let table = HashMap::from([
            ("tutorial.title", "How to play? (tap to continue)"),
            ("tutorial.hero", "This is you"),
            ("tutorial.small_jump", "Tap the screen to jump"),
            ("tutorial.score", "Turn on lights to score points"),
            ("tutorial.big_jump", "Do longer press to make higher jumps"),
            ("tutorial.edge", "Running ends where the screen does"),
            ("tutorial.new_hero", "Respawned again, are you"),
            ("tutorial.meet", "Your previous self is repeating its fate"),
            ("tutorial.avoid", "Avoid yourself, who will continue scoring points!"),
            (
                "tutorial.best_score",
                "Try for the best score with and against 10 instances of yourself!",
            ),
            ("tutorial.end", "Good luck!"),
        ]);
        Self { table }
    }
}

impl Localizer for EnglishLocalizer {
    fn text(&self, key: &str) -> String {
        self.table.get(key).copied().unwrap_or(key).to_string()
    }
}

/// Points at a run on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub run: usize,
    /// From the run's position, in world units
    pub offset: Vec2,
}

/// Text and pointer drawn over the corridor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub text: String,
    pub arrow: Option<Arrow>,
}

impl Overlay {
    pub fn clear(&mut self) {
        self.text.clear();
        self.arrow = None;
    }
}

pub struct GameContext {
    pub config: GameConfig,
    pub input: InputSnapshot,
    pub session: Option<Session>,
    pub scores: Box<dyn ScoreStore>,
    pub localizer: Box<dyn Localizer>,
    /// Scene opacity, 0 hidden to 1 fully shown
    pub fade: f32,
    pub overlay: Overlay,
    /// Totals of the last session, waiting for the menu to submit them
    pub pending_summary: Option<SessionSummary>,
    pub top_scores: Vec<HighScoreEntry>,
    /// Rank of the last submitted session, if it made the board
    pub last_rank: Option<usize>,
    /// Last recorded session and the best one since launch
    pub last_game: Option<SessionSummary>,
    pub best_game: Option<SessionSummary>,
    /// Set while the statistics screen is up
    pub stats_board: Option<StatsBoard>,
    events: Vec<SimEvent>,
    next_seed: u64,
}

impl GameContext {
    pub fn new(
        config: GameConfig,
        scores: Box<dyn ScoreStore>,
        localizer: Box<dyn Localizer>,
        seed: u64,
    ) -> Self {
        let top_scores = scores.top_scores(MAX_HIGH_SCORES);
        Self {
            config,
            input: InputSnapshot::default(),
            session: None,
            scores,
            localizer,
            fade: 0.0,
            overlay: Overlay::default(),
            pending_summary: None,
            top_scores,
            last_rank: None,
            last_game: None,
            best_game: None,
            stats_board: None,
            events: Vec::new(),
            next_seed: seed,
        }
    }

    /// Start a session from the config unless one is already running
    pub fn ensure_session(&mut self) -> &mut Session {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let seed = self.next_seed;
                self.next_seed = self.next_seed.wrapping_add(1);
                Session::start(&self.config, seed)
            }
        };
        self.session.insert(session)
    }

    /// Replace any session with a fresh one built from `config`
    pub fn start_session_with(&mut self, config: &GameConfig, seed: u64) -> &mut Session {
        self.discard_session();
        self.session.insert(Session::start(config, seed))
    }

    /// Run one simulation tick with the current input
    pub fn step_session(&mut self, dt: f32) {
        let input = self.input.tick_input();
        if let Some(session) = self.session.as_mut() {
            tick(session, &input, dt);
            self.events.extend(session.drain_events());
        }
    }

    pub fn session_complete(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_complete)
    }

    /// End the session and keep its totals for the score board
    pub fn end_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.end();
            self.events.extend(session.drain_events());
            self.pending_summary = Some(session.summary());
        }
    }

    /// End the session without recording anything
    pub fn discard_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.end();
            log::info!("Session discarded");
        }
    }

    /// Hand the pending summary to the score store and reload the board
    pub fn submit_pending(&mut self) {
        if let Some(summary) = self.pending_summary.take() {
            let name = self.config.player_name.clone();
            match self.scores.submit_score(summary.score, summary.currency, &name) {
                Ok(rank) => {
                    self.last_rank = rank;
                    self.record_game(summary);
                }
                Err(e) => {
                    log::warn!("Score not recorded: {e}");
                    self.last_rank = None;
                }
            }
        }
        self.top_scores = self.scores.top_scores(MAX_HIGH_SCORES);
    }

    fn record_game(&mut self, summary: SessionSummary) {
        if self
            .best_game
            .as_ref()
            .is_none_or(|best| summary.score > best.score)
        {
            self.best_game = Some(summary.clone());
        }
        self.last_game = Some(summary);
    }

    pub fn has_stats(&self) -> bool {
        self.last_game.is_some() || self.best_game.is_some()
    }

    /// Session the statistics screen is charting
    pub fn shown_stats(&self) -> Option<&SessionSummary> {
        match self.stats_board? {
            StatsBoard::LastGame => self.last_game.as_ref(),
            StatsBoard::BestGame => self.best_game.as_ref(),
        }
    }

    /// Move `fade` toward `target`; true once it got there
    pub fn fade_towards(&mut self, target: f32, dt: f32) -> bool {
        let step = dt / FADE_DURATION;
        if self.fade < target {
            self.fade = (self.fade + step).min(target);
        } else {
            self.fade = (self.fade - step).max(target);
        }
        self.fade == target
    }

    /// Simulation events since the last drain (render/audio sink)
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
impl GameContext {
    /// Default config, in-memory scores
    pub(crate) fn for_tests() -> Self {
        Self::new(
            GameConfig::default(),
            Box::new(crate::highscores::HighScores::new()),
            Box::new(EnglishLocalizer::default()),
            1,
        )
    }
}
