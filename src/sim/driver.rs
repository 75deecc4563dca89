//! Game loop driver
//!
//! Owns one game's simulation state and walks it through
//! `Idle -> Playing -> Dead`. The host calls `frame` once per animation frame
//! and uses the outcome to decide whether to render and reschedule.

use super::input::{Intent, TickInput};
use super::{CoinSink, GamePhase, RunStats, TickOutcome};

/// A per-frame simulation the driver can run
pub trait Game {
    /// Human-readable name for logs
    fn name(&self) -> &'static str;

    /// Throw away the current run and build a fresh one (player, entities, stats)
    fn reset(&mut self);

    /// Advance one tick. Must not be called again after it returns `Died`.
    fn tick(&mut self, input: &TickInput, sink: &mut dyn CoinSink) -> TickOutcome;

    fn stats(&self) -> &RunStats;

    fn is_alive(&self) -> bool;

    /// Number of live obstacles/platforms/enemies
    fn entity_count(&self) -> usize;
}

/// End-of-run snapshot shown on the death screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub distance: u64,
    pub coins: u32,
}

impl From<&RunStats> for RunSummary {
    fn from(stats: &RunStats) -> Self {
        Self {
            distance: stats.distance(),
            coins: stats.coins,
        }
    }
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// State advanced: render it and request the next frame
    Continue,
    /// The run ended this frame: skip rendering, show the summary, stop
    Died(RunSummary),
    /// Nothing ran (not playing); do not reschedule
    Halted,
}

/// One game instance plus its lifecycle
#[derive(Debug)]
pub struct Session<G> {
    game: G,
    phase: GamePhase,
    input: TickInput,
    summary: Option<RunSummary>,
}

impl<G: Game> Session<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            phase: GamePhase::Idle,
            input: TickInput::default(),
            summary: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Terminal summary of the last finished run
    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Begin a run from `Idle` or `Dead`. Returns false while already playing.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.restart();
        true
    }

    /// Reset everything and play, whatever the current phase
    pub fn restart(&mut self) {
        self.game.reset();
        self.input = TickInput::default();
        self.summary = None;
        self.phase = GamePhase::Playing;
        log::info!(
            "{} started ({} entities)",
            self.game.name(),
            self.game.entity_count()
        );
    }

    /// Latch a control intent for the next tick; ignored unless playing
    pub fn press(&mut self, intent: Intent) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.input.press(intent);
        true
    }

    /// Run one tick if playing
    pub fn frame(&mut self, sink: &mut dyn CoinSink) -> FrameOutcome {
        if self.phase != GamePhase::Playing || !self.game.is_alive() {
            return FrameOutcome::Halted;
        }

        let input = self.input.take();
        match self.game.tick(&input, sink) {
            TickOutcome::Advanced => FrameOutcome::Continue,
            TickOutcome::Died => {
                let summary = RunSummary::from(self.game.stats());
                self.summary = Some(summary);
                self.phase = GamePhase::Dead;
                log::info!(
                    "{} over: {} m, {} coins",
                    self.game.name(),
                    summary.distance,
                    summary.coins
                );
                FrameOutcome::Died(summary)
            }
        }
    }

    /// Leaving the view: drop pending input and go back to idle
    pub fn teardown(&mut self) {
        if self.phase == GamePhase::Playing {
            log::info!("{} torn down mid-run", self.game.name());
        }
        self.phase = GamePhase::Idle;
        self.input = TickInput::default();
    }
}
