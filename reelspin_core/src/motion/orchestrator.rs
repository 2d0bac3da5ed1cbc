use rand::Rng;
use tracing::{debug, info, warn};

use super::{
    config::MotionConfig,
    reel::{ReelMotionController, StateDelta},
    render::{self, PresentationSurface},
    MotionError,
};
use crate::{
    engine::{Outcome, WinType},
    rng,
    symbols::REEL_COUNT,
};

pub type CompletionCallback = Box<dyn FnOnce() + Send>;

struct ActiveSpin {
    outcome: Outcome,
    started_at: f64,
    remaining: usize,
    on_complete: Option<CompletionCallback>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub deltas: Vec<StateDelta>,
    /// Set on the tick where the last reel reported done
    pub completed: bool,
}

/// Runs one spin at a time across all reels and reports completion once
/// every reel has settled.
pub struct SpinOrchestrator {
    config: MotionConfig,
    reels: Vec<ReelMotionController>,
    active: Option<ActiveSpin>,
}

impl SpinOrchestrator {
    pub fn new<R: Rng + ?Sized>(
        config: MotionConfig,
        catalog_len: usize,
        rng: &mut R,
    ) -> Result<Self, MotionError> {
        config.validate()?;
        if catalog_len == 0 {
            return Err(MotionError::InvalidConfig("symbol catalog is empty".into()));
        }
        let reels = (0..REEL_COUNT)
            .map(|i| {
                let seed = rng.random::<u64>();
                ReelMotionController::new(i, config.clone(), catalog_len, rng::seeded(seed))
            })
            .collect();
        Ok(Self {
            config,
            reels,
            active: None,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn reels(&self) -> &[ReelMotionController] {
        &self.reels
    }

    pub fn is_spinning(&self) -> bool {
        self.active.is_some()
    }

    /// Outcome of the spin in flight.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.active.as_ref().map(|a| &a.outcome)
    }

    /// Starts every reel against the shared origin `now_ms`. `on_complete`
    /// runs exactly once, on the tick where the last reel finishes.
    pub fn start_spin<F>(
        &mut self,
        outcome: Outcome,
        now_ms: f64,
        on_complete: F,
    ) -> Result<(), MotionError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.active.is_some() {
            return Err(MotionError::SpinInFlight);
        }
        if outcome.win_type == WinType::Invalid {
            return Err(MotionError::InvalidOutcome);
        }
        let catalog_len = self.catalog_len();
        if let Some(symbol) = outcome
            .reels
            .iter()
            .flat_map(|c| c.symbols().iter())
            .find(|s| s.index() >= catalog_len)
        {
            return Err(MotionError::UnknownSymbol(symbol.index()));
        }

        for (reel, column) in self.reels.iter_mut().zip(outcome.reels) {
            reel.start(now_ms, column)?;
        }
        self.active = Some(ActiveSpin {
            outcome,
            started_at: now_ms,
            remaining: self.reels.len(),
            on_complete: Some(Box::new(on_complete)),
        });
        info!(win_type = ?outcome.win_type, bonus = outcome.bonus, "spin started");
        Ok(())
    }

    pub fn tick(&mut self, now_ms: f64) -> Result<TickReport, MotionError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(TickReport::default());
        };

        let mut report = TickReport::default();
        for reel in &mut self.reels {
            let delta = reel.advance(now_ms);
            if delta.finished() {
                active.remaining = active.remaining.saturating_sub(1);
                debug!(reel = delta.reel, remaining = active.remaining, "reel settled");
            }
            report.deltas.push(delta);
        }

        if active.remaining == 0 {
            if let Some(spin) = self.active.take() {
                if let Some(on_complete) = spin.on_complete {
                    on_complete();
                }
                info!(elapsed_ms = now_ms - spin.started_at, "spin complete");
            }
            report.completed = true;
            return Ok(report);
        }

        let elapsed_ms = now_ms - active.started_at;
        if elapsed_ms >= self.config.completion_deadline_ms() {
            warn!(elapsed_ms, pending = active.remaining, "spin exceeded completion deadline");
            return Err(MotionError::DeadlineExceeded {
                elapsed_ms,
                pending: active.remaining,
            });
        }
        Ok(report)
    }

    /// Abandons the spin in flight without firing its completion.
    pub fn cancel(&mut self) -> Option<Outcome> {
        for reel in &mut self.reels {
            reel.stop();
        }
        let spin = self.active.take()?;
        info!("spin cancelled");
        Some(spin.outcome)
    }

    pub fn render<S: PresentationSurface + ?Sized>(&self, surface: &mut S) {
        render::render_reels(&self.config, &self.reels, surface);
    }

    fn catalog_len(&self) -> usize {
        self.reels.first().map_or(0, |r| r.catalog_len())
    }
}
