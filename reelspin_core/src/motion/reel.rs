//! Per-reel motion state machine
//!
//! A reel is driven purely by the timestamps handed to [`ReelMotionController::advance`].
//! It spins with an eased, wrapping scroll, fades its filler strip out, swaps in
//! its result column and bounces each result symbol onto its slot.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{config::MotionConfig, sprite::SymbolSprite, MotionError};
use crate::{
    rng::{self, SpinRng},
    symbols::{ReelColumn, ROW_COUNT},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationPhase {
    Idle,
    Spinning,
    FadingOut,
    Settling,
    Done,
}

impl AnimationPhase {
    pub fn is_moving(self) -> bool {
        matches!(
            self,
            AnimationPhase::Spinning | AnimationPhase::FadingOut | AnimationPhase::Settling
        )
    }
}

/// What one call to `advance` changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDelta {
    pub reel: usize,
    pub from: AnimationPhase,
    pub to: AnimationPhase,
    /// Scroll applied to every strip symbol this frame (0 outside spinning)
    pub displacement: f64,
}

impl StateDelta {
    pub fn transitioned(&self) -> bool {
        self.from != self.to
    }

    /// True exactly once per spin, on the tick that reaches `Done`.
    pub fn finished(&self) -> bool {
        self.from != AnimationPhase::Done && self.to == AnimationPhase::Done
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    started_at: f64,
    column: ReelColumn,
}

#[derive(Debug, Clone, Copy)]
struct SettleTrack {
    slot: usize,
    target: f64,
    started_at: f64,
    done: bool,
}

#[derive(Debug, Clone)]
pub struct ReelMotionController {
    index: usize,
    config: MotionConfig,
    catalog_len: usize,
    rng: SpinRng,
    strip: Vec<SymbolSprite>,
    phase: AnimationPhase,
    armed: Option<Armed>,
    settle: Vec<SettleTrack>,
}

impl ReelMotionController {
    /// A resting reel showing random filler. `catalog_len` must be non-zero.
    pub fn new(index: usize, config: MotionConfig, catalog_len: usize, rng: SpinRng) -> Self {
        let mut reel = Self {
            index,
            config,
            catalog_len,
            rng,
            strip: Vec::new(),
            phase: AnimationPhase::Idle,
            armed: None,
            settle: Vec::with_capacity(ROW_COUNT),
        };
        reel.strip = (0..reel.config.symbols_per_reel)
            .map(|slot| reel.filler(slot))
            .collect();
        reel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog_len
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn strip(&self) -> &[SymbolSprite] {
        &self.strip
    }

    pub fn is_done(&self) -> bool {
        self.phase == AnimationPhase::Done
    }

    /// Spin origin this reel measures against, if armed.
    pub fn started_at(&self) -> Option<f64> {
        self.armed.map(|a| a.started_at)
    }

    /// Texture indices of the three result slots once the reel is done.
    pub fn settled_textures(&self) -> Option<[usize; ROW_COUNT]> {
        self.is_done()
            .then(|| std::array::from_fn(|slot| self.strip[slot].texture_index))
    }

    /// Time spent past this reel's own start, or `None` when not armed.
    /// Negative while the start delay is still running.
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        self.armed
            .map(|a| now_ms - a.started_at - self.config.start_delay_ms(self.index))
    }

    /// Arms the reel for a spin beginning at `started_at`.
    pub fn start(&mut self, started_at: f64, column: ReelColumn) -> Result<(), MotionError> {
        let busy = self.phase.is_moving()
            || (self.phase == AnimationPhase::Idle && self.armed.is_some());
        if busy {
            return Err(MotionError::ReelBusy {
                reel: self.index,
                phase: self.phase,
            });
        }
        self.armed = Some(Armed { started_at, column });
        self.phase = AnimationPhase::Idle;
        self.settle.clear();
        for sprite in &mut self.strip {
            sprite.opacity = 1.0;
        }
        Ok(())
    }

    /// Disarms the reel where it stands. Later ticks mutate nothing.
    pub fn stop(&mut self) {
        if self.phase.is_moving() {
            debug!(reel = self.index, phase = ?self.phase, "reel stopped");
        }
        self.armed = None;
        self.settle.clear();
        self.phase = AnimationPhase::Idle;
    }

    pub fn advance(&mut self, now_ms: f64) -> StateDelta {
        let from = self.phase;
        let mut delta = StateDelta {
            reel: self.index,
            from,
            to: from,
            displacement: 0.0,
        };
        let (Some(armed), Some(elapsed)) = (self.armed, self.elapsed_ms(now_ms)) else {
            return delta;
        };

        if self.phase == AnimationPhase::Idle {
            if elapsed <= 0.0 {
                return delta;
            }
            self.phase = AnimationPhase::Spinning;
        }

        if matches!(self.phase, AnimationPhase::Spinning | AnimationPhase::FadingOut) {
            if elapsed >= self.config.spin_duration_ms {
                self.begin_settle(armed);
            } else {
                delta.displacement = self.scroll(elapsed);
            }
        }

        if self.phase == AnimationPhase::Settling {
            self.step_settle(now_ms);
        }

        delta.to = self.phase;
        if delta.transitioned() {
            debug!(reel = self.index, ?from, to = ?self.phase, elapsed, "phase transition");
        }
        delta
    }

    fn scroll(&mut self, elapsed: f64) -> f64 {
        let cfg = &self.config;
        let progress = (elapsed / cfg.spin_duration_ms).clamp(0.0, 1.0);
        let displacement = cfg.ease(progress) * cfg.speed_scale;
        let strip_height = cfg.strip_height();
        for sprite in &mut self.strip {
            sprite.scroll(displacement, strip_height);
        }

        let fade_start = cfg.fade_start_ms();
        if elapsed >= fade_start {
            let fade = ((elapsed - fade_start) / cfg.fade_duration_ms).min(1.0);
            let opacity = (1.0 - fade).max(0.0);
            for sprite in &mut self.strip {
                sprite.opacity = opacity;
            }
            self.phase = AnimationPhase::FadingOut;
        }
        displacement
    }

    fn begin_settle(&mut self, armed: Armed) {
        // anchored to the phase boundary, not to the tick that noticed it
        let settle_start = armed.started_at
            + self.config.start_delay_ms(self.index)
            + self.config.spin_duration_ms;
        let height = self.config.symbol_height;

        let mut strip = Vec::with_capacity(self.config.symbols_per_reel);
        for (slot, symbol) in armed.column.symbols().iter().enumerate() {
            strip.push(SymbolSprite::new(symbol.index(), slot as f64 * height));
        }
        for slot in ROW_COUNT..self.config.symbols_per_reel {
            strip.push(self.filler(slot));
        }
        self.strip = strip;

        self.settle = (0..ROW_COUNT)
            .map(|slot| SettleTrack {
                slot,
                target: slot as f64 * height,
                started_at: settle_start,
                done: false,
            })
            .collect();
        self.phase = AnimationPhase::Settling;
    }

    fn step_settle(&mut self, now_ms: f64) {
        let duration = self.config.settle_duration_ms;
        let overshoot = self.config.settle_overshoot;
        for track in self.settle.iter_mut().filter(|t| !t.done) {
            let progress = ((now_ms - track.started_at) / duration).clamp(0.0, 1.0);
            let sprite = &mut self.strip[track.slot];
            if progress >= 1.0 {
                // pinned; sin(PI) is not exactly zero in floating point
                sprite.position = track.target;
                track.done = true;
            } else {
                sprite.position = track.target + overshoot * (progress * PI).sin();
            }
        }
        if self.settle.iter().all(|t| t.done) {
            self.phase = AnimationPhase::Done;
        }
    }

    fn filler(&mut self, slot: usize) -> SymbolSprite {
        let texture = rng::filler_index(&mut self.rng, self.catalog_len);
        SymbolSprite::new(texture, slot as f64 * self.config.symbol_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    fn column() -> ReelColumn {
        ReelColumn([Symbol(4), Symbol(0), Symbol(7)])
    }

    fn reel(index: usize) -> ReelMotionController {
        ReelMotionController::new(index, MotionConfig::default(), 9, rng::seeded(3))
    }

    #[test]
    fn unarmed_reel_ignores_ticks() {
        let mut r = reel(0);
        let before = r.strip().to_vec();
        let d = r.advance(1_000.0);
        assert!(!d.transitioned());
        assert_eq!(r.strip(), &before[..]);
    }

    #[test]
    fn stagger_holds_reel_static() {
        let mut r = reel(1);
        r.start(0.0, column()).unwrap();
        let before = r.strip().to_vec();
        assert_eq!(r.advance(199.0).to, AnimationPhase::Idle);
        assert_eq!(r.advance(200.0).to, AnimationPhase::Idle);
        assert_eq!(r.strip(), &before[..]);
        assert_eq!(r.advance(201.0).to, AnimationPhase::Spinning);
    }

    #[test]
    fn anticipation_moves_up_then_accelerates_down() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        let early = r.advance(16.0);
        assert!(early.displacement < 0.0);
        let late = r.advance(3_000.0);
        assert!(late.displacement > 0.0);
        let later = r.advance(3_500.0);
        assert!(later.displacement > late.displacement);
    }

    #[test]
    fn fades_out_before_settling() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        r.advance(3_000.0);
        assert!(r.strip().iter().all(|s| s.opacity == 1.0));
        assert_eq!(r.advance(3_930.0).to, AnimationPhase::FadingOut);
        assert!(r.strip().iter().all(|s| (s.opacity - 0.5).abs() < 1e-9));
        r.advance(3_990.0);
        assert!(r.strip().iter().all(|s| s.opacity == 0.0));
    }

    #[test]
    fn settle_swaps_in_result_and_bounces() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        r.advance(3_990.0);
        let d = r.advance(4_000.0);
        assert_eq!(d.to, AnimationPhase::Settling);
        assert_eq!(r.strip().len(), 9);
        let textures: Vec<usize> = r.strip()[..3].iter().map(|s| s.texture_index).collect();
        assert_eq!(textures, vec![4, 0, 7]);
        assert!(r.strip().iter().all(|s| s.opacity == 1.0));

        // halfway through the bounce: full overshoot
        r.advance(4_250.0);
        for (slot, sprite) in r.strip()[..3].iter().enumerate() {
            assert!((sprite.position - (slot as f64 * 150.0 + 50.0)).abs() < 1e-9);
        }

        let d = r.advance(4_500.0);
        assert!(d.finished());
        assert_eq!(r.settled_textures(), Some([4, 0, 7]));
        for (slot, sprite) in r.strip()[..3].iter().enumerate() {
            assert_eq!(sprite.position, slot as f64 * 150.0);
        }
    }

    #[test]
    fn late_tick_jumps_straight_to_done() {
        let mut r = reel(2);
        r.start(0.0, column()).unwrap();
        let d = r.advance(60_000.0);
        assert_eq!(d.from, AnimationPhase::Idle);
        assert_eq!(d.to, AnimationPhase::Done);
        assert_eq!(r.strip()[2].position, 300.0);
    }

    #[test]
    fn done_reel_ignores_ticks() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        r.advance(5_000.0);
        assert!(r.is_done());
        let before = r.strip().to_vec();
        for t in [5_016.0, 6_000.0, 100_000.0] {
            let d = r.advance(t);
            assert!(!d.transitioned());
            assert!(!d.finished());
        }
        assert_eq!(r.strip(), &before[..]);
    }

    #[test]
    fn cannot_restart_while_moving() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        assert!(r.start(10.0, column()).is_err());
        r.advance(100.0);
        assert!(matches!(
            r.start(100.0, column()),
            Err(MotionError::ReelBusy { reel: 0, phase: AnimationPhase::Spinning })
        ));
        r.advance(5_000.0);
        r.start(6_000.0, column()).unwrap();
        assert_eq!(r.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn stopped_reel_is_inert() {
        let mut r = reel(0);
        r.start(0.0, column()).unwrap();
        r.advance(1_000.0);
        r.stop();
        let before = r.strip().to_vec();
        r.advance(2_000.0);
        r.advance(9_000.0);
        assert_eq!(r.strip(), &before[..]);
        assert_eq!(r.phase(), AnimationPhase::Idle);
    }
}
