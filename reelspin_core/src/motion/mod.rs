//! Frame-driven reel animation
//!
//! Each reel owns a [`ReelMotionController`] that is advanced with absolute
//! timestamps (milliseconds on any monotonic clock). The
//! [`SpinOrchestrator`] starts the reels against one shared origin and
//! signals completion once all of them have settled.

pub mod config;
pub mod orchestrator;
pub mod reel;
pub mod render;
pub mod sprite;

use thiserror::Error;

pub use config::MotionConfig;
pub use orchestrator::{CompletionCallback, SpinOrchestrator, TickReport};
pub use reel::{AnimationPhase, ReelMotionController, StateDelta};
pub use render::{render_reels, PresentationSurface, SpritePlacement};
pub use sprite::SymbolSprite;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("invalid motion config: {0}")]
    InvalidConfig(String),
    #[error("a spin is already in flight")]
    SpinInFlight,
    #[error("reel {reel} is busy ({phase:?})")]
    ReelBusy { reel: usize, phase: AnimationPhase },
    #[error("refusing to animate an Invalid outcome")]
    InvalidOutcome,
    #[error("outcome references symbol {0} outside the catalog")]
    UnknownSymbol(usize),
    #[error("spin still has {pending} reel(s) moving after {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: f64, pending: usize },
}
