pub mod engine;
pub mod motion;
pub mod paytable;
pub mod rng;
pub mod session;
pub mod symbols;

pub use crate::engine::{
    classify_row, combine_rows, draw_column, evaluate_reels, EngineError, Outcome,
    OutcomeGenerator, WinType, BONUS_PROBABILITY,
};
pub use crate::motion::{
    AnimationPhase, MotionConfig, MotionError, PresentationSurface, ReelMotionController,
    SpinOrchestrator, SpritePlacement, StateDelta, SymbolSprite, TickReport,
};
pub use crate::paytable::Paytable;
pub use crate::rng::{fisher_yates, SpinRng};
pub use crate::session::{Session, SessionError, SpinKind};
pub use crate::symbols::{
    reference_audio_tracks, AudioTrack, ReelColumn, Symbol, SymbolCatalog, REEL_COUNT, ROW_COUNT,
};
