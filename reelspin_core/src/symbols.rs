use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// Number of reels on the machine.
pub const REEL_COUNT: usize = 3;
/// Visible symbols per reel column (and rows evaluated for wins).
pub const ROW_COUNT: usize = 3;

/// Index into the symbol catalog (0-based).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Symbol(pub u8);

impl Symbol {
    pub fn from_index(i: usize) -> Self {
        Symbol(i as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Wire encoding is 1-based. Catalogs hold at most 255 symbols, so only a
    /// hand-built `Symbol(255)` saturates.
    pub fn to_wire(self) -> u8 {
        self.0.saturating_add(1)
    }

    pub fn from_wire(v: u8) -> Option<Self> {
        v.checked_sub(1).map(Symbol)
    }
}

/// The 3 symbols one reel lands on, top to bottom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReelColumn(pub [Symbol; ROW_COUNT]);

impl ReelColumn {
    pub fn symbols(&self) -> &[Symbol; ROW_COUNT] {
        &self.0
    }

    pub fn get(&self, row: usize) -> Symbol {
        self.0[row]
    }
}

/// Ordered image references, one per symbol index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolCatalog {
    images: Vec<String>,
}

impl SymbolCatalog {
    pub const MIN_SIZE: usize = 3;
    pub const REFERENCE_SIZE: usize = 9;

    pub fn new(images: Vec<String>) -> Result<Self, EngineError> {
        if images.len() < Self::MIN_SIZE || images.len() > u8::MAX as usize {
            return Err(EngineError::CatalogSize(images.len()));
        }
        Ok(Self { images })
    }

    /// `sym1.png` .. `sym9.png` under `base_url`.
    pub fn reference(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let images = (1..=Self::REFERENCE_SIZE)
            .map(|n| format!("{base}/images/sym{n}.png"))
            .collect();
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image(&self, symbol: Symbol) -> Option<&str> {
        self.images.get(symbol.index()).map(String::as_str)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol.index() < self.images.len()
    }
}

/// A named audio clip and the volume it plays at by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioTrack {
    pub key: String,
    pub url: String,
    pub volume: f32,
}

pub fn reference_audio_tracks(base_url: &str) -> Vec<AudioTrack> {
    let base = base_url.trim_end_matches('/');
    [
        ("bgMusic", "bgmusic.mp3", 0.2),
        ("spin", "spin.wav", 0.3),
        ("spinning", "spinning.wav", 0.5),
        ("bigWin", "big_win.wav", 0.7),
        ("smallWin", "small_win.wav", 0.5),
        ("noWin", "no_win.wav", 0.5),
        ("bonus", "bonus.wav", 0.5),
    ]
    .into_iter()
    .map(|(key, file, volume)| AudioTrack {
        key: key.to_string(),
        url: format!("{base}/audio/{file}"),
        volume,
    })
    .collect()
}
