use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, trace};

use crate::{
    rng,
    symbols::{ReelColumn, Symbol, SymbolCatalog, REEL_COUNT, ROW_COUNT},
};

pub const BONUS_PROBABILITY: f64 = 0.10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("symbol catalog needs at least 3 entries (and at most 255), got {0}")]
    CatalogSize(usize),
    #[error("row classification produced Invalid for reels {0:?}")]
    InvalidClassification([ReelColumn; REEL_COUNT]),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WinType {
    NoWin,
    SmallWin,
    BigWin,
    /// Never a game state: only produced by a classification defect.
    Invalid,
}

impl fmt::Display for WinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WinType::NoWin => "No Win",
            WinType::SmallWin => "Small Win",
            WinType::BigWin => "Big Win",
            WinType::Invalid => "Invalid",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub reels: [ReelColumn; REEL_COUNT],
    pub win_type: WinType,
    pub bonus: bool,
}

impl Outcome {
    /// Builds an outcome whose win type is derived from `reels`.
    pub fn from_reels(reels: [ReelColumn; REEL_COUNT], bonus: bool) -> Self {
        Self {
            reels,
            win_type: evaluate_reels(&reels),
            bonus,
        }
    }

    /// Symbols at `row` across every reel, left to right.
    pub fn row(&self, row: usize) -> [Symbol; REEL_COUNT] {
        std::array::from_fn(|reel| self.reels[reel].get(row))
    }
}

/// Classifies one row by its number of distinct symbols.
pub fn classify_row(row: &[Symbol]) -> WinType {
    let distinct: HashSet<Symbol> = row.iter().copied().collect();
    match distinct.len() {
        1 => WinType::BigWin,
        2 => WinType::SmallWin,
        3 => WinType::NoWin,
        _ => WinType::Invalid,
    }
}

/// Best row wins; an Invalid row poisons the whole spin.
pub fn combine_rows(rows: &[WinType]) -> WinType {
    if rows.contains(&WinType::Invalid) {
        WinType::Invalid
    } else if rows.contains(&WinType::BigWin) {
        WinType::BigWin
    } else if rows.contains(&WinType::SmallWin) {
        WinType::SmallWin
    } else {
        WinType::NoWin
    }
}

pub fn evaluate_reels(reels: &[ReelColumn; REEL_COUNT]) -> WinType {
    let rows: Vec<WinType> = (0..ROW_COUNT)
        .map(|r| {
            let row: [Symbol; REEL_COUNT] = std::array::from_fn(|reel| reels[reel].get(r));
            classify_row(&row)
        })
        .collect();
    combine_rows(&rows)
}

/// Draws 3 distinct symbols: shuffle the whole catalog, keep the head.
pub fn draw_column<R: Rng + ?Sized>(rng: &mut R, catalog_len: usize) -> ReelColumn {
    let mut indices: Vec<usize> = (0..catalog_len).collect();
    rng::fisher_yates(&mut indices, rng);
    ReelColumn(std::array::from_fn(|i| Symbol::from_index(indices[i])))
}

#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    catalog_len: usize,
    bonus_probability: f64,
}

impl OutcomeGenerator {
    pub fn new(catalog: &SymbolCatalog) -> Result<Self, EngineError> {
        Self::with_catalog_len(catalog.len())
    }

    pub fn with_catalog_len(catalog_len: usize) -> Result<Self, EngineError> {
        if !(SymbolCatalog::MIN_SIZE..=u8::MAX as usize).contains(&catalog_len) {
            return Err(EngineError::CatalogSize(catalog_len));
        }
        Ok(Self {
            catalog_len,
            bonus_probability: BONUS_PROBABILITY,
        })
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog_len
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Outcome, EngineError> {
        let reels: [ReelColumn; REEL_COUNT] =
            std::array::from_fn(|_| draw_column(&mut *rng, self.catalog_len));
        let win_type = evaluate_reels(&reels);
        debug_assert_ne!(win_type, WinType::Invalid, "reels {reels:?}");
        if win_type == WinType::Invalid {
            error!(?reels, "outcome generation produced an Invalid classification");
            return Err(EngineError::InvalidClassification(reels));
        }
        // drawn after the reels and independent of them
        let bonus = rng::chance(rng, self.bonus_probability);
        trace!(?reels, ?win_type, bonus, "generated outcome");
        Ok(Outcome {
            reels,
            win_type,
            bonus,
        })
    }
}
