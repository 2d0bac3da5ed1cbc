use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reelspin_core::{
    evaluate_reels, AudioTrack, Outcome, ReelColumn, Symbol, SymbolCatalog, WinType, REEL_COUNT,
    ROW_COUNT,
};

/// Body of `POST /spin`. Symbols are 1-based on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinResponse {
    pub reels: Vec<Vec<u8>>,
    pub win_type: WinType,
    pub bonus: bool,
}

impl From<&Outcome> for SpinResponse {
    fn from(outcome: &Outcome) -> Self {
        Self {
            reels: outcome
                .reels
                .iter()
                .map(|column| column.symbols().iter().map(|s| s.to_wire()).collect())
                .collect(),
            win_type: outcome.win_type,
            bonus: outcome.bonus,
        }
    }
}

impl SpinResponse {
    /// Maps the wire body back to 0-based symbols, checking its shape and
    /// that every symbol exists in a catalog of `catalog_len` entries.
    pub fn into_outcome(self, catalog_len: usize) -> ApiResult<Outcome> {
        if self.win_type == WinType::Invalid {
            return Err(ApiError::Invalid("server reported an Invalid win type".into()));
        }
        if self.reels.len() != REEL_COUNT {
            return Err(ApiError::Invalid(format!(
                "expected {REEL_COUNT} reels, got {}",
                self.reels.len()
            )));
        }
        let mut reels = [ReelColumn([Symbol(0); ROW_COUNT]); REEL_COUNT];
        for (reel, wire) in self.reels.iter().enumerate() {
            if wire.len() != ROW_COUNT {
                return Err(ApiError::Invalid(format!(
                    "reel {reel} has {} symbols, expected {ROW_COUNT}",
                    wire.len()
                )));
            }
            for (row, &value) in wire.iter().enumerate() {
                let symbol = Symbol::from_wire(value)
                    .filter(|s| s.index() < catalog_len)
                    .ok_or_else(|| {
                        ApiError::Invalid(format!("reel {reel} row {row}: unknown symbol {value}"))
                    })?;
                reels[reel].0[row] = symbol;
            }
        }
        let derived = evaluate_reels(&reels);
        if derived != self.win_type {
            return Err(ApiError::Invalid(format!(
                "win type {:?} does not match reels ({derived:?})",
                self.win_type
            )));
        }
        Ok(Outcome {
            reels,
            win_type: self.win_type,
            bonus: self.bonus,
        })
    }
}

/// Body of `GET /catalog`: image references in symbol order plus audio clips.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogResponse {
    pub symbols: Vec<String>,
    pub audio: Vec<AudioTrack>,
}

impl CatalogResponse {
    pub fn catalog(&self) -> ApiResult<SymbolCatalog> {
        SymbolCatalog::new(self.symbols.clone()).map_err(|e| ApiError::Invalid(e.to_string()))
    }
}

/// One resolved spin in a play session's log.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinRecord {
    pub ts: DateTime<Utc>,
    pub bonus_round: bool,
    pub reels: Vec<Vec<u8>>,
    pub win_type: WinType,
    pub bonus: bool,
    pub payout: u64,
    pub balance: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    Invalid(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
