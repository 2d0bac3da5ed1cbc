use serde::{Deserialize, Serialize};

use crate::engine::WinType;

/// Credits in and out of a spin. Payouts are flat per win type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paytable {
    pub starting_balance: u64,
    pub stake: u64,
    pub small_win: u64,
    pub big_win: u64,
}

impl Default for Paytable {
    fn default() -> Self {
        Self {
            starting_balance: 100,
            stake: 10,
            small_win: 15,
            big_win: 50,
        }
    }
}

impl Paytable {
    pub fn payout(&self, win_type: WinType) -> u64 {
        match win_type {
            WinType::BigWin => self.big_win,
            WinType::SmallWin => self.small_win,
            WinType::NoWin | WinType::Invalid => 0,
        }
    }
}
