use thiserror::Error;
use tracing::debug;

use crate::{engine::Outcome, paytable::Paytable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("insufficient balance: {balance} credits, stake is {stake}")]
    InsufficientBalance { balance: u64, stake: u64 },
    #[error("no bonus spin available")]
    NoBonusAvailable,
}

/// Whether a spin costs the stake or was granted by a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinKind {
    Regular,
    Bonus,
}

/// Credit balance for one play session. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    paytable: Paytable,
    balance: u64,
    pending_bonus: bool,
}

impl Session {
    pub fn new(paytable: Paytable) -> Self {
        Self {
            balance: paytable.starting_balance,
            paytable,
            pending_bonus: false,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn paytable(&self) -> &Paytable {
        &self.paytable
    }

    /// A bonus from the last settled spin that has not been played yet.
    pub fn bonus_available(&self) -> bool {
        self.pending_bonus
    }

    /// Gate checked before any transport call; leaves state untouched on
    /// rejection. Bonus spins are gated on balance too even though they are free.
    pub fn ensure_can_spin(&self, kind: SpinKind) -> Result<(), SessionError> {
        if kind == SpinKind::Bonus && !self.pending_bonus {
            return Err(SessionError::NoBonusAvailable);
        }
        if self.balance < self.paytable.stake {
            return Err(SessionError::InsufficientBalance {
                balance: self.balance,
                stake: self.paytable.stake,
            });
        }
        Ok(())
    }

    /// Charges for a spin whose outcome has been received.
    pub fn charge(&mut self, kind: SpinKind) -> Result<(), SessionError> {
        self.ensure_can_spin(kind)?;
        match kind {
            SpinKind::Regular => self.balance -= self.paytable.stake,
            SpinKind::Bonus => self.pending_bonus = false,
        }
        Ok(())
    }

    /// Credits the payout once the reels have resolved. Returns the amount won.
    pub fn settle(&mut self, outcome: &Outcome) -> u64 {
        let won = self.paytable.payout(outcome.win_type);
        self.balance += won;
        self.pending_bonus = outcome.bonus;
        debug!(won, balance = self.balance, bonus = outcome.bonus, "spin settled");
        won
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{ReelColumn, Symbol};

    fn outcome(big: bool, bonus: bool) -> Outcome {
        let c = ReelColumn([Symbol(0), Symbol(1), Symbol(2)]);
        let d = ReelColumn([Symbol(3), Symbol(4), Symbol(5)]);
        let e = ReelColumn([Symbol(6), Symbol(7), Symbol(8)]);
        if big {
            Outcome::from_reels([c, c, c], bonus)
        } else {
            Outcome::from_reels([c, d, e], bonus)
        }
    }

    #[test]
    fn regular_spin_costs_stake() {
        let mut s = Session::new(Paytable::default());
        s.charge(SpinKind::Regular).unwrap();
        assert_eq!(s.balance(), 90);
        assert_eq!(s.settle(&outcome(true, false)), 50);
        assert_eq!(s.balance(), 140);
    }

    #[test]
    fn bonus_spin_is_free() {
        let mut s = Session::new(Paytable::default());
        s.charge(SpinKind::Regular).unwrap();
        s.settle(&outcome(false, true));
        assert!(s.bonus_available());
        s.charge(SpinKind::Bonus).unwrap();
        assert_eq!(s.balance(), 90);
        assert!(!s.bonus_available());
        assert_eq!(s.charge(SpinKind::Bonus), Err(SessionError::NoBonusAvailable));
    }

    #[test]
    fn rejects_below_stake_without_change() {
        let mut s = Session::new(Paytable {
            starting_balance: 9,
            ..Paytable::default()
        });
        let err = s.charge(SpinKind::Regular).unwrap_err();
        assert_eq!(err, SessionError::InsufficientBalance { balance: 9, stake: 10 });
        assert_eq!(s.balance(), 9);
    }
}
