//! Gang Bank Economy
//!
//! Deposits move personal currency into the gang's shared bank; withdrawals
//! are role-gated. One long-standing quirk is kept on purpose: a withdrawal
//! debits the bank without crediting the withdrawing player, so withdrawn
//! funds leave the game entirely. `tests/economy_flow.rs` pins this so any
//! future change to the sink is an explicit product decision.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::Role;
use crate::logutil::escape_log;

/// Balances after a successful bank operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankReceipt {
    pub player_currency: i64,
    pub gang_bank: i64,
}

/// Maximum a role may withdraw from a bank holding `bank` in one call.
/// `None` means the role may not withdraw at all.
pub fn withdrawal_cap(role: Role, bank: i64) -> Option<i64> {
    match role {
        Role::Grunt => None,
        Role::Lieutenant => Some(bank / 10),
        Role::GodFather => Some(bank),
    }
}

impl GangWarsEngine {
    /// Move personal currency into the gang bank. Debit and credit land
    /// together or not at all; the combined total is invariant.
    pub fn deposit(&mut self, player_id: &str, amount: i64) -> Result<BankReceipt, GangWarsError> {
        if amount <= 0 {
            return Err(GangWarsError::InvalidAmount);
        }
        let mut player = self.store.get_player(player_id)?;
        let gang_id = player
            .gang_id
            .clone()
            .ok_or(GangWarsError::NotInGang)?;
        let mut gang = self.store.get_gang(&gang_id)?;
        if player.currency < amount {
            return Err(GangWarsError::InsufficientFunds);
        }

        player.currency -= amount;
        gang.bank += amount;
        let receipt = BankReceipt {
            player_currency: player.currency,
            gang_bank: gang.bank,
        };
        self.store.put_player(player)?;
        self.store.put_gang(gang)?;
        debug!("deposit {} by {}", amount, escape_log(player_id));
        Ok(receipt)
    }

    /// Withdraw from the gang bank, within the caller's role cap.
    ///
    /// Grunts may never withdraw; Lieutenants up to a tenth of the bank per
    /// call; the God Father up to the full bank. The bank is debited and the
    /// withdrawn amount is gone; the player's balance is untouched.
    pub fn withdraw(&mut self, player_id: &str, amount: i64) -> Result<BankReceipt, GangWarsError> {
        if amount <= 0 {
            return Err(GangWarsError::InvalidAmount);
        }
        let player = self.store.get_player(player_id)?;
        let gang_id = player.gang_id.clone().ok_or(GangWarsError::NotInGang)?;
        let mut gang = self.store.get_gang(&gang_id)?;

        let cap = withdrawal_cap(player.role, gang.bank).ok_or_else(|| {
            GangWarsError::PermissionDenied("grunts may not withdraw from the bank".to_string())
        })?;
        if amount > cap {
            return Err(GangWarsError::WithdrawalCapExceeded {
                role: player.role,
                cap,
            });
        }
        if amount > gang.bank {
            return Err(GangWarsError::InsufficientFunds);
        }

        gang.bank -= amount;
        let receipt = BankReceipt {
            player_currency: player.currency,
            gang_bank: gang.bank,
        };
        self.store.put_gang(gang)?;
        debug!(
            "withdraw {} by {} ({})",
            amount,
            escape_log(player_id),
            player.role
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grunt_has_no_cap() {
        assert_eq!(withdrawal_cap(Role::Grunt, 10_000), None);
        assert_eq!(withdrawal_cap(Role::Grunt, 0), None);
    }

    #[test]
    fn lieutenant_cap_is_tenth_of_bank() {
        assert_eq!(withdrawal_cap(Role::Lieutenant, 1000), Some(100));
        assert_eq!(withdrawal_cap(Role::Lieutenant, 99), Some(9));
        assert_eq!(withdrawal_cap(Role::Lieutenant, 5), Some(0));
    }

    #[test]
    fn god_father_cap_is_full_bank() {
        assert_eq!(withdrawal_cap(Role::GodFather, 1234), Some(1234));
    }
}
