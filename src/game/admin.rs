//! Admin Operations
//!
//! Destructive and minting operations, every one gated on the caller's
//! super-moderator flag inside the engine. Earlier releases trusted the
//! dispatcher to do this gating; the check moved here so it cannot be
//! forgotten by a new caller.

use log::{info, warn};

use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::PlayerRecord;
use crate::logutil::escape_log;

impl GangWarsEngine {
    fn require_supermod(&self, actor_id: &str) -> Result<PlayerRecord, GangWarsError> {
        let actor = self.store.get_player(actor_id)?;
        if !actor.is_supermod {
            return Err(GangWarsError::PermissionDenied(
                "super-moderator flag required".to_string(),
            ));
        }
        Ok(actor)
    }

    /// Wipe every player, gang, and join request.
    pub fn reset(&mut self, actor_id: &str) -> Result<(), GangWarsError> {
        self.require_supermod(actor_id)?;
        self.store.clear_all()?;
        warn!("game reset by {}", escape_log(actor_id));
        Ok(())
    }

    /// Add currency to a player's balance. Also the entry point for external
    /// passive-income schedulers. Returns the new balance.
    pub fn grant_currency(
        &mut self,
        actor_id: &str,
        player_id: &str,
        amount: i64,
    ) -> Result<i64, GangWarsError> {
        self.require_supermod(actor_id)?;
        if amount <= 0 {
            return Err(GangWarsError::InvalidAmount);
        }
        let mut player = self.store.get_player(player_id)?;
        player.currency += amount;
        let balance = player.currency;
        self.store.put_player(player)?;
        info!(
            "granted {} to {} by {}",
            amount,
            escape_log(player_id),
            escape_log(actor_id)
        );
        Ok(balance)
    }

    /// Hard-delete a player: membership, outstanding join requests, and
    /// disband votes referencing it are cleaned up first. The gang is
    /// deleted too when the removal empties it.
    pub fn remove_player(&mut self, actor_id: &str, player_id: &str) -> Result<(), GangWarsError> {
        self.require_supermod(actor_id)?;
        let player = self.store.get_player(player_id)?;

        if let Some(gang_id) = &player.gang_id {
            if let Some(mut gang) = self.store.lookup_gang(gang_id)? {
                gang.remove_member(&player.id);
                if gang.members.is_empty() {
                    self.store.delete_gang(&gang.id)?;
                } else {
                    self.store.put_gang(gang)?;
                }
            }
        }
        for request in self.store.list_requests()? {
            if request.player_id == player.id {
                self.store.delete_request(&request.id)?;
            }
        }
        self.store.delete_player(&player.id)?;
        warn!(
            "player {} removed by {}",
            escape_log(player_id),
            escape_log(actor_id)
        );
        Ok(())
    }
}
