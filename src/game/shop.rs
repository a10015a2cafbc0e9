//! Weapon Shop
//!
//! Purchases and upgrades against the static catalog. Every path reads the
//! player through the storage boundary, so a legacy list-shaped inventory is
//! already canonical (map shape) by the time the shop looks at it.

use log::debug;

use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::PlayerRecord;
use crate::logutil::escape_log;

impl GangWarsEngine {
    /// Buy a catalog weapon at level 1. Fails without touching currency or
    /// inventory when the weapon is unknown, already owned, or unaffordable.
    pub fn buy_weapon(
        &mut self,
        player_id: &str,
        weapon_id: &str,
    ) -> Result<PlayerRecord, GangWarsError> {
        let mut player = self.store.get_player(player_id)?;
        let weapon = self
            .catalog
            .get(weapon_id)
            .ok_or_else(|| GangWarsError::UnknownWeapon(weapon_id.to_string()))?;
        if player.inventory.owns(&weapon.id) {
            return Err(GangWarsError::AlreadyOwned(weapon.id.clone()));
        }
        if player.currency < weapon.cost {
            return Err(GangWarsError::InsufficientFunds);
        }

        player.currency -= weapon.cost;
        player.inventory.set_level(&weapon.id, 1);
        self.store.put_player(player.clone())?;
        debug!(
            "{} bought {} for {}",
            escape_log(player_id),
            weapon.id,
            weapon.cost
        );
        Ok(player)
    }

    /// Upgrade an owned weapon by exactly one level.
    pub fn upgrade_weapon(
        &mut self,
        player_id: &str,
        weapon_id: &str,
    ) -> Result<PlayerRecord, GangWarsError> {
        let mut player = self.store.get_player(player_id)?;
        let weapon = self
            .catalog
            .get(weapon_id)
            .ok_or_else(|| GangWarsError::UnknownWeapon(weapon_id.to_string()))?;
        let level = player
            .inventory
            .level_of(&weapon.id)
            .ok_or_else(|| GangWarsError::WeaponNotOwned(weapon.id.clone()))?;
        if level >= weapon.max_level {
            return Err(GangWarsError::MaxLevelReached(weapon.id.clone()));
        }
        if player.currency < weapon.upgrade_cost {
            return Err(GangWarsError::InsufficientFunds);
        }

        player.currency -= weapon.upgrade_cost;
        player.inventory.set_level(&weapon.id, level + 1);
        self.store.put_player(player.clone())?;
        debug!(
            "{} upgraded {} to level {}",
            escape_log(player_id),
            weapon.id,
            level + 1
        );
        Ok(player)
    }
}
