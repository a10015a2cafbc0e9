//! Player and Gang Registration & Resolution
//!
//! Chat commands reference players and gangs by whatever the viewer typed:
//! a display name, an `@`-handle, or a raw platform id. Resolution strips one
//! leading `@`, tries an exact case-insensitive name match first, and falls
//! back to an exact id match. Name lookup deliberately takes precedence so a
//! player named after someone else's id cannot be shadowed by it.

use log::{debug, info};

use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::{GangRecord, PlayerRecord, Role};
use crate::logutil::escape_log;

const MAX_NAME_LEN: usize = 64;

/// Normalize a name for comparison: lowercase, trimmed, inner runs of
/// whitespace collapsed to single spaces.
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip one leading `@` and surrounding whitespace from a chat identifier.
pub(crate) fn strip_handle(identifier: &str) -> &str {
    let trimmed = identifier.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed)
}

fn validate_name(name: &str) -> Result<(), GangWarsError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GangWarsError::InvalidName("name is empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(GangWarsError::InvalidName(format!(
            "name longer than {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Derive a stable gang id from the gang name and creation time.
pub(crate) fn derive_gang_id(name: &str, created_at: chrono::DateTime<chrono::Utc>) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}:{}", slug, created_at.timestamp())
}

impl GangWarsEngine {
    /// Register a player. Idempotent: an already-known id is returned as-is,
    /// with no fields touched. New players receive the configured starting
    /// grant and, when configured, the starter weapon at level 1.
    pub fn register(
        &mut self,
        player_id: &str,
        name: &str,
        is_supermod: bool,
    ) -> Result<PlayerRecord, GangWarsError> {
        if let Some(existing) = self.store.lookup_player(player_id)? {
            debug!("register: {} already known", escape_log(player_id));
            return Ok(existing);
        }
        validate_name(name)?;

        let wanted = normalize_name(name);
        for other in self.store.list_players()? {
            if normalize_name(&other.name) == wanted {
                return Err(GangWarsError::NameTaken(name.trim().to_string()));
            }
        }

        let mut player = PlayerRecord::new(player_id, name.trim(), self.config.starting_currency);
        player.is_supermod = is_supermod;
        if let Some(starter) = &self.config.starter_weapon {
            player.inventory.set_level(starter, 1);
        }
        self.store.put_player(player.clone())?;
        info!(
            "registered player {} ({})",
            escape_log(&player.name),
            escape_log(player_id)
        );
        Ok(player)
    }

    /// Resolve a chat identifier to a player: name match first, id second.
    pub fn resolve_player(&self, identifier: &str) -> Result<PlayerRecord, GangWarsError> {
        let query = strip_handle(identifier);
        if query.is_empty() {
            return Err(GangWarsError::NotFound("player: (empty)".to_string()));
        }
        let wanted = normalize_name(query);
        for player in self.store.list_players()? {
            if normalize_name(&player.name) == wanted {
                return Ok(player);
            }
        }
        if let Some(player) = self.store.lookup_player(query)? {
            return Ok(player);
        }
        Err(GangWarsError::NotFound(format!("player: {}", query)))
    }

    /// Resolve a chat identifier to a gang: name match first, id second.
    pub fn resolve_gang(&self, identifier: &str) -> Result<GangRecord, GangWarsError> {
        let query = strip_handle(identifier);
        if query.is_empty() {
            return Err(GangWarsError::NotFound("gang: (empty)".to_string()));
        }
        let wanted = normalize_name(query);
        for gang in self.store.list_gangs()? {
            if normalize_name(&gang.name) == wanted {
                return Ok(gang);
            }
        }
        if let Some(gang) = self.store.lookup_gang(query)? {
            return Ok(gang);
        }
        Err(GangWarsError::NotFound(format!("gang: {}", query)))
    }

    /// Found a new gang. The creator must be registered and gangless; they
    /// become the gang's sole member and its God Father.
    pub fn create_gang(
        &mut self,
        player_id: &str,
        gang_name: &str,
    ) -> Result<GangRecord, GangWarsError> {
        let mut founder = self.store.get_player(player_id)?;
        if founder.gang_id.is_some() {
            return Err(GangWarsError::AlreadyInGang);
        }
        validate_name(gang_name)?;

        let wanted = normalize_name(gang_name);
        for other in self.store.list_gangs()? {
            if normalize_name(&other.name) == wanted {
                return Err(GangWarsError::NameTaken(gang_name.trim().to_string()));
            }
        }

        let now = chrono::Utc::now();
        let gang_id = derive_gang_id(gang_name, now);
        let gang = GangRecord::new(&gang_id, gang_name.trim(), &founder.id, now);

        founder.gang_id = Some(gang.id.clone());
        founder.role = Role::GodFather;

        self.store.put_gang(gang.clone())?;
        self.store.put_player(founder)?;
        info!(
            "gang {} founded by {}",
            escape_log(&gang.name),
            escape_log(player_id)
        );
        Ok(gang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_name("The  Mob"), "the mob");
        assert_eq!(normalize_name("  STREET kings "), "street kings");
    }

    #[test]
    fn strips_one_leading_at() {
        assert_eq!(strip_handle("@Alice"), "Alice");
        assert_eq!(strip_handle("  @Alice "), "Alice");
        assert_eq!(strip_handle("Alice"), "Alice");
        assert_eq!(strip_handle("@@Alice"), "@Alice");
    }

    #[test]
    fn gang_id_is_slug_plus_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let id = derive_gang_id("Street Kings!", at);
        assert_eq!(id, format!("street_kings_:{}", at.timestamp()));
    }

    #[test]
    fn rejects_empty_names() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("ok").is_ok());
        assert!(validate_name(&"x".repeat(65)).is_err());
    }
}
