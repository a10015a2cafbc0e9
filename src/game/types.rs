use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;
pub const GANG_SCHEMA_VERSION: u8 = 1;
pub const REQUEST_SCHEMA_VERSION: u8 = 1;

/// A player's gang-scoped privilege tier.
///
/// Governs withdrawal limits and join-approval authority. Exactly one role is
/// assigned per player; `GodFather` is only reachable by founding a gang, and
/// leaving (or being removed from) a gang always resets to `Grunt`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Grunt,
    Lieutenant,
    GodFather,
}

impl Role {
    /// Whether this role may approve or deny join requests for its gang.
    pub fn is_officer(&self) -> bool {
        matches!(self, Role::Lieutenant | Role::GodFather)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Grunt => "Grunt",
            Role::Lieutenant => "Lieutenant",
            Role::GodFather => "God Father",
        };
        f.write_str(name)
    }
}

/// Weapon inventory in one of two stored shapes.
///
/// Early deployments persisted a flat list of owned weapon ids, each
/// implicitly level 1. The canonical shape is a map from weapon id to level.
/// The storage layer converts `Legacy` to `Levels` the first time a record is
/// read and persists the map shape from then on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Inventory {
    /// Flat list of owned weapon ids, each implicitly level 1.
    Legacy(Vec<String>),
    /// Canonical shape: weapon id mapped to its current level.
    Levels(BTreeMap<String, u32>),
}

impl Default for Inventory {
    fn default() -> Self {
        Self::Levels(BTreeMap::new())
    }
}

impl Inventory {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Convert the legacy list shape into the canonical map shape.
    /// Returns true when a conversion actually happened.
    pub fn canonicalize(&mut self) -> bool {
        match self {
            Self::Levels(_) => false,
            Self::Legacy(ids) => {
                let mut levels = BTreeMap::new();
                for id in ids.drain(..) {
                    levels.entry(id).or_insert(1);
                }
                *self = Self::Levels(levels);
                true
            }
        }
    }

    /// Iterate over `(weapon_id, level)` pairs regardless of stored shape.
    pub fn entries(&self) -> Box<dyn Iterator<Item = (&str, u32)> + '_> {
        match self {
            Self::Legacy(ids) => Box::new(ids.iter().map(|id| (id.as_str(), 1))),
            Self::Levels(levels) => Box::new(levels.iter().map(|(id, lvl)| (id.as_str(), *lvl))),
        }
    }

    pub fn owns(&self, weapon_id: &str) -> bool {
        self.entries().any(|(id, _)| id == weapon_id)
    }

    pub fn level_of(&self, weapon_id: &str) -> Option<u32> {
        self.entries()
            .find(|(id, _)| *id == weapon_id)
            .map(|(_, lvl)| lvl)
    }

    /// Set a weapon's level, canonicalizing the shape first.
    pub fn set_level(&mut self, weapon_id: &str, level: u32) {
        self.canonicalize();
        if let Self::Levels(levels) = self {
            levels.insert(weapon_id.to_string(), level);
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Legacy(ids) => ids.len(),
            Self::Levels(levels) => levels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persistent state for one registered player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    /// Stable external identity (platform user id), never reassigned.
    pub id: String,
    /// Display name; unique lookup key, compared case-insensitively.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Personal currency on hand. Never negative at rest.
    pub currency: i64,
    /// The gang this player belongs to, if any. A player belongs to at most
    /// one gang, and its id must appear in that gang's member list.
    #[serde(default)]
    pub gang_id: Option<String>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub wins: u32,
    /// Granted at registration time; gates admin operations.
    #[serde(default)]
    pub is_supermod: bool,
    #[serde(default)]
    pub role: Role,
    /// When this player was last attacked; drives the cooldown rule.
    #[serde(default)]
    pub last_attacked_at: Option<DateTime<Utc>>,
    /// When this player last attacked someone; retaliation lifts cooldown.
    #[serde(default)]
    pub last_attack_at: Option<DateTime<Utc>>,
    pub schema_version: u8,
}

impl PlayerRecord {
    pub fn new(id: &str, name: &str, starting_currency: i64) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            currency: starting_currency,
            gang_id: None,
            inventory: Inventory::default(),
            wins: 0,
            is_supermod: false,
            role: Role::default(),
            last_attacked_at: None,
            last_attack_at: None,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Persistent state for one gang.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GangRecord {
    /// Derived from the name slug plus creation time; stable thereafter.
    pub id: String,
    /// Display name; unique lookup key, compared case-insensitively.
    /// May contain spaces.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Member player ids. Denormalized: always equals the set of players
    /// whose `gang_id` references this gang. A gang with zero members is
    /// deleted, never stored.
    pub members: Vec<String>,
    /// Pooled currency, distinct from any member's personal balance.
    pub bank: i64,
    #[serde(default)]
    pub wins: u32,
    /// Player ids that voted to disband. Tracked but not wired to any
    /// automatic disband.
    #[serde(default)]
    pub disband_votes: Vec<String>,
    #[serde(default)]
    pub last_attacked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_attack_at: Option<DateTime<Utc>>,
    pub schema_version: u8,
}

impl GangRecord {
    pub fn new(id: &str, name: &str, founder_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            created_at,
            updated_at: created_at,
            members: vec![founder_id.to_string()],
            bank: 0,
            wins: 0,
            disband_votes: Vec::new(),
            last_attacked_at: None,
            last_attack_at: None,
            schema_version: GANG_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn has_member(&self, player_id: &str) -> bool {
        self.members.iter().any(|m| m == player_id)
    }

    pub fn add_member(&mut self, player_id: &str) {
        if !self.has_member(player_id) {
            self.members.push(player_id.to_string());
        }
    }

    /// Remove a member and any disband vote they cast.
    pub fn remove_member(&mut self, player_id: &str) {
        self.members.retain(|m| m != player_id);
        self.disband_votes.retain(|m| m != player_id);
    }
}

/// A pending request by a player to join a gang.
///
/// At most one outstanding request exists per (player, gang) pair; the
/// record is deleted when an officer approves or denies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinRequestRecord {
    pub id: String,
    pub player_id: String,
    pub gang_id: String,
    pub requested_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl JoinRequestRecord {
    pub fn new(player_id: &str, gang_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            player_id: player_id.to_string(),
            gang_id: gang_id.to_string(),
            requested_at: Utc::now(),
            schema_version: REQUEST_SCHEMA_VERSION,
        }
    }
}
