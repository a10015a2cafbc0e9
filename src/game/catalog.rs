//! Static weapon catalog consulted by the shop and the combat resolver.
//!
//! The catalog is immutable reference data: it is built once (from the
//! builtin armory or a JSON seed file) and injected into the engine, never
//! mutated at runtime. Seed files let operators rebalance the armory without
//! recompiling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::game::errors::GangWarsError;

/// One purchasable weapon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeaponDef {
    pub id: String,
    pub name: String,
    /// Purchase price, debited from personal currency.
    pub cost: i64,
    /// Base power contributed per level.
    pub power: i64,
    /// Price of each single-level upgrade.
    pub upgrade_cost: i64,
    /// Highest level this weapon can reach.
    pub max_level: u32,
}

/// Immutable lookup table of every purchasable weapon.
#[derive(Debug, Clone)]
pub struct WeaponCatalog {
    weapons: BTreeMap<String, WeaponDef>,
}

impl WeaponCatalog {
    pub fn new(defs: Vec<WeaponDef>) -> Self {
        let weapons = defs.into_iter().map(|w| (w.id.clone(), w)).collect();
        Self { weapons }
    }

    /// The stock armory shipped with the engine.
    pub fn builtin() -> Self {
        let defs = vec![
            WeaponDef {
                id: "knife".to_string(),
                name: "Switchblade".to_string(),
                cost: 50,
                power: 5,
                upgrade_cost: 25,
                max_level: 5,
            },
            WeaponDef {
                id: "pistol".to_string(),
                name: "Pistol".to_string(),
                cost: 100,
                power: 10,
                upgrade_cost: 50,
                max_level: 5,
            },
            WeaponDef {
                id: "shotgun".to_string(),
                name: "Sawed-Off Shotgun".to_string(),
                cost: 250,
                power: 25,
                upgrade_cost: 120,
                max_level: 5,
            },
            WeaponDef {
                id: "smg".to_string(),
                name: "Tommy Gun".to_string(),
                cost: 400,
                power: 40,
                upgrade_cost: 200,
                max_level: 5,
            },
            WeaponDef {
                id: "rifle".to_string(),
                name: "Carbine Rifle".to_string(),
                cost: 600,
                power: 60,
                upgrade_cost: 300,
                max_level: 4,
            },
            WeaponDef {
                id: "sniper".to_string(),
                name: "Sniper Rifle".to_string(),
                cost: 1000,
                power: 95,
                upgrade_cost: 500,
                max_level: 3,
            },
        ];
        Self::new(defs)
    }

    /// Load a catalog from a JSON seed file (`data/seeds/weapons.json`).
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, GangWarsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let defs: Vec<WeaponDef> = serde_json::from_str(&contents).map_err(|e| {
            GangWarsError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to parse {}: {}", path.display(), e),
            ))
        })?;

        Ok(Self::new(defs))
    }

    pub fn get(&self, weapon_id: &str) -> Option<&WeaponDef> {
        self.weapons.get(weapon_id)
    }

    pub fn contains(&self, weapon_id: &str) -> bool {
        self.weapons.contains_key(weapon_id)
    }

    /// Iterate weapons in stable (id) order, for shop listings.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponDef> {
        self.weapons.values()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_pistol() {
        let catalog = WeaponCatalog::builtin();
        let pistol = catalog.get("pistol").expect("pistol in builtin armory");
        assert_eq!(pistol.cost, 100);
        assert_eq!(pistol.power, 10);
        assert!(pistol.max_level >= 1);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn unknown_weapon_is_none() {
        let catalog = WeaponCatalog::builtin();
        assert!(catalog.get("rocket_launcher").is_none());
        assert!(!catalog.contains("rocket_launcher"));
    }

    #[test]
    fn loads_seed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weapons.json");
        let seed = r#"[
            {"id": "bat", "name": "Baseball Bat", "cost": 30, "power": 3, "upgrade_cost": 15, "max_level": 2}
        ]"#;
        std::fs::write(&path, seed).expect("write seed");

        let catalog = WeaponCatalog::load_from_json(&path).expect("load");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("bat").unwrap().power, 3);
    }

    #[test]
    fn rejects_malformed_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weapons.json");
        std::fs::write(&path, "not json").expect("write seed");
        assert!(WeaponCatalog::load_from_json(&path).is_err());
    }

    #[test]
    fn iteration_is_id_ordered() {
        let catalog = WeaponCatalog::builtin();
        let ids: Vec<&str> = catalog.iter().map(|w| w.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
