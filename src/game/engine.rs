//! The engine facade: one value owning the store, the weapon catalog, and the
//! game configuration, with one public method per chat verb.
//!
//! Every mutating operation takes `&mut self`. Exclusive access is the
//! serialization unit for multi-step mutations (deposit's debit+credit,
//! combat's dual balance and cooldown writes): a dispatcher running workers
//! shares the engine behind a mutex and gets the read-validate-write
//! atomicity the game's invariants depend on.

use std::path::Path;

use crate::config::GameConfig;
use crate::game::catalog::WeaponCatalog;
use crate::game::errors::GangWarsError;
use crate::game::storage::GangStore;

pub struct GangWarsEngine {
    pub(crate) store: GangStore,
    pub(crate) catalog: WeaponCatalog,
    pub(crate) config: GameConfig,
}

impl GangWarsEngine {
    /// Open an engine over a store at `path` with the builtin armory and
    /// default configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GangWarsError> {
        let store = GangStore::open(path)?;
        Self::with_parts(store, WeaponCatalog::builtin(), GameConfig::default())
    }

    /// Assemble an engine from explicit parts.
    ///
    /// Checks the configuration against the catalog: a configured starter
    /// weapon that is not purchasable is a deployment mistake, caught here
    /// rather than at the first registration.
    pub fn with_parts(
        store: GangStore,
        catalog: WeaponCatalog,
        config: GameConfig,
    ) -> Result<Self, GangWarsError> {
        config
            .validate()
            .map_err(|e| GangWarsError::InvalidConfig(e.to_string()))?;
        if let Some(starter) = &config.starter_weapon {
            if !catalog.contains(starter) {
                return Err(GangWarsError::UnknownWeapon(starter.clone()));
            }
        }
        Ok(Self {
            store,
            catalog,
            config,
        })
    }

    pub fn store(&self) -> &GangStore {
        &self.store
    }

    pub fn catalog(&self) -> &WeaponCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
