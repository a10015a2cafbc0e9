//! Test utilities & fixtures.
//! Every suite opens a throwaway engine over a temp-dir sled store.

use gangwars::config::GameConfig;
use gangwars::game::{GangStore, GangWarsEngine, WeaponCatalog};
use tempfile::TempDir;

/// Engine with the builtin armory and default tuning. The `TempDir` must be
/// kept alive for the duration of the test.
#[allow(dead_code)]
pub fn test_engine() -> (TempDir, GangWarsEngine) {
    test_engine_with(GameConfig::default())
}

/// Engine with custom tuning over the builtin armory.
#[allow(dead_code)]
pub fn test_engine_with(config: GameConfig) -> (TempDir, GangWarsEngine) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().expect("tempdir");
    let store = GangStore::open(dir.path()).expect("store");
    let engine =
        GangWarsEngine::with_parts(store, WeaponCatalog::builtin(), config).expect("engine");
    (dir, engine)
}

/// Set a player's currency directly through the store, bypassing game rules.
#[allow(dead_code)]
pub fn set_currency(engine: &GangWarsEngine, player_id: &str, amount: i64) {
    let mut player = engine.store().get_player(player_id).expect("player");
    player.currency = amount;
    engine.store().put_player(player).expect("put");
}
