use std::path::{Path, PathBuf};

use log::debug;
use sled::IVec;

use crate::game::errors::GangWarsError;
use crate::game::types::{
    GangRecord, JoinRequestRecord, PlayerRecord, GANG_SCHEMA_VERSION, PLAYER_SCHEMA_VERSION,
    REQUEST_SCHEMA_VERSION,
};
use crate::logutil::escape_log;

const TREE_PLAYERS: &str = "gangwars_players";
const TREE_GANGS: &str = "gangwars_gangs";
const TREE_REQUESTS: &str = "gangwars_requests";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GangStoreBuilder {
    path: PathBuf,
}

impl GangStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<GangStore, GangWarsError> {
        GangStore::open(self.path)
    }
}

/// Sled-backed persistence for players, gangs, and join requests.
///
/// One tree per entity family, bincode-encoded values, a schema-version check
/// on every read. Legacy list-shaped inventories are converted to the
/// canonical map shape at this boundary: after any successful `get_player`
/// the stored record is in map shape.
pub struct GangStore {
    _db: sled::Db,
    players: sled::Tree,
    gangs: sled::Tree,
    requests: sled::Tree,
}

impl GangStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GangWarsError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let gangs = db.open_tree(TREE_GANGS)?;
        let requests = db.open_tree(TREE_REQUESTS)?;
        Ok(Self {
            _db: db,
            players,
            gangs,
            requests,
        })
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GangWarsError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GangWarsError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or update a player record.
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), GangWarsError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let bytes = Self::serialize(&player)?;
        self.players.insert(player.id.as_bytes(), bytes)?;
        self.players.flush()?;
        Ok(())
    }

    /// Fetch a player record by id, or `None` when absent.
    ///
    /// Legacy inventories are migrated to map shape here and written back
    /// before the record is returned.
    pub fn lookup_player(&self, player_id: &str) -> Result<Option<PlayerRecord>, GangWarsError> {
        let Some(bytes) = self.players.get(player_id.as_bytes())? else {
            return Ok(None);
        };
        let mut record: PlayerRecord = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(GangWarsError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        if record.inventory.canonicalize() {
            debug!(
                "migrated legacy inventory for player {}",
                escape_log(&record.id)
            );
            self.put_player(record.clone())?;
        }
        Ok(Some(record))
    }

    /// Fetch a player record by id, failing when absent.
    pub fn get_player(&self, player_id: &str) -> Result<PlayerRecord, GangWarsError> {
        self.lookup_player(player_id)?
            .ok_or_else(|| GangWarsError::NotFound(format!("player: {}", player_id)))
    }

    pub fn delete_player(&self, player_id: &str) -> Result<(), GangWarsError> {
        self.players.remove(player_id.as_bytes())?;
        self.players.flush()?;
        Ok(())
    }

    /// List all stored players.
    pub fn list_players(&self) -> Result<Vec<PlayerRecord>, GangWarsError> {
        let mut records = Vec::new();
        for entry in self.players.iter() {
            let (_, value) = entry?;
            records.push(Self::deserialize(value)?);
        }
        Ok(records)
    }

    /// Insert or update a gang record.
    pub fn put_gang(&self, mut gang: GangRecord) -> Result<(), GangWarsError> {
        gang.schema_version = GANG_SCHEMA_VERSION;
        gang.touch();
        let bytes = Self::serialize(&gang)?;
        self.gangs.insert(gang.id.as_bytes(), bytes)?;
        self.gangs.flush()?;
        Ok(())
    }

    pub fn lookup_gang(&self, gang_id: &str) -> Result<Option<GangRecord>, GangWarsError> {
        let Some(bytes) = self.gangs.get(gang_id.as_bytes())? else {
            return Ok(None);
        };
        let record: GangRecord = Self::deserialize(bytes)?;
        if record.schema_version != GANG_SCHEMA_VERSION {
            return Err(GangWarsError::SchemaMismatch {
                entity: "gang",
                expected: GANG_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    pub fn get_gang(&self, gang_id: &str) -> Result<GangRecord, GangWarsError> {
        self.lookup_gang(gang_id)?
            .ok_or_else(|| GangWarsError::NotFound(format!("gang: {}", gang_id)))
    }

    pub fn delete_gang(&self, gang_id: &str) -> Result<(), GangWarsError> {
        self.gangs.remove(gang_id.as_bytes())?;
        self.gangs.flush()?;
        Ok(())
    }

    pub fn list_gangs(&self) -> Result<Vec<GangRecord>, GangWarsError> {
        let mut records = Vec::new();
        for entry in self.gangs.iter() {
            let (_, value) = entry?;
            records.push(Self::deserialize(value)?);
        }
        Ok(records)
    }

    /// Record a join request.
    pub fn put_request(&self, request: JoinRequestRecord) -> Result<(), GangWarsError> {
        let bytes = Self::serialize(&request)?;
        self.requests.insert(request.id.as_bytes(), bytes)?;
        self.requests.flush()?;
        Ok(())
    }

    pub fn get_request(&self, request_id: &str) -> Result<JoinRequestRecord, GangWarsError> {
        let Some(bytes) = self.requests.get(request_id.as_bytes())? else {
            return Err(GangWarsError::NotFound(format!("request: {}", request_id)));
        };
        let record: JoinRequestRecord = Self::deserialize(bytes)?;
        if record.schema_version != REQUEST_SCHEMA_VERSION {
            return Err(GangWarsError::SchemaMismatch {
                entity: "request",
                expected: REQUEST_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    pub fn delete_request(&self, request_id: &str) -> Result<(), GangWarsError> {
        self.requests.remove(request_id.as_bytes())?;
        self.requests.flush()?;
        Ok(())
    }

    pub fn list_requests(&self) -> Result<Vec<JoinRequestRecord>, GangWarsError> {
        let mut records = Vec::new();
        for entry in self.requests.iter() {
            let (_, value) = entry?;
            records.push(Self::deserialize(value)?);
        }
        Ok(records)
    }

    /// The outstanding request for a (player, gang) pair, if one exists.
    pub fn find_request(
        &self,
        player_id: &str,
        gang_id: &str,
    ) -> Result<Option<JoinRequestRecord>, GangWarsError> {
        Ok(self
            .list_requests()?
            .into_iter()
            .find(|r| r.player_id == player_id && r.gang_id == gang_id))
    }

    /// Remove every player, gang, and join request. Admin reset only.
    pub fn clear_all(&self) -> Result<(), GangWarsError> {
        self.players.clear()?;
        self.gangs.clear()?;
        self.requests.clear()?;
        self.players.flush()?;
        self.gangs.flush()?;
        self.requests.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Inventory;
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_player() {
        let dir = TempDir::new().expect("tempdir");
        let store = GangStoreBuilder::new(dir.path()).open().expect("store");
        let mut player = PlayerRecord::new("twitch:1", "Alice", 100);
        player.wins = 3;
        store.put_player(player.clone()).expect("put");
        let fetched = store.get_player("twitch:1").expect("get");
        assert_eq!(fetched.id, player.id);
        assert_eq!(fetched.currency, 100);
        assert_eq!(fetched.wins, 3);
        assert_eq!(fetched.schema_version, PLAYER_SCHEMA_VERSION);
    }

    #[test]
    fn legacy_inventory_is_migrated_on_read() {
        let dir = TempDir::new().expect("tempdir");
        let store = GangStoreBuilder::new(dir.path()).open().expect("store");
        let mut player = PlayerRecord::new("twitch:2", "Bob", 0);
        player.inventory = Inventory::Legacy(vec!["pistol".to_string(), "knife".to_string()]);
        store.put_player(player).expect("put");

        let fetched = store.get_player("twitch:2").expect("get");
        assert!(!fetched.inventory.is_legacy());
        assert_eq!(fetched.inventory.level_of("pistol"), Some(1));
        assert_eq!(fetched.inventory.level_of("knife"), Some(1));

        // The canonical shape was persisted, not just returned.
        let raw = store
            .players
            .get("twitch:2".as_bytes())
            .expect("raw get")
            .expect("present");
        let stored: PlayerRecord = bincode::deserialize(&raw).expect("decode");
        assert!(!stored.inventory.is_legacy());
    }

    #[test]
    fn missing_player_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = GangStoreBuilder::new(dir.path()).open().expect("store");
        assert!(store.lookup_player("nobody").expect("lookup").is_none());
        assert!(matches!(
            store.get_player("nobody"),
            Err(GangWarsError::NotFound(_))
        ));
    }

    #[test]
    fn gang_and_request_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let store = GangStoreBuilder::new(dir.path()).open().expect("store");

        let gang = GangRecord::new("mob:1", "The Mob", "twitch:1", chrono::Utc::now());
        store.put_gang(gang.clone()).expect("put gang");
        let fetched = store.get_gang("mob:1").expect("get gang");
        assert_eq!(fetched.name, "The Mob");
        assert_eq!(fetched.members, vec!["twitch:1".to_string()]);

        let request = JoinRequestRecord::new("twitch:2", "mob:1");
        store.put_request(request.clone()).expect("put request");
        let found = store
            .find_request("twitch:2", "mob:1")
            .expect("find")
            .expect("present");
        assert_eq!(found.id, request.id);

        store.delete_request(&request.id).expect("delete");
        assert!(store
            .find_request("twitch:2", "mob:1")
            .expect("find")
            .is_none());
    }

    #[test]
    fn clear_all_empties_every_tree() {
        let dir = TempDir::new().expect("tempdir");
        let store = GangStoreBuilder::new(dir.path()).open().expect("store");
        store
            .put_player(PlayerRecord::new("twitch:1", "Alice", 100))
            .expect("put player");
        store
            .put_gang(GangRecord::new("mob:1", "The Mob", "twitch:1", chrono::Utc::now()))
            .expect("put gang");
        store
            .put_request(JoinRequestRecord::new("twitch:2", "mob:1"))
            .expect("put request");

        store.clear_all().expect("clear");
        assert!(store.list_players().expect("players").is_empty());
        assert!(store.list_gangs().expect("gangs").is_empty());
        assert!(store.list_requests().expect("requests").is_empty());
    }
}
