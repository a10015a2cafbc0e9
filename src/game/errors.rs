use thiserror::Error;

use crate::game::types::Role;

/// Errors surfaced by the Gang Wars engine.
///
/// Storage wrappers (`Sled`, `Bincode`, `Io`) indicate the persistence layer
/// refused a read or write; retry policy belongs to the caller. Every other
/// variant is a user-correctable validation failure the dispatcher can match
/// on to pick a chat reply.
#[derive(Debug, Error)]
pub enum GangWarsError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Engine was assembled with a configuration that fails validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Amount was zero or negative where a positive amount is required.
    #[error("amount must be positive")]
    InvalidAmount,

    /// Player or gang name failed validation (empty, too long).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A player or gang with that name already exists.
    #[error("name already taken: {0}")]
    NameTaken(String),

    /// Balance (player currency or gang bank) cannot cover the operation.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Operation requires gang membership the player does not have.
    #[error("not in a gang")]
    NotInGang,

    /// Player already belongs to a gang.
    #[error("already in a gang")]
    AlreadyInGang,

    /// Weapon id does not exist in the catalog.
    #[error("unknown weapon: {0}")]
    UnknownWeapon(String),

    /// Weapon is already present in the player's inventory.
    #[error("weapon already owned: {0}")]
    AlreadyOwned(String),

    /// Upgrade target is not in the player's inventory.
    #[error("weapon not owned: {0}")]
    WeaponNotOwned(String),

    /// Weapon is already at the catalog's maximum level.
    #[error("weapon already at max level: {0}")]
    MaxLevelReached(String),

    /// Withdrawal amount is above what the player's role allows per call.
    #[error("withdrawal exceeds the {role} cap of {cap}")]
    WithdrawalCapExceeded { role: Role, cap: i64 },

    /// An identical join request is already outstanding.
    #[error("duplicate join request")]
    DuplicateRequest,

    /// Caller lacks the role or flag the operation requires.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Target was attacked recently and has not retaliated yet.
    #[error("target is on cooldown for another {remaining_secs}s")]
    CooldownActive { remaining_secs: i64 },

    /// Attacker and target are the same entity.
    #[error("cannot attack yourself")]
    SelfAttack,
}
