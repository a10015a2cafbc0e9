//! # Gangwars - Gang Economy & Combat Engine for Chat Bots
//!
//! Gangwars is the in-chat "Gang Wars" game engine used by streaming companion
//! bots. It owns player and gang registration, a shared-currency economy, a
//! weapon catalog with leveling, and cooldown-gated combat resolution between
//! players and between gangs.
//!
//! The engine is deliberately small in surface: a chat-command dispatcher
//! resolves human-readable targets to records, calls one operation per verb,
//! and renders the structured result (or typed failure) back to chat. Parsing,
//! announcements, and presentation settings such as the currency display name
//! live in that dispatcher, not here.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gangwars::game::GangWarsEngine;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut engine = GangWarsEngine::open("data/gangwars")?;
//!
//!     engine.register("twitch:1001", "StreamFan", false)?;
//!     engine.buy_weapon("twitch:1001", "pistol")?;
//!     let report = engine.attack_player("twitch:1001", "twitch:1002")?;
//!     println!("outcome: {:?}", report.outcome);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - The engine itself: records, storage, registries, economy,
//!   shop, combat, and admin operations
//! - [`config`] - Engine tuning knobs (starting grant, cooldowns, jitter)
//! - [`logutil`] - Log sanitization for chat-supplied names
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Dispatcher    │ ← Chat command parsing (external)
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │ GangWarsEngine  │ ← Registries, economy, shop, combat, admin
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GangStore     │ ← Sled-backed persistence
//! └─────────────────┘
//! ```

pub mod config;
pub mod game;
pub mod logutil;
