//! Combat Resolver
//!
//! Power is the sum of `weapon.power × level` over every inventory entry
//! that matches a catalog weapon, plus one uniform random jitter per side
//! per resolution. Higher total wins; equal totals draw. The loser hands a
//! fixed fraction of its balance to the winner, so the two-sided total is
//! invariant across any resolution.
//!
//! The cooldown rule protects entities that were attacked more recently than
//! they last attacked anyone: hitting back lifts your own protection.
//!
//! Public attack methods use the wall clock and thread RNG; the `*_at`
//! variants take an explicit `now` and `Rng` so tests drive a simulated
//! clock and zeroed dice.

use chrono::{DateTime, Duration, Utc};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::catalog::WeaponCatalog;
use crate::game::engine::GangWarsEngine;
use crate::game::errors::GangWarsError;
use crate::game::types::{GangRecord, Inventory};
use crate::logutil::escape_log;

/// Outcome of a resolved battle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    /// Decisive result: `spoils` moved from loser to winner.
    Victory {
        winner: String,
        loser: String,
        spoils: i64,
    },
    /// Equal totals. No currency moves, no win is recorded.
    Draw,
}

/// Structured result handed back to the dispatcher for announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombatReport {
    pub attacker: String,
    pub defender: String,
    /// Attacker total including jitter.
    pub attacker_power: i64,
    /// Defender total including jitter.
    pub defender_power: i64,
    pub outcome: CombatOutcome,
}

/// Sum of `power × level` over inventory entries known to the catalog.
/// Entries for weapons that left the catalog contribute nothing.
pub fn weapon_power(inventory: &Inventory, catalog: &WeaponCatalog) -> i64 {
    inventory
        .entries()
        .filter_map(|(id, level)| catalog.get(id).map(|w| w.power * i64::from(level)))
        .sum()
}

/// Time left on an entity's attack protection, if any.
///
/// An entity is protected when it was attacked more recently than it last
/// attacked anyone (an unset `last_attack_at` counts as older) and that
/// attack is still inside the window.
pub fn cooldown_remaining(
    last_attacked_at: Option<DateTime<Utc>>,
    last_attack_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<Duration> {
    let attacked = last_attacked_at?;
    if let Some(attack) = last_attack_at {
        if attack >= attacked {
            return None;
        }
    }
    let elapsed = now.signed_duration_since(attacked);
    if elapsed < window {
        Some(window - elapsed)
    } else {
        None
    }
}

fn roll_jitter(rng: &mut impl Rng, bound: i64) -> i64 {
    if bound <= 0 {
        return 0;
    }
    rng.gen_range(0..bound)
}

fn cooldown_error(remaining: Duration) -> GangWarsError {
    GangWarsError::CooldownActive {
        remaining_secs: remaining.num_seconds().max(1),
    }
}

impl GangWarsEngine {
    /// Resolve a player-vs-player attack at the current time.
    pub fn attack_player(
        &mut self,
        attacker_id: &str,
        target_id: &str,
    ) -> Result<CombatReport, GangWarsError> {
        self.attack_player_at(attacker_id, target_id, Utc::now(), &mut rand::thread_rng())
    }

    /// Player-vs-player resolution with an explicit clock and dice.
    pub fn attack_player_at(
        &mut self,
        attacker_id: &str,
        target_id: &str,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<CombatReport, GangWarsError> {
        if attacker_id == target_id {
            return Err(GangWarsError::SelfAttack);
        }
        let mut attacker = self.store.get_player(attacker_id)?;
        let mut target = self.store.get_player(target_id)?;

        let window = self.config.cooldown_window();
        if let Some(remaining) =
            cooldown_remaining(target.last_attacked_at, target.last_attack_at, now, window)
        {
            return Err(cooldown_error(remaining));
        }

        let jitter = self.config.player_jitter_max;
        let attacker_power = weapon_power(&attacker.inventory, &self.catalog) + roll_jitter(rng, jitter);
        let defender_power = weapon_power(&target.inventory, &self.catalog) + roll_jitter(rng, jitter);

        attacker.last_attack_at = Some(now);
        target.last_attacked_at = Some(now);

        let outcome = if attacker_power > defender_power {
            let spoils = self.config.spoils_for(target.currency);
            target.currency -= spoils;
            attacker.currency += spoils;
            attacker.wins += 1;
            CombatOutcome::Victory {
                winner: attacker.id.clone(),
                loser: target.id.clone(),
                spoils,
            }
        } else if defender_power > attacker_power {
            let spoils = self.config.spoils_for(attacker.currency);
            attacker.currency -= spoils;
            target.currency += spoils;
            target.wins += 1;
            CombatOutcome::Victory {
                winner: target.id.clone(),
                loser: attacker.id.clone(),
                spoils,
            }
        } else {
            CombatOutcome::Draw
        };

        let report = CombatReport {
            attacker: attacker.id.clone(),
            defender: target.id.clone(),
            attacker_power,
            defender_power,
            outcome,
        };
        self.store.put_player(attacker)?;
        self.store.put_player(target)?;
        info!(
            "player combat {} vs {}: {:?}",
            escape_log(attacker_id),
            escape_log(target_id),
            report.outcome
        );
        Ok(report)
    }

    /// Resolve a gang-vs-gang attack at the current time.
    pub fn attack_gang(
        &mut self,
        attacker_gang_id: &str,
        target_gang_id: &str,
    ) -> Result<CombatReport, GangWarsError> {
        self.attack_gang_at(
            attacker_gang_id,
            target_gang_id,
            Utc::now(),
            &mut rand::thread_rng(),
        )
    }

    /// Gang-vs-gang resolution with an explicit clock and dice. Power is
    /// aggregated over every member's inventory; spoils move between banks.
    pub fn attack_gang_at(
        &mut self,
        attacker_gang_id: &str,
        target_gang_id: &str,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<CombatReport, GangWarsError> {
        if attacker_gang_id == target_gang_id {
            return Err(GangWarsError::SelfAttack);
        }
        let mut attacker = self.store.get_gang(attacker_gang_id)?;
        let mut target = self.store.get_gang(target_gang_id)?;

        let window = self.config.cooldown_window();
        if let Some(remaining) =
            cooldown_remaining(target.last_attacked_at, target.last_attack_at, now, window)
        {
            return Err(cooldown_error(remaining));
        }

        let jitter = self.config.gang_jitter_max;
        let attacker_power = self.gang_power(&attacker)? + roll_jitter(rng, jitter);
        let defender_power = self.gang_power(&target)? + roll_jitter(rng, jitter);

        attacker.last_attack_at = Some(now);
        target.last_attacked_at = Some(now);

        let outcome = if attacker_power > defender_power {
            let spoils = self.config.spoils_for(target.bank);
            target.bank -= spoils;
            attacker.bank += spoils;
            attacker.wins += 1;
            CombatOutcome::Victory {
                winner: attacker.id.clone(),
                loser: target.id.clone(),
                spoils,
            }
        } else if defender_power > attacker_power {
            let spoils = self.config.spoils_for(attacker.bank);
            attacker.bank -= spoils;
            target.bank += spoils;
            target.wins += 1;
            CombatOutcome::Victory {
                winner: target.id.clone(),
                loser: attacker.id.clone(),
                spoils,
            }
        } else {
            CombatOutcome::Draw
        };

        let report = CombatReport {
            attacker: attacker.id.clone(),
            defender: target.id.clone(),
            attacker_power,
            defender_power,
            outcome,
        };
        self.store.put_gang(attacker)?;
        self.store.put_gang(target)?;
        info!(
            "gang combat {} vs {}: {:?}",
            escape_log(attacker_gang_id),
            escape_log(target_gang_id),
            report.outcome
        );
        Ok(report)
    }

    /// Aggregate weapon power over a gang's members. A member id that fails
    /// to resolve contributes nothing; storage errors still propagate.
    fn gang_power(&self, gang: &GangRecord) -> Result<i64, GangWarsError> {
        let mut total = 0;
        for member_id in &gang.members {
            if let Some(member) = self.store.lookup_player(member_id)? {
                total += weapon_power(&member.inventory, &self.catalog);
            }
        }
        Ok(total)
    }
}
