//! Player progression: XP, levels, loot boxes and item use
use chrono::NaiveDate;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::IdMint;
use crate::constants::{
    DEFAULT_PLAYER_NAME, LOOT_REASON_LEVEL_UP, MAX_LEVEL_UPS_PER_GRANT, STARTING_LEVEL,
    STARTING_XP_THRESHOLD, XP_THRESHOLD_GROWTH_DEN, XP_THRESHOLD_GROWTH_NUM,
};
use crate::loot::{ItemEffect, LootItem, LootTable};
use crate::notice::{Notice, Slot, Turn};
use crate::numbers::round_f64_to_u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("XP amount must be finite")]
    NonFiniteXp,
    #[error("XP amount must not be negative")]
    NegativeXp,
    #[error("loot table is empty")]
    EmptyLootTable,
    #[error("item {0} not found in inventory")]
    ItemNotFound(u64),
}

/// A loot item owned by the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub instance_id: u64,
    #[serde(flatten)]
    pub item: LootItem,
}

/// Persisted player record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    #[serde(default = "default_name")]
    pub name: String,
    /// XP earned inside the current level.
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_threshold")]
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub last_visit_date: Option<NaiveDate>,
}

fn default_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

const fn default_level() -> u32 {
    STARTING_LEVEL
}

const fn default_threshold() -> u64 {
    STARTING_XP_THRESHOLD
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            name: default_name(),
            xp: 0,
            level: STARTING_LEVEL,
            xp_to_next_level: STARTING_XP_THRESHOLD,
            inventory: Vec::new(),
            last_visit_date: None,
        }
    }
}

impl PlayerStats {
    /// Replace zeroed level and threshold fields with their starting values.
    pub fn sanitize(&mut self) {
        if self.level == 0 {
            self.level = STARTING_LEVEL;
        }
        if self.xp_to_next_level == 0 {
            self.xp_to_next_level = STARTING_XP_THRESHOLD;
        }
    }

    #[must_use]
    pub fn find_item(&self, instance_id: u64) -> Option<&InventoryItem> {
        self.inventory
            .iter()
            .find(|item| item.instance_id == instance_id)
    }
}

/// Threshold for the level after one with `threshold`.
#[must_use]
pub const fn next_threshold(threshold: u64) -> u64 {
    let grown = threshold.saturating_mul(XP_THRESHOLD_GROWTH_NUM) / XP_THRESHOLD_GROWTH_DEN;
    if grown == 0 { 1 } else { grown }
}

/// Result of a single XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGrant {
    pub levels_gained: u32,
    pub level: u32,
    pub xp: u64,
}

/// Result of using an inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUse {
    NotConsumable,
    Consumed { message: String },
}

/// Owns the player record and applies every change to it.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    stats: PlayerStats,
    table: LootTable,
    rng: ChaCha20Rng,
    ids: IdMint,
}

impl ProgressionEngine {
    #[must_use]
    pub fn new(mut stats: PlayerStats, table: LootTable, rng: ChaCha20Rng) -> Self {
        stats.sanitize();
        let ids = IdMint::seeded(stats.inventory.iter().map(|item| item.instance_id));
        Self {
            stats,
            table,
            rng,
            ids,
        }
    }

    /// Engine over default stats with a seeded RNG.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            PlayerStats::default(),
            LootTable::default(),
            ChaCha20Rng::seed_from_u64(seed),
        )
    }

    #[must_use]
    pub const fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    #[must_use]
    pub const fn loot_table(&self) -> &LootTable {
        &self.table
    }

    pub fn set_loot_table(&mut self, table: LootTable) {
        self.table = table;
    }

    /// Swap in a freshly loaded record, keeping the RNG stream.
    pub fn replace_stats(&mut self, mut stats: PlayerStats) {
        stats.sanitize();
        self.ids = IdMint::seeded(stats.inventory.iter().map(|item| item.instance_id));
        self.stats = stats;
    }

    /// Add XP from an untrusted amount.
    ///
    /// # Errors
    ///
    /// Returns an error without mutating anything if `amount` is non-finite
    /// or negative.
    pub fn add_xp(&mut self, amount: f64, turn: &mut Turn) -> Result<XpGrant, ProgressionError> {
        if !amount.is_finite() {
            warn!("rejected XP grant: {amount} is not finite");
            return Err(ProgressionError::NonFiniteXp);
        }
        let amount = round_f64_to_u64(amount).ok_or_else(|| {
            warn!("rejected XP grant: {amount} is negative");
            ProgressionError::NegativeXp
        })?;
        Ok(self.grant_xp(amount, turn))
    }

    /// Add XP, resolve the full level-up cascade, and draw one loot box if
    /// at least one level was gained.
    pub fn grant_xp(&mut self, amount: u64, turn: &mut Turn) -> XpGrant {
        let before = self.stats.xp;
        self.stats.xp = self.stats.xp.saturating_add(amount);
        debug!("adding {amount} XP: {before} -> {}", self.stats.xp);

        let levels_gained = self.resolve_level_ups(turn);
        turn.touch(Slot::Stats);

        if levels_gained > 0 {
            if let Err(err) = self.open_loot_box(LOOT_REASON_LEVEL_UP, turn) {
                debug!("level-up loot skipped: {err}");
            }
        }

        XpGrant {
            levels_gained,
            level: self.stats.level,
            xp: self.stats.xp,
        }
    }

    fn resolve_level_ups(&mut self, turn: &mut Turn) -> u32 {
        let mut levels = 0;
        while self.stats.xp >= self.stats.xp_to_next_level {
            if levels == MAX_LEVEL_UPS_PER_GRANT {
                warn!(
                    "level-up cascade stopped after {levels} levels with {} XP left",
                    self.stats.xp
                );
                break;
            }
            if self.stats.xp_to_next_level == 0 {
                self.stats.xp_to_next_level = STARTING_XP_THRESHOLD;
                continue;
            }
            self.stats.xp -= self.stats.xp_to_next_level;
            self.stats.level = self.stats.level.saturating_add(1);
            self.stats.xp_to_next_level = next_threshold(self.stats.xp_to_next_level);
            levels += 1;
            info!(
                "level up: now level {} ({} / {} XP)",
                self.stats.level, self.stats.xp, self.stats.xp_to_next_level
            );
            turn.notify(Notice::LevelUp {
                level: self.stats.level,
            });
        }
        levels
    }

    /// Take back XP earned inside the current level.
    ///
    /// XP floors at the start of the current level; earned levels are never
    /// taken back.
    pub fn remove_xp(&mut self, amount: u64, turn: &mut Turn) {
        let before = self.stats.xp;
        self.stats.xp = self.stats.xp.saturating_sub(amount);
        debug!("removing {amount} XP: {before} -> {}", self.stats.xp);
        turn.touch(Slot::Stats);
    }

    /// Draw one item uniformly from the loot table into the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::EmptyLootTable`] when there is nothing to
    /// draw; the inventory is left untouched.
    pub fn open_loot_box(
        &mut self,
        reason: &str,
        turn: &mut Turn,
    ) -> Result<u64, ProgressionError> {
        if self.table.is_empty() {
            warn!("loot box ({reason}) skipped: loot table is empty");
            turn.notify(Notice::error("No items available in the loot table!"));
            return Err(ProgressionError::EmptyLootTable);
        }
        let index = self.rng.gen_range(0..self.table.len());
        let Some(template) = self.table.get(index) else {
            return Err(ProgressionError::EmptyLootTable);
        };
        let item = InventoryItem {
            instance_id: self.ids.next(turn.now_ms()),
            item: template.clone(),
        };
        let instance_id = item.instance_id;
        info!("loot box ({reason}): {} [{instance_id}]", item.item.name);
        turn.notify(Notice::Loot {
            reason: reason.to_string(),
            item: item.item.name.clone(),
        });
        self.stats.inventory.push(item);
        turn.touch(Slot::Stats);
        Ok(instance_id)
    }

    /// Use an inventory item. Consumables apply their effect and are removed;
    /// other items stay in the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::ItemNotFound`] if no item has `instance_id`.
    pub fn use_item(
        &mut self,
        instance_id: u64,
        turn: &mut Turn,
    ) -> Result<ItemUse, ProgressionError> {
        let Some(item) = self.stats.find_item(instance_id).cloned() else {
            warn!("use_item: no inventory item {instance_id}");
            turn.notify(Notice::error("Item not found!"));
            return Err(ProgressionError::ItemNotFound(instance_id));
        };
        let item = item.item;

        if !item.consumable {
            turn.notify(Notice::info(format!(
                "{} is not a consumable item.",
                item.name
            )));
            return Ok(ItemUse::NotConsumable);
        }

        let message = if let Some(effect) = item.effect {
            match effect {
                ItemEffect::GrantXp { amount } => {
                    self.grant_xp(amount, turn);
                }
            }
            let message = effect.message();
            turn.notify(Notice::success(message.clone()));
            message
        } else {
            let message = format!("{} used, but it had no immediate effect.", item.name);
            turn.notify(Notice::info(message.clone()));
            message
        };

        self.stats
            .inventory
            .retain(|owned| owned.instance_id != instance_id);
        debug!("consumed {} [{instance_id}]", item.id);
        turn.touch(Slot::Stats);
        Ok(ItemUse::Consumed { message })
    }

    /// Record the calendar day of the current visit.
    pub fn record_visit(&mut self, today: NaiveDate, turn: &mut Turn) {
        self.stats.last_visit_date = Some(today);
        turn.touch(Slot::Stats);
    }
}
