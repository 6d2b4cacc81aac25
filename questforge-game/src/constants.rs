//! Centralized balance and tuning constants for Questforge progression.
//!
//! These values define the reward math shared by the progression, quest and
//! boss engines. Static content (loot table, boss roster) lives in the JSON
//! assets under `data/`; the numbers that govern how state moves live here.

// Storage keys -------------------------------------------------------------
pub const STATS_KEY: &str = "questforge.stats";
pub const QUESTS_KEY: &str = "questforge.quests";
pub const BOSS_KEY: &str = "questforge.boss";

// Player defaults ----------------------------------------------------------
pub const DEFAULT_PLAYER_NAME: &str = "Hero";
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_XP_THRESHOLD: u64 = 100;

// Level curve: each threshold is floor(previous * 3 / 2).
pub(crate) const XP_THRESHOLD_GROWTH_NUM: u64 = 3;
pub(crate) const XP_THRESHOLD_GROWTH_DEN: u64 = 2;
/// Upper bound on level-ups resolved by a single grant. Guards against
/// corrupted thresholds turning the cascade into an endless loop.
pub(crate) const MAX_LEVEL_UPS_PER_GRANT: u32 = 1_000;

// Quest rewards ------------------------------------------------------------
pub const QUEST_COMPLETION_XP: u64 = 10;
pub const STREAK_LOOT_INTERVAL: u32 = 7;

// Loot reasons -------------------------------------------------------------
pub const LOOT_REASON_LEVEL_UP: &str = "level up";
pub const LOOT_REASON_STREAK: &str = "7-day streak";
pub const LOOT_REASON_BOSS: &str = "boss-defeat";
