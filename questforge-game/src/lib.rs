//! Questforge Game Engine
//!
//! Platform-agnostic progression logic for the Questforge habit tracker:
//! daily quests with streaks, XP and levels, loot boxes, and a boss that takes
//! damage as quest milestones are hit. Rendering and storage mechanics are left
//! to the front end, which plugs in through [`SnapshotStore`] and [`Clock`].

pub mod boss;
pub mod clock;
pub mod constants;
pub mod loot;
pub mod notice;
pub mod numbers;
pub mod progression;
pub mod quests;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use boss::{
    Boss, BossEngine, BossReward, BossStatus, BossTask, BossUpdate, ProgressSnapshot, TaskMetric,
    TaskState,
};
pub use clock::{Clock, FixedClock, IdMint, SystemClock};
pub use loot::{ItemEffect, ItemKind, LootItem, LootTable, Rarity};
pub use notice::{Notice, Slot, SlotSet, Turn};
pub use progression::{
    InventoryItem, ItemUse, PlayerStats, ProgressionEngine, ProgressionError, XpGrant,
};
pub use quests::{DailyReset, Quest, QuestError, QuestTracker, Toggle};
pub use session::{IntentOutcome, QuestApp};
pub use storage::MemoryStore;

/// Trait for abstracting snapshot persistence.
/// Each front end supplies its own backing store.
///
/// Each slot is a self-contained string snapshot, rewritten wholesale on every
/// change.
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be deleted.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}
