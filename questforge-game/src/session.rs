//! Session wiring: loads the three slots, dispatches player intents across the
//! engines, and writes back every slot an intent touched.
use anyhow::Context;
use log::{error, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::boss::{Boss, BossEngine};
use crate::clock::Clock;
use crate::loot::LootTable;
use crate::notice::{Notice, Slot, SlotSet, Turn};
use crate::progression::{PlayerStats, ProgressionEngine};
use crate::quests::{Quest, QuestTracker};
use crate::SnapshotStore;

/// Notices raised by an intent and the slots that were persisted and need
/// re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntentOutcome {
    pub notices: Vec<Notice>,
    pub refreshed: SlotSet,
}

/// One player's running app: the three engines plus the store and clock they
/// persist and tell time through.
pub struct QuestApp<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    store: S,
    clock: C,
    progression: ProgressionEngine,
    tracker: QuestTracker,
    boss: BossEngine,
}

impl<S, C> QuestApp<S, C>
where
    S: SnapshotStore,
    C: Clock,
{
    /// Create an app over default state. Call [`QuestApp::open`] to load
    /// saved slots.
    pub fn new(store: S, clock: C, rng: ChaCha20Rng) -> Self {
        Self {
            store,
            clock,
            progression: ProgressionEngine::new(PlayerStats::default(), LootTable::default(), rng),
            tracker: QuestTracker::default(),
            boss: BossEngine::default(),
        }
    }

    /// Create an app whose loot draws are reproducible from `seed`.
    pub fn with_seed(store: S, clock: C, seed: u64) -> Self {
        Self::new(store, clock, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Create an app seeded from OS entropy.
    pub fn from_entropy(store: S, clock: C) -> Self {
        Self::new(store, clock, ChaCha20Rng::from_entropy())
    }

    /// Replace the loot table draws are made from.
    #[must_use]
    pub fn with_loot_table(mut self, table: LootTable) -> Self {
        self.progression.set_loot_table(table);
        self
    }

    #[must_use]
    pub fn stats(&self) -> &PlayerStats {
        self.progression.stats()
    }

    #[must_use]
    pub fn quests(&self) -> &[Quest] {
        self.tracker.quests()
    }

    #[must_use]
    pub fn boss(&self) -> &Boss {
        self.boss.boss()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open-app intent: load every slot, falling back to defaults per slot,
    /// then run the daily rollover check.
    pub fn open(&mut self) -> IntentOutcome {
        let stats = self.read_slot::<PlayerStats>(Slot::Stats).unwrap_or_default();
        self.progression.replace_stats(stats);
        let quests = self.read_slot::<Vec<Quest>>(Slot::Quests).unwrap_or_default();
        self.tracker = QuestTracker::new(quests);
        let boss = self.read_slot::<Boss>(Slot::Boss).unwrap_or_default();
        self.boss.replace_boss(boss);

        let mut turn = self.turn();
        let today = self.clock.today();
        self.tracker
            .perform_daily_reset(today, &mut self.progression, &mut turn);
        self.finish(turn)
    }

    /// Add-quest intent.
    pub fn add_quest(&mut self, title: &str, description: &str) -> IntentOutcome {
        let mut turn = self.turn();
        match self.tracker.create_quest(title, description, &turn) {
            Ok(quest) => self.tracker.add_quest(quest, &mut turn),
            Err(err) => {
                warn!("add_quest rejected: {err}");
                turn.notify(Notice::error(err.to_string()));
            }
        }
        self.finish(turn)
    }

    /// Toggle-quest-completion intent.
    pub fn toggle_quest(&mut self, quest_id: u64, checked: bool) -> IntentOutcome {
        let mut turn = self.turn();
        self.tracker.handle_completion_toggle(
            quest_id,
            checked,
            &mut self.progression,
            &mut self.boss,
            &mut turn,
        );
        self.finish(turn)
    }

    /// Use-item intent.
    pub fn use_item(&mut self, instance_id: u64) -> IntentOutcome {
        let mut turn = self.turn();
        if let Err(err) = self.progression.use_item(instance_id, &mut turn) {
            warn!("use_item failed: {err}");
        }
        self.finish(turn)
    }

    fn turn(&self) -> Turn {
        Turn::new(self.clock.now())
    }

    fn finish(&self, turn: Turn) -> IntentOutcome {
        let (notices, refreshed) = turn.into_parts();
        for slot in refreshed.iter() {
            if let Err(err) = self.write_slot(slot) {
                error!("failed to save {}: {err:#}", slot.key());
            }
        }
        IntentOutcome { notices, refreshed }
    }

    fn read_slot<T: DeserializeOwned>(&self, slot: Slot) -> Option<T> {
        match self.try_read_slot(slot) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to load {}, using defaults: {err:#}", slot.key());
                None
            }
        }
    }

    fn try_read_slot<T: DeserializeOwned>(&self, slot: Slot) -> anyhow::Result<Option<T>> {
        let Some(raw) = self
            .store
            .load(slot.key())
            .map_err(anyhow::Error::new)
            .context("reading store")?
        else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).context("parsing snapshot")?;
        Ok(Some(value))
    }

    fn write_slot(&self, slot: Slot) -> anyhow::Result<()> {
        let json = match slot {
            Slot::Stats => serde_json::to_string(self.progression.stats()),
            Slot::Quests => serde_json::to_string(self.tracker.quests()),
            Slot::Boss => serde_json::to_string(self.boss.boss()),
        }
        .context("serializing snapshot")?;
        self.store
            .save(slot.key(), &json)
            .map_err(anyhow::Error::new)
            .context("writing store")
    }
}
