//! Player-facing notifications and per-intent bookkeeping.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::numbers::millis_to_u64;

/// A message surfaced to the player as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    LevelUp { level: u32 },
    Loot { reason: String, item: String },
    BossDefeated { boss: String },
    Success { message: String },
    Info { message: String },
    Error { message: String },
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelUp { level } => write!(f, "Level Up! You are now Level {level}!"),
            Self::Loot { reason, item } => write!(f, "{reason}! You found: {item}!"),
            Self::BossDefeated { boss } => write!(f, "Boss Defeated: {boss}!"),
            Self::Success { message } | Self::Info { message } | Self::Error { message } => {
                f.write_str(message)
            }
        }
    }
}

/// Persisted state slot owned by one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Stats,
    Quests,
    Boss,
}

impl Slot {
    pub const ALL: [Self; 3] = [Self::Stats, Self::Quests, Self::Boss];

    /// Key under which the slot's snapshot is stored.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Stats => crate::constants::STATS_KEY,
            Self::Quests => crate::constants::QUESTS_KEY,
            Self::Boss => crate::constants::BOSS_KEY,
        }
    }
}

/// Set of slots touched by an intent; each must be persisted and re-rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SlotSet {
    pub stats: bool,
    pub quests: bool,
    pub boss: bool,
}

impl SlotSet {
    pub const fn insert(&mut self, slot: Slot) {
        match slot {
            Slot::Stats => self.stats = true,
            Slot::Quests => self.quests = true,
            Slot::Boss => self.boss = true,
        }
    }

    #[must_use]
    pub const fn contains(self, slot: Slot) -> bool {
        match slot {
            Slot::Stats => self.stats,
            Slot::Quests => self.quests,
            Slot::Boss => self.boss,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.stats || self.quests || self.boss)
    }

    pub fn iter(self) -> impl Iterator<Item = Slot> {
        Slot::ALL.into_iter().filter(move |slot| self.contains(*slot))
    }
}

/// Context threaded through one intent: the instant it happened, the notices
/// it raised, and the slots it mutated.
#[derive(Debug, Clone)]
pub struct Turn {
    now: DateTime<Utc>,
    notices: Vec<Notice>,
    touched: SlotSet,
}

impl Turn {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            notices: Vec::new(),
            touched: SlotSet {
                stats: false,
                quests: false,
                boss: false,
            },
        }
    }

    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The turn's instant as epoch milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        millis_to_u64(self.now.timestamp_millis())
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub const fn touch(&mut self, slot: Slot) {
        self.touched.insert(slot);
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    #[must_use]
    pub const fn touched(&self) -> SlotSet {
        self.touched
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Notice>, SlotSet) {
        (self.notices, self.touched)
    }
}
