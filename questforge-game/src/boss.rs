//! Boss encounter: threshold tasks that chip away boss HP
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::LOOT_REASON_BOSS;
use crate::notice::{Notice, Slot, Turn};
use crate::progression::ProgressionEngine;

const DEFAULT_BOSS_DATA: &str = include_str!("../data/boss.json");

/// Live aggregate a boss task is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMetric {
    CompletedToday,
    LongestStreak,
}

/// Quest-tracker aggregates forwarded to the boss after every toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed_today: u32,
    pub longest_streak: u32,
}

impl ProgressSnapshot {
    #[must_use]
    pub const fn value(self, metric: TaskMetric) -> u32 {
        match metric {
            TaskMetric::CompletedToday => self.completed_today,
            TaskMetric::LongestStreak => self.longest_streak,
        }
    }
}

/// Lifecycle of a boss task. Only `Pending -> Complete` exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Pending,
    Complete,
}

impl TaskState {
    /// Move to `Complete`. Returns `true` only on the first call.
    fn complete(&mut self) -> bool {
        match self {
            Self::Pending => {
                *self = Self::Complete;
                true
            }
            Self::Complete => false,
        }
    }
}

/// Lifecycle of the boss. Only `Active -> Defeated` exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossStatus {
    #[default]
    Active,
    Defeated,
}

impl BossStatus {
    /// Move to `Defeated`. Returns `true` only on the first call.
    fn defeat(&mut self) -> bool {
        match self {
            Self::Active => {
                *self = Self::Defeated;
                true
            }
            Self::Defeated => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossTask {
    pub id: String,
    pub description: String,
    pub metric: TaskMetric,
    pub target: u32,
    #[serde(default)]
    current_progress: u32,
    #[serde(default)]
    state: TaskState,
    pub damage: u32,
}

impl BossTask {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        metric: TaskMetric,
        target: u32,
        damage: u32,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            metric,
            target,
            current_progress: 0,
            state: TaskState::Pending,
            damage,
        }
    }

    #[must_use]
    pub const fn current_progress(&self) -> u32 {
        self.current_progress
    }

    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.state, TaskState::Complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossReward {
    pub xp: u64,
    #[serde(default)]
    pub grants_loot_box: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub name: String,
    pub max_hp: u32,
    current_hp: u32,
    #[serde(default)]
    status: BossStatus,
    tasks: Vec<BossTask>,
    pub reward: BossReward,
}

impl Default for Boss {
    fn default() -> Self {
        Self::from_json(DEFAULT_BOSS_DATA).unwrap_or_else(|err| {
            warn!("bundled boss data unreadable ({err}); using built-in boss");
            Self::new(
                "The Procrastination Hydra",
                100,
                vec![
                    BossTask::new(
                        "task1",
                        "Complete 3 daily quests in one day",
                        TaskMetric::CompletedToday,
                        3,
                        40,
                    ),
                    BossTask::new(
                        "task2",
                        "Achieve a 5-day streak on any quest",
                        TaskMetric::LongestStreak,
                        5,
                        60,
                    ),
                ],
                BossReward {
                    xp: 200,
                    grants_loot_box: true,
                },
            )
        })
    }
}

impl Boss {
    /// Fresh boss at full HP with every task pending.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        max_hp: u32,
        tasks: Vec<BossTask>,
        reward: BossReward,
    ) -> Self {
        Self {
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            status: BossStatus::Active,
            tasks,
            reward,
        }
    }

    /// Parse a boss definition or snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a boss.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut boss: Self = serde_json::from_str(json)?;
        boss.sanitize();
        Ok(boss)
    }

    /// Clamp HP loaded from a snapshot into `0..=max_hp`.
    pub fn sanitize(&mut self) {
        self.current_hp = self.current_hp.min(self.max_hp);
    }

    #[must_use]
    pub const fn current_hp(&self) -> u32 {
        self.current_hp
    }

    #[must_use]
    pub const fn status(&self) -> BossStatus {
        self.status
    }

    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        matches!(self.status, BossStatus::Defeated)
    }

    #[must_use]
    pub fn tasks(&self) -> &[BossTask] {
        &self.tasks
    }
}

/// Result of feeding fresh aggregates to the boss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossUpdate {
    pub changed: bool,
    pub damage_dealt: u32,
    pub defeated_now: bool,
}

/// Owns the boss and applies task progress, damage and defeat rewards.
#[derive(Debug, Clone, Default)]
pub struct BossEngine {
    boss: Boss,
}

impl BossEngine {
    #[must_use]
    pub const fn new(boss: Boss) -> Self {
        Self { boss }
    }

    #[must_use]
    pub const fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn replace_boss(&mut self, mut boss: Boss) {
        boss.sanitize();
        self.boss = boss;
    }

    /// Mirror the aggregates into each task, deal damage for tasks that just
    /// reached their target, and pay out the reward if HP hits zero.
    ///
    /// The boss slot is only touched when something actually changed.
    pub fn update_progress(
        &mut self,
        snapshot: ProgressSnapshot,
        progression: &mut ProgressionEngine,
        turn: &mut Turn,
    ) -> BossUpdate {
        let mut update = BossUpdate::default();

        for task in &mut self.boss.tasks {
            let value = snapshot.value(task.metric);
            if task.current_progress != value {
                task.current_progress = value;
                update.changed = true;
            }
            if value >= task.target && task.state.complete() {
                let before = self.boss.current_hp;
                self.boss.current_hp = before.saturating_sub(task.damage);
                update.damage_dealt = update.damage_dealt.saturating_add(task.damage);
                update.changed = true;
                debug!(
                    "boss task {} complete: HP {before} -> {}",
                    task.id, self.boss.current_hp
                );
            }
        }

        if self.boss.current_hp == 0 && self.boss.status.defeat() {
            update.changed = true;
            update.defeated_now = true;
            info!("boss defeated: {}", self.boss.name);
            turn.notify(Notice::BossDefeated {
                boss: self.boss.name.clone(),
            });
            progression.grant_xp(self.boss.reward.xp, turn);
            if self.boss.reward.grants_loot_box
                && let Err(err) = progression.open_loot_box(LOOT_REASON_BOSS, turn)
            {
                debug!("boss reward loot skipped: {err}");
            }
        }

        if update.changed {
            turn.touch(Slot::Boss);
        }
        update
    }
}
