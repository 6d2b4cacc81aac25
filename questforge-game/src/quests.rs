//! Quest list, completion toggles and daily streak rollover
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boss::{BossEngine, ProgressSnapshot};
use crate::clock::IdMint;
use crate::constants::{LOOT_REASON_STREAK, QUEST_COMPLETION_XP, STREAK_LOOT_INTERVAL};
use crate::notice::{Slot, Turn};
use crate::progression::ProgressionEngine;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("Please enter a quest title!")]
    EmptyTitle,
}

/// A recurring daily habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default)]
    pub streak: u32,
    pub created_date: DateTime<Utc>,
}

/// What a completion toggle did to its quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Missing,
    Unchanged,
    Completed { streak: u32 },
    Uncompleted { streak: u32 },
}

/// What the daily rollover check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyReset {
    FirstVisit,
    SameDay,
    /// Stored visit date lies after today; nothing is touched.
    Backdated,
    NewDay { days_elapsed: i64 },
}

/// Owns the quest list.
#[derive(Debug, Clone, Default)]
pub struct QuestTracker {
    quests: Vec<Quest>,
    ids: IdMint,
}

impl QuestTracker {
    #[must_use]
    pub fn new(quests: Vec<Quest>) -> Self {
        let ids = IdMint::seeded(quests.iter().map(|quest| quest.id));
        Self { quests, ids }
    }

    #[must_use]
    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    #[must_use]
    pub fn find(&self, quest_id: u64) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == quest_id)
    }

    /// Build a quest from raw form input. Both fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::EmptyTitle`] if the trimmed title is empty.
    pub fn create_quest(
        &mut self,
        title: &str,
        description: &str,
        turn: &Turn,
    ) -> Result<Quest, QuestError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(QuestError::EmptyTitle);
        }
        Ok(Quest {
            id: self.ids.next(turn.now_ms()),
            title: title.to_string(),
            description: description.trim().to_string(),
            completed_today: false,
            streak: 0,
            created_date: turn.now(),
        })
    }

    pub fn add_quest(&mut self, quest: Quest, turn: &mut Turn) {
        debug!("adding quest {} ({})", quest.id, quest.title);
        self.quests.push(quest);
        turn.touch(Slot::Quests);
    }

    /// Quests done today and the best streak across all quests.
    #[must_use]
    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        let completed_today = self
            .quests
            .iter()
            .filter(|quest| quest.completed_today)
            .count();
        ProgressSnapshot {
            completed_today: u32::try_from(completed_today).unwrap_or(u32::MAX),
            longest_streak: self
                .quests
                .iter()
                .map(|quest| quest.streak)
                .max()
                .unwrap_or(0),
        }
    }

    /// Apply a checkbox change to a quest, rewarding or clawing back XP and
    /// forwarding the new aggregates to the boss.
    pub fn handle_completion_toggle(
        &mut self,
        quest_id: u64,
        checked: bool,
        progression: &mut ProgressionEngine,
        boss: &mut BossEngine,
        turn: &mut Turn,
    ) -> Toggle {
        let Some(quest) = self.quests.iter_mut().find(|quest| quest.id == quest_id) else {
            debug!("toggle ignored: no quest {quest_id}");
            return Toggle::Missing;
        };

        let was_completed = quest.completed_today;
        quest.completed_today = checked;
        let toggle = match (was_completed, checked) {
            (false, true) => {
                quest.streak = quest.streak.saturating_add(1);
                let streak = quest.streak;
                debug!("quest {quest_id} completed, streak {streak}");
                progression.grant_xp(QUEST_COMPLETION_XP, turn);
                if streak % STREAK_LOOT_INTERVAL == 0
                    && let Err(err) = progression.open_loot_box(LOOT_REASON_STREAK, turn)
                {
                    debug!("streak loot skipped: {err}");
                }
                Toggle::Completed { streak }
            }
            (true, false) => {
                quest.streak = quest.streak.saturating_sub(1);
                let streak = quest.streak;
                debug!("quest {quest_id} reopened, streak {streak}");
                progression.remove_xp(QUEST_COMPLETION_XP, turn);
                Toggle::Uncompleted { streak }
            }
            _ => Toggle::Unchanged,
        };

        boss.update_progress(self.progress_snapshot(), progression, turn);
        turn.touch(Slot::Quests);
        toggle
    }

    /// Roll quests over to `today`, breaking streaks that lapsed since the
    /// last recorded visit.
    pub fn perform_daily_reset(
        &mut self,
        today: NaiveDate,
        progression: &mut ProgressionEngine,
        turn: &mut Turn,
    ) -> DailyReset {
        let Some(last_visit) = progression.stats().last_visit_date else {
            debug!("first visit recorded on {today}");
            progression.record_visit(today, turn);
            return DailyReset::FirstVisit;
        };
        if last_visit == today {
            return DailyReset::SameDay;
        }
        if last_visit > today {
            debug!("last visit {last_visit} is after today {today}; skipping rollover");
            return DailyReset::Backdated;
        }

        let days_elapsed = (today - last_visit).num_days();
        info!("new day: {days_elapsed} day(s) since {last_visit}");
        for quest in &mut self.quests {
            let lapsed = days_elapsed > 1 || !quest.completed_today;
            if lapsed && quest.streak > 0 {
                debug!("breaking {}-day streak on {}", quest.streak, quest.title);
            }
            if lapsed {
                quest.streak = 0;
            }
            quest.completed_today = false;
        }
        progression.record_visit(today, turn);
        turn.touch(Slot::Quests);
        DailyReset::NewDay { days_elapsed }
    }
}
