use chrono::{Days, NaiveDate};
use questforge_game::constants::{BOSS_KEY, LOOT_REASON_STREAK, QUESTS_KEY, STATS_KEY};
use questforge_game::{
    Boss, FixedClock, MemoryStore, Notice, PlayerStats, Quest, QuestApp, SnapshotStore,
};

const SEED: u64 = 0x5EED;

fn day(offset: u64) -> FixedClock {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    FixedClock::on(start.checked_add_days(Days::new(offset)).expect("in range"))
}

fn open_on(store: &MemoryStore, offset: u64) -> QuestApp<MemoryStore, FixedClock> {
    let mut app = QuestApp::with_seed(store.clone(), day(offset), SEED + offset);
    app.open();
    app
}

fn loot_reasons(notices: &[Notice]) -> Vec<String> {
    notices
        .iter()
        .filter_map(|notice| match notice {
            Notice::Loot { reason, .. } => Some(reason.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn week_long_streak_pays_out_on_day_seven() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    app.add_quest("Meditate", "");
    let quest_id = app.quests()[0].id;

    let outcome = app.toggle_quest(quest_id, true);
    assert_eq!(app.quests()[0].streak, 1);
    assert_eq!(app.stats().xp, 10);
    assert_eq!(app.boss().tasks()[0].current_progress(), 1);
    assert!(loot_reasons(&outcome.notices).is_empty());

    for offset in 1..=6 {
        let mut app = open_on(&store, offset);
        assert!(!app.quests()[0].completed_today, "day {offset} starts fresh");
        let outcome = app.toggle_quest(quest_id, true);
        let streak = app.quests()[0].streak;
        assert_eq!(u64::from(streak), offset + 1);
        let reasons = loot_reasons(&outcome.notices);
        if streak == 7 {
            assert_eq!(reasons, vec![LOOT_REASON_STREAK.to_string()]);
            assert_eq!(app.stats().inventory.len(), 1);
        } else {
            assert!(reasons.is_empty(), "no loot on streak {streak}");
        }
    }

    let app = open_on(&store, 7);
    assert_eq!(app.stats().xp, 70);
    assert_eq!(app.stats().level, 1);
    // The streak task (target 5) landed; the three-a-day task did not.
    assert_eq!(app.boss().current_hp(), 40);
    assert!(app.boss().tasks()[1].is_complete());
    assert!(!app.boss().tasks()[0].is_complete());
}

#[test]
fn skipped_day_breaks_streak_on_reopen() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    app.add_quest("Run", "");
    app.add_quest("Read", "");
    let run = app.quests()[0].id;
    let read = app.quests()[1].id;
    app.toggle_quest(run, true);
    app.toggle_quest(read, true);

    // Day 1: only "Run" is done.
    let mut app = open_on(&store, 1);
    assert_eq!(app.quests()[0].streak, 1);
    assert_eq!(app.quests()[1].streak, 1);
    app.toggle_quest(run, true);

    // Day 2: "Read" lapsed yesterday.
    let app = open_on(&store, 2);
    assert_eq!(app.quests()[0].streak, 2);
    assert_eq!(app.quests()[1].streak, 0);

    // Day 5: a multi-day gap clears everything.
    let app = open_on(&store, 5);
    assert!(app.quests().iter().all(|quest| quest.streak == 0));
    assert_eq!(app.stats().last_visit_date, Some(day(5).today));
}

#[test]
fn three_completions_in_a_day_and_five_day_streak_defeat_the_boss() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    for title in ["Walk", "Water", "Write"] {
        app.add_quest(title, "");
    }
    let ids: Vec<u64> = app.quests().iter().map(|quest| quest.id).collect();

    for offset in 0..5 {
        let mut app = open_on(&store, offset);
        for id in &ids {
            app.toggle_quest(*id, true);
        }
    }

    let app = open_on(&store, 5);
    let boss = app.boss();
    assert_eq!(boss.current_hp(), 0);
    assert!(boss.is_defeated());
    // 15 completions (150 XP) plus the 200 XP boss reward.
    // 350 XP: level 2 at 100, level 3 at 250; 100 of 225 remains.
    assert_eq!(app.stats().level, 3);
    assert_eq!(app.stats().xp, 100);

    let stored: Boss = serde_json::from_str(&store.raw(BOSS_KEY).expect("boss saved")).unwrap();
    assert!(stored.is_defeated());
}

#[test]
fn boss_reward_is_granted_once() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    for title in ["a", "b", "c"] {
        app.add_quest(title, "");
    }
    let ids: Vec<u64> = app.quests().iter().map(|quest| quest.id).collect();

    let mut defeats = 0;
    for offset in 0..6 {
        let mut app = open_on(&store, offset);
        for id in &ids {
            let outcome = app.toggle_quest(*id, true);
            defeats += outcome
                .notices
                .iter()
                .filter(|notice| matches!(notice, Notice::BossDefeated { .. }))
                .count();
            // Re-sending the same checkbox state changes nothing.
            let repeat = app.toggle_quest(*id, true);
            assert!(!repeat.refreshed.stats);
            assert!(!repeat.refreshed.boss);
        }
    }
    assert_eq!(defeats, 1);
}

#[test]
fn uncheck_reverses_within_level() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    app.add_quest("Floss", "");
    let id = app.quests()[0].id;
    let before = (app.stats().xp, app.quests()[0].streak);
    app.toggle_quest(id, true);
    let outcome = app.toggle_quest(id, false);
    assert_eq!((app.stats().xp, app.quests()[0].streak), before);
    assert!(outcome.refreshed.stats && outcome.refreshed.quests);
}

#[test]
fn consuming_loot_from_a_level_up() {
    let store = MemoryStore::new();
    let stats = PlayerStats {
        xp: 95,
        ..PlayerStats::default()
    };
    store
        .save(STATS_KEY, &serde_json::to_string(&stats).unwrap())
        .unwrap();
    let mut app = open_on(&store, 0);
    app.add_quest("Stretch", "");
    let id = app.quests()[0].id;
    let outcome = app.toggle_quest(id, true);

    assert_eq!(app.stats().level, 2);
    assert_eq!(app.stats().xp, 5);
    assert_eq!(app.stats().xp_to_next_level, 150);
    assert_eq!(loot_reasons(&outcome.notices), vec!["level up".to_string()]);
    assert!(
        outcome
            .notices
            .iter()
            .any(|notice| matches!(notice, Notice::LevelUp { level: 2 }))
    );

    let item = app.stats().inventory[0].clone();
    let outcome = app.use_item(item.instance_id);
    if item.item.consumable {
        assert!(app.stats().inventory.is_empty());
        assert!(app.stats().xp > 5);
    } else {
        assert_eq!(app.stats().inventory.len(), 1);
        assert_eq!(
            outcome.notices[0].to_string(),
            format!("{} is not a consumable item.", item.item.name)
        );
    }

    let missing = app.use_item(1);
    assert!(missing.notices[0].is_error());
    assert!(missing.refreshed.is_empty());
}

#[test]
fn empty_title_is_rejected_without_mutation() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    let outcome = app.add_quest("   ", "desc");
    assert!(app.quests().is_empty());
    assert_eq!(outcome.notices[0].to_string(), "Please enter a quest title!");
    assert!(outcome.refreshed.is_empty());
    assert!(store.raw(QUESTS_KEY).is_none());
}

#[test]
fn snapshots_use_readable_json() {
    let store = MemoryStore::new();
    let mut app = open_on(&store, 0);
    app.add_quest("Journal", "one line");
    let raw = store.raw(QUESTS_KEY).expect("quests saved");
    let quests: Vec<Quest> = serde_json::from_str(&raw).unwrap();
    assert_eq!(quests[0].title, "Journal");
    assert!(raw.contains("\"completedToday\":false"));
    let stats_raw = store.raw(STATS_KEY).expect("stats saved on first visit");
    assert!(stats_raw.contains("\"lastVisitDate\":\"2024-01-01\""));
}
