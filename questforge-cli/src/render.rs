use colored::Colorize;
use serde::Serialize;

use questforge_game::numbers::{percent_of, round_f64_to_u64, u64_to_f64};
use questforge_game::{Boss, Notice, PlayerStats, Quest, SlotSet};

const BAR_WIDTH: u64 = 20;

/// Everything one invocation produced, in the shape `--json` prints.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub notices: &'a [Notice],
    pub refreshed: SlotSet,
    pub stats: &'a PlayerStats,
    pub quests: &'a [Quest],
    pub boss: &'a Boss,
}

impl Report<'_> {
    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            print_notices(self.notices);
            print_stats(self.stats);
            print_quests(self.quests);
            print_boss(self.boss);
        }
        Ok(())
    }
}

fn bar(part: u64, whole: u64) -> String {
    let filled = round_f64_to_u64(percent_of(part, whole) * u64_to_f64(BAR_WIDTH) / 100.0)
        .unwrap_or(0)
        .min(BAR_WIDTH);
    let filled = usize::try_from(filled).unwrap_or_default();
    let empty = usize::try_from(BAR_WIDTH).unwrap_or_default() - filled;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(empty))
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let line = notice.to_string();
        let styled = match notice {
            Notice::LevelUp { .. } => format!("⬆️  {line}").bright_yellow().bold(),
            Notice::Loot { .. } => format!("🎁 {line}").bright_magenta(),
            Notice::BossDefeated { .. } => format!("🏆 {line}").bright_green().bold(),
            Notice::Success { .. } => format!("✅ {line}").green(),
            Notice::Info { .. } => format!("ℹ️  {line}").cyan(),
            Notice::Error { .. } => format!("❌ {line}").red(),
        };
        println!("{styled}");
    }
    if !notices.is_empty() {
        println!();
    }
}

fn print_stats(stats: &PlayerStats) {
    println!(
        "{} {}",
        format!("🛡️  {}", stats.name).bright_cyan().bold(),
        format!("Level {}", stats.level).bold()
    );
    println!(
        "   XP {} {}/{}",
        bar(stats.xp, stats.xp_to_next_level).yellow(),
        stats.xp,
        stats.xp_to_next_level
    );
    if stats.inventory.is_empty() {
        println!("   Inventory: {}", "empty".dimmed());
        return;
    }
    println!("   Inventory:");
    for entry in &stats.inventory {
        let tag = if entry.item.consumable {
            " (usable)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "     {} {} [{:?}]{tag}",
            entry.instance_id.to_string().dimmed(),
            entry.item.name,
            entry.item.rarity
        );
    }
}

fn print_quests(quests: &[Quest]) {
    println!();
    if quests.is_empty() {
        println!("📜 No quests yet. Add one with `questforge add <TITLE>`.");
        return;
    }
    println!("{}", "📜 Quests".bold());
    for quest in quests {
        let mark = if quest.completed_today {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let streak = if quest.streak > 0 {
            format!("  🔥 {}", quest.streak).bright_red().to_string()
        } else {
            String::new()
        };
        println!(
            "   {mark} {} {}{streak}",
            quest.id.to_string().dimmed(),
            quest.title
        );
        if !quest.description.is_empty() {
            println!("       {}", quest.description.dimmed());
        }
    }
}

fn print_boss(boss: &Boss) {
    println!();
    let hp = u64::from(boss.current_hp());
    let max = u64::from(boss.max_hp);
    let title = if boss.is_defeated() {
        format!("🐉 {} (defeated)", boss.name).green().bold()
    } else {
        format!("🐉 {}", boss.name).red().bold()
    };
    println!("{title}");
    println!("   HP {} {hp}/{max}", bar(hp, max).red());
    for task in boss.tasks() {
        let mark = if task.is_complete() {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!(
            "   {mark} {} ({}/{}, {} dmg)",
            task.description,
            task.current_progress(),
            task.target,
            task.damage
        );
    }
}
