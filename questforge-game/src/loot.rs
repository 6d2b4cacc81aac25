//! Static loot table and reward item definitions
use serde::{Deserialize, Serialize};

const DEFAULT_LOOT_DATA: &str = include_str!("../data/loot.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Consumable,
    Cosmetic,
    PassiveBuffPlaceholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

/// Closed set of effects a consumable can apply when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    GrantXp { amount: u64 },
}

impl ItemEffect {
    /// Message shown after the effect resolves.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::GrantXp { amount } => format!("+{amount} XP granted!"),
        }
    }
}

/// Reward template drawn from the loot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub rarity: Rarity,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<ItemEffect>,
}

/// Every item a loot box can produce. Draws are uniform with replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootTable {
    pub items: Vec<LootItem>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self::from_json(DEFAULT_LOOT_DATA).unwrap_or_else(|err| {
            log::warn!("bundled loot table unreadable ({err}); using built-in items");
            Self::builtin()
        })
    }
}

impl LootTable {
    /// Table with no items; every draw against it fails.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Parse a loot table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a loot table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LootItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LootItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn builtin() -> Self {
        let item = |id: &str,
                    name: &str,
                    description: &str,
                    kind: ItemKind,
                    rarity: Rarity,
                    effect: Option<ItemEffect>| LootItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind,
            rarity,
            consumable: effect.is_some(),
            effect,
        };
        Self {
            items: vec![
                item(
                    "scroll_minor_wisdom",
                    "Scroll of Minor Wisdom",
                    "Grants +10 bonus XP when used.",
                    ItemKind::Consumable,
                    Rarity::Common,
                    Some(ItemEffect::GrantXp { amount: 10 }),
                ),
                item(
                    "adventurers_cloak",
                    "Worn Adventurer's Cloak",
                    "A cosmetic cloak for your profile.",
                    ItemKind::Cosmetic,
                    Rarity::Uncommon,
                    None,
                ),
                item(
                    "questing_boots",
                    "Sturdy Questing Boots",
                    "Makes completing quests feel a bit easier.",
                    ItemKind::PassiveBuffPlaceholder,
                    Rarity::Rare,
                    None,
                ),
                item(
                    "ancient_tome",
                    "Ancient Tome of Knowledge",
                    "Grants +25 bonus XP when used.",
                    ItemKind::Consumable,
                    Rarity::Rare,
                    Some(ItemEffect::GrantXp { amount: 25 }),
                ),
                item(
                    "lucky_coin",
                    "Lucky Coin",
                    "A shiny gold coin that brings good fortune.",
                    ItemKind::Cosmetic,
                    Rarity::Uncommon,
                    None,
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_matches_builtin() {
        let bundled = LootTable::from_json(DEFAULT_LOOT_DATA).unwrap();
        assert_eq!(bundled, LootTable::builtin());
        assert_eq!(LootTable::default().len(), 5);
    }

    #[test]
    fn consumables_carry_effects() {
        let table = LootTable::default();
        for item in &table.items {
            assert_eq!(item.consumable, item.effect.is_some(), "{}", item.id);
        }
        let tome = table.find("ancient_tome").unwrap();
        assert_eq!(tome.effect, Some(ItemEffect::GrantXp { amount: 25 }));
        assert_eq!(tome.effect.unwrap().message(), "+25 XP granted!");
    }

    #[test]
    fn empty_table_has_no_items() {
        let table = LootTable::empty();
        assert!(table.is_empty());
        assert!(table.get(0).is_none());
    }
}
