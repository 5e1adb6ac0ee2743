//! ActionLoadout: какие action'ы доступны актору

use bevy::prelude::*;

use super::{ActionId, ActionTable};

/// Игрок: цепочка комбо + dodge. AI: abilities.
#[derive(Component, Debug, Clone, Default)]
pub struct ActionLoadout {
    /// Удары в порядке комбо (index = шаг)
    pub combo_chain: Vec<ActionId>,
    /// Dodge (он же dodge-cancel из combo окна)
    pub dodge: Option<ActionId>,
    pub abilities: Vec<ActionId>,
}

impl ActionLoadout {
    /// Шаги сортируются по combo_index из таблицы
    pub fn weapon(table: &ActionTable, steps: &[&str], dodge: Option<&str>) -> Self {
        let ids: Vec<ActionId> = steps.iter().map(|s| ActionId::from(*s)).collect();
        Self {
            combo_chain: table.combo_chain(&ids),
            dodge: dodge.map(ActionId::from),
            abilities: Vec::new(),
        }
    }

    pub fn abilities(ids: &[&str]) -> Self {
        Self {
            abilities: ids.iter().map(|s| ActionId::from(*s)).collect(),
            ..default()
        }
    }

    pub fn opener(&self) -> Option<&ActionId> {
        self.combo_chain.first()
    }

    /// Следующий шаг после `index` (None = конец цепочки)
    pub fn next_combo_step(&self, index: usize) -> Option<&ActionId> {
        self.combo_chain.get(index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_navigation() {
        let table = ActionTable::builtin().unwrap();
        let loadout = ActionLoadout::weapon(
            &table,
            &["sword_3", "sword_1", "sword_2"],
            Some("dodge_roll"),
        );

        assert_eq!(loadout.opener(), Some(&ActionId::from("sword_1")));
        assert_eq!(loadout.next_combo_step(0), Some(&ActionId::from("sword_2")));
        assert_eq!(loadout.next_combo_step(1), Some(&ActionId::from("sword_3")));
        assert_eq!(loadout.next_combo_step(2), None);
        assert_eq!(loadout.dodge, Some(ActionId::from("dodge_roll")));
    }
}
