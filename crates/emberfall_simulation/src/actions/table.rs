//! ActionTable: read-only таблица action'ов, общая для всех акторов

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

use super::{ActionDefinition, ActionId};
use crate::error::CombatError;

/// Встроенная таблица (оружие, dodge, abilities монстров и компаньона)
pub const DEFAULT_ACTIONS_RON: &str = include_str!("../../data/actions.ron");

/// Неизменяема после загрузки. Runtime состояние (cooldowns, combo) живёт
/// на акторах.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActionTable {
    actions: HashMap<ActionId, Arc<ActionDefinition>>,
}

impl ActionTable {
    /// Валидирует каждый definition, дубликаты id - ошибка
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ActionDefinition>,
    ) -> Result<Self, CombatError> {
        let mut actions = HashMap::new();

        for definition in definitions {
            definition.validate()?;

            let id = definition.id.clone();
            if actions.insert(id.clone(), Arc::new(definition)).is_some() {
                return Err(CombatError::DuplicateAction(id));
            }
        }

        Ok(Self { actions })
    }

    /// RON список [`ActionDefinition`]
    pub fn from_ron(source: &str) -> Result<Self, CombatError> {
        let definitions: Vec<ActionDefinition> = ron::from_str(source)?;
        Self::from_definitions(definitions)
    }

    pub fn builtin() -> Result<Self, CombatError> {
        Self::from_ron(DEFAULT_ACTIONS_RON)
    }

    pub fn get(&self, id: &ActionId) -> Result<Arc<ActionDefinition>, CombatError> {
        self.actions
            .get(id)
            .cloned()
            .ok_or_else(|| CombatError::UnknownAction(id.clone()))
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.actions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Сортирует `ids` по combo_index (неизвестные id - в лог и мимо)
    pub fn combo_chain(&self, ids: &[ActionId]) -> Vec<ActionId> {
        let mut steps: Vec<(u32, ActionId)> = Vec::with_capacity(ids.len());

        for id in ids {
            match self.get(id) {
                Ok(definition) => steps.push((definition.combo_index, id.clone())),
                Err(err) => crate::log_warning(&format!(
                    "⚠️ combo chain: skipping step ({}): {}",
                    err.severity().as_str(),
                    err
                )),
            }
        }

        steps.sort_by_key(|(index, _)| *index);
        steps.into_iter().map(|(_, id)| id).collect()
    }
}
