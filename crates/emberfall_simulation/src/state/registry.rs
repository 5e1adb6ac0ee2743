//! StateRegistry: ActorStateKind → handler (strategy table)

use std::collections::HashMap;

use bevy::prelude::*;

use super::handlers::*;
use super::ActorStateKind;

/// Таблица handler'ов, регистрируется один раз при сборке App
#[derive(Resource)]
pub struct StateRegistry {
    handlers: HashMap<ActorStateKind, Box<dyn StateHandler>>,
}

impl StateRegistry {
    /// Пустой реестр (для тестов fallback-логики)
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, state: ActorStateKind, handler: impl StateHandler) -> &mut Self {
        if self.handlers.insert(state, Box::new(handler)).is_some() {
            crate::log_warning(&format!("⚠️ StateRegistry: handler for {:?} replaced", state));
        }
        self
    }

    pub fn unregister(&mut self, state: ActorStateKind) {
        self.handlers.remove(&state);
    }

    pub fn get(&self, state: ActorStateKind) -> Option<&dyn StateHandler> {
        self.handlers.get(&state).map(|handler| handler.as_ref())
    }

    pub fn contains(&self, state: ActorStateKind) -> bool {
        self.handlers.contains_key(&state)
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(ActorStateKind::Idle, IdleState)
            .register(ActorStateKind::Locomotion, LocomotionState)
            .register(ActorStateKind::CombatReady, CombatReadyState)
            .register(ActorStateKind::Attacking, AttackingState)
            .register(ActorStateKind::Dodging, DodgingState)
            .register(ActorStateKind::UsingAbility, UsingAbilityState)
            .register(ActorStateKind::HitReaction, HitReactionState)
            .register(ActorStateKind::Dead, DeadState)
            .register(ActorStateKind::Returning, ReturningState);
        registry
    }
}
