//! Immutable transition request (аргумент change_state)

use bevy::prelude::*;

use crate::actions::ActionId;

use super::ActorStateKind;

/// Запрос перехода: что войти, с каким action, в кого, куда.
///
/// Передаётся по значению в `change_state`; state machine хранит read-only
/// копию запроса, с которым вошли в текущее состояние.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionRequest {
    pub state: ActorStateKind,
    pub action: Option<ActionId>,
    pub target: Option<Entity>,
    pub point: Option<Vec3>,
    pub charged: bool,
    /// Единственный способ выйти из Dead
    pub revive: bool,
}

impl TransitionRequest {
    pub fn to(state: ActorStateKind) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn attack(action: ActionId, charged: bool) -> Self {
        Self {
            state: ActorStateKind::Attacking,
            action: Some(action),
            charged,
            ..Default::default()
        }
    }

    pub fn dodge(action: ActionId) -> Self {
        Self {
            state: ActorStateKind::Dodging,
            action: Some(action),
            ..Default::default()
        }
    }

    pub fn ability(action: ActionId, target: Entity) -> Self {
        Self {
            state: ActorStateKind::UsingAbility,
            action: Some(action),
            target: Some(target),
            ..Default::default()
        }
    }

    pub fn move_to(state: ActorStateKind, point: Vec3) -> Self {
        Self {
            state,
            point: Some(point),
            ..Default::default()
        }
    }

    pub fn revive() -> Self {
        Self {
            state: ActorStateKind::Idle,
            revive: true,
            ..Default::default()
        }
    }
}

/// Inbound event: запросить переход для entity (AI, player input, bridge)
#[derive(Event, Debug, Clone)]
pub struct StateChangeRequest {
    pub entity: Entity,
    pub request: TransitionRequest,
}

impl StateChangeRequest {
    pub fn new(entity: Entity, request: TransitionRequest) -> Self {
        Self { entity, request }
    }
}
