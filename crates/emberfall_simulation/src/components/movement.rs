//! Movement компоненты: контракт с movement/pathfinding агентом

use bevy::prelude::*;

/// Команда движения для актора (выполняется внешним NavigationAgent)
///
/// Архитектура:
/// - ECS пишет MovementCommand (high-level intent)
/// - Movement collaborator конвертирует в path / velocity
/// - Collaborator сообщает прибытие через NavigationState
///
/// Animation-driven displacement идёт отдельно (`CombatSignal::Displace`).
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте (не обновлять path target)
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3, speed: f32 },
    /// Следовать за entity (обновлять target каждый frame)
    FollowEntity { target: Entity, speed: f32 },
    /// Остановиться немедленно (сбросить velocity)
    Stop,
}

impl MovementCommand {
    pub fn move_to(target: Vec3, speed: f32) -> Self {
        Self::MoveToPosition { target, speed }
    }

    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            MovementCommand::MoveToPosition { .. } | MovementCommand::FollowEntity { .. }
        )
    }
}

/// Состояние навигации (пишет movement collaborator)
///
/// `is_target_reached` - HasArrived() контракта; сбрасывается при новой команде.
#[derive(Component, Default, Clone, Debug)]
pub struct NavigationState {
    pub is_target_reached: bool,
    /// Последний target MoveToPosition (для сброса флага при смене цели)
    pub last_target: Option<Vec3>,
}

impl NavigationState {
    pub fn has_arrived(&self) -> bool {
        self.is_target_reached
    }
}
