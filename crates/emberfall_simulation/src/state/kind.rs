//! ActorStateKind + capability flags

use bevy::prelude::*;
use bitflags::bitflags;

/// Взаимоисключающие состояния актора (общие для игрока и AI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum ActorStateKind {
    #[default]
    Idle,
    Locomotion,
    CombatReady,
    Attacking,
    Dodging,
    UsingAbility,
    HitReaction,
    /// Terminal (Fainted для компаньонов); выход только через revive
    Dead,
    /// Возврат монстра к HomePost
    Returning,
}

impl ActorStateKind {
    pub const ALL: [ActorStateKind; 9] = [
        ActorStateKind::Idle,
        ActorStateKind::Locomotion,
        ActorStateKind::CombatReady,
        ActorStateKind::Attacking,
        ActorStateKind::Dodging,
        ActorStateKind::UsingAbility,
        ActorStateKind::HitReaction,
        ActorStateKind::Dead,
        ActorStateKind::Returning,
    ];

    /// Состояния, исполняющие action через timeline
    pub fn runs_action(&self) -> bool {
        matches!(
            self,
            ActorStateKind::Attacking | ActorStateKind::Dodging | ActorStateKind::UsingAbility
        )
    }
}

bitflags! {
    /// Capability flags, выводятся из текущего состояния
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const CAN_MOVE     = 1 << 0;
        const CAN_RUN      = 1 << 1;
        const CAN_ATTACK   = 1 << 2;
        const CAN_INTERACT = 1 << 3;
    }
}

impl Capabilities {
    pub fn can_move(&self) -> bool {
        self.contains(Capabilities::CAN_MOVE)
    }

    pub fn can_run(&self) -> bool {
        self.contains(Capabilities::CAN_RUN)
    }

    pub fn can_attack(&self) -> bool {
        self.contains(Capabilities::CAN_ATTACK)
    }

    pub fn can_interact(&self) -> bool {
        self.contains(Capabilities::CAN_INTERACT)
    }
}
