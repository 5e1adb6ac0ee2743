//! Combat events: inbound contracts + outbound signals
//!
//! Inbound (движок / bridge → core):
//! - PlayerIntent, StateChangeRequest (в своих модулях)
//! - HitVolumeOverlap: физика сообщила пересечение активного hit volume
//! - DamageEvent (combat::damage), ReviveActor
//!
//! Outbound (core → движок / telemetry): CombatSignal.
//! Системы копят сигналы в SignalOutbox, flush_signals публикует их одним
//! батчем в конце тика в порядке появления.

use bevy::prelude::*;

use crate::actions::{ActionId, HitVolumeTag};
use crate::state::ActorStateKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Sound,
    Particle,
}

/// Outbound сигнал для движка (анимации, эффекты, физика, UI)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatSignal {
    StateEntered {
        entity: Entity,
        state: ActorStateKind,
    },
    AbilityUsed {
        entity: Entity,
        action: ActionId,
        target: Option<Entity>,
    },
    TargetHit {
        attacker: Entity,
        target: Entity,
        amount: u32,
        is_critical: bool,
    },
    HitVolume {
        entity: Entity,
        tag: HitVolumeTag,
        enabled: bool,
    },
    TurnLock {
        entity: Entity,
        locked: bool,
    },
    SuperArmor {
        entity: Entity,
        active: bool,
    },
    PlayEffect {
        entity: Entity,
        kind: EffectKind,
        cue: String,
    },
    PlayAnimation {
        entity: Entity,
        clip: String,
    },
    /// Animation-driven displacement за кадр (world space, y = 0)
    Displace {
        entity: Entity,
        delta: Vec3,
    },
}

impl CombatSignal {
    pub fn entity(&self) -> Entity {
        match self {
            CombatSignal::StateEntered { entity, .. }
            | CombatSignal::AbilityUsed { entity, .. }
            | CombatSignal::HitVolume { entity, .. }
            | CombatSignal::TurnLock { entity, .. }
            | CombatSignal::SuperArmor { entity, .. }
            | CombatSignal::PlayEffect { entity, .. }
            | CombatSignal::PlayAnimation { entity, .. }
            | CombatSignal::Displace { entity, .. } => *entity,
            CombatSignal::TargetHit { attacker, .. } => *attacker,
        }
    }
}

/// Накопитель сигналов текущего тика
#[derive(Resource, Debug, Default)]
pub struct SignalOutbox {
    pub signals: Vec<CombatSignal>,
}

/// Физика: hit volume `volume` атакующего пересёкся с `target`
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitVolumeOverlap {
    pub attacker: Entity,
    pub volume: HitVolumeTag,
    pub target: Entity,
}

/// Recycling мёртвого актора (Idle, полное здоровье)
#[derive(Event, Debug, Clone, Copy)]
pub struct ReviveActor {
    pub entity: Entity,
}

/// Публикует накопленные сигналы (последний шаг тика)
pub fn flush_signals(mut outbox: ResMut<SignalOutbox>, mut signals: EventWriter<CombatSignal>) {
    if outbox.signals.is_empty() {
        return;
    }

    for signal in outbox.signals.drain(..) {
        if let CombatSignal::StateEntered { entity, state } = &signal {
            crate::log(&format!("🔄 {:?} → {:?}", entity, state));
        }
        signals.write(signal);
    }
}
