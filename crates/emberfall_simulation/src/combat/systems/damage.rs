//! Damage application + death + heals

use bevy::prelude::*;

use crate::actions::ActionTable;
use crate::combat::{DamageDealt, DamageEvent, EntityDied, HealEvent};
use crate::components::Health;
use crate::config::CombatTuning;
use crate::events::{CombatSignal, SignalOutbox};
use crate::state::{ActorCombat, ActorStateKind, ActorStateMachine, StateRegistry, TransitionRequest};

/// System: DamageEvent → Health → Hit-Reaction / super armor / Dead
///
/// - Dead цель: no-op
/// - health дошло до 0 → Dead на этом же тике, EntityDied один раз
/// - super armor окно открыто → урон есть, прерывания нет
pub fn receive_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut actors: Query<ActorCombat>,
    registry: Res<StateRegistry>,
    table: Res<ActionTable>,
    tuning: Res<CombatTuning>,
    mut outbox: ResMut<SignalOutbox>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    let signals = &mut outbox.signals;

    for event in damage_events.read() {
        let Ok(mut actor) = actors.get_mut(event.target) else {
            continue;
        };

        if actor.machine.is_dead() || !actor.health.is_alive() {
            crate::log(&format!("🪦 {:?} is dead, damage ignored", event.target));
            continue;
        }

        let applied = actor.health.take_damage(event.amount);
        let remaining = actor.health.current;

        signals.push(CombatSignal::TargetHit {
            attacker: event.attacker,
            target: event.target,
            amount: applied,
            is_critical: event.is_critical,
        });
        dealt_events.write(DamageDealt {
            attacker: event.attacker,
            target: event.target,
            damage: applied,
            is_critical: event.is_critical,
            remaining_health: remaining,
        });

        if remaining == 0 {
            actor.transition(
                &registry,
                &table,
                &tuning,
                signals,
                TransitionRequest::to(ActorStateKind::Dead),
            );
            died_events.write(EntityDied {
                entity: event.target,
                killer: Some(event.attacker),
            });
            crate::log_info(&format!("💀 {:?} killed by {:?}", event.target, event.attacker));
        } else if actor.execution.super_armor() {
            crate::log(&format!(
                "🛡️ {:?} super armor: {} dmg, no interrupt ({}/{})",
                event.target, applied, remaining, actor.health.max
            ));
        } else {
            actor.transition(
                &registry,
                &table,
                &tuning,
                signals,
                TransitionRequest::to(ActorStateKind::HitReaction),
            );
        }
    }
}

/// System: HealEvent → Health (мёртвых не лечим, revive отдельно)
pub fn apply_heals(
    mut heal_events: EventReader<HealEvent>,
    mut targets: Query<(&mut Health, &ActorStateMachine)>,
) {
    for event in heal_events.read() {
        let Ok((mut health, machine)) = targets.get_mut(event.target) else {
            continue;
        };

        if machine.is_dead() {
            continue;
        }

        health.heal(event.amount);
        crate::log(&format!(
            "💚 {:?} healed {:?} for {} ({}/{})",
            event.healer, event.target, event.amount, health.current, health.max
        ));
    }
}
