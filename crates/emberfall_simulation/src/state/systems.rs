//! State machine systems: inbound requests + per-tick countdowns

use bevy::prelude::*;

use crate::actions::ActionTable;
use crate::components::MovementCommand;
use crate::config::CombatTuning;
use crate::events::{ReviveActor, SignalOutbox};

use super::{ActorCombat, ActorStateKind, StateChangeRequest, StateRegistry, TransitionOutcome, TransitionRequest};

/// Применяет StateChangeRequest и ReviveActor (Exit полностью до Enter)
pub fn apply_state_requests(
    mut requests: EventReader<StateChangeRequest>,
    mut revives: EventReader<ReviveActor>,
    mut actors: Query<ActorCombat>,
    registry: Res<StateRegistry>,
    table: Res<ActionTable>,
    tuning: Res<CombatTuning>,
    mut outbox: ResMut<SignalOutbox>,
) {
    for revive in revives.read() {
        let Ok(mut actor) = actors.get_mut(revive.entity) else {
            continue;
        };

        if !actor.machine.is_dead() {
            crate::log(&format!("✨ {:?} revive ignored: not dead", revive.entity));
            continue;
        }

        actor.transition(
            &registry,
            &table,
            &tuning,
            &mut outbox.signals,
            TransitionRequest::revive(),
        );
    }

    for StateChangeRequest { entity, request } in requests.read() {
        let Ok(mut actor) = actors.get_mut(*entity) else {
            crate::log_warning(&format!(
                "⚠️ StateChangeRequest for {:?}: entity is not an actor",
                entity
            ));
            continue;
        };

        let outcome = actor.transition(&registry, &table, &tuning, &mut outbox.signals, request.clone());
        if outcome == TransitionOutcome::FellBack {
            crate::log_warning(&format!("⚠️ {:?}: {:?} request fell back to Idle", entity, request.state));
        }
    }
}

/// Poll countdown'ов текущего состояния (вместо корутин "подождать N секунд")
///
/// - Hit-Reaction: таймер истёк → Combat-Ready
/// - Returning: прибыли на пост → Idle
/// - Locomotion: прибыли / движения нет → Idle
pub fn tick_state_timers(
    time: Res<Time>,
    mut actors: Query<ActorCombat>,
    registry: Res<StateRegistry>,
    table: Res<ActionTable>,
    tuning: Res<CombatTuning>,
    mut outbox: ResMut<SignalOutbox>,
) {
    let delta = time.delta_secs();

    for mut actor in &mut actors {
        actor.machine.elapsed += delta;

        let expired = match actor.machine.state_timer.as_mut() {
            Some(timer) => {
                *timer = (*timer - delta).max(0.0);
                *timer <= 0.0
            }
            None => false,
        };

        let next = match actor.machine.current() {
            ActorStateKind::HitReaction if expired => Some(ActorStateKind::CombatReady),
            ActorStateKind::Returning if actor.navigation.has_arrived() => {
                crate::log(&format!("🏠 {:?} back at post", actor.entity));
                Some(ActorStateKind::Idle)
            }
            ActorStateKind::Locomotion => {
                let arrived = matches!(*actor.movement, MovementCommand::MoveToPosition { .. })
                    && actor.navigation.has_arrived();
                let halted = !actor.movement.is_moving();
                (arrived || halted).then_some(ActorStateKind::Idle)
            }
            _ => None,
        };

        if let Some(state) = next {
            actor.transition(
                &registry,
                &table,
                &tuning,
                &mut outbox.signals,
                TransitionRequest::to(state),
            );
        }
    }
}
