//! AI systems: damage reaction + combat decision loop

use std::sync::Arc;

use bevy::prelude::*;

use crate::actions::{ActionDefinition, ActionKind, ActionLoadout, ActionTable};
use crate::combat::DamageDealt;
use crate::components::{Actor, CombatStats, Health, MovementCommand, NavigationState, Player};
use crate::config::CombatTuning;
use crate::error::ErrorSeverity;
use crate::state::{ActorStateKind, ActorStateMachine, StateChangeRequest, TransitionRequest};
use crate::DeterministicRng;

use super::decision::{decide, jittered_interval, AbilityOption, AiDecision, DecisionInput};
use super::targeting::{is_valid_target, most_hurt_ally, nearest_hostile, Perceived};
use super::{AiBrain, AiConfig, AiRole, CooldownLedger, HomePost};

/// System: AI реакция на полученный урон
///
/// Атакующий (враг) становится кандидатом в цели, переоценка на этом же тике
/// (не ждём decision interval).
pub fn ai_react_to_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut brains: Query<(&Actor, &mut AiBrain)>,
    attackers: Query<&Actor>,
) {
    for event in damage_events.read() {
        let Ok((victim, mut brain)) = brains.get_mut(event.target) else {
            continue;
        };

        let Ok(attacker) = attackers.get(event.attacker) else {
            continue;
        };

        // Friendly fire - игнорируем
        if victim.is_ally_of(attacker) {
            continue;
        }

        brain.provoke(event.attacker);
        crate::log(&format!(
            "⚠️ {:?} damaged by {:?} → re-evaluating",
            event.target, event.attacker
        ));
    }
}

/// System: combat decision loop (interval ± jitter, forced после урона)
pub fn ai_combat_decision(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    table: Res<ActionTable>,
    tuning: Res<CombatTuning>,
    actors: Query<(
        Entity,
        &Actor,
        &Transform,
        &Health,
        &CombatStats,
        &ActorStateMachine,
        Has<Player>,
    )>,
    mut brains: Query<(
        Entity,
        &mut AiBrain,
        &AiConfig,
        &AiRole,
        Option<&HomePost>,
        &CooldownLedger,
        &ActionLoadout,
        &mut MovementCommand,
        &mut NavigationState,
    )>,
    mut requests: EventWriter<StateChangeRequest>,
) {
    let delta = time.delta_secs();

    // Snapshot всех акторов (детерминированный порядок)
    let mut snapshot: Vec<Perceived> = actors
        .iter()
        .map(|(entity, actor, transform, health, stats, machine, is_player)| Perceived {
            entity,
            position: transform.translation,
            radius: stats.body_radius,
            health_ratio: health.ratio(),
            faction_id: actor.faction_id,
            alive: health.is_alive() && !machine.is_dead(),
            is_player,
        })
        .collect();
    snapshot.sort_by_key(|c| c.entity);

    let find = |entity: Entity| snapshot.iter().find(|c| c.entity == entity).copied();

    for (entity, mut brain, config, role, home, ledger, loadout, mut movement, mut navigation) in
        brains.iter_mut()
    {
        let Ok((_, actor, transform, _, stats, machine, _)) = actors.get(entity) else {
            continue;
        };

        if machine.is_dead() {
            brain.target = None;
            brain.provoked_by = None;
            continue;
        }

        brain.decision_timer -= delta;
        if brain.decision_timer > 0.0 && !brain.force_reevaluate {
            continue;
        }
        brain.decision_timer = jittered_interval(config, &mut rng.rng);
        brain.force_reevaluate = false;

        let position = transform.translation;
        let faction_id = actor.faction_id;

        // ====================================================================
        // Perception
        // ====================================================================
        let player = snapshot
            .iter()
            .find(|c| {
                c.is_player
                    && c.alive
                    && c.entity != entity
                    && c.faction_id == faction_id
                    && c.distance_to(position) <= config.perception_radius
            })
            .copied();
        if let Some(player) = player {
            brain.last_known_player = Some(player.position);
        }

        // ====================================================================
        // Target: provoker → текущая (если валидна) → ближайший враг
        // ====================================================================
        let valid = |candidate: &Perceived| {
            is_valid_target(candidate, entity, faction_id, position, config.perception_radius)
        };

        let provoker = brain.provoked_by.take().and_then(find).filter(|c| valid(c));
        let current = brain.target.and_then(find).filter(|c| valid(c));
        let target = provoker.or(current).or_else(|| {
            nearest_hostile(entity, faction_id, position, config.detection_radius, &snapshot)
        });

        if target.map(|t| t.entity) != brain.target {
            crate::log(&format!(
                "🎯 {:?} target {:?} → {:?}",
                entity,
                brain.target,
                target.map(|t| t.entity)
            ));
        }
        brain.target = target.map(|t| t.entity);

        // ====================================================================
        // Abilities (cooldown из ledger'а актора)
        // ====================================================================
        let definitions: Vec<Arc<ActionDefinition>> = loadout
            .abilities
            .iter()
            .filter_map(|id| match table.get(id) {
                Ok(definition) => Some(definition),
                Err(err) => {
                    crate::log_error(&format!("❌ {:?}: ability skipped ({}): {}", entity, err.severity().as_str(), err));
                    None
                }
            })
            .collect();
        let options: Vec<AbilityOption> = definitions
            .iter()
            .map(|definition| AbilityOption {
                definition,
                ready: ledger.is_ready(&definition.id),
            })
            .collect();

        let has_support = definitions
            .iter()
            .any(|d| d.kind == ActionKind::SupportAbility);
        let hurt_ally = if has_support {
            most_hurt_ally(
                faction_id,
                position,
                config.perception_radius,
                config.support_threshold,
                &snapshot,
            )
        } else {
            None
        };

        let input = DecisionInput {
            position,
            radius: stats.body_radius,
            role: *role,
            config,
            arrival_distance: tuning.arrival_distance,
            target,
            hurt_ally,
            player,
            last_known_player: brain.last_known_player,
            home: home.map(|h| h.position),
            abilities: &options,
        };

        let decision = decide(&input, &mut rng.rng);
        if !options.is_empty() && target.is_some() && decision == AiDecision::Hold {
            crate::log(&format!(
                "💤 {:?}: no usable ability this cycle ({})",
                entity,
                ErrorSeverity::Transient.as_str()
            ));
        }

        // ====================================================================
        // Apply (только если capabilities позволяют)
        // ====================================================================
        let state = machine.current();
        match decision {
            AiDecision::CastAbility { action, target } => {
                if machine.can_attack() {
                    requests.write(StateChangeRequest::new(
                        entity,
                        TransitionRequest::ability(action, target),
                    ));
                } else if state == ActorStateKind::Returning {
                    // Бросаем возврат, каст на следующем тике
                    requests.write(StateChangeRequest::new(
                        entity,
                        TransitionRequest::to(ActorStateKind::Locomotion),
                    ));
                    brain.force_reevaluate = true;
                }
            }
            AiDecision::Approach { target, .. } | AiDecision::FollowPlayer { target, .. } => {
                if machine.can_move() {
                    *movement = MovementCommand::FollowEntity {
                        target,
                        speed: stats.move_speed,
                    };
                    navigation.is_target_reached = false;
                    request_locomotion(&mut requests, entity, state);
                }
            }
            AiDecision::DriftToLastKnown { point } => {
                if machine.can_move() {
                    *movement = MovementCommand::move_to(point, stats.move_speed);
                    navigation.is_target_reached = false;
                    request_locomotion(&mut requests, entity, state);
                }
            }
            AiDecision::ReturnToPost { point } => {
                if machine.can_move() && state != ActorStateKind::Returning {
                    requests.write(StateChangeRequest::new(
                        entity,
                        TransitionRequest::move_to(ActorStateKind::Returning, point),
                    ));
                }
            }
            AiDecision::Hold => {
                if machine.can_move() && movement.is_moving() {
                    *movement = MovementCommand::Stop;
                }
                if state == ActorStateKind::Locomotion {
                    requests.write(StateChangeRequest::new(
                        entity,
                        TransitionRequest::to(ActorStateKind::Idle),
                    ));
                }
            }
        }
    }
}

/// Idle / Returning → Locomotion (движение уже задано в MovementCommand)
fn request_locomotion(
    requests: &mut EventWriter<StateChangeRequest>,
    entity: Entity,
    state: ActorStateKind,
) {
    if matches!(state, ActorStateKind::Idle | ActorStateKind::Returning) {
        requests.write(StateChangeRequest::new(
            entity,
            TransitionRequest::to(ActorStateKind::Locomotion),
        ));
    }
}
