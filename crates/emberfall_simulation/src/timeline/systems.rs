//! Timeline Action Executor systems
//!
//! Порядок внутри тика для каждого актора с action'ом:
//! 1. окна (Off → On → Done) → сигналы, свежий hit registry на открытии hit volume
//! 2. root motion → Displace
//! 3. combo окно: buffered input → следующий шаг / dodge-cancel
//! 4. progress ≥ 1 → completion (Combat-Ready, combo reset)

use bevy::prelude::*;

use crate::actions::{ActionDefinition, ActionId, ActionKind, ActionTable, WindowEffect};
use crate::combat::{HealEvent, HitRegistry};
use crate::config::CombatTuning;
use crate::events::{CombatSignal, EffectKind, SignalOutbox};
use crate::input::{resolve_continuation, ComboContinuation};
use crate::state::handlers::begin_action;
use crate::state::{ActorCombat, ActorCombatItem, ActorStateKind, StateRegistry, TransitionRequest};

use super::{AnimationClock, WindowEdge};

/// Фронты окон → side effects (сигналы + hit registry)
pub fn emit_edge_signals(
    entity: Entity,
    serial: u64,
    edges: &[WindowEdge],
    hits: &mut HitRegistry,
    signals: &mut Vec<CombatSignal>,
) {
    for edge in edges {
        match &edge.effect {
            WindowEffect::HitVolume { tag } => {
                if edge.opened {
                    // Каждое открытие = новый набор задетых целей
                    hits.begin(serial, tag.clone());
                }
                signals.push(CombatSignal::HitVolume {
                    entity,
                    tag: tag.clone(),
                    enabled: edge.opened,
                });
            }
            WindowEffect::TurnLock => signals.push(CombatSignal::TurnLock {
                entity,
                locked: edge.opened,
            }),
            WindowEffect::SuperArmor => signals.push(CombatSignal::SuperArmor {
                entity,
                active: edge.opened,
            }),
            WindowEffect::ComboInput => {}
            WindowEffect::Sound { cue } if edge.fire_once => signals.push(CombatSignal::PlayEffect {
                entity,
                kind: EffectKind::Sound,
                cue: cue.clone(),
            }),
            WindowEffect::Particle { cue } if edge.fire_once => signals.push(CombatSignal::PlayEffect {
                entity,
                kind: EffectKind::Particle,
                cue: cue.clone(),
            }),
            WindowEffect::Sound { .. } | WindowEffect::Particle { .. } => {}
        }
    }
}

/// Animation-driven displacement за кадр: world space, вертикаль обнулена.
///
/// Источник: root-motion delta провайдера, иначе авторский `root_motion`
/// × progress delta, повёрнутый facing'ом актора.
pub fn root_motion_displacement(
    clock: &AnimationClock,
    definition: &ActionDefinition,
    facing: Quat,
    progress_delta: f32,
    scale: f32,
) -> Option<Vec3> {
    let raw = match clock.root_motion_delta {
        Some(delta) => delta,
        None => facing * Vec3::from_array(definition.root_motion?) * progress_delta,
    };

    let planar = Vec3::new(raw.x, 0.0, raw.z) * scale;
    (planar.length_squared() > f32::EPSILON).then_some(planar)
}

pub fn run_action_timelines(
    mut actors: Query<ActorCombat>,
    registry: Res<StateRegistry>,
    table: Res<ActionTable>,
    tuning: Res<CombatTuning>,
    mut outbox: ResMut<SignalOutbox>,
    mut heals: EventWriter<HealEvent>,
) {
    let signals = &mut outbox.signals;

    for mut actor in &mut actors {
        if !actor.machine.current().runs_action() {
            continue;
        }

        let entity = actor.entity;
        let (Some(serial), Some(definition)) = (
            actor.execution.serial(),
            actor.execution.definition().cloned(),
        ) else {
            crate::log_warning(&format!(
                "⚠️ {:?}: {:?} without an action ({}), recovering to CombatReady",
                entity,
                actor.machine.current(),
                crate::error::ErrorSeverity::Invariant.as_str()
            ));
            actor.transition(
                &registry,
                &table,
                &tuning,
                signals,
                TransitionRequest::to(ActorStateKind::CombatReady),
            );
            continue;
        };

        let progress = actor.clock.normalized;

        // ====================================================================
        // 1. Windows
        // ====================================================================
        let edges = actor.execution.advance(progress);
        let combo_closed_now = edges
            .iter()
            .any(|edge| !edge.opened && edge.effect == WindowEffect::ComboInput);
        emit_edge_signals(entity, serial, &edges, &mut actor.hits, signals);

        let progress_delta = actor.execution.take_progress_delta(progress);

        // ====================================================================
        // 2. Combo input
        // ====================================================================
        let mut continuation = None;
        if actor.machine.is(ActorStateKind::Attacking) {
            let next = actor
                .loadout
                .next_combo_step(actor.combo.index as usize)
                .cloned();
            let has_dodge = actor.loadout.dodge.is_some();
            let window_open = actor.execution.combo_window_open();

            continuation = match resolve_continuation(
                &mut actor.buffer,
                window_open,
                combo_closed_now,
                next.is_some(),
                has_dodge,
            ) {
                Some(ComboContinuation::Step { charged }) => next.map(|next| (next, charged)),
                Some(ComboContinuation::Dodge) => {
                    // Dodge отменяет остаток root motion, включая этот тик
                    if let Some(dodge) = actor.loadout.dodge.clone() {
                        actor.transition(&registry, &table, &tuning, signals, TransitionRequest::dodge(dodge));
                    }
                    continue;
                }
                None => None,
            };
        }

        // ====================================================================
        // 3. Root motion
        // ====================================================================
        if let Some(delta) = root_motion_displacement(
            &actor.clock,
            &definition,
            actor.transform.rotation,
            progress_delta,
            tuning.displacement_scale,
        ) {
            signals.push(CombatSignal::Displace { entity, delta });
        }

        if let Some((next, charged)) = continuation {
            continue_combo(&mut actor, &registry, &table, &tuning, signals, next, charged);
            continue;
        }

        // ====================================================================
        // 4. Completion
        // ====================================================================
        if progress >= 1.0 {
            if definition.kind == ActionKind::SupportAbility {
                if let Some(target) = actor.execution.active().and_then(|a| a.target) {
                    let amount = (actor.stats.attack_power * definition.motion_value)
                        .round()
                        .max(1.0) as u32;
                    heals.write(HealEvent {
                        target,
                        healer: entity,
                        amount,
                    });
                }
            }

            // Цепочку не продолжили → combo с нуля
            actor.combo.reset();
            actor.transition(
                &registry,
                &table,
                &tuning,
                signals,
                TransitionRequest::to(ActorStateKind::CombatReady),
            );
        }
    }
}

/// Следующий шаг комбо внутри Attacking (без смены состояния)
fn continue_combo(
    actor: &mut ActorCombatItem,
    registry: &StateRegistry,
    table: &ActionTable,
    tuning: &CombatTuning,
    signals: &mut Vec<CombatSignal>,
    next: ActionId,
    charged: bool,
) {
    let supports_charge = table.get(&next).is_ok_and(|d| d.supports_charge);
    let request = TransitionRequest::attack(next, charged && supports_charge);

    let result = {
        let (mut ctx, _) = actor.split(table, tuning, signals);

        // Окна текущего шага закрываются с Off side effects
        if let Some(serial) = ctx.execution.serial() {
            let edges = ctx.execution.stop();
            emit_edge_signals(ctx.entity, serial, &edges, ctx.hits, ctx.signals);
        }

        begin_action(&mut ctx, &request).map(|definition| {
            ctx.combo.advance();
            definition
        })
    };

    match result {
        Ok(definition) => crate::log(&format!(
            "⚔️ {:?} combo → step {} '{}'{}",
            actor.entity,
            actor.combo.index,
            definition.id,
            if request.charged { " (charged)" } else { "" }
        )),
        Err(err) => {
            crate::log_error(&format!("❌ {:?}: combo step failed: {}", actor.entity, err));
            actor.transition(
                registry,
                table,
                tuning,
                signals,
                TransitionRequest::to(ActorStateKind::CombatReady),
            );
        }
    }
}
