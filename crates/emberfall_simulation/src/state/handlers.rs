//! State handlers (strategy table entries)
//!
//! Handler = capabilities + Enter/Exit side effects для одного ActorStateKind.
//! Регистрируются один раз в StateRegistry.

use std::sync::Arc;

use crate::actions::ActionDefinition;
use crate::components::MovementCommand;
use crate::config::CombatTuning;
use crate::error::CombatError;
use crate::events::CombatSignal;

use super::{ActorStateKind, Capabilities, StateCtx, TransitionRequest};

pub const HIT_REACTION_CLIP: &str = "hit_reaction";
pub const DEATH_CLIP: &str = "death";

pub trait StateHandler: Send + Sync + 'static {
    fn capabilities(&self) -> Capabilities;

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError>;

    fn exit(&self, _ctx: &mut StateCtx) {}

    /// Countdown до авто-выхода (poll в tick_state_timers)
    fn timeout(&self, _tuning: &CombatTuning) -> Option<f32> {
        None
    }
}

/// Запуск action: timeline executor + clip + cooldown commit.
///
/// Используется Enter'ами Attacking/Dodging/UsingAbility и продолжением комбо.
pub(crate) fn begin_action(
    ctx: &mut StateCtx,
    request: &TransitionRequest,
) -> Result<Arc<ActionDefinition>, CombatError> {
    let Some(action) = request.action.as_ref() else {
        return Err(CombatError::MissingAction {
            state: request.state,
        });
    };
    let definition = ctx.table.get(action)?;

    *ctx.movement = MovementCommand::Stop;

    let serial = ctx
        .execution
        .begin(definition.clone(), request.charged, request.target);
    ctx.hits.retain_instance(serial);

    ctx.clock.play(&definition.clip, definition.duration);
    ctx.signals.push(CombatSignal::PlayAnimation {
        entity: ctx.entity,
        clip: definition.clip.clone(),
    });

    if definition.cooldown > 0.0 {
        ctx.cooldowns.start(definition.id.clone(), definition.cooldown);
    }

    Ok(definition)
}

// ============================================================================
// Handlers
// ============================================================================

pub struct IdleState;

impl StateHandler for IdleState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        if request.revive {
            // Recycling: полное здоровье, чистые буферы
            ctx.health.restore_full();
            ctx.buffer.clear();
            ctx.combo.reset();
            crate::log_info(&format!("✨ {:?} revived", ctx.entity));
        }

        *ctx.movement = MovementCommand::Idle;
        ctx.navigation.is_target_reached = false;
        Ok(())
    }
}

pub struct LocomotionState;

impl StateHandler for LocomotionState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        // Без point/target - движение уже задано владельцем MovementCommand
        if let Some(point) = request.point {
            *ctx.movement = MovementCommand::move_to(point, ctx.move_speed);
        } else if let Some(target) = request.target {
            *ctx.movement = MovementCommand::FollowEntity {
                target,
                speed: ctx.move_speed,
            };
        }
        ctx.navigation.is_target_reached = false;
        Ok(())
    }
}

pub struct CombatReadyState;

impl StateHandler for CombatReadyState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_MOVE | Capabilities::CAN_ATTACK
    }

    fn enter(&self, _ctx: &mut StateCtx, _request: &TransitionRequest) -> Result<(), CombatError> {
        Ok(())
    }
}

pub struct AttackingState;

impl StateHandler for AttackingState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        let definition = begin_action(ctx, request)?;
        ctx.combo.index = definition.combo_index;

        crate::log(&format!(
            "⚔️ {:?} attack '{}' (combo step {}{})",
            ctx.entity,
            definition.id,
            definition.combo_index,
            if request.charged { ", charged" } else { "" }
        ));
        Ok(())
    }
}

pub struct DodgingState;

impl StateHandler for DodgingState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        // Dodge прерывает цепочку комбо
        ctx.combo.reset();
        let definition = begin_action(ctx, request)?;
        crate::log(&format!("💨 {:?} dodge '{}'", ctx.entity, definition.id));
        Ok(())
    }
}

pub struct UsingAbilityState;

impl StateHandler for UsingAbilityState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        let definition = begin_action(ctx, request)?;

        ctx.signals.push(CombatSignal::AbilityUsed {
            entity: ctx.entity,
            action: definition.id.clone(),
            target: request.target,
        });
        crate::log(&format!(
            "🔮 {:?} uses '{}' on {:?} (cooldown {:.1}s)",
            ctx.entity, definition.id, request.target, definition.cooldown
        ));
        Ok(())
    }
}

pub struct HitReactionState;

impl StateHandler for HitReactionState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enter(&self, ctx: &mut StateCtx, _request: &TransitionRequest) -> Result<(), CombatError> {
        ctx.combo.reset();
        *ctx.movement = MovementCommand::Stop;
        ctx.clock
            .play(HIT_REACTION_CLIP, ctx.tuning.hit_reaction_duration);
        ctx.signals.push(CombatSignal::PlayAnimation {
            entity: ctx.entity,
            clip: HIT_REACTION_CLIP.to_string(),
        });
        Ok(())
    }

    fn timeout(&self, tuning: &CombatTuning) -> Option<f32> {
        Some(tuning.hit_reaction_duration)
    }
}

pub struct DeadState;

impl StateHandler for DeadState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn enter(&self, ctx: &mut StateCtx, _request: &TransitionRequest) -> Result<(), CombatError> {
        ctx.buffer.clear();
        ctx.combo.reset();
        *ctx.movement = MovementCommand::Stop;
        ctx.clock.play(DEATH_CLIP, 1.0);
        ctx.signals.push(CombatSignal::PlayAnimation {
            entity: ctx.entity,
            clip: DEATH_CLIP.to_string(),
        });
        Ok(())
    }
}

pub struct ReturningState;

impl StateHandler for ReturningState {
    fn capabilities(&self) -> Capabilities {
        Capabilities::CAN_MOVE | Capabilities::CAN_RUN
    }

    fn enter(&self, ctx: &mut StateCtx, request: &TransitionRequest) -> Result<(), CombatError> {
        let Some(point) = request.point else {
            return Err(CombatError::MissingPoint {
                state: ActorStateKind::Returning,
            });
        };

        *ctx.movement = MovementCommand::move_to(point, ctx.move_speed);
        ctx.navigation.is_target_reached = false;
        crate::log(&format!("🏠 {:?} returning to post {:?}", ctx.entity, point));
        Ok(())
    }
}
