//! ActorStateMachine: текущее состояние, capabilities, change_state
//!
//! Переход всегда идёт в два шага: Exit старого состояния полностью
//! (generic exit + handler exit), потом Enter нового. Сигналы Exit попадают в
//! outbox раньше сигналов Enter.

use bevy::prelude::*;

use crate::actions::ActionTable;
use crate::ai::CooldownLedger;
use crate::combat::HitRegistry;
use crate::components::{Health, MovementCommand, NavigationState};
use crate::config::CombatTuning;
use crate::error::CombatError;
use crate::events::CombatSignal;
use crate::input::{ComboProgress, InputBuffer};
use crate::timeline::{emit_edge_signals, ActionExecution, AnimationClock};

use super::{ActorStateKind, Capabilities, StateRegistry, TransitionRequest};

/// State machine актора (один на entity, required компонент Actor)
#[derive(Component, Debug, Clone)]
pub struct ActorStateMachine {
    current: ActorStateKind,
    previous: Option<ActorStateKind>,
    capabilities: Capabilities,
    /// Секунды в текущем состоянии
    pub elapsed: f32,
    /// Countdown до авто-выхода (Hit-Reaction); None = без таймаута
    pub state_timer: Option<f32>,
    entered_with: TransitionRequest,
}

impl Default for ActorStateMachine {
    fn default() -> Self {
        Self {
            current: ActorStateKind::Idle,
            previous: None,
            capabilities: Capabilities::all(),
            elapsed: 0.0,
            state_timer: None,
            entered_with: TransitionRequest::default(),
        }
    }
}

impl ActorStateMachine {
    pub fn current(&self) -> ActorStateKind {
        self.current
    }

    pub fn previous(&self) -> Option<ActorStateKind> {
        self.previous
    }

    pub fn is(&self, state: ActorStateKind) -> bool {
        self.current == state
    }

    pub fn is_dead(&self) -> bool {
        self.current == ActorStateKind::Dead
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn can_move(&self) -> bool {
        self.capabilities.can_move()
    }

    pub fn can_run(&self) -> bool {
        self.capabilities.can_run()
    }

    pub fn can_attack(&self) -> bool {
        self.capabilities.can_attack()
    }

    pub fn can_interact(&self) -> bool {
        self.capabilities.can_interact()
    }

    /// Read-only копия запроса, с которым вошли в текущее состояние
    pub fn entered_with(&self) -> &TransitionRequest {
        &self.entered_with
    }

    fn enter(&mut self, request: TransitionRequest, capabilities: Capabilities, timer: Option<f32>) {
        self.previous = Some(self.current);
        self.current = request.state;
        self.capabilities = capabilities;
        self.elapsed = 0.0;
        self.state_timer = timer;
        self.entered_with = request;
    }
}

/// Результат change_state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Новое состояние активно
    Entered,
    /// Запрошено текущее состояние: no-op
    Unchanged,
    /// Dead отклоняет всё кроме revive
    Rejected,
    /// Enter не удался (конфигурация) → актор в Idle
    FellBack,
}

/// Всё per-actor состояние, которое handler'ы могут трогать при Exit/Enter.
///
/// Собирается системой из компонентов одного актора; чужие акторы сюда не попадают.
pub struct StateCtx<'a> {
    pub entity: Entity,
    pub facing: Quat,
    pub move_speed: f32,
    pub execution: &'a mut ActionExecution,
    pub combo: &'a mut ComboProgress,
    pub buffer: &'a mut InputBuffer,
    pub cooldowns: &'a mut CooldownLedger,
    pub hits: &'a mut HitRegistry,
    pub clock: &'a mut AnimationClock,
    pub movement: &'a mut MovementCommand,
    pub navigation: &'a mut NavigationState,
    pub health: &'a mut Health,
    pub table: &'a ActionTable,
    pub tuning: &'a CombatTuning,
    pub signals: &'a mut Vec<CombatSignal>,
}

/// Переход актора в `request.state`.
///
/// - тот же state → Unchanged
/// - Dead без revive → Rejected; revive из Dead всегда ведёт в Idle
/// - Exit (generic + handler) полностью до Enter
/// - ошибка Enter / нет handler'а → лог + Idle (FellBack)
pub fn change_state(
    machine: &mut ActorStateMachine,
    registry: &StateRegistry,
    ctx: &mut StateCtx,
    request: TransitionRequest,
) -> TransitionOutcome {
    let request = if machine.is_dead() && request.revive && request.state != ActorStateKind::Idle {
        crate::log_warning(&format!(
            "🪦 {:?}: revive into {:?} rewritten to Idle",
            ctx.entity, request.state
        ));
        TransitionRequest::revive()
    } else {
        request
    };

    if machine.current == request.state {
        return TransitionOutcome::Unchanged;
    }

    if machine.is_dead() && !request.revive {
        crate::log(&format!(
            "🪦 {:?}: Dead rejects transition to {:?}",
            ctx.entity, request.state
        ));
        return TransitionOutcome::Rejected;
    }

    // ========================================================================
    // Exit
    // ========================================================================
    generic_exit(machine, ctx);
    if let Some(handler) = registry.get(machine.current) {
        handler.exit(ctx);
    }

    // ========================================================================
    // Enter
    // ========================================================================
    let target_state = request.state;
    let result = match registry.get(target_state) {
        Some(handler) => handler.enter(ctx, &request).map(|()| handler),
        None => Err(CombatError::UnregisteredState(target_state)),
    };

    match result {
        Ok(handler) => {
            let capabilities = handler.capabilities();
            let timer = handler.timeout(ctx.tuning);
            machine.enter(request, capabilities, timer);
            ctx.signals.push(CombatSignal::StateEntered {
                entity: ctx.entity,
                state: target_state,
            });
            TransitionOutcome::Entered
        }
        Err(err) => {
            crate::log_error(&format!(
                "❌ {:?}: cannot enter {:?} ({}: {}), falling back to Idle",
                ctx.entity,
                target_state,
                err.severity().as_str(),
                err
            ));
            fall_back_to_idle(machine, registry, ctx);
            TransitionOutcome::FellBack
        }
    }
}

/// Общий Exit: force-close открытых окон (с Off side effects) + сброс capabilities
fn generic_exit(machine: &mut ActorStateMachine, ctx: &mut StateCtx) {
    if let Some(serial) = ctx.execution.serial() {
        let edges = ctx.execution.stop();
        emit_edge_signals(ctx.entity, serial, &edges, ctx.hits, ctx.signals);
    }
    machine.capabilities = Capabilities::empty();
    machine.state_timer = None;
}

fn fall_back_to_idle(machine: &mut ActorStateMachine, registry: &StateRegistry, ctx: &mut StateCtx) {
    let request = TransitionRequest::to(ActorStateKind::Idle);

    let capabilities = match registry.get(ActorStateKind::Idle) {
        Some(handler) => match handler.enter(ctx, &request) {
            Ok(()) => handler.capabilities(),
            Err(err) => {
                crate::log_error(&format!("❌ {:?}: Idle enter failed: {}", ctx.entity, err));
                Capabilities::empty()
            }
        },
        None => {
            crate::log_error(&format!(
                "❌ {:?}: Idle is not registered, forcing Idle with no capabilities",
                ctx.entity
            ));
            Capabilities::empty()
        }
    };

    machine.enter(request, capabilities, None);
    ctx.signals.push(CombatSignal::StateEntered {
        entity: ctx.entity,
        state: ActorStateKind::Idle,
    });
}
