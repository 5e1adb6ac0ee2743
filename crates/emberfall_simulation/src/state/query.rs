//! ActorCombat: все компоненты актора, нужные для переходов состояния

use bevy::ecs::query::QueryData;
use bevy::prelude::*;

use crate::actions::{ActionLoadout, ActionTable};
use crate::ai::CooldownLedger;
use crate::combat::HitRegistry;
use crate::components::{Actor, CombatStats, Health, MovementCommand, NavigationState};
use crate::config::CombatTuning;
use crate::events::CombatSignal;
use crate::input::{ComboProgress, InputBuffer};
use crate::timeline::{ActionExecution, AnimationClock};

use super::{change_state, ActorStateMachine, StateCtx, StateRegistry, TransitionOutcome, TransitionRequest};

#[derive(QueryData)]
#[query_data(mutable)]
pub struct ActorCombat {
    pub entity: Entity,
    pub actor: &'static Actor,
    pub transform: &'static Transform,
    pub stats: &'static CombatStats,
    pub loadout: &'static ActionLoadout,
    pub machine: &'static mut ActorStateMachine,
    pub execution: &'static mut ActionExecution,
    pub combo: &'static mut ComboProgress,
    pub buffer: &'static mut InputBuffer,
    pub cooldowns: &'static mut CooldownLedger,
    pub hits: &'static mut HitRegistry,
    pub clock: &'static mut AnimationClock,
    pub movement: &'static mut MovementCommand,
    pub navigation: &'static mut NavigationState,
    pub health: &'static mut Health,
}

impl ActorCombatItem<'_> {
    /// Разбивает актора на StateCtx + его state machine
    pub fn split<'a>(
        &'a mut self,
        table: &'a ActionTable,
        tuning: &'a CombatTuning,
        signals: &'a mut Vec<CombatSignal>,
    ) -> (StateCtx<'a>, &'a mut ActorStateMachine) {
        let ctx = StateCtx {
            entity: self.entity,
            facing: self.transform.rotation,
            move_speed: self.stats.move_speed,
            execution: &mut *self.execution,
            combo: &mut *self.combo,
            buffer: &mut *self.buffer,
            cooldowns: &mut *self.cooldowns,
            hits: &mut *self.hits,
            clock: &mut *self.clock,
            movement: &mut *self.movement,
            navigation: &mut *self.navigation,
            health: &mut *self.health,
            table,
            tuning,
            signals,
        };
        (ctx, &mut *self.machine)
    }

    pub fn transition(
        &mut self,
        registry: &StateRegistry,
        table: &ActionTable,
        tuning: &CombatTuning,
        signals: &mut Vec<CombatSignal>,
        request: TransitionRequest,
    ) -> TransitionOutcome {
        let (mut ctx, machine) = self.split(table, tuning, signals);
        change_state(machine, registry, &mut ctx, request)
    }
}
