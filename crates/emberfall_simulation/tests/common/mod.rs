//! Общие helpers для integration тестов (headless App, запись событий)

#![allow(dead_code)]

use bevy::prelude::*;
use emberfall_simulation::events::flush_signals;
use emberfall_simulation::*;

/// Всё, что core опубликовал за прогон
#[derive(Resource, Default)]
pub struct Recorded {
    pub signals: Vec<CombatSignal>,
    pub dealt: Vec<DamageDealt>,
    pub died: Vec<EntityDied>,
}

impl Recorded {
    pub fn signals_of(&self, entity: Entity) -> impl Iterator<Item = &CombatSignal> {
        self.signals.iter().filter(move |s| s.entity() == entity)
    }

    pub fn dealt_by(&self, attacker: Entity) -> Vec<DamageDealt> {
        self.dealt
            .iter()
            .filter(|d| d.attacker == attacker)
            .copied()
            .collect()
    }
}

fn record(
    mut signals: EventReader<CombatSignal>,
    mut dealt: EventReader<DamageDealt>,
    mut died: EventReader<EntityDied>,
    mut recorded: ResMut<Recorded>,
) {
    recorded.signals.extend(signals.read().cloned());
    recorded.dealt.extend(dealt.read().copied());
    recorded.died.extend(died.read().copied());
}

/// Combat core (+ headless collaborators) с записью событий.
///
/// `table` = None → встроенная таблица. Первый (нулевой) update уже сделан.
pub fn combat_app(seed: u64, table: Option<ActionTable>, collaborators: bool) -> App {
    let mut app = create_headless_app(seed);
    if let Some(table) = table {
        app.insert_resource(table);
    }
    app.add_plugins(CombatCorePlugin)
        .init_resource::<Recorded>()
        .add_systems(FixedUpdate, record.after(flush_signals));
    if collaborators {
        app.add_plugins(HeadlessCollaboratorsPlugin);
    }

    app.update();
    app
}

pub fn tick(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Тикает, пока `done` не станет true (или лимит). Возвращает число тиков.
pub fn tick_until(app: &mut App, limit: usize, mut done: impl FnMut(&mut App) -> bool) -> Option<usize> {
    for ticks in 1..=limit {
        app.update();
        if done(app) {
            return Some(ticks);
        }
    }
    None
}

pub fn press(app: &mut App, entity: Entity, kind: InputKind) {
    app.world_mut().send_event(PlayerIntent::new(entity, kind));
}

pub fn state_of(app: &App, entity: Entity) -> ActorStateKind {
    app.world()
        .get::<ActorStateMachine>(entity)
        .map(|m| m.current())
        .unwrap_or_default()
}

pub fn health_of(app: &App, entity: Entity) -> u32 {
    app.world().get::<Health>(entity).map_or(0, |h| h.current)
}

pub fn position_of(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|t| t.translation)
        .unwrap_or_default()
}

pub fn current_action(app: &App, entity: Entity) -> Option<ActionId> {
    app.world()
        .get::<ActionExecution>(entity)
        .and_then(|e| e.definition().map(|d| d.id.clone()))
}

pub fn combo_index(app: &App, entity: Entity) -> u32 {
    app.world().get::<ComboProgress>(entity).map_or(0, |c| c.index)
}

pub fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}
