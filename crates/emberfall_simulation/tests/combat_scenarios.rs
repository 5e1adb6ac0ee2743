//! Combat integration: combo chains, dodge-cancel, hit registry, death/revive
//!
//! Headless App, 64 Hz: один update = 1/64 s.

mod common;

use bevy::prelude::*;
use common::*;
use emberfall_simulation::spawn::{spawn_player, MONSTER_FACTION, PLAYER_FACTION};
use emberfall_simulation::*;

/// Три шага по 1 s, combo-input окно [0.25, 0.75] у каждого, roll 0.5 s
fn combo_table() -> ActionTable {
    let step = |id: &str, index: u32| {
        ActionDefinition::new(id, ActionKind::WeaponAttack, 1.0)
            .with_combo_index(index)
            .with_window(0.25, 0.75, WindowEffect::ComboInput)
            .with_root_motion([0.0, 0.0, 1.0])
    };

    ActionTable::from_definitions([
        step("step_1", 0),
        step("step_2", 1),
        step("step_3", 2).with_charge(2.0),
        ActionDefinition::new("roll", ActionKind::Dodge, 0.5).with_root_motion([0.0, 0.0, 3.0]),
    ])
    .unwrap()
}

fn spawn_fighter(app: &mut App) -> Entity {
    let loadout = ActionLoadout::weapon(
        app.world().resource::<ActionTable>(),
        &["step_1", "step_2", "step_3"],
        Some("roll"),
    );
    app.world_mut()
        .spawn((Actor::new(PLAYER_FACTION), Player, Transform::default(), loadout))
        .id()
}

#[test]
fn test_three_step_combo_chain() {
    let mut app = combat_app(42, Some(combo_table()), false);
    let player = spawn_fighter(&mut app);

    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    assert_eq!(state_of(&app, player), ActorStateKind::Attacking);
    assert_eq!(current_action(&app, player), Some(ActionId::from("step_1")));
    assert_eq!(combo_index(&app, player), 0);

    // Середина окна (progress 0.5) → шаг 2
    tick(&mut app, 32);
    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    assert_eq!(state_of(&app, player), ActorStateKind::Attacking);
    assert_eq!(current_action(&app, player), Some(ActionId::from("step_2")));
    assert_eq!(combo_index(&app, player), 1);

    // Нажатие до окна (progress ~0.16) ждёт в буфере и срабатывает на открытии
    tick(&mut app, 10);
    press(&mut app, player, InputKind::ChargedAttack);
    tick_until(&mut app, 20, |app| combo_index(app, player) == 2)
        .expect("buffered charge should continue the chain when the window opens");
    assert_eq!(current_action(&app, player), Some(ActionId::from("step_3")));
    let charged = app
        .world()
        .get::<ActionExecution>(player)
        .and_then(|e| e.active().map(|a| a.charged));
    assert_eq!(charged, Some(true));

    // Цепочка закончилась: нажатие в окне ничего не продолжает, action доигрывает
    tick(&mut app, 32);
    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    assert_eq!(current_action(&app, player), Some(ActionId::from("step_3")));

    let ticks = tick_until(&mut app, 64, |app| state_of(app, player) == ActorStateKind::CombatReady);
    assert!(ticks.is_some(), "step 3 should complete into CombatReady");
    assert_eq!(combo_index(&app, player), 0);
}

#[test]
fn test_press_after_window_does_not_chain() {
    let mut app = combat_app(42, Some(combo_table()), false);
    let player = spawn_fighter(&mut app);

    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);

    // progress ~0.8: окно уже закрыто
    tick(&mut app, 51);
    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    assert_eq!(current_action(&app, player), Some(ActionId::from("step_1")));
    assert_eq!(combo_index(&app, player), 0);
}

#[test]
fn test_dodge_cancels_combo_and_root_motion() {
    let mut app = combat_app(42, Some(combo_table()), true);
    let player = spawn_fighter(&mut app);

    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    tick(&mut app, 32);
    let mid_attack = position_of(&app, player);
    assert!(mid_attack.z > 0.4, "attack root motion moves forward: {:?}", mid_attack);

    let signals_before = recorded(&app).signals.len();
    press(&mut app, player, InputKind::Dodge);
    tick(&mut app, 1);
    assert_eq!(state_of(&app, player), ActorStateKind::Dodging);
    assert_eq!(combo_index(&app, player), 0);

    // Тик отмены: остаток root motion атаки не применяется
    let cancel_tick = &recorded(&app).signals[signals_before..];
    assert!(
        !cancel_tick
            .iter()
            .any(|s| matches!(s, CombatSignal::Displace { entity, .. } if *entity == player)),
        "no displacement on the cancel tick: {:?}",
        cancel_tick
    );
    assert_eq!(position_of(&app, player), mid_attack);
    let before_dodge = mid_attack;

    let ticks = tick_until(&mut app, 64, |app| state_of(app, player) == ActorStateKind::CombatReady);
    assert!(ticks.is_some(), "dodge should complete into CombatReady");

    // Весь путь после отмены = root motion roll'а (3 m вперёд), attack больше не двигает
    let travelled = position_of(&app, player) - before_dodge;
    assert!((travelled.z - 3.0).abs() < 1e-3, "travelled {:?}", travelled);
    assert!(travelled.x.abs() < 1e-4 && travelled.y.abs() < 1e-4);
}

#[test]
fn test_sword_swings_hit_each_target_once() {
    let mut app = combat_app(42, None, true);
    let player = spawn_player(app.world_mut(), Vec3::ZERO);
    let dummy = app
        .world_mut()
        .spawn((
            Actor::new(MONSTER_FACTION),
            Transform::from_xyz(0.0, 0.0, 1.2),
            Health::new(200),
        ))
        .id();

    // sword_1 (0.6 s): blade 0.3–0.5, combo окно 0.25–0.75
    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    tick(&mut app, 23);
    assert_eq!(recorded(&app).dealt_by(player).len(), 1);

    press(&mut app, player, InputKind::Attack);
    tick(&mut app, 1);
    assert_eq!(current_action(&app, player), Some(ActionId::from("sword_2")));
    tick(&mut app, 60);

    let dealt = recorded(&app).dealt_by(player);
    assert_eq!(dealt.len(), 2, "one hit per swing: {:?}", dealt);
    assert!(dealt.iter().all(|d| d.target == dummy));
    let total: u32 = dealt.iter().map(|d| d.damage).sum();
    assert_eq!(health_of(&app, dummy), 200 - total);
}

#[test]
fn test_death_is_terminal_until_revive() {
    let mut app = combat_app(42, None, false);
    let attacker = spawn_player(app.world_mut(), Vec3::ZERO);
    let victim = app
        .world_mut()
        .spawn((Actor::new(MONSTER_FACTION), Health::new(30)))
        .id();

    app.world_mut().send_event(DamageEvent {
        target: victim,
        attacker,
        amount: 50,
        is_critical: false,
    });
    tick(&mut app, 1);
    assert_eq!(state_of(&app, victim), ActorStateKind::Dead);
    assert_eq!(recorded(&app).died.len(), 1);

    // Dead игнорирует запросы
    app.world_mut().send_event(StateChangeRequest::new(
        victim,
        TransitionRequest::to(ActorStateKind::CombatReady),
    ));
    tick(&mut app, 1);
    assert_eq!(state_of(&app, victim), ActorStateKind::Dead);

    app.world_mut().send_event(ReviveActor { entity: victim });
    tick(&mut app, 1);
    assert_eq!(state_of(&app, victim), ActorStateKind::Idle);
    assert_eq!(health_of(&app, victim), 30);

    // Revive живого - no-op
    app.world_mut().send_event(StateChangeRequest::new(
        victim,
        TransitionRequest::to(ActorStateKind::CombatReady),
    ));
    app.world_mut().send_event(ReviveActor { entity: victim });
    tick(&mut app, 1);
    assert_eq!(state_of(&app, victim), ActorStateKind::CombatReady);
    assert_eq!(recorded(&app).died.len(), 1);
}

#[test]
fn test_state_entered_signals_follow_transitions() {
    let mut app = combat_app(42, Some(combo_table()), false);
    let player = spawn_fighter(&mut app);

    press(&mut app, player, InputKind::Dodge);
    tick(&mut app, 40);

    let states: Vec<ActorStateKind> = recorded(&app)
        .signals_of(player)
        .filter_map(|s| match s {
            CombatSignal::StateEntered { state, .. } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![ActorStateKind::Dodging, ActorStateKind::CombatReady]);
}
