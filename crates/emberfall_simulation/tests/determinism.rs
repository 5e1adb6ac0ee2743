//! Детерминизм: одинаковый seed → идентичный бой
//!
//! Полная сцена (игрок, компаньон, два монстра) с headless collaborators.

mod common;

use bevy::prelude::*;
use common::*;
use emberfall_simulation::spawn::{spawn_companion, spawn_monster, spawn_player};
use emberfall_simulation::*;

/// Прогоняет сцену и возвращает snapshot мира + лог урона
fn run_battle(seed: u64, ticks: usize) -> (Vec<u8>, Vec<(u32, u32, u32, bool)>) {
    let mut app = combat_app(seed, None, true);

    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    spawn_companion(world, Vec3::new(-2.0, 0.0, -1.0));
    spawn_monster(world, Vec3::new(0.0, 0.0, 6.0), &["wolf_bite", "wolf_lunge"], Some(Vec3::new(0.0, 0.0, 6.0)));
    spawn_monster(world, Vec3::new(4.0, 0.0, 8.0), &["golem_slam"], Some(Vec3::new(4.0, 0.0, 8.0)));

    for tick_index in 0..ticks {
        if tick_index % 32 == 0 {
            press(&mut app, player, InputKind::Attack);
        }
        tick(&mut app, 1);
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Health>(world);
    snapshot.extend(world_snapshot::<Transform>(world));
    snapshot.extend(world_snapshot::<ComboProgress>(world));

    let damage_log = recorded(&app)
        .dealt
        .iter()
        .map(|d| (d.attacker.index(), d.target.index(), d.damage, d.is_critical))
        .collect();

    (snapshot, damage_log)
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 640;

    let (snapshot1, damage1) = run_battle(SEED, TICK_COUNT);
    let (snapshot2, damage2) = run_battle(SEED, TICK_COUNT);

    assert!(!damage1.is_empty(), "battle should produce hits");
    assert_eq!(damage1, damage2);
    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 320;

    let runs: Vec<_> = (0..3).map(|_| run_battle(SEED, TICK_COUNT)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} дал результат отличный от прогона 0", i);
    }
}
