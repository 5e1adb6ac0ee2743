//! Headless симуляция EMBERFALL
//!
//! Игрок + компаньон против двух монстров, без рендера. Игрок раз в
//! полсекунды жмёт атаку, остальное решает AI.

use bevy::prelude::*;
use emberfall_simulation::spawn::{spawn_companion, spawn_monster, spawn_player};
use emberfall_simulation::{
    create_headless_app, init_logger, init_tracing_subscriber, ActorStateMachine, CombatCorePlugin,
    EntityDied, HeadlessCollaboratorsPlugin, Health, InputKind, PlayerIntent,
};

const TICKS: u32 = 1920;

#[derive(Resource, Default)]
struct DeathCount(u32);

fn count_deaths(mut died: EventReader<EntityDied>, mut count: ResMut<DeathCount>) {
    count.0 += died.read().count() as u32;
}

fn main() {
    init_tracing_subscriber();
    init_logger();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    println!("Starting EMBERFALL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((CombatCorePlugin, HeadlessCollaboratorsPlugin))
        .init_resource::<DeathCount>()
        .add_systems(FixedUpdate, count_deaths);

    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    spawn_companion(world, Vec3::new(-2.0, 0.0, -1.0));
    spawn_monster(world, Vec3::new(0.0, 0.0, 6.0), &["wolf_bite", "wolf_lunge"], Some(Vec3::new(0.0, 0.0, 6.0)));
    spawn_monster(world, Vec3::new(4.0, 0.0, 8.0), &["golem_slam"], Some(Vec3::new(4.0, 0.0, 8.0)));

    for tick in 0..TICKS {
        if tick % 32 == 0 {
            app.world_mut().send_event(PlayerIntent::new(player, InputKind::Attack));
        }

        app.update();

        if tick % 320 == 0 {
            let world = app.world_mut();
            let mut actors = world.query::<(Entity, &Name, &Health, &ActorStateMachine)>();
            for (entity, name, health, machine) in actors.iter(world) {
                println!(
                    "Tick {:>4}: {:?} {:<10} {:>3}/{:<3} {:?}",
                    tick,
                    entity,
                    name.as_str(),
                    health.current,
                    health.max,
                    machine.current()
                );
            }
        }
    }

    let deaths = app.world().resource::<DeathCount>().0;
    println!("Simulation complete! ({} deaths)", deaths);
}
