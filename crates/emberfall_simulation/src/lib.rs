//! EMBERFALL Simulation Core
//!
//! Real-time combat core на Bevy 0.16 ECS (headless, без рендера).
//!
//! Анимация → дискретные gameplay события:
//! - actor state machine с capability флагами (игрок и AI одинаково)
//! - timeline executor: normalized progress клипа → hit volume / combo /
//!   turn lock / super armor окна + root motion
//! - input buffer + combo resolution
//! - AI combat decision loop (цели, cooldown'ы, дистанция)
//! - hit registry + damage resolution
//!
//! Движок (рендер, физика, navmesh, AnimationTree) подключается через узкие
//! контракты: AnimationClock, MovementCommand/NavigationState,
//! HitVolumeOverlap, CombatSignal. Для тестов и headless прогона есть
//! HeadlessCollaboratorsPlugin.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actions;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod headless;
pub mod input;
pub mod logger;
pub mod spawn;
pub mod state;
pub mod timeline;

// Re-export базовых типов для удобства
pub use actions::{ActionDefinition, ActionId, ActionKind, ActionLoadout, ActionTable, HitVolumeTag, TimedWindow, WindowEffect};
pub use ai::{AiBrain, AiConfig, AiRole, CooldownLedger, HomePost};
pub use combat::{DamageDealt, DamageEvent, EntityDied, HealEvent, HitRegistry};
pub use components::*;
pub use config::CombatTuning;
pub use error::{CombatError, ErrorSeverity};
pub use events::{CombatSignal, EffectKind, HitVolumeOverlap, ReviveActor, SignalOutbox};
pub use headless::{HeadlessCollaboratorsPlugin, HitVolumeShape};
pub use input::{ComboProgress, InputBuffer, InputKind, PlayerIntent};
pub use logger::{init_logger, init_tracing_subscriber, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use state::{ActorStateKind, ActorStateMachine, Capabilities, StateChangeRequest, StateRegistry, TransitionOutcome, TransitionRequest};
pub use timeline::{ActionExecution, AnimationClock, AnimationFinished, ClockDriver};

/// Tick rate headless тестов (1/64 s точно представим в f32)
pub const HEADLESS_TICK_HZ: f64 = 64.0;

/// Combat core: события, ресурсы и системы одного тика
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения (всё последовательно, без параллельных апдейтов акторов):
/// 1. tick_cooldowns, tick_input_buffers, advance_animation_clocks
/// 2. buffer_player_intents - PlayerIntent → InputBuffer
/// 3. ai_react_to_damage, ai_combat_decision - AI → StateChangeRequest
/// 4. start_player_actions - buffer → opener / dodge
/// 5. apply_state_requests - Exit полностью до Enter
/// 6. tick_state_timers - Hit-Reaction countdown, arrival
/// 7. run_action_timelines - окна, combo, root motion, completion
/// 8. process_hit_overlaps - HitRegistry → DamageEvent
/// 9. receive_damage, apply_heals - Health → Hit-Reaction / Dead
/// 10. flush_signals - CombatSignal наружу
pub struct CombatCorePlugin;

impl Plugin for CombatCorePlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<PlayerIntent>()
            .add_event::<StateChangeRequest>()
            .add_event::<HitVolumeOverlap>()
            .add_event::<DamageEvent>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HealEvent>()
            .add_event::<ReviveActor>()
            .add_event::<AnimationFinished>()
            .add_event::<CombatSignal>();

        // Ресурсы (уже вставленные тестом / bridge'ем не перезаписываем)
        if !app.world().contains_resource::<ActionTable>() {
            let table = match ActionTable::builtin() {
                Ok(table) => table,
                Err(err) => {
                    log_error(&format!(
                        "❌ builtin action table rejected ({}): {}",
                        err.severity().as_str(),
                        err
                    ));
                    ActionTable::default()
                }
            };
            app.insert_resource(table);
        }
        app.init_resource::<StateRegistry>()
            .init_resource::<CombatTuning>()
            .init_resource::<SignalOutbox>();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: countdowns + simulated clocks
                (
                    ai::tick_cooldowns,
                    input::tick_input_buffers,
                    timeline::advance_animation_clocks,
                ),
                // Фаза 2: player input
                input::buffer_player_intents,
                // Фаза 3: AI decisions
                ai::ai_react_to_damage,
                ai::ai_combat_decision,
                // Фаза 4: player actions из буфера
                input::start_player_actions,
                // Фаза 5-6: state machine
                state::apply_state_requests,
                state::tick_state_timers,
                // Фаза 7: timeline executor
                timeline::run_action_timelines,
                // Фаза 8-9: hits + damage
                combat::process_hit_overlaps,
                combat::receive_damage,
                combat::apply_heals,
                // Фаза 10: outbound
                events::flush_signals,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}

/// Главный plugin симуляции (combat core + fixed tick + RNG)
pub struct SimulationPlugin {
    pub tick_hz: f64,
    pub seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.tick_hz))
            // Детерминистичный RNG (seed из plugin'а)
            .insert_resource(DeterministicRng::new(self.seed))
            .add_plugins(CombatCorePlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную: каждый `app.update()` (кроме первого, нулевого)
/// = ровно один FixedUpdate тик длиной 1/64 s. Plugins добавляет вызывающий.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let step = Duration::from_secs_f64(1.0 / HEADLESS_TICK_HZ);
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_plugin_keeps_its_seed_and_rate() {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            SimulationPlugin {
                tick_hz: 30.0,
                seed: 7,
            },
        ));

        assert_eq!(app.world().resource::<DeterministicRng>().seed, 7);
        let step = app.world().resource::<Time<Fixed>>().timestep();
        assert!((step.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
        assert!(!app.world().resource::<ActionTable>().is_empty());
        assert!(app.world().resource::<StateRegistry>().contains(ActorStateKind::Idle));
    }

    #[test]
    fn test_same_seed_same_stream() {
        use rand::Rng;

        let mut a = DeterministicRng::new(99);
        let mut b = DeterministicRng::new(99);
        let first: Vec<u32> = (0..8).map(|_| a.rng.gen()).collect();
        let second: Vec<u32> = (0..8).map(|_| b.rng.gen()).collect();
        assert_eq!(first, second);
    }
}
