//! Damage resolution: roll + damage-receiving contract events

use bevy::prelude::*;
use rand::Rng;

use crate::components::CombatStats;

/// Damage-receiving contract: нанести `amount` цели
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub target: Entity,
    pub attacker: Entity,
    pub amount: u32,
    pub is_critical: bool,
}

/// Урон применён (после health)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub is_critical: bool,
    pub remaining_health: u32,
}

/// Актор умер (ровно один раз на смерть)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Support способность завершилась на союзнике
#[derive(Event, Debug, Clone, Copy)]
pub struct HealEvent {
    pub target: Entity,
    pub healer: Entity,
    pub amount: u32,
}

/// Урон одного попадания
///
/// Формула:
/// - attack_power × motion_value × variance (равномерно в [min, max])
/// - crit: roll < crit_chance → × crit_multiplier
/// - round, минимум 1
pub fn roll_damage(
    stats: &CombatStats,
    motion_value: f32,
    variance: (f32, f32),
    rng: &mut impl Rng,
) -> (u32, bool) {
    let (low, high) = if variance.0 <= variance.1 {
        variance
    } else {
        (variance.1, variance.0)
    };

    let mut amount = stats.attack_power * motion_value * rng.gen_range(low..=high);

    let is_critical = rng.gen::<f32>() < stats.crit_chance;
    if is_critical {
        amount *= stats.crit_multiplier;
    }

    (amount.round().max(1.0) as u32, is_critical)
}
