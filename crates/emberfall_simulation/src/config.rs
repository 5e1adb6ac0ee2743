//! Combat tuning (глобальные константы боя, Resource)

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CombatTuning {
    /// TTL нажатия в InputBuffer (секунды)
    pub input_buffer_ttl: f32,
    /// Множитель animation-driven displacement
    pub displacement_scale: f32,
    /// Длительность Hit-Reaction (секунды)
    pub hit_reaction_duration: f32,
    /// Разброс урона: attack × motion × [min, max]
    pub damage_variance: (f32, f32),
    /// Дистанция "прибыли" для movement команд (метры)
    pub arrival_distance: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            input_buffer_ttl: 0.25,
            displacement_scale: 1.0,
            hit_reaction_duration: 0.4,
            damage_variance: (0.9, 1.1),
            arrival_distance: 0.5,
        }
    }
}
