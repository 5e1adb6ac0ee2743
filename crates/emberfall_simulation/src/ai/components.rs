//! AI components: brain (runtime), config, role, home post

use bevy::prelude::*;

/// Кто этот AI актор
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AiRole {
    /// Враждебный монстр: атакует, без цели возвращается к HomePost
    #[default]
    Monster,
    /// Компаньон игрока: атакует врагов, лечит союзников, держится рядом с игроком
    Companion,
}

/// Точка, к которой монстр возвращается без цели
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HomePost {
    pub position: Vec3,
}

/// Параметры combat decision loop
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AiConfig {
    /// Базовый интервал переоценки (секунды)
    pub decision_interval: f32,
    /// ± доля интервала (0.2 = ±20%)
    pub interval_jitter: f32,
    /// Радиус поиска цели (метры)
    pub detection_radius: f32,
    /// Радиус "вижу игрока / союзника" (метры)
    pub perception_radius: f32,
    /// Health ratio союзника, ниже которого нужна support способность
    pub support_threshold: f32,
    /// Follow band компаньона: ближе min - стоим, дальше max - догоняем
    pub follow_min: f32,
    pub follow_max: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            decision_interval: 1.0,
            interval_jitter: 0.2,
            detection_radius: 12.0,
            perception_radius: 25.0,
            support_threshold: 0.5,
            follow_min: 2.0,
            follow_max: 6.0,
        }
    }
}

/// Runtime state decision loop'а
#[derive(Component, Debug, Clone, Default)]
#[require(AiConfig, AiRole)]
pub struct AiBrain {
    /// Countdown до следующей переоценки
    pub decision_timer: f32,
    pub target: Option<Entity>,
    /// Кто ударил последним (кандидат в цели при forced переоценке)
    pub provoked_by: Option<Entity>,
    pub last_known_player: Option<Vec3>,
    /// "Получил урон" → переоценка на этом же тике
    pub force_reevaluate: bool,
}

impl AiBrain {
    pub fn provoke(&mut self, attacker: Entity) {
        self.provoked_by = Some(attacker);
        self.force_reevaluate = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_default() {
        let config = AiConfig::default();
        assert_eq!(config.decision_interval, 1.0);
        assert_eq!(config.interval_jitter, 0.2);
        assert_eq!(config.detection_radius, 12.0);
        assert_eq!(config.support_threshold, 0.5);
        assert!(config.follow_min < config.follow_max);
    }

    #[test]
    fn test_provoke_forces_reevaluation() {
        let mut brain = AiBrain::default();
        let attacker = Entity::from_raw(7);

        brain.provoke(attacker);
        assert!(brain.force_reevaluate);
        assert_eq!(brain.provoked_by, Some(attacker));
    }
}
