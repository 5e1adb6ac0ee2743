//! Базовые компоненты акторов: Actor, Health, CombatStats, Player

use bevy::prelude::*;

/// Актор (игрок, монстр, компаньон) - базовый компонент для живых существ
///
/// Через Required Components получает всё per-actor combat state: state
/// machine, executor, input buffer, combo progress, cooldown ledger, hit
/// registry, animation clock и movement handle. Всё это принадлежит только
/// этому актору; другие акторы взаимодействуют с ним только через events.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    CombatStats,
    crate::actions::ActionLoadout,
    crate::state::ActorStateMachine,
    crate::timeline::ActionExecution,
    crate::timeline::AnimationClock,
    crate::input::InputBuffer,
    crate::input::ComboProgress,
    crate::ai::CooldownLedger,
    crate::combat::HitRegistry,
    crate::components::MovementCommand,
    crate::components::NavigationState
)]
pub struct Actor {
    /// Фракция: одинаковый faction_id = союзники (не бьём, лечим)
    pub faction_id: u64,
}

impl Actor {
    pub fn new(faction_id: u64) -> Self {
        Self { faction_id }
    }

    pub fn is_ally_of(&self, other: &Actor) -> bool {
        self.faction_id == other.faction_id
    }
}

/// Маркер: актор под управлением игрока (input buffer наполняется из PlayerIntent)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Возвращает реально снятое количество
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    /// current / max в [0, 1] (0 при max = 0)
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// Боевые статы (damage resolution + AI range checks)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    /// Базовый урон до motion value / variance / crit
    pub attack_power: f32,
    /// Шанс крита в [0, 1]
    pub crit_chance: f32,
    /// Множитель урона при крите
    pub crit_multiplier: f32,
    /// Радиус тела (м), входит в effective range
    pub body_radius: f32,
    /// Скорость передвижения (м/с)
    pub move_speed: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack_power: 20.0,
            crit_chance: 0.05,
            crit_multiplier: 1.5,
            body_radius: 0.5,
            move_speed: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);

        assert_eq!(health.take_damage(30), 30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        // Saturating: снимаем только то что осталось
        assert_eq!(health.take_damage(100), 70);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_and_restore() {
        let mut health = Health::new(100);
        health.take_damage(50);

        health.heal(30);
        assert_eq!(health.current, 80);

        health.heal(100); // Clamp до max
        assert_eq!(health.current, 100);

        health.take_damage(100);
        health.restore_full();
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_health_ratio() {
        let mut health = Health::new(200);
        health.take_damage(50);
        assert_eq!(health.ratio(), 0.75);
        assert_eq!(Health::new(0).ratio(), 0.0);
    }

    #[test]
    fn test_factions() {
        assert!(Actor::new(1).is_ally_of(&Actor::new(1)));
        assert!(!Actor::new(1).is_ally_of(&Actor::new(2)));
    }
}
