//! CooldownLedger: per-actor cooldown'ы способностей
//!
//! Ledger принадлежит актору (не глобальный менеджер по NPC id). Авторская
//! таблица action'ов read-only, здесь только runtime остатки.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::actions::ActionId;

/// Погрешность f32 накопления (10.0 - 9.9 - 0.1 != 0.0)
pub const COOLDOWN_EPSILON: f32 = 1e-4;

#[derive(Component, Debug, Clone, Default)]
pub struct CooldownLedger {
    remaining: HashMap<ActionId, f32>,
}

impl CooldownLedger {
    /// Commit: всегда перезаписывает полным duration
    pub fn start(&mut self, action: ActionId, duration: f32) {
        self.remaining.insert(action, duration.max(0.0));
    }

    /// Остаток; незнакомый action регистрируется с 0 (invariant → safe default)
    pub fn remaining(&mut self, action: &ActionId) -> f32 {
        if let Some(remaining) = self.remaining.get(action) {
            return *remaining;
        }

        crate::log(&format!(
            "⏱️ cooldown '{}' was never registered ({}), registering as ready",
            action,
            crate::error::ErrorSeverity::Invariant.as_str()
        ));
        self.remaining.insert(action.clone(), 0.0);
        0.0
    }

    /// CanUseSkill
    pub fn is_ready(&self, action: &ActionId) -> bool {
        self.remaining
            .get(action)
            .map_or(true, |remaining| *remaining <= COOLDOWN_EPSILON)
    }

    /// Монотонно уменьшает все остатки, clamp в 0
    pub fn tick(&mut self, delta: f32) {
        for remaining in self.remaining.values_mut() {
            *remaining = (*remaining - delta).max(0.0);
        }
    }

    pub fn reset(&mut self) {
        self.remaining.clear();
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Один тик cooldown'ов всех акторов
pub fn tick_cooldowns(time: Res<Time>, mut ledgers: Query<&mut CooldownLedger>) {
    let delta = time.delta_secs();

    for mut ledger in ledgers.iter_mut() {
        if !ledger.is_empty() {
            ledger.tick(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill() -> ActionId {
        ActionId::from("golem_slam")
    }

    #[test]
    fn test_ten_second_cooldown_boundary() {
        let mut ledger = CooldownLedger::default();
        ledger.start(skill(), 10.0);

        ledger.tick(9.9);
        assert!(!ledger.is_ready(&skill()));

        ledger.tick(0.1);
        assert!(ledger.is_ready(&skill()));
    }

    #[test]
    fn test_clamps_at_zero() {
        let mut ledger = CooldownLedger::default();
        ledger.start(skill(), 1.0);

        ledger.tick(5.0);
        assert_eq!(ledger.remaining(&skill()), 0.0);
    }

    #[test]
    fn test_start_overwrites_with_full_duration() {
        let mut ledger = CooldownLedger::default();
        ledger.start(skill(), 8.0);
        ledger.tick(6.0);

        ledger.start(skill(), 8.0);
        assert_eq!(ledger.remaining(&skill()), 8.0);
    }

    #[test]
    fn test_never_increases_while_ticking() {
        let mut ledger = CooldownLedger::default();
        ledger.start(skill(), 3.0);

        let mut previous = ledger.remaining(&skill());
        for _ in 0..300 {
            ledger.tick(1.0 / 64.0);
            let current = ledger.remaining(&skill());
            assert!(current <= previous);
            assert!(current >= 0.0);
            previous = current;
        }
    }

    #[test]
    fn test_unknown_action_auto_registers_ready() {
        let mut ledger = CooldownLedger::default();
        let unknown = ActionId::from("never_used");

        assert!(ledger.is_ready(&unknown));
        assert_eq!(ledger.remaining(&unknown), 0.0);
        assert_eq!(ledger.len(), 1);
    }
}
