//! InputBuffer: короткоживущие флаги нажатий с TTL

use bevy::prelude::*;

/// Что нажал игрок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum InputKind {
    Attack,
    ChargedAttack,
    Dodge,
}

impl InputKind {
    const COUNT: usize = 3;

    fn slot(self) -> usize {
        match self {
            InputKind::Attack => 0,
            InputKind::ChargedAttack => 1,
            InputKind::Dodge => 2,
        }
    }
}

/// Буфер нажатий актора: remaining TTL на каждый вид ввода (0 = пусто).
///
/// Consumption деструктивный: `consume` возвращает true ровно один раз на нажатие.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct InputBuffer {
    remaining: [f32; InputKind::COUNT],
}

impl InputBuffer {
    /// Повторное нажатие перезапускает TTL
    pub fn press(&mut self, kind: InputKind, ttl: f32) {
        self.remaining[kind.slot()] = ttl.max(0.0);
    }

    pub fn is_pending(&self, kind: InputKind) -> bool {
        self.remaining[kind.slot()] > 0.0
    }

    pub fn remaining(&self, kind: InputKind) -> f32 {
        self.remaining[kind.slot()]
    }

    /// Read-and-clear
    pub fn consume(&mut self, kind: InputKind) -> bool {
        let pending = self.is_pending(kind);
        self.remaining[kind.slot()] = 0.0;
        pending
    }

    pub fn tick(&mut self, delta: f32) {
        for remaining in &mut self.remaining {
            *remaining = (*remaining - delta).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.remaining = [0.0; InputKind::COUNT];
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.iter().all(|r| *r <= 0.0)
    }
}
