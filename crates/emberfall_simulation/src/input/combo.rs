//! Combo resolution: buffered input → продолжение цепочки

use bevy::prelude::*;

use super::{InputBuffer, InputKind};

/// Текущий шаг комбо актора (0 = opener)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ComboProgress {
    pub index: u32,
}

impl ComboProgress {
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn advance(&mut self) {
        self.index += 1;
    }
}

/// Что делать с buffered input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboContinuation {
    /// Следующий (или первый) шаг цепочки
    Step { charged: bool },
    Dodge,
}

/// Pull-based consumption во время combo-input окна.
///
/// Приоритет: charged > attack > dodge. Без следующего шага attack/charge
/// остаются в буфере (истекут по TTL). На закрывающем фронте окна
/// принимается только dodge.
pub fn resolve_continuation(
    buffer: &mut InputBuffer,
    window_open: bool,
    window_closed_now: bool,
    has_next: bool,
    has_dodge: bool,
) -> Option<ComboContinuation> {
    if window_open {
        if let Some(step) = consume_attack(buffer, has_next) {
            return Some(step);
        }
        if has_dodge && buffer.consume(InputKind::Dodge) {
            return Some(ComboContinuation::Dodge);
        }
        return None;
    }

    if window_closed_now && has_dodge && buffer.consume(InputKind::Dodge) {
        return Some(ComboContinuation::Dodge);
    }

    None
}

/// Вне action'а (Idle / Combat-Ready): что начать
pub fn resolve_opener(
    buffer: &mut InputBuffer,
    has_opener: bool,
    has_dodge: bool,
) -> Option<ComboContinuation> {
    if let Some(step) = consume_attack(buffer, has_opener) {
        return Some(step);
    }
    if has_dodge && buffer.consume(InputKind::Dodge) {
        return Some(ComboContinuation::Dodge);
    }
    None
}

fn consume_attack(buffer: &mut InputBuffer, has_step: bool) -> Option<ComboContinuation> {
    if !has_step {
        return None;
    }

    if buffer.consume(InputKind::ChargedAttack) {
        // Charge поглощает и обычное нажатие того же удара
        buffer.consume(InputKind::Attack);
        return Some(ComboContinuation::Step { charged: true });
    }
    if buffer.consume(InputKind::Attack) {
        return Some(ComboContinuation::Step { charged: false });
    }
    None
}
