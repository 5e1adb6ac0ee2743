//! ActionDefinition: удары оружием, dodge, AI abilities
//!
//! Definitions неизменяемые, авторятся offline (`data/actions.ron`).
//! Все тайминги на одной нормализованной шкале `[0, 1]`: definition не
//! зависит от скорости проигрывания клипа.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CombatError;

/// Id action'а в [`ActionTable`](super::ActionTable)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hit volume на риге актора ("blade", "left_fist", "tail")
///
/// Физика шлёт overlap'ы по volume, executor включает/выключает по volume.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitVolumeTag(pub String);

impl From<&str> for HitVolumeTag {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for HitVolumeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Назначение action'а (какой state его исполняет)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Удар оружием игрока, шаг комбо (Attacking)
    WeaponAttack,
    /// Перекат / рывок (Dodging)
    Dodge,
    /// AI ability по врагу (UsingAbility)
    OffensiveAbility,
    /// AI ability по раненому союзнику (UsingAbility)
    SupportAbility,
}

/// Эффект окна [`TimedWindow`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WindowEffect {
    /// Hit volume включён, пока окно открыто
    HitVolume { tag: HitVolumeTag },
    /// Поворот актора запрещён
    TurnLock,
    /// Урон не прерывает action
    SuperArmor,
    /// Буферизованный attack/dodge может продолжить цепочку
    ComboInput,
    /// One-shot звук на открытии
    Sound { cue: String },
    /// One-shot частицы на открытии
    Particle { cue: String },
}

impl WindowEffect {
    pub fn hit_volume_tag(&self) -> Option<&HitVolumeTag> {
        match self {
            WindowEffect::HitVolume { tag } => Some(tag),
            _ => None,
        }
    }
}

/// Окно `[start, end]` на нормализованной шкале action'а
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedWindow {
    pub start: f32,
    pub end: f32,
    pub effect: WindowEffect,
}

impl TimedWindow {
    pub fn new(start: f32, end: f32, effect: WindowEffect) -> Self {
        Self { start, end, effect }
    }
}

fn default_motion_value() -> f32 {
    1.0
}

fn default_charge_multiplier() -> f32 {
    1.5
}

// ============================================================================
// ActionDefinition
// ============================================================================

/// Авторский action (read-only после загрузки)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: ActionId,
    pub kind: ActionKind,
    /// Клип для animation collaborator'а
    pub clip: String,
    /// Секунды до повторного использования
    #[serde(default)]
    pub cooldown: f32,
    /// Длительность в секундах (клип на скорости 1.0)
    pub duration: f32,
    #[serde(default)]
    pub windows: Vec<TimedWindow>,
    /// Шаг в цепочке комбо (0 = opener)
    #[serde(default)]
    pub combo_index: u32,
    #[serde(default)]
    pub supports_charge: bool,
    /// Множитель к attack power атакующего
    #[serde(default = "default_motion_value")]
    pub motion_value: f32,
    /// Доп. множитель motion value для charged варианта
    #[serde(default = "default_charge_multiplier")]
    pub charge_multiplier: f32,
    /// Базовая дальность ability (м), плюс радиусы обоих акторов
    #[serde(default)]
    pub range: f32,
    /// Смещение за весь клип в local space актора (x = вправо, z = вперёд)
    #[serde(default)]
    pub root_motion: Option<[f32; 3]>,
}

impl ActionDefinition {
    /// Минимальный definition без окон (builder для данных из кода)
    pub fn new(id: impl Into<String>, kind: ActionKind, duration: f32) -> Self {
        let id = id.into();
        Self {
            clip: id.clone(),
            id: ActionId(id),
            kind,
            cooldown: 0.0,
            duration,
            windows: Vec::new(),
            combo_index: 0,
            supports_charge: false,
            motion_value: default_motion_value(),
            charge_multiplier: default_charge_multiplier(),
            range: 0.0,
            root_motion: None,
        }
    }

    pub fn with_window(mut self, start: f32, end: f32, effect: WindowEffect) -> Self {
        self.windows.push(TimedWindow::new(start, end, effect));
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_combo_index(mut self, combo_index: u32) -> Self {
        self.combo_index = combo_index;
        self
    }

    pub fn with_charge(mut self, charge_multiplier: f32) -> Self {
        self.supports_charge = true;
        self.charge_multiplier = charge_multiplier;
        self
    }

    pub fn with_motion_value(mut self, motion_value: f32) -> Self {
        self.motion_value = motion_value;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_root_motion(mut self, displacement: [f32; 3]) -> Self {
        self.root_motion = Some(displacement);
        self
    }

    /// Итоговый motion value (с учётом charge)
    pub fn motion_value_for(&self, charged: bool) -> f32 {
        if charged && self.supports_charge {
            self.motion_value * self.charge_multiplier
        } else {
            self.motion_value
        }
    }

    /// Проверка инвариантов, на которые опирается executor
    pub fn validate(&self) -> Result<(), CombatError> {
        if !(self.duration > 0.0) {
            return Err(CombatError::InvalidDefinition {
                action: self.id.clone(),
                reason: format!("duration must be positive, got {}", self.duration),
            });
        }

        if self.cooldown < 0.0 || !self.cooldown.is_finite() {
            return Err(CombatError::InvalidDefinition {
                action: self.id.clone(),
                reason: format!("cooldown must be >= 0, got {}", self.cooldown),
            });
        }

        if self.motion_value < 0.0 {
            return Err(CombatError::InvalidDefinition {
                action: self.id.clone(),
                reason: format!("motion value must be >= 0, got {}", self.motion_value),
            });
        }

        for window in &self.windows {
            let in_range = (0.0..=1.0).contains(&window.start) && (0.0..=1.0).contains(&window.end);
            if !in_range || window.start > window.end {
                return Err(CombatError::InvalidWindow {
                    action: self.id.clone(),
                    start: window.start,
                    end: window.end,
                });
            }
        }

        Ok(())
    }
}
