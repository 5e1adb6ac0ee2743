//! Combat decision (чистая функция, без ECS)
//!
//! Порядок:
//! 1. support способность на раненого союзника (cooldown + range)
//! 2. случайная (uniform) offensive способность из готовых
//! 3. не дотягиваемся → сближение
//! 4. нет готовых способностей → сближение / ожидание
//! 5. нет цели → компаньон к игроку (follow band / last known), монстр к посту

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::{ActionDefinition, ActionId, ActionKind};

use super::{AiConfig, AiRole, Perceived};

/// Способность из loadout'а + готовность по ledger'у
#[derive(Debug, Clone, Copy)]
pub struct AbilityOption<'a> {
    pub definition: &'a ActionDefinition,
    pub ready: bool,
}

#[derive(Debug, Clone)]
pub struct DecisionInput<'a> {
    pub position: Vec3,
    pub radius: f32,
    pub role: AiRole,
    pub config: &'a AiConfig,
    pub arrival_distance: f32,
    pub target: Option<Perceived>,
    pub hurt_ally: Option<Perceived>,
    /// Игрок в радиусе восприятия
    pub player: Option<Perceived>,
    pub last_known_player: Option<Vec3>,
    pub home: Option<Vec3>,
    pub abilities: &'a [AbilityOption<'a>],
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiDecision {
    CastAbility { action: ActionId, target: Entity },
    Approach { target: Entity, point: Vec3 },
    FollowPlayer { target: Entity, point: Vec3 },
    DriftToLastKnown { point: Vec3 },
    ReturnToPost { point: Vec3 },
    Hold,
}

/// Радиус атакующего + радиус цели + базовая дальность способности
pub fn effective_range(self_radius: f32, target_radius: f32, base_range: f32) -> f32 {
    self_radius + target_radius + base_range
}

pub fn in_range(position: Vec3, radius: f32, target: &Perceived, definition: &ActionDefinition) -> bool {
    target.distance_to(position) <= effective_range(radius, target.radius, definition.range)
}

pub fn decide(input: &DecisionInput, rng: &mut impl Rng) -> AiDecision {
    // ========================================================================
    // 1. Support
    // ========================================================================
    if let Some(ally) = input.hurt_ally {
        let usable: Vec<&ActionDefinition> = input
            .abilities
            .iter()
            .filter(|o| o.ready && o.definition.kind == ActionKind::SupportAbility)
            .map(|o| o.definition)
            .filter(|d| in_range(input.position, input.radius, &ally, d))
            .collect();

        if let Some(definition) = usable.choose(rng) {
            return AiDecision::CastAbility {
                action: definition.id.clone(),
                target: ally.entity,
            };
        }
    }

    // ========================================================================
    // 2-4. Offensive
    // ========================================================================
    if let Some(target) = input.target {
        let offensive = || {
            input
                .abilities
                .iter()
                .filter(|o| o.definition.kind == ActionKind::OffensiveAbility)
        };

        let ready: Vec<&ActionDefinition> = offensive()
            .filter(|o| o.ready)
            .map(|o| o.definition)
            .collect();

        // Uniform random среди готовых (без приоритетов)
        if let Some(definition) = ready.choose(rng) {
            if in_range(input.position, input.radius, &target, definition) {
                return AiDecision::CastAbility {
                    action: definition.id.clone(),
                    target: target.entity,
                };
            }
            return AiDecision::Approach {
                target: target.entity,
                point: target.position,
            };
        }

        // Всё на cooldown: держим дистанцию самой короткой способности
        let shortest = offensive()
            .map(|o| o.definition.range)
            .fold(None, |acc: Option<f32>, range| Some(acc.map_or(range, |a| a.min(range))))
            .unwrap_or(0.0);

        if target.distance_to(input.position) > effective_range(input.radius, target.radius, shortest) {
            return AiDecision::Approach {
                target: target.entity,
                point: target.position,
            };
        }
        return AiDecision::Hold;
    }

    // ========================================================================
    // 5. Без цели
    // ========================================================================
    match input.role {
        AiRole::Companion => match (input.player, input.last_known_player) {
            (Some(player), _) => {
                if player.distance_to(input.position) > input.config.follow_max {
                    AiDecision::FollowPlayer {
                        target: player.entity,
                        point: player.position,
                    }
                } else {
                    AiDecision::Hold
                }
            }
            (None, Some(point)) if point.distance(input.position) > input.config.follow_min => {
                AiDecision::DriftToLastKnown { point }
            }
            _ => AiDecision::Hold,
        },
        AiRole::Monster => match input.home {
            Some(home) if home.distance(input.position) > input.arrival_distance => {
                AiDecision::ReturnToPost { point: home }
            }
            _ => AiDecision::Hold,
        },
    }
}

/// Jitter выше этого схлопнул бы интервал в ноль (переоценка каждый тик)
pub const MAX_INTERVAL_JITTER: f32 = 0.9;

/// Интервал до следующей переоценки: base × (1 ± jitter)
pub fn jittered_interval(config: &AiConfig, rng: &mut impl Rng) -> f32 {
    let jitter = config.interval_jitter.abs().min(MAX_INTERVAL_JITTER);
    let factor = 1.0 + rng.gen_range(-jitter..=jitter);
    (config.decision_interval * factor).max(0.0)
}
