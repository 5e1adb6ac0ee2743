//! AI combat decision loop
//!
//! - cooldown: CooldownLedger (per-actor, тикается раз в кадр)
//! - components: AiBrain, AiConfig, AiRole, HomePost
//! - targeting: overlap_sphere + выбор цели / раненого союзника
//! - decision: чистая функция decide (unit-тестируется без ECS)
//! - systems: ai_react_to_damage, ai_combat_decision
//!
//! AI ничего не исполняет сам: он выдаёт StateChangeRequest и пишет
//! MovementCommand, дальше работает общая state machine.

pub mod components;
pub mod cooldown;
pub mod decision;
pub mod systems;
pub mod targeting;

#[cfg(test)]
mod decision_tests;

pub use components::{AiBrain, AiConfig, AiRole, HomePost};
pub use cooldown::{tick_cooldowns, CooldownLedger, COOLDOWN_EPSILON};
pub use decision::{decide, effective_range, AbilityOption, AiDecision, DecisionInput};
pub use systems::{ai_combat_decision, ai_react_to_damage};
pub use targeting::{nearest_hostile, overlap_sphere, Perceived};
