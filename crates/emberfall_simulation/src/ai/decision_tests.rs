//! Tests for the pure combat decision function.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::{ActionDefinition, ActionId, ActionKind};

use super::decision::{decide, jittered_interval, AbilityOption, AiDecision, DecisionInput, MAX_INTERVAL_JITTER};
use super::{AiConfig, AiRole, Perceived};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn perceived(index: u32, x: f32, health_ratio: f32) -> Perceived {
    Perceived {
        entity: Entity::from_raw(index),
        position: Vec3::new(x, 0.0, 0.0),
        radius: 0.5,
        health_ratio,
        faction_id: 2,
        alive: true,
        is_player: false,
    }
}

fn bite() -> ActionDefinition {
    ActionDefinition::new("wolf_bite", ActionKind::OffensiveAbility, 0.8)
        .with_cooldown(2.0)
        .with_range(1.5)
}

fn lunge() -> ActionDefinition {
    ActionDefinition::new("wolf_lunge", ActionKind::OffensiveAbility, 1.0)
        .with_cooldown(6.0)
        .with_range(4.0)
}

fn heal() -> ActionDefinition {
    ActionDefinition::new("healing_light", ActionKind::SupportAbility, 1.2)
        .with_cooldown(10.0)
        .with_range(8.0)
}

fn input<'a>(config: &'a AiConfig, role: AiRole, abilities: &'a [AbilityOption<'a>]) -> DecisionInput<'a> {
    DecisionInput {
        position: Vec3::ZERO,
        radius: 0.5,
        role,
        config,
        arrival_distance: 0.5,
        target: None,
        hurt_ally: None,
        player: None,
        last_known_player: None,
        home: None,
        abilities,
    }
}

#[test]
fn test_no_target_no_player_drifts_to_last_known_position() {
    let config = AiConfig::default();
    let mut decision_input = input(&config, AiRole::Companion, &[]);
    decision_input.last_known_player = Some(Vec3::new(15.0, 0.0, 4.0));

    let decision = decide(&decision_input, &mut rng());
    assert_eq!(
        decision,
        AiDecision::DriftToLastKnown {
            point: Vec3::new(15.0, 0.0, 4.0)
        }
    );
}

#[test]
fn test_companion_holds_inside_follow_band() {
    let config = AiConfig::default();
    let mut decision_input = input(&config, AiRole::Companion, &[]);
    let mut player = perceived(1, 4.0, 1.0);
    player.is_player = true;
    decision_input.player = Some(player);

    assert_eq!(decide(&decision_input, &mut rng()), AiDecision::Hold);

    // Игрок ушёл за внешний край band'а → догоняем
    decision_input.player = Some(Perceived {
        position: Vec3::new(9.0, 0.0, 0.0),
        ..player
    });
    assert!(matches!(
        decide(&decision_input, &mut rng()),
        AiDecision::FollowPlayer { .. }
    ));
}

#[test]
fn test_monster_returns_to_post() {
    let config = AiConfig::default();
    let mut decision_input = input(&config, AiRole::Monster, &[]);
    decision_input.home = Some(Vec3::new(0.0, 0.0, 10.0));

    assert_eq!(
        decide(&decision_input, &mut rng()),
        AiDecision::ReturnToPost {
            point: Vec3::new(0.0, 0.0, 10.0)
        }
    );

    decision_input.home = Some(Vec3::new(0.2, 0.0, 0.0));
    assert_eq!(decide(&decision_input, &mut rng()), AiDecision::Hold);
}

#[test]
fn test_casts_when_in_effective_range() {
    let config = AiConfig::default();
    let bite = bite();
    let abilities = [AbilityOption {
        definition: &bite,
        ready: true,
    }];
    let mut decision_input = input(&config, AiRole::Monster, &abilities);
    // 0.5 + 0.5 + 1.5 = 2.5 м
    decision_input.target = Some(perceived(9, 2.4, 1.0));

    assert_eq!(
        decide(&decision_input, &mut rng()),
        AiDecision::CastAbility {
            action: ActionId::from("wolf_bite"),
            target: Entity::from_raw(9)
        }
    );
}

#[test]
fn test_approaches_when_out_of_range() {
    let config = AiConfig::default();
    let bite = bite();
    let abilities = [AbilityOption {
        definition: &bite,
        ready: true,
    }];
    let mut decision_input = input(&config, AiRole::Monster, &abilities);
    decision_input.target = Some(perceived(9, 6.0, 1.0));

    assert_eq!(
        decide(&decision_input, &mut rng()),
        AiDecision::Approach {
            target: Entity::from_raw(9),
            point: Vec3::new(6.0, 0.0, 0.0)
        }
    );
}

#[test]
fn test_all_on_cooldown_closes_distance_then_holds() {
    let config = AiConfig::default();
    let bite = bite();
    let abilities = [AbilityOption {
        definition: &bite,
        ready: false,
    }];
    let mut decision_input = input(&config, AiRole::Monster, &abilities);

    decision_input.target = Some(perceived(9, 8.0, 1.0));
    assert!(matches!(
        decide(&decision_input, &mut rng()),
        AiDecision::Approach { .. }
    ));

    decision_input.target = Some(perceived(9, 2.0, 1.0));
    assert_eq!(decide(&decision_input, &mut rng()), AiDecision::Hold);
}

#[test]
fn test_random_pick_only_among_ready_abilities() {
    let config = AiConfig::default();
    let bite = bite();
    let lunge = lunge();
    let abilities = [
        AbilityOption {
            definition: &bite,
            ready: false,
        },
        AbilityOption {
            definition: &lunge,
            ready: true,
        },
    ];
    let mut decision_input = input(&config, AiRole::Monster, &abilities);
    decision_input.target = Some(perceived(9, 2.0, 1.0));

    let mut rng = rng();
    for _ in 0..20 {
        assert_eq!(
            decide(&decision_input, &mut rng),
            AiDecision::CastAbility {
                action: ActionId::from("wolf_lunge"),
                target: Entity::from_raw(9)
            }
        );
    }
}

#[test]
fn test_random_pick_covers_every_ready_ability() {
    let config = AiConfig::default();
    let bite = bite();
    let lunge = lunge();
    let abilities = [
        AbilityOption {
            definition: &bite,
            ready: true,
        },
        AbilityOption {
            definition: &lunge,
            ready: true,
        },
    ];
    let mut decision_input = input(&config, AiRole::Monster, &abilities);
    decision_input.target = Some(perceived(9, 1.0, 1.0));

    let mut rng = rng();
    let mut seen_bite = false;
    let mut seen_lunge = false;
    for _ in 0..64 {
        if let AiDecision::CastAbility { action, .. } = decide(&decision_input, &mut rng) {
            seen_bite |= action.as_str() == "wolf_bite";
            seen_lunge |= action.as_str() == "wolf_lunge";
        }
    }
    assert!(seen_bite && seen_lunge);
}

#[test]
fn test_support_takes_priority_over_offense() {
    let config = AiConfig::default();
    let bite = bite();
    let heal = heal();
    let abilities = [
        AbilityOption {
            definition: &bite,
            ready: true,
        },
        AbilityOption {
            definition: &heal,
            ready: true,
        },
    ];
    let mut decision_input = input(&config, AiRole::Companion, &abilities);
    decision_input.target = Some(perceived(9, 1.0, 1.0));
    decision_input.hurt_ally = Some(perceived(3, 5.0, 0.3));

    assert_eq!(
        decide(&decision_input, &mut rng()),
        AiDecision::CastAbility {
            action: ActionId::from("healing_light"),
            target: Entity::from_raw(3)
        }
    );
}

#[test]
fn test_support_on_cooldown_falls_back_to_offense() {
    let config = AiConfig::default();
    let bite = bite();
    let heal = heal();
    let abilities = [
        AbilityOption {
            definition: &bite,
            ready: true,
        },
        AbilityOption {
            definition: &heal,
            ready: false,
        },
    ];
    let mut decision_input = input(&config, AiRole::Companion, &abilities);
    decision_input.target = Some(perceived(9, 1.0, 1.0));
    decision_input.hurt_ally = Some(perceived(3, 5.0, 0.3));

    assert_eq!(
        decide(&decision_input, &mut rng()),
        AiDecision::CastAbility {
            action: ActionId::from("wolf_bite"),
            target: Entity::from_raw(9)
        }
    );
}

#[test]
fn test_jittered_interval_stays_in_band() {
    let config = AiConfig::default();
    let mut rng = rng();
    let samples: Vec<f32> = (0..500).map(|_| jittered_interval(&config, &mut rng)).collect();

    let low = config.decision_interval * (1.0 - config.interval_jitter);
    let high = config.decision_interval * (1.0 + config.interval_jitter);
    for interval in &samples {
        assert!(
            (low - 1e-5..=high + 1e-5).contains(interval),
            "interval {} outside [{}, {}]",
            interval,
            low,
            high
        );
    }

    // Оба края band'а реально достигаются
    let min = samples.iter().copied().fold(f32::MAX, f32::min);
    let max = samples.iter().copied().fold(f32::MIN, f32::max);
    assert!(min < low + 0.02, "min = {}", min);
    assert!(max > high - 0.02, "max = {}", max);
}

#[test]
fn test_oversized_jitter_never_zeroes_interval() {
    let config = AiConfig {
        interval_jitter: 3.0,
        ..AiConfig::default()
    };
    let mut rng = rng();

    let floor = config.decision_interval * (1.0 - MAX_INTERVAL_JITTER);
    for _ in 0..500 {
        let interval = jittered_interval(&config, &mut rng);
        assert!(interval >= floor - 1e-5, "interval = {}", interval);
    }
}
