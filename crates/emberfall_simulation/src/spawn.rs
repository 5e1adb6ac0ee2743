//! Spawn helpers: игрок, компаньон, монстры
//!
//! Всё остальное (state machine, executor, буферы, ledger'ы) приезжает через
//! `#[require]` на Actor.

use bevy::prelude::*;

use crate::actions::{ActionLoadout, ActionTable};
use crate::ai::{AiBrain, AiRole, HomePost};
use crate::components::{Actor, CombatStats, Health, Player};
use crate::headless::HitVolumeShape;

pub const PLAYER_FACTION: u64 = 1;
pub const MONSTER_FACTION: u64 = 2;

pub const PLAYER_COMBO: [&str; 3] = ["sword_1", "sword_2", "sword_3"];
pub const PLAYER_DODGE: &str = "dodge_roll";

/// Игрок: меч (3 шага комбо) + dodge roll
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    let loadout = match world.get_resource::<ActionTable>() {
        Some(table) => ActionLoadout::weapon(table, &PLAYER_COMBO, Some(PLAYER_DODGE)),
        None => ActionLoadout {
            combo_chain: PLAYER_COMBO.iter().map(|id| (*id).into()).collect(),
            dodge: Some(PLAYER_DODGE.into()),
            abilities: Vec::new(),
        },
    };

    let entity = world
        .spawn((
            Name::new("Player"),
            Actor::new(PLAYER_FACTION),
            Player,
            Transform::from_translation(position),
            Health::new(150),
            CombatStats::default(),
            loadout,
            HitVolumeShape::default(),
        ))
        .id();

    crate::log(&format!("🧍 Spawned player {:?} at {:?}", entity, position));
    entity
}

/// Компаньон игрока: дальняя атака + лечение, держится рядом с игроком
pub fn spawn_companion(world: &mut World, position: Vec3) -> Entity {
    let entity = world
        .spawn((
            Name::new("Companion"),
            Actor::new(PLAYER_FACTION),
            AiBrain::default(),
            AiRole::Companion,
            Transform::from_translation(position),
            Health::new(80),
            CombatStats {
                attack_power: 12.0,
                ..default()
            },
            ActionLoadout::abilities(&["spirit_bolt", "healing_light"]),
            HitVolumeShape::default(),
        ))
        .id();

    crate::log(&format!("🧚 Spawned companion {:?} at {:?}", entity, position));
    entity
}

/// Монстр с набором способностей; `home` = пост, к которому он возвращается
pub fn spawn_monster(world: &mut World, position: Vec3, abilities: &[&str], home: Option<Vec3>) -> Entity {
    let mut monster = world.spawn((
        Name::new("Monster"),
        Actor::new(MONSTER_FACTION),
        AiBrain::default(),
        AiRole::Monster,
        Transform::from_translation(position),
        Health::new(60),
        CombatStats {
            attack_power: 10.0,
            move_speed: 3.5,
            ..default()
        },
        ActionLoadout::abilities(abilities),
        HitVolumeShape::default(),
    ));

    if let Some(position) = home {
        monster.insert(HomePost { position });
    }

    let entity = monster.id();
    crate::log(&format!(
        "🐺 Spawned monster {:?} at {:?} with {:?}",
        entity, position, abilities
    ));
    entity
}
