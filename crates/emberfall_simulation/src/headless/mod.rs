//! Headless collaborators: stand-in для движка (тесты, headless runner)
//!
//! В игре эти контракты выполняет bridge (NavigationAgent, AnimationTree,
//! Area3D hitbox). Здесь упрощённо:
//! - movement: MovementCommand → Transform (прямая линия, без navmesh)
//! - root motion: CombatSignal::Displace → Transform
//! - overlap: активный hit volume = сфера перед актором (или цель способности)

use std::collections::HashMap;

use bevy::prelude::*;

use crate::ai::effective_range;
use crate::combat::process_hit_overlaps;
use crate::components::{CombatStats, Health, MovementCommand, NavigationState};
use crate::config::CombatTuning;
use crate::events::{flush_signals, CombatSignal, HitVolumeOverlap};
use crate::timeline::{run_action_timelines, ActionExecution};

/// Геометрия hit volume'ов актора: сфера `radius` на `reach` метров вперёд (+Z local)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HitVolumeShape {
    pub radius: f32,
    pub reach: f32,
}

impl Default for HitVolumeShape {
    fn default() -> Self {
        Self {
            radius: 0.6,
            reach: 1.0,
        }
    }
}

pub struct HeadlessCollaboratorsPlugin;

impl Plugin for HeadlessCollaboratorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            detect_hit_overlaps
                .after(run_action_timelines)
                .before(process_hit_overlaps),
        )
        .add_systems(
            FixedUpdate,
            (apply_root_motion, face_action_targets, integrate_movement)
                .chain()
                .after(flush_signals),
        );
    }
}

/// Facing: +Z local смотрит вдоль `direction` (yaw only)
pub fn facing_towards(direction: Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    (planar.length_squared() > f32::EPSILON).then(|| Quat::from_rotation_y(planar.x.atan2(planar.z)))
}

/// System: активные hit volumes → HitVolumeOverlap (каждый тик, пока пересекаются)
///
/// Action с целью (способности AI) бьёт только свою цель в пределах
/// effective range. Остальные: сфера `HitVolumeShape` перед актором.
pub fn detect_hit_overlaps(
    attackers: Query<(Entity, &Transform, &ActionExecution, &HitVolumeShape, &CombatStats)>,
    targets: Query<(Entity, &Transform, &CombatStats, &Health)>,
    mut overlaps: EventWriter<HitVolumeOverlap>,
) {
    for (attacker, transform, execution, shape, attacker_stats) in attackers.iter() {
        let volumes = execution.active_hit_volumes();
        let Some(active) = execution.active() else {
            continue;
        };
        if volumes.is_empty() {
            continue;
        }

        if let Some(target) = active.target {
            let Ok((_, target_transform, stats, health)) = targets.get(target) else {
                continue;
            };
            let range = effective_range(attacker_stats.body_radius, stats.body_radius, active.definition.range);
            if health.is_alive() && target_transform.translation.distance(transform.translation) <= range {
                for volume in volumes {
                    overlaps.write(HitVolumeOverlap {
                        attacker,
                        volume: volume.clone(),
                        target,
                    });
                }
            }
            continue;
        }

        let center = transform.translation + transform.rotation * (Vec3::Z * shape.reach);

        for (target, target_transform, stats, health) in targets.iter() {
            if target == attacker || !health.is_alive() {
                continue;
            }

            let reach = shape.radius + stats.body_radius;
            if target_transform.translation.distance_squared(center) > reach * reach {
                continue;
            }

            for volume in volumes {
                overlaps.write(HitVolumeOverlap {
                    attacker,
                    volume: volume.clone(),
                    target,
                });
            }
        }
    }
}

/// System: Displace сигналы → Transform
pub fn apply_root_motion(mut signals: EventReader<CombatSignal>, mut transforms: Query<&mut Transform>) {
    for signal in signals.read() {
        let CombatSignal::Displace { entity, delta } = signal else {
            continue;
        };
        if let Ok(mut transform) = transforms.get_mut(*entity) {
            transform.translation += *delta;
        }
    }
}

/// System: актор с action'ом на цель разворачивается к ней (если не turn-locked)
pub fn face_action_targets(mut actors: Query<(Entity, &mut Transform, &ActionExecution)>) {
    let positions: HashMap<Entity, Vec3> = actors
        .iter()
        .map(|(entity, transform, _)| (entity, transform.translation))
        .collect();

    for (_, mut transform, execution) in actors.iter_mut() {
        if execution.turn_locked() {
            continue;
        }
        let Some(target) = execution.active().and_then(|a| a.target) else {
            continue;
        };
        let Some(position) = positions.get(&target) else {
            continue;
        };
        if let Some(rotation) = facing_towards(*position - transform.translation) {
            transform.rotation = rotation;
        }
    }
}

/// System: MovementCommand → Transform + arrival в NavigationState
pub fn integrate_movement(
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut movers: Query<(
        Entity,
        &mut Transform,
        &MovementCommand,
        &mut NavigationState,
        &ActionExecution,
        &CombatStats,
    )>,
) {
    let delta = time.delta_secs();

    let bodies: HashMap<Entity, (Vec3, f32)> = movers
        .iter()
        .map(|(entity, transform, _, _, _, stats)| (entity, (transform.translation, stats.body_radius)))
        .collect();

    for (entity, mut transform, command, mut navigation, execution, stats) in movers.iter_mut() {
        let (goal, speed, stop_distance) = match command {
            MovementCommand::MoveToPosition { target, speed } => {
                // Новая цель → сбрасываем флаг прибытия
                if navigation.last_target != Some(*target) {
                    navigation.last_target = Some(*target);
                    navigation.is_target_reached = false;
                }
                (*target, *speed, tuning.arrival_distance)
            }
            MovementCommand::FollowEntity { target, speed } => {
                let Some((position, radius)) = bodies.get(target) else {
                    continue;
                };
                (
                    *position,
                    *speed,
                    tuning.arrival_distance + stats.body_radius + radius,
                )
            }
            MovementCommand::Idle | MovementCommand::Stop => continue,
        };

        let to_goal = Vec3::new(
            goal.x - transform.translation.x,
            0.0,
            goal.z - transform.translation.z,
        );
        let distance = to_goal.length();

        if distance <= stop_distance {
            if !navigation.is_target_reached {
                navigation.is_target_reached = true;
                crate::log(&format!("📍 {:?} arrived ({:.2}m)", entity, distance));
            }
            continue;
        }

        navigation.is_target_reached = false;
        let step = (speed * delta).min(distance - stop_distance);
        let direction = to_goal / distance;
        transform.translation += direction * step;

        if !execution.turn_locked() {
            if let Some(rotation) = facing_towards(direction) {
                transform.rotation = rotation;
            }
        }
    }
}
