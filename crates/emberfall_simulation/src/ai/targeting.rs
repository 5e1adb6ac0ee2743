//! Spatial query (overlap sphere) + выбор цели

use bevy::prelude::*;

/// Snapshot актора, как его видит decision loop (собирается раз за тик)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perceived {
    pub entity: Entity,
    pub position: Vec3,
    pub radius: f32,
    pub health_ratio: f32,
    pub faction_id: u64,
    pub alive: bool,
    pub is_player: bool,
}

impl Perceived {
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

/// Кандидаты, чей центр внутри сферы и которые прошли accept; ближайшие первыми.
///
/// При равной дистанции порядок по Entity (детерминизм).
pub fn overlap_sphere<'a>(
    center: Vec3,
    radius: f32,
    candidates: &'a [Perceived],
    mut accept: impl FnMut(&Perceived) -> bool,
) -> Vec<&'a Perceived> {
    let radius_sq = radius * radius;

    let mut hits: Vec<(f32, &Perceived)> = candidates
        .iter()
        .filter(|c| accept(*c))
        .map(|c| (c.position.distance_squared(center), c))
        .filter(|(distance_sq, _)| *distance_sq <= radius_sq)
        .collect();

    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.entity.cmp(&b.1.entity)));
    hits.into_iter().map(|(_, c)| c).collect()
}

/// Цель валидна: жива, враждебна, не мы, в радиусе восприятия
pub fn is_valid_target(
    candidate: &Perceived,
    self_entity: Entity,
    faction_id: u64,
    position: Vec3,
    perception_radius: f32,
) -> bool {
    candidate.entity != self_entity
        && candidate.alive
        && candidate.faction_id != faction_id
        && candidate.distance_to(position) <= perception_radius
}

/// Ближайший враг в радиусе обнаружения
pub fn nearest_hostile(
    self_entity: Entity,
    faction_id: u64,
    position: Vec3,
    detection_radius: f32,
    candidates: &[Perceived],
) -> Option<Perceived> {
    overlap_sphere(position, detection_radius, candidates, |c| {
        c.entity != self_entity && c.alive && c.faction_id != faction_id
    })
    .first()
    .map(|c| **c)
}

/// Самый раненый союзник (включая себя) ниже порога
pub fn most_hurt_ally(
    faction_id: u64,
    position: Vec3,
    perception_radius: f32,
    threshold: f32,
    candidates: &[Perceived],
) -> Option<Perceived> {
    overlap_sphere(position, perception_radius, candidates, |c| {
        c.alive && c.faction_id == faction_id && c.health_ratio < threshold
    })
    .into_iter()
    .min_by(|a, b| {
        a.health_ratio
            .total_cmp(&b.health_ratio)
            .then(a.entity.cmp(&b.entity))
    })
    .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(index: u32, x: f32, faction_id: u64) -> Perceived {
        Perceived {
            entity: Entity::from_raw(index),
            position: Vec3::new(x, 0.0, 0.0),
            radius: 0.5,
            health_ratio: 1.0,
            faction_id,
            alive: true,
            is_player: false,
        }
    }

    #[test]
    fn test_overlap_sphere_sorted_by_distance() {
        let candidates = [actor(1, 8.0, 2), actor(2, 3.0, 2), actor(3, 20.0, 2)];
        let hits = overlap_sphere(Vec3::ZERO, 10.0, &candidates, |_| true);

        let entities: Vec<_> = hits.iter().map(|c| c.entity.index()).collect();
        assert_eq!(entities, vec![2, 1]);
    }

    #[test]
    fn test_nearest_hostile_excludes_self_allies_and_dead() {
        let mut dead = actor(4, 1.0, 2);
        dead.alive = false;
        let candidates = [
            actor(1, 0.0, 1), // self
            actor(2, 2.0, 1), // ally
            dead,
            actor(5, 6.0, 2),
        ];

        let target = nearest_hostile(Entity::from_raw(1), 1, Vec3::ZERO, 12.0, &candidates);
        assert_eq!(target.map(|t| t.entity), Some(Entity::from_raw(5)));
    }

    #[test]
    fn test_most_hurt_ally() {
        let mut hurt = actor(2, 2.0, 1);
        hurt.health_ratio = 0.3;
        let mut scratched = actor(3, 2.0, 1);
        scratched.health_ratio = 0.45;
        let mut enemy = actor(4, 1.0, 2);
        enemy.health_ratio = 0.1;

        let candidates = [actor(1, 0.0, 1), hurt, scratched, enemy];
        let ally = most_hurt_ally(1, Vec3::ZERO, 25.0, 0.5, &candidates);
        assert_eq!(ally.map(|a| a.entity), Some(Entity::from_raw(2)));
    }
}
