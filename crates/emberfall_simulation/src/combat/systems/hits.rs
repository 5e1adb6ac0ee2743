//! Overlap → HitRegistry → DamageEvent

use bevy::prelude::*;

use crate::combat::{roll_damage, DamageEvent, HitRegistry};
use crate::components::{Actor, CombatStats, Health};
use crate::config::CombatTuning;
use crate::events::HitVolumeOverlap;
use crate::state::ActorStateMachine;
use crate::timeline::ActionExecution;
use crate::DeterministicRng;

/// System: overlap notifications от физики → DamageEvent (максимум один на цель за open)
///
/// Игнорируются: self-hit, союзники, мёртвые цели, неактивные volumes.
pub fn process_hit_overlaps(
    mut overlaps: EventReader<HitVolumeOverlap>,
    mut attackers: Query<(&Actor, &CombatStats, &ActionExecution, &mut HitRegistry)>,
    targets: Query<(&Actor, &Health, &ActorStateMachine)>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for overlap in overlaps.read() {
        if overlap.attacker == overlap.target {
            continue;
        }

        let Ok((attacker_actor, stats, execution, mut hits)) = attackers.get_mut(overlap.attacker) else {
            continue;
        };

        // Окно закрылось раньше, чем пришло уведомление
        if !execution.is_hit_volume_active(&overlap.volume) {
            continue;
        }
        let (Some(serial), Some(definition)) = (execution.serial(), execution.definition()) else {
            continue;
        };

        let Ok((target_actor, target_health, target_machine)) = targets.get(overlap.target) else {
            continue;
        };

        if target_machine.is_dead() || !target_health.is_alive() {
            continue;
        }

        if attacker_actor.is_ally_of(target_actor) {
            continue;
        }

        if !hits.register(serial, &overlap.volume, overlap.target) {
            // Уже задет этим взмахом
            continue;
        }

        let charged = execution.active().is_some_and(|a| a.charged);
        let (amount, is_critical) = roll_damage(
            stats,
            definition.motion_value_for(charged),
            tuning.damage_variance,
            &mut rng.rng,
        );

        crate::log(&format!(
            "🗡️ {:?} '{}' [{}] hit {:?}: {} dmg{}",
            overlap.attacker,
            definition.id,
            overlap.volume,
            overlap.target,
            amount,
            if is_critical { " (CRIT)" } else { "" }
        ));

        damage_events.write(DamageEvent {
            target: overlap.target,
            attacker: overlap.attacker,
            amount,
            is_critical,
        });
    }
}
