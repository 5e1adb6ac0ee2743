//! HitRegistry: кого уже задел текущий attack instance
//!
//! Один взмах = максимум один DamageEvent на цель, сколько бы hit volumes
//! (левый/правый кулак, клинок/гарда) у action ни было. Набор сбрасывается
//! только когда уже открывавшийся volume снова входит в On (или action
//! перезапускается: новый serial).

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::actions::HitVolumeTag;

/// Задетые цели одного attack instance
#[derive(Debug, Clone, Default)]
struct InstanceHits {
    opened: HashSet<HitVolumeTag>,
    targets: HashSet<Entity>,
}

#[derive(Component, Debug, Clone, Default)]
pub struct HitRegistry {
    /// attack instance serial → задетые цели
    hit: HashMap<u64, InstanceHits>,
}

impl HitRegistry {
    /// Volume открылся. Первое открытие тега добавляет его к instance,
    /// повторное (re-enter On) - чистый набор целей.
    pub fn begin(&mut self, serial: u64, tag: HitVolumeTag) {
        let instance = self.hit.entry(serial).or_default();
        if !instance.opened.insert(tag) {
            instance.targets.clear();
        }
    }

    /// Новый attack instance: наборы прошлых instance'ов больше не нужны
    pub fn retain_instance(&mut self, serial: u64) {
        self.hit.retain(|instance, _| *instance == serial);
    }

    /// true - цель задета впервые за instance (нужно наносить урон)
    pub fn register(&mut self, serial: u64, tag: &HitVolumeTag, target: Entity) -> bool {
        let instance = self.hit.entry(serial).or_default();
        if !instance.opened.contains(tag) {
            crate::log(&format!(
                "🗡️ hit registry: volume '{}' of instance {} was never opened ({}), registering",
                tag,
                serial,
                crate::error::ErrorSeverity::Invariant.as_str()
            ));
            instance.opened.insert(tag.clone());
        }
        instance.targets.insert(target)
    }

    pub fn contains(&self, serial: u64, target: Entity) -> bool {
        self.hit
            .get(&serial)
            .is_some_and(|instance| instance.targets.contains(&target))
    }

    pub fn clear(&mut self) {
        self.hit.clear();
    }
}
