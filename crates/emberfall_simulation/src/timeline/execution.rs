//! ActionExecution: исполняемый action актора (timeline + runtime флаги)

use std::sync::Arc;

use bevy::prelude::*;

use crate::actions::{ActionDefinition, HitVolumeTag, WindowEffect};

use super::{TimelineRunner, WindowEdge};

#[derive(Debug, Clone)]
pub struct ActiveAction {
    pub definition: Arc<ActionDefinition>,
    /// Attack instance id (уникален в пределах актора)
    pub serial: u64,
    pub charged: bool,
    pub target: Option<Entity>,
    pub runner: TimelineRunner,
    /// Progress, до которого уже обработаны окна и root motion
    pub last_progress: f32,
    turn_lock: u32,
    super_armor: u32,
    combo_windows: u32,
    hit_volumes: Vec<HitVolumeTag>,
}

/// Executor state актора. Пустой между action'ами.
#[derive(Component, Debug, Clone, Default)]
pub struct ActionExecution {
    active: Option<ActiveAction>,
    next_serial: u64,
}

impl ActionExecution {
    /// Начинает новый attack instance. Предыдущий должен быть закрыт (`stop`).
    pub fn begin(
        &mut self,
        definition: Arc<ActionDefinition>,
        charged: bool,
        target: Option<Entity>,
    ) -> u64 {
        self.next_serial += 1;
        let serial = self.next_serial;

        self.active = Some(ActiveAction {
            runner: TimelineRunner::new(&definition.windows),
            definition,
            serial,
            charged,
            target,
            last_progress: 0.0,
            turn_lock: 0,
            super_armor: 0,
            combo_windows: 0,
            hit_volumes: Vec::new(),
        });

        serial
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveAction> {
        self.active.as_ref()
    }

    pub fn definition(&self) -> Option<&Arc<ActionDefinition>> {
        self.active.as_ref().map(|a| &a.definition)
    }

    pub fn serial(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.serial)
    }

    pub fn progress(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |a| a.last_progress)
    }

    /// Продвигает окна до `progress`, обновляет runtime флаги.
    ///
    /// Progress не откатывается назад (external clock может дрожать).
    pub fn advance(&mut self, progress: f32) -> Vec<WindowEdge> {
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };

        let progress = progress.clamp(0.0, 1.0).max(active.last_progress);
        let edges = active.runner.advance(progress);
        for edge in &edges {
            active.apply(edge);
        }
        edges
    }

    /// Сколько progress прошло с прошлого кадра (для root motion)
    pub fn take_progress_delta(&mut self, progress: f32) -> f32 {
        let Some(active) = self.active.as_mut() else {
            return 0.0;
        };

        let progress = progress.clamp(0.0, 1.0);
        let delta = (progress - active.last_progress).max(0.0);
        active.last_progress = active.last_progress.max(progress);
        delta
    }

    /// Все On окна → Done; Off side effects возвращаются фронтами.
    pub fn force_close(&mut self) -> Vec<WindowEdge> {
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };

        let edges = active.runner.force_close();
        for edge in &edges {
            active.apply(edge);
        }
        edges
    }

    /// force_close + сброс action'а
    pub fn stop(&mut self) -> Vec<WindowEdge> {
        let edges = self.force_close();
        self.active = None;
        edges
    }

    // ========================================================================
    // Queries для collaborators
    // ========================================================================

    pub fn turn_locked(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.turn_lock > 0)
    }

    pub fn super_armor(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.super_armor > 0)
    }

    pub fn combo_window_open(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.combo_windows > 0)
    }

    pub fn active_hit_volumes(&self) -> &[HitVolumeTag] {
        match &self.active {
            Some(active) => &active.hit_volumes,
            None => &[],
        }
    }

    pub fn is_hit_volume_active(&self, tag: &HitVolumeTag) -> bool {
        self.active_hit_volumes().contains(tag)
    }
}

impl ActiveAction {
    fn apply(&mut self, edge: &WindowEdge) {
        let counter = match &edge.effect {
            WindowEffect::TurnLock => &mut self.turn_lock,
            WindowEffect::SuperArmor => &mut self.super_armor,
            WindowEffect::ComboInput => &mut self.combo_windows,
            WindowEffect::HitVolume { tag } => {
                if edge.opened {
                    self.hit_volumes.push(tag.clone());
                } else if let Some(pos) = self.hit_volumes.iter().position(|t| t == tag) {
                    self.hit_volumes.remove(pos);
                }
                return;
            }
            WindowEffect::Sound { .. } | WindowEffect::Particle { .. } => return,
        };

        if edge.opened {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    fn slam() -> Arc<ActionDefinition> {
        Arc::new(
            ActionDefinition::new("golem_slam", ActionKind::OffensiveAbility, 1.2)
                .with_window(0.1, 0.9, WindowEffect::SuperArmor)
                .with_window(0.2, 0.5, WindowEffect::TurnLock)
                .with_window(0.4, 0.6, WindowEffect::HitVolume { tag: "fist".into() }),
        )
    }

    #[test]
    fn test_flags_follow_windows() {
        let mut execution = ActionExecution::default();
        let serial = execution.begin(slam(), false, None);
        assert_eq!(execution.serial(), Some(serial));

        execution.advance(0.45);
        assert!(execution.super_armor());
        assert!(execution.turn_locked());
        assert_eq!(execution.active_hit_volumes(), &[HitVolumeTag::from("fist")]);

        execution.advance(0.7);
        assert!(execution.super_armor());
        assert!(!execution.turn_locked());
        assert!(execution.active_hit_volumes().is_empty());
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut execution = ActionExecution::default();
        execution.begin(slam(), false, None);
        execution.advance(0.45);

        let edges = execution.stop();
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| !e.opened && e.forced));
        assert!(!execution.is_active());
        assert!(!execution.super_armor());
        assert!(execution.active_hit_volumes().is_empty());
    }

    #[test]
    fn test_serials_are_unique_per_begin() {
        let mut execution = ActionExecution::default();
        let first = execution.begin(slam(), false, None);
        execution.stop();
        let second = execution.begin(slam(), true, None);
        assert_ne!(first, second);
    }

    #[test]
    fn test_progress_delta_never_negative() {
        let mut execution = ActionExecution::default();
        execution.begin(slam(), false, None);

        assert_eq!(execution.take_progress_delta(0.5), 0.5);
        assert_eq!(execution.take_progress_delta(0.25), 0.0);
        assert_eq!(execution.take_progress_delta(0.75), 0.25);
    }
}
