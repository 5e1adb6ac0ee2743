//! AnimationClock: контракт Animation Timeline Provider
//!
//! Executor читает только normalized progress текущего клипа (и, если
//! bridge его даёт, root-motion delta за кадр). Кто двигает часы:
//! - `ClockDriver::Simulated` - сам core (advance_animation_clocks)
//! - `ClockDriver::External` - движковый bridge пишет progress каждый кадр

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ClockDriver {
    #[default]
    Simulated,
    External,
}

#[derive(Component, Debug, Clone, Default)]
pub struct AnimationClock {
    pub clip: Option<String>,
    /// Длина клипа в секундах (speed 1.0)
    pub duration: f32,
    pub elapsed: f32,
    /// Progress в [0, 1]
    pub normalized: f32,
    pub finished: bool,
    pub driver: ClockDriver,
    /// Root motion за последний кадр (world space), если bridge его отдаёт
    pub root_motion_delta: Option<Vec3>,
}

impl AnimationClock {
    pub fn external() -> Self {
        Self {
            driver: ClockDriver::External,
            ..Default::default()
        }
    }

    /// Запуск клипа с начала
    pub fn play(&mut self, clip: &str, duration: f32) {
        self.clip = Some(clip.to_string());
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.normalized = 0.0;
        self.finished = false;
        self.root_motion_delta = None;
    }

    pub fn is_playing(&self, clip: &str) -> bool {
        self.clip.as_deref() == Some(clip)
    }

    /// Simulated driver: true на тике, когда клип дошёл до 100%
    pub fn advance(&mut self, delta: f32) -> bool {
        if self.clip.is_none() || self.finished {
            return false;
        }

        self.elapsed += delta;
        self.normalized = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };

        if self.normalized >= 1.0 {
            self.finished = true;
            return true;
        }
        false
    }

    /// External driver: bridge пишет progress напрямую
    pub fn set_progress(&mut self, normalized: f32, root_motion_delta: Option<Vec3>) -> bool {
        let was_finished = self.finished;
        self.normalized = normalized.clamp(0.0, 1.0);
        self.elapsed = self.normalized * self.duration;
        self.root_motion_delta = root_motion_delta;
        self.finished = self.normalized >= 1.0;
        self.finished && !was_finished
    }
}

/// Клип доиграл до 100% (outbound событие провайдера)
#[derive(Event, Debug, Clone)]
pub struct AnimationFinished {
    pub entity: Entity,
    pub clip: String,
}

/// Двигает Simulated часы на delta тика
pub fn advance_animation_clocks(
    time: Res<Time>,
    mut clocks: Query<(Entity, &mut AnimationClock)>,
    mut finished: EventWriter<AnimationFinished>,
) {
    let delta = time.delta_secs();

    for (entity, mut clock) in clocks.iter_mut() {
        if clock.driver != ClockDriver::Simulated {
            continue;
        }

        if clock.advance(delta) {
            let clip = clock.clip.clone().unwrap_or_default();
            finished.write(AnimationFinished { entity, clip });
        }
    }
}
