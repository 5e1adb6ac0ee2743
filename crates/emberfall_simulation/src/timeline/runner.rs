//! TimelineRunner: Off → On → Done для каждого окна action'а
//!
//! Окна сортируются по `start` один раз при входе в action. Каждый кадр
//! runner получает normalized progress и возвращает фронты (edges) в порядке
//! timeline: раньше по времени - раньше; при равном времени закрытия идут до
//! открытий; окно нулевой длины открывается и закрывается в том же кадре.

use crate::actions::{TimedWindow, WindowEffect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPhase {
    #[default]
    Off,
    On,
    Done,
}

#[derive(Debug, Clone)]
pub struct WindowRuntime {
    pub window: TimedWindow,
    pub phase: WindowPhase,
    /// One-shot guard для Sound/Particle
    pub fired: bool,
}

/// Фронт окна в текущем кадре
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEdge {
    /// Индекс окна в отсортированном списке runner'а
    pub index: usize,
    pub effect: WindowEffect,
    pub opened: bool,
    /// Закрыто принудительно (state exit / тот же hit volume открылся снова)
    pub forced: bool,
    /// One-shot эффект (Sound/Particle) должен сыграть на этом открытии
    pub fire_once: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineRunner {
    windows: Vec<WindowRuntime>,
}

impl TimelineRunner {
    pub fn new(windows: &[TimedWindow]) -> Self {
        let mut windows: Vec<WindowRuntime> = windows
            .iter()
            .cloned()
            .map(|window| WindowRuntime {
                window,
                phase: WindowPhase::Off,
                fired: false,
            })
            .collect();
        // Stable sort: авторский порядок сохраняется при равных start
        windows.sort_by(|a, b| a.window.start.total_cmp(&b.window.start));

        Self { windows }
    }

    pub fn windows(&self) -> &[WindowRuntime] {
        &self.windows
    }

    pub fn phase(&self, index: usize) -> Option<WindowPhase> {
        self.windows.get(index).map(|w| w.phase)
    }

    pub fn is_finished(&self) -> bool {
        self.windows.iter().all(|w| w.phase == WindowPhase::Done)
    }

    /// Продвигает все окна до progress `t` и возвращает фронты в порядке timeline.
    pub fn advance(&mut self, t: f32) -> Vec<WindowEdge> {
        // (time, rank, index, opened)
        // rank 0: закрытие окна, открытого раньше; 1: открытие; 2: закрытие только что открытого
        let mut planned: Vec<(f32, u8, usize, bool)> = Vec::new();

        for (index, runtime) in self.windows.iter().enumerate() {
            match runtime.phase {
                WindowPhase::Off if t >= runtime.window.start => {
                    planned.push((runtime.window.start, 1, index, true));
                    if t >= runtime.window.end {
                        planned.push((runtime.window.end, 2, index, false));
                    }
                }
                WindowPhase::On if t >= runtime.window.end => {
                    planned.push((runtime.window.end, 0, index, false));
                }
                _ => {}
            }
        }

        planned.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });

        let mut edges = Vec::with_capacity(planned.len());
        for (_, _, index, opened) in planned {
            if opened {
                self.open(index, &mut edges);
            } else if self.windows[index].phase == WindowPhase::On {
                // Окно могло уже закрыться принудительно (тот же hit volume)
                self.close(index, false, &mut edges);
            }
        }

        edges
    }

    /// Все On окна → Done (Off side effects), Off окна больше не откроются.
    pub fn force_close(&mut self) -> Vec<WindowEdge> {
        let mut edges = Vec::new();
        for index in 0..self.windows.len() {
            match self.windows[index].phase {
                WindowPhase::On => self.close(index, true, &mut edges),
                WindowPhase::Off => self.windows[index].phase = WindowPhase::Done,
                WindowPhase::Done => {}
            }
        }
        edges
    }

    fn open(&mut self, index: usize, edges: &mut Vec<WindowEdge>) {
        // Один активный hit volume на tag: раннее окно закрываем первым
        if let Some(tag) = self.windows[index].window.effect.hit_volume_tag().cloned() {
            let earlier = self.windows.iter().position(|w| {
                w.phase == WindowPhase::On && w.window.effect.hit_volume_tag() == Some(&tag)
            });
            if let Some(earlier) = earlier {
                self.close(earlier, true, edges);
            }
        }

        let runtime = &mut self.windows[index];
        runtime.phase = WindowPhase::On;

        let one_shot = matches!(
            runtime.window.effect,
            WindowEffect::Sound { .. } | WindowEffect::Particle { .. }
        );
        let fire_once = one_shot && !runtime.fired;
        if one_shot {
            runtime.fired = true;
        }

        edges.push(WindowEdge {
            index,
            effect: runtime.window.effect.clone(),
            opened: true,
            forced: false,
            fire_once,
        });
    }

    fn close(&mut self, index: usize, forced: bool, edges: &mut Vec<WindowEdge>) {
        let runtime = &mut self.windows[index];
        runtime.phase = WindowPhase::Done;
        edges.push(WindowEdge {
            index,
            effect: runtime.window.effect.clone(),
            opened: false,
            forced,
            fire_once: false,
        });
    }
}
