//! Timeline Action Executor
//!
//! Нормализованный progress клипа `t ∈ [0, 1]` + декларативные окна action'а
//! → дискретные gameplay события (hit volume, turn lock, super armor, combo
//! input, one-shot эффекты) и animation-driven displacement.

pub mod clock;
pub mod execution;
pub mod runner;
pub mod systems;


pub use clock::{advance_animation_clocks, AnimationClock, AnimationFinished, ClockDriver};
pub use execution::{ActionExecution, ActiveAction};
pub use runner::{TimelineRunner, WindowEdge, WindowPhase, WindowRuntime};
pub use systems::{emit_edge_signals, root_motion_displacement, run_action_timelines};
