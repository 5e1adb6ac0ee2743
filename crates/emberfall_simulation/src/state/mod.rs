//! Actor State Machine (общая для игрока и AI)
//!
//! - kind: ActorStateKind + Capabilities (bitflags)
//! - request: TransitionRequest (immutable) + StateChangeRequest event
//! - handlers / registry: strategy table ActorStateKind → StateHandler
//! - machine: ActorStateMachine + change_state
//! - systems: apply_state_requests, tick_state_timers

pub mod handlers;
pub mod kind;
pub mod machine;
pub mod query;
pub mod registry;
pub mod request;
pub mod systems;


pub use handlers::StateHandler;
pub use kind::{ActorStateKind, Capabilities};
pub use machine::{change_state, ActorStateMachine, StateCtx, TransitionOutcome};
pub use query::{ActorCombat, ActorCombatItem};
pub use registry::StateRegistry;
pub use request::{StateChangeRequest, TransitionRequest};
pub use systems::{apply_state_requests, tick_state_timers};
