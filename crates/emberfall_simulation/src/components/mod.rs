//! ECS Components для игровых entity
//!
//! - actor: базовые характеристики (faction, health, combat stats, player marker)
//! - movement: контракт с movement collaborator (MovementCommand, NavigationState)
//!
//! Combat state (state machine, executor, buffers, ledgers) живёт в своих модулях.

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
