//! Action данные: definitions, таблица, loadout'ы акторов

pub mod definition;
pub mod loadout;
pub mod table;

pub use definition::{ActionDefinition, ActionId, ActionKind, HitVolumeTag, TimedWindow, WindowEffect};
pub use loadout::ActionLoadout;
pub use table::{ActionTable, DEFAULT_ACTIONS_RON};
