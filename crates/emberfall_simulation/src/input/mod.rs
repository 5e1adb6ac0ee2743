//! Input buffering & combo resolution (player actors)

pub mod buffer;
pub mod combo;
pub mod systems;

pub use buffer::{InputBuffer, InputKind};
pub use combo::{resolve_continuation, resolve_opener, ComboContinuation, ComboProgress};
pub use systems::{buffer_player_intents, start_player_actions, tick_input_buffers, PlayerIntent};
