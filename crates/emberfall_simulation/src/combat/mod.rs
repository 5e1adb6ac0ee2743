//! Hit resolution & damage application
//!
//! ```text
//! hit volume On (timeline) → HitRegistry::begin
//!   ↓
//! HitVolumeOverlap (физика) → process_hit_overlaps → DamageEvent (один на цель)
//!   ↓
//! receive_damage → Health → Hit-Reaction / super armor / Dead
//!   ↓
//! DamageDealt, EntityDied, CombatSignal::TargetHit
//! ```

pub mod damage;
pub mod hit_registry;
pub mod systems;

pub use damage::{roll_damage, DamageDealt, DamageEvent, EntityDied, HealEvent};
pub use hit_registry::HitRegistry;
pub use systems::{apply_heals, process_hit_overlaps, receive_damage};
