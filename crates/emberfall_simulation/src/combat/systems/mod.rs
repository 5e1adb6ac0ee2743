//! Combat systems (hit resolution + damage application)

pub mod damage;
pub mod hits;


pub use damage::*;
pub use hits::*;
