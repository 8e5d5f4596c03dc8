//! Records consumed from the surrounding application
//!
//! Templates and entities arrive as JSON records owned by external collaborators.
//! This module only describes their shape; nothing here mutates or persists them.

pub mod roster;
pub mod types;

pub use roster::{Roster, RosterError};
pub use types::*;
