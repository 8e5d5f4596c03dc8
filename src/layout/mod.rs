//! Card geometry and print sheet layout
//!
//! This module turns a resolved template into positioned card faces and packs
//! those faces into a sheet with bleed and registration marks.

pub mod card;
pub mod config;
pub mod error;
pub mod packer;
pub mod types;

pub use card::{render_card, CardRenderer};
pub use config::{RenderScale, SheetConfig};
pub use error::PackingError;
pub use packer::{check_preconditions, pack_sheet};
pub use types::*;
