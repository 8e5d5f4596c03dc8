//! SVG renderer for card previews and print sheets
//!
//! Sheets are written with millimetre page dimensions so the document prints at
//! physical size; card previews use output pixels.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_card_svg, render_sheet_svg};
