//! Configuration for card rendering and sheet packing

use crate::model::{DESIGN_DPI, MM_PER_INCH};

/// Conversion from design pixels to a target resolution domain
///
/// The same zone coordinates are rendered in two domains: the interactive preview
/// (target density equal to the design density) and physical print at a higher
/// fixed density. The factor is always explicit so a card never gets the wrong one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
    /// Density zone coordinates are authored at
    pub base_dpi: f64,
    /// Density of the output domain
    pub target_dpi: f64,
    /// Extra magnification on top of the density ratio
    pub zoom: f64,
}

impl RenderScale {
    pub fn new(base_dpi: f64, target_dpi: f64, zoom: f64) -> Self {
        Self {
            base_dpi,
            target_dpi,
            zoom,
        }
    }

    /// Interactive preview domain at the given zoom
    pub fn preview(zoom: f64) -> Self {
        Self::new(DESIGN_DPI, DESIGN_DPI, zoom)
    }

    /// Physical print domain at the given density
    pub fn print(dpi: f64) -> Self {
        Self::new(DESIGN_DPI, dpi, 1.0)
    }

    /// Multiplier applied to design coordinates: target / base × zoom
    pub fn factor(&self) -> f64 {
        self.target_dpi / self.base_dpi * self.zoom
    }

    /// Output pixels per physical millimetre
    pub fn px_per_mm(&self) -> f64 {
        self.target_dpi * self.zoom / MM_PER_INCH
    }

    /// Convert a physical length to output pixels
    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.px_per_mm()
    }
}

impl Default for RenderScale {
    fn default() -> Self {
        Self::preview(1.0)
    }
}

/// Configuration options for sheet packing
///
/// All lengths are millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    /// Units per row; rows grow without bound
    pub columns: usize,

    /// Arm length of a registration mark crosshair
    pub mark_size: f64,

    /// Stroke width of registration marks
    pub mark_stroke: f64,

    /// Space between neighbouring units
    pub gap: f64,

    /// Outer margin around the grid
    pub margin: f64,

    /// Smallest sheet the grid is placed on (width, height)
    pub min_sheet_size: (f64, f64),

    /// Resolution cards are rendered at for print
    pub scale: RenderScale,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            mark_size: 5.0,
            mark_stroke: 0.25,
            gap: 4.0,
            margin: 10.0,
            min_sheet_size: (330.2, 482.6),
            scale: RenderScale::print(300.0),
        }
    }
}

impl SheetConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column count
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Set the registration mark arm length and stroke
    pub fn with_marks(mut self, size: f64, stroke: f64) -> Self {
        self.mark_size = size;
        self.mark_stroke = stroke;
        self
    }

    /// Set the gap between units
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set the outer margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the minimum sheet size
    pub fn with_min_sheet_size(mut self, width: f64, height: f64) -> Self {
        self.min_sheet_size = (width, height);
        self
    }

    /// Set the print resolution
    pub fn with_scale(mut self, scale: RenderScale) -> Self {
        self.scale = scale;
        self
    }
}
