//! Core geometry and output types for cards and sheets

use crate::model::{Background, EntityId, Side, TemplateId, ZoneKind};

use super::config::RenderScale;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Scale position and size by a factor
    pub fn scaled(&self, factor: f64) -> BoundingBox {
        BoundingBox::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Check if this bounding box intersects another
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Horizontal anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Zone style after scaling, ready for output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedStyles {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub fill: Option<String>,
}

/// One zone positioned in the output domain
///
/// Coordinates are output pixels relative to the card's trim box.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedZone {
    pub kind: ZoneKind,
    pub bounds: BoundingBox,
    /// Bound value; empty when the entity lacks the attribute
    pub value: String,
    /// Where a text run starts, relative to `anchor`
    pub text_origin: Point,
    pub anchor: TextAnchor,
    pub styles: ResolvedStyles,
}

/// One rendered card face
#[derive(Debug, Clone, PartialEq)]
pub struct CardFace {
    pub template_id: TemplateId,
    pub side: Side,
    pub scale: RenderScale,
    /// Trim width in output pixels
    pub width: f64,
    /// Trim height in output pixels
    pub height: f64,
    /// Bleed in output pixels
    pub bleed: f64,
    pub background: Option<Background>,
    pub zones: Vec<RenderedZone>,
}

impl CardFace {
    /// Trim box in output pixels
    pub fn trim_box(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }

    /// Bleed box in output pixels, extending past the trim box
    pub fn bleed_box(&self) -> BoundingBox {
        BoundingBox::new(
            -self.bleed,
            -self.bleed,
            self.width + 2.0 * self.bleed,
            self.height + 2.0 * self.bleed,
        )
    }
}

/// Crosshair guiding the cut; its center lies on the trim line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistrationMark {
    pub center: Point,
    /// Full arm length
    pub size: f64,
}

impl RegistrationMark {
    /// Horizontal and vertical arms as line segments
    pub fn arms(&self) -> [(Point, Point); 2] {
        let half = self.size / 2.0;
        let c = self.center;
        [
            (Point::new(c.x - half, c.y), Point::new(c.x + half, c.y)),
            (Point::new(c.x, c.y - half), Point::new(c.x, c.y + half)),
        ]
    }
}

/// What a packed unit shows
#[derive(Debug, Clone, PartialEq)]
pub enum UnitContent {
    Card(CardFace),
    /// Card that failed to render; the reason is printed in its place
    Placeholder { reason: String },
}

/// One card face placed on the sheet
///
/// Lengths are millimetres in sheet coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedUnit {
    /// Index in packing order
    pub position: usize,
    pub row: usize,
    pub column: usize,
    pub entity_id: EntityId,
    pub side: Side,
    /// Full footprint including bleed
    pub bounds: BoundingBox,
    /// Cut line
    pub trim: BoundingBox,
    pub marks: [RegistrationMark; 4],
    pub content: UnitContent,
}

impl PackedUnit {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, UnitContent::Placeholder { .. })
    }
}

/// The packed sheet for one print job
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub template_id: TemplateId,
    /// Page size in millimetres
    pub width: f64,
    pub height: f64,
    pub columns: usize,
    pub rows: usize,
    /// Unit footprint (width, height) in millimetres
    pub unit_size: (f64, f64),
    pub bleed: f64,
    pub mark_stroke: f64,
    pub units: Vec<PackedUnit>,
}

impl SheetLayout {
    /// Page bounds in millimetres
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width, self.height)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &PackedUnit> {
        self.units.iter().filter(|u| u.is_placeholder())
    }
}
