//! cardsheet - ID-card template resolution and print sheet generation
//!
//! This library resolves a tenant's effective card templates, renders card faces
//! from entity records, and packs double-sided cards onto a print sheet with
//! bleed and registration marks.
//!
//! # Example
//!
//! ```rust
//! use cardsheet::model::{Entity, Roster, Selection, TemplateId};
//! use cardsheet::template::TemplateRegistry;
//! use cardsheet::{generate_print_document, PrintConfig, PrintRequest};
//!
//! let store = TemplateRegistry::from_json(r#"[
//!     {"id": "std", "ownerScope": "system", "name": "ID-Standard",
//!      "width": 86, "height": 54, "bleed": 3,
//!      "zones": [{"type": "text", "x": 10, "y": 10, "width": 200, "height": 20, "dataKey": "name"}]}
//! ]"#).unwrap();
//! let roster: Roster = vec![Entity::new("E1").with_attribute("name", "Ada")]
//!     .into_iter()
//!     .collect();
//! let request = PrintRequest::new("t1", TemplateId::new("std"), Selection::new(["E1"]));
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let job = runtime
//!     .block_on(generate_print_document(&store, &roster, &request, &PrintConfig::default()))
//!     .unwrap();
//!
//! assert_eq!(job.sheet.units.len(), 2);
//! assert!(job.document.contains(r#"width="330.2mm""#));
//! assert!(job.document.contains("Ada"));
//! ```

pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod profile;
pub mod renderer;
pub mod template;

pub use error::RenderError;
pub use fonts::{ensure_fonts_ready, required_fonts, FontConfig, FontReadiness};
pub use layout::{pack_sheet, render_card, PackingError, RenderScale, SheetConfig, SheetLayout};
pub use profile::{PrintProfile, ProfileError};
pub use renderer::{render_card_svg, render_sheet_svg, SvgConfig};
pub use template::{resolve_for_tenant, resolve_templates, TemplateError, TemplateStore};

use thiserror::Error;

use layout::{check_preconditions, CardRenderer, UnitContent};
use model::{EntityId, Roster, RosterError, Selection, Side, TemplateId};
use template::{EffectiveTemplate, Resolution, ResolutionAmbiguity};

/// Errors that can occur in the print pipeline
#[derive(Debug, Error)]
pub enum PrintError {
    /// Error loading or looking up templates
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Error loading entity records
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// Batch precondition failed; nothing was rendered
    #[error("cannot print: {0}")]
    Packing(#[from] PackingError),

    /// Single card could not be rendered
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Error loading the print profile
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Preview zoom is zero, negative or not a number
    #[error("invalid preview zoom {zoom}: zoom must be a positive number")]
    InvalidZoom { zoom: f64 },
}

/// Configuration for the complete print pipeline
#[derive(Debug, Clone, Default)]
pub struct PrintConfig {
    /// Sheet layout and print resolution
    pub sheet: SheetConfig,
    /// Where fonts are loaded from
    pub fonts: FontConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Debug mode: dump the packed grid to stderr
    pub debug: bool,
}

impl PrintConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sheet configuration
    pub fn with_sheet(mut self, config: SheetConfig) -> Self {
        self.sheet = config;
        self
    }

    /// Set the font configuration
    pub fn with_fonts(mut self, config: FontConfig) -> Self {
        self.fonts = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// What to print, and for whom
#[derive(Debug, Clone, PartialEq)]
pub struct PrintRequest {
    pub tenant: String,
    /// Template to print with; a system id selects the tenant's override if there is one
    pub template_id: TemplateId,
    pub selection: Selection,
}

impl PrintRequest {
    pub fn new(tenant: impl Into<String>, template_id: TemplateId, selection: Selection) -> Self {
        Self {
            tenant: tenant.into(),
            template_id,
            selection,
        }
    }
}

/// A completed print pass
///
/// Built on demand for one request and dropped once the document is written.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub template: EffectiveTemplate,
    pub selection: Selection,
    pub fonts: FontReadiness,
    pub sheet: SheetLayout,
    /// Ambiguous overrides seen while resolving the tenant's templates
    pub ambiguities: Vec<ResolutionAmbiguity>,
    /// The SVG document
    pub document: String,
}

impl PrintJob {
    /// Number of cards that failed to render
    pub fn placeholder_count(&self) -> usize {
        self.sheet.placeholders().count()
    }

    /// Font families rendered with the default font
    pub fn missing_fonts(&self) -> &[String] {
        &self.fonts.missing
    }
}

/// One card face to preview
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    pub tenant: String,
    pub template_id: TemplateId,
    pub entity_id: EntityId,
    pub side: Side,
    pub zoom: f64,
}

/// Generate the print document for a batch of cards
///
/// Batch preconditions are checked before fonts are loaded or any card is
/// rendered. Fonts are loaded once for the whole pass. An entity missing from
/// the roster becomes a placeholder unit.
pub async fn generate_print_document(
    store: &dyn TemplateStore,
    roster: &Roster,
    request: &PrintRequest,
    config: &PrintConfig,
) -> Result<PrintJob, PrintError> {
    let resolution = resolve_for_tenant(store, &request.tenant);
    let effective = find_effective(&resolution, &request.tenant, &request.template_id)
        .ok_or_else(|| {
            PackingError::missing_template(format!(
                "template '{}' is not available to tenant '{}'",
                request.template_id, request.tenant
            ))
        })?;
    let template = check_preconditions(Some(&effective.template), &request.selection, &config.sheet)?;

    let families = required_fonts(template, &config.fonts);
    let fonts = ensure_fonts_ready(&families, &config.fonts).await;

    let renderer = CardRenderer::new(template);
    let scale = config.sheet.scale;
    let sheet = pack_sheet(Some(template), &request.selection, &config.sheet, |id, side| {
        let entity = roster
            .get(id)
            .ok_or_else(|| RenderError::unknown_entity(id))?;
        renderer.render(entity, side, scale)
    })?;

    if config.debug {
        print_sheet(&sheet);
    }

    let document = render_sheet_svg(&sheet, &fonts, &config.svg);
    tracing::debug!(
        template = %template.id,
        units = sheet.units.len(),
        placeholders = sheet.placeholders().count(),
        missing_fonts = fonts.missing.len(),
        "print document generated"
    );

    Ok(PrintJob {
        template: effective,
        selection: request.selection.clone(),
        fonts,
        sheet,
        ambiguities: resolution.ambiguities,
        document,
    })
}

/// Generate a preview document for one card face at `request.zoom`
///
/// Unlike a print pass, a render failure is returned as an error. The zoom
/// must be finite and positive.
pub async fn generate_preview(
    store: &dyn TemplateStore,
    roster: &Roster,
    request: &PreviewRequest,
    config: &PrintConfig,
) -> Result<String, PrintError> {
    if !request.zoom.is_finite() || request.zoom <= 0.0 {
        return Err(PrintError::InvalidZoom { zoom: request.zoom });
    }

    let resolution = resolve_for_tenant(store, &request.tenant);
    let effective = find_effective(&resolution, &request.tenant, &request.template_id)
        .ok_or_else(|| TemplateError::NotFound {
            id: request.template_id.to_string(),
        })?;
    let entity = roster
        .get(&request.entity_id)
        .ok_or_else(|| RenderError::unknown_entity(&request.entity_id))?;

    let families = required_fonts(&effective.template, &config.fonts);
    let fonts = ensure_fonts_ready(&families, &config.fonts).await;

    let base_dpi = config.sheet.scale.base_dpi;
    let scale = RenderScale::new(base_dpi, base_dpi, request.zoom);
    let face = render_card(&effective.template, entity, request.side, scale)?;
    Ok(render_card_svg(&face, &fonts, &config.svg))
}

fn find_effective(
    resolution: &Resolution,
    tenant: &str,
    id: &TemplateId,
) -> Option<EffectiveTemplate> {
    let found = resolution.find(id).cloned();
    if let Some(effective) = &found {
        if &effective.template.id != id {
            tracing::debug!(
                tenant,
                requested = %id,
                using = %effective.template.id,
                "tenant override replaces requested template"
            );
        }
    }
    found
}

fn print_sheet(sheet: &SheetLayout) {
    eprintln!("=== Sheet Debug ===");
    eprintln!(
        "{} x {} mm, {} columns x {} rows, unit {:.1} x {:.1} mm",
        sheet.width, sheet.height, sheet.columns, sheet.rows, sheet.unit_size.0, sheet.unit_size.1
    );
    for unit in &sheet.units {
        let content = match &unit.content {
            UnitContent::Card(face) => format!("{} zones", face.zones.len()),
            UnitContent::Placeholder { reason } => format!("placeholder: {}", reason),
        };
        eprintln!(
            "[{}] r{} c{} {} {} x={:.1} y={:.1} ({})",
            unit.position,
            unit.row,
            unit.column,
            unit.entity_id,
            unit.side,
            unit.bounds.x,
            unit.bounds.y,
            content
        );
    }
    eprintln!("===================");
}
