//! Print sheet packing - tiles front/back card units with bleed and registration marks

use crate::error::RenderError;
use crate::model::{EntityId, Selection, Side, Template};

use super::config::SheetConfig;
use super::error::PackingError;
use super::types::{BoundingBox, CardFace, PackedUnit, RegistrationMark, SheetLayout, UnitContent};

/// Pack every selected entity's front and back onto one sheet
///
/// Units are laid out left to right in `config.columns` columns, adding rows as
/// needed. Entity `i` of the selection occupies positions `2i` (front) and
/// `2i + 1` (back). Each unit is the card size plus bleed on every side, and its
/// four registration marks are centered on the trim corners.
///
/// Preconditions are checked before `render` is called even once: a missing
/// template, an empty selection, invalid template geometry or an unusable
/// configuration all fail the whole batch. A render failure for one card only
/// turns that unit into a placeholder.
pub fn pack_sheet<F>(
    template: Option<&Template>,
    selection: &Selection,
    config: &SheetConfig,
    mut render: F,
) -> Result<SheetLayout, PackingError>
where
    F: FnMut(&EntityId, Side) -> Result<CardFace, RenderError>,
{
    let template = check_preconditions(template, selection, config)?;

    let (trim_w, trim_h) = template.trim_size_mm();
    let bleed = template.bleed_mm();
    let unit_w = trim_w + 2.0 * bleed;
    let unit_h = trim_h + 2.0 * bleed;

    let count = selection.len() * 2;
    let columns = config.columns;
    let rows = count.div_ceil(columns);
    let used_columns = columns.min(count);

    let grid_w = used_columns as f64 * unit_w + (used_columns - 1) as f64 * config.gap;
    let grid_h = rows as f64 * unit_h + (rows - 1) as f64 * config.gap;
    let (min_w, min_h) = config.min_sheet_size;

    let mut units = Vec::with_capacity(count);
    for (index, entity_id) in selection.iter().enumerate() {
        for (offset, side) in [Side::Front, Side::Back].into_iter().enumerate() {
            let position = index * 2 + offset;
            let row = position / columns;
            let column = position % columns;
            let bounds = BoundingBox::new(
                config.margin + column as f64 * (unit_w + config.gap),
                config.margin + row as f64 * (unit_h + config.gap),
                unit_w,
                unit_h,
            );
            let trim = bounds.inset(bleed);
            let marks = trim.corners().map(|center| RegistrationMark {
                center,
                size: config.mark_size,
            });

            let content = match render(entity_id, side) {
                Ok(face) => UnitContent::Card(face),
                Err(e) => {
                    tracing::warn!(entity = %entity_id, %side, "card replaced by placeholder: {}", e);
                    UnitContent::Placeholder {
                        reason: e.to_string(),
                    }
                }
            };

            units.push(PackedUnit {
                position,
                row,
                column,
                entity_id: entity_id.clone(),
                side,
                bounds,
                trim,
                marks,
                content,
            });
        }
    }

    tracing::debug!(
        template = %template.id,
        units = units.len(),
        rows,
        columns,
        "packed print sheet"
    );

    Ok(SheetLayout {
        template_id: template.id.clone(),
        width: (grid_w + 2.0 * config.margin).max(min_w),
        height: (grid_h + 2.0 * config.margin).max(min_h),
        columns,
        rows,
        unit_size: (unit_w, unit_h),
        bleed,
        mark_stroke: config.mark_stroke,
        units,
    })
}

/// Batch preconditions of [`pack_sheet`], checked in order: template present,
/// selection non-empty, template geometry valid, configuration usable
pub fn check_preconditions<'a>(
    template: Option<&'a Template>,
    selection: &Selection,
    config: &SheetConfig,
) -> Result<&'a Template, PackingError> {
    let template = template.ok_or_else(|| {
        PackingError::missing_template("no template resolved for this print run")
    })?;
    if selection.is_empty() {
        return Err(PackingError::EmptySelection);
    }
    template
        .validate_geometry()
        .map_err(|reason| PackingError::invalid_geometry(&template.id, reason))?;
    validate_config(config)?;
    Ok(template)
}

fn validate_config(config: &SheetConfig) -> Result<(), PackingError> {
    if config.columns == 0 {
        return Err(PackingError::invalid_config("column count must be at least 1"));
    }
    let lengths = [
        ("mark size", config.mark_size),
        ("mark stroke", config.mark_stroke),
        ("gap", config.gap),
        ("margin", config.margin),
    ];
    for (name, value) in lengths {
        if !value.is_finite() || value < 0.0 {
            return Err(PackingError::invalid_config(format!(
                "{} must be >= 0, got {}",
                name, value
            )));
        }
    }
    let factor = config.scale.factor();
    if !factor.is_finite() || factor <= 0.0 {
        return Err(PackingError::invalid_config("print resolution must be positive"));
    }
    Ok(())
}
