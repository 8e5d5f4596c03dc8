//! Card face rendering - binds zones to entity attributes and positions them

use crate::error::RenderError;
use crate::model::{Entity, Side, Template, TextAlign, Zone, ZoneKind};

use super::config::RenderScale;
use super::types::{BoundingBox, CardFace, Point, RenderedZone, ResolvedStyles, TextAnchor};

/// Font size in design pixels when a zone does not set one
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Renders faces of one template
///
/// The zone layout is parsed once up front. A malformed layout is remembered and
/// reported for every card rendered with this template, so the failure stays
/// contained to the cards that need it.
#[derive(Debug, Clone)]
pub struct CardRenderer<'a> {
    template: &'a Template,
    zones: Result<Vec<Zone>, RenderError>,
}

impl<'a> CardRenderer<'a> {
    pub fn new(template: &'a Template) -> Self {
        let zones = template
            .parse_zones()
            .map_err(|e| RenderError::malformed(&template.id, e));
        if let Err(e) = &zones {
            tracing::warn!(template = %template.id, "{}", e);
        }
        Self { template, zones }
    }

    pub fn template(&self) -> &Template {
        self.template
    }

    /// Render one face of a card for `entity`
    pub fn render(
        &self,
        entity: &Entity,
        side: Side,
        scale: RenderScale,
    ) -> Result<CardFace, RenderError> {
        let zones = self.zones.as_ref().map_err(|e| e.clone())?;
        Ok(render_zones(self.template, zones, entity, side, scale))
    }
}

/// Render one face of a card
///
/// Zones tagged for the other side are skipped. A zone bound to an attribute the
/// entity lacks renders an empty value.
pub fn render_card(
    template: &Template,
    entity: &Entity,
    side: Side,
    scale: RenderScale,
) -> Result<CardFace, RenderError> {
    CardRenderer::new(template).render(entity, side, scale)
}

fn render_zones(
    template: &Template,
    zones: &[Zone],
    entity: &Entity,
    side: Side,
    scale: RenderScale,
) -> CardFace {
    let factor = scale.factor();
    let (width_mm, height_mm) = template.trim_size_mm();

    let zones = zones
        .iter()
        .filter(|zone| zone.side == side)
        .map(|zone| render_zone(zone, entity, factor))
        .collect();

    CardFace {
        template_id: template.id.clone(),
        side,
        scale,
        width: scale.mm_to_px(width_mm),
        height: scale.mm_to_px(height_mm),
        bleed: scale.mm_to_px(template.bleed_mm()),
        background: template.background.for_side(side).cloned(),
        zones,
    }
}

fn render_zone(zone: &Zone, entity: &Entity, factor: f64) -> RenderedZone {
    let bounds = BoundingBox::new(zone.x, zone.y, zone.width, zone.height).scaled(factor);
    let value = bound_value(zone, entity);

    let (anchor, x) = match zone.style.align {
        TextAlign::Left => (TextAnchor::Start, bounds.x),
        TextAlign::Center => (TextAnchor::Middle, bounds.center().x),
        TextAlign::Right => (TextAnchor::End, bounds.right()),
    };

    let font_size = match zone.kind {
        ZoneKind::Image | ZoneKind::Shape => None,
        _ => Some(zone.style.font_size.unwrap_or(DEFAULT_FONT_SIZE) * factor),
    };

    RenderedZone {
        kind: zone.kind.clone(),
        bounds,
        value,
        text_origin: Point::new(x, bounds.center().y),
        anchor,
        styles: ResolvedStyles {
            font_family: zone.style.font_family.clone(),
            font_size,
            font_weight: zone.style.font_weight.clone(),
            color: zone.style.color.clone(),
            fill: zone.style.background.clone(),
        },
    }
}

fn bound_value(zone: &Zone, entity: &Entity) -> String {
    match &zone.data_key {
        Some(key) => entity.display_value(key).unwrap_or_else(|| {
            tracing::debug!(entity = %entity.id, key = %key, "attribute missing, rendering empty");
            String::new()
        }),
        None => zone.content.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnerScope, TemplateId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn template(zones: serde_json::Value) -> Template {
        Template {
            id: TemplateId::new("std"),
            owner_scope: OwnerScope::System,
            tenant_id: None,
            parent_template_id: None,
            name: "ID-Standard".to_string(),
            orientation: Default::default(),
            width: 86.0,
            height: 54.0,
            unit: Default::default(),
            bleed: 3.0,
            zones,
            background: Default::default(),
        }
    }

    fn student_card() -> Template {
        template(json!([
            {"type": "text", "x": 10, "y": 10, "width": 200, "height": 20,
             "style": {"fontFamily": "Roboto", "fontSize": 14, "align": "left"},
             "dataKey": "name", "side": "front"},
            {"type": "text", "x": 10, "y": 40, "width": 200, "height": 20,
             "style": {"align": "right"},
             "dataKey": "admissionNumber", "side": "front"},
            {"type": "text", "x": 10, "y": 70, "width": 200, "height": 20,
             "style": {"align": "center"},
             "content": "Student", "side": "front"},
            {"type": "barcode", "x": 20, "y": 20, "width": 150, "height": 40,
             "dataKey": "admissionNumber", "side": "back"}
        ]))
    }

    fn ada() -> Entity {
        Entity::new("E1")
            .with_attribute("name", "Ada Lovelace")
            .with_attribute("admissionNumber", "A-1815")
    }

    #[test]
    fn test_side_filtering() {
        let card = student_card();
        let front = render_card(&card, &ada(), Side::Front, RenderScale::preview(1.0)).unwrap();
        let back = render_card(&card, &ada(), Side::Back, RenderScale::preview(1.0)).unwrap();

        assert_eq!(front.zones.len(), 3);
        assert_eq!(back.zones.len(), 1);
        assert_eq!(back.zones[0].kind, ZoneKind::Other("barcode".to_string()));
        assert_eq!(back.zones[0].value, "A-1815");
    }

    #[test]
    fn test_bindings_and_static_content() {
        let face = render_card(&student_card(), &ada(), Side::Front, RenderScale::preview(1.0))
            .unwrap();
        let values: Vec<&str> = face.zones.iter().map(|z| z.value.as_str()).collect();
        assert_eq!(values, vec!["Ada Lovelace", "A-1815", "Student"]);
    }

    #[test]
    fn test_missing_attribute_renders_empty() {
        let entity = Entity::new("E2").with_attribute("name", "Grace Hopper");
        let face =
            render_card(&student_card(), &entity, Side::Front, RenderScale::preview(1.0)).unwrap();

        assert_eq!(face.zones[0].value, "Grace Hopper");
        assert_eq!(face.zones[1].value, "");
        assert_eq!(face.zones[2].value, "Student");
    }

    #[test]
    fn test_alignment_anchors() {
        let face = render_card(&student_card(), &ada(), Side::Front, RenderScale::preview(1.0))
            .unwrap();

        assert_eq!(face.zones[0].anchor, TextAnchor::Start);
        assert_eq!(face.zones[0].text_origin, Point::new(10.0, 20.0));
        assert_eq!(face.zones[1].anchor, TextAnchor::End);
        assert_eq!(face.zones[1].text_origin, Point::new(210.0, 50.0));
        assert_eq!(face.zones[2].anchor, TextAnchor::Middle);
        assert_eq!(face.zones[2].text_origin, Point::new(110.0, 80.0));
    }

    #[test]
    fn test_print_scale_multiplies_positions_and_fonts() {
        let card = student_card();
        let preview = render_card(&card, &ada(), Side::Front, RenderScale::preview(1.0)).unwrap();
        let print = render_card(&card, &ada(), Side::Front, RenderScale::print(300.0)).unwrap();

        assert_eq!(print.zones[0].bounds, preview.zones[0].bounds.scaled(3.125));
        assert_eq!(print.zones[0].styles.font_size, Some(14.0 * 3.125));
        assert_eq!(preview.zones[1].styles.font_size, Some(DEFAULT_FONT_SIZE));
    }

    #[test]
    fn test_border_scales_with_zones() {
        let card = student_card();
        let preview = render_card(&card, &ada(), Side::Front, RenderScale::preview(1.0)).unwrap();
        let print = render_card(&card, &ada(), Side::Front, RenderScale::print(300.0)).unwrap();

        let ratio = print.width / preview.width;
        assert!((ratio - 3.125).abs() < 1e-9);
        assert!((print.height / preview.height - 3.125).abs() < 1e-9);
        // 86mm at 96dpi
        assert!((preview.width - 86.0 / 25.4 * 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_applies_on_top_of_density() {
        let card = student_card();
        let zoomed = render_card(&card, &ada(), Side::Front, RenderScale::preview(2.0)).unwrap();
        assert_eq!(zoomed.zones[0].bounds, BoundingBox::new(20.0, 20.0, 400.0, 40.0));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let card = student_card();
        let scale = RenderScale::print(300.0);
        let first = render_card(&card, &ada(), Side::Front, scale).unwrap();
        let second = render_card(&card, &ada(), Side::Front, scale).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_layout_is_render_error() {
        let broken = template(json!("{not a layout"));
        let result = render_card(&broken, &ada(), Side::Front, RenderScale::preview(1.0));
        assert!(matches!(result, Err(RenderError::MalformedLayout { .. })));
    }

    #[test]
    fn test_background_follows_side() {
        let mut card = student_card();
        card.background.back = Some(crate::model::Background {
            color: Some("#003366".to_string()),
            image: None,
        });
        let front = render_card(&card, &ada(), Side::Front, RenderScale::preview(1.0)).unwrap();
        let back = render_card(&card, &ada(), Side::Back, RenderScale::preview(1.0)).unwrap();
        assert!(front.background.is_none());
        assert_eq!(back.background.unwrap().color.as_deref(), Some("#003366"));
    }
}
