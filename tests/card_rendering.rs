//! Card face rendering at preview and print resolution

use cardsheet::layout::{render_card, BoundingBox, CardRenderer, RenderScale, TextAnchor};
use cardsheet::model::{Entity, Side, Template, ZoneKind};
use cardsheet::{render_card_svg, FontReadiness, RenderError, SvgConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn student_card() -> Template {
    serde_json::from_value(json!({
        "id": "id-standard",
        "ownerScope": "system",
        "name": "ID-Standard",
        "orientation": "horizontal",
        "width": 86,
        "height": 54,
        "bleed": 3,
        "zones": [
            {"type": "image", "x": 12, "y": 12, "width": 90, "height": 110, "dataKey": "photo"},
            {"type": "text", "x": 110, "y": 14, "width": 200, "height": 24,
             "style": {"fontFamily": "'Open Sans', sans-serif", "fontSize": 16, "fontWeight": "bold"},
             "dataKey": "fullName"},
            {"type": "text", "x": 110, "y": 44, "width": 200, "height": 18,
             "style": {"align": "right"}, "dataKey": "admissionNumber"},
            {"type": "text", "x": 110, "y": 68, "width": 200, "height": 18,
             "dataKey": "guardian.phone"},
            {"type": "barcode", "x": 20, "y": 40, "width": 280, "height": 60,
             "dataKey": "admissionNumber", "side": "back"},
            {"type": "text", "x": 20, "y": 150, "width": 285, "height": 20,
             "style": {"align": "center"}, "content": "If found, please return", "side": "back"}
        ]
    }))
    .unwrap()
}

fn ada() -> Entity {
    Entity::new("E1")
        .with_attribute("photo", "https://cdn.example/e1.jpg")
        .with_attribute("fullName", "Ada Lovelace")
        .with_attribute("admissionNumber", "A-1815")
        .with_attribute("guardian", json!({"phone": "+44 20 7946 0000"}))
}

fn values(template: &Template, entity: &Entity, side: Side) -> Vec<String> {
    render_card(template, entity, side, RenderScale::preview(1.0))
        .unwrap()
        .zones
        .into_iter()
        .map(|z| z.value)
        .collect()
}

#[test]
fn test_front_binds_entity_attributes() {
    assert_eq!(
        values(&student_card(), &ada(), Side::Front),
        vec![
            "https://cdn.example/e1.jpg",
            "Ada Lovelace",
            "A-1815",
            "+44 20 7946 0000"
        ]
    );
}

#[test]
fn test_back_has_only_back_zones() {
    let face = render_card(&student_card(), &ada(), Side::Back, RenderScale::preview(1.0)).unwrap();
    let kinds: Vec<&ZoneKind> = face.zones.iter().map(|z| &z.kind).collect();
    assert_eq!(kinds, vec![&ZoneKind::Other("barcode".to_string()), &ZoneKind::Text]);
    assert_eq!(face.zones[1].value, "If found, please return");
    assert_eq!(face.zones[1].anchor, TextAnchor::Middle);
}

#[test]
fn test_missing_admission_number_renders_empty() {
    let entity = Entity::new("E2")
        .with_attribute("fullName", "Grace Hopper")
        .with_attribute("photo", serde_json::Value::Null);

    assert_eq!(
        values(&student_card(), &entity, Side::Front),
        vec!["", "Grace Hopper", "", ""]
    );
    assert_eq!(values(&student_card(), &entity, Side::Back), vec!["", "If found, please return"]);
}

#[test]
fn test_preview_and_print_differ_by_factor() {
    let card = student_card();
    let preview = render_card(&card, &ada(), Side::Front, RenderScale::preview(1.0)).unwrap();
    let print = render_card(&card, &ada(), Side::Front, RenderScale::print(300.0)).unwrap();
    let ratio = RenderScale::print(300.0).factor() / RenderScale::preview(1.0).factor();

    for (p, q) in preview.zones.iter().zip(&print.zones) {
        let expected = p.bounds.scaled(ratio);
        assert!((q.bounds.x - expected.x).abs() < 1e-9);
        assert!((q.bounds.y - expected.y).abs() < 1e-9);
        assert!((q.bounds.width - expected.width).abs() < 1e-9);
        assert!((q.bounds.height - expected.height).abs() < 1e-9);
        assert!((q.text_origin.x - p.text_origin.x * ratio).abs() < 1e-9);
    }
    assert!((print.width / preview.width - ratio).abs() < 1e-9);
    assert!((print.bleed / preview.bleed - ratio).abs() < 1e-9);
}

#[test]
fn test_zoomed_preview_positions() {
    let face = render_card(&student_card(), &ada(), Side::Front, RenderScale::preview(1.5)).unwrap();
    assert_eq!(face.zones[0].bounds, BoundingBox::new(18.0, 18.0, 135.0, 165.0));
    assert_eq!(face.zones[1].styles.font_size, Some(24.0));
    assert_eq!(face.zones[0].styles.font_size, None);
}

#[test]
fn test_renderer_is_reusable_and_deterministic() {
    let card = student_card();
    let renderer = CardRenderer::new(&card);
    let scale = RenderScale::print(300.0);
    let first = renderer.render(&ada(), Side::Front, scale).unwrap();
    let second = renderer.render(&ada(), Side::Front, scale).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_layout_only_fails_that_template() {
    let mut broken = student_card();
    broken.zones = json!([{"type": "text", "x": "left"}]);

    let result = render_card(&broken, &ada(), Side::Front, RenderScale::preview(1.0));
    assert!(matches!(result, Err(RenderError::MalformedLayout { .. })));
    assert!(render_card(&student_card(), &ada(), Side::Front, RenderScale::preview(1.0)).is_ok());
}

#[test]
fn test_preview_svg() {
    let face = render_card(&student_card(), &ada(), Side::Back, RenderScale::preview(1.0)).unwrap();
    let svg = render_card_svg(&face, &FontReadiness::default(), &SvgConfig::default());

    assert!(svg.contains(r#"<g class="cs-card cs-back">"#));
    assert!(svg.contains("cs-barcode"));
    assert!(svg.contains(">A-1815</text>"));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains("If found, please return"));
}
