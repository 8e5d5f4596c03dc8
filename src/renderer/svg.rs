//! SVG generation from card faces and packed sheets

use crate::fonts::FontReadiness;
use crate::layout::{
    BoundingBox, CardFace, PackedUnit, Point, RenderedZone, ResolvedStyles, SheetLayout,
    TextAnchor, UnitContent,
};
use crate::model::ZoneKind;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Embed loaded fonts as `@font-face` rules
    pub fn add_font_faces(&mut self, fonts: &FontReadiness) {
        if !self.config.embed_fonts {
            return;
        }
        for face in &fonts.faces {
            self.styles.push(face.css());
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Prefixed class names followed by extra classes
    fn class_list(&self, base: &[&str], extra: &[String]) -> String {
        let prefix = self.prefix();
        base.iter()
            .map(|c| format!("{}{}", prefix, c))
            .chain(extra.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add a rectangular clip path definition
    pub fn add_clip_rect(&mut self, id: &str, bounds: BoundingBox) {
        self.defs.push(format!(
            r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            id,
            num(bounds.x),
            num(bounds.y),
            num(bounds.width),
            num(bounds.height)
        ));
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, bounds: BoundingBox, classes: &[&str], styles: &str) {
        let class_list = self.class_list(classes, &[]);
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            class_list,
            num(bounds.x),
            num(bounds.y),
            num(bounds.width),
            num(bounds.height),
            styles
        ));
    }

    /// Add a line element
    pub fn add_line(&mut self, from: Point, to: Point, classes: &[&str], styles: &str) {
        let class_list = self.class_list(classes, &[]);
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            class_list,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            styles
        ));
    }

    /// Add a text element, vertically centered on `origin`
    pub fn add_text(
        &mut self,
        text: &str,
        origin: Point,
        anchor: TextAnchor,
        classes: &[&str],
        styles: &str,
    ) {
        let class_list = self.class_list(classes, &[]);
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            class_list,
            num(origin.x),
            num(origin.y),
            anchor.as_str(),
            styles,
            escape_xml(text)
        ));
    }

    /// Add an image element covering `bounds`
    pub fn add_image(&mut self, href: &str, bounds: BoundingBox, classes: &[&str]) {
        let class_list = self.class_list(classes, &[]);
        self.elements.push(format!(
            r#"{}<image class="{}" href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice"/>"#,
            self.indent_str(),
            class_list,
            escape_xml(href),
            num(bounds.x),
            num(bounds.y),
            num(bounds.width),
            num(bounds.height)
        ));
    }

    /// Add a group element with optional ID, classes and extra attributes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[&str], attrs: &str) {
        let id_attr = id
            .map(|i| format!(r#" id="{}""#, escape_xml(i)))
            .unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, self.class_list(classes, &[]))
        };

        self.elements.push(format!(
            "{}<g{}{}{}>",
            self.indent_str(),
            id_attr,
            class_attr,
            attrs
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    ///
    /// `unit` is appended to the width and height attributes ("mm" for print
    /// sheets, "" for pixel previews).
    pub fn build(self, width: f64, height: f64, unit: &str, viewbox: BoundingBox) -> String {
        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}{}" height="{}{}" viewBox="{} {} {} {}">"#,
            num(width),
            unit,
            num(height),
            unit,
            num(viewbox.x),
            num(viewbox.y),
            num(viewbox.width),
            num(viewbox.height)
        ));
        svg.push_str(nl);

        if let Some(title) = &self.config.title {
            svg.push_str(&format!("  <title>{}</title>", escape_xml(title)));
            svg.push_str(nl);
        }

        if !self.styles.is_empty() {
            svg.push_str("  <style><![CDATA[");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(&style.replace("]]>", "]]]]><![CDATA[>"));
                svg.push_str(nl);
            }
            svg.push_str("  ]]></style>");
            svg.push_str(nl);
        }

        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a single card face as a standalone document in output pixels
///
/// The view covers the bleed box; trim and bleed outlines are added when guides
/// are enabled.
pub fn render_card_svg(face: &CardFace, fonts: &FontReadiness, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_font_faces(fonts);

    let side_class = face.side.as_str();
    builder.start_group(None, &["card", side_class], "");
    render_face(face, &mut builder);
    builder.end_group();

    let view = face.bleed_box();
    builder.build(view.width, view.height, "", view)
}

/// Render a packed sheet to an SVG document sized in millimetres
pub fn render_sheet_svg(sheet: &SheetLayout, fonts: &FontReadiness, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_font_faces(fonts);

    let clip_id = format!("{}bleed", builder.prefix());
    let first_face = sheet.units.iter().find_map(|u| match &u.content {
        UnitContent::Card(face) => Some(face),
        UnitContent::Placeholder { .. } => None,
    });
    if let Some(face) = first_face {
        builder.add_clip_rect(&clip_id, face.bleed_box());
    }

    let mark_styles = format!(
        r#" stroke="{}" stroke-width="{}""#,
        escape_xml(&config.mark_color),
        num(sheet.mark_stroke)
    );
    for unit in &sheet.units {
        render_unit(unit, &mark_styles, &clip_id, &mut builder);
    }

    builder.build(sheet.width, sheet.height, "mm", sheet.bounds())
}

fn render_unit(unit: &PackedUnit, mark_styles: &str, clip_id: &str, builder: &mut SvgBuilder) {
    let id = format!("unit-{}", unit.position);
    let entity_attr = format!(r#" data-entity="{}""#, escape_xml(unit.entity_id.as_str()));
    builder.start_group(Some(&id), &["unit", unit.side.as_str()], &entity_attr);

    match &unit.content {
        UnitContent::Card(face) => {
            // Card content is in output pixels; map it onto the trim box in mm
            let transform = format!(
                r#" transform="translate({} {}) scale({})""#,
                num(unit.trim.x),
                num(unit.trim.y),
                1.0 / face.scale.px_per_mm()
            );
            builder.start_group(None, &["card"], &transform);
            builder.start_group(None, &[], &format!(r#" clip-path="url(#{})""#, clip_id));
            render_face(face, builder);
            builder.end_group();
            builder.end_group();
        }
        UnitContent::Placeholder { reason } => {
            builder.add_rect(
                unit.trim,
                &["placeholder"],
                r##" fill="#ffffff" stroke="#cc0000" stroke-width="0.3" stroke-dasharray="2,1""##,
            );
            builder.add_text(
                reason,
                unit.trim.center(),
                TextAnchor::Middle,
                &["placeholder-reason"],
                r##" font-size="2.5" fill="#cc0000""##,
            );
        }
    }

    for mark in &unit.marks {
        for (from, to) in mark.arms() {
            builder.add_line(from, to, &["mark"], mark_styles);
        }
    }

    builder.end_group();
}

fn render_face(face: &CardFace, builder: &mut SvgBuilder) {
    if let Some(background) = &face.background {
        let bleed_box = face.bleed_box();
        if let Some(color) = &background.color {
            builder.add_rect(
                bleed_box,
                &["background"],
                &format!(r#" fill="{}""#, escape_xml(color)),
            );
        }
        if let Some(image) = &background.image {
            builder.add_image(image, bleed_box, &["background"]);
        }
    }

    for zone in &face.zones {
        render_zone(zone, builder);
    }

    if builder.config.show_guides {
        builder.add_rect(
            face.trim_box(),
            &["guide", "trim"],
            r##" fill="none" stroke="#00aaff" stroke-dasharray="4,2""##,
        );
        builder.add_rect(
            face.bleed_box(),
            &["guide", "bleed"],
            r##" fill="none" stroke="#ff00aa" stroke-dasharray="4,2""##,
        );
    }
}

fn render_zone(zone: &RenderedZone, builder: &mut SvgBuilder) {
    let fill = zone
        .styles
        .fill
        .as_ref()
        .map(|f| format!(r#" fill="{}""#, escape_xml(f)));

    match &zone.kind {
        ZoneKind::Text => {
            if let Some(fill) = &fill {
                builder.add_rect(zone.bounds, &["zone-fill"], fill);
            }
            builder.add_text(
                &zone.value,
                zone.text_origin,
                zone.anchor,
                &["zone", "text"],
                &format_text_styles(&zone.styles),
            );
        }
        ZoneKind::Image => {
            if zone.value.is_empty() {
                return;
            }
            builder.add_image(&zone.value, zone.bounds, &["zone", "image"]);
        }
        ZoneKind::Shape => {
            let color = zone
                .styles
                .color
                .as_ref()
                .map(|c| format!(r#" fill="{}""#, escape_xml(c)));
            let styles = fill.or(color).unwrap_or_default();
            builder.add_rect(zone.bounds, &["zone", "shape"], &styles);
        }
        ZoneKind::Other(kind) => {
            // Content types without a native drawing show their bound value in a frame
            let kind_class = sanitize_class(kind);
            let frame = fill.unwrap_or_else(|| {
                r##" fill="none" stroke="#999999" stroke-width="1""##.to_string()
            });
            builder.add_rect(zone.bounds, &["zone", kind_class.as_str()], &frame);
            builder.add_text(
                &zone.value,
                zone.bounds.center(),
                TextAnchor::Middle,
                &["zone-value"],
                &format_text_styles(&zone.styles),
            );
        }
    }
}

/// Format text styles as SVG attributes
fn format_text_styles(styles: &ResolvedStyles) -> String {
    let mut parts = vec![];
    if let Some(family) = &styles.font_family {
        parts.push(format!(r#" font-family="{}""#, escape_xml(family)));
    }
    if let Some(size) = styles.font_size {
        parts.push(format!(r#" font-size="{}""#, num(size)));
    }
    if let Some(weight) = &styles.font_weight {
        parts.push(format!(r#" font-weight="{}""#, escape_xml(weight)));
    }
    if let Some(color) = &styles.color {
        parts.push(format!(r#" fill="{}""#, escape_xml(color)));
    }
    parts.join("")
}

/// Format a coordinate, rounded to three decimals
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

fn sanitize_class(kind: &str) -> String {
    kind.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
