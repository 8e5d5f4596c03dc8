//! Template, zone, entity and selection types

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Density of the design canvas that zone coordinates are authored in
pub const DESIGN_DPI: f64 = 96.0;

/// Identifier of a template record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a card subject (roster member)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who owns a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerScope {
    System,
    Tenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    #[default]
    Horizontal,
}

/// Physical unit a template's dimensions are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    In,
    Pt,
    /// CSS pixels at 96 per inch
    Px,
}

impl Unit {
    /// Convert a value in this unit to millimetres
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Unit::Mm => value,
            Unit::Cm => value * 10.0,
            Unit::In => value * MM_PER_INCH,
            Unit::Pt => value * MM_PER_INCH / 72.0,
            Unit::Px => value * MM_PER_INCH / DESIGN_DPI,
        }
    }
}

/// Card face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill painted across the whole bleed box of one side
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Background {
    pub color: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Backgrounds {
    pub front: Option<Background>,
    pub back: Option<Background>,
}

impl Backgrounds {
    pub fn for_side(&self, side: Side) -> Option<&Background> {
        match side {
            Side::Front => self.front.as_ref(),
            Side::Back => self.back.as_ref(),
        }
    }
}

/// A card template as persisted by the template store
///
/// `zones` is kept as raw JSON: layouts are authored elsewhere and only parsed
/// when a card is rendered, so one broken layout cannot fail resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub owner_scope: OwnerScope,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub parent_template_id: Option<TemplateId>,
    pub name: String,
    #[serde(default)]
    pub orientation: Orientation,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub bleed: f64,
    #[serde(default)]
    pub zones: Value,
    #[serde(default)]
    pub background: Backgrounds,
}

impl Template {
    pub fn is_system(&self) -> bool {
        self.owner_scope == OwnerScope::System
    }

    /// Tenant template that customizes another template
    pub fn is_override(&self) -> bool {
        self.owner_scope == OwnerScope::Tenant && self.parent_template_id.is_some()
    }

    /// Trim size in millimetres (width, height)
    pub fn trim_size_mm(&self) -> (f64, f64) {
        (self.unit.to_mm(self.width), self.unit.to_mm(self.height))
    }

    /// Bleed margin in millimetres
    pub fn bleed_mm(&self) -> f64 {
        self.unit.to_mm(self.bleed)
    }

    /// Check the physical invariants: positive size, non-negative bleed
    pub fn validate_geometry(&self) -> Result<(), String> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(format!(
                "card size must be positive, got {} x {}",
                self.width, self.height
            ));
        }
        if !self.bleed.is_finite() || self.bleed < 0.0 {
            return Err(format!("bleed must be >= 0, got {}", self.bleed));
        }
        Ok(())
    }

    /// Parse the raw zone layout
    ///
    /// An absent layout (`null`) is an empty card; anything that is not an array
    /// of zones is an error.
    pub fn parse_zones(&self) -> Result<Vec<Zone>, serde_json::Error> {
        if self.zones.is_null() {
            return Ok(Vec::new());
        }
        Vec::<Zone>::deserialize(&self.zones)
    }
}

/// Kind of content a zone holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Text,
    Image,
    /// Static decorative rectangle
    Shape,
    /// Any other bound content (barcode, qr, ...)
    #[serde(untagged)]
    Other(String),
}

impl ZoneKind {
    pub fn as_str(&self) -> &str {
        match self {
            ZoneKind::Text => "text",
            ZoneKind::Image => "image",
            ZoneKind::Shape => "shape",
            ZoneKind::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
    #[serde(default)]
    pub align: TextAlign,
}

/// A positioned region of a card bound to one entity attribute
///
/// Coordinates are design pixels at [`DESIGN_DPI`], relative to the trim box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(rename = "type")]
    pub kind: ZoneKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub style: ZoneStyle,
    #[serde(default, alias = "binding")]
    pub data_key: Option<String>,
    /// Literal content used when there is no binding
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub side: Side,
}

/// A card subject with the attributes zone bindings read from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(id),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute, following dotted paths into nested objects
    ///
    /// An exact key match wins over a path, so `"guardian.name"` stored flat is found too.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.attributes.get(key) {
            return Some(value);
        }
        let mut parts = key.split('.');
        let mut current = self.attributes.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Attribute rendered as display text; missing or null values are `None`
    pub fn display_value(&self, key: &str) -> Option<String> {
        match self.attribute(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// Ordered, deduplicated list of entities chosen for one print run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    ids: Vec<EntityId>,
}

impl Selection {
    /// Build a selection, keeping the first occurrence of each id
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .map(EntityId::new)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self { ids }
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template_json() -> Value {
        json!({
            "id": "id-standard",
            "ownerScope": "system",
            "parentTemplateId": null,
            "name": "ID-Standard",
            "orientation": "horizontal",
            "width": 86,
            "height": 54,
            "unit": "mm",
            "bleed": 3,
            "zones": [
                {"type": "text", "x": 10, "y": 10, "width": 120, "height": 20,
                 "style": {"fontFamily": "Roboto", "fontSize": 12, "align": "center"},
                 "dataKey": "name", "side": "front"},
                {"type": "barcode", "x": 10, "y": 40, "width": 120, "height": 30,
                 "dataKey": "admissionNumber", "side": "back"}
            ]
        })
    }

    #[test]
    fn test_template_from_record() {
        let template: Template = serde_json::from_value(template_json()).unwrap();
        assert!(template.is_system());
        assert!(!template.is_override());
        assert_eq!(template.trim_size_mm(), (86.0, 54.0));
        assert_eq!(template.bleed_mm(), 3.0);

        let zones = template.parse_zones().unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].kind, ZoneKind::Text);
        assert_eq!(zones[0].style.align, TextAlign::Center);
        assert_eq!(zones[1].kind, ZoneKind::Other("barcode".to_string()));
        assert_eq!(zones[1].side, Side::Back);
        assert_eq!(zones[1].data_key.as_deref(), Some("admissionNumber"));
    }

    #[test]
    fn test_malformed_zones_fail_only_on_parse() {
        let mut record = template_json();
        record["zones"] = json!({"not": "a list"});
        let template: Template = serde_json::from_value(record).unwrap();
        assert!(template.parse_zones().is_err());
    }

    #[test]
    fn test_missing_zones_is_empty_layout() {
        let mut record = template_json();
        record.as_object_mut().unwrap().remove("zones");
        let template: Template = serde_json::from_value(record).unwrap();
        assert!(template.parse_zones().unwrap().is_empty());
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Unit::Mm.to_mm(86.0), 86.0);
        assert_eq!(Unit::Cm.to_mm(8.6), 86.0);
        assert_eq!(Unit::In.to_mm(1.0), 25.4);
        assert!((Unit::Pt.to_mm(72.0) - 25.4).abs() < 1e-9);
        assert!((Unit::Px.to_mm(96.0) - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_validate_geometry() {
        let mut template: Template = serde_json::from_value(template_json()).unwrap();
        assert!(template.validate_geometry().is_ok());

        template.bleed = -1.0;
        assert!(template.validate_geometry().is_err());

        template.bleed = 0.0;
        template.height = 0.0;
        assert!(template.validate_geometry().is_err());
    }

    #[test]
    fn test_entity_attribute_lookup() {
        let entity = Entity::new("E1")
            .with_attribute("name", "Ada")
            .with_attribute("grade", 7)
            .with_attribute("guardian", json!({"name": "Byron"}))
            .with_attribute("photo", Value::Null);

        assert_eq!(entity.display_value("name").as_deref(), Some("Ada"));
        assert_eq!(entity.display_value("grade").as_deref(), Some("7"));
        assert_eq!(entity.display_value("guardian.name").as_deref(), Some("Byron"));
        assert_eq!(entity.display_value("photo"), None);
        assert_eq!(entity.display_value("admissionNumber"), None);
    }

    #[test]
    fn test_default_entity_is_blank() {
        let entity = Entity::default();
        assert_eq!(entity.id, EntityId::default());
        assert_eq!(entity.id.as_str(), "");
        assert!(entity.attributes.is_empty());
        assert_eq!(entity.display_value("name"), None);
    }

    #[test]
    fn test_selection_dedup_keeps_first_occurrence() {
        let selection = Selection::new(["E2", "E1", "E2", "E3", "E1"]);
        let ids: Vec<&str> = selection.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E1", "E3"]);
        assert_eq!(selection.len(), 3);
        assert!(Selection::default().is_empty());
    }
}
