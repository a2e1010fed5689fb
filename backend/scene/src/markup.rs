//! YAML markup loader.
//!
//! A document describes one element:
//!
//! ```yaml
//! type: Window
//! name: MainWindow
//! properties:
//!   Background: "#FFFFFFFF"
//!   Grid.Row: 1            # attached property owned by Grid
//!   Content:               # element-valued property
//!     type: TextBlock
//! resources:
//!   Accent: "#FF0078D7"
//! children: []             # primary hierarchy
//! logical: []              # fallback hierarchy
//! overlay: []              # overlay members
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use visprobe_core::{Color, Fill, MarkupLoader, NodeRef, ProbeError, PropertyValue};

use crate::element::Element;
use crate::kind::ValueKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDocument {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub resources: BTreeMap<String, Value>,
    #[serde(default)]
    pub children: Vec<ElementDocument>,
    #[serde(default)]
    pub logical: Vec<ElementDocument>,
    #[serde(default)]
    pub overlay: Vec<ElementDocument>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlMarkupLoader;

impl YamlMarkupLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parses a document into a concrete element tree.
    pub fn parse_element(&self, document: &str) -> Result<Arc<Element>, ProbeError> {
        let doc: ElementDocument =
            serde_yaml::from_str(document).map_err(|e| ProbeError::Markup(e.to_string()))?;
        build(doc)
    }
}

impl MarkupLoader for YamlMarkupLoader {
    fn parse(&self, document: &str) -> Result<NodeRef, ProbeError> {
        Ok(self.parse_element(document)? as NodeRef)
    }

    fn parse_resources(&self, document: &str) -> Result<Vec<(String, PropertyValue)>, ProbeError> {
        let entries: BTreeMap<String, Value> =
            serde_yaml::from_str(document).map_err(|e| ProbeError::Markup(e.to_string()))?;
        entries
            .into_iter()
            .map(|(key, raw)| Ok((key, resource_value(&raw)?)))
            .collect()
    }
}

fn build(doc: ElementDocument) -> Result<Arc<Element>, ProbeError> {
    let element = Element::new(&doc.type_name);

    if let Some(name) = doc.name {
        element.set_property("Name", None, PropertyValue::Text(name));
    }

    for (key, raw) in &doc.properties {
        let (owner, name) = split_attached(key);
        let kind = element
            .declared_kind(name)
            .unwrap_or_else(|| ValueKind::for_property(name));
        let value = property_value(raw, kind)
            .map_err(|e| ProbeError::Markup(format!("{}.{key}: {e}", doc.type_name)))?;
        element.set_property(name, owner, value);
    }

    for (key, raw) in &doc.resources {
        element.add_resource(key.clone(), resource_value(raw)?);
    }

    for child in doc.children {
        element.add_child(build(child)?);
    }
    for child in doc.logical {
        element.add_logical_child(build(child)?);
    }
    for member in doc.overlay {
        element.add_overlay(build(member)?);
    }

    debug!(type_name = %doc.type_name, "Built element from markup");
    Ok(element)
}

/// `"Grid.Row"` → `(Some("Grid"), "Row")`.
fn split_attached(key: &str) -> (Option<&str>, &str) {
    match key.split_once('.') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => (Some(owner), name),
        _ => (None, key),
    }
}

fn property_value(raw: &Value, kind: ValueKind) -> Result<PropertyValue, ProbeError> {
    match raw {
        Value::Null => Ok(PropertyValue::Null),
        Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(PropertyValue::Number)
            .ok_or_else(|| ProbeError::Markup(format!("number {n} out of range"))),
        Value::String(s) => kind.convert(s).map_err(ProbeError::Markup),
        Value::Mapping(map) => mapping_value(raw, map),
        Value::Sequence(_) => Err(ProbeError::Markup("sequences are not property values".into())),
        Value::Tagged(tagged) => property_value(&tagged.value, kind),
    }
}

fn mapping_value(raw: &Value, map: &serde_yaml::Mapping) -> Result<PropertyValue, ProbeError> {
    if map.contains_key("type") {
        let doc: ElementDocument =
            serde_yaml::from_value(raw.clone()).map_err(|e| ProbeError::Markup(e.to_string()))?;
        return Ok(PropertyValue::Node(build(doc)? as NodeRef));
    }
    if let Some(stops) = map.get("linearGradient") {
        return Ok(PropertyValue::Fill(Fill::LinearGradient(gradient_stops(stops)?)));
    }
    if let Some(stops) = map.get("radialGradient") {
        return Ok(PropertyValue::Fill(Fill::RadialGradient(gradient_stops(stops)?)));
    }
    if let Some(Value::String(source)) = map.get("image") {
        return Ok(PropertyValue::Fill(Fill::Image(source.clone())));
    }
    Err(ProbeError::Markup(
        "mapping values must be an element (with 'type') or a fill".into(),
    ))
}

fn gradient_stops(raw: &Value) -> Result<Vec<Color>, ProbeError> {
    let Value::Sequence(stops) = raw else {
        return Err(ProbeError::Markup("gradient stops must be a list of colors".into()));
    };
    stops
        .iter()
        .map(|stop| match stop {
            Value::String(s) => s.parse::<Color>().map_err(|e| ProbeError::Markup(e.to_string())),
            other => Err(ProbeError::Markup(format!("invalid gradient stop {other:?}"))),
        })
        .collect()
}

/// Resource values have no declared type: color-looking strings become colors.
fn resource_value(raw: &Value) -> Result<PropertyValue, ProbeError> {
    if let Value::String(s) = raw {
        if s.starts_with('#') {
            if let Ok(color) = s.parse::<Color>() {
                return Ok(PropertyValue::Color(color));
            }
        }
    }
    property_value(raw, ValueKind::Text)
}
