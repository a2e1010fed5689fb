use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::node::{Fill, NodeRef};

/// A property value as seen through the property layer.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Color(Color),
    Fill(Fill),
    Node(NodeRef),
}

impl PropertyValue {
    /// Name of the runtime type of this value, or `None` for [`PropertyValue::Null`].
    pub fn type_name(&self) -> Option<String> {
        let name = match self {
            PropertyValue::Null => return None,
            PropertyValue::Bool(_) => "Boolean",
            PropertyValue::Number(_) => "Double",
            PropertyValue::Text(_) => "String",
            PropertyValue::Color(_) => "Color",
            PropertyValue::Fill(fill) => fill.kind_name(),
            PropertyValue::Node(node) => node.type_name(),
        };
        Some(name.to_string())
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            PropertyValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

/// Display form sent back to clients. `Null` renders as an empty string.
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            PropertyValue::Number(n) => write!(f, "{n}"),
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Color(color) => write!(f, "{color}"),
            PropertyValue::Fill(fill) => write!(f, "{fill}"),
            PropertyValue::Node(node) => f.write_str(node.type_name()),
        }
    }
}

/// A value read back from the property layer together with its declared type.
#[derive(Debug, Clone)]
pub struct PropertyRead {
    pub value: PropertyValue,
    pub declared_type: String,
}

impl PropertyRead {
    /// Runtime type of the value, falling back to the declared type for nulls.
    pub fn value_type(&self) -> String {
        self.value
            .type_name()
            .unwrap_or_else(|| self.declared_type.clone())
    }
}

/// A screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_type() {
        assert_eq!(PropertyValue::Bool(true).to_string(), "True");
        assert_eq!(PropertyValue::Number(0.5).to_string(), "0.5");
        assert_eq!(PropertyValue::Null.to_string(), "");
        assert_eq!(PropertyValue::Null.type_name(), None);
        assert_eq!(
            PropertyValue::Fill(Fill::Solid(Color::RED)).type_name().as_deref(),
            Some("SolidColorBrush")
        );
    }

    #[test]
    fn test_null_read_uses_declared_type() {
        let read = PropertyRead {
            value: PropertyValue::Null,
            declared_type: "Object".into(),
        };
        assert_eq!(read.value_type(), "Object");
    }

    #[test]
    fn test_rect() {
        let rect = Rect::from_origin_size(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right, 40.0);
        assert_eq!(rect.height(), 40.0);
    }
}
