//! Element type families and declared property types.

use visprobe_core::{Capability, Color, Fill, PropertyValue};

const PANEL_TYPES: &[&str] = &["Grid", "StackPanel", "DockPanel", "Canvas", "WrapPanel", "UniformGrid"];

const CONTROL_TYPES: &[&str] = &[
    "Window",
    "UserControl",
    "ContentControl",
    "Button",
    "CheckBox",
    "ComboBox",
    "Label",
    "ListBox",
    "TextBox",
    "PasswordBox",
    "RichTextBox",
];

const INPUT_TYPES: &[&str] = &[
    "Window",
    "Button",
    "CheckBox",
    "ComboBox",
    "ListBox",
    "TextBox",
    "PasswordBox",
    "RichTextBox",
];

/// Flow-content types: part of the logical hierarchy only, never laid out.
const CONTENT_TYPES: &[&str] = &["FlowDocument", "Paragraph", "Section", "Run", "Span", "Bold", "Italic", "LineBreak"];

const TEXT_TYPES: &[&str] = &["TextBox", "TextBlock", "PasswordBox", "Run"];

const CONTENT_HOST_TYPES: &[&str] = &["Window", "UserControl", "ContentControl", "Button", "CheckBox", "Label"];

pub fn is_panel(type_name: &str) -> bool {
    PANEL_TYPES.contains(&type_name)
}

pub fn is_control(type_name: &str) -> bool {
    CONTROL_TYPES.contains(&type_name)
}

pub fn is_content(type_name: &str) -> bool {
    CONTENT_TYPES.contains(&type_name)
}

/// Borders, panels and controls paint a `Background`.
pub fn has_background(type_name: &str) -> bool {
    type_name == "Border" || is_panel(type_name) || is_control(type_name)
}

pub fn capabilities_for(type_name: &str) -> Vec<Capability> {
    if is_content(type_name) {
        return Vec::new();
    }
    let mut capabilities = vec![Capability::Element, Capability::Visual];
    if type_name == "Window" {
        capabilities.push(Capability::Window);
    }
    if INPUT_TYPES.contains(&type_name) {
        capabilities.push(Capability::Input);
    }
    capabilities
}

/// Base type names an owner-type hint may use for a property declared on
/// `type_name` itself.
pub fn owner_families(type_name: &str) -> Vec<&'static str> {
    if is_content(type_name) {
        return vec!["FrameworkContentElement", "TextElement"];
    }
    let mut families = vec!["FrameworkElement", "UIElement"];
    if is_control(type_name) {
        families.push("Control");
    }
    if is_panel(type_name) {
        families.push("Panel");
    }
    families
}

/// Properties every element of `type_name` starts with.
pub fn default_properties(type_name: &str) -> Vec<(&'static str, ValueKind, PropertyValue)> {
    let mut defaults = vec![("Name", ValueKind::Text, PropertyValue::Text(String::new()))];
    if !is_content(type_name) {
        defaults.push(("Opacity", ValueKind::Number, PropertyValue::Number(1.0)));
        defaults.push(("IsEnabled", ValueKind::Bool, PropertyValue::Bool(true)));
        defaults.push(("Width", ValueKind::Number, PropertyValue::Number(0.0)));
        defaults.push(("Height", ValueKind::Number, PropertyValue::Number(0.0)));
    }
    if has_background(type_name) {
        defaults.push(("Background", ValueKind::Fill, PropertyValue::Null));
    }
    if TEXT_TYPES.contains(&type_name) {
        defaults.push(("Text", ValueKind::Text, PropertyValue::Text(String::new())));
    }
    if CONTENT_HOST_TYPES.contains(&type_name) {
        defaults.push(("Content", ValueKind::Object, PropertyValue::Null));
    }
    if type_name == "RichTextBox" {
        defaults.push(("Document", ValueKind::Object, PropertyValue::Null));
    }
    defaults
}

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Number,
    Text,
    Color,
    Fill,
    Object,
}

impl ValueKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ValueKind::Bool => "Boolean",
            ValueKind::Number => "Double",
            ValueKind::Text => "String",
            ValueKind::Color => "Color",
            ValueKind::Fill => "Brush",
            ValueKind::Object => "Object",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Boolean" | "bool" => ValueKind::Bool,
            "Double" | "number" => ValueKind::Number,
            "String" | "string" => ValueKind::Text,
            "Color" => ValueKind::Color,
            "Brush" | "SolidColorBrush" => ValueKind::Fill,
            "Object" => ValueKind::Object,
            _ => return None,
        };
        Some(kind)
    }

    /// Declared type for a property that is not part of an element's defaults.
    pub fn for_property(name: &str) -> Self {
        match name {
            "Opacity" | "Width" | "Height" | "Left" | "Top" | "FontSize" | "Row" | "Column"
            | "RowSpan" | "ColumnSpan" | "ZIndex" => ValueKind::Number,
            "Background" | "Foreground" | "BorderBrush" | "Fill" | "Stroke" => ValueKind::Fill,
            "IsEnabled" | "IsChecked" | "IsReadOnly" | "Focusable" | "IsVisible" => ValueKind::Bool,
            "Color" => ValueKind::Color,
            "Content" | "Child" | "Document" | "Header" | "ToolTip" | "Tag" => ValueKind::Object,
            _ => ValueKind::Text,
        }
    }

    /// Converts the string form of a value.
    pub fn convert(self, raw: &str) -> Result<PropertyValue, String> {
        match self {
            ValueKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(PropertyValue::Bool(true)),
                "false" => Ok(PropertyValue::Bool(false)),
                _ => Err(format!("'{raw}' is not a valid Boolean")),
            },
            ValueKind::Number => raw
                .trim()
                .parse::<f64>()
                .map(PropertyValue::Number)
                .map_err(|_| format!("'{raw}' is not a valid Double")),
            ValueKind::Text | ValueKind::Object => Ok(PropertyValue::Text(raw.to_string())),
            ValueKind::Color => raw
                .parse::<Color>()
                .map(PropertyValue::Color)
                .map_err(|e| e.to_string()),
            ValueKind::Fill => raw
                .parse::<Color>()
                .map(|color| PropertyValue::Fill(Fill::Solid(color)))
                .map_err(|e| e.to_string()),
        }
    }
}
