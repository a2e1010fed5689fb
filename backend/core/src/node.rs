//! Node capability model.
//!
//! The element tree belongs to the host application. visprobe only ever sees
//! nodes through [`NodeRef`] (shared) and [`WeakNodeRef`] (observing) handles,
//! and only asks them for the capabilities it needs: children in two
//! hierarchies, a primary parent, an overlay collection, a name, a fill and an
//! opacity factor.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A shared handle to a node in the element tree.
pub type NodeRef = Arc<dyn Node>;

/// A non-owning handle to a node in the element tree.
pub type WeakNodeRef = Weak<dyn Node>;

/// A node of the host application's element tree.
pub trait Node: Send + Sync + 'static {
    /// Concrete type name, e.g. `"TextBox"`. Typed-child query steps match on it.
    fn type_name(&self) -> &str;

    /// Children in the primary (visual) hierarchy.
    fn primary_children(&self) -> Vec<NodeRef>;

    /// Children in the fallback (logical) hierarchy.
    fn fallback_children(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    /// Overlay members attached to this node outside both hierarchies.
    fn overlay(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    /// Parent in the primary hierarchy.
    fn parent(&self) -> Option<NodeRef>;

    fn name(&self) -> Option<String> {
        None
    }

    /// Background fill, for node kinds that have one.
    fn fill(&self) -> Option<Fill> {
        None
    }

    /// Opacity factor, for node kinds that have one.
    fn opacity(&self) -> Option<f64> {
        None
    }

    fn has_capability(&self, capability: Capability) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}#{}", self.type_name(), name),
            None => f.write_str(self.type_name()),
        }
    }
}

/// Reference equality between two node handles.
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// What a node can be used for. Lookups that require a capability treat a
/// node without it as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// A top-level window.
    Window,
    /// A laid-out element with a name, opacity and screen bounds.
    Element,
    /// Participates in the primary hierarchy and can be captured.
    Visual,
    /// Can receive keyboard focus and text input.
    Input,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Window => "Window",
            Capability::Element => "Element",
            Capability::Visual => "Visual",
            Capability::Input => "Input",
        };
        f.write_str(name)
    }
}

/// A background fill. Only [`Fill::Solid`] can be flattened into a color.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    LinearGradient(Vec<Color>),
    RadialGradient(Vec<Color>),
    Image(String),
}

impl Fill {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Fill::Solid(_) => "SolidColorBrush",
            Fill::LinearGradient(_) => "LinearGradientBrush",
            Fill::RadialGradient(_) => "RadialGradientBrush",
            Fill::Image(_) => "ImageBrush",
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Solid(color) => write!(f, "{color}"),
            other => f.write_str(other.kind_name()),
        }
    }
}
