//! Headless application host.
//!
//! Owns the shown windows, application resources and keyboard focus. Layout
//! is not computed: an element's screen position is the sum of the `Left` and
//! `Top` properties along its primary ancestor chain, and its size is its own
//! `Width` and `Height`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use visprobe_core::{
    same_node, Application, Capability, NodeRef, ProbeError, PropertyValue, Rect, WeakNodeRef,
};

use crate::element::Element;

#[derive(Debug, Default)]
pub struct HeadlessApplication {
    windows: Vec<NodeRef>,
    resources: BTreeMap<String, PropertyValue>,
    focused: Option<WeakNodeRef>,
}

impl HeadlessApplication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes a window, releasing the application's ownership of its tree.
    /// Returns whether the window was open.
    pub fn close_window(&mut self, window: &NodeRef) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| !same_node(w, window));
        let closed = self.windows.len() != before;
        if closed {
            info!(type_name = window.type_name(), "Closed window");
        }
        closed
    }
}

fn ancestors_inclusive(node: &NodeRef) -> impl Iterator<Item = NodeRef> {
    std::iter::successors(Some(Arc::clone(node)), |n| n.parent())
}

fn number(node: &NodeRef, name: &str) -> f64 {
    node.as_any()
        .downcast_ref::<Element>()
        .and_then(|e| e.number(name))
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

impl Application for HeadlessApplication {
    fn windows(&self) -> Vec<NodeRef> {
        self.windows.clone()
    }

    fn main_window(&self) -> Option<NodeRef> {
        self.windows.first().cloned()
    }

    fn show_window(&mut self, window: NodeRef) -> Result<(), ProbeError> {
        if !window.has_capability(Capability::Window) {
            return Err(ProbeError::CapabilityMismatch {
                node_type: window.type_name().to_string(),
                capability: Capability::Window,
            });
        }
        if !self.windows.iter().any(|w| same_node(w, &window)) {
            info!(type_name = window.type_name(), name = ?window.name(), "Showing window");
            self.windows.push(window);
        }
        Ok(())
    }

    fn find_resource(&self, scope: Option<&NodeRef>, key: &str) -> Option<PropertyValue> {
        let scoped = scope.into_iter().flat_map(ancestors_inclusive).find_map(|node| {
            node.as_any()
                .downcast_ref::<Element>()
                .and_then(|e| e.resource(key))
        });
        scoped.or_else(|| self.resources.get(key).cloned())
    }

    fn merge_resources(&mut self, resources: Vec<(String, PropertyValue)>) {
        debug!(count = resources.len(), "Merging application resources");
        self.resources.extend(resources);
    }

    fn screen_bounds(&self, node: &NodeRef) -> Option<Rect> {
        if !node.has_capability(Capability::Element) {
            return None;
        }
        let (left, top) = ancestors_inclusive(node).fold((0.0, 0.0), |(left, top), n| {
            (left + number(&n, "Left"), top + number(&n, "Top"))
        });
        Some(Rect::from_origin_size(
            left,
            top,
            number(node, "Width"),
            number(node, "Height"),
        ))
    }

    fn focus(&mut self, node: &NodeRef) -> bool {
        let enabled = node
            .as_any()
            .downcast_ref::<Element>()
            .and_then(|e| e.value("IsEnabled"))
            .map_or(true, |v| !matches!(v, PropertyValue::Bool(false)));
        if !node.has_capability(Capability::Input) || !enabled {
            return false;
        }
        self.focused = Some(Arc::downgrade(node));
        true
    }

    fn focused(&self) -> Option<NodeRef> {
        self.focused.as_ref().and_then(|weak| weak.upgrade())
    }

    fn send_text(&mut self, target: &NodeRef, text: &str) -> Result<(), ProbeError> {
        let element = target
            .as_any()
            .downcast_ref::<Element>()
            .filter(|_| target.has_capability(Capability::Input))
            .ok_or_else(|| ProbeError::CapabilityMismatch {
                node_type: target.type_name().to_string(),
                capability: Capability::Input,
            })?;
        element.append_text(text);
        debug!(type_name = target.type_name(), chars = text.chars().count(), "Delivered text input");
        Ok(())
    }
}
