//! Collaborators the addressing core consumes.
//!
//! Every trait here is implemented by the host side (see `visprobe-scene` for
//! the headless implementation). All calls happen on the tree-owner thread.

use crate::error::ProbeError;
use crate::node::NodeRef;
use crate::value::{PropertyRead, PropertyValue, Rect};

/// Value type name that asks the property layer to parse the value as markup.
pub const MARKUP_VALUE_TYPE: &str = "markup";

/// Reads and writes named properties, converting to and from strings.
pub trait PropertyLayer {
    /// Reads `name` from `node`. With `owner_type`, only properties owned by
    /// (or attached from) that type are considered.
    fn get_property(
        &self,
        node: &NodeRef,
        name: &str,
        owner_type: Option<&str>,
    ) -> Result<PropertyRead, ProbeError>;

    /// Converts `value` and writes it, then re-reads the stored value, which
    /// may have been coerced.
    fn set_property(
        &self,
        node: &NodeRef,
        name: &str,
        value: &str,
        value_type: Option<&str>,
        owner_type: Option<&str>,
    ) -> Result<PropertyRead, ProbeError>;
}

/// Turns a markup document into a tree.
pub trait MarkupLoader {
    fn parse(&self, document: &str) -> Result<NodeRef, ProbeError>;

    /// Parses a resource document into `(key, value)` pairs.
    fn parse_resources(&self, document: &str) -> Result<Vec<(String, PropertyValue)>, ProbeError>;
}

/// The running application that owns the windows.
pub trait Application {
    fn windows(&self) -> Vec<NodeRef>;

    fn main_window(&self) -> Option<NodeRef>;

    /// Takes ownership of a freshly loaded window and shows it.
    fn show_window(&mut self, window: NodeRef) -> Result<(), ProbeError>;

    /// Looks `key` up starting at `scope` (walking its ancestors), then in the
    /// application resources.
    fn find_resource(&self, scope: Option<&NodeRef>, key: &str) -> Option<PropertyValue>;

    fn merge_resources(&mut self, resources: Vec<(String, PropertyValue)>);

    /// Screen rectangle of a laid-out element.
    fn screen_bounds(&self, node: &NodeRef) -> Option<Rect>;

    /// Moves keyboard focus; returns whether `node` now has focus.
    fn focus(&mut self, node: &NodeRef) -> bool;

    fn focused(&self) -> Option<NodeRef>;

    fn send_text(&mut self, target: &NodeRef, text: &str) -> Result<(), ProbeError>;
}

/// Grabs screen pixels.
pub trait ScreenCapture {
    /// Captures a `width` x `height` region whose top-left corner is at
    /// (`left`, `top`), encoded as a bitmap.
    fn capture(&self, left: i32, top: i32, width: u32, height: u32) -> Result<Vec<u8>, ProbeError>;
}
