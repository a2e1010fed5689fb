//! In-memory element tree.
//!
//! An [`Element`] is shared through `Arc` and links to its primary parent with
//! a `Weak`, so dropping the last strong handle to a subtree destroys it. All
//! mutable state sits behind `RwLock`s so the tree can be edited through
//! shared handles from the tree-owner thread.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use visprobe_core::{Capability, Fill, Node, NodeRef, PropertyValue};

use crate::kind::{self, ValueKind};

/// A stored property: declared type, attached owner (if any) and value.
#[derive(Debug, Clone)]
pub struct Property {
    pub kind: ValueKind,
    pub owner: Option<String>,
    pub value: PropertyValue,
}

#[derive(Debug)]
pub struct Element {
    type_name: String,
    capabilities: Vec<Capability>,
    properties: RwLock<BTreeMap<String, Property>>,
    resources: RwLock<BTreeMap<String, PropertyValue>>,
    children: RwLock<Vec<Arc<Element>>>,
    logical: RwLock<Vec<Arc<Element>>>,
    overlay: RwLock<Vec<Arc<Element>>>,
    parent: RwLock<Weak<Element>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Element {
    /// Creates a detached element with the default properties of its type.
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        let type_name = type_name.into();
        let properties = kind::default_properties(&type_name)
            .into_iter()
            .map(|(name, kind, value)| {
                (
                    name.to_string(),
                    Property {
                        kind,
                        owner: None,
                        value,
                    },
                )
            })
            .collect();

        Arc::new(Self {
            capabilities: kind::capabilities_for(&type_name),
            type_name,
            properties: RwLock::new(properties),
            resources: RwLock::new(BTreeMap::new()),
            children: RwLock::new(Vec::new()),
            logical: RwLock::new(Vec::new()),
            overlay: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    /// Appends `child` to the primary hierarchy and makes `self` its parent.
    pub fn add_child(self: &Arc<Self>, child: Arc<Element>) {
        *write(&child.parent) = Arc::downgrade(self);
        write(&self.children).push(child);
    }

    /// Removes `child` from the primary hierarchy. Returns whether it was present.
    pub fn remove_child(&self, child: &Arc<Element>) -> bool {
        let mut children = write(&self.children);
        let before = children.len();
        children.retain(|c| !Arc::ptr_eq(c, child));
        let removed = children.len() != before;
        if removed {
            *write(&child.parent) = Weak::new();
        }
        removed
    }

    /// Appends `child` to the logical hierarchy. Logical children have no
    /// primary parent.
    pub fn add_logical_child(&self, child: Arc<Element>) {
        write(&self.logical).push(child);
    }

    pub fn add_overlay(&self, member: Arc<Element>) {
        write(&self.overlay).push(member);
    }

    /// Looks up a property. With `owner`, the property must be attached from
    /// that owner, or be declared on this element's type or one of its families.
    pub fn property(&self, name: &str, owner: Option<&str>) -> Option<Property> {
        let properties = read(&self.properties);
        let property = properties.get(name)?;
        match owner {
            None => Some(property.clone()),
            Some(owner) if self.owns(property, owner) => Some(property.clone()),
            Some(_) => None,
        }
    }

    fn owns(&self, property: &Property, owner: &str) -> bool {
        match &property.owner {
            Some(attached) => attached == owner,
            None => owner == self.type_name || kind::owner_families(&self.type_name).contains(&owner),
        }
    }

    /// Declared type of an existing property.
    pub fn declared_kind(&self, name: &str) -> Option<ValueKind> {
        read(&self.properties).get(name).map(|p| p.kind)
    }

    /// Inserts or replaces a property. An existing property keeps its declared
    /// type and owner; `owner` only applies to new attached properties.
    pub fn set_property(&self, name: &str, owner: Option<&str>, value: PropertyValue) {
        let mut properties = write(&self.properties);
        let (kind, owner) = match properties.get(name) {
            Some(existing) => (existing.kind, existing.owner.clone()),
            None => (ValueKind::for_property(name), owner.map(str::to_string)),
        };
        let kind = match (&value, kind) {
            (PropertyValue::Node(_), ValueKind::Text) => ValueKind::Object,
            _ => kind,
        };
        let value = coerce(name, value);
        properties.insert(
            name.to_string(),
            Property { kind, owner, value },
        );
    }

    pub fn value(&self, name: &str) -> Option<PropertyValue> {
        read(&self.properties).get(name).map(|p| p.value.clone())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(|v| v.as_number())
    }

    pub fn add_resource(&self, key: impl Into<String>, value: PropertyValue) {
        write(&self.resources).insert(key.into(), value);
    }

    pub fn resource(&self, key: &str) -> Option<PropertyValue> {
        read(&self.resources).get(key).cloned()
    }

    /// Appends typed text to the `Text` property.
    pub fn append_text(&self, text: &str) {
        let current = self
            .value("Text")
            .and_then(|v| v.as_text().map(str::to_string))
            .unwrap_or_default();
        self.set_property("Text", None, PropertyValue::Text(current + text));
    }

    pub fn children(&self) -> Vec<Arc<Element>> {
        read(&self.children).clone()
    }
}

/// Value coercion applied on every write.
fn coerce(name: &str, value: PropertyValue) -> PropertyValue {
    match (name, value) {
        ("Opacity", PropertyValue::Number(n)) => PropertyValue::Number(if n.is_nan() { 1.0 } else { n.clamp(0.0, 1.0) }),
        ("Width" | "Height", PropertyValue::Number(n)) => PropertyValue::Number(n.max(0.0)),
        (_, value) => value,
    }
}

impl Node for Element {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn primary_children(&self) -> Vec<NodeRef> {
        read(&self.children).iter().map(|c| c.clone() as NodeRef).collect()
    }

    fn fallback_children(&self) -> Vec<NodeRef> {
        read(&self.logical).iter().map(|c| c.clone() as NodeRef).collect()
    }

    fn overlay(&self) -> Vec<NodeRef> {
        read(&self.overlay).iter().map(|c| c.clone() as NodeRef).collect()
    }

    fn parent(&self) -> Option<NodeRef> {
        read(&self.parent).upgrade().map(|p| p as NodeRef)
    }

    fn name(&self) -> Option<String> {
        self.value("Name")
            .and_then(|v| v.as_text().map(str::to_string))
            .filter(|name| !name.is_empty())
    }

    fn fill(&self) -> Option<Fill> {
        if !kind::has_background(&self.type_name) {
            return None;
        }
        match self.value("Background")? {
            PropertyValue::Fill(fill) => Some(fill),
            PropertyValue::Color(color) => Some(Fill::Solid(color)),
            _ => None,
        }
    }

    fn opacity(&self) -> Option<f64> {
        if !self.has_capability(Capability::Element) {
            return None;
        }
        Some(self.number("Opacity").unwrap_or(1.0))
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fluent construction of element subtrees.
#[derive(Debug)]
pub struct ElementBuilder {
    type_name: String,
    properties: Vec<(String, Option<String>, PropertyValue)>,
    resources: Vec<(String, PropertyValue)>,
    children: Vec<ElementBuilder>,
    logical: Vec<ElementBuilder>,
    overlay: Vec<ElementBuilder>,
}

impl ElementBuilder {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            resources: Vec::new(),
            children: Vec::new(),
            logical: Vec::new(),
            overlay: Vec::new(),
        }
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.property("Name", PropertyValue::Text(name.into()))
    }

    pub fn property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push((name.into(), None, value));
        self
    }

    pub fn attached(mut self, owner: impl Into<String>, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push((name.into(), Some(owner.into()), value));
        self
    }

    pub fn resource(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.resources.push((key.into(), value));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn logical(mut self, child: ElementBuilder) -> Self {
        self.logical.push(child);
        self
    }

    pub fn overlay(mut self, member: ElementBuilder) -> Self {
        self.overlay.push(member);
        self
    }

    pub fn build(self) -> Arc<Element> {
        let element = Element::new(self.type_name);
        for (name, owner, value) in self.properties {
            element.set_property(&name, owner.as_deref(), value);
        }
        for (key, value) in self.resources {
            element.add_resource(key, value);
        }
        for child in self.children {
            element.add_child(child.build());
        }
        for child in self.logical {
            element.add_logical_child(child.build());
        }
        for member in self.overlay {
            element.add_overlay(member.build());
        }
        element
    }
}
