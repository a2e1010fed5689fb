use visprobe_core::{
    MarkupLoader, Node, NodeRef, ProbeError, PropertyLayer, PropertyRead, PropertyValue, MARKUP_VALUE_TYPE,
};

use crate::element::Element;
use crate::kind::ValueKind;
use crate::markup::YamlMarkupLoader;

/// Property layer over [`Element`] nodes, converting values from strings by
/// their declared type.
#[derive(Debug, Default, Clone)]
pub struct ScenePropertyLayer {
    loader: YamlMarkupLoader,
}

impl ScenePropertyLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn element_of<'a>(node: &'a NodeRef) -> Result<&'a Element, ProbeError> {
    node.as_any().downcast_ref::<Element>().ok_or_else(|| {
        ProbeError::Property(format!(
            "Element of type '{}' does not expose properties",
            node.type_name()
        ))
    })
}

fn not_found(element: &Element, name: &str, owner_type: Option<&str>) -> ProbeError {
    match owner_type {
        Some(owner) => ProbeError::Property(format!(
            "Could not find dependency property '{name}' on '{owner}'"
        )),
        None => ProbeError::Property(format!(
            "Could not find property with name '{name}' on element '{}'",
            element.type_name()
        )),
    }
}

impl PropertyLayer for ScenePropertyLayer {
    fn get_property(
        &self,
        node: &NodeRef,
        name: &str,
        owner_type: Option<&str>,
    ) -> Result<PropertyRead, ProbeError> {
        let element = element_of(node)?;
        let property = element
            .property(name, owner_type)
            .ok_or_else(|| not_found(element, name, owner_type))?;
        Ok(PropertyRead {
            value: property.value,
            declared_type: property.kind.type_name().to_string(),
        })
    }

    fn set_property(
        &self,
        node: &NodeRef,
        name: &str,
        value: &str,
        value_type: Option<&str>,
        owner_type: Option<&str>,
    ) -> Result<PropertyRead, ProbeError> {
        let element = element_of(node)?;

        // Attached properties may be created on first write; everything else
        // must already exist.
        let existing = element.property(name, owner_type);
        let attached_owner = match (&existing, owner_type) {
            (Some(_), _) => None,
            (None, Some(owner)) if !declares(element, owner) && element.property(name, None).is_none() => {
                Some(owner)
            }
            (None, _) => return Err(not_found(element, name, owner_type)),
        };

        let kind = existing
            .as_ref()
            .map(|p| p.kind)
            .unwrap_or_else(|| ValueKind::for_property(name));

        let converted = match value_type.filter(|t| !t.trim().is_empty()) {
            Some(MARKUP_VALUE_TYPE) => PropertyValue::Node(self.loader.parse(value)?),
            Some(type_name) => ValueKind::from_type_name(type_name)
                .ok_or_else(|| ProbeError::Property(format!("Unknown value type '{type_name}'")))?
                .convert(value)
                .map_err(ProbeError::Property)?,
            None => kind.convert(value).map_err(ProbeError::Property)?,
        };

        element.set_property(name, attached_owner, converted);
        self.get_property(node, name, attached_owner.or(owner_type))
    }
}

/// Whether `owner` names the element's own type or one of its families.
fn declares(element: &Element, owner: &str) -> bool {
    owner == element.type_name() || crate::kind::owner_families(element.type_name()).contains(&owner)
}
