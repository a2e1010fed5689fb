//! Effective background color.
//!
//! Walks from an element up through its primary ancestors, painting the
//! accumulated color over each solid background it meets. Once the optional
//! `to` ancestor has been passed, further ancestors only fade the result by
//! their opacity.

use tracing::debug;

use visprobe_core::{same_node, Color, Fill, NodeRef, ProbeError};

use crate::traverse::ancestors;

pub fn effective_background(from: &NodeRef, to: Option<&NodeRef>) -> Result<Color, ProbeError> {
    let mut color = Color::TRANSPARENT;
    let mut reached_to = false;

    for ancestor in ancestors(from) {
        let opacity = ancestor.opacity();

        if reached_to {
            if let Some(opacity) = opacity {
                color = color.with_opacity(opacity);
            }
            continue;
        }

        match ancestor.fill() {
            Some(Fill::Solid(fill)) => {
                let layer = opacity.map_or(fill, |o| fill.with_opacity(o));
                color = color.flatten_onto(layer);
            }
            Some(other) => {
                return Err(ProbeError::UnsupportedFill {
                    fill_kind: other.kind_name().to_string(),
                    node_type: ancestor.type_name().to_string(),
                });
            }
            None => {}
        }

        if to.is_some_and(|to| same_node(&ancestor, to)) {
            reached_to = true;
        }
    }

    debug!(from = from.type_name(), color = %color, "Computed effective background");
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visprobe_core::PropertyValue;
    use visprobe_scene::{Element, ElementBuilder};

    fn solid(color: Color) -> PropertyValue {
        PropertyValue::Fill(Fill::Solid(color))
    }

    /// Returns the innermost node of a single-child chain.
    fn innermost(root: &NodeRef) -> NodeRef {
        let mut node = root.clone();
        while let Some(child) = node.primary_children().into_iter().next() {
            node = child;
        }
        node
    }

    #[test]
    fn test_nearest_opaque_layer_wins() {
        // Nearest first: transparent, red, blue.
        let root: NodeRef = ElementBuilder::new("Border")
            .property("Background", solid(Color::BLUE))
            .child(
                ElementBuilder::new("Border")
                    .property("Background", solid(Color::RED))
                    .child(ElementBuilder::new("Border").property("Background", solid(Color::TRANSPARENT))),
            )
            .build();
        let leaf = innermost(&root);
        assert_eq!(effective_background(&leaf, None).unwrap(), Color::RED);
    }

    #[test]
    fn test_half_white_over_black() {
        let root: NodeRef = ElementBuilder::new("Border")
            .property("Background", solid(Color::BLACK))
            .child(ElementBuilder::new("Border").property("Background", solid(Color::from_argb(128, 255, 255, 255))))
            .build();
        let leaf = innermost(&root);
        let color = effective_background(&leaf, None).unwrap();
        assert_eq!(color.a, 255);
        assert!((127..=129).contains(&color.r));
        assert_eq!(color.r, color.g);
        assert_eq!(color.g, color.b);
    }

    #[test]
    fn test_opacity_scales_layer() {
        let root: NodeRef = ElementBuilder::new("Border")
            .property("Background", solid(Color::BLACK))
            .child(
                ElementBuilder::new("Border")
                    .property("Background", solid(Color::WHITE))
                    .property("Opacity", PropertyValue::Number(0.5)),
            )
            .build();
        let leaf = innermost(&root);
        let color = effective_background(&leaf, None).unwrap();
        assert_eq!(color.a, 255);
        assert!((127..=129).contains(&color.r));
    }

    #[test]
    fn test_no_fill_is_transparent() {
        let root: NodeRef = ElementBuilder::new("Grid").child(ElementBuilder::new("TextBlock")).build();
        let leaf = innermost(&root);
        assert_eq!(effective_background(&leaf, None).unwrap().a, 0);
    }

    #[test]
    fn test_to_limits_new_color() {
        // Window(blue, opacity 0.5) > Grid(no fill) > Border(half-transparent red)
        let window: NodeRef = ElementBuilder::new("Window")
            .property("Background", solid(Color::BLUE))
            .property("Opacity", PropertyValue::Number(0.5))
            .child(
                ElementBuilder::new("Grid")
                    .child(ElementBuilder::new("Border").property("Background", solid(Color::from_argb(200, 255, 0, 0)))),
            )
            .build();
        let grid = window.primary_children().remove(0);
        let border = innermost(&window);

        let limited = effective_background(&border, Some(&grid)).unwrap();
        assert_eq!((limited.r, limited.g, limited.b), (255, 0, 0));
        assert_eq!(limited.a, 100);

        let full = effective_background(&border, None).unwrap();
        assert!(full.b > 0);
    }

    #[test]
    fn test_to_at_start_fades_by_all_ancestors() {
        let window: NodeRef = ElementBuilder::new("Window")
            .property("Opacity", PropertyValue::Number(0.5))
            .child(ElementBuilder::new("Border").property("Background", solid(Color::RED)))
            .build();
        let border = innermost(&window);
        let color = effective_background(&border, Some(&border)).unwrap();
        assert_eq!(color, Color::from_argb(128, 255, 0, 0));
    }

    #[test]
    fn test_gradient_is_unsupported() {
        let root: NodeRef = ElementBuilder::new("Grid")
            .property("Background", PropertyValue::Fill(Fill::LinearGradient(vec![Color::RED, Color::BLUE])))
            .child(ElementBuilder::new("Border"))
            .build();
        let leaf = innermost(&root);
        let err = effective_background(&leaf, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not evaluate background brush of type 'LinearGradientBrush' on 'Grid'"
        );
    }

    #[test]
    fn test_content_elements_have_no_fill() {
        let run = Element::new("Run");
        let node: NodeRef = run;
        assert_eq!(effective_background(&node, None).unwrap().a, 0);
    }
}
