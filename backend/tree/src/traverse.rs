//! Breadth-first descendant walks and ancestor chains.
//!
//! A node's children are its primary children when it has at least one,
//! otherwise its fallback children. The overlay of the walk's root is seeded
//! into the queue right after the root's own children; overlays further down
//! are not visited.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use visprobe_core::NodeRef;

/// Children of `node` for traversal purposes.
pub fn children_of(node: &NodeRef) -> Vec<NodeRef> {
    let primary = node.primary_children();
    if primary.is_empty() {
        node.fallback_children()
    } else {
        primary
    }
}

/// Lazy breadth-first walk below a root. The root itself is not yielded.
#[derive(Debug)]
pub struct Descendants {
    queue: VecDeque<NodeRef>,
}

impl Descendants {
    pub fn new(root: &NodeRef) -> Self {
        let mut queue: VecDeque<NodeRef> = children_of(root).into();
        queue.extend(root.overlay());
        Self { queue }
    }
}

impl Iterator for Descendants {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.queue.pop_front()?;
        self.queue.extend(children_of(&node));
        Some(node)
    }
}

impl FusedIterator for Descendants {}

pub fn descendants(root: &NodeRef) -> Descendants {
    Descendants::new(root)
}

pub fn descendants_matching<F>(root: &NodeRef, filter: F) -> impl Iterator<Item = NodeRef>
where
    F: FnMut(&NodeRef) -> bool,
{
    let mut filter = filter;
    Descendants::new(root).filter(move |node| filter(node))
}

/// Lazy walk from a node (inclusive) up through primary parents.
#[derive(Debug)]
pub struct Ancestors {
    next: Option<NodeRef>,
}

impl Iterator for Ancestors {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.next.take()?;
        self.next = node.parent();
        Some(node)
    }
}

impl FusedIterator for Ancestors {}

pub fn ancestors(node: &NodeRef) -> Ancestors {
    Ancestors {
        next: Some(Arc::clone(node)),
    }
}

pub fn ancestors_matching<F>(node: &NodeRef, filter: F) -> impl Iterator<Item = NodeRef>
where
    F: FnMut(&NodeRef) -> bool,
{
    let mut filter = filter;
    ancestors(node).filter(move |n| filter(n))
}
