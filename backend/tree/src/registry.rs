//! Identity registry: stable string ids for tree nodes.
//!
//! Entries hold [`WeakNodeRef`]s, so registering a node never extends its
//! lifetime. A destroyed node's id simply stops resolving. Entries are never
//! removed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};
use uuid::Uuid;

use visprobe_core::{Capability, NodeRef, WeakNodeRef};

#[derive(Default)]
struct Entries {
    by_id: HashMap<String, WeakNodeRef>,
    /// Data address of a registered node → its id. A stored weak handle pins
    /// the allocation, so an address here cannot be reused by another node.
    by_address: HashMap<usize, String>,
}

/// Maps opaque ids to nodes without owning them.
#[derive(Default)]
pub struct Registry {
    entries: Mutex<Entries>,
}

fn address(node: &NodeRef) -> usize {
    Arc::as_ptr(node) as *const () as usize
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the node's id, assigning a fresh one on first sight.
    pub fn get_or_assign_id(&self, node: &NodeRef) -> String {
        let mut entries = self.lock();
        let key = address(node);

        if let Some(id) = entries.by_address.get(&key) {
            let live = entries
                .by_id
                .get(id)
                .and_then(|weak| weak.upgrade())
                .is_some_and(|existing| Arc::ptr_eq(&existing, node));
            if live {
                return id.clone();
            }
        }

        let id = Uuid::new_v4().to_string();
        entries.by_id.insert(id.clone(), Arc::downgrade(node));
        entries.by_address.insert(key, id.clone());
        debug!(id = %id, type_name = node.type_name(), "Registered node");
        id
    }

    /// Resolves an id to a live node.
    pub fn resolve(&self, id: &str) -> Option<NodeRef> {
        if id.trim().is_empty() {
            return None;
        }
        let weak = self.lock().by_id.get(id).cloned()?;
        let node = weak.upgrade();
        if node.is_none() {
            trace!(id, "Registry hit on a destroyed node");
        }
        node
    }

    /// Resolves an id to a live node that reports `capability`. A node
    /// without it counts as a miss.
    pub fn resolve_as(&self, id: &str, capability: Capability) -> Option<NodeRef> {
        self.resolve(id).filter(|node| node.has_capability(capability))
    }

    /// Number of entries, live or stale.
    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("entries", &self.len()).finish()
    }
}
