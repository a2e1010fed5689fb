//! `visprobe-tree` — element addressing over a host element tree.
//!
//! - [`Registry`] hands out stable string ids without keeping nodes alive
//! - [`descendants`] / [`ancestors`] walk the dual hierarchy
//! - [`evaluate`] runs path queries such as `~Form/TextBox[1].Text`
//! - [`effective_background`] flattens ancestor fills into one color

pub mod compositor;
pub mod query;
pub mod registry;
pub mod traverse;

pub use compositor::effective_background;
pub use query::{evaluate, resolve_element, QueryOutcome, Step, StepKind};
pub use registry::Registry;
pub use traverse::{ancestors, ancestors_matching, children_of, descendants, descendants_matching, Ancestors, Descendants};
