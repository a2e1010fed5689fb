pub mod color;
pub mod error;
pub mod node;
pub mod traits;
pub mod value;

pub use color::{Color, ParseColorError};
pub use error::ProbeError;
pub use node::{same_node, Capability, Fill, Node, NodeRef, WeakNodeRef};
pub use traits::{Application, MarkupLoader, PropertyLayer, ScreenCapture, MARKUP_VALUE_TYPE};
pub use value::{PropertyRead, PropertyValue, Rect};
