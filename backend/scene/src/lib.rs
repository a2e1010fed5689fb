//! `visprobe-scene` — a headless host for the visprobe service.
//!
//! Provides:
//! - [`Element`], an `Arc`-shared node with two child hierarchies and overlays
//! - [`YamlMarkupLoader`] for building trees from YAML documents
//! - [`ScenePropertyLayer`] for string-converted property access
//! - [`HeadlessApplication`] and [`HeadlessCapture`] standing in for a real desktop

pub mod application;
pub mod capture;
pub mod element;
pub mod kind;
pub mod markup;
pub mod properties;

pub use application::HeadlessApplication;
pub use capture::HeadlessCapture;
pub use element::{Element, ElementBuilder, Property};
pub use kind::ValueKind;
pub use markup::{ElementDocument, YamlMarkupLoader};
pub use properties::ScenePropertyLayer;
