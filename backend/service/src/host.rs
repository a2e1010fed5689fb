//! State owned by the tree-owner thread.

use std::sync::Arc;

use visprobe_core::{Application, MarkupLoader, PropertyLayer, ScreenCapture};
use visprobe_scene::{HeadlessApplication, HeadlessCapture, ScenePropertyLayer, YamlMarkupLoader};
use visprobe_tree::Registry;

/// Everything request handlers touch. Lives on the tree-owner thread and is
/// only reached through the dispatcher.
pub struct Host {
    pub application: Box<dyn Application>,
    pub properties: Box<dyn PropertyLayer>,
    pub loader: Box<dyn MarkupLoader>,
    pub capture: Box<dyn ScreenCapture>,
    pub registry: Arc<Registry>,
    pub(crate) initialized: bool,
}

impl Host {
    pub fn new(
        application: Box<dyn Application>,
        properties: Box<dyn PropertyLayer>,
        loader: Box<dyn MarkupLoader>,
        capture: Box<dyn ScreenCapture>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            application,
            properties,
            loader,
            capture,
            registry,
            initialized: false,
        }
    }

    /// A host over the in-memory scene.
    pub fn headless(registry: Arc<Registry>) -> Self {
        Self::new(
            Box::new(HeadlessApplication::new()),
            Box::new(ScenePropertyLayer::new()),
            Box::new(YamlMarkupLoader::new()),
            Box::new(HeadlessCapture::default()),
            registry,
        )
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("registry", &self.registry)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
