//! Registry for adapter renderers.

use crate::traits::Renderer;
use std::sync::{OnceLock, RwLock};

/// Global registry of renderers.
static RENDERERS: RwLock<Vec<&'static dyn Renderer>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom renderer.
///
/// Built-in renderers are registered automatically on first use. Lookups
/// return the first renderer registered under a name, so built-ins cannot be
/// replaced.
pub fn register_renderer(renderer: &'static dyn Renderer) {
    init_builtin();
    RENDERERS
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .push(renderer);
}

/// Initialize built-in renderers (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        #[allow(unused_mut, unused_variables)]
        let mut renderers = RENDERERS.write().unwrap_or_else(|e| e.into_inner());

        #[cfg(feature = "renderer-go")]
        {
            renderers.push(&crate::output::go::GO_RENDERER);
        }

        #[cfg(feature = "renderer-json")]
        {
            renderers.push(&crate::output::json::JSON_RENDERER);
        }
    });
}

/// Get a renderer by name.
pub fn get_renderer(name: &str) -> Option<&'static dyn Renderer> {
    init_builtin();
    RENDERERS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .find(|r| r.name() == name)
        .copied()
}

/// List all registered renderers.
pub fn renderers() -> Vec<&'static dyn Renderer> {
    init_builtin();
    RENDERERS.read().unwrap_or_else(|e| e.into_inner()).clone()
}

/// List all registered renderer names.
pub fn renderer_names() -> Vec<&'static str> {
    init_builtin();
    RENDERERS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .map(|r| r.name())
        .collect()
}
