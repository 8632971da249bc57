//! Output renderers for generated adapters.
//!
//! Each renderer takes a [`FormatDescriptor`] and produces source text.
//! All renderers implement the [`Renderer`] trait for uniform access via the
//! registry.

use crate::coerce;
use crate::generate::FormatDescriptor;
use crate::traits::{RenderContext, Renderer};

// Go
#[cfg(feature = "renderer-go")]
pub mod go;

#[cfg(feature = "renderer-go")]
pub use go::GoRenderer;

// JSON descriptors
#[cfg(feature = "renderer-json")]
pub mod json;

#[cfg(feature = "renderer-json")]
pub use json::JsonRenderer;

/// A rendered file, relative to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub path: String,
    pub contents: String,
}

/// Name of the file `renderer` writes for `descriptor`.
///
/// The base is the snake-cased source file name; when the enum is not named
/// after its file, the snake-cased enum name is appended so several enums can
/// share one source file.
pub fn output_file_name(
    renderer: &dyn Renderer,
    descriptor: &FormatDescriptor,
    ctx: &RenderContext,
) -> String {
    let mut base = coerce::snake_case(&ctx.file_name);
    let enum_base = coerce::snake_case(&descriptor.enum_name);
    if base.is_empty() {
        base = enum_base;
    } else if base != enum_base {
        base = format!("{}_{}", base, enum_base);
    }
    format!("{}{}", base, renderer.file_suffix(descriptor.format))
}

/// Render every descriptor `renderer` supports.
pub fn render_all(
    renderer: &dyn Renderer,
    descriptors: &[FormatDescriptor],
    ctx: &RenderContext,
) -> Vec<RenderedFile> {
    descriptors
        .iter()
        .filter(|d| renderer.supports(d.format))
        .map(|d| {
            let path = output_file_name(renderer, d, ctx);
            tracing::info!(renderer = renderer.name(), format = %d.format, path = %path, "rendered");
            RenderedFile {
                path,
                contents: renderer.render(d, ctx),
            }
        })
        .collect()
}
