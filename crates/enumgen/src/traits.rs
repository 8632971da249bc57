//! Traits for adapter renderers.

use crate::generate::{Format, FormatDescriptor};

/// Per-run information a renderer needs beyond the descriptor.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Package (or module) the generated code lives in.
    pub package: String,
    /// Base name of the source file, used to name output files.
    pub file_name: String,
}

impl RenderContext {
    pub fn new(package: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            file_name: file_name.into(),
        }
    }
}

/// A renderer turning format descriptors into source text.
///
/// # Implementing Custom Renderers
///
/// ```ignore
/// use enumgen::{Format, FormatDescriptor, RenderContext, Renderer, register_renderer};
///
/// struct KotlinRenderer;
///
/// impl Renderer for KotlinRenderer {
///     fn name(&self) -> &'static str { "kotlin" }
///     fn language(&self) -> &'static str { "kotlin" }
///     fn supports(&self, format: Format) -> bool { format == Format::StringOf }
///     fn file_suffix(&self, _format: Format) -> String { "_enum.kt".into() }
///     fn render(&self, descriptor: &FormatDescriptor, ctx: &RenderContext) -> String { /* ... */ }
/// }
///
/// // Register before first use
/// register_renderer(&KotlinRenderer);
/// ```
pub trait Renderer: Send + Sync {
    /// Unique renderer identifier (e.g., "go", "json").
    fn name(&self) -> &'static str;

    /// Target language of the emitted text.
    fn language(&self) -> &'static str;

    /// Whether this renderer emits anything for `format`.
    fn supports(&self, format: Format) -> bool;

    /// Appended to the snake-cased file name to name the output file.
    fn file_suffix(&self, format: Format) -> String;

    /// Render one descriptor.
    fn render(&self, descriptor: &FormatDescriptor, ctx: &RenderContext) -> String;
}
