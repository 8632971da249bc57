//! JSON descriptor renderer, for renderers living outside this crate.

use crate::generate::{Format, FormatDescriptor};
use crate::traits::{RenderContext, Renderer};
use serde::Serialize;

/// Static instance of the JSON renderer for registry.
pub static JSON_RENDERER: JsonRenderer = JsonRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    package: &'a str,
    file_name: &'a str,
    #[serde(flatten)]
    descriptor: &'a FormatDescriptor,
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn language(&self) -> &'static str {
        "json"
    }

    fn supports(&self, _format: Format) -> bool {
        true
    }

    fn file_suffix(&self, format: Format) -> String {
        format!("_enum_{}.json", format.name())
    }

    fn render(&self, descriptor: &FormatDescriptor, ctx: &RenderContext) -> String {
        let envelope = Envelope {
            package: &ctx.package,
            file_name: &ctx.file_name,
            descriptor,
        };
        // Descriptors only hold strings, integers and booleans.
        let mut out = serde_json::to_string_pretty(&envelope).unwrap_or_default();
        out.push('\n');
        out
    }
}
