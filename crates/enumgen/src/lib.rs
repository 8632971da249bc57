//! Enum model extraction and serialization adapter generation.
//!
//! `enumgen` turns a hand-written enumeration (a named type plus a fixed set of
//! constants) into a validated model and one generation descriptor per
//! requested wire format. Renderers turn descriptors into source files.
//!
//! # Architecture
//!
//! ```text
//! Front-ends          Model                 Descriptors          Renderers
//! ───────────     ─────────────────     ──────────────────     ─────────────
//! Go source  ─┐                         ┌─> stringOf        ┐
//!             ├─> RawMember ─> EnumDef ─┼─> json, xml, sql  ├─> Go sources
//! Manifest   ─┘   (ir.rs)     (model.rs)├─> documentStore   │
//!                                       └─> schemaText, ... ┘─> JSON descriptors
//! ```
//!
//! # Example
//!
//! ```ignore
//! use enumgen::{GenerateConfig, Format, input, run_pipeline};
//!
//! let source = r#"
//! package day
//!
//! type Day int
//!
//! const (
//!     Unknown Day = iota //enum:default,invalid
//!     Monday
//!     Tuesday
//! )
//! "#;
//!
//! let unit = input::scan_go(source, "Day")?;
//! let config = GenerateConfig {
//!     file_name: "day".into(),
//!     case: "upper_snake".into(),
//!     formats: [Format::Json].into(),
//!     ..Default::default()
//! };
//! let generation = run_pipeline(unit.members, &config)?;
//! assert_eq!(generation.definition.members()[1].canonical(), "MONDAY");
//! ```
//!
//! # Feature Flags
//!
//! - `input-go` - Go front-end (tree-sitter)
//! - `renderer-go` - Go adapter sources and GraphQL schema text
//! - `renderer-json` - JSON descriptors for external renderers

pub mod adapter;
pub mod coerce;
pub mod config;
pub mod directive;
pub mod error;
pub mod generate;
pub mod input;
pub mod ir;
pub mod model;
pub mod output;
pub mod registry;
pub mod traits;

pub use adapter::{Adapter, AdapterError, WireKind, WireValue};
pub use coerce::{CaseStyle, canonicalize};
pub use config::GenerateConfig;
pub use directive::{MemberOptions, parse_directive};
pub use error::Error;
pub use generate::{Format, FormatDescriptor, MemberDescriptor, Operation, generate};
#[cfg(feature = "input-go")]
pub use input::scan_go;
pub use input::{ParseError, parse_manifest_json, parse_manifest_toml};
pub use ir::{Literal, PrimitiveKind, RawMember, ScannedUnit, UnderlyingType};
pub use model::{EnumDefinition, EnumMember, NamingPolicy};

// Re-export traits
pub use traits::{RenderContext, Renderer};

// Re-export registry functions
pub use registry::{get_renderer, register_renderer, renderer_names, renderers};

pub use output::{RenderedFile, output_file_name, render_all};

#[cfg(feature = "renderer-go")]
pub use output::go::GoRenderer;

#[cfg(feature = "renderer-json")]
pub use output::json::JsonRenderer;

/// The result of one generation pass.
#[derive(Debug, Clone)]
pub struct Generation {
    pub definition: EnumDefinition,
    pub descriptors: Vec<FormatDescriptor>,
}

/// Build the enum model from scanned members and produce one descriptor per
/// requested format.
pub fn run_pipeline(members: Vec<RawMember>, config: &GenerateConfig) -> Result<Generation, Error> {
    let enum_name = config.enum_name();
    let policy = NamingPolicy::from_config(config);
    let definition = EnumDefinition::build(&enum_name, members, &policy)?;
    let descriptors = generate(&definition, &config.requested_formats(), !config.stringer);

    tracing::debug!(
        enum_name = %definition.name(),
        members = definition.members().len(),
        descriptors = descriptors.len(),
        "generation complete"
    );

    Ok(Generation {
        definition,
        descriptors,
    })
}
