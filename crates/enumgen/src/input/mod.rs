//! Input front-ends.
//!
//! Each front-end reads one compilation unit (or a manifest) and produces a
//! [`ScannedUnit`](crate::ir::ScannedUnit) of raw members for the target type.

#[cfg(feature = "input-go")]
pub mod go;
mod manifest;

#[cfg(feature = "input-go")]
pub use go::scan_go;
pub use manifest::{Manifest, ManifestMember, parse_manifest_json, parse_manifest_toml};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported source construct: {0}")]
    Unsupported(String),

    #[error("constant {value} overflows {type_name}")]
    ConstantOverflow { value: i128, type_name: String },

    #[error("invalid manifest: {0}")]
    Manifest(String),
}
