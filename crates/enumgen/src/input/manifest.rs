//! Language-neutral member manifests.
//!
//! A manifest lists the members directly, for hosts without a front-end:
//!
//! ```toml
//! package = "day"
//! type_name = "Day"
//! underlying = "int"
//!
//! [[members]]
//! symbol = "Unknown"
//! value = 0
//! comment = "enum:default,invalid"
//!
//! [[members]]
//! symbol = "Monday"
//! value = 1
//! ```

use super::ParseError;
use crate::error::Error;
use crate::ir::{Literal, RawMember, ScannedUnit, UnderlyingType};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub package: Option<String>,
    pub type_name: String,
    /// Primitive name shared by members unless they override it.
    pub underlying: String,
    #[serde(default)]
    pub members: Vec<ManifestMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestMember {
    pub symbol: String,
    pub value: ManifestValue,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub underlying: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestValue {
    Int(i64),
    Str(String),
}

impl Manifest {
    pub fn into_unit(self) -> Result<ScannedUnit, Error> {
        if self.members.is_empty() {
            return Err(Error::NoMembersFound {
                enum_name: self.type_name,
            });
        }

        let members = self
            .members
            .into_iter()
            .map(|m| RawMember {
                symbol: m.symbol,
                literal: match m.value {
                    ManifestValue::Int(v) => Literal::Int(v.into()),
                    ManifestValue::Str(s) => Literal::Str(s),
                },
                comment: m.comment,
                type_name: self.type_name.clone(),
                underlying: UnderlyingType::new(m.underlying.unwrap_or_else(|| self.underlying.clone())),
            })
            .collect();

        Ok(ScannedUnit {
            package: self.package,
            members,
        })
    }
}

pub fn parse_manifest_json(input: &str) -> Result<ScannedUnit, Error> {
    let manifest: Manifest =
        serde_json::from_str(input).map_err(|e| ParseError::Manifest(e.to_string()))?;
    manifest.into_unit()
}

pub fn parse_manifest_toml(input: &str) -> Result<ScannedUnit, Error> {
    let manifest: Manifest =
        toml::from_str(input).map_err(|e| ParseError::Manifest(e.to_string()))?;
    manifest.into_unit()
}
