//! Intermediate representation handed from front-ends to the model builder.
//!
//! Front-ends (Go source, manifests) normalize to a list of [`RawMember`]s;
//! the core never looks at host-language syntax.

use serde::Serialize;
use std::fmt;

/// The literal value assigned to an enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i128),
    Str(String),
}

impl Literal {
    /// The primitive kind this literal implies when no type declaration is known.
    pub fn implied_type(&self) -> UnderlyingType {
        match self {
            Literal::Int(_) => UnderlyingType::new("int"),
            Literal::Str(_) => UnderlyingType::new("string"),
        }
    }
}

/// Exact textual form, used as the uniqueness key for raw values.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i128> for Literal {
    fn from(value: i128) -> Self {
        Literal::Int(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

/// Broad classification of a primitive representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Integer,
    Unsigned,
    Float,
    String,
    Bool,
    Other,
}

impl PrimitiveKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" | "int8" | "int16" | "int32" | "int64" | "rune" => PrimitiveKind::Integer,
            "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr" | "byte" => {
                PrimitiveKind::Unsigned
            }
            "float32" | "float64" => PrimitiveKind::Float,
            "string" => PrimitiveKind::String,
            "bool" => PrimitiveKind::Bool,
            _ => PrimitiveKind::Other,
        }
    }
}

/// The primitive representation behind an enum type (e.g. `int`, `string`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnderlyingType {
    /// Primitive name as spelled in the source.
    pub name: String,
    pub kind: PrimitiveKind,
}

impl UnderlyingType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = PrimitiveKind::from_name(&name);
        Self { name, kind }
    }
}

impl fmt::Display for UnderlyingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One constant declaration matched by a front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMember {
    /// Source identifier of the constant (e.g. `Monday`).
    pub symbol: String,
    /// Evaluated literal value.
    pub literal: Literal,
    /// Raw text of the attached trailing comment, if any.
    pub comment: Option<String>,
    /// Resolved type name of the constant.
    pub type_name: String,
    /// Primitive representation of the resolved type.
    pub underlying: UnderlyingType,
}

impl RawMember {
    pub fn new(
        symbol: impl Into<String>,
        literal: impl Into<Literal>,
        type_name: impl Into<String>,
        underlying: UnderlyingType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            literal: literal.into(),
            comment: None,
            type_name: type_name.into(),
            underlying,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Everything a front-end recovered from one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct ScannedUnit {
    /// Package (or module) name of the unit, used by renderers.
    pub package: Option<String>,
    /// Matched members in declaration order.
    pub members: Vec<RawMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_display_is_exact() {
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::from("north").to_string(), "\"north\"");
    }

    #[test]
    fn primitive_kinds() {
        assert_eq!(UnderlyingType::new("uint8").kind, PrimitiveKind::Unsigned);
        assert_eq!(UnderlyingType::new("string").kind, PrimitiveKind::String);
        assert_eq!(UnderlyingType::new("Weekday").kind, PrimitiveKind::Other);
    }
}
