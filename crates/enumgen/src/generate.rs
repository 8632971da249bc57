//! Marshaller generation.
//!
//! Every requested [`Format`] gets a [`FormatDescriptor`]: a serializable,
//! renderer-independent description of the adapter that format must expose.
//! All wire formats share one contract:
//!
//! - `stringOf` is total over every member
//! - `fromString` only accepts canonical strings of valid members
//! - `validate` rejects members marked `invalid`
//! - `allValues` lists valid members in declaration order
//! - marshal validates first; unmarshal goes through `fromString`

use crate::adapter::WireKind;
use crate::ir::{Literal, UnderlyingType};
use crate::model::EnumDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A target wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    /// Stringer, lookup and listing functions shared by all other formats.
    StringOf,
    Json,
    /// BSON documents.
    DocumentStore,
    Xml,
    /// SQL driver `Value`/`Scan` binding.
    SqlBinding,
    /// Static enum declaration for a schema language (GraphQL).
    SchemaText,
    /// Runtime binding for the schema language's scalar marshalling.
    SchemaBinding,
    TextMarshal,
    /// `Values()` listing for the ent ORM's enum fields. Implies `sqlBinding`.
    EntValues,
}

impl Format {
    pub const ALL: [Format; 9] = [
        Format::StringOf,
        Format::Json,
        Format::DocumentStore,
        Format::Xml,
        Format::SqlBinding,
        Format::SchemaText,
        Format::SchemaBinding,
        Format::TextMarshal,
        Format::EntValues,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::StringOf => "stringOf",
            Format::Json => "json",
            Format::DocumentStore => "documentStore",
            Format::Xml => "xml",
            Format::SqlBinding => "sqlBinding",
            Format::SchemaText => "schemaText",
            Format::SchemaBinding => "schemaBinding",
            Format::TextMarshal => "textMarshal",
            Format::EntValues => "entValues",
        }
    }

    /// Whether the format has runtime behavior at all.
    pub fn has_runtime(self) -> bool {
        self != Format::SchemaText
    }

    pub fn operations(self) -> Vec<Operation> {
        use Operation::*;
        match self {
            Format::StringOf => vec![StringOf, FromString, Validate, AllValues, AllMembers, FromRaw],
            Format::SchemaText => vec![Listing],
            Format::EntValues => vec![StringOf, FromString, Validate, AllValues, Listing],
            _ => vec![StringOf, FromString, Validate, AllValues, Marshal, Unmarshal],
        }
    }

    /// Wire value kinds accepted by unmarshal.
    pub fn accepts(self) -> &'static [WireKind] {
        match self {
            Format::StringOf | Format::SchemaText | Format::EntValues => &[],
            Format::Json => &[WireKind::Bytes, WireKind::Text, WireKind::Json],
            Format::DocumentStore | Format::SqlBinding => &[WireKind::Text, WireKind::Bytes],
            Format::Xml | Format::TextMarshal => &[WireKind::Bytes, WireKind::Text],
            Format::SchemaBinding => &[WireKind::Text, WireKind::Json],
        }
    }

    /// Wire value kind produced by marshal.
    pub fn emits(self) -> Option<WireKind> {
        match self {
            Format::StringOf | Format::SchemaText | Format::EntValues => None,
            Format::DocumentStore | Format::SqlBinding => Some(WireKind::Text),
            Format::SchemaBinding => Some(WireKind::Json),
            Format::Json | Format::Xml | Format::TextMarshal => Some(WireKind::Bytes),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    /// Accepts descriptor names and the short flag names (`bson`, `sql`, `gql`, `text`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s {
            "bson" => Format::DocumentStore,
            "sql" => Format::SqlBinding,
            "graphql" => Format::SchemaText,
            "gql" => Format::SchemaBinding,
            "text" => Format::TextMarshal,
            "ent" => Format::EntValues,
            other => Format::ALL
                .into_iter()
                .find(|f| f.name() == other)
                .ok_or_else(|| format!("unknown format: {}", other))?,
        };
        Ok(format)
    }
}

/// A function an adapter exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    StringOf,
    FromString,
    Validate,
    AllValues,
    AllMembers,
    FromRaw,
    Marshal,
    Unmarshal,
    /// Static listing of valid canonical strings.
    Listing,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::StringOf => "stringOf",
            Operation::FromString => "fromString",
            Operation::Validate => "validate",
            Operation::AllValues => "allValues",
            Operation::AllMembers => "allMembers",
            Operation::FromRaw => "fromRaw",
            Operation::Marshal => "marshal",
            Operation::Unmarshal => "unmarshal",
            Operation::Listing => "listing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    pub symbol: String,
    pub raw_value: Literal,
    pub canonical: String,
    pub valid: bool,
    pub default: bool,
}

/// Everything a renderer needs to emit one format's adapter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    pub format: Format,
    pub enum_name: String,
    pub underlying: UnderlyingType,
    /// Members in declaration order. Schema listings only carry valid ones.
    pub members: Vec<MemberDescriptor>,
    pub default_member: Option<String>,
    pub operations: Vec<Operation>,
    pub accepts: Vec<WireKind>,
    pub emits: Option<WireKind>,
    /// The host type supplies its own stringer. Canonical strings, listings
    /// and the collision check still use the coerced names; generated code
    /// that calls `String()` follows the host's strings instead.
    pub custom_stringer: bool,
}

impl FormatDescriptor {
    pub fn valid_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.valid)
    }

    /// Canonical strings of valid members, in declaration order.
    pub fn listing(&self) -> Vec<&str> {
        self.valid_members().map(|m| m.canonical.as_str()).collect()
    }

    pub fn default_member(&self) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.default)
    }

    pub fn member(&self, symbol: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.symbol == symbol)
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// Produce one descriptor per requested format, in [`Format`] order.
pub fn generate(
    definition: &EnumDefinition,
    formats: &BTreeSet<Format>,
    custom_stringer: bool,
) -> Vec<FormatDescriptor> {
    if custom_stringer && formats.contains(&Format::SchemaText) {
        tracing::warn!(
            enum_name = %definition.name(),
            "schema listing uses coerced names, which may differ from the custom stringer"
        );
    }
    formats
        .iter()
        .map(|&format| describe(definition, format, custom_stringer))
        .collect()
}

fn describe(definition: &EnumDefinition, format: Format, custom_stringer: bool) -> FormatDescriptor {
    let members = definition
        .members()
        .iter()
        .filter(|m| format.has_runtime() || m.is_valid())
        .map(|m| MemberDescriptor {
            symbol: m.symbol().to_string(),
            raw_value: m.raw_value().clone(),
            canonical: m.canonical().to_string(),
            valid: m.is_valid(),
            default: m.is_default(),
        })
        .collect();

    tracing::debug!(format = %format, enum_name = %definition.name(), "describing adapter");

    FormatDescriptor {
        format,
        enum_name: definition.name().to_string(),
        underlying: definition.underlying().clone(),
        members,
        default_member: definition.default_member().map(|m| m.symbol().to_string()),
        operations: format.operations(),
        accepts: format.accepts().to_vec(),
        emits: format.emits(),
        custom_stringer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RawMember;
    use crate::model::NamingPolicy;

    fn cardinal() -> EnumDefinition {
        let ty = || crate::ir::UnderlyingType::new("string");
        let members = vec![
            RawMember::new("CardUnknown", "unknown", "Cardinal", ty())
                .with_comment("//enum:default,invalid"),
            RawMember::new("CardNorth", "north", "Cardinal", ty()),
            RawMember::new("CardSouth", "south", "Cardinal", ty()),
            RawMember::new("CardWest", "west", "Cardinal", ty()),
            RawMember::new("CardEast", "east", "Cardinal", ty()),
        ];
        EnumDefinition::build("Cardinal", members, &NamingPolicy::new("Card", "snake")).unwrap()
    }

    #[test]
    fn one_descriptor_per_format() {
        let formats: BTreeSet<Format> = [Format::Xml, Format::StringOf, Format::Json].into();
        let descriptors = generate(&cardinal(), &formats, false);
        let order: Vec<Format> = descriptors.iter().map(|d| d.format).collect();
        assert_eq!(order, vec![Format::StringOf, Format::Json, Format::Xml]);
    }

    #[test]
    fn schema_listing_omits_invalid() {
        let formats: BTreeSet<Format> = [Format::SchemaText].into();
        let descriptor = &generate(&cardinal(), &formats, false)[0];
        assert_eq!(descriptor.listing(), vec!["north", "south", "west", "east"]);
        assert_eq!(descriptor.members.len(), 4);
        assert_eq!(descriptor.operations, vec![Operation::Listing]);
        assert!(descriptor.accepts.is_empty());
    }

    #[test]
    fn runtime_descriptors_keep_invalid_members() {
        let formats: BTreeSet<Format> = [Format::SqlBinding].into();
        let descriptor = &generate(&cardinal(), &formats, false)[0];
        assert_eq!(descriptor.members.len(), 5);
        assert_eq!(descriptor.default_member.as_deref(), Some("CardUnknown"));
        assert_eq!(descriptor.accepts, vec![WireKind::Text, WireKind::Bytes]);
        assert!(descriptor.supports(Operation::Marshal));
    }

    #[test]
    fn ent_values_listing() {
        let formats: BTreeSet<Format> = [Format::EntValues].into();
        let descriptor = &generate(&cardinal(), &formats, false)[0];
        assert!(descriptor.supports(Operation::Listing));
        assert!(descriptor.supports(Operation::FromString));
        assert!(!descriptor.supports(Operation::Marshal));
        assert_eq!(descriptor.emits, None);
        assert_eq!(descriptor.listing(), vec!["north", "south", "west", "east"]);
        assert_eq!("ent".parse::<Format>().unwrap(), Format::EntValues);
    }

    #[test]
    fn custom_stringer_keeps_coerced_names() {
        let formats: BTreeSet<Format> = [Format::StringOf, Format::SchemaText].into();
        let descriptors = generate(&cardinal(), &formats, true);
        assert!(descriptors.iter().all(|d| d.custom_stringer));
        assert_eq!(descriptors[1].listing(), vec!["north", "south", "west", "east"]);
        assert_eq!(descriptors[0].member("CardNorth").unwrap().canonical, "north");
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("bson".parse::<Format>().unwrap(), Format::DocumentStore);
        assert_eq!("documentStore".parse::<Format>().unwrap(), Format::DocumentStore);
        assert_eq!("schemaText".parse::<Format>().unwrap(), Format::SchemaText);
        assert!("yaml".parse::<Format>().is_err());
    }

    #[test]
    fn descriptor_serializes() {
        let formats: BTreeSet<Format> = [Format::Json].into();
        let descriptor = &generate(&cardinal(), &formats, false)[0];
        let value = serde_json::to_value(descriptor).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["enumName"], "Cardinal");
        assert_eq!(value["members"][1]["rawValue"], "north");
        assert_eq!(value["members"][1]["canonical"], "north");
        assert_eq!(value["defaultMember"], "CardUnknown");
    }
}
