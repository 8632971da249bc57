//! Executable model of the generated adapter contract.
//!
//! [`Adapter`] interprets a [`FormatDescriptor`] the way generated code
//! behaves at runtime, so the contract can be checked uniformly across
//! formats without compiling any emitted source.

use crate::generate::{Format, FormatDescriptor, MemberDescriptor, Operation};
use crate::ir::Literal;
use serde::Serialize;
use std::fmt;

/// Kind of a value crossing the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireKind {
    Text,
    Bytes,
    Json,
    Integer,
    Null,
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireKind::Text => "string",
            WireKind::Bytes => "[]byte",
            WireKind::Json => "json",
            WireKind::Integer => "int64",
            WireKind::Null => "nil",
        };
        f.write_str(name)
    }
}

/// A value as handed to or produced by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Integer(i64),
    Null,
}

impl WireValue {
    pub fn kind(&self) -> WireKind {
        match self {
            WireValue::Text(_) => WireKind::Text,
            WireValue::Bytes(_) => WireKind::Bytes,
            WireValue::Json(_) => WireKind::Json,
            WireValue::Integer(_) => WireKind::Integer,
            WireValue::Null => WireKind::Null,
        }
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Text(value.to_string())
    }
}

impl From<&[u8]> for WireValue {
    fn from(value: &[u8]) -> Self {
        WireValue::Bytes(value.to_vec())
    }
}

/// Runtime errors returned by generated adapters to their callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("{text} is not a valid {enum_name}")]
    LookupNotFound { text: String, enum_name: String },

    /// A member marked `invalid` was passed to marshal or validate.
    #[error("{text} is not a valid {enum_name}")]
    Validation { text: String, enum_name: String },

    #[error("unsupported type {0}")]
    UnsupportedWireType(WireKind),

    #[error("malformed {format} value: {message}")]
    MalformedWire { format: Format, message: String },

    #[error("{format} adapter does not support {operation}")]
    Unsupported { format: Format, operation: Operation },
}

/// The adapter for one format of one enum.
#[derive(Debug, Clone, Copy)]
pub struct Adapter<'a> {
    descriptor: &'a FormatDescriptor,
}

impl<'a> Adapter<'a> {
    /// Fails for formats without runtime behavior (schema listings).
    pub fn new(descriptor: &'a FormatDescriptor) -> Result<Self, AdapterError> {
        if !descriptor.format.has_runtime() {
            return Err(AdapterError::Unsupported {
                format: descriptor.format,
                operation: Operation::StringOf,
            });
        }
        Ok(Self { descriptor })
    }

    pub fn descriptor(&self) -> &'a FormatDescriptor {
        self.descriptor
    }

    fn format(&self) -> Format {
        self.descriptor.format
    }

    fn enum_name(&self) -> &str {
        &self.descriptor.enum_name
    }

    /// Look a member up by symbol.
    pub fn member(&self, symbol: &str) -> Option<&'a MemberDescriptor> {
        self.descriptor.member(symbol)
    }

    /// Total over all members, including invalid ones.
    pub fn string_of<'m>(&self, member: &'m MemberDescriptor) -> &'m str {
        &member.canonical
    }

    pub fn from_string(&self, text: &str) -> Result<&'a MemberDescriptor, AdapterError> {
        self.descriptor
            .valid_members()
            .find(|m| m.canonical == text)
            .ok_or_else(|| AdapterError::LookupNotFound {
                text: text.to_string(),
                enum_name: self.enum_name().to_string(),
            })
    }

    pub fn validate(&self, member: &MemberDescriptor) -> Result<(), AdapterError> {
        self.from_string(&member.canonical)
            .map(|_| ())
            .map_err(|_| AdapterError::Validation {
                text: member.canonical.clone(),
                enum_name: self.enum_name().to_string(),
            })
    }

    /// Valid members in declaration order.
    pub fn all_values(&self) -> Vec<&'a MemberDescriptor> {
        self.descriptor.valid_members().collect()
    }

    /// Every member in declaration order.
    pub fn all_members(&self) -> &'a [MemberDescriptor] {
        &self.descriptor.members
    }

    /// The default member, which is also the zero value of a destination.
    pub fn zero(&self) -> Option<&'a MemberDescriptor> {
        self.descriptor.default_member()
    }

    /// Convert a raw underlying value, falling back to the default member.
    pub fn from_raw(&self, value: &Literal) -> Result<&'a MemberDescriptor, AdapterError> {
        self.descriptor
            .valid_members()
            .find(|m| &m.raw_value == value)
            .or_else(|| self.zero())
            .ok_or_else(|| AdapterError::LookupNotFound {
                text: match value {
                    Literal::Int(v) => v.to_string(),
                    Literal::Str(s) => s.clone(),
                },
                enum_name: self.enum_name().to_string(),
            })
    }

    /// Validate, then encode. Nothing is produced for an invalid member.
    pub fn marshal(&self, member: &MemberDescriptor) -> Result<WireValue, AdapterError> {
        if self.descriptor.emits.is_none() {
            return Err(self.unsupported(Operation::Marshal));
        }
        self.validate(member)?;

        let text = self.string_of(member);
        let wire = match self.format() {
            Format::DocumentStore | Format::SqlBinding => WireValue::Text(text.to_string()),
            Format::Json => {
                let encoded = serde_json::to_vec(text).map_err(|e| self.malformed(e))?;
                WireValue::Bytes(encoded)
            }
            // Schema runtimes hand scalars over already decoded.
            Format::SchemaBinding => WireValue::Json(serde_json::Value::String(text.to_string())),
            Format::Xml => {
                let name = self.enum_name();
                WireValue::Bytes(format!("<{name}>{}</{name}>", escape_xml(text)).into_bytes())
            }
            Format::TextMarshal => WireValue::Bytes(text.as_bytes().to_vec()),
            Format::StringOf | Format::SchemaText | Format::EntValues => {
                return Err(self.unsupported(Operation::Marshal));
            }
        };
        Ok(wire)
    }

    /// Decode to text, then look the text up with [`Adapter::from_string`].
    pub fn unmarshal(&self, wire: &WireValue) -> Result<&'a MemberDescriptor, AdapterError> {
        if !self.descriptor.supports(Operation::Unmarshal) {
            return Err(self.unsupported(Operation::Unmarshal));
        }
        if !self.descriptor.accepts.contains(&wire.kind()) {
            return Err(AdapterError::UnsupportedWireType(wire.kind()));
        }

        let text = self.decode(wire)?;
        self.from_string(&text)
    }

    /// Unmarshal into `dest`. On error `dest` is left untouched.
    pub fn unmarshal_into(
        &self,
        wire: &WireValue,
        dest: &mut &'a MemberDescriptor,
    ) -> Result<(), AdapterError> {
        let member = self.unmarshal(wire)?;
        *dest = member;
        Ok(())
    }

    fn decode(&self, wire: &WireValue) -> Result<String, AdapterError> {
        match self.format() {
            Format::Json => {
                let value = match wire {
                    WireValue::Json(value) => value.clone(),
                    WireValue::Bytes(bytes) => {
                        serde_json::from_slice(bytes).map_err(|e| self.malformed(e))?
                    }
                    WireValue::Text(text) => {
                        serde_json::from_str(text).map_err(|e| self.malformed(e))?
                    }
                    other => return Err(AdapterError::UnsupportedWireType(other.kind())),
                };
                match value {
                    serde_json::Value::String(s) => Ok(s),
                    other => Err(self.malformed(format!("expected a string, got {}", other))),
                }
            }
            Format::SchemaBinding => match wire {
                WireValue::Text(text) => Ok(text.clone()),
                WireValue::Json(serde_json::Value::String(s)) => Ok(s.clone()),
                _ => Err(self.malformed("enums must be strings")),
            },
            Format::Xml => {
                let text = self.text_of(wire)?;
                let doc = roxmltree::Document::parse(&text).map_err(|e| self.malformed(e))?;
                Ok(doc
                    .root_element()
                    .descendants()
                    .filter(|n| n.is_text())
                    .filter_map(|n| n.text())
                    .collect())
            }
            Format::DocumentStore | Format::SqlBinding | Format::TextMarshal => self.text_of(wire),
            Format::StringOf | Format::SchemaText | Format::EntValues => {
                Err(self.unsupported(Operation::Unmarshal))
            }
        }
    }

    /// Normalize a text or byte value to text.
    fn text_of(&self, wire: &WireValue) -> Result<String, AdapterError> {
        match wire {
            WireValue::Text(text) => Ok(text.clone()),
            WireValue::Bytes(bytes) => {
                String::from_utf8(bytes.clone()).map_err(|e| self.malformed(e))
            }
            other => Err(AdapterError::UnsupportedWireType(other.kind())),
        }
    }

    fn unsupported(&self, operation: Operation) -> AdapterError {
        AdapterError::Unsupported {
            format: self.format(),
            operation,
        }
    }

    fn malformed(&self, message: impl fmt::Display) -> AdapterError {
        AdapterError::MalformedWire {
            format: self.format(),
            message: message.to_string(),
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use crate::ir::{RawMember, UnderlyingType};
    use crate::model::{EnumDefinition, NamingPolicy};
    use std::collections::BTreeSet;

    fn day_descriptor(format: Format) -> FormatDescriptor {
        let member = |symbol: &str, value: i128| {
            RawMember::new(symbol, value, "Day", UnderlyingType::new("int"))
        };
        let members = vec![
            member("Unknown", 0).with_comment("//enum:default,invalid"),
            member("Monday", 1),
            member("Tuesday", 2),
        ];
        let def =
            EnumDefinition::build("Day", members, &NamingPolicy::new("Day", "upper_snake")).unwrap();
        let formats: BTreeSet<Format> = [format].into();
        generate(&def, &formats, false).remove(0)
    }

    #[test]
    fn string_contract() {
        let descriptor = day_descriptor(Format::StringOf);
        let adapter = Adapter::new(&descriptor).unwrap();
        let monday = adapter.member("Monday").unwrap();
        assert_eq!(adapter.string_of(monday), "MONDAY");
        assert_eq!(adapter.from_string("MONDAY").unwrap(), monday);

        let err = adapter.from_string("monday").unwrap_err();
        assert_eq!(err.to_string(), "monday is not a valid Day");
    }

    #[test]
    fn invalid_member_is_representable_but_not_valid() {
        let descriptor = day_descriptor(Format::StringOf);
        let adapter = Adapter::new(&descriptor).unwrap();
        let unknown = adapter.member("Unknown").unwrap();
        assert_eq!(adapter.string_of(unknown), "UNKNOWN");
        assert!(adapter.validate(unknown).is_err());
        assert!(adapter.from_string("UNKNOWN").is_err());
        assert!(adapter.all_values().iter().all(|m| m.symbol != "Unknown"));
        assert_eq!(adapter.all_members().len(), 3);
    }

    #[test]
    fn from_raw_falls_back_to_default() {
        let descriptor = day_descriptor(Format::StringOf);
        let adapter = Adapter::new(&descriptor).unwrap();
        assert_eq!(adapter.from_raw(&Literal::Int(2)).unwrap().symbol, "Tuesday");
        assert_eq!(adapter.from_raw(&Literal::Int(99)).unwrap().symbol, "Unknown");
        // the invalid default itself is not a valid raw value
        assert_eq!(adapter.from_raw(&Literal::Int(0)).unwrap().symbol, "Unknown");
    }

    #[test]
    fn json_marshal_validates_first() {
        let descriptor = day_descriptor(Format::Json);
        let adapter = Adapter::new(&descriptor).unwrap();
        let monday = adapter.member("Monday").unwrap();
        assert_eq!(
            adapter.marshal(monday).unwrap(),
            WireValue::Bytes(br#""MONDAY""#.to_vec())
        );

        let unknown = adapter.member("Unknown").unwrap();
        let err = adapter.marshal(unknown).unwrap_err();
        assert!(matches!(err, AdapterError::Validation { .. }));
    }

    #[test]
    fn json_rejects_non_strings() {
        let descriptor = day_descriptor(Format::Json);
        let adapter = Adapter::new(&descriptor).unwrap();
        let err = adapter.unmarshal(&WireValue::from(&b"1"[..])).unwrap_err();
        assert!(matches!(err, AdapterError::MalformedWire { .. }));
    }

    #[test]
    fn sql_accepts_text_and_bytes_only() {
        let descriptor = day_descriptor(Format::SqlBinding);
        let adapter = Adapter::new(&descriptor).unwrap();
        assert_eq!(adapter.unmarshal(&"TUESDAY".into()).unwrap().symbol, "Tuesday");
        assert_eq!(
            adapter.unmarshal(&WireValue::from(&b"TUESDAY"[..])).unwrap().symbol,
            "Tuesday"
        );
        let err = adapter.unmarshal(&WireValue::Integer(2)).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type int64");
    }

    #[test]
    fn xml_round_trip() {
        let descriptor = day_descriptor(Format::Xml);
        let adapter = Adapter::new(&descriptor).unwrap();
        let tuesday = adapter.member("Tuesday").unwrap();
        let wire = adapter.marshal(tuesday).unwrap();
        assert_eq!(wire, WireValue::Bytes(b"<Day>TUESDAY</Day>".to_vec()));
        assert_eq!(adapter.unmarshal(&wire).unwrap(), tuesday);
    }

    #[test]
    fn unmarshal_into_leaves_destination_on_error() {
        let descriptor = day_descriptor(Format::DocumentStore);
        let adapter = Adapter::new(&descriptor).unwrap();
        let mut dest = adapter.zero().unwrap();

        let err = adapter
            .unmarshal_into(&WireValue::from(&b"monday"[..]), &mut dest)
            .unwrap_err();
        assert!(matches!(err, AdapterError::LookupNotFound { .. }));
        assert_eq!(dest.symbol, "Unknown");

        adapter
            .unmarshal_into(&WireValue::from(&b"MONDAY"[..]), &mut dest)
            .unwrap();
        assert_eq!(dest.symbol, "Monday");
    }

    #[test]
    fn string_of_has_no_wire_operations() {
        let descriptor = day_descriptor(Format::StringOf);
        let adapter = Adapter::new(&descriptor).unwrap();
        let monday = adapter.member("Monday").unwrap();
        assert!(matches!(
            adapter.marshal(monday),
            Err(AdapterError::Unsupported { .. })
        ));
        assert!(matches!(
            adapter.unmarshal(&"MONDAY".into()),
            Err(AdapterError::Unsupported { .. })
        ));
    }

    #[test]
    fn schema_text_has_no_runtime() {
        let descriptor = day_descriptor(Format::SchemaText);
        assert!(Adapter::new(&descriptor).is_err());
    }

    #[test]
    fn schema_binding_requires_strings() {
        let descriptor = day_descriptor(Format::SchemaBinding);
        let adapter = Adapter::new(&descriptor).unwrap();
        let value = WireValue::Json(serde_json::json!("MONDAY"));
        assert_eq!(adapter.unmarshal(&value).unwrap().symbol, "Monday");
        let err = adapter
            .unmarshal(&WireValue::Json(serde_json::json!(1)))
            .unwrap_err();
        assert_eq!(err.to_string(), "malformed schemaBinding value: enums must be strings");
    }
}
