//! The validated enum model.
//!
//! [`EnumDefinition::build`] folds scanned members and their directives into
//! one immutable definition. All invariants are checked here, once:
//!
//! - at most one member carries `default`
//! - every member shares one underlying type
//! - raw values are unique
//! - canonical strings are non-empty and unique

use crate::coerce::{self, CaseStyle};
use crate::config::GenerateConfig;
use crate::directive::{MemberOptions, parse_directive};
use crate::error::Error;
use crate::ir::{Literal, RawMember, UnderlyingType};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// How canonical strings are derived.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    pub prefix: String,
    /// Free-form case style; parsed when the first member is named.
    pub case: String,
}

impl NamingPolicy {
    pub fn new(prefix: impl Into<String>, case: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            case: case.into(),
        }
    }

    pub fn from_config(config: &GenerateConfig) -> Self {
        Self::new(config.prefix(), config.case.clone())
    }
}

/// One member of a validated enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    symbol: String,
    raw_value: Literal,
    options: MemberOptions,
    canonical: String,
}

impl EnumMember {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn raw_value(&self) -> &Literal {
        &self.raw_value
    }

    pub fn options(&self) -> MemberOptions {
        self.options
    }

    /// The wire representation shared by every adapter.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn is_valid(&self) -> bool {
        !self.options.invalid
    }

    pub fn is_default(&self) -> bool {
        self.options.default
    }
}

/// A validated, immutable enum.
#[derive(Debug, Clone)]
pub struct EnumDefinition {
    name: String,
    underlying: UnderlyingType,
    members: Vec<EnumMember>,
    default_member: Option<usize>,
}

impl EnumDefinition {
    /// Build a definition from members in declaration order.
    pub fn build(
        name: &str,
        raw_members: Vec<RawMember>,
        policy: &NamingPolicy,
    ) -> Result<Self, Error> {
        let Some(first) = raw_members.first() else {
            return Err(Error::NoMembersFound {
                enum_name: name.to_string(),
            });
        };
        let underlying = first.underlying.clone();

        let mut default_slot: Option<String> = None;
        let mut seen_values: HashMap<String, String> = HashMap::new();
        let mut folded = Vec::with_capacity(raw_members.len());

        for raw in raw_members {
            if raw.underlying != underlying {
                return Err(Error::InconsistentUnderlyingType {
                    enum_name: name.to_string(),
                    symbol: raw.symbol,
                    expected: underlying.name,
                    found: raw.underlying.name,
                });
            }

            match seen_values.entry(raw.literal.to_string()) {
                Entry::Occupied(entry) => {
                    return Err(Error::DuplicateRawValue {
                        enum_name: name.to_string(),
                        value: entry.key().clone(),
                        first: entry.get().clone(),
                        second: raw.symbol,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(raw.symbol.clone());
                }
            }

            let options = parse_directive(&raw.symbol, raw.comment.as_deref(), &mut default_slot)?;
            tracing::debug!(
                symbol = %raw.symbol,
                value = %raw.literal,
                default = options.default,
                invalid = options.invalid,
                "folded enum member"
            );
            folded.push((raw.symbol, raw.literal, options));
        }

        let case: CaseStyle = policy.case.parse()?;
        let mut seen_strings: HashMap<String, String> = HashMap::new();
        let mut members = Vec::with_capacity(folded.len());

        for (symbol, raw_value, options) in folded {
            let canonical = coerce::canonicalize(&symbol, &policy.prefix, case);
            if canonical.is_empty() {
                return Err(Error::EmptyCanonicalString { symbol });
            }
            if let Some(first) = seen_strings.get(&canonical) {
                return Err(Error::CanonicalCollision {
                    enum_name: name.to_string(),
                    canonical,
                    first: first.clone(),
                    second: symbol,
                });
            }
            seen_strings.insert(canonical.clone(), symbol.clone());
            members.push(EnumMember {
                symbol,
                raw_value,
                options,
                canonical,
            });
        }

        let default_member = members.iter().position(EnumMember::is_default);

        Ok(Self {
            name: name.to_string(),
            underlying,
            members,
            default_member,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn underlying(&self) -> &UnderlyingType {
        &self.underlying
    }

    /// All members in declaration order, including invalid ones.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Members that take part in lookup, validation and listings.
    pub fn valid_members(&self) -> impl Iterator<Item = &EnumMember> {
        self.members.iter().filter(|m| m.is_valid())
    }

    pub fn default_member(&self) -> Option<&EnumMember> {
        self.default_member.map(|i| &self.members[i])
    }

    pub fn member(&self, symbol: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.symbol == symbol)
    }
}
