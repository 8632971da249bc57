//! Build-time errors. Every variant aborts the generation run.

use crate::input::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no enum values found for {enum_name}")]
    NoMembersFound { enum_name: String },

    #[error("differing underlying types for enum {enum_name}: {symbol} is {found}, expected {expected}")]
    InconsistentUnderlyingType {
        enum_name: String,
        symbol: String,
        expected: String,
        found: String,
    },

    #[error("duplicate value {value} in enum {enum_name}: {first}, {second}")]
    DuplicateRawValue {
        enum_name: String,
        value: String,
        first: String,
        second: String,
    },

    #[error("unknown option: '{token}' on {symbol}")]
    UnknownDirectiveToken { symbol: String, token: String },

    #[error("multiple defaults defined: {first}, {second}")]
    MultipleDefaults { first: String, second: String },

    #[error("unknown case style: {0}")]
    UnknownCaseStyle(String),

    #[error("{first} and {second} both render as \"{canonical}\" in enum {enum_name}")]
    CanonicalCollision {
        enum_name: String,
        canonical: String,
        first: String,
        second: String,
    },

    #[error("{symbol} has an empty string form after stripping prefix")]
    EmptyCanonicalString { symbol: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
