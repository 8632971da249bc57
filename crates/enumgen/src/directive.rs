//! Per-member `enum:` directives.
//!
//! A directive is a trailing comment of the form `//enum:default,invalid`.
//! Anything after the option list is free-form commentary. Comments that do
//! not start with the keyword carry no options.

use crate::error::Error;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const DIRECTIVE_KEYWORD: &str = "enum:";

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}([\w,]+)", DIRECTIVE_KEYWORD)).expect("directive pattern is valid")
});

/// Options selected by a member's directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberOptions {
    /// Fallback value when nothing else is recognized.
    pub default: bool,
    /// Representable but excluded from lookup, validation and listings.
    pub invalid: bool,
}

impl MemberOptions {
    pub fn is_empty(&self) -> bool {
        !self.default && !self.invalid
    }
}

/// Parse the directive attached to `symbol`.
///
/// `default_slot` tracks which member already claimed the default; it is
/// filled when this member claims it.
pub fn parse_directive(
    symbol: &str,
    comment: Option<&str>,
    default_slot: &mut Option<String>,
) -> Result<MemberOptions, Error> {
    let mut options = MemberOptions::default();
    let Some(text) = comment.map(strip_comment_markers) else {
        return Ok(options);
    };
    let Some(captures) = DIRECTIVE.captures(text) else {
        return Ok(options);
    };

    for token in captures[1].split(',') {
        match token {
            "default" => {
                match default_slot.as_deref() {
                    Some(existing) if existing != symbol => {
                        return Err(Error::MultipleDefaults {
                            first: existing.to_string(),
                            second: symbol.to_string(),
                        });
                    }
                    _ => {}
                }
                *default_slot = Some(symbol.to_string());
                options.default = true;
            }
            "invalid" => options.invalid = true,
            other => {
                return Err(Error::UnknownDirectiveToken {
                    symbol: symbol.to_string(),
                    token: other.to_string(),
                });
            }
        }
    }

    Ok(options)
}

fn strip_comment_markers(text: &str) -> &str {
    let text = text.trim();
    if let Some(line) = text.strip_prefix("//") {
        line.trim_start()
    } else if let Some(block) = text.strip_prefix("/*") {
        block.strip_suffix("*/").unwrap_or(block).trim()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str, comment: &str, slot: &mut Option<String>) -> Result<MemberOptions, Error> {
        parse_directive(symbol, Some(comment), slot)
    }

    #[test]
    fn no_comment_no_options() {
        let mut slot = None;
        let options = parse_directive("Monday", None, &mut slot).unwrap();
        assert!(options.is_empty());
        assert!(slot.is_none());
    }

    #[test]
    fn plain_comment_is_ignored() {
        let mut slot = None;
        let options = parse("Monday", "// first day of the week", &mut slot).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn combined_tokens() {
        let mut slot = None;
        let options = parse("Unknown", "//enum:invalid,default", &mut slot).unwrap();
        assert!(options.default);
        assert!(options.invalid);
        assert_eq!(slot.as_deref(), Some("Unknown"));
    }

    #[test]
    fn trailing_commentary_is_ignored() {
        let mut slot = None;
        let options = parse("Unknown", "//enum:invalid zero value sentinel", &mut slot).unwrap();
        assert!(options.invalid);
        assert!(!options.default);
    }

    #[test]
    fn block_comment_directive() {
        let mut slot = None;
        let options = parse("North", "/* enum:default */", &mut slot).unwrap();
        assert!(options.default);
    }

    #[test]
    fn unknown_token() {
        let mut slot = None;
        let err = parse("Monday", "//enum:defualt", &mut slot).unwrap_err();
        assert!(matches!(err, Error::UnknownDirectiveToken { ref token, .. } if token == "defualt"));
        assert_eq!(err.to_string(), "unknown option: 'defualt' on Monday");
    }

    #[test]
    fn second_default_is_fatal() {
        let mut slot = None;
        parse("Unknown", "//enum:default", &mut slot).unwrap();
        let err = parse("Monday", "//enum:default", &mut slot).unwrap_err();
        assert_eq!(err.to_string(), "multiple defaults defined: Unknown, Monday");
    }

    #[test]
    fn empty_option_list() {
        let mut slot = None;
        let options = parse("Monday", "//enum:", &mut slot).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn repeated_default_on_same_member() {
        let mut slot = None;
        let options = parse("Unknown", "//enum:default,default", &mut slot).unwrap();
        assert!(options.default);
    }
}
