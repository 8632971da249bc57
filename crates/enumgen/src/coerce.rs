//! Casing conversions and prefix stripping.
//!
//! Symbols are segmented into words on case transitions and separators
//! (`JammieDodger`, `jammie_dodger` and `jammie-dodger` all become
//! `["jammie", "dodger"]`), then reassembled in the requested style.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Case style used for canonical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    Camel,
    Pascal,
    Snake,
    UpperSnake,
    Kebab,
    UpperKebab,
    /// Uppercase the symbol without segmenting it.
    Upper,
    /// Lowercase the symbol without segmenting it.
    Lower,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 8] = [
        CaseStyle::Camel,
        CaseStyle::Pascal,
        CaseStyle::Snake,
        CaseStyle::UpperSnake,
        CaseStyle::Kebab,
        CaseStyle::UpperKebab,
        CaseStyle::Upper,
        CaseStyle::Lower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CaseStyle::Camel => "camel",
            CaseStyle::Pascal => "pascal",
            CaseStyle::Snake => "snake",
            CaseStyle::UpperSnake => "upper_snake",
            CaseStyle::Kebab => "kebab",
            CaseStyle::UpperKebab => "upper_kebab",
            CaseStyle::Upper => "upper",
            CaseStyle::Lower => "lower",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| Error::UnknownCaseStyle(s.to_string()))
    }
}

/// Byte range of one word inside the original symbol.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

fn split_spans(s: &str) -> Vec<Span> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(idx, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(st) = start.take() {
                spans.push(Span { start: st, end: idx });
            }
            continue;
        }

        match start {
            None => start = Some(idx),
            Some(st) => {
                let prev = chars[i - 1].1;
                let next = chars.get(i + 1).map(|&(_, c)| c);
                let boundary = c.is_uppercase()
                    && (prev.is_lowercase()
                        || prev.is_numeric()
                        || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));
                if boundary {
                    spans.push(Span { start: st, end: idx });
                    start = Some(idx);
                }
            }
        }
    }

    if let Some(st) = start {
        spans.push(Span {
            start: st,
            end: s.len(),
        });
    }
    spans
}

/// Split into lowercase words.
pub fn words(s: &str) -> Vec<String> {
    split_spans(s)
        .into_iter()
        .map(|span| s[span.start..span.end].to_lowercase())
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn camel_case(s: &str) -> String {
    join_camel(&words(s))
}

pub fn pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

pub fn snake_case(s: &str) -> String {
    words(s).join("_")
}

pub fn upper_snake_case(s: &str) -> String {
    snake_case(s).to_uppercase()
}

pub fn kebab_case(s: &str) -> String {
    words(s).join("-")
}

pub fn upper_kebab_case(s: &str) -> String {
    kebab_case(s).to_uppercase()
}

fn join_camel(words: &[String]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect()
}

/// Derive the canonical string of `symbol`.
///
/// If the segmented symbol starts with the segmented `prefix` and has at least
/// one word left over, the prefix words are dropped. A non-matching prefix is
/// not an error.
pub fn canonicalize(symbol: &str, prefix: &str, case: CaseStyle) -> String {
    let spans = split_spans(symbol);
    let lowered: Vec<String> = spans
        .iter()
        .map(|span| symbol[span.start..span.end].to_lowercase())
        .collect();
    let prefix_words = words(prefix);

    let skip = if !prefix_words.is_empty()
        && lowered.len() > prefix_words.len()
        && lowered.iter().zip(&prefix_words).all(|(a, b)| a == b)
    {
        prefix_words.len()
    } else {
        0
    };

    let remaining = &lowered[skip..];
    match case {
        CaseStyle::Camel => join_camel(remaining),
        CaseStyle::Pascal => remaining.iter().map(|w| capitalize(w)).collect(),
        CaseStyle::Snake => remaining.join("_"),
        CaseStyle::UpperSnake => remaining.join("_").to_uppercase(),
        CaseStyle::Kebab => remaining.join("-"),
        CaseStyle::UpperKebab => remaining.join("-").to_uppercase(),
        CaseStyle::Upper | CaseStyle::Lower => {
            let rest = spans.get(skip).map_or("", |span| &symbol[span.start..]);
            if case == CaseStyle::Upper {
                rest.to_uppercase()
            } else {
                rest.to_lowercase()
            }
        }
    }
}
