//! Generation configuration.
//!
//! Constructed once by the caller (CLI flags, config file, tests) and passed
//! by reference through the pipeline.
//!
//! Example `.enumgen.toml`:
//! ```toml
//! case = "upper_snake"     # camel, pascal, snake, upper_snake, kebab, upper_kebab, upper, lower
//! prefix = "Day"           # defaults to the enum name
//! formats = ["json", "documentStore", "schemaText"]
//! ```

use crate::coerce;
use crate::generate::Format;
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Source file name without extension.
    pub file_name: String,
    /// Enum type name. None = pascal case of the file name.
    pub enum_name: Option<String>,
    /// Prefix stripped from member names. None = the enum name.
    pub prefix: Option<String>,
    /// Case style, kept as free-form text until first use.
    pub case: String,
    /// Requested adapter formats. `stringOf` is always generated and
    /// `entValues` pulls in `sqlBinding`.
    pub formats: BTreeSet<Format>,
    /// Generate the stringer. When false the host type supplies its own.
    pub stringer: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            enum_name: None,
            prefix: None,
            case: "snake".to_string(),
            formats: BTreeSet::new(),
            stringer: true,
        }
    }
}

impl GenerateConfig {
    pub fn enum_name(&self) -> String {
        self.enum_name
            .clone()
            .unwrap_or_else(|| coerce::pascal_case(&self.file_name))
    }

    pub fn prefix(&self) -> String {
        self.prefix.clone().unwrap_or_else(|| self.enum_name())
    }

    pub fn requested_formats(&self) -> BTreeSet<Format> {
        let mut formats = self.formats.clone();
        formats.insert(Format::StringOf);
        if formats.contains(&Format::EntValues) {
            formats.insert(Format::SqlBinding);
        }
        formats
    }
}
