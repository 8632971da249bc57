//! Settings for one run.
//!
//! Layered, later wins:
//! 1. Built-in defaults
//! 2. `.enumgen.toml` in the working directory
//! 3. `GOFILE` (set by `go generate`)
//! 4. Command-line flags
//!
//! Example `.enumgen.toml`:
//! ```toml
//! renderer = "go"
//! case = "upper_snake"
//! formats = ["json", "documentStore"]
//! ```

use crate::args::{Args, GqlMode};
use anyhow::{Context, Result, bail};
use enumgen::{Format, GenerateConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".enumgen.toml";
const DEFAULT_RENDERER: &str = "go";

/// Contents of `.enumgen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub renderer: Option<String>,
    pub out_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub generate: GenerateConfig,
}

impl FileConfig {
    /// Load `.enumgen.toml` from `dir`, if present.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Some(config))
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: PathBuf,
    pub generate: GenerateConfig,
    pub renderer: String,
    pub out_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from the working directory, environment and flags.
    pub fn load(cwd: &Path, args: &Args) -> Result<Self> {
        let file_config = FileConfig::load(cwd)?;
        let gofile = std::env::var("GOFILE").ok().filter(|s| !s.is_empty());
        Self::resolve(cwd, args, file_config, gofile)
    }

    pub fn resolve(
        cwd: &Path,
        args: &Args,
        file_config: Option<FileConfig>,
        gofile: Option<String>,
    ) -> Result<Self> {
        let FileConfig {
            renderer,
            out_dir,
            generate: mut config,
        } = file_config.unwrap_or_default();

        let source = match (&args.file, gofile) {
            (Some(file), _) => cwd.join(file),
            (None, Some(gofile)) => cwd.join(gofile),
            (None, None) => bail!("no input file: pass FILE or run under `go generate` (GOFILE)"),
        };
        if let Some(stem) = source.file_stem().and_then(|s| s.to_str()) {
            config.file_name = stem.to_string();
        }

        if let Some(name) = &args.name {
            config.enum_name = Some(name.clone());
        }
        if let Some(prefix) = &args.prefix {
            config.prefix = Some(prefix.clone());
        }
        if let Some(case) = &args.case {
            config.case = case.clone();
        }
        if args.no_stringer {
            config.stringer = false;
        }

        let flagged = [
            (args.json, Format::Json),
            (args.bson, Format::DocumentStore),
            (args.xml, Format::Xml),
            (args.sql, Format::SqlBinding),
            (args.text, Format::TextMarshal),
            (args.ent, Format::EntValues),
        ];
        config
            .formats
            .extend(flagged.into_iter().filter(|(on, _)| *on).map(|(_, f)| f));
        match args.gql {
            None | Some(GqlMode::None) => {}
            Some(GqlMode::Go) => {
                config.formats.insert(Format::SchemaBinding);
            }
            Some(GqlMode::Gql) => {
                config.formats.insert(Format::SchemaText);
            }
            Some(GqlMode::Full) => {
                config.formats.insert(Format::SchemaBinding);
                config.formats.insert(Format::SchemaText);
            }
        }

        let out_dir = args
            .out_dir
            .as_ref()
            .map(|dir| cwd.join(dir))
            .or_else(|| out_dir.map(|dir| cwd.join(dir)))
            .or_else(|| source.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.to_path_buf());

        Ok(Self {
            source,
            generate: config,
            renderer: args
                .renderer
                .clone()
                .or(renderer)
                .unwrap_or_else(|| DEFAULT_RENDERER.to_string()),
            out_dir,
        })
    }
}
