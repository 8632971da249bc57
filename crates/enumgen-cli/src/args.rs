//! Command-line arguments.

use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "enumgen")]
#[command(version)]
#[command(about = "Generate serialization adapters for enum constants")]
#[command(after_help = "Mark members with a trailing comment: `Unknown Day = 0 //enum:default,invalid`")]
pub struct Args {
    /// Source file to scan (defaults to $GOFILE)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Name of the enum type (defaults to the file name in pascal case)
    #[arg(long)]
    pub name: Option<String>,

    /// Prefix stripped from member names (defaults to the enum name)
    #[arg(long)]
    pub prefix: Option<String>,

    /// camel, pascal, snake, upper_snake, kebab, upper_kebab, upper, lower
    #[arg(long)]
    pub case: Option<String>,

    /// GraphQL output: marshaller, schema enum, or both
    #[arg(long, value_enum)]
    pub gql: Option<GqlMode>,

    /// Generate JSON marshalling
    #[arg(long)]
    pub json: bool,

    /// Generate BSON marshalling
    #[arg(long)]
    pub bson: bool,

    /// Generate XML marshalling
    #[arg(long)]
    pub xml: bool,

    /// Generate SQL Value/Scan
    #[arg(long)]
    pub sql: bool,

    /// Generate text marshalling
    #[arg(long)]
    pub text: bool,

    /// Generate ent `Values()` (implies --sql)
    #[arg(long)]
    pub ent: bool,

    /// The type already implements its own stringer
    #[arg(long)]
    pub no_stringer: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Kind of input file
    #[arg(long, value_enum, default_value_t = InputKind::Go)]
    pub input: InputKind,

    /// Renderer producing the output files
    #[arg(long)]
    pub renderer: Option<String>,

    /// Directory to write into (defaults to the source file's directory)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print generated files to stdout instead of writing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GqlMode {
    None,
    /// Only the Go marshaller
    Go,
    /// Only the schema enum
    Gql,
    /// Marshaller and schema enum
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// Go source file
    Go,
    /// JSON or TOML member manifest
    Manifest,
}

/// Rewrite go-style single-dash long flags (`-json`, `-case=snake`) to the
/// double-dash form, so existing `//go:generate` lines keep working.
pub fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    for arg in args {
        let rewritten = arg.to_str().and_then(|s| {
            let flag = s.strip_prefix('-')?;
            let name = flag.split('=').next().unwrap_or(flag);
            (!flag.starts_with('-') && name.len() > 1).then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}
