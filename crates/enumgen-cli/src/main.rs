//! enumgen: generate serialization adapters for enum constants.

mod args;
mod config;

use anyhow::{Context, Result, anyhow};
use args::{Args, InputKind};
use clap::Parser;
use config::Settings;
use enumgen::{RenderContext, ScannedUnit, get_renderer, render_all, renderer_names, run_pipeline};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_from(args::normalize_flags(std::env::args_os()));
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("enumgen: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let cwd = std::env::current_dir().context("reading working directory")?;
    let Settings {
        source,
        mut generate,
        renderer,
        out_dir,
    } = Settings::load(&cwd, args)?;

    let renderer = get_renderer(&renderer).ok_or_else(|| {
        anyhow!(
            "unknown renderer: {} (available: {})",
            renderer,
            renderer_names().join(", ")
        )
    })?;

    let unit = scan(&source, args.input, &generate.enum_name())?;
    if generate.enum_name.is_none() && args.input == InputKind::Manifest {
        generate.enum_name = unit.members.first().map(|m| m.type_name.clone());
    }

    let package = unit
        .package
        .clone()
        .unwrap_or_else(|| generate.file_name.to_lowercase());
    let generation = run_pipeline(unit.members, &generate)
        .with_context(|| format!("generating {}", source.display()))?;

    let ctx = RenderContext::new(package, generate.file_name.clone());
    for file in render_all(renderer, &generation.descriptors, &ctx) {
        if args.dry_run {
            println!("// {}\n{}", file.path, file.contents);
            continue;
        }
        let path = out_dir.join(&file.path);
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote");
    }

    Ok(())
}

fn scan(source: &Path, input: InputKind, enum_name: &str) -> Result<ScannedUnit> {
    let content = std::fs::read_to_string(source)
        .with_context(|| format!("reading {}", source.display()))?;

    let unit = match input {
        InputKind::Go => enumgen::scan_go(&content, enum_name)?,
        InputKind::Manifest => match source.extension().and_then(|e| e.to_str()) {
            Some("json") => enumgen::parse_manifest_json(&content)?,
            _ => enumgen::parse_manifest_toml(&content)?,
        },
    };
    tracing::debug!(
        source = %source.display(),
        members = unit.members.len(),
        "scanned"
    );
    Ok(unit)
}
