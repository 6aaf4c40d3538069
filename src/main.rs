//! drfdoc: generate documentation from Django REST framework source files.
//!
//! Supports two modes:
//!
//! - **directory mode**: `drfdoc -o docs myproject/` writes one document per
//!   source file that has documented classes, mirroring the source tree
//! - **stdin mode**: `drfdoc --stdin app/views.py < app/views.py` prints the
//!   document for a single file

mod capability;
mod config;
mod discover;
mod extract;
mod fragment;
mod model;
mod parser;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::parser::{ParseError, SourceParser};
use crate::render::Renderer;

#[derive(Parser)]
#[command(
    name = "drfdoc",
    about = "Generate API documentation from Django REST framework views and models"
)]
struct Cli {
    /// Root directory to document (required unless --stdin is given)
    root: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long, default_value = "docs")]
    output: PathBuf,

    /// Base URL for source deep links. Falls back to repo_url in mkdocs.yml.
    #[arg(long, env = "DRFDOC_REPO_URL")]
    repo_url: Option<String>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Skip directories whose name matches this glob. Can be repeated.
    /// __pycache__, migrations and .venv are always skipped.
    #[arg(long)]
    exclude: Vec<String>,

    /// Read one source file from stdin, treating it as RELATIVE_PATH, and print to stdout
    #[arg(long, value_name = "RELATIVE_PATH", conflicts_with = "root")]
    stdin: Option<PathBuf>,

    /// Log progress at debug level
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let renderer = render::create_renderer(&cli.format)?;

    if let Some(ref relative) = cli.stdin {
        return stdin_mode(&cli, relative, renderer.as_ref());
    }

    let root = cli
        .root
        .as_deref()
        .context("a root directory is required unless --stdin is given")?;
    directory_mode(&cli, root, renderer.as_ref())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DRFDOC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// stdin mode: document one file read from stdin, write to stdout.
fn stdin_mode(cli: &Cli, relative: &Path, renderer: &dyn Renderer) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let base_url = config::resolve_repo_url(cli.repo_url.as_deref(), Path::new("."))?;
    let mut parser = SourceParser::new()?;
    let doc = build_document(&mut parser, relative, &input)
        .with_context(|| format!("failed to parse {}", relative.display()))?;

    if let Some(output) = renderer.render(&doc, &base_url) {
        print!("{}", output);
    }
    Ok(())
}

/// directory mode: document every source file under `root`.
///
/// A file that fails to parse is skipped and reported at the end; read and
/// write failures abort the run.
fn directory_mode(cli: &Cli, root: &Path, renderer: &dyn Renderer) -> Result<()> {
    let excludes = discover::exclude_patterns(&cli.exclude)?;
    let files = discover::find_sources(root, &excludes)?;
    let base_url = config::resolve_repo_url(cli.repo_url.as_deref(), root)?;
    let ext = renderer.file_extension();

    let mut parser = SourceParser::new()?;
    let mut written = 0usize;
    let mut failures: Vec<(PathBuf, ParseError)> = Vec::new();

    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let relative = path.strip_prefix(root).unwrap_or(path.as_path());

        let doc = match build_document(&mut parser, relative, &content) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                failures.push((path.clone(), e));
                continue;
            }
        };

        let Some(output) = renderer.render(&doc, &base_url) else {
            debug!("nothing to document in {}", path.display());
            continue;
        };

        let out_path = discover::derive_output_path(&cli.output, relative, ext);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
        }
        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        debug!("wrote {}", out_path.display());
        written += 1;
    }

    info!(
        "scanned {} files, wrote {} documents, skipped {}",
        files.len(),
        written,
        failures.len()
    );

    if let Some((path, err)) = failures.first() {
        bail!(
            "{} file(s) failed; first failure: {}: {}",
            failures.len(),
            path.display(),
            err
        );
    }
    Ok(())
}

/// Parse one file and extract the facts of each class in it.
fn build_document(
    parser: &mut SourceParser,
    relative: &Path,
    content: &str,
) -> Result<model::Document, ParseError> {
    let source = parser.parse(relative, content)?;
    Ok(model::Document {
        path: discover::link_path(&source.path),
        classes: extract::extract_file(&source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_path_is_slash_separated() {
        let mut parser = SourceParser::new().unwrap();
        let relative: PathBuf = ["app", "views.py"].iter().collect();
        let doc = build_document(&mut parser, &relative, "class A:\n    x = 1\n").unwrap();
        assert_eq!(doc.path, "app/views.py");
        assert_eq!(doc.classes.len(), 1);
    }

    #[test]
    fn parse_failure_is_typed() {
        let mut parser = SourceParser::new().unwrap();
        let err = build_document(&mut parser, Path::new("bad.py"), "class (:\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
