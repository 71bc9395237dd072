//! Trellis CLI
//!
//! Parses a markup file or string and prints the element tree.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use trellis_html::{ComponentTarget, MarkupConfig, ParseOptions, Parsed, parse};
use trellis_tree::print_tree;

/// Trellis - permissive markup-to-element-tree builder
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    trellis ./fragment.html

    # Parse inline markup and print JSON
    trellis --html '<p class=lead>Hi</p>' --json

    # Map tags to components and drop iframes
    trellis page.html --component a=Link --ignore iframe --meta
"#)]
struct Cli {
    /// Path to a markup file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this markup string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// JSON file with declarative parse options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Build the metadata tree
    #[arg(long)]
    meta: bool,

    /// Convert `style` attributes into declaration maps
    #[arg(long)]
    style: bool,

    /// Rename attributes to component prop names (`class` to `className`, ...)
    #[arg(long)]
    react_attributes: bool,

    /// Drop elements with this tag name (repeatable)
    #[arg(long, value_name = "TAG")]
    ignore: Vec<String>,

    /// Resolve a tag to a named component (repeatable)
    #[arg(long, value_name = "TAG=NAME", value_parser = parse_component)]
    component: Vec<(String, String)>,

    /// Log at info level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn parse_component(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((tag, name)) if !tag.is_empty() && !name.is_empty() => {
            Ok((tag.to_owned(), name.to_owned()))
        }
        _ => Err(format!("expected TAG=NAME, got {value:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let markup = read_markup(cli)?;
    let options = build_options(cli)?;
    tracing::info!(bytes = markup.len(), ?options, "parsing");

    let parsed = parse(&markup, &options).context("failed to parse markup")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&parsed).context("failed to serialize tree")?;
        println!("{json}");
    } else {
        print_parsed(&parsed);
    }
    Ok(())
}

/// Load markup from `--html` or the file argument
fn read_markup(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("no input: pass a FILE or --html")
    }
}

/// Start from `--config` and layer the command-line flags on top
fn build_options(cli: &Cli) -> Result<ParseOptions> {
    let mut config = match cli.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<MarkupConfig>(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => MarkupConfig::default(),
    };

    for (tag, name) in &cli.component {
        let _ = config
            .components
            .insert(tag.clone(), ComponentTarget::Component(name.clone()));
    }
    config.ignore_tags.extend(cli.ignore.iter().cloned());
    if cli.style && !config.style_keys.iter().any(|key| key == "style") {
        config.style_keys.push("style".to_owned());
    }
    config.react_attribute_names |= cli.react_attributes;
    config.with_meta |= cli.meta;

    Ok(config.into_options())
}

fn print_parsed(parsed: &Parsed) {
    println!("{}", "=== Element Tree ===".bold());
    if parsed.root.is_empty() {
        println!("{}", "(empty)".dimmed());
    } else {
        print_tree(&parsed.root);
    }

    if let Some(ref meta) = parsed.meta {
        println!("\n{}", "=== Metadata ===".bold());
        println!("{} nodes", meta.len().saturating_sub(1));
    }
}
