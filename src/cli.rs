use crate::config::{LayoutType, load_config};
use crate::ir::GraphDocument;
use crate::layout::calculate_positions_with_report;
use crate::layout_dump::write_layout_dump;
use crate::suggest::{suggest_layout, validate_layout};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "canvas-layout",
    version,
    about = "Lay out a node/edge graph on a 2D canvas"
)]
pub struct Args {
    /// Input graph document (JSON or JSON5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the positioned graph. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout type, overriding the config file
    #[arg(short = 'l', long = "layout")]
    pub layout: Option<String>,

    /// Config JSON/JSON5 file with layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print ranked layout suggestions instead of laying out
    #[arg(long = "suggest", conflicts_with = "check")]
    pub suggest: bool,

    /// Check whether a layout type suits the graph; exits non-zero if not
    #[arg(long = "check", value_name = "TYPE")]
    pub check: Option<String>,

    /// Also write a JSON report of the layout pass
    #[arg(long = "dump", value_name = "FILE")]
    pub dump: Option<PathBuf>,

    /// Log layout diagnostics
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input = read_input(args.input.as_deref())?;
    let graph = GraphDocument::parse(&input).context("invalid graph document")?;

    if args.suggest {
        let suggestions = suggest_layout(&graph.nodes, &graph.edges);
        return write_output(
            args.output.as_deref(),
            &serde_json::to_string_pretty(&suggestions)?,
        );
    }

    if let Some(token) = args.check.as_deref() {
        let layout: LayoutType = token.parse()?;
        let fits = validate_layout(&graph.nodes, &graph.edges, layout);
        write_output(args.output.as_deref(), &format!("{layout}: {fits}"))?;
        if !fits {
            anyhow::bail!("layout `{layout}` does not suit this graph");
        }
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(token) = args.layout.as_deref() {
        config.layout = LayoutType::resolve(token);
    }

    let outcome = calculate_positions_with_report(&graph.nodes, &graph.edges, &config);
    if let Some(err) = &outcome.error {
        tracing::warn!(error = %err, "layout kept the input positions");
    }
    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &outcome, &graph.nodes, &graph.edges)?;
    }

    let result = GraphDocument {
        nodes: outcome.nodes,
        edges: graph.edges,
    };
    write_output(args.output.as_deref(), &serde_json::to_string_pretty(&result)?)
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{contents}")?;
            Ok(())
        }
    }
}
