//! Loads a policy template, applies `KEY=VALUE` edits and writes the export file.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use policy_loader::{Encoding, SourceLoader};
use policy_primitives::{PolicyDefinition, PolicySet};
use policy_session::{EditorSession, ExportMode};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "policy-export", version, about = "Edit and export browser policy templates")]
struct Args {
    /// Schema location: local path or http(s) URL. Overrides the config file.
    schema: Option<String>,

    /// Editor configuration file.
    #[arg(long, default_value = "policy-maker.toml")]
    config: PathBuf,

    /// Payload encoding. Overrides the config file.
    #[arg(long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Policy edit as KEY=VALUE; may be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    edits: Vec<String>,

    /// Export shape. Overrides the config file.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Output path. Defaults to the configured file name.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the loaded policies grouped by category instead of exporting.
    #[arg(long)]
    list: bool,

    /// With `--list`, only show policies whose name or description contains TERM.
    #[arg(long, value_name = "TERM", requires = "list")]
    filter: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    Plain,
    Base64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Full,
    TouchedOnly,
}

#[tokio::main]
async fn main() -> Result<()> {
    policy_telemetry::init_tracing(policy_telemetry::DEFAULT_DIRECTIVE);
    let args = Args::parse();

    let mut config = policy_config::load_or_default(&args.config)?;
    if let Some(schema) = &args.schema {
        config = config.with_location(schema.clone());
    }
    if let Some(encoding) = args.encoding {
        config.source.encoding = match encoding {
            EncodingArg::Plain => Encoding::Plain,
            EncodingArg::Base64 => Encoding::Base64,
        };
    }
    if let Some(mode) = args.mode {
        config.export.mode = match mode {
            ModeArg::Full => ExportMode::Full,
            ModeArg::TouchedOnly => ExportMode::TouchedOnly,
        };
    }

    let source = config.source()?;
    let loader = SourceLoader::new(config.http_config())?;
    let mut session = EditorSession::new(config.normalizer_options().clone());

    let outcome = session
        .load(&loader, &source)
        .await
        .with_context(|| format!("could not load schema from {source}"))?;
    info!(policies = outcome.policies, "loaded {source}");
    for skipped in &outcome.skipped {
        warn!("{skipped}");
    }
    if !outcome.is_complete() {
        warn!(
            "loaded, but {} entries were skipped",
            outcome.skipped.len()
        );
    }

    if args.list {
        if let Some(policies) = session.policies() {
            print_policies(policies, args.filter.as_deref().unwrap_or_default());
        }
        return Ok(());
    }

    for edit in &args.edits {
        let Some((key, value)) = edit.split_once('=') else {
            bail!("edit `{edit}` must look like KEY=VALUE");
        };
        session
            .set_value_from_text(key.trim(), value)
            .with_context(|| format!("cannot apply edit `{edit}`"))?;
    }

    let mode = config.export_mode();
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(config.export_file_name()));
    session.write_export(&output, mode).await?;
    info!("wrote {}", output.display());

    Ok(())
}

fn print_policies(policies: &PolicySet, filter: &str) {
    let matches: Vec<&PolicyDefinition> = policies.search(filter).collect();
    for group in policies.groups() {
        let mut in_group = matches
            .iter()
            .filter(|definition| definition.source_group() == Some(group))
            .peekable();
        if in_group.peek().is_none() {
            continue;
        }
        println!("[{group}]");
        for definition in in_group {
            println!(
                "  {} ({}) = {}  {}",
                definition.key(),
                definition.value_type(),
                definition.default_value().to_json(),
                definition.caption()
            );
        }
    }
}
