mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use prores_dater::config::{self, Config};
use prores_dater::{Converter, FfmpegEngine, RunSummary};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "prores_dater=trace,prores_av=debug".to_string()
        } else {
            "prores_dater=info,prores_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.check_tools {
        return check_tools();
    }

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let path = cli
        .path
        .as_deref()
        .context("A file or directory path is required")?;

    run(path, config, cli.dry_run)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref dir) = cli.output_dir {
        config.output.dir = Some(dir.clone());
    }
    if cli.no_recursive {
        config.scan.recursive = false;
    }
    if let Some(policy) = cli.on_collision {
        config.output.collision = policy;
    }
}

fn run(path: &Path, config: Config, dry_run: bool) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("The specified path does not exist: {:?}", path);
    }

    let tools = prores_av::Toolchain::resolve(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .context("ffmpeg and ffprobe must be installed (see --check-tools)")?;
    tracing::debug!("Using ffmpeg {:?}, ffprobe {:?}", tools.ffmpeg, tools.ffprobe);

    let mut converter = Converter::new(FfmpegEngine::new(tools), config).with_dry_run(dry_run);
    let summary = converter.process(path)?;

    print_summary(&summary);

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} files failed to convert",
            summary.failed.len(),
            summary.failed.len() + summary.converted.len()
        );
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let prefix = if summary.dry_run { "[DRY RUN] " } else { "" };

    for outcome in &summary.converted {
        let dated = match outcome.created {
            Some(ts) => format!("created {}", ts),
            None => "no creation date".to_string(),
        };
        println!(
            "{}{} -> {} ({}, {})",
            prefix,
            outcome.source.display(),
            outcome.destination.display(),
            dated,
            outcome.color
        );
    }

    for failure in &summary.failed {
        println!("✗ {}: {}", failure.source.display(), failure.message);
    }

    println!();
    println!(
        "{}{} converted ({} dated), {} failed, {} non-video skipped",
        prefix,
        summary.converted.len(),
        summary.dated(),
        summary.failed.len(),
        summary.skipped.len()
    );
    if !summary.converted.is_empty() {
        println!("Output: {}", summary.output_dir.display());
    }
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = prores_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
        Ok(())
    } else {
        anyhow::bail!("ffmpeg and ffprobe are required. Install them and try again.")
    }
}
