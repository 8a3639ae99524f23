mod model;
mod report;
mod safetensors;
mod scan;

use clap::Parser;
use colored_json::prelude::*;
use model::Extraction;
use regex::Regex;
use report::ReportOptions;
use serde_json::Map;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkpointtags")]
#[command(about = "Summarize the training tag frequencies stored in safetensors checkpoints")]
struct Cli {
    #[arg(help = "Directory to scan for checkpoints", default_value = ".")]
    dir: PathBuf,
    #[arg(
        help = "Number of tags to show per subset",
        short = 'n',
        long,
        default_value_t = 5
    )]
    top: usize,
    #[arg(
        help = "Extension of checkpoint files",
        short,
        long,
        default_value = "safetensors"
    )]
    extension: String,
    #[arg(short = 'j', long = "json", help = "Print the report as JSON")]
    json: bool,
    #[arg(short, long, help = "Regex pattern to filter subset names")]
    subset: Option<String>,
    #[arg(short, long, help = "Log skipped files and header details")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ReportOptions {
        top: cli.top,
        subset_filter: cli.subset.as_deref().map(Regex::new).transpose()?,
    };

    let files = scan::candidates(&cli.dir, &cli.extension)?;
    info!(count = files.len(), dir = %cli.dir.display(), "found checkpoints");

    let mut json = Map::new();
    let mut stdout = io::stdout().lock();
    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extraction = scan::inspect(&path);
        match &extraction {
            Extraction::Skipped(reason) => debug!(file = %file_name, %reason, "skipped"),
            Extraction::Found(tags) => debug!(
                file = %file_name,
                model = %tags.model,
                subsets = tags.subsets.len(),
                tags = tags.subsets.iter().map(|s| s.tags.len()).sum::<usize>(),
                "found tag frequencies"
            ),
        }

        if cli.json {
            if let Extraction::Found(tags) = &extraction {
                json.insert(file_name, report::to_json(tags, &options));
            }
        } else {
            report::write_text(&mut stdout, &file_name, &extraction, &options)?;
        }
    }

    if cli.json {
        let text = serde_json::to_string_pretty(&json)?;
        writeln!(stdout, "{}", text.to_colored_json_auto()?)?;
    }
    Ok(())
}
