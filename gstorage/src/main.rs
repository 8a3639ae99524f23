use clap::{Args, Parser, Subcommand, ValueEnum};
use gstorage::marker::DEFAULT_MARKER;
use gstorage::present::{Colored, Plain, Presenter, SizeStyle};
use gstorage::reconcile::Summary;
use gstorage::{Gsutil, Workspace};
use regex::Regex;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gstorage")]
#[command(about = "Compare a directory with its Cloud Storage copy and move files between them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(
        help = "File naming the remote directory",
        long,
        env = "GSTORAGE_MARKER",
        default_value = DEFAULT_MARKER,
        global = true
    )]
    marker: PathBuf,
    #[arg(
        help = "Program used to list and copy remote files",
        long,
        env = "GSTORAGE_GSUTIL",
        default_value = "gsutil",
        global = true
    )]
    gsutil: PathBuf,
    #[arg(
        help = "Local directory to work in",
        short = 'C',
        long,
        default_value = ".",
        global = true
    )]
    dir: PathBuf,
    #[arg(short, long, help = "Show debug logging", global = true)]
    verbose: bool,
    #[command(flatten)]
    status: StatusArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Display the status of files in the directory (default)
    Status,
    /// Upload files to the remote directory
    Push {
        #[arg(required = true, help = "Files to upload")]
        filenames: Vec<String>,
    },
    /// Download files from the remote directory
    Pull {
        #[arg(required = true, help = "Files to download")]
        filenames: Vec<String>,
    },
}

#[derive(Args)]
struct StatusArgs {
    #[arg(short, long, help = "Regex pattern to filter file names", global = true)]
    regex: Option<String>,
    #[arg(
        short = 'H',
        long,
        help = "Show sizes in human readable units",
        global = true
    )]
    human: bool,
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// `-v` wins over `RUST_LOG`; without either the status summary still shows.
fn log_directive(verbose: bool, env: Option<&str>) -> String {
    match (verbose, env) {
        (true, _) => "debug".to_string(),
        (false, Some(env)) if !env.trim().is_empty() => env.to_string(),
        (false, _) => "info".to_string(),
    }
}

fn init_logging(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log_directive(verbose, env.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn presenter(args: &StatusArgs) -> Box<dyn Presenter> {
    let sizes = if args.human {
        SizeStyle::Human
    } else {
        SizeStyle::Grouped
    };
    match args.color {
        ColorChoice::Never => Box::new(Plain { sizes }),
        ColorChoice::Auto if !io::stdout().is_terminal() => Box::new(Plain { sizes }),
        ColorChoice::Auto => Box::new(Colored { sizes }),
        ColorChoice::Always => {
            colored::control::set_override(true);
            Box::new(Colored { sizes })
        }
    }
}

fn status(workspace: &Workspace<Gsutil>, args: &StatusArgs) -> Result<(), anyhow::Error> {
    let filter = args.regex.as_deref().map(Regex::new).transpose()?;
    let mut records = workspace.status()?;
    if let Some(r) = &filter {
        records.retain(|record| r.is_match(&record.name));
    }

    let presenter = presenter(args);
    let mut stdout = io::stdout().lock();
    for record in &records {
        for row in record.rows() {
            writeln!(stdout, "{}", presenter.row(&row))?;
        }
    }

    let Summary {
        synced,
        local_only,
        remote_only,
        mismatched,
    } = Summary::of(&records);
    info!(synced, local_only, remote_only, mismatched, "status");
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workspace = Workspace::new(Gsutil::new(cli.gsutil), cli.dir, cli.marker);
    match cli.command {
        None | Some(Command::Status) => status(&workspace, &cli.status),
        Some(Command::Push { filenames }) => Ok(workspace.push(&filenames)?),
        Some(Command::Pull { filenames }) => Ok(workspace.pull(&filenames)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_options_work_without_subcommand() {
        let cli = Cli::try_parse_from(["gstorage", "-H", "-r", "safetensors$", "--color", "never"])
            .unwrap();
        assert!(cli.command.is_none());
        assert!(cli.status.human);
        assert_eq!(cli.status.regex.as_deref(), Some("safetensors$"));
        assert_eq!(cli.status.color, ColorChoice::Never);
    }

    #[test]
    fn status_options_after_subcommand() {
        let cli = Cli::try_parse_from(["gstorage", "status", "-H"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Status)));
        assert!(cli.status.human);
        assert_eq!(cli.status.color, ColorChoice::Auto);
    }

    #[test]
    fn transfers_need_file_names() {
        assert!(Cli::try_parse_from(["gstorage", "push"]).is_err());
        let cli = Cli::try_parse_from(["gstorage", "pull", "a.txt", "b.txt"]).unwrap();
        let Some(Command::Pull { filenames }) = cli.command else {
            panic!("expected pull");
        };
        assert_eq!(filenames, ["a.txt", "b.txt"]);
    }

    #[test]
    fn summary_is_visible_by_default() {
        assert_eq!(log_directive(false, None), "info");
        assert_eq!(log_directive(false, Some("")), "info");
        assert_eq!(log_directive(false, Some("gstorage=trace")), "gstorage=trace");
        assert_eq!(log_directive(true, Some("warn")), "debug");
    }
}
