use std::io::Read;
use std::path::PathBuf;

use aircheck::report::{
    render_macro_info, render_restriction_reasons, render_tracklist, ReportError,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aircheck", version, about = "Radio tracklist analyzer")]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the merged tracklist as a table
    Tracklist {
        /// Tracklist file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Explain which play restrictions the show violates
    Reasons {
        /// Tracklist file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Narrative violation summary for end-user display
    #[command(name = "macro")]
    MacroInfo {
        /// Tracklist file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Print a sample tracklist in the expected input format
    Example,
}

/// Sample fingerprinter export: one track per detection window, so a single
/// spin spans several rows until the merge step collapses them.
const EXAMPLE: &str = "\
Start\tEnd\tArtists\tTrack Title\tId\tAlbums
0\t30\tMack Fields\tBowling Ball Blues\t3530145\tCults Hits Novelty Classics, Vol. 1
30\t60\tMack Fields\tBowling Ball Blues\t3530145\tCults Hits Novelty Classics, Vol. 1
60\t90\tMack Fields\tBowling Ball Blues\t3530145\tCults Hits Novelty Classics, Vol. 1
90\t120\tMack Fields\tBowling Ball Blues\t3530145\tCults Hits Novelty Classics, Vol. 1
120\t150\tHank Locklin\tI m Tired Of Bummin Around\t4838751\tQueen Of Hearts
150\t180\tHank Locklin\tI m Tired Of Bummin Around\t4838751\tQueen Of Hearts
180\t210\tHank Locklin\tI m Tired Of Bummin Around\t4838751\tQueen Of Hearts
210\t240\tHank Locklin\tI m Tired Of Bummin Around\t4838751\tQueen Of Hearts
240\t270\tHank Locklin\tI m Tired Of Bummin Around\t4838751\tQueen Of Hearts
390\t420\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go
420\t450\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go
450\t480\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go
480\t510\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go
510\t540\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go
540\t570\tHank Thompson\tHangover Tavern\t2964975\tA Six Pack To Go";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Tracklist { file } => print_report(file, render_tracklist),
        Commands::Reasons { file } => print_report(file, render_restriction_reasons),
        Commands::MacroInfo { file } => print_report(file, render_macro_info),
        Commands::Example => {
            println!("Use the following format, header line included:");
            println!();
            println!("{EXAMPLE}");
            Ok(())
        }
    }
}

/// Read the pasted tracklist, run one report, and own the user-facing error
/// wording. Parse detail stays in the debug log; users get a generic prompt.
fn print_report(
    file: Option<PathBuf>,
    render: fn(&str) -> Result<String, ReportError>,
) -> Result<()> {
    let raw = read_input(file)?;

    match render(&raw) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(ReportError::EmptyInput) => {
            anyhow::bail!(
                "The tracklist is empty. Paste the show's rows (header line included) and try again."
            )
        }
        Err(e) => {
            log::debug!("tracklist rejected: {e}");
            anyhow::bail!(
                "Incorrect tracklist format. Run `aircheck example` to see the expected layout."
            )
        }
    }
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}
