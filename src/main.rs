use anyhow::{Context, Result};
use clap::Parser;
use spotify_xspf::convert::convert;
use spotify_xspf::emit::{Emitter, DEFAULT_OUTPUT_DIR};
use spotify_xspf::progress::{create_spinner, format_duration, set_log_only};
use spotify_xspf::safety::validate_output_dir;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "spotify-xspf")]
#[command(about = "Convert a tagged Spotify playlist dump on stdin into XSPF playlist files")]
struct Args {
    /// Directory receiving <n>.xspf files (must already exist)
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Hide the spinner and log periodic counts instead
    #[arg(long)]
    log_only: bool,

    /// Write run statistics as JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spotify_xspf=info")))
        .init();

    validate_output_dir(&args.output_dir)?;

    let start = Instant::now();
    let mut emitter = Emitter::new(&args.output_dir);
    let spinner = create_spinner("Converting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = convert(stdin.lock(), &mut emitter, &mut stdout.lock(), &spinner)?;

    spinner.finish_and_clear();
    info!(
        "Wrote {} playlists to {} in {}",
        stats.playlists_written,
        emitter.dir().display(),
        format_duration(start.elapsed())
    );
    stats.log_summary();

    if let Some(path) = args.stats {
        stats
            .write_to_file(&path)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    }

    Ok(())
}
