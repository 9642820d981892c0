//! Single-pass conversion driver: lines in, XSPF files out.

use crate::accumulator::{Accumulator, Applied};
use crate::emit::{report_line, Emitter};
use crate::models::ConversionStats;
use crate::progress::log_progress;
use crate::record::{parse_line, Line};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{trace, warn};

const LOG_INTERVAL: u64 = 10_000;

/// Consume `input` to exhaustion, writing one document per closed playlist
/// and one `Written <n> <title>` line per document to `report`.
///
/// Bad records are logged and skipped; I/O failures abort the run.
pub fn convert<R, W>(
    mut input: R,
    emitter: &mut Emitter,
    report: &mut W,
    progress: &ProgressBar,
) -> Result<ConversionStats>
where
    R: BufRead,
    W: Write,
{
    let start = Instant::now();
    let mut stats = ConversionStats::default();
    let mut acc = Accumulator::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }
        stats.lines += 1;
        let line_no = stats.lines;
        progress.inc(1);
        log_progress("convert", line_no as u64, LOG_INTERVAL);

        let line = decode(&buf);
        if let Cow::Owned(_) = line {
            warn!(line = line_no, "invalid UTF-8 replaced");
        }

        let record = match parse_line(&line) {
            Ok(Line::Blank) => continue,
            Ok(Line::Unknown(tag)) => {
                trace!(line = line_no, tag = %tag, "ignoring unknown tag");
                stats.unknown_tags += 1;
                continue;
            }
            Ok(Line::Record(record)) => record,
            Err(e) => {
                warn!(line = line_no, "skipping record: {}", e);
                stats.skipped_records += 1;
                continue;
            }
        };

        match acc.apply(record) {
            Ok(Applied::Updated) => stats.records_applied += 1,
            Ok(Applied::TrackFinalized) => {
                stats.records_applied += 1;
                stats.tracks_finalized += 1;
            }
            Ok(Applied::PlaylistClosed(playlist)) => {
                stats.records_applied += 1;
                let emitted = emitter.emit(&playlist)?;
                let msg = report_line(&emitted, &playlist);
                progress
                    .suspend(|| writeln!(report, "{}", msg))
                    .context("Failed to write progress report")?;
                stats.playlists_written = emitted.count;
            }
            Err(e) => {
                warn!(line = line_no, "skipping record: {}", e);
                stats.skipped_records += 1;
            }
        }
    }

    stats.open_playlists_at_eof = acc.open_playlists();
    if stats.open_playlists_at_eof > 0 {
        warn!(
            count = stats.open_playlists_at_eof,
            "input ended with playlists never closed by PLAYLIST:END"
        );
    }
    stats.elapsed_seconds = start.elapsed().as_secs_f64();
    Ok(stats)
}

/// Decode one raw line, dropping its `\n` or `\r\n` terminator.
fn decode(raw: &[u8]) -> Cow<'_, str> {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&raw[..end])
}
