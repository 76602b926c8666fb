// src/source.rs

//! Line sources for the analyzer.
//!
//! The analyzer only ever sees an iterator of text lines. This module opens
//! files (or stdin for `-`) and applies the `skip`/`count` window before the
//! lines reach the DAG compiler.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::config::AnalyzerConfig;
use crate::dag::DepGraph;
use crate::errors::Result;

/// Apply the `skip`/`count` window to any line iterator.
pub fn windowed<I>(lines: I, cfg: &AnalyzerConfig) -> impl Iterator<Item = I::Item>
where
    I: IntoIterator,
{
    lines
        .into_iter()
        .skip(cfg.skip)
        .take(cfg.limit().unwrap_or(usize::MAX))
}

/// Open `path` as a buffered line reader; `-` reads stdin.
pub fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Read a windowed stream from `reader` into a fresh [`DepGraph`].
///
/// Lines are split on raw `\n` bytes, so a line that is not valid UTF-8 is
/// one undecodable record rather than a read failure. I/O errors abort;
/// undecodable or malformed records are skipped.
pub fn ingest_reader<R: BufRead>(reader: R, cfg: &AnalyzerConfig) -> Result<DepGraph> {
    let mut graph = DepGraph::new();
    graph.set_mid_stream(cfg.skip > 0);

    for (n, raw) in windowed(reader.split(b'\n'), cfg).enumerate() {
        let lineno = cfg.skip + n + 1;
        let line = match String::from_utf8(raw?) {
            Ok(line) => line,
            Err(e) => {
                graph.record_undecodable();
                warn!(line = lineno, error = %e, "skipping record that is not valid UTF-8");
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = graph.ingest_line(line) {
            warn!(line = lineno, error = %e, "skipping record");
        }
    }

    let stats = *graph.stats();

    info!(
        ingested = stats.ingested,
        malformed = stats.malformed,
        undecodable = stats.undecodable,
        duplicate_writes = stats.duplicate_writes,
        "ingested stream"
    );
    Ok(graph)
}

pub fn ingest_path(path: &Path, cfg: &AnalyzerConfig) -> Result<DepGraph> {
    ingest_reader(open_lines(path)?, cfg)
}
