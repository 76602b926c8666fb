// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod generator;
pub mod logging;
pub mod record;
pub mod source;
pub mod types;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, CliArgs, Command, GenerateArgs, ShowArgs};
use crate::config::{AnalyzerConfig, GeneratorConfig, load_or_default, validate_analyzer};
use crate::dag::{DepGraph, Schedule};
use crate::generator::{GenerationSession, JsonLinesSink};

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Generate(gen_args) => run_generate(&gen_args),
        Command::Simulate(analyze) => run_simulate(&analyze),
        Command::Show(show) => run_show(&show),
    }
}

/// Merge the config file (if any) with CLI overrides. Validation happens in
/// `GenerationSession::new`.
fn generator_config(args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut cfg = load_or_default(args.config.as_deref())?.generator;
    args.apply_to(&mut cfg);
    Ok(cfg)
}

fn analyzer_config(args: &AnalyzeArgs) -> Result<AnalyzerConfig> {
    let mut cfg = load_or_default(args.config.as_deref())?.analyzer;
    args.apply_to(&mut cfg);
    validate_analyzer(&cfg)?;
    Ok(cfg)
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let cfg = generator_config(args)?;
    let session = GenerationSession::new(cfg)?;

    let writer = open_output(args.output.as_deref())?;
    let mut sink = JsonLinesSink::new(writer);
    session.emit(&mut sink)?;
    let lines = sink.lines_written();
    sink.into_inner()?;

    let stats = session.stats();
    info!(
        seed = stats.seed,
        records = lines,
        mean_degree = stats.mean_degree,
        read_edges = stats.injection.read_edges,
        skipped_pairings = stats.injection.skipped_pairings,
        "generation complete"
    );
    Ok(())
}

fn load_graph(args: &AnalyzeArgs) -> Result<DepGraph> {
    let cfg = analyzer_config(args)?;
    let graph = source::ingest_path(&args.input, &cfg)
        .with_context(|| format!("reading {}", args.input.display()))?;
    if graph.stats().rejected() > 0 {
        warn!(
            rejected = graph.stats().rejected(),
            "some records were skipped; the DAG may contain placeholders for them"
        );
    }
    Ok(graph)
}

fn run_simulate(args: &AnalyzeArgs) -> Result<()> {
    let graph = load_graph(args)?;
    let dag = graph.compile();
    let schedule = dag.simulate()?;

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &schedule)?;
    Ok(())
}

fn run_show(args: &ShowArgs) -> Result<()> {
    let graph = load_graph(&args.analyze)?;
    let dag = graph.compile();

    let mut out = open_output(args.output.as_deref())?;
    out.write_all(dag.to_dot().as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Per-wave report: total vertices and real operations, then the wave count.
pub fn write_report<W: Write>(out: &mut W, schedule: &Schedule) -> io::Result<()> {
    for (i, wave) in schedule.waves().iter().enumerate() {
        writeln!(
            out,
            "wave {}: {} vertices ({} operations)",
            i + 1,
            wave.len(),
            wave.real_ops
        )?;
    }
    writeln!(
        out,
        "completed in {} waves (max concurrency {})",
        schedule.wave_count(),
        schedule.max_concurrency()
    )
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file =
                File::create(p).with_context(|| format!("creating output {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}
