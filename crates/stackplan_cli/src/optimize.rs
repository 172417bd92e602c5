//! `stackplan optimize`: build a starting layout, anneal it, and report.
//!
//! Orchestrates one optimization session:
//! 1. Load `stackplan.toml` and apply command-line overrides
//! 2. Synthesize a sample problem or load a JSON design
//! 3. Build and anneal one layout per seed, in parallel
//! 4. Keep the lowest-energy run and render its layers
//! 5. Append the run to the CSV experiment log and print the report

use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use stackplan_config::RunConfig;
use stackplan_core::placement::AnnealResult;
use stackplan_core::{
    anneal, build_layout, unresolved_connections, AnnealParams, Connection, EnergyWeights,
    Layout, LayoutError, RunReport,
};
use stackplan_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, TerminalRenderer,
};

use crate::design::{load_design, Problem};
use crate::render::render_layout;
use crate::results::{append_row, LogRow};
use crate::{GlobalArgs, OptimizeArgs, ReportFormat};

/// Warning code for connections naming a block that does not exist.
const UNRESOLVED_CONNECTION: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// Runs the `stackplan optimize` command.
///
/// Returns exit code 0 on success and 1 when the layout cannot be built.
pub fn run(args: &OptimizeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_run_config(global)?;
    let output_dir = PathBuf::from(args.output_dir.as_deref().unwrap_or("."));
    let sink = DiagnosticSink::new();

    let report = execute(args, &config, &output_dir, &sink)?;
    render_diagnostics(&sink, global);

    let Some(report) = report else {
        return Ok(1);
    };

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", format_report(&report));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}

/// Loads `--config` if given, otherwise `stackplan.toml` from the working
/// directory, otherwise the defaults.
fn load_run_config(global: &GlobalArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => stackplan_config::load_config(Path::new(path))?,
        None => stackplan_config::load_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Effective parameters of a session after merging config and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub num_blocks: u32,
    pub connections_per_block: u32,
    pub layers: u32,
    pub floorplan_size: u32,
    pub params: AnnealParams,
    pub weights: EnergyWeights,
}

impl RunSettings {
    /// Starts from `config` and applies the command-line overrides.
    pub fn resolve(args: &OptimizeArgs, config: &RunConfig) -> Self {
        let anneal = &config.anneal;
        Self {
            num_blocks: args.blocks.unwrap_or(config.sample.num_blocks),
            connections_per_block: args
                .connections
                .unwrap_or(config.sample.connections_per_block),
            layers: args.layers.unwrap_or(config.sample.layers),
            floorplan_size: args.size.unwrap_or(config.sample.floorplan_size),
            params: AnnealParams {
                initial_temperature: anneal.initial_temperature,
                cooling_rate: anneal.cooling_rate,
                min_temperature: anneal.min_temperature,
                max_iterations: anneal.max_iterations,
                max_placement_attempts_per_move: anneal.max_placement_attempts_per_move,
            },
            weights: EnergyWeights {
                area: config.energy.area_weight,
                wire: config.energy.wire_weight,
            },
        }
    }
}

/// Result of one seeded build-and-anneal run.
#[derive(Debug)]
pub struct RunOutcome {
    pub seed: u64,
    pub initial: Layout,
    pub result: AnnealResult,
    pub report: RunReport,
    /// Progress notes emitted while annealing.
    pub progress: Vec<Diagnostic>,
}

/// Runs the whole session, writing images and the log under `output_dir`.
///
/// Layout errors are emitted into `sink` and yield `Ok(None)`; I/O and
/// design-file problems are returned as errors.
pub fn execute(
    args: &OptimizeArgs,
    config: &RunConfig,
    output_dir: &Path,
    sink: &DiagnosticSink,
) -> Result<Option<RunReport>, Box<dyn std::error::Error>> {
    if args.runs == 0 {
        return Err("--runs must be at least 1".into());
    }

    let mut settings = RunSettings::resolve(args, config);
    let base_seed = args
        .seed
        .or(config.output.seed)
        .unwrap_or_else(rand::random);

    let problem = match &args.design {
        Some(path) => {
            let (problem, layers, size) = Problem::from_design(load_design(Path::new(path))?, path);
            // Flags beat the design file, which beats the config.
            if args.layers.is_none() {
                settings.layers = layers.unwrap_or(settings.layers);
            }
            if args.size.is_none() {
                settings.floorplan_size = size.unwrap_or(settings.floorplan_size);
            }
            problem
        }
        None => {
            let mut rng = StdRng::seed_from_u64(base_seed);
            Problem::sample(settings.num_blocks, settings.connections_per_block, &mut rng)
        }
    };

    let seeds: Vec<u64> = (0..u64::from(args.runs))
        .map(|i| base_seed.wrapping_add(i))
        .collect();
    let outcomes: Vec<Result<RunOutcome, LayoutError>> = seeds
        .par_iter()
        .map(|&seed| execute_run(&problem, &settings, seed))
        .collect();

    let best = match select_best_run(outcomes) {
        Ok(best) => best,
        Err(err) => {
            sink.emit(err.to_diagnostic());
            return Ok(None);
        }
    };

    for connection in unresolved_connections(&best.initial, &problem.connectivity) {
        sink.emit(unresolved_connection_warning(connection));
    }
    sink.extend(best.progress);

    let mut report = best.report;
    if !args.no_render {
        let image_dir = output_dir.join(&config.output.image_dir);
        report.initial_images = render_layout(&best.initial, &image_dir, "initial", "(Initial)")?
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        report.optimized_images =
            render_layout(&best.result.layout, &image_dir, "optimized", "(Optimized)")?
                .iter()
                .map(|p| p.display().to_string())
                .collect();
    }
    if !args.no_log {
        let csv_path = output_dir.join(&config.output.results_csv);
        append_row(&csv_path, &LogRow::new(&problem.source, &report))?;
    }

    Ok(Some(report))
}

/// Builds and anneals one layout from `seed`.
pub fn execute_run(
    problem: &Problem,
    settings: &RunSettings,
    seed: u64,
) -> Result<RunOutcome, LayoutError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let initial = build_layout(
        problem.blocks.clone(),
        settings.layers,
        settings.floorplan_size,
        &mut rng,
    )?;

    let sink = DiagnosticSink::new();
    let start = Instant::now();
    let result = anneal(
        &initial,
        &problem.connectivity,
        settings.params,
        settings.weights,
        &mut rng,
        &sink,
    );
    let report = RunReport::new(
        &initial,
        &result,
        &problem.connectivity,
        &settings.weights,
        seed,
        start.elapsed(),
    );

    Ok(RunOutcome {
        seed,
        initial,
        result,
        report,
        progress: sink.take_all(),
    })
}

/// Picks the run with the lowest energy; on a tie, the one from the lowest seed.
///
/// Fails only when every run failed, with the error of the lowest seed.
pub fn select_best_run(
    outcomes: Vec<Result<RunOutcome, LayoutError>>,
) -> Result<RunOutcome, LayoutError> {
    let mut best: Option<RunOutcome> = None;
    let mut first_error: Option<LayoutError> = None;

    for outcome in outcomes {
        match outcome {
            Ok(run) => {
                best = Some(match best {
                    None => run,
                    Some(prev) => {
                        if run.result.energy < prev.result.energy
                            || (run.result.energy == prev.result.energy && run.seed < prev.seed)
                        {
                            run
                        } else {
                            prev
                        }
                    }
                });
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    match (best, first_error) {
        (Some(run), _) => Ok(run),
        (None, Some(err)) => Err(err),
        (None, None) => Err(LayoutError::invalid("no runs were executed")),
    }
}

fn unresolved_connection_warning(Connection(a, b): Connection) -> Diagnostic {
    Diagnostic::warning(
        UNRESOLVED_CONNECTION,
        format!("connection ({a}, {b}) references an unknown block"),
    )
    .with_note("the connection contributes no wire length")
}

/// Prints diagnostics to stderr: errors always, warnings unless `--quiet`,
/// notes only with `--verbose`.
fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        if diag.severity.is_visible(global.quiet, global.verbose) {
            eprintln!("{}", renderer.render(&diag));
        }
    }
}

/// Human-readable summary of a report.
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "   Optimized seed {} in {} iterations ({:.2}s)\n",
        report.seed, report.iterations, report.execution_time
    ));
    out.push_str(&format!(
        "      Energy {:.2} -> {:.2}\n",
        report.initial_energy, report.optimized_energy
    ));
    out.push_str(&format!(
        "        Area {} -> {} ({:.2}% reduction)\n",
        report.initial_area, report.optimized_area, report.area_reduction
    ));
    out.push_str(&format!(
        "  Wirelength {} -> {} ({:.2}% reduction)\n",
        report.initial_wire_length, report.optimized_wire_length, report.wire_length_reduction
    ));
    out.push_str(&format!(
        "       Power {:.2} -> {:.2} ({:.2}% reduction)\n",
        report.initial_power, report.optimized_power, report.power_reduction
    ));
    out.push_str(&format!(
        " Temperature {} -> {} ({} reduction)\n",
        report.initial_temperature, report.optimized_temperature, report.temperature_reduction
    ));
    for path in report.initial_images.iter().chain(&report.optimized_images) {
        out.push_str(&format!("     Wrote {path}\n"));
    }
    out
}
