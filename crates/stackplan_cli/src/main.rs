//! Stackplan CLI: the command-line front end of the multi-layer floorplanner.
//!
//! Provides `stackplan optimize` to place and anneal a design (either a
//! synthesized sample or a JSON description) and `stackplan init` to write a
//! default `stackplan.toml`.

#![warn(missing_docs)]

mod design;
mod init;
mod optimize;
mod render;
mod results;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Stackplan: a 2.5D block floorplanner.
#[derive(Parser, Debug)]
#[command(name = "stackplan", version, about = "Multi-layer block floorplanner")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print annealing progress.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `stackplan.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default `stackplan.toml`.
    Init {
        /// Directory to write into. Defaults to the current directory.
        dir: Option<String>,

        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },
    /// Place and optimize a floorplan.
    Optimize(OptimizeArgs),
}

/// Arguments for the `stackplan optimize` subcommand.
#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// Number of sample blocks to synthesize.
    #[arg(long)]
    pub blocks: Option<u32>,

    /// Number of stacked layers.
    #[arg(long)]
    pub layers: Option<u32>,

    /// Connections drawn per sample block.
    #[arg(long)]
    pub connections: Option<u32>,

    /// Side length of every square layer.
    #[arg(long)]
    pub size: Option<u32>,

    /// JSON design file with explicit blocks and connectivity.
    #[arg(long)]
    pub design: Option<String>,

    /// Seed for the random source. Random if omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Independent runs with consecutive seeds; the lowest energy wins.
    #[arg(long, default_value_t = 1)]
    pub runs: u32,

    /// Output format for the run report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Directory receiving the CSV log and the rendered images.
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Do not append to the CSV experiment log.
    #[arg(long)]
    pub no_log: bool,

    /// Do not render layer images.
    #[arg(long)]
    pub no_render: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print annealing progress.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok_and(|term| term != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { dir, force } => init::run(dir, force, &global),
        Command::Optimize(ref args) => optimize::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["stackplan", "init"]);
        match cli.command {
            Command::Init { dir, force } => {
                assert!(dir.is_none());
                assert!(!force);
            }
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_args() {
        let cli = Cli::parse_from(["stackplan", "init", "runs/exp1", "--force"]);
        match cli.command {
            Command::Init { dir, force } => {
                assert_eq!(dir.as_deref(), Some("runs/exp1"));
                assert!(force);
            }
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_optimize_default() {
        let cli = Cli::parse_from(["stackplan", "optimize"]);
        match cli.command {
            Command::Optimize(ref args) => {
                assert!(args.blocks.is_none());
                assert!(args.layers.is_none());
                assert!(args.design.is_none());
                assert!(args.seed.is_none());
                assert_eq!(args.runs, 1);
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.no_log);
                assert!(!args.no_render);
            }
            _ => panic!("expected Optimize command"),
        }
    }

    #[test]
    fn parse_optimize_with_args() {
        let cli = Cli::parse_from([
            "stackplan",
            "optimize",
            "--blocks",
            "12",
            "--layers",
            "2",
            "--connections",
            "4",
            "--size",
            "80",
            "--seed",
            "42",
            "--runs",
            "4",
            "--format",
            "json",
            "--output-dir",
            "out",
            "--no-log",
            "--no-render",
        ]);
        match cli.command {
            Command::Optimize(ref args) => {
                assert_eq!(args.blocks, Some(12));
                assert_eq!(args.layers, Some(2));
                assert_eq!(args.connections, Some(4));
                assert_eq!(args.size, Some(80));
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.runs, 4);
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.output_dir.as_deref(), Some("out"));
                assert!(args.no_log);
                assert!(args.no_render);
            }
            _ => panic!("expected Optimize command"),
        }
    }

    #[test]
    fn parse_optimize_design_file() {
        let cli = Cli::parse_from(["stackplan", "optimize", "--design", "chip.json"]);
        match cli.command {
            Command::Optimize(ref args) => assert_eq!(args.design.as_deref(), Some("chip.json")),
            _ => panic!("expected Optimize command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "stackplan",
            "--quiet",
            "--color",
            "never",
            "--config",
            "custom.toml",
            "optimize",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn parse_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["stackplan", "optimize", "--verbose"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_rejects_unknown_format() {
        let result = Cli::try_parse_from(["stackplan", "optimize", "--format", "xml"]);
        assert!(result.is_err());
    }
}
