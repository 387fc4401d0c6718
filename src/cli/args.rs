//! CLI argument parsing.
//!
//! Hand-rolled so the parser can be driven from any iterator of strings in
//! tests.

use std::path::PathBuf;

use crate::scales::SLIDER_STEPS;

/// Default log level when `--log-level` is absent.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Tracing level name (`trace`..`error`).
    pub log_level: String,
}

/// Overrides for a projection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// YAML configuration file; built-in defaults when absent.
    pub config_path: Option<PathBuf>,
    /// Annual budget override.
    pub budget: Option<f64>,
    /// Cost-per-kilogram override.
    pub cost: Option<f64>,
    /// First projected year override.
    pub start: Option<i32>,
    /// Last projected year override.
    pub end: Option<i32>,
    /// Exchange rate to use instead of the offline default.
    pub eur_rate: Option<f64>,
    /// JSON file caching the exchange rate between runs.
    pub rate_cache: Option<PathBuf>,
    /// Emit JSON instead of a table.
    pub json: bool,
}

/// Which slider scale to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    /// Annual budget, 1e8..1e12.
    Budget,
    /// Cost per kilogram, 0.1..100.
    Cost,
}

/// Direction of a scale lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleQuery {
    /// Slider position to value.
    Position(f64),
    /// Value to nearest slider step.
    Value(f64),
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Compute and print a projection
    Run(RunOptions),
    /// Map between slider positions and values
    Scale {
        /// Scale to use.
        kind: ScaleKind,
        /// Lookup to perform.
        query: ScaleQuery,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let (rest, log_level) = Self::extract_log_level(args);

        let command = match rest.get(1).map(String::as_str) {
            None => Command::Help,
            Some("run") => Self::parse_run_command(&rest[2..]),
            Some("scale") => Self::parse_scale_command(&rest[2..]),
            Some("-h" | "--help" | "help") => Command::Help,
            Some("-V" | "--version" | "version") => Command::Version,
            Some(unknown) => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command, log_level }
    }

    /// Pull the global `--log-level` option out, wherever it appears.
    fn extract_log_level(args: &[String]) -> (Vec<String>, String) {
        let mut rest = Vec::with_capacity(args.len());
        let mut log_level = DEFAULT_LOG_LEVEL.to_string();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--log-level" {
                if let Some(level) = iter.next() {
                    log_level = level.to_lowercase();
                }
            } else {
                rest.push(arg.clone());
            }
        }
        (rest, log_level)
    }

    /// Parse the 'run' command options.
    fn parse_run_command(args: &[String]) -> Command {
        let mut options = RunOptions::default();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            let consumed = match args[i].as_str() {
                "-c" | "--config" => {
                    options.config_path = value.map(PathBuf::from);
                    2
                }
                "--budget" => {
                    options.budget = parse_value(value, "--budget");
                    2
                }
                "--cost" => {
                    options.cost = parse_value(value, "--cost");
                    2
                }
                "--start" => {
                    options.start = parse_value(value, "--start");
                    2
                }
                "--end" => {
                    options.end = parse_value(value, "--end");
                    2
                }
                "--eur-rate" => {
                    options.eur_rate = parse_value(value, "--eur-rate");
                    2
                }
                "--rate-cache" => {
                    options.rate_cache = value.map(PathBuf::from);
                    2
                }
                "--json" => {
                    options.json = true;
                    1
                }
                other => {
                    eprintln!("Ignoring unknown option: {other}");
                    1
                }
            };
            i += consumed;
        }

        Command::Run(options)
    }

    /// Parse the 'scale' command: `scale <budget|cost> <position>` or
    /// `scale <budget|cost> --value <value>`.
    fn parse_scale_command(args: &[String]) -> Command {
        let kind = match args.first().map(String::as_str) {
            Some("budget") => ScaleKind::Budget,
            Some("cost") => ScaleKind::Cost,
            _ => {
                eprintln!("Error: 'scale' requires 'budget' or 'cost'");
                return Command::Help;
            }
        };

        let query = match (args.get(1).map(String::as_str), args.get(2)) {
            (Some("--value"), value) => parse_value(value, "--value").map(ScaleQuery::Value),
            (Some(position), _) => position
                .parse::<f64>()
                .ok()
                .filter(|p| (0.0..=SLIDER_STEPS).contains(p))
                .map(ScaleQuery::Position),
            (None, _) => None,
        };

        match query {
            Some(query) => Command::Scale { kind, query },
            None => {
                eprintln!("Error: 'scale' requires a slider position in 0..=100 or --value <N>");
                Command::Help
            }
        }
    }
}

fn parse_value<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Option<T> {
    let parsed = value.and_then(|v| v.parse().ok());
    if parsed.is_none() {
        eprintln!("Warning: {flag} expects a numeric value");
    }
    parsed
}
