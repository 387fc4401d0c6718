//! CLI module tests.

use super::args::{Args, Command, RunOptions, ScaleKind, ScaleQuery, DEFAULT_LOG_LEVEL};
use super::commands::{execute_run, resolve_parameters, run_cli, scale_lookup};
use super::output::{format_projection_table, format_scale_result};
use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["plastisim"]);
    assert_eq!(args.command, Command::Help);
    assert_eq!(args.log_level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["plastisim", flag]).command, Command::Help);
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        assert_eq!(
            Args::parse_from(["plastisim", flag]).command,
            Command::Version
        );
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["plastisim", "unknown-cmd"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_run_without_options() {
    let args = Args::parse_from(["plastisim", "run"]);
    assert_eq!(args.command, Command::Run(RunOptions::default()));
}

#[test]
fn test_parse_run_all_options() {
    let args = Args::parse_from([
        "plastisim",
        "run",
        "--config",
        "projection.yaml",
        "--budget",
        "3e10",
        "--cost",
        "1.5",
        "--start",
        "2020",
        "--end",
        "2030",
        "--eur-rate",
        "0.9",
        "--rate-cache",
        "rates.json",
        "--json",
    ]);
    let Command::Run(options) = args.command else {
        panic!("expected run command");
    };
    assert_eq!(options.config_path, Some(PathBuf::from("projection.yaml")));
    assert_eq!(options.budget, Some(3e10));
    assert_eq!(options.cost, Some(1.5));
    assert_eq!(options.start, Some(2020));
    assert_eq!(options.end, Some(2030));
    assert_eq!(options.eur_rate, Some(0.9));
    assert_eq!(options.rate_cache, Some(PathBuf::from("rates.json")));
    assert!(options.json);
}

#[test]
fn test_parse_run_invalid_number_ignored() {
    let args = Args::parse_from(["plastisim", "run", "--budget", "lots", "--json"]);
    let Command::Run(options) = args.command else {
        panic!("expected run command");
    };
    assert_eq!(options.budget, None);
    assert!(options.json);
}

#[test]
fn test_parse_run_missing_value_at_end() {
    let args = Args::parse_from(["plastisim", "run", "--end"]);
    let Command::Run(options) = args.command else {
        panic!("expected run command");
    };
    assert_eq!(options.end, None);
}

#[test]
fn test_parse_log_level_anywhere() {
    let args = Args::parse_from(["plastisim", "--log-level", "DEBUG", "run", "--json"]);
    assert_eq!(args.log_level, "debug");
    assert!(matches!(args.command, Command::Run(ref o) if o.json));

    let args = Args::parse_from(["plastisim", "run", "--log-level", "trace"]);
    assert_eq!(args.log_level, "trace");
    assert_eq!(args.command, Command::Run(RunOptions::default()));
}

#[test]
fn test_parse_scale_position() {
    let args = Args::parse_from(["plastisim", "scale", "budget", "50"]);
    assert_eq!(
        args.command,
        Command::Scale {
            kind: ScaleKind::Budget,
            query: ScaleQuery::Position(50.0),
        }
    );
}

#[test]
fn test_parse_scale_value() {
    let args = Args::parse_from(["plastisim", "scale", "cost", "--value", "1.0"]);
    assert_eq!(
        args.command,
        Command::Scale {
            kind: ScaleKind::Cost,
            query: ScaleQuery::Value(1.0),
        }
    );
}

#[test]
fn test_parse_scale_invalid() {
    assert_eq!(
        Args::parse_from(["plastisim", "scale"]).command,
        Command::Help
    );
    assert_eq!(
        Args::parse_from(["plastisim", "scale", "volume", "10"]).command,
        Command::Help
    );
    assert_eq!(
        Args::parse_from(["plastisim", "scale", "cost"]).command,
        Command::Help
    );
}

#[test]
fn test_parse_scale_position_out_of_range() {
    for position in ["150", "-1", "100.5", "NaN", "inf"] {
        assert_eq!(
            Args::parse_from(["plastisim", "scale", "budget", position]).command,
            Command::Help,
            "position {position}"
        );
    }
    assert_eq!(
        Args::parse_from(["plastisim", "scale", "budget", "100"]).command,
        Command::Scale {
            kind: ScaleKind::Budget,
            query: ScaleQuery::Position(100.0),
        }
    );
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_resolve_parameters_overrides() {
    let config = ProjectionConfig::default();
    let options = RunOptions {
        budget: Some(2e10),
        end: Some(2050),
        ..RunOptions::default()
    };
    let params = resolve_parameters(&config, &options);
    assert!((params.annual_budget - 2e10).abs() < f64::EPSILON);
    assert!((params.cost_per_kg - config.defaults.cost_per_kg).abs() < f64::EPSILON);
    assert_eq!(params.start_year, 1991);
    assert_eq!(params.end_year, 2050);
}

#[test]
fn test_execute_run_defaults() {
    let report = execute_run(&RunOptions::default()).unwrap();
    assert_eq!(report.projection.series.len(), 45);
    assert_eq!(report.policy, "flat-capacity");
    // Offline with no cache: configured default rate
    assert!((report.exchange.rate - 0.93).abs() < f64::EPSILON);
    assert!(!report.exchange.is_loading);
    assert!(
        (report.cost_per_ton_converted - report.summary.cost_per_ton * 0.93).abs() < 1e-9
    );
}

#[test]
fn test_execute_run_fixed_rate() {
    let options = RunOptions {
        eur_rate: Some(0.5),
        ..RunOptions::default()
    };
    let report = execute_run(&options).unwrap();
    assert!((report.exchange.rate - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_execute_run_rejects_bad_rate() {
    let options = RunOptions {
        eur_rate: Some(-1.0),
        ..RunOptions::default()
    };
    assert!(matches!(
        execute_run(&options),
        Err(ProjectionError::Config { .. })
    ));
}

#[test]
fn test_execute_run_invalid_range() {
    let options = RunOptions {
        start: Some(2030),
        end: Some(2020),
        ..RunOptions::default()
    };
    let err = execute_run(&options).unwrap_err();
    assert!(err.to_string().contains("must precede"));
}

#[test]
fn test_execute_run_out_of_domain_budget() {
    let options = RunOptions {
        budget: Some(1.0),
        ..RunOptions::default()
    };
    assert!(matches!(
        execute_run(&options),
        Err(ProjectionError::Validation(_))
    ));
}

#[test]
fn test_execute_run_missing_config() {
    let options = RunOptions {
        config_path: Some(PathBuf::from("/nonexistent/plastisim.yaml")),
        ..RunOptions::default()
    };
    assert!(execute_run(&options).is_err());
}

#[test]
fn test_execute_run_with_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "intervention:\n  kind: growth-suppression\n  rate: 0.05\ndefaults:\n  annual_budget: 10000000000.0\n  cost_per_kg: 5.0\n  start_year: 2010\n  end_year: 2040"
    )
    .unwrap();

    let options = RunOptions {
        config_path: Some(file.path().to_path_buf()),
        ..RunOptions::default()
    };
    let report = execute_run(&options).unwrap();
    assert_eq!(report.policy, "growth-suppression");
    assert_eq!(report.projection.series.len(), 31);
    assert_eq!(report.parameters.start_year, 2010);
}

#[test]
fn test_execute_run_with_rate_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("rates.json");

    let first = RunOptions {
        eur_rate: Some(0.88),
        rate_cache: Some(cache.clone()),
        ..RunOptions::default()
    };
    assert!((execute_run(&first).unwrap().exchange.rate - 0.88).abs() < f64::EPSILON);
    assert!(cache.exists());

    // Offline second run is served from the fresh cache
    let second = RunOptions {
        rate_cache: Some(cache),
        ..RunOptions::default()
    };
    assert!((execute_run(&second).unwrap().exchange.rate - 0.88).abs() < f64::EPSILON);
}

#[test]
fn test_execute_run_explicit_rate_beats_fresh_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("rates.json");

    let seed = RunOptions {
        eur_rate: Some(0.93),
        rate_cache: Some(cache.clone()),
        ..RunOptions::default()
    };
    assert!((execute_run(&seed).unwrap().exchange.rate - 0.93).abs() < f64::EPSILON);

    let pinned = RunOptions {
        eur_rate: Some(0.5),
        rate_cache: Some(cache.clone()),
        ..RunOptions::default()
    };
    let report = execute_run(&pinned).unwrap();
    assert!((report.exchange.rate - 0.5).abs() < f64::EPSILON);
    assert!(!report.exchange.is_loading);

    // The pinned rate replaces the cached one
    let offline = RunOptions {
        rate_cache: Some(cache),
        ..RunOptions::default()
    };
    assert!((execute_run(&offline).unwrap().exchange.rate - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_execute_run_steep_learning_curve_to_2100() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "intervention:\n  kind: learning-curve\n  annual_cost_decline: 0.999999\ndefaults:\n  annual_budget: 10000000000.0\n  cost_per_kg: 5.61\n  start_year: 2020\n  end_year: 2100"
    )
    .unwrap();

    let options = RunOptions {
        config_path: Some(file.path().to_path_buf()),
        ..RunOptions::default()
    };
    let report = execute_run(&options).unwrap();
    assert_eq!(report.policy, "learning-curve");
    assert_eq!(report.projection.series.len(), 81);
    for point in &report.projection.series {
        assert!(point.net_inflow.is_finite(), "net_inflow@{}", point.year);
        assert!(point.cumulative_million_tons.is_finite());
    }
}

#[test]
fn test_execute_run_end_past_horizon() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "calibration:\n  max_projection_year: 2050\ndefaults:\n  annual_budget: 10000000000.0\n  cost_per_kg: 5.61\n  start_year: 2000\n  end_year: 2040"
    )
    .unwrap();

    let within = RunOptions {
        config_path: Some(file.path().to_path_buf()),
        end: Some(2050),
        ..RunOptions::default()
    };
    assert!(execute_run(&within).is_ok());

    let past = RunOptions {
        config_path: Some(file.path().to_path_buf()),
        end: Some(2100),
        ..RunOptions::default()
    };
    let err = execute_run(&past).unwrap_err();
    assert!(matches!(err, ProjectionError::Config { .. }));
    assert!(err.to_string().contains("projection horizon"));
}

#[test]
fn test_run_cli_exit_codes() {
    assert_eq!(
        run_cli(Args::parse_from(["plastisim", "version"])),
        ExitCode::SUCCESS
    );
    assert_eq!(
        run_cli(Args::parse_from(["plastisim", "scale", "cost", "50"])),
        ExitCode::SUCCESS
    );
    assert_eq!(
        run_cli(Args::parse_from(["plastisim", "run", "--json"])),
        ExitCode::SUCCESS
    );
    assert_eq!(
        run_cli(Args::parse_from([
            "plastisim", "run", "--start", "2030", "--end", "2020"
        ])),
        ExitCode::from(1)
    );
}

#[test]
fn test_scale_lookup() {
    let value = scale_lookup(ScaleKind::Budget, ScaleQuery::Position(50.0));
    assert!((value - 1e10).abs() < 1.0);
    let step = scale_lookup(ScaleKind::Cost, ScaleQuery::Value(1.0));
    assert!((step - 33.0).abs() < f64::EPSILON);
}

#[test]
fn test_scale_lookup_clamps_position() {
    let high = scale_lookup(ScaleKind::Budget, ScaleQuery::Position(150.0));
    assert!(high <= 1e12 + 1.0);
    assert!((high - 1e12).abs() < 1.0);
    let low = scale_lookup(ScaleKind::Cost, ScaleQuery::Position(-20.0));
    assert!((low - 0.1).abs() < 1e-9);
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_format_projection_table() {
    let report = execute_run(&RunOptions::default()).unwrap();
    let table = format_projection_table(&report);
    assert!(table.contains("Projection 1991-2035"));
    assert!(table.contains("policy flat-capacity"));
    assert!(table.contains("  1991"));
    assert!(table.contains("  2035"));
    assert!(table.contains("Ocean clean by:         not within horizon"));
}

#[test]
fn test_format_projection_table_zero_year() {
    let options = RunOptions {
        budget: Some(3e10),
        cost: Some(1.0),
        start: Some(2020),
        end: Some(2030),
        ..RunOptions::default()
    };
    let report = execute_run(&options).unwrap();
    let table = format_projection_table(&report);
    assert!(table.contains("Ocean clean by:         2039"));
}

#[test]
fn test_format_scale_result() {
    assert_eq!(
        format_scale_result(ScaleKind::Budget, ScaleQuery::Position(50.0), 1e10),
        "budget slider 50 -> 10000000000"
    );
    assert_eq!(
        format_scale_result(ScaleKind::Cost, ScaleQuery::Position(0.0), 0.1),
        "cost slider 0 -> 0.10"
    );
    assert_eq!(
        format_scale_result(ScaleKind::Cost, ScaleQuery::Value(1.0), 33.0),
        "cost 1 -> slider 33"
    );
}

#[test]
fn test_report_serializes_camel_case() {
    let report = execute_run(&RunOptions::default()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"costPerTonConverted\""));
    assert!(json.contains("\"zeroYear\":null"));
    assert!(json.contains("\"isLoading\":false"));
}
