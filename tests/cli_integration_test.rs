//! CLI integration tests for config loading and formula evaluation over CSV files.
//!
//! Tests cover:
//! - Config loading and validation from real INI files on disk
//! - Data directory and output type precedence
//! - Full eval pipeline with CsvSeriesAdapter over a temp directory
//! - Exit status mapping for each error category

mod common;

use common::*;
use econcalc::adapters::csv_adapter::CsvSeriesAdapter;
use econcalc::cli::{self, Cli};
use econcalc::domain::config_validation::{build_engine_config, configured_output_type};
use econcalc::domain::engine::Engine;
use econcalc::domain::error::{EconcalcError, ErrorKind};
use econcalc::domain::formatter::{Output, OutputType};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut gdp = String::from("date,value\n");
    for month in 1..=10 {
        gdp.push_str(&format!("2023-{:02}-01,{}\n", month, 99 + month));
    }
    fs::write(dir.path().join("GDP_US.csv"), gdp).unwrap();
    fs::write(
        dir.path().join("unemployment_us.csv"),
        "date,value\n2023-01-01,4.0\n2023-02-01,3.8\n2023-03-01,\n2023-04-01,3.5\n",
    )
    .unwrap();
    dir
}

fn eval(formula: &str, dir: &Path, output_type: OutputType) -> Result<Output, EconcalcError> {
    let resolver = CsvSeriesAdapter::new(dir.to_path_buf());
    cli::evaluate_formula(
        &Engine::default(),
        formula,
        output_type,
        &resolver,
        date(2024, 1, 1),
    )
}

fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}

const VALID_INI: &str = r#"
[engine]
max_nodes = 50
output_type = scalar

[data]
dir = /srv/econcalc/series
"#;

mod config_loading {
    use super::*;

    #[test]
    fn valid_file_is_loaded() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(Some(file.path())).unwrap();
        assert_eq!(build_engine_config(&config).unwrap().max_nodes, 50);
        assert_eq!(configured_output_type(&config).unwrap(), OutputType::Scalar);
        assert_eq!(
            cli::resolve_data_dir(&config, None),
            Path::new("/srv/econcalc/series")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_temp_ini("[engine]\nmax_nodes = -3\n");
        let err = cli::load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, EconcalcError::ConfigInvalid { ref key, .. } if key == "max_nodes"));
        assert_eq!(err.exit_status(), 2);

        let file = write_temp_ini("[engine]\noutput_type = chart\n");
        let err = cli::load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, EconcalcError::ConfigInvalid { ref key, .. } if key == "output_type"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = cli::load_config(Some(Path::new("/nonexistent/econcalc.ini"))).unwrap_err();
        assert!(matches!(err, EconcalcError::ConfigParse { .. }));
    }
}

mod evaluation {
    use super::*;

    #[test]
    fn roc_from_csv() {
        let dir = data_dir();
        let out = eval("ROC(gdp_us, 4)", dir.path(), OutputType::Series).unwrap();
        let Output::Series { points } = out else {
            panic!("expected a series");
        };
        assert_eq!(points.len(), 10);
        assert!(points[..4].iter().all(|(_, v)| v.is_none()));
        assert_eq!(points[4], (date(2023, 5, 1), Some(4.0)));
    }

    #[test]
    fn correlation_over_shared_dates() {
        let dir = data_dir();
        let out = eval(
            "CORRELATION(GDP_US, UNEMPLOYMENT_US)",
            dir.path(),
            OutputType::Scalar,
        )
        .unwrap();
        let Output::Scalar { value } = out else {
            panic!("expected a scalar");
        };
        // three shared non-null months, GDP rising while unemployment falls
        assert!(value < -0.9);
    }

    #[test]
    fn json_output() {
        let dir = data_dir();
        let out = eval("COUNT(UNEMPLOYMENT_US)", dir.path(), OutputType::Series).unwrap();
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"kind":"series","points":[["2024-01-01",3.0]]}"#
        );
    }

    #[test]
    fn missing_file_is_a_reference_error() {
        let dir = data_dir();
        let err = eval("SUM(CPI_US)", dir.path(), OutputType::Scalar).unwrap_err();
        match err {
            EconcalcError::Engine(e) => assert_eq!(e.kind(), ErrorKind::ReferenceError),
            other => panic!("expected engine error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_csv_is_a_data_error() {
        let dir = data_dir();
        fs::write(
            dir.path().join("BROKEN.csv"),
            "date,value\n2023-01-01,1\n2023-01-01,2\n",
        )
        .unwrap();
        let err = eval("SUM(BROKEN)", dir.path(), OutputType::Scalar).unwrap_err();
        assert!(matches!(err, EconcalcError::Data { .. }));
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn syntax_errors_exit_with_four() {
        let dir = data_dir();
        let err = eval("ROC(GDP_US, 4", dir.path(), OutputType::Series).unwrap_err();
        assert_eq!(err.exit_status(), 4);

        let err = eval("AVG(GDP_US) / 0", dir.path(), OutputType::Scalar).unwrap_err();
        assert_eq!(err.exit_status(), 5);
    }
}

mod commands {
    use super::*;

    #[test]
    fn eval_command_succeeds() {
        let dir = data_dir();
        let dir_arg = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "econcalc",
            "eval",
            "--formula",
            "MA(GDP_US, 3)",
            "--data-dir",
            dir_arg,
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
    }

    #[test]
    fn eval_command_reports_failures() {
        let dir = data_dir();
        let dir_arg = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "econcalc",
            "eval",
            "--formula",
            "SUM(",
            "--data-dir",
            dir_arg,
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(4)));
    }

    #[test]
    fn config_ceiling_applies_to_eval() {
        let dir = data_dir();
        let file = write_temp_ini("[engine]\nmax_nodes = 3\n");
        let cli = Cli::try_parse_from([
            "econcalc",
            "eval",
            "-f",
            "SUM(GDP_US) + SUM(GDP_US)",
            "-d",
            dir.path().to_str().unwrap(),
            "-c",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(5)));
    }

    #[test]
    fn check_and_functions_succeed() {
        let cli = Cli::try_parse_from(["econcalc", "check", "--formula", "ROC(GDP_US, 4) * 2"])
            .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));

        let cli = Cli::try_parse_from(["econcalc", "functions"]).unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
    }

    #[test]
    fn series_command_lists_data_dir() {
        let dir = data_dir();
        let cli = Cli::try_parse_from([
            "econcalc",
            "series",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));

        let cli = Cli::try_parse_from(["econcalc", "series", "-d", "/nonexistent/series"]).unwrap();
        assert!(same_code(cli::run(cli), ExitCode::from(3)));
    }
}
