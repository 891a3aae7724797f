//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::adapters::csv_adapter::CsvSeriesAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::calculation::CalculationDefinition;
use crate::domain::config_validation::{
    build_engine_config, configured_output_type, validate_engine_config,
};
use crate::domain::engine::Engine;
use crate::domain::error::{EconcalcError, ErrorReport};
use crate::domain::formatter::{Output, OutputType};
use crate::domain::function::FunctionRegistry;
use crate::ports::config_port::ConfigPort;
use crate::ports::series_port::SeriesResolver;

const DEFAULT_DATA_DIR: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "econcalc", about = "Economic indicator formula engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a formula against CSV series data
    Eval {
        #[arg(short, long)]
        formula: String,
        /// Declared output shape; overrides `[engine] output_type`
        #[arg(short = 't', long)]
        output_type: Option<OutputType>,
        /// Directory of `<NAME>.csv` files; overrides `[data] dir`
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Date for a scalar wrapped as a series (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Parse a formula without evaluating it
    Check {
        #[arg(short, long)]
        formula: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the available functions
    Functions,
    /// List the series found in the data directory
    Series {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Eval {
            formula,
            output_type,
            data_dir,
            config,
            as_of,
        } => run_eval(
            &formula,
            output_type,
            data_dir.as_deref(),
            config.as_deref(),
            as_of,
        ),
        Command::Check { formula, config } => run_check(&formula, config.as_deref()),
        Command::Functions => run_functions(),
        Command::Series { data_dir, config } => {
            run_list_series(data_dir.as_deref(), config.as_deref())
        }
    }
}

/// Load and validate the INI file at `path`, or an empty config when none is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, EconcalcError> {
    let adapter = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_engine_config(&adapter)?;
    Ok(adapter)
}

/// Data directory: the command-line value wins over `[data] dir`.
pub fn resolve_data_dir(config: &dyn ConfigPort, cli_dir: Option<&Path>) -> PathBuf {
    match cli_dir {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(
            config
                .get_string("data", "dir")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        ),
    }
}

/// Parse, resolve and evaluate one formula.
pub fn evaluate_formula(
    engine: &Engine,
    formula: &str,
    output_type: OutputType,
    resolver: &dyn SeriesResolver,
    as_of: NaiveDate,
) -> Result<Output, EconcalcError> {
    let definition = CalculationDefinition::new(engine, formula, output_type)?;
    definition.evaluate(engine, resolver, as_of)
}

fn report_error(err: &EconcalcError, formula: &str) -> ExitCode {
    match err {
        EconcalcError::Engine(e) => {
            match serde_json::to_string(&ErrorReport::from(e)) {
                Ok(json) => println!("{json}"),
                Err(json_err) => eprintln!("error: failed to serialize error: {json_err}"),
            }
            eprintln!("{}", e.display_with_context(formula));
        }
        other => eprintln!("error: {other}"),
    }
    ExitCode::from(err)
}

fn eval_command(
    formula: &str,
    output_type: Option<OutputType>,
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> Result<Output, EconcalcError> {
    let config = load_config(config_path)?;
    let engine = Engine::new(build_engine_config(&config)?);
    let output_type = match output_type {
        Some(t) => t,
        None => configured_output_type(&config)?,
    };
    let resolver = CsvSeriesAdapter::new(resolve_data_dir(&config, data_dir));
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    evaluate_formula(&engine, formula, output_type, &resolver, as_of)
}

fn run_eval(
    formula: &str,
    output_type: Option<OutputType>,
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> ExitCode {
    let result = eval_command(formula, output_type, data_dir, config_path, as_of);

    match result {
        Ok(output) => match serde_json::to_string(&output) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize output: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => report_error(&e, formula),
    }
}

fn run_check(formula: &str, config_path: Option<&Path>) -> ExitCode {
    let engine = match load_config(config_path).and_then(|c| build_engine_config(&c)) {
        Ok(config) => Engine::new(config),
        Err(e) => return report_error(&e, formula),
    };

    match engine.parse(formula) {
        Ok(node) => {
            let refs: Vec<String> = node.series_refs().into_iter().collect();
            println!("formula: {node}");
            println!("nodes:   {}", node.node_count());
            if refs.is_empty() {
                println!("series:  (none)");
            } else {
                println!("series:  {}", refs.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&EconcalcError::Engine(e), formula),
    }
}

fn run_functions() -> ExitCode {
    for function in FunctionRegistry::builtin().functions() {
        println!("{:<40} {}", function.signature(), function.summary());
    }
    ExitCode::SUCCESS
}

fn run_list_series(data_dir: Option<&Path>, config_path: Option<&Path>) -> ExitCode {
    let result = load_config(config_path).and_then(|config| {
        CsvSeriesAdapter::new(resolve_data_dir(&config, data_dir)).list_series()
    });
    match result {
        Ok(names) => {
            for name in names {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_eval() {
        let cli = Cli::try_parse_from([
            "econcalc",
            "eval",
            "--formula",
            "ROC(GDP_US, 4)",
            "--output-type",
            "scalar",
            "--as-of",
            "2024-03-31",
        ])
        .unwrap();
        match cli.command {
            Command::Eval {
                formula,
                output_type,
                as_of,
                data_dir,
                config,
            } => {
                assert_eq!(formula, "ROC(GDP_US, 4)");
                assert_eq!(output_type, Some(OutputType::Scalar));
                assert_eq!(as_of, NaiveDate::from_ymd_opt(2024, 3, 31));
                assert!(data_dir.is_none());
                assert!(config.is_none());
            }
            other => panic!("expected eval, got {:?}", other),
        }
    }

    #[test]
    fn cli_rejects_bad_output_type() {
        let result = Cli::try_parse_from([
            "econcalc",
            "eval",
            "--formula",
            "1",
            "--output-type",
            "table",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_check_and_functions() {
        let cli = Cli::try_parse_from(["econcalc", "check", "-f", "1 + 2"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
        let cli = Cli::try_parse_from(["econcalc", "functions"]).unwrap();
        assert!(matches!(cli.command, Command::Functions));
    }

    #[test]
    fn data_dir_prefers_command_line() {
        let config = FileConfigAdapter::from_string("[data]\ndir = /srv/series\n").unwrap();
        assert_eq!(
            resolve_data_dir(&config, Some(Path::new("/tmp/x"))),
            PathBuf::from("/tmp/x")
        );
        assert_eq!(resolve_data_dir(&config, None), PathBuf::from("/srv/series"));
        assert_eq!(
            resolve_data_dir(&FileConfigAdapter::empty(), None),
            PathBuf::from(".")
        );
    }

    #[test]
    fn load_config_without_path_is_default() {
        let config = load_config(None).unwrap();
        assert_eq!(build_engine_config(&config).unwrap().max_nodes, 500);
    }
}
