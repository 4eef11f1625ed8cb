//! vitalbench CLI - Command-line interface for vitalbench
//!
//! Commands:
//! - compare: Compare one value against the benchmark table
//! - report: Build a comparison report from stored measurements
//! - mock: Generate demo measurements
//! - validate: Validate a benchmark table file
//! - table: Print the benchmark table
//! - doctor: Diagnose installation and configuration

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use vitalbench::measurement::{self, MeasurementResponse};
use vitalbench::mock::MockDataGenerator;
use vitalbench::profile;
use vitalbench::{
    BenchmarkComparator, BenchmarkError, BenchmarkProcessor, BenchmarkTable, Gender, MetricType,
    PRODUCER_NAME, VITALBENCH_VERSION,
};

/// vitalbench - Compare personal health metrics against population benchmarks
#[derive(Parser)]
#[command(name = "vitalbench")]
#[command(author = "Synheart AI Inc")]
#[command(version = VITALBENCH_VERSION)]
#[command(
    about = "Compare health metrics against age-based population benchmarks",
    long_about = None
)]
struct Cli {
    /// Log level for diagnostic output (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one value against the benchmark table
    Compare {
        /// Metric type (e.g. RESTING_HEART_RATE, VO2_MAX, STEPS)
        #[arg(short, long)]
        metric: String,

        /// Measured value in the metric's unit
        #[arg(short, long, allow_negative_numbers = true)]
        value: f64,

        #[command(flatten)]
        age: AgeArgs,

        /// Prefer benchmarks for this gender
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,

        /// Load benchmarks from file instead of the built-in table
        #[arg(long)]
        benchmarks: Option<PathBuf>,
    },

    /// Build a comparison report from stored measurements
    Report {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        age: AgeArgs,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Prefer benchmarks for this gender
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,

        /// Load benchmarks from file instead of the built-in table
        #[arg(long)]
        benchmarks: Option<PathBuf>,
    },

    /// Generate a month of demo measurements
    Mock {
        /// Only generate this metric type
        #[arg(short, long, conflicts_with = "all")]
        metric: Option<String>,

        /// Generate every metric type (the default)
        #[arg(long)]
        all: bool,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Validate a benchmark table file
    Validate {
        /// Benchmark table file
        #[arg(long)]
        benchmarks: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the benchmark table
    Table {
        /// Load benchmarks from file instead of the built-in table
        #[arg(long)]
        benchmarks: Option<PathBuf>,

        /// Only print this metric type
        #[arg(short, long)]
        metric: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose installation and configuration
    Doctor {
        /// Check a benchmark table file
        #[arg(long)]
        benchmarks: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct AgeArgs {
    /// User age in whole years
    #[arg(long)]
    age: Option<u32>,

    /// User birth date (YYYY-MM-DD)
    #[arg(long)]
    birthdate: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    All,
}

impl From<GenderArg> for Gender {
    fn from(g: GenderArg) -> Self {
        match g {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::All => Gender::All,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one measurement per line)
    Ndjson,
    /// JSON array of measurements
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = CliError::from(e);
            eprintln!(
                "{}",
                serde_json::to_string(&error).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn run(command: Commands) -> Result<(), VbCliError> {
    match command {
        Commands::Compare {
            metric,
            value,
            age,
            gender,
            benchmarks,
        } => cmd_compare(&metric, value, &age, gender, benchmarks.as_deref()),

        Commands::Report {
            input,
            age,
            input_format,
            output_format,
            gender,
            benchmarks,
        } => cmd_report(
            &input,
            &age,
            input_format,
            output_format,
            gender,
            benchmarks.as_deref(),
        ),

        Commands::Mock {
            metric,
            all: _,
            output,
            output_format,
        } => cmd_mock(metric.as_deref(), &output, output_format),

        Commands::Validate { benchmarks, json } => cmd_validate(&benchmarks, json),

        Commands::Table {
            benchmarks,
            metric,
            json,
        } => cmd_table(benchmarks.as_deref(), metric.as_deref(), json),

        Commands::Doctor { benchmarks, json } => cmd_doctor(benchmarks.as_deref(), json),
    }
}

fn cmd_compare(
    metric: &str,
    value: f64,
    age: &AgeArgs,
    gender: Option<GenderArg>,
    benchmarks: Option<&Path>,
) -> Result<(), VbCliError> {
    let metric: MetricType = metric.parse()?;
    let age = resolve_age(age)?;
    let table = load_table(benchmarks)?;

    println!("{}", compare_output(&table, metric, value, age, gender.map(Gender::from))?);
    Ok(())
}

/// Comparison JSON, or `null` when no comparison is available
fn compare_output(
    table: &BenchmarkTable,
    metric: MetricType,
    value: f64,
    age: u32,
    gender: Option<Gender>,
) -> Result<String, serde_json::Error> {
    match BenchmarkComparator::new(table).try_compare(metric, value, age, gender) {
        Ok(comparison) => serde_json::to_string_pretty(&comparison),
        Err(reason) => {
            log::info!("No comparison available for {metric}: {}", reason.as_str());
            Ok("null".to_string())
        }
    }
}

fn cmd_report(
    input: &Path,
    age: &AgeArgs,
    input_format: InputFormat,
    output_format: OutputFormat,
    gender: Option<GenderArg>,
    benchmarks: Option<&Path>,
) -> Result<(), VbCliError> {
    let age = resolve_age(age)?;
    let input_data = read_input(input)?;

    let measurements = match input_format {
        InputFormat::Ndjson => measurement::parse_ndjson(&input_data)?,
        InputFormat::Json => measurement::parse_array(&input_data)?,
    };

    if measurements.is_empty() {
        return Err(VbCliError::NoMeasurements);
    }

    let mut processor = BenchmarkProcessor::with_table(Arc::new(load_table(benchmarks)?));
    if let Some(gender) = gender {
        processor = processor.with_gender(gender.into());
    }

    let report = processor.report(&measurements, age);
    log::info!(
        "Report for age {age}: {} of {} metrics available",
        report.entries.iter().filter(|e| e.comparison().is_some()).count(),
        report.entries.len()
    );

    let output = match output_format {
        OutputFormat::Ndjson => format_output(&report.entries, &OutputFormat::Ndjson)?,
        OutputFormat::Json => serde_json::to_string(&report)? + "\n",
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)? + "\n",
    };
    print!("{}", output);

    Ok(())
}

fn cmd_mock(
    metric: Option<&str>,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), VbCliError> {
    let generator = MockDataGenerator::default();
    let now = Utc::now();

    let measurements: Vec<MeasurementResponse> = match metric {
        Some(metric) => generator.generate(metric.parse()?, now),
        None => generator.generate_all(now),
    };

    let output_data = format_output(&measurements, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(benchmarks: &Path, json: bool) -> Result<(), VbCliError> {
    let content = fs::read_to_string(benchmarks)?;

    let report = match BenchmarkTable::from_json(&content) {
        Ok(table) => ValidationReport {
            file: benchmarks.display().to_string(),
            valid: true,
            metrics: table.len(),
            age_groups: table.metrics().map(|b| b.age_groups.len()).sum(),
            error: None,
        },
        Err(e) => ValidationReport {
            file: benchmarks.display().to_string(),
            valid: false,
            metrics: 0,
            age_groups: 0,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("File:       {}", report.file);
        println!("Valid:      {}", report.valid);
        println!("Metrics:    {}", report.metrics);
        println!("Age groups: {}", report.age_groups);

        if let Some(error) = &report.error {
            println!("\nError: {}", error);
        }
    }

    match report.error {
        Some(error) => Err(VbCliError::ValidationFailed(error)),
        None => Ok(()),
    }
}

fn cmd_table(
    benchmarks: Option<&Path>,
    metric: Option<&str>,
    json: bool,
) -> Result<(), VbCliError> {
    let table = load_table(benchmarks)?;
    let metric: Option<MetricType> = metric.map(str::parse::<MetricType>).transpose()?;

    let selected: Vec<_> = table
        .metrics()
        .filter(|b| metric.map_or(true, |m| b.metric_type == m))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    for benchmark in selected {
        println!("{} ({})", benchmark.metric_name, benchmark.gender.as_str());
        println!(
            "  {:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "age", "p10", "p25", "p50", "p75", "p90", "avg"
        );
        for group in &benchmark.age_groups {
            let p = &group.percentiles;
            println!(
                "  {:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
                group.age_group, p.p10, p.p25, p.p50, p.p75, p.p90, group.average, group.unit
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_doctor(benchmarks: Option<&Path>, json: bool) -> Result<(), VbCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "vitalbench_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("vitalbench version {}", VITALBENCH_VERSION),
    });

    let builtin = BenchmarkTable::builtin();
    let unsupported: Vec<&str> = MetricType::ALL
        .iter()
        .filter(|m| builtin.metric(**m).is_none())
        .map(|m| m.as_str())
        .collect();
    checks.push(DoctorCheck {
        name: "builtin_table".to_string(),
        status: CheckStatus::Ok,
        message: if unsupported.is_empty() {
            format!("{} metrics benchmarked", builtin.len())
        } else {
            format!(
                "{} metrics benchmarked (no benchmarks for {})",
                builtin.len(),
                unsupported.join(", ")
            )
        },
    });

    if let Some(path) = benchmarks {
        let check = if !path.exists() {
            DoctorCheck {
                name: "benchmarks".to_string(),
                status: CheckStatus::Warning,
                message: "Benchmarks file does not exist".to_string(),
            }
        } else {
            match fs::read_to_string(path) {
                Ok(content) => match BenchmarkTable::from_json(&content) {
                    Ok(table) => DoctorCheck {
                        name: "benchmarks".to_string(),
                        status: CheckStatus::Ok,
                        message: format!("Benchmarks file valid ({} metrics)", table.len()),
                    },
                    Err(e) => DoctorCheck {
                        name: "benchmarks".to_string(),
                        status: CheckStatus::Error,
                        message: e.to_string(),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "benchmarks".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read benchmarks file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (report --input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VITALBENCH_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("vitalbench Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(VbCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, VbCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_table(benchmarks: Option<&Path>) -> Result<BenchmarkTable, VbCliError> {
    match benchmarks {
        Some(path) => Ok(BenchmarkTable::from_json(&fs::read_to_string(path)?)?),
        None => Ok(BenchmarkTable::builtin()),
    }
}

fn resolve_age(args: &AgeArgs) -> Result<u32, VbCliError> {
    if let Some(age) = args.age {
        return Ok(age);
    }
    let birthdate = args.birthdate.as_deref().unwrap_or_default();
    profile::parse_birthdate(birthdate)?;
    profile::age_from_birthdate(birthdate)
        .ok_or_else(|| VbCliError::AgeOutOfRange(birthdate.to_string()))
}

fn format_output<T: Serialize>(records: &[T], format: &OutputFormat) -> Result<String, VbCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)? + "\n"),
    }
}

// Error types

#[derive(Debug)]
enum VbCliError {
    Io(io::Error),
    Benchmark(BenchmarkError),
    Json(serde_json::Error),
    AgeOutOfRange(String),
    NoMeasurements,
    ValidationFailed(String),
    DoctorFailed,
}

impl From<io::Error> for VbCliError {
    fn from(e: io::Error) -> Self {
        VbCliError::Io(e)
    }
}

impl From<BenchmarkError> for VbCliError {
    fn from(e: BenchmarkError) -> Self {
        VbCliError::Benchmark(e)
    }
}

impl From<serde_json::Error> for VbCliError {
    fn from(e: serde_json::Error) -> Self {
        VbCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<VbCliError> for CliError {
    fn from(e: VbCliError) -> Self {
        match e {
            VbCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            VbCliError::Benchmark(e) => {
                let hint = match &e {
                    BenchmarkError::UnknownMetric(_) => {
                        "Use one of HEART_RATE, RESTING_HEART_RATE, VO2_MAX, STEPS"
                    }
                    BenchmarkError::InvalidBenchmark(_) => "Run 'vitalbench validate' for details",
                    BenchmarkError::InvalidBirthdate(_) => "Use the YYYY-MM-DD format",
                    _ => "Check input format",
                };
                CliError {
                    code: "BENCHMARK_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            VbCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            VbCliError::AgeOutOfRange(birthdate) => CliError {
                code: "INVALID_AGE".to_string(),
                message: format!("Birth date {} gives an implausible age", birthdate),
                hint: Some("Birth date must be in the past and within 150 years".to_string()),
            },
            VbCliError::NoMeasurements => CliError {
                code: "NO_MEASUREMENTS".to_string(),
                message: "No measurements found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            VbCliError::ValidationFailed(error) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: error,
                hint: Some("Fix the benchmark table and retry".to_string()),
            },
            VbCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct ValidationReport {
    file: String,
    valid: bool,
    metrics: usize,
    age_groups: usize,
    error: Option<String>,
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
