use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use transport_model::{ReportOptions, SolveError, TransportData, TransportModel, datasets};
use transport_solver::{MAX_TOLERANCE, Solver};

#[derive(Parser)]
#[command(name = "transport")]
#[command(about = "Build and solve minimum-cost transportation problems", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem and print the optimal shipping plan
    Solve {
        #[command(flatten)]
        source: Source,
        /// Print the dual value of every constraint
        #[arg(short, long)]
        duals: bool,
        /// Also list routes that carry nothing
        #[arg(long)]
        all_routes: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Maximum simplex pivots per phase
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
        /// Floating point tolerance of the solver, in (0, 1e-3]
        #[arg(long, default_value_t = 1e-9, value_parser = parse_tolerance)]
        tolerance: f64,
    },
    /// Print the sets, parameters, constraints and objective of a problem
    Show {
        #[command(flatten)]
        source: Source,
    },
    /// Check a problem file for errors
    Check {
        /// The JSON file to check
        file: PathBuf,
    },
}

#[derive(Args)]
struct Source {
    /// JSON problem file; the built-in dataset is used when omitted
    file: Option<PathBuf>,
    /// Built-in dataset (tutorial, two-by-two)
    #[arg(long, default_value = "tutorial")]
    dataset: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            source,
            duals,
            all_routes,
            format,
            max_iterations,
            tolerance,
        } => {
            let model = build_model(&source);
            let solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance);
            info!(
                max_iterations = solver.max_iterations(),
                tolerance = solver.tolerance(),
                "solving"
            );

            match model.solve_with(&solver) {
                Ok(plan) => {
                    if format == Format::Json {
                        if let Err(e) = print_json(&plan, &mut std::io::stdout().lock()) {
                            eprintln!("Error: cannot serialize plan: {}", e);
                            std::process::exit(1);
                        }
                    } else {
                        let options = ReportOptions {
                            show_duals: duals,
                            show_zero_routes: all_routes,
                        };
                        let mut stdout = std::io::stdout().lock();
                        if let Err(e) = transport_model::write_plan(&model, &plan, &options, &mut stdout) {
                            eprintln!("Error writing report: {}", e);
                            std::process::exit(1);
                        }
                    }
                }
                Err(e) => {
                    if format == Format::Json {
                        if let Err(io) = print_json(&failure_json(&e), &mut std::io::stdout().lock()) {
                            eprintln!("Error: cannot serialize result: {}", io);
                        }
                    } else {
                        let mut stdout = std::io::stdout().lock();
                        if let Err(io) = transport_model::write_failure(&e, &mut stdout) {
                            eprintln!("Error writing report: {}", io);
                        }
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Show { source } => {
            let model = build_model(&source);
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = transport_model::write_model(&model, &mut stdout) {
                eprintln!("Error writing model: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let data = read_data(&file);
            match TransportModel::build(data) {
                Ok(model) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} facilities", model.supply().len());
                    println!("  {} warehouses", model.demand().len());
                    println!("  {} routes", model.routes().len());
                    println!("  total supply {}", transport_model::report::format_amount(model.total_supply()));
                    println!("  total demand {}", transport_model::report::format_amount(model.total_demand()));
                    if model.total_supply() < model.total_demand() {
                        println!("  warning: supply is below demand, the problem is infeasible");
                    }
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value.is_finite() && value > 0.0 && value <= MAX_TOLERANCE {
        Ok(value)
    } else {
        Err(format!("must be a number in (0, {}]", MAX_TOLERANCE))
    }
}

/// Serialize `value` in full before writing, so a failure leaves `out` untouched
fn print_json(value: &impl Serialize, out: &mut impl Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", json)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_model(source: &Source) -> TransportModel {
    let data = match &source.file {
        Some(path) => read_data(path),
        None => match datasets::by_name(&source.dataset) {
            Some(data) => data,
            None => {
                eprintln!(
                    "Error: unknown dataset '{}' (expected one of: {})",
                    source.dataset,
                    datasets::NAMES.join(", ")
                );
                std::process::exit(1);
            }
        },
    };

    match TransportModel::build(data) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Model error: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_data(path: &Path) -> TransportData {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn failure_json(error: &SolveError) -> serde_json::Value {
    let status = match error {
        SolveError::Infeasible { .. } => "infeasible",
        SolveError::Unbounded => "unbounded",
        SolveError::Solver { .. } => "error",
    };
    let violations: Vec<&str> = match error {
        SolveError::Infeasible { violations } => violations.iter().map(|v| v.description.as_str()).collect(),
        _ => Vec::new(),
    };
    serde_json::json!({
        "status": status,
        "message": error.to_string(),
        "violations": violations,
    })
}
