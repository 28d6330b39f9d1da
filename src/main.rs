//! CLI entry point — scenario loading, simulation run, report printing.

use std::path::Path;
use std::process;

use bess_apm_sim::config::ScenarioConfig;
use bess_apm_sim::io::export::export_csv;
use bess_apm_sim::sim::monte_carlo::run_simulation;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    iterations_override: Option<usize>,
    out_path: Option<String>,
}

fn print_help() {
    eprintln!("bess-apm-sim — Monte Carlo ROI analysis of APM platforms for BESS assets");
    eprintln!();
    eprintln!("Usage: bess-apm-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in APM tier (basic, advanced, enterprise, no_apm)");
    eprintln!("  --seed <u64>          Override random seed");
    eprintln!("  --iterations <n>      Override iteration count");
    eprintln!("  --out <path>          Export per-iteration results to CSV");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the advanced tier is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        iterations_override: None,
        out_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--iterations" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --iterations requires a count argument");
                    process::exit(1);
                }
                if let Ok(n) = args[i].parse::<usize>() {
                    cli.iterations_override = Some(n);
                } else {
                    eprintln!(
                        "error: --iterations value \"{}\" is not a valid count",
                        args[i]
                    );
                    process::exit(1);
                }
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out_path = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then defaults
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(iterations) = cli.iterations_override {
        scenario.simulation.iterations = iterations;
    }

    // Validate and build core inputs
    let (asset, market, apm_spec, params) = match scenario.build() {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Run
    let results = match run_simulation(&asset, &market, &apm_spec, &params) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    // Print the comparative report
    println!("{results}");

    // Export CSV if requested
    if let Some(ref path) = cli.out_path {
        if let Err(e) = export_csv(&results.trials, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }
}
