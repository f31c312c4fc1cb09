//! Command-line driver (§6): runs every query in a scenario file against its
//! mesh and writes one output file per scenario.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use polysphere::mesh::{parse_sph, Mesh};
use polysphere::{parse_scenarios, search, Scenario, SearchOutcome};

/// Finds shortest any-angle paths across a polygon-mesh-constrained sphere.
#[derive(Parser, Debug)]
#[command(name = "polysphere", version, about)]
struct Cli {
    /// Scenario file listing the queries to run.
    scenario_file: PathBuf,

    /// Directory output files are written to.
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Name output files `out/<idx>.txt` instead of `out/<mapName>_<label>.txt`.
    #[arg(long)]
    indexed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let scenarios = parse_scenarios(&cli.scenario_file)
        .with_context(|| format!("reading scenario file {}", cli.scenario_file.display()))?;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    let mut meshes: HashMap<PathBuf, Mesh> = HashMap::new();
    let mut failures = 0usize;

    for (idx, scenario) in scenarios.iter().enumerate() {
        if let Err(err) = run_one(&cli, idx, scenario, &mut meshes) {
            tracing::error!(scenario = scenario.label, error = %err, "scenario failed");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} scenarios failed", failures, scenarios.len());
    }
    Ok(())
}

fn run_one(
    cli: &Cli,
    idx: usize,
    scenario: &Scenario,
    meshes: &mut HashMap<PathBuf, Mesh>,
) -> Result<()> {
    if !meshes.contains_key(&scenario.map_path) {
        let mesh = parse_sph(&scenario.map_path)
            .with_context(|| format!("loading mesh {}", scenario.map_path.display()))?;
        meshes.insert(scenario.map_path.clone(), mesh);
    }
    let mesh = &meshes[&scenario.map_path];

    let outcome = search(mesh, scenario.start, scenario.end)
        .with_context(|| format!("searching scenario {}", scenario.label))?;

    let out_path = output_path(cli, idx, scenario);
    let body = match outcome {
        SearchOutcome::Path { points, length } => {
            tracing::info!(scenario = scenario.label, points = points.len(), %length, "path found");
            points
                .iter()
                .map(|p| format!("{} {}", p.lat(), p.lon()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        SearchOutcome::NoPath => {
            tracing::info!(scenario = scenario.label, "no path found");
            String::new()
        }
    };
    fs::write(&out_path, body).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(())
}

fn output_path(cli: &Cli, idx: usize, scenario: &Scenario) -> PathBuf {
    if cli.indexed {
        cli.out_dir.join(format!("{}.txt", idx))
    } else {
        let map_name = map_name(&scenario.map_path);
        cli.out_dir.join(format!("{}_{}.txt", map_name, scenario.label))
    }
}

fn map_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
