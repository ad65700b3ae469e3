use springnet::{ScenarioConfig, Scenario, Snapshot};
use springnet::{bench_energy_drift, bench_lattice_step};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file; relative names are looked up in `scenarios/`
    #[arg(short, long, default_value = "hex_squeeze.yaml")]
    file: PathBuf,

    /// Where to write the simulated snapshot
    #[arg(short, long, default_value = "springnet.snap")]
    output: PathBuf,

    /// Run the benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file: &Path) -> Result<ScenarioConfig> {
    let config_path = if file.exists() {
        file.to_path_buf()
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file)
    };
    let handle = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(handle);
    let scenario_cfg: ScenarioConfig =
        serde_yaml::from_reader(reader).with_context(|| format!("parsing {}", config_path.display()))?;

    tracing::debug!(?scenario_cfg, "loaded scenario");

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_energy_drift()?;
        bench_lattice_step()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg).context("building scenario")?;

    let e0 = scenario.system.total_energy()?;
    scenario.run().context("simulation failed")?;
    let e1 = scenario.system.total_energy()?;
    tracing::info!(e0, e1, "energy before and after");

    Snapshot::capture(&scenario.system)
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "snapshot written");

    Ok(())
}
