//! Factory RTE - Entry Point
//!
//! Loads a scenario, runs the factory simulation for a number of ticks and
//! prints one line (or one JSON object) per tick.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use factory_rte::core::error::Result;
use factory_rte::simulation::{load_scenario, FactorySimulation, TickReport};

/// Factory lighting simulation driven by the runtime environment
#[derive(Parser, Debug)]
#[command(name = "factory-rte")]
#[command(about = "Run the factory lighting scenario tick by tick")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long, default_value = "data/scenarios/factory.toml")]
    scenario: PathBuf,

    /// Number of ticks (overrides the scenario)
    #[arg(long)]
    ticks: Option<u64>,

    /// Random seed (overrides the scenario)
    #[arg(long)]
    seed: Option<u64>,

    /// Print a text frame of the floor after every tick
    #[arg(long)]
    render: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One summary line per tick
    Text,
    /// One TickReport JSON object per line
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("factory_rte=info")),
        )
        .init();

    let args = Args::parse();

    let config = load_scenario(&args.scenario)?;
    let ticks = args.ticks.unwrap_or(config.simulation.ticks);
    let scenario = config.build()?;
    let seed = args.seed.unwrap_or(scenario.simulation.seed);

    tracing::info!("Running {} tick(s) with seed {}", ticks, seed);

    let mut simulation = FactorySimulation::with_seed(scenario, seed);
    simulation.set_render_frames(args.render);

    for _ in 0..ticks {
        let report = simulation.step()?;
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
            OutputFormat::Text => print_text(&report),
        }
    }

    tracing::info!("Done after {} tick(s)", simulation.current_tick());
    Ok(())
}

fn print_text(report: &TickReport) {
    println!(
        "tick {:>4}: {} human(s), {} instance(s), {} change(s), {} light(s) on, total illumination {:.1}",
        report.tick,
        report.humans.len(),
        report.pass.instances,
        report.pass.applied.len(),
        report.lit_actuators,
        report.total_illumination
    );
    for change in &report.pass.applied {
        println!(
            "    {} -> {} {:+.1} over {} actuator(s), region of {}",
            change.phenomenon,
            change.property,
            change.delta,
            change.actuator_count,
            change.region_size
        );
    }
    if let Some(frame) = &report.frame {
        println!("{}", frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_text() {
        let args = Args::try_parse_from(["factory-rte"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.scenario, PathBuf::from("data/scenarios/factory.toml"));
    }

    #[test]
    fn test_json_format_and_overrides() {
        let args =
            Args::try_parse_from(["factory-rte", "--format", "json", "--ticks", "3", "--seed", "9"])
                .unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.ticks, Some(3));
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["factory-rte", "--format", "yaml"]).is_err());
    }
}
