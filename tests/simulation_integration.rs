//! End-to-end run of the bundled factory scenario

use std::path::Path;

use factory_rte::simulation::{load_scenario, FactorySimulation};

fn bundled() -> FactorySimulation {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/scenarios/factory.toml");
    let scenario = load_scenario(&path).unwrap().build().unwrap();
    FactorySimulation::new(scenario)
}

#[test]
fn test_factory_run_is_deterministic() {
    let summarize = |mut sim: FactorySimulation| {
        sim.run(5)
            .unwrap()
            .into_iter()
            .map(|report| (report.humans, report.pass, report.lit_actuators))
            .collect::<Vec<_>>()
    };
    assert_eq!(summarize(bundled()), summarize(bundled()));
}

#[test]
fn test_factory_tick_leaves_floor_empty() {
    let mut sim = bundled();
    let report = sim.step().unwrap();

    // One human per context
    assert_eq!(report.humans.len(), 2);
    assert!(sim.humans().is_empty());
    assert!(report.lit_actuators <= sim.lights().len());
    assert!(report.total_illumination >= 0.0);
}

#[test]
fn test_reports_serialize_to_json() {
    let mut sim = bundled();
    sim.set_render_frames(true);
    let report = sim.step().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["tick"], 0);
    assert!(json["frame"].as_str().unwrap().contains('X'));
    assert!(json["pass"]["applied"].is_array());
}
