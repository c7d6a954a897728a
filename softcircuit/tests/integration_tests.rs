//! Integration tests for the SoftCircuit library

use softcircuit::prelude::*;
use softcircuit::{load_snapshot, save_snapshot, ConnectionId};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> CircuitSimulator {
    load_snapshot(&fixture_path(name), SimulatorOptions::default())
        .expect("fixture should load")
}

#[test]
fn test_closed_loop_lights_led() {
    let sim = load("battery_led_loop.json");
    let report = sim.last_report();

    assert!(report.powered);
    assert!(report.is_lit(&"1712345678002".into()));
    assert_eq!(report.energized.len(), 2);
    assert_eq!(report.closed_loops, 1);
}

#[test]
fn test_button_blocks_until_pressed() {
    let mut sim = load("button_switch.json");
    let led: ComponentId = "led-1".into();

    let only_tape: Vec<ConnectionId> = vec!["battery-1:positive->button-1:input".into()];
    assert!(!sim.last_report().is_lit(&led));
    assert_eq!(sim.last_report().energized, only_tape);

    sim.toggle(&"button-1".into()).expect("button toggles");
    assert!(sim.last_report().is_lit(&led));
    assert!(sim.last_report().has_closed_loop());

    sim.toggle(&"button-1".into()).expect("button toggles back");
    assert!(!sim.last_report().is_lit(&led));
}

#[test]
fn test_unpowered_snapshot_is_dark() {
    let sim = load("unpowered.json");

    assert!(!sim.last_report().powered);
    // The LED was saved as on; propagation overrides it
    assert!(sim.graph().components().all(|c| c.kind != ComponentKind::Led || !c.is_on()));
    assert!(sim.graph().connections().all(|c| !c.energized));
}

#[test]
fn test_wiring_cycle_terminates() {
    let sim = load("resistor_cycle.json");
    let report = sim.last_report();

    assert_eq!(report.visited, 5);
    assert!(report.is_lit(&"led".into()));
    assert_eq!(report.closed_loops, 1);
}

#[test]
fn test_deleting_component_disconnects_neighbors() {
    let mut sim = load("resistor_cycle.json");

    sim.remove_component(&"r2".into()).expect("r2 exists");
    let report = sim.last_report();

    assert!(!report.is_lit(&"led".into()));
    assert_eq!(sim.graph().connection_count(), 2);
    assert!(sim.graph().connections().all(|c| c.from.as_str() != "r2" && c.to.as_str() != "r2"));
}

#[test]
fn test_failed_load_reports_error() {
    let result = load_snapshot(&fixture_path("does_not_exist.json"), SimulatorOptions::default());
    assert!(matches!(result, Err(SoftCircuitError::Io(_))));

    let result = load_snapshot(&fixture_path("malformed.json"), SimulatorOptions::default());
    assert!(matches!(
        result,
        Err(SoftCircuitError::Snapshot(SnapshotError::Malformed(_)))
    ));
}

#[test]
fn test_save_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.json");

    let original = load("button_switch.json");
    save_snapshot(&original, &path).expect("save");
    let copy = load_snapshot(&path, SimulatorOptions::default()).expect("reload");

    assert_eq!(original.stats(), copy.stats());
    assert_eq!(original.canvas(), copy.canvas());
    assert_eq!(original.last_report(), copy.last_report());
}

#[test]
fn test_build_circuit_from_scratch() {
    let mut sim = CircuitSimulator::default();
    let mut session = EditorSession::new();

    let battery = match session
        .drop_item(&mut sim, "battery", Position::new(10.0, 10.0))
        .unwrap()
    {
        softcircuit::DropOutcome::Placed(c) => c,
        other => panic!("unexpected {:?}", other),
    };
    let resistor = sim.place_component("resistor", Position::new(60.0, 10.0)).unwrap();
    let led = sim.place_component("led", Position::new(110.0, 10.0)).unwrap();

    session.toggle_tool(ConnectionKind::Thread);
    for (a, b) in [
        (TerminalRef::new(battery.id.clone(), "positive"), TerminalRef::new(resistor.id.clone(), "terminal1")),
        (TerminalRef::new(resistor.id.clone(), "terminal2"), TerminalRef::new(led.id.clone(), "anode")),
        (TerminalRef::new(led.id.clone(), "cathode"), TerminalRef::new(battery.id.clone(), "negative")),
    ] {
        session.click_terminal(&mut sim, a).unwrap();
        session.click_terminal(&mut sim, b).unwrap();
    }
    session.toggle_tool(ConnectionKind::Thread);

    session.click_component(&mut sim, &battery.id).unwrap();
    let report = sim.last_report();
    assert!(report.is_lit(&led.id));
    assert_eq!(report.energized.len(), 3);
    assert_eq!(report.closed_loops, 1);
}
