//! Tests for current propagation rules

use softcircuit::prelude::*;
use softcircuit::{CircuitGraph, ConnectionId};

fn place(graph: &mut CircuitGraph, kind: ComponentKind) -> ComponentId {
    graph.add_component(kind, Position::default()).id.clone()
}

fn wire(
    graph: &mut CircuitGraph,
    from: &ComponentId,
    from_terminal: &str,
    to: &ComponentId,
    to_terminal: &str,
) -> ConnectionId {
    graph
        .add_connection(from, from_terminal, to, to_terminal, ConnectionKind::Thread)
        .expect("valid connection")
        .id
        .clone()
}

/// A ladder of LEDs in parallel behind one button.
fn ladder(graph: &mut CircuitGraph, rungs: usize) -> (ComponentId, ComponentId, Vec<ComponentId>) {
    let battery = place(graph, ComponentKind::Battery);
    let button = place(graph, ComponentKind::Button);
    wire(graph, &battery, "positive", &button, "input");

    let leds = (0..rungs)
        .map(|_| {
            let resistor = place(graph, ComponentKind::Resistor);
            let led = place(graph, ComponentKind::Led);
            wire(graph, &button, "output", &resistor, "terminal1");
            wire(graph, &resistor, "terminal2", &led, "anode");
            wire(graph, &led, "cathode", &battery, "negative");
            led
        })
        .collect();

    (battery, button, leds)
}

#[test]
fn test_no_live_battery_means_no_output() {
    let mut graph = CircuitGraph::new();
    let (_, button, _) = ladder(&mut graph, 4);
    graph.toggle_state(&button).unwrap();

    for _ in 0..2 {
        let report = graph.propagate();
        assert!(!report.powered);
        assert!(graph.components().all(|c| c.kind != ComponentKind::Led || !c.is_on()));
        assert!(graph.connections().all(|c| !c.energized));
    }
}

#[test]
fn test_parallel_rungs_all_light() {
    let mut graph = CircuitGraph::new();
    let (battery, button, leds) = ladder(&mut graph, 5);
    graph.toggle_state(&battery).unwrap();

    let report = graph.propagate();
    assert!(report.lit_leds.is_empty());
    assert_eq!(report.energized.len(), 1);

    graph.toggle_state(&button).unwrap();
    let report = graph.propagate();
    assert_eq!(report.lit_leds, leds);
    assert_eq!(report.closed_loops, 5);
    assert_eq!(report.energized.len(), graph.connection_count());
}

#[test]
fn test_each_connection_visited_once() {
    let mut graph = CircuitGraph::new();
    let (battery, button, _) = ladder(&mut graph, 3);
    graph.toggle_state(&battery).unwrap();
    graph.toggle_state(&button).unwrap();

    let report = graph.propagate();
    assert_eq!(report.visited, graph.connection_count());
}

#[test]
fn test_led_in_series_passes_current_on() {
    let mut graph = CircuitGraph::new();
    let battery = place(&mut graph, ComponentKind::Battery);
    let first = place(&mut graph, ComponentKind::Led);
    let second = place(&mut graph, ComponentKind::Led);
    wire(&mut graph, &battery, "positive", &first, "anode");
    wire(&mut graph, &first, "cathode", &second, "anode");
    graph.toggle_state(&battery).unwrap();

    let report = graph.propagate();
    assert!(report.is_lit(&first));
    assert!(report.is_lit(&second));
}

#[test]
fn test_removed_connection_breaks_path() {
    let mut graph = CircuitGraph::new();
    let battery = place(&mut graph, ComponentKind::Battery);
    let resistor = place(&mut graph, ComponentKind::Resistor);
    let led = place(&mut graph, ComponentKind::Led);
    wire(&mut graph, &battery, "positive", &resistor, "terminal2");
    let link = wire(&mut graph, &resistor, "terminal1", &led, "anode");
    graph.toggle_state(&battery).unwrap();
    assert!(graph.propagate().is_lit(&led));

    graph.remove_connection(&link).expect("link exists");
    assert!(!graph.propagate().is_lit(&led));
    assert!(graph.remove_connection(&link).is_none());
}

#[test]
fn test_current_flows_against_drawn_direction() {
    let mut graph = CircuitGraph::new();
    let battery = place(&mut graph, ComponentKind::Battery);
    let resistor = place(&mut graph, ComponentKind::Resistor);
    let led = place(&mut graph, ComponentKind::Led);
    // Drawn from the resistor towards the battery; still conducts
    wire(&mut graph, &resistor, "terminal1", &battery, "positive");
    wire(&mut graph, &led, "anode", &resistor, "terminal2");
    graph.toggle_state(&battery).unwrap();

    assert!(graph.propagate().is_lit(&led));
}
