//! Propagation Engine
//!
//! Recomputes every LED state and every connection's `energized` flag from
//! scratch. Current is traced depth-first from the positive terminal of each
//! battery that is on; each component's conduction rule decides whether it
//! continues and from which terminal.
//!
//! The pass is idempotent and cannot fail. A visited set shared by all
//! sources guarantees every connection is walked at most once per pass, so
//! wiring cycles terminate. No voltages, currents or resistances are
//! computed; an LED lights as soon as current reaches its anode.
//!
//! Terminals are not nets. Once current enters a component, only the
//! connections on the exit terminal its rule names are followed. Other
//! wires sewn onto the entry terminal are reached only if current arrives
//! through them, so an LED branching off a resistor's entry terminal stays
//! dark unless another path feeds its anode.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashSet;

use super::graph::CircuitGraph;
use super::schema::*;
use crate::catalog::{ComponentKind, Conduction};

/// Outcome of one propagation pass.
///
/// The authoritative results stay on the instances; this is a summary for
/// callers that only need to know what changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropagationReport {
    /// At least one battery is on
    pub powered: bool,
    /// LEDs lit by this pass, in placement order
    pub lit_leds: Vec<ComponentId>,
    /// Energized connections, in creation order
    pub energized: Vec<ConnectionId>,
    /// Traces that arrived back at the negative terminal of a live battery
    pub closed_loops: usize,
    /// Connections walked
    pub visited: usize,
}

impl PropagationReport {
    pub fn is_lit(&self, id: &ComponentId) -> bool {
        self.lit_leds.contains(id)
    }

    pub fn is_energized(&self, id: &ConnectionId) -> bool {
        self.energized.contains(id)
    }

    pub fn has_closed_loop(&self) -> bool {
        self.closed_loops > 0
    }
}

pub struct PropagationEngine;

impl PropagationEngine {
    /// Run a full pass over `circuit`.
    pub fn run(circuit: &mut CircuitGraph) -> PropagationReport {
        Self::reset(circuit);

        let sources = Self::live_sources(circuit);
        let mut report = PropagationReport {
            powered: !sources.is_empty(),
            ..PropagationReport::default()
        };

        if !report.powered {
            tracing::debug!("Propagation skipped: no battery is on");
            return report;
        }

        let mut visited: HashSet<EdgeIndex> = HashSet::new();
        for (source, terminal) in sources {
            tracing::trace!("Tracing from {}:{}", circuit.graph[source].id, terminal);
            Self::trace(circuit, source, terminal, &mut visited, &mut report);
        }

        report.visited = visited.len();
        report.lit_leds = circuit
            .components()
            .filter(|c| c.kind == ComponentKind::Led && c.is_on())
            .map(|c| c.id.clone())
            .collect();
        report.energized = circuit
            .connections()
            .filter(|c| c.energized)
            .map(|c| c.id.clone())
            .collect();

        tracing::debug!(
            "Propagation complete: {} LED(s) lit, {} of {} connection(s) energized, {} closed loop(s)",
            report.lit_leds.len(),
            report.energized.len(),
            circuit.connection_count(),
            report.closed_loops
        );
        report
    }

    /// Switch every LED off and de-energize every connection.
    fn reset(circuit: &mut CircuitGraph) {
        let nodes: Vec<NodeIndex> = circuit.component_indices.values().copied().collect();
        for idx in nodes {
            if let Some(component) = circuit.graph.node_weight_mut(idx) {
                if component.kind == ComponentKind::Led {
                    component.state = ComponentState::Off;
                }
            }
        }

        let edges: Vec<EdgeIndex> = circuit.graph.edge_indices().collect();
        for edge in edges {
            if let Some(connection) = circuit.graph.edge_weight_mut(edge) {
                connection.energized = false;
            }
        }
    }

    /// Batteries that are on, paired with the terminal current leaves from.
    fn live_sources(circuit: &CircuitGraph) -> Vec<(NodeIndex, &'static str)> {
        circuit
            .component_order
            .iter()
            .filter_map(|id| circuit.component_indices.get(id).copied())
            .filter_map(|idx| {
                let component = &circuit.graph[idx];
                if !component.is_on() {
                    return None;
                }
                component
                    .definition()
                    .source_terminal()
                    .map(|terminal| (idx, terminal))
            })
            .collect()
    }

    /// Depth-first walk from one source terminal, using an explicit stack.
    fn trace(
        circuit: &mut CircuitGraph,
        source: NodeIndex,
        terminal: &'static str,
        visited: &mut HashSet<EdgeIndex>,
        report: &mut PropagationReport,
    ) {
        let mut stack = vec![(source, terminal)];

        while let Some((node, terminal)) = stack.pop() {
            let here = circuit.graph[node].id.clone();
            let incident: Vec<EdgeIndex> = circuit
                .graph
                .edges(node)
                .filter(|edge| circuit.graph[edge.id()].touches(&here, terminal))
                .map(|edge| edge.id())
                .collect();

            for edge in incident {
                if !visited.insert(edge) {
                    continue;
                }

                let connection = &mut circuit.graph[edge];
                connection.energized = true;
                let Some((next_id, next_terminal)) = connection
                    .other_end(&here, terminal)
                    .map(|(id, t)| (id.clone(), t.to_string()))
                else {
                    continue;
                };

                let Some(&next) = circuit.component_indices.get(&next_id) else {
                    continue;
                };
                let component = &mut circuit.graph[next];

                match component.kind.conduct(&next_terminal, component.state) {
                    Conduction::Emit { exit } => {
                        tracing::trace!("{} lit via {}", next_id, next_terminal);
                        component.state = ComponentState::On;
                        stack.push((next, exit));
                    }
                    Conduction::Pass { exit } => {
                        tracing::trace!("{} passes {} -> {}", next_id, next_terminal, exit);
                        stack.push((next, exit));
                    }
                    Conduction::Complete => {
                        tracing::trace!("Loop closed at {}:{}", next_id, next_terminal);
                        report.closed_loops += 1;
                    }
                    Conduction::Blocked => {
                        tracing::trace!("Blocked at {}:{}", next_id, next_terminal);
                    }
                }
            }
        }
    }
}

impl CircuitGraph {
    /// Recompute LED states and energized flags. See [`PropagationEngine`].
    pub fn propagate(&mut self) -> PropagationReport {
        PropagationEngine::run(self)
    }
}
