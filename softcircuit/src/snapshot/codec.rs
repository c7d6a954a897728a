//! Conversion between [`CircuitGraph`] and [`CircuitSnapshot`].

use chrono::Utc;

use super::*;
use crate::catalog::{ComponentKind, ConnectionKind};
use crate::circuit::{CircuitGraph, ComponentInstance};

/// Capture the graph and canvas metadata as a document.
pub fn serialize(graph: &CircuitGraph, canvas: &CanvasSettings) -> CircuitSnapshot {
    let components = graph
        .components()
        .map(|c| SnapshotComponent {
            id: c.id.clone(),
            type_id: c.kind.id().to_string(),
            state: c.state,
            position: c.position,
            rotation: c.rotation,
        })
        .collect();

    let connections = graph
        .connections()
        .map(|c| SnapshotConnection {
            from: c.from.clone(),
            from_terminal: c.from_terminal.clone(),
            to: c.to.clone(),
            to_terminal: c.to_terminal.clone(),
            type_id: c.kind.id().to_string(),
        })
        .collect();

    CircuitSnapshot {
        components,
        connections,
        background: canvas.background.clone(),
        pattern: canvas.pattern.clone(),
        exported_at: Some(Utc::now()),
    }
}

/// Rebuild a graph from a document, in the order it lists things.
///
/// Fails on the first unknown type, duplicate id, undeclared endpoint or
/// rejected connection. Nothing outside the returned graph is touched, so a
/// failure leaves the caller's live graph as it was.
pub fn deserialize(snapshot: &CircuitSnapshot) -> Result<CircuitGraph, SnapshotError> {
    let mut graph = CircuitGraph::new();

    for entry in &snapshot.components {
        let kind: ComponentKind = entry.type_id.parse()?;
        let instance = ComponentInstance::new(entry.id.clone(), kind, entry.position)
            .with_state(entry.state)
            .with_rotation(entry.rotation);
        graph.insert_component(instance)?;
    }

    for (index, entry) in snapshot.connections.iter().enumerate() {
        let kind: ConnectionKind = entry.type_id.parse()?;

        for endpoint in [&entry.from, &entry.to] {
            if !graph.contains_component(endpoint) {
                return Err(SnapshotError::DanglingReference {
                    index,
                    component: endpoint.clone(),
                });
            }
        }

        graph.add_connection(
            &entry.from,
            &entry.from_terminal,
            &entry.to,
            &entry.to_terminal,
            kind,
        )?;
    }

    tracing::debug!(
        "Decoded snapshot with {} component(s) and {} connection(s)",
        graph.component_count(),
        graph.connection_count()
    );
    Ok(graph)
}
