//! Circuit Graph Store
//!
//! Components are stored as nodes and connections as edges of a stable
//! undirected petgraph, so removing a component drops its connections along
//! with it and indices of everything else stay valid. Id maps resolve
//! components and connections in O(1); order lists keep iteration in
//! insertion order.

use chrono::Utc;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::schema::*;
use super::CircuitError;
use crate::catalog::{ComponentKind, ConnectionKind};

/// The single source of truth for what is on the canvas.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    pub(super) graph: StableUnGraph<ComponentInstance, ConnectionInstance>,

    /// Index mapping: component id -> node index
    pub(super) component_indices: HashMap<ComponentId, NodeIndex>,

    /// Index mapping: connection id -> edge index
    connection_indices: HashMap<ConnectionId, EdgeIndex>,

    pub(super) component_order: Vec<ComponentId>,
    pub(super) connection_order: Vec<ConnectionId>,

    /// Last timestamp handed out as a component id
    last_id_millis: i64,
}

impl CircuitGraph {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            component_indices: HashMap::new(),
            connection_indices: HashMap::new(),
            component_order: Vec::new(),
            connection_order: Vec::new(),
            last_id_millis: 0,
        }
    }

    fn next_component_id(&mut self) -> ComponentId {
        let mut millis = Utc::now().timestamp_millis().max(self.last_id_millis + 1);
        while self
            .component_indices
            .contains_key(&ComponentId::new(millis.to_string()))
        {
            millis += 1;
        }
        self.last_id_millis = millis;
        ComponentId::new(millis.to_string())
    }

    fn attach(&mut self, instance: ComponentInstance) -> NodeIndex {
        let id = instance.id.clone();
        let idx = self.graph.add_node(instance);
        self.component_indices.insert(id.clone(), idx);
        self.component_order.push(id);
        idx
    }

    /// Place a new component of `kind`. It starts switched off.
    pub fn add_component(&mut self, kind: ComponentKind, position: Position) -> &ComponentInstance {
        let id = self.next_component_id();
        tracing::debug!("Placing {} as {} at ({}, {})", kind, id, position.left, position.top);
        let idx = self.attach(ComponentInstance::new(id, kind, position));
        &self.graph[idx]
    }

    /// Register an instance that already carries its id (snapshot import).
    pub fn insert_component(
        &mut self,
        instance: ComponentInstance,
    ) -> Result<&ComponentInstance, CircuitError> {
        if self.component_indices.contains_key(&instance.id) {
            return Err(CircuitError::DuplicateComponent(instance.id));
        }
        let idx = self.attach(instance);
        Ok(&self.graph[idx])
    }

    /// Remove a component and every connection touching it.
    ///
    /// Returns `None` when the id is unknown; that is not an error.
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<ComponentInstance> {
        let idx = self.component_indices.remove(id)?;

        let incident: Vec<ConnectionId> = self
            .graph
            .edges(idx)
            .map(|edge| self.graph[edge.id()].id.clone())
            .collect();
        for conn_id in &incident {
            self.connection_indices.remove(conn_id);
        }
        self.connection_order.retain(|c| !incident.contains(c));
        self.component_order.retain(|c| c != id);

        tracing::debug!("Removed component {} and {} connection(s)", id, incident.len());
        self.graph.remove_node(idx)
    }

    /// Flip a battery or button between off and on.
    pub fn toggle_state(&mut self, id: &ComponentId) -> Result<ComponentState, CircuitError> {
        let component = self
            .component_mut(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?;

        if !component.kind.is_toggleable() {
            return Err(CircuitError::NotToggleable {
                id: id.clone(),
                kind: component.kind,
            });
        }

        component.state = component.state.toggled();
        tracing::debug!("Toggled {} ({}) {}", id, component.kind, component.state);
        Ok(component.state)
    }

    /// Drag-release: record where the component ended up.
    pub fn move_component(&mut self, id: &ComponentId, position: Position) -> Result<(), CircuitError> {
        let component = self
            .component_mut(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?;
        component.position = position;
        Ok(())
    }

    /// Rotate by `degrees`, returning the normalized rotation.
    pub fn rotate_component(&mut self, id: &ComponentId, degrees: f64) -> Result<f64, CircuitError> {
        if !degrees.is_finite() {
            return Err(CircuitError::InvalidRotation(degrees));
        }
        let component = self
            .component_mut(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?;
        component.rotation = normalize_rotation(component.rotation + degrees);
        Ok(component.rotation)
    }

    /// Connect two terminals.
    ///
    /// Rejects connecting a component to itself, unknown terminals, role
    /// mismatches (`output` pairs with `input`, `any` pairs with both) and
    /// edges that already exist in either direction.
    pub fn add_connection(
        &mut self,
        from: &ComponentId,
        from_terminal: &str,
        to: &ComponentId,
        to_terminal: &str,
        kind: ConnectionKind,
    ) -> Result<&ConnectionInstance, CircuitError> {
        if from == to {
            return Err(CircuitError::SelfConnection(from.clone()));
        }

        let from_idx = self.node_index(from)?;
        let to_idx = self.node_index(to)?;

        let from_role = self.terminal_role(from_idx, from_terminal)?;
        let to_role = self.terminal_role(to_idx, to_terminal)?;

        let from_ref = TerminalRef::new(from.clone(), from_terminal);
        let to_ref = TerminalRef::new(to.clone(), to_terminal);

        if !from_role.is_compatible_with(to_role) {
            return Err(CircuitError::IncompatibleTerminals {
                from: from_ref,
                from_role,
                to: to_ref,
                to_role,
            });
        }

        // Same terminal pair, drawn either way
        if let Some(existing) = self
            .graph
            .edges(from_idx)
            .map(|edge| edge.weight())
            .find(|conn| conn.touches(from, from_terminal) && conn.touches(to, to_terminal))
        {
            return Err(CircuitError::DuplicateConnection(existing.id.clone()));
        }

        let connection = ConnectionInstance::new(from_ref, to_ref, kind);
        let id = connection.id.clone();
        tracing::debug!("Connected {} with {}", id, kind);

        let edge = self.graph.add_edge(from_idx, to_idx, connection);
        self.connection_indices.insert(id.clone(), edge);
        self.connection_order.push(id);
        Ok(&self.graph[edge])
    }

    /// Delete a connection. Unknown ids are ignored.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> Option<ConnectionInstance> {
        let edge = self.connection_indices.remove(id)?;
        self.connection_order.retain(|c| c != id);
        tracing::debug!("Removed connection {}", id);
        self.graph.remove_edge(edge)
    }

    fn node_index(&self, id: &ComponentId) -> Result<NodeIndex, CircuitError> {
        self.component_indices
            .get(id)
            .copied()
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))
    }

    fn terminal_role(
        &self,
        idx: NodeIndex,
        terminal: &str,
    ) -> Result<crate::catalog::TerminalRole, CircuitError> {
        let component = &self.graph[idx];
        component
            .kind
            .terminal(terminal)
            .map(|t| t.role)
            .ok_or_else(|| CircuitError::UnknownTerminal {
                component: component.id.clone(),
                kind: component.kind,
                terminal: terminal.to_string(),
            })
    }

    pub fn component(&self, id: &ComponentId) -> Option<&ComponentInstance> {
        self.component_indices
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub(super) fn component_mut(&mut self, id: &ComponentId) -> Option<&mut ComponentInstance> {
        let idx = *self.component_indices.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&ConnectionInstance> {
        self.connection_indices
            .get(id)
            .and_then(|&edge| self.graph.edge_weight(edge))
    }

    pub fn contains_component(&self, id: &ComponentId) -> bool {
        self.component_indices.contains_key(id)
    }

    /// All components in placement order
    pub fn components(&self) -> impl Iterator<Item = &ComponentInstance> + '_ {
        self.component_order
            .iter()
            .filter_map(move |id| self.component(id))
    }

    /// All connections in creation order
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionInstance> + '_ {
        self.connection_order
            .iter()
            .filter_map(move |id| self.connection(id))
    }

    /// Connections with an end on the given terminal
    pub fn connections_at<'a>(
        &'a self,
        component: &'a ComponentId,
        terminal: &'a str,
    ) -> impl Iterator<Item = &'a ConnectionInstance> + 'a {
        self.component_indices
            .get(component)
            .into_iter()
            .flat_map(move |&idx| self.graph.edges(idx))
            .map(move |edge| &self.graph[edge.id()])
            .filter(move |conn| conn.touches(component, terminal))
    }

    /// Connections with either end on the given component
    pub fn connections_of<'a>(
        &'a self,
        component: &'a ComponentId,
    ) -> impl Iterator<Item = &'a ConnectionInstance> + 'a {
        self.component_indices
            .get(component)
            .into_iter()
            .flat_map(move |&idx| self.graph.edges(idx))
            .map(move |edge| &self.graph[edge.id()])
    }

    pub fn component_count(&self) -> usize {
        self.component_indices.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.component_indices.is_empty()
    }

    /// Get statistics about the circuit
    pub fn stats(&self) -> CircuitStats {
        let mut stats = CircuitStats {
            component_count: self.component_count(),
            connection_count: self.connection_count(),
            ..CircuitStats::default()
        };

        for component in self.components() {
            match component.kind {
                ComponentKind::Battery => stats.batteries += 1,
                ComponentKind::Led => stats.leds += 1,
                ComponentKind::Button => stats.buttons += 1,
                ComponentKind::Resistor => stats.resistors += 1,
            }
        }
        for connection in self.connections() {
            match connection.kind {
                ConnectionKind::Thread => stats.threads += 1,
                ConnectionKind::Tape => stats.tapes += 1,
            }
            if connection.energized {
                stats.energized += 1;
            }
        }

        stats
    }
}

impl Default for CircuitGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a circuit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub component_count: usize,
    pub connection_count: usize,
    pub batteries: usize,
    pub leds: usize,
    pub buttons: usize,
    pub resistors: usize,
    pub threads: usize,
    pub tapes: usize,
    pub energized: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TerminalRole;

    fn place(graph: &mut CircuitGraph, kind: ComponentKind) -> ComponentId {
        graph.add_component(kind, Position::new(10.0, 20.0)).id.clone()
    }

    #[test]
    fn test_add_component_defaults() {
        let mut graph = CircuitGraph::new();
        let battery = graph.add_component(ComponentKind::Battery, Position::new(5.0, 6.0));

        assert_eq!(battery.state, ComponentState::Off);
        assert_eq!(battery.position, Position::new(5.0, 6.0));
        assert_eq!(battery.rotation, 0.0);
    }

    #[test]
    fn test_component_ids_unique_and_ordered() {
        let mut graph = CircuitGraph::new();
        let ids: Vec<ComponentId> = (0..50)
            .map(|_| place(&mut graph, ComponentKind::Resistor))
            .collect();

        let listed: Vec<ComponentId> = graph.components().map(|c| c.id.clone()).collect();
        assert_eq!(listed, ids);

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_insert_duplicate_component() {
        let mut graph = CircuitGraph::new();
        let instance = ComponentInstance::new("led-1".into(), ComponentKind::Led, Position::default());
        graph.insert_component(instance.clone()).expect("first insert");

        assert_eq!(
            graph.insert_component(instance).err(),
            Some(CircuitError::DuplicateComponent("led-1".into()))
        );
        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut graph = CircuitGraph::new();
        let r = place(&mut graph, ComponentKind::Resistor);

        let err = graph
            .add_connection(&r, "terminal1", &r, "terminal2", ConnectionKind::Thread)
            .unwrap_err();
        assert_eq!(err, CircuitError::SelfConnection(r));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_role_mismatch_rejected() {
        let mut graph = CircuitGraph::new();
        let led_a = place(&mut graph, ComponentKind::Led);
        let led_b = place(&mut graph, ComponentKind::Led);

        let err = graph
            .add_connection(&led_a, "anode", &led_b, "anode", ConnectionKind::Thread)
            .unwrap_err();
        match err {
            CircuitError::IncompatibleTerminals { from_role, to_role, .. } => {
                assert_eq!(from_role, TerminalRole::Input);
                assert_eq!(to_role, TerminalRole::Input);
            }
            other => panic!("expected IncompatibleTerminals, got {:?}", other),
        }

        assert!(matches!(
            graph.add_connection(&led_a, "cathode", &led_b, "cathode", ConnectionKind::Tape),
            Err(CircuitError::IncompatibleTerminals { .. })
        ));
    }

    #[test]
    fn test_any_role_connects_to_both() {
        let mut graph = CircuitGraph::new();
        let led = place(&mut graph, ComponentKind::Led);
        let resistor = place(&mut graph, ComponentKind::Resistor);

        graph
            .add_connection(&resistor, "terminal1", &led, "anode", ConnectionKind::Thread)
            .expect("any -> input");
        graph
            .add_connection(&led, "cathode", &resistor, "terminal2", ConnectionKind::Thread)
            .expect("output -> any");
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_unknown_terminal_and_component() {
        let mut graph = CircuitGraph::new();
        let battery = place(&mut graph, ComponentKind::Battery);
        let led = place(&mut graph, ComponentKind::Led);

        assert!(matches!(
            graph.add_connection(&battery, "plus", &led, "anode", ConnectionKind::Thread),
            Err(CircuitError::UnknownTerminal { ref terminal, .. }) if terminal == "plus"
        ));
        assert!(matches!(
            graph.add_connection(&battery, "positive", &"ghost".into(), "anode", ConnectionKind::Thread),
            Err(CircuitError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_duplicate_connection_either_direction() {
        let mut graph = CircuitGraph::new();
        let resistor_a = place(&mut graph, ComponentKind::Resistor);
        let resistor_b = place(&mut graph, ComponentKind::Resistor);

        graph
            .add_connection(&resistor_a, "terminal1", &resistor_b, "terminal2", ConnectionKind::Thread)
            .expect("first connection");

        assert!(matches!(
            graph.add_connection(&resistor_a, "terminal1", &resistor_b, "terminal2", ConnectionKind::Tape),
            Err(CircuitError::DuplicateConnection(_))
        ));
        assert!(matches!(
            graph.add_connection(&resistor_b, "terminal2", &resistor_a, "terminal1", ConnectionKind::Thread),
            Err(CircuitError::DuplicateConnection(_))
        ));

        // Different terminal pair between the same components is fine
        graph
            .add_connection(&resistor_a, "terminal2", &resistor_b, "terminal1", ConnectionKind::Thread)
            .expect("parallel connection");
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_remove_component_cascades() {
        let mut graph = CircuitGraph::new();
        let battery = place(&mut graph, ComponentKind::Battery);
        let led = place(&mut graph, ComponentKind::Led);
        let resistor = place(&mut graph, ComponentKind::Resistor);

        graph
            .add_connection(&battery, "positive", &led, "anode", ConnectionKind::Thread)
            .unwrap();
        graph
            .add_connection(&led, "cathode", &resistor, "terminal1", ConnectionKind::Thread)
            .unwrap();
        graph
            .add_connection(&resistor, "terminal2", &battery, "negative", ConnectionKind::Tape)
            .unwrap();

        let removed = graph.remove_component(&led).expect("led existed");
        assert_eq!(removed.kind, ComponentKind::Led);
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.connections().all(|c| !c.involves(&led)));
        assert_eq!(graph.connections_of(&battery).count(), 1);

        assert!(graph.remove_component(&led).is_none());
    }

    #[test]
    fn test_remove_connection_is_noop_when_absent() {
        let mut graph = CircuitGraph::new();
        assert!(graph.remove_connection(&"a:x->b:y".into()).is_none());
    }

    #[test]
    fn test_toggle_rules() {
        let mut graph = CircuitGraph::new();
        let button = place(&mut graph, ComponentKind::Button);
        let resistor = place(&mut graph, ComponentKind::Resistor);

        assert_eq!(graph.toggle_state(&button), Ok(ComponentState::On));
        assert_eq!(graph.toggle_state(&button), Ok(ComponentState::Off));
        assert!(matches!(
            graph.toggle_state(&resistor),
            Err(CircuitError::NotToggleable { kind: ComponentKind::Resistor, .. })
        ));
        assert!(matches!(
            graph.toggle_state(&"missing".into()),
            Err(CircuitError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_move_and_rotate() {
        let mut graph = CircuitGraph::new();
        let led = place(&mut graph, ComponentKind::Led);

        graph.move_component(&led, Position::new(100.0, 42.0)).unwrap();
        assert_eq!(graph.rotate_component(&led, 90.0), Ok(90.0));
        assert_eq!(graph.rotate_component(&led, 300.0), Ok(30.0));

        let c = graph.component(&led).unwrap();
        assert_eq!(c.position, Position::new(100.0, 42.0));
        assert_eq!(c.rotation, 30.0);
    }

    #[test]
    fn test_rotate_rejects_non_finite_and_stays_in_range() {
        let mut graph = CircuitGraph::new();
        let led = place(&mut graph, ComponentKind::Led);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                graph.rotate_component(&led, bad),
                Err(CircuitError::InvalidRotation(_))
            ));
        }
        assert_eq!(graph.component(&led).unwrap().rotation, 0.0);

        assert_eq!(graph.rotate_component(&led, -1e-20), Ok(0.0));
        assert_eq!(graph.rotate_component(&led, 720.0), Ok(0.0));
    }

    #[test]
    fn test_delimiters_in_ids_do_not_collide() {
        let mut graph = CircuitGraph::new();
        for id in ["p", "q:terminal2->r", "p:terminal1->q", "r"] {
            graph
                .insert_component(ComponentInstance::new(id.into(), ComponentKind::Resistor, Position::default()))
                .unwrap();
        }

        let first = graph
            .add_connection(&"p".into(), "terminal1", &"q:terminal2->r".into(), "terminal1", ConnectionKind::Thread)
            .unwrap()
            .id
            .clone();
        let second = graph
            .add_connection(&"p:terminal1->q".into(), "terminal2", &"r".into(), "terminal1", ConnectionKind::Thread)
            .unwrap()
            .id
            .clone();

        assert_ne!(first, second);
        assert_eq!(graph.connection_count(), 2);
        assert!(graph.connection(&first).unwrap().involves(&"q:terminal2->r".into()));
        assert!(graph.connection(&second).unwrap().involves(&"r".into()));
    }

    #[test]
    fn test_connections_at_filters_by_terminal() {
        let mut graph = CircuitGraph::new();
        let battery = place(&mut graph, ComponentKind::Battery);
        let led = place(&mut graph, ComponentKind::Led);

        graph
            .add_connection(&battery, "positive", &led, "anode", ConnectionKind::Thread)
            .unwrap();
        graph
            .add_connection(&led, "cathode", &battery, "negative", ConnectionKind::Thread)
            .unwrap();

        assert_eq!(graph.connections_at(&battery, "positive").count(), 1);
        assert_eq!(graph.connections_at(&led, "cathode").count(), 1);
        assert_eq!(graph.connections_of(&led).count(), 2);
    }

    #[test]
    fn test_stats() {
        let mut graph = CircuitGraph::new();
        let battery = place(&mut graph, ComponentKind::Battery);
        let led = place(&mut graph, ComponentKind::Led);
        place(&mut graph, ComponentKind::Button);
        graph
            .add_connection(&battery, "positive", &led, "anode", ConnectionKind::Tape)
            .unwrap();

        let stats = graph.stats();
        assert_eq!(stats.component_count, 3);
        assert_eq!(stats.batteries, 1);
        assert_eq!(stats.leds, 1);
        assert_eq!(stats.buttons, 1);
        assert_eq!(stats.tapes, 1);
        assert_eq!(stats.energized, 0);
    }
}
