//! Editor Session
//!
//! Per-user interaction state that sits between UI gestures and the
//! simulator: which wiring tool is armed and which terminal was clicked
//! first. The session never owns the circuit; every call takes the
//! [`CircuitSimulator`] it acts on.

use crate::catalog::{CanvasPattern, ConnectionKind, Fabric};
use crate::circuit::{
    CircuitError, ComponentId, ComponentInstance, ComponentState, ConnectionInstance, Position,
    TerminalRef,
};
use crate::core::CircuitSimulator;

/// What a palette drop turned into
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Placed(ComponentInstance),
    Background(&'static Fabric),
}

/// What a click on the canvas did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// First endpoint of a new connection recorded
    Armed(TerminalRef),
    Connected(ConnectionInstance),
    Toggled(ComponentState),
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    active_tool: Option<ConnectionKind>,
    pending: Option<TerminalRef>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tool(&self) -> Option<ConnectionKind> {
        self.active_tool
    }

    pub fn pending(&self) -> Option<&TerminalRef> {
        self.pending.as_ref()
    }

    /// Arm `kind`, or disarm it when it is already armed.
    ///
    /// Switching tools drops any half-made connection.
    pub fn toggle_tool(&mut self, kind: ConnectionKind) -> Option<ConnectionKind> {
        self.pending = None;
        self.active_tool = if self.active_tool == Some(kind) {
            None
        } else {
            Some(kind)
        };
        tracing::debug!("Wiring tool now {:?}", self.active_tool);
        self.active_tool
    }

    /// Forget the first endpoint of an unfinished connection.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Drop a palette item on the canvas.
    ///
    /// Fabric swatches restyle the background; anything else must be a
    /// component type id.
    pub fn drop_item(
        &mut self,
        simulator: &mut CircuitSimulator,
        palette_id: &str,
        position: Position,
    ) -> Result<DropOutcome, CircuitError> {
        if let Ok(fabric) = Fabric::lookup(palette_id) {
            simulator.set_background(Some(fabric.id.to_string()));
            return Ok(DropOutcome::Background(fabric));
        }
        simulator
            .place_component(palette_id, position)
            .map(DropOutcome::Placed)
    }

    /// Click on a terminal while a wiring tool is armed.
    ///
    /// The first click records the endpoint, the second creates the
    /// connection. The pending endpoint is cleared after the second click
    /// even when the connection is rejected.
    pub fn click_terminal(
        &mut self,
        simulator: &mut CircuitSimulator,
        terminal: TerminalRef,
    ) -> Result<ClickOutcome, CircuitError> {
        let Some(tool) = self.active_tool else {
            return Ok(ClickOutcome::Ignored);
        };

        // Any second click ends the attempt, valid or not
        let start = self.pending.take();

        let component = simulator
            .graph()
            .component(&terminal.component)
            .ok_or_else(|| CircuitError::UnknownComponent(terminal.component.clone()))?;
        if component.kind.terminal(&terminal.terminal).is_none() {
            return Err(CircuitError::UnknownTerminal {
                component: component.id.clone(),
                kind: component.kind,
                terminal: terminal.terminal,
            });
        }

        match start {
            None => {
                self.pending = Some(terminal.clone());
                Ok(ClickOutcome::Armed(terminal))
            }
            Some(start) => simulator
                .connect(&start, &terminal, Some(tool.id()))
                .map(ClickOutcome::Connected),
        }
    }

    /// Click on a component body: toggles batteries and buttons when no
    /// wiring tool is armed.
    pub fn click_component(
        &mut self,
        simulator: &mut CircuitSimulator,
        id: &ComponentId,
    ) -> Result<ClickOutcome, CircuitError> {
        if self.active_tool.is_some() {
            return Ok(ClickOutcome::Ignored);
        }
        let component = simulator
            .graph()
            .component(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.clone()))?;
        if !component.kind.is_toggleable() {
            return Ok(ClickOutcome::Ignored);
        }
        simulator.toggle(id).map(ClickOutcome::Toggled)
    }

    /// Delete a component, dropping a pending endpoint that sat on it.
    pub fn delete_component(
        &mut self,
        simulator: &mut CircuitSimulator,
        id: &ComponentId,
    ) -> Option<ComponentInstance> {
        if self.pending.as_ref().map(|p| &p.component == id).unwrap_or(false) {
            self.pending = None;
        }
        simulator.remove_component(id)
    }

    pub fn set_pattern(
        &mut self,
        simulator: &mut CircuitSimulator,
        pattern_id: &str,
    ) -> Result<CanvasPattern, CircuitError> {
        let pattern: CanvasPattern = pattern_id.parse()?;
        simulator.set_pattern(pattern.id());
        Ok(pattern)
    }
}
