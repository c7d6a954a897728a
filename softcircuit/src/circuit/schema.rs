//! Instance types placed on the canvas.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{ComponentKind, ComponentTypeDef, ConnectionKind};

/// Identifier of a placed component.
///
/// Fresh ids are derived from the placement time in milliseconds; ids read
/// from a snapshot are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a connection, derived from its two endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// `"{from}:{from_terminal}->{to}:{to_terminal}"`
    ///
    /// `\` and `:` inside component ids are backslash-escaped so distinct
    /// endpoint pairs never share an id.
    pub fn between(
        from: &ComponentId,
        from_terminal: &str,
        to: &ComponentId,
        to_terminal: &str,
    ) -> Self {
        Self(format!(
            "{}:{}->{}:{}",
            escape_id(from),
            from_terminal,
            escape_id(to),
            to_terminal
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_id(id: &ComponentId) -> String {
    id.as_str().replace('\\', "\\\\").replace(':', "\\:")
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// On/off state. User-set for batteries and buttons, derived for LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Off,
    On,
}

impl ComponentState {
    pub fn is_on(self) -> bool {
        self == ComponentState::On
    }

    pub fn toggled(self) -> Self {
        match self {
            ComponentState::Off => ComponentState::On,
            ComponentState::On => ComponentState::Off,
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentState::Off => write!(f, "off"),
            ComponentState::On => write!(f, "on"),
        }
    }
}

/// Canvas position in pixels, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// A terminal on a placed component, e.g. `1712345678901:anode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerminalRef {
    pub component: ComponentId,
    pub terminal: String,
}

impl TerminalRef {
    pub fn new(component: impl Into<ComponentId>, terminal: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            terminal: terminal.into(),
        }
    }
}

impl fmt::Display for TerminalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.terminal)
    }
}

/// Fold `degrees` into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let rotation = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if rotation >= 360.0 {
        0.0
    } else {
        rotation
    }
}

/// A component placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentInstance {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub state: ComponentState,
    pub position: Position,
    /// Degrees clockwise. Presentation only; kept as imported, folded into
    /// [0, 360) whenever the component is rotated.
    pub rotation: f64,
}

impl ComponentInstance {
    pub fn new(id: ComponentId, kind: ComponentKind, position: Position) -> Self {
        Self {
            id,
            kind,
            state: ComponentState::Off,
            position,
            rotation: 0.0,
        }
    }

    pub fn with_state(mut self, state: ComponentState) -> Self {
        self.state = state;
        self
    }

    /// Set the rotation verbatim. See [`normalize_rotation`].
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn definition(&self) -> &'static ComponentTypeDef {
        self.kind.definition()
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }
}

/// A thread or tape run between two terminals.
///
/// Current may flow either way along it; `from`/`to` only records how the
/// user drew it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionInstance {
    pub id: ConnectionId,
    pub from: ComponentId,
    pub from_terminal: String,
    pub to: ComponentId,
    pub to_terminal: String,
    pub kind: ConnectionKind,
    /// Recomputed on every propagation pass
    pub energized: bool,
}

impl ConnectionInstance {
    pub fn new(from: TerminalRef, to: TerminalRef, kind: ConnectionKind) -> Self {
        Self {
            id: ConnectionId::between(&from.component, &from.terminal, &to.component, &to.terminal),
            from: from.component,
            from_terminal: from.terminal,
            to: to.component,
            to_terminal: to.terminal,
            kind,
            energized: false,
        }
    }

    pub fn from_ref(&self) -> TerminalRef {
        TerminalRef::new(self.from.clone(), self.from_terminal.clone())
    }

    pub fn to_ref(&self) -> TerminalRef {
        TerminalRef::new(self.to.clone(), self.to_terminal.clone())
    }

    /// Whether either end of this connection sits on `component`.
    pub fn involves(&self, component: &ComponentId) -> bool {
        &self.from == component || &self.to == component
    }

    /// Whether either end sits on the given terminal.
    pub fn touches(&self, component: &ComponentId, terminal: &str) -> bool {
        (&self.from == component && self.from_terminal == terminal)
            || (&self.to == component && self.to_terminal == terminal)
    }

    /// The end opposite the given terminal, if this connection touches it.
    pub fn other_end(&self, component: &ComponentId, terminal: &str) -> Option<(&ComponentId, &str)> {
        if &self.from == component && self.from_terminal == terminal {
            Some((&self.to, &self.to_terminal))
        } else if &self.to == component && self.to_terminal == terminal {
            Some((&self.from, &self.from_terminal))
        } else {
            None
        }
    }
}
