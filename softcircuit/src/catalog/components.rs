//! Component Type Registry
//!
//! Each component kind declares its named terminals, whether it is a power
//! source, whether the user may toggle it, and how current behaves when it
//! enters on a given terminal.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::circuit::{CircuitError, ComponentState};

/// Direction a terminal accepts when wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalRole {
    Input,
    Output,
    Any,
}

impl TerminalRole {
    /// `output` pairs with `input`; `any` pairs with everything.
    pub fn is_compatible_with(self, other: TerminalRole) -> bool {
        match (self, other) {
            (TerminalRole::Any, _) | (_, TerminalRole::Any) => true,
            (TerminalRole::Output, TerminalRole::Input) => true,
            (TerminalRole::Input, TerminalRole::Output) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for TerminalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalRole::Input => write!(f, "input"),
            TerminalRole::Output => write!(f, "output"),
            TerminalRole::Any => write!(f, "any"),
        }
    }
}

/// A named terminal on a component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub name: &'static str,
    pub role: TerminalRole,
}

/// What happens to current entering a component on a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conduction {
    /// Current continues from `exit`.
    Pass { exit: &'static str },
    /// Current lights the component, then continues from `exit`.
    Emit { exit: &'static str },
    /// Current has returned to a live source; the loop is closed.
    Complete,
    /// Current stops here.
    Blocked,
}

/// The component kinds available in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Battery,
    Led,
    Button,
    Resistor,
}

/// Static definition of a component kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentTypeDef {
    pub kind: ComponentKind,
    pub id: &'static str,
    pub name: &'static str,
    pub terminals: &'static [Terminal],
    pub is_source: bool,
    pub toggleable: bool,
    /// Nominal resistance in ohms, shown next to the part. Never used by propagation.
    pub resistance: Option<f64>,
}

impl ComponentTypeDef {
    pub fn terminal(&self, name: &str) -> Option<&'static Terminal> {
        self.terminals.iter().find(|t| t.name == name)
    }

    pub fn terminal_names(&self) -> impl Iterator<Item = &'static str> {
        self.terminals.iter().map(|t| t.name)
    }

    /// Terminal current leaves a source from (the battery's `positive`).
    pub fn source_terminal(&self) -> Option<&'static str> {
        if !self.is_source {
            return None;
        }
        self.terminals
            .iter()
            .find(|t| t.role == TerminalRole::Output)
            .map(|t| t.name)
    }
}

static BATTERY: ComponentTypeDef = ComponentTypeDef {
    kind: ComponentKind::Battery,
    id: "battery",
    name: "Coin Cell Battery",
    terminals: &[
        Terminal { name: "positive", role: TerminalRole::Output },
        Terminal { name: "negative", role: TerminalRole::Input },
    ],
    is_source: true,
    toggleable: true,
    resistance: None,
};

static LED: ComponentTypeDef = ComponentTypeDef {
    kind: ComponentKind::Led,
    id: "led",
    name: "Sewable LED",
    terminals: &[
        Terminal { name: "anode", role: TerminalRole::Input },
        Terminal { name: "cathode", role: TerminalRole::Output },
    ],
    is_source: false,
    toggleable: false,
    resistance: None,
};

static BUTTON: ComponentTypeDef = ComponentTypeDef {
    kind: ComponentKind::Button,
    id: "button",
    name: "Push Button",
    terminals: &[
        Terminal { name: "input", role: TerminalRole::Input },
        Terminal { name: "output", role: TerminalRole::Output },
    ],
    is_source: false,
    toggleable: true,
    resistance: None,
};

static RESISTOR: ComponentTypeDef = ComponentTypeDef {
    kind: ComponentKind::Resistor,
    id: "resistor",
    name: "Resistor",
    terminals: &[
        Terminal { name: "terminal1", role: TerminalRole::Any },
        Terminal { name: "terminal2", role: TerminalRole::Any },
    ],
    is_source: false,
    toggleable: false,
    resistance: Some(220.0),
};

/// Every registered component type, in palette order.
pub static COMPONENT_TYPES: [&ComponentTypeDef; 4] = [&BATTERY, &LED, &BUTTON, &RESISTOR];

impl ComponentKind {
    pub fn definition(self) -> &'static ComponentTypeDef {
        match self {
            ComponentKind::Battery => &BATTERY,
            ComponentKind::Led => &LED,
            ComponentKind::Button => &BUTTON,
            ComponentKind::Resistor => &RESISTOR,
        }
    }

    /// Resolve a type id (`"battery"`, `"led"`, ...) to its definition.
    pub fn lookup(type_id: &str) -> Result<&'static ComponentTypeDef, CircuitError> {
        type_id.parse::<ComponentKind>().map(ComponentKind::definition)
    }

    pub fn id(self) -> &'static str {
        self.definition().id
    }

    pub fn is_source(self) -> bool {
        self.definition().is_source
    }

    pub fn is_toggleable(self) -> bool {
        self.definition().toggleable
    }

    pub fn terminal(self, name: &str) -> Option<&'static Terminal> {
        self.definition().terminal(name)
    }

    /// The terminal across from `entry` on a two-terminal part.
    fn opposite(self, entry: &str) -> Option<&'static str> {
        match self.definition().terminals {
            [a, b] if a.name == entry => Some(b.name),
            [a, b] if b.name == entry => Some(a.name),
            _ => None,
        }
    }

    /// Apply this kind's conduction rule to current entering on `entry`.
    ///
    /// Batteries are never pass-through: reaching the negative terminal of a
    /// battery that is on closes the loop, anything else stops. LEDs only
    /// conduct anode to cathode. Buttons conduct in both directions while on.
    /// Resistors always conduct; their value is informational.
    pub fn conduct(self, entry: &str, state: ComponentState) -> Conduction {
        match self {
            ComponentKind::Battery => {
                if entry == "negative" && state.is_on() {
                    Conduction::Complete
                } else {
                    Conduction::Blocked
                }
            }
            ComponentKind::Led => match entry {
                "anode" => Conduction::Emit { exit: "cathode" },
                _ => Conduction::Blocked,
            },
            ComponentKind::Button => {
                if !state.is_on() {
                    return Conduction::Blocked;
                }
                self.opposite(entry)
                    .map(|exit| Conduction::Pass { exit })
                    .unwrap_or(Conduction::Blocked)
            }
            ComponentKind::Resistor => self
                .opposite(entry)
                .map(|exit| Conduction::Pass { exit })
                .unwrap_or(Conduction::Blocked),
        }
    }
}

impl FromStr for ComponentKind {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "battery" => Ok(ComponentKind::Battery),
            "led" => Ok(ComponentKind::Led),
            "button" => Ok(ComponentKind::Button),
            "resistor" => Ok(ComponentKind::Resistor),
            other => Err(CircuitError::UnknownType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
