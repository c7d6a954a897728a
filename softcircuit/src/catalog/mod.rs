//! Static Catalogs
//!
//! Everything a user can pick from the palette lives here:
//! - Component types (battery, LED, button, resistor) with their terminals
//!   and conduction rules
//! - Connection types (conductive thread, copper tape)
//! - Fabric swatches and canvas patterns (presentation metadata only)
//!
//! The catalogs are plain `static` data resolved once; lookups by string id
//! return `&'static` definitions or a typed [`CircuitError`](crate::circuit::CircuitError).

pub mod components;
pub mod connections;
pub mod fabrics;

pub use components::{
    ComponentKind, ComponentTypeDef, Conduction, Terminal, TerminalRole, COMPONENT_TYPES,
};
pub use connections::{ConnectionKind, ConnectionTypeDef, CONNECTION_TYPES};
pub use fabrics::{CanvasPattern, Fabric, FABRICS};
