//! Drive the engine the way a UI shell would: palette drops and clicks.
//! Run with: cargo run --example editor_session

use softcircuit::prelude::*;
use softcircuit::{ClickOutcome, DropOutcome};

fn place(
    session: &mut EditorSession,
    sim: &mut CircuitSimulator,
    palette_id: &str,
    left: f64,
) -> Result<ComponentId, CircuitError> {
    match session.drop_item(sim, palette_id, Position::new(left, 100.0))? {
        DropOutcome::Placed(component) => Ok(component.id),
        DropOutcome::Background(fabric) => Err(CircuitError::UnknownType(fabric.id.to_string())),
    }
}

fn main() -> Result<(), SoftCircuitError> {
    let mut sim = CircuitSimulator::default();
    let mut session = EditorSession::new();

    session.drop_item(&mut sim, "felt", Position::default())?;
    session.set_pattern(&mut sim, "dotted")?;

    let battery = place(&mut session, &mut sim, "battery", 40.0)?;
    let resistor = place(&mut session, &mut sim, "resistor", 140.0)?;
    let led = place(&mut session, &mut sim, "led", 240.0)?;

    session.toggle_tool(ConnectionKind::Thread);
    let clicks = [
        (battery.clone(), "positive"),
        (resistor.clone(), "terminal1"),
        (resistor.clone(), "terminal2"),
        (led.clone(), "anode"),
        (led.clone(), "cathode"),
        (battery.clone(), "negative"),
    ];
    for (component, terminal) in clicks {
        if let ClickOutcome::Connected(conn) =
            session.click_terminal(&mut sim, TerminalRef::new(component, terminal))?
        {
            println!("Sewed {} ({})", conn.id, conn.kind);
        }
    }
    session.toggle_tool(ConnectionKind::Thread);

    session.click_component(&mut sim, &battery)?;
    let report = sim.last_report();
    println!("LED lit: {}", report.is_lit(&led));
    println!("Energized connections: {}", report.energized.len());

    println!("{}", sim.export_json()?);
    Ok(())
}
