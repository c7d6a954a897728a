//! Build a battery + button + LED circuit and press the button.
//! Run with: cargo run --example led_circuit [path/to/save.json]

use softcircuit::prelude::*;
use std::path::Path;

fn main() -> Result<(), SoftCircuitError> {
    let mut sim = CircuitSimulator::default();

    let battery = sim.place_component("battery", Position::new(40.0, 80.0))?;
    let button = sim.place_component("button", Position::new(160.0, 80.0))?;
    let led = sim.place_component("led", Position::new(280.0, 80.0))?;

    let terminal = |id: &ComponentId, name: &str| TerminalRef::new(id.clone(), name);
    sim.connect(&terminal(&battery.id, "positive"), &terminal(&button.id, "input"), Some("tape"))?;
    sim.connect(&terminal(&button.id, "output"), &terminal(&led.id, "anode"), Some("thread"))?;
    sim.connect(&terminal(&led.id, "cathode"), &terminal(&battery.id, "negative"), Some("thread"))?;

    sim.toggle(&battery.id)?;
    println!("Battery on, button released: LED lit = {}", sim.last_report().is_lit(&led.id));

    sim.toggle(&button.id)?;
    println!("Button pressed: LED lit = {}", sim.last_report().is_lit(&led.id));
    println!("Closed loops: {}", sim.last_report().closed_loops);

    if let Some(path) = std::env::args().nth(1) {
        sim.save(Path::new(&path))?;
        println!("Saved snapshot to {}", path);
    }
    Ok(())
}
