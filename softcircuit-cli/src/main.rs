//! SoftCircuit CLI - simulate e-textile circuit snapshots from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use softcircuit::catalog::{CanvasPattern, COMPONENT_TYPES, CONNECTION_TYPES, FABRICS};
use softcircuit::{
    load_snapshot, CircuitSimulator, ComponentId, ComponentKind, PropagationReport,
    SimulatorOptions, SoftCircuitError,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "softcircuit")]
#[command(about = "E-textile circuit simulator for snapshot files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a snapshot, flip switches and report which LEDs light
    Simulate {
        /// Path to a snapshot .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Toggle a battery or button before reporting (repeatable)
        #[arg(short, long = "toggle", value_name = "ID")]
        toggles: Vec<String>,

        /// Exit with error code if no LED is lit
        #[arg(long)]
        fail_on_dark: bool,

        /// Ignore toggles on components that cannot be toggled
        #[arg(long)]
        lenient_toggle: bool,
    },

    /// Validate a snapshot file without printing the circuit
    Check {
        /// Path to a snapshot .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List component types, connection types, fabrics and patterns
    /// (-v adds terminals and wire properties)
    Catalog,

    /// Re-export a snapshot with recomputed LED states
    Export {
        /// Path to a snapshot .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Simulate {
            file,
            format,
            toggles,
            fail_on_dark,
            lenient_toggle,
        } => handle_simulate(&file, format, &toggles, fail_on_dark, lenient_toggle),
        Commands::Check { file } => handle_check(&file),
        Commands::Catalog => {
            handle_catalog(cli.verbose > 0);
            0
        }
        Commands::Export { file, output } => handle_export(&file, output.as_deref()),
    };

    process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_simulate(
    file: &Path,
    format: OutputFormat,
    toggles: &[String],
    fail_on_dark: bool,
    lenient_toggle: bool,
) -> i32 {
    let options = SimulatorOptions {
        strict_toggle: !lenient_toggle,
        ..SimulatorOptions::default()
    };

    let simulator = match simulate(file, options, toggles) {
        Ok(simulator) => simulator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let output = match format {
        OutputFormat::Human => Ok(output_human(file, &simulator)),
        OutputFormat::Json => output_json(file, &simulator),
    };
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    if fail_on_dark && simulator.last_report().lit_leds.is_empty() {
        return 1;
    }
    0
}

fn simulate(
    file: &Path,
    options: SimulatorOptions,
    toggles: &[String],
) -> Result<CircuitSimulator, SoftCircuitError> {
    let mut simulator = load_snapshot(file, options)?;
    for id in toggles {
        let state = simulator.toggle(&ComponentId::from(id.as_str()))?;
        tracing::debug!("Toggled {} -> {}", id, state);
    }
    Ok(simulator)
}

fn output_human(file: &Path, simulator: &CircuitSimulator) -> String {
    let report = simulator.last_report();
    let stats = simulator.stats();
    let mut lines = vec![
        format!("\nFile: {}", file.display()),
        "─".repeat(60),
    ];

    lines.push(String::from("\n  Components:"));
    for component in simulator.graph().components() {
        let marker = match component.kind {
            ComponentKind::Led if report.is_lit(&component.id) => "lit",
            ComponentKind::Led => "dark",
            ComponentKind::Battery | ComponentKind::Button => {
                if component.is_on() {
                    "on"
                } else {
                    "off"
                }
            }
            ComponentKind::Resistor => "-",
        };
        lines.push(format!(
            "    {:<10} {:<24} {}",
            component.kind.id(),
            component.id.as_str(),
            marker
        ));
    }

    if !report.energized.is_empty() {
        lines.push(String::from("\n  Energized:"));
        for id in &report.energized {
            lines.push(format!("    - {}", id));
        }
    }

    lines.push(String::from("\n  Summary:"));
    lines.push(format!("    Powered:      {}", if report.powered { "yes" } else { "no" }));
    lines.push(format!("    LEDs lit:     {}/{}", report.lit_leds.len(), stats.leds));
    lines.push(format!(
        "    Energized:    {}/{}",
        report.energized.len(),
        stats.connection_count
    ));
    lines.push(format!("    Closed loops: {}", report.closed_loops));
    lines.join("\n")
}

fn output_json(file: &Path, simulator: &CircuitSimulator) -> Result<String, serde_json::Error> {
    let report: &PropagationReport = simulator.last_report();
    let output = serde_json::json!({
        "file": file.display().to_string(),
        "report": report,
        "stats": simulator.stats(),
        "components": simulator.graph().components().map(|c| {
            serde_json::json!({
                "id": c.id,
                "type": c.kind,
                "state": c.state,
            })
        }).collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&output)
}

fn handle_check(file: &Path) -> i32 {
    match load_snapshot(file, SimulatorOptions::default()) {
        Ok(simulator) => {
            let stats = simulator.stats();
            println!(
                "OK: {} ({} components, {} connections)",
                file.display(),
                stats.component_count,
                stats.connection_count
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_export(file: &Path, output: Option<&Path>) -> i32 {
    let result = load_snapshot(file, SimulatorOptions::default()).and_then(|simulator| {
        match output {
            Some(path) => simulator.save(path).map(|_| None),
            None => Ok(Some(simulator.export_json()?)),
        }
    });

    match result {
        Ok(Some(json)) => {
            println!("{}", json);
            0
        }
        Ok(None) => {
            if let Some(path) = output {
                eprintln!("Wrote {}", path.display());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_catalog(verbose: bool) {
    println!("Components:\n");
    for def in COMPONENT_TYPES.iter() {
        let mut flags = Vec::new();
        if def.is_source {
            flags.push("source");
        }
        if def.toggleable {
            flags.push("toggleable");
        }
        println!("  {:<10} {:<20} {}", def.id, def.name, flags.join(", "));
        if verbose {
            for terminal in def.terminals {
                println!("      {:<10} {}", terminal.name, terminal.role);
            }
            if let Some(ohms) = def.resistance {
                println!("      resistance {} Ω", ohms);
            }
        }
    }

    println!("\nConnections:\n");
    for def in CONNECTION_TYPES.iter() {
        println!("  {:<10} {}", def.id, def.name);
        if verbose {
            println!(
                "      {} Ω/10cm, {} {}",
                def.resistance,
                def.color,
                if def.dashed { "stitched" } else { "solid" }
            );
        }
    }

    println!("\nFabrics:\n");
    for fabric in FABRICS.iter() {
        if verbose {
            println!("  {:<10} {:<10} {}", fabric.id, fabric.name, fabric.color);
        } else {
            println!("  {:<10} {}", fabric.id, fabric.name);
        }
    }

    println!("\nPatterns:\n");
    for pattern in CanvasPattern::ALL {
        println!("  {}", pattern.id());
    }

    println!("\nUse -v for terminals and wire properties.");
}
