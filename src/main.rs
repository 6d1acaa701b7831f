//! Ohmlab - DC schematic solver
//!
//! Solves a netlist once and prints every component's voltage and current.
//!
//! # Usage
//!
//! ```bash
//! ohmlab divider.net --supply 9 --set POT1.pos=0.25 -v
//! ```

use std::path::PathBuf;

use clap::Parser;
use ohmlab_core::{
    circuit::{validate_schematic, Schematic},
    dsl,
    error::{OhmlabError, Result},
    Workbench,
};
use tracing::Level;

/// DC steady-state solver for bench schematics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Supply voltage applied to every source
    #[arg(short, long)]
    supply: Option<f64>,

    /// Parameter edit applied before solving, e.g. R1.r=4.7k or SW1.state=closed
    #[arg(long = "set", value_name = "NAME.KEY=VALUE")]
    set: Vec<String>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let ast = dsl::parse_file(&args.netlist)?;
    let schematic = Schematic::from_ast(ast)?;
    validate_schematic(&schematic)?;

    let mut bench = Workbench::new(schematic);
    for edit in &args.set {
        apply_edit(&mut bench, edit)?;
    }
    bench.start(args.supply)?;

    println!("{:<10} {:<14} {:>12} {:>12}", "NAME", "KIND", "VOLTAGE", "CURRENT");
    for c in bench.schematic().components() {
        println!("{:<10} {:<14} {:>12.6} {:>12.6}", c.name, c.kind, c.voltage, c.current);
    }

    if !bench.readings().is_empty() {
        println!();
        for reading in bench.readings() {
            println!("{:<10} {}", reading.component, reading);
        }
    }

    Ok(())
}

/// Apply one `NAME.KEY=VALUE` edit.
fn apply_edit(bench: &mut Workbench, edit: &str) -> Result<()> {
    let bad = || OhmlabError::parse(0, format!("expected NAME.KEY=VALUE, got '{}'", edit));
    let (target, value) = edit.split_once('=').ok_or_else(bad)?;
    let (name, key) = target.split_once('.').ok_or_else(bad)?;

    match value.to_lowercase().as_str() {
        "closed" | "on" | "true" => bench.set_parameter(name, key, true),
        "open" | "off" | "false" => bench.set_parameter(name, key, false),
        _ => {
            let number = dsl::parse_value(value).ok_or_else(bad)?;
            bench.set_parameter(name, key, number)
        }
    }
}
