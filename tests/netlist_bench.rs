//! Netlist text through to bench readings.

use approx::assert_relative_eq;
use ohmlab_core::circuit::validate_schematic;
use ohmlab_core::solver::MeterKind;
use ohmlab_core::{dsl, OhmlabError, Schematic, Workbench};

const FLASHLIGHT: &str = "\
# Two bulbs behind a switch, with a dimmer on the second
.supply 4.5

V1    plus  GND  6
SW1   plus  a    open
AM1   a     b
R1    b     GND  45
POT1  b     c    100 0.5
R2    c     GND  50
VM1   b     GND
";

#[test]
fn netlist_solves_end_to_end() {
    let ast = dsl::parse(FLASHLIGHT).unwrap();
    assert_eq!(ast.supply, Some(4.5));
    let mut schematic = Schematic::from_ast(ast).unwrap();
    assert!(validate_schematic(&schematic).unwrap().is_empty());

    let report = ohmlab_core::DcSolver::new()
        .solve_schematic(&mut schematic, Some(4.5))
        .unwrap();
    // Switch open: nothing flows
    assert_eq!(schematic.component_by_name("R1").unwrap().current, 0.0);
    assert_eq!(report.readings.len(), 2);
    assert_eq!(report.readings[0].meter, MeterKind::Ammeter);
    assert_eq!(report.readings[1].meter, MeterKind::Voltmeter);
}

#[test]
fn bench_session_follows_edits() {
    let mut bench = Workbench::from_netlist(FLASHLIGHT).unwrap();
    assert_eq!(bench.supply(), Some(4.5));
    bench.start(None).unwrap();
    assert_eq!(bench.readings()[0].to_string(), "0.0mA");

    // Close the switch: 45 || (50 + 50) = 31.03 ohms behind a 1 mOhm switch and ammeter
    assert!(bench.toggle_switch("SW1").unwrap());
    let load = 1.0 / (1.0 / 45.0 + 1.0 / 100.0);
    let total = 4.5 / (load + 2e-3);
    let am = bench.readings()[0].value;
    assert_relative_eq!(am, total, max_relative = 1e-6);
    assert_eq!(bench.readings()[0].to_string(), format!("{:.2}A", total));

    // Turn the dimmer all the way down
    bench.set_parameter("POT1", "pos", 0.0).unwrap();
    let load = 1.0 / (1.0 / 45.0 + 1.0 / 50.001);
    let vb = 4.5 * load / (load + 2e-3);
    let r2 = bench.component("R2").unwrap();
    assert_relative_eq!(r2.voltage, vb * 50.0 / 50.001, max_relative = 1e-6);
    let am = bench.readings()[0].value;

    bench.stop();
    bench.set_supply(9.0).unwrap();
    // Stopped: the displayed values stay put
    assert_relative_eq!(bench.readings()[0].value, am, max_relative = 1e-12);
    bench.start(None).unwrap();
    assert!(bench.readings()[1].value > 8.9);

    bench.reset();
    assert!(bench.readings().is_empty());
    assert!(bench
        .schematic()
        .components()
        .iter()
        .all(|c| c.voltage == 0.0 && c.current == 0.0));
}

#[test]
fn failed_edit_keeps_previous_values() {
    let mut bench = Workbench::from_netlist("V1 top 0 9\nR1 top 0 90\n").unwrap();
    bench.start(None).unwrap();
    assert_relative_eq!(bench.component("R1").unwrap().current, 0.1, max_relative = 1e-12);

    let err = bench.set_parameter("R1", "r", f64::NAN).unwrap_err();
    assert!(err.is_solve_failure());
    assert_relative_eq!(bench.component("R1").unwrap().current, 0.1, max_relative = 1e-12);

    // Fixing the value recovers
    bench.set_parameter("R1", "r", 45.0).unwrap();
    assert_relative_eq!(bench.component("R1").unwrap().current, 0.2, max_relative = 1e-12);
}

#[test]
fn ground_alias_and_explicit_ground() {
    let mut a = Workbench::from_netlist("V1 p gnd 5\nR1 p GND 10\n").unwrap();
    a.start(None).unwrap();
    let mut b = Workbench::from_netlist(".ground n\nV1 p n 5\nR1 p n 10\n").unwrap();
    b.start(None).unwrap();
    assert_eq!(
        a.component("R1").unwrap().current.to_bits(),
        b.component("R1").unwrap().current.to_bits()
    );
}

#[test]
fn netlist_errors_carry_lines() {
    let err = Workbench::from_netlist("V1 a 0 5\nQ1 a b c\n").err().unwrap();
    assert!(matches!(err, OhmlabError::UnknownComponentType { line: 2, .. }));
    assert!(!err.is_solve_failure());

    let err = Workbench::from_netlist("V1 a 0 5\nR1 a 0 1 2\n").err().unwrap();
    assert!(matches!(err, OhmlabError::InvalidComponent { line: 2, .. }));
}

#[test]
fn self_shorted_source_in_netlist() {
    let mut bench = Workbench::from_netlist("V1 a a 5\nR1 a 0 10\n").unwrap();
    assert!(matches!(bench.start(None), Err(OhmlabError::SingularSystem)));
}

#[test]
fn digit_leading_nets_are_not_merged() {
    let mut bench = Workbench::from_netlist("V1 1a 0 5\nR1 1a 1b 100\nR2 1b 0 100\n").unwrap();
    bench.start(None).unwrap();
    for name in ["R1", "R2"] {
        let r = bench.component(name).unwrap();
        assert_relative_eq!(r.voltage, 2.5, max_relative = 1e-9);
        assert_relative_eq!(r.current, 0.025, max_relative = 1e-9);
    }
}
