//! Solver behavior on small hand-built schematics.

use approx::assert_relative_eq;
use ohmlab_core::circuit::{ComponentId, Terminal};
use ohmlab_core::components::params::{CLOSED, MAX_RESISTANCE, RESISTANCE, SLIDER_POSITION, VOLTAGE};
use ohmlab_core::components::{ComponentKind, Parameters};
use ohmlab_core::{DcSolver, OhmlabError, Schematic};

fn source(s: &mut Schematic, name: &str, volts: f64) -> ComponentId {
    s.add_component(name, ComponentKind::VoltageSource, Parameters::new().with(VOLTAGE, volts))
        .unwrap()
}

fn resistor(s: &mut Schematic, name: &str, ohms: f64) -> ComponentId {
    s.add_component(name, ComponentKind::Resistor, Parameters::new().with(RESISTANCE, ohms))
        .unwrap()
}

fn part(s: &mut Schematic, name: &str, kind: ComponentKind) -> ComponentId {
    s.add_component(name, kind, Parameters::new()).unwrap()
}

/// Chain components in series around `source`: V.a -> c0 -> c1 -> ... -> V.b
fn series_loop(s: &mut Schematic, v: ComponentId, chain: &[ComponentId]) {
    let mut prev = Terminal::a(v);
    for &c in chain {
        s.connect(prev, Terminal::a(c)).unwrap();
        prev = Terminal::b(c);
    }
    s.connect(prev, Terminal::b(v)).unwrap();
    s.set_reference(Terminal::b(v)).unwrap();
}

fn current(s: &Schematic, name: &str) -> f64 {
    s.component_by_name(name).unwrap().current
}

fn voltage(s: &Schematic, name: &str) -> f64 {
    s.component_by_name(name).unwrap().voltage
}

#[test]
fn series_divider() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 12.0);
    let r1 = resistor(&mut s, "R1", 1000.0);
    let r2 = resistor(&mut s, "R2", 3000.0);
    series_loop(&mut s, v, &[r1, r2]);

    DcSolver::new().solve_schematic(&mut s, None).unwrap();

    assert_relative_eq!(voltage(&s, "R1"), 3.0, max_relative = 1e-12);
    assert_relative_eq!(voltage(&s, "R2"), 9.0, max_relative = 1e-12);
    assert_relative_eq!(current(&s, "R1"), 3e-3, max_relative = 1e-12);
    assert_relative_eq!(current(&s, "R2"), 3e-3, max_relative = 1e-12);
    assert_relative_eq!(current(&s, "V1"), -3e-3, max_relative = 1e-12);
}

#[test]
fn parallel_currents_sum() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 12.0);
    let r1 = resistor(&mut s, "R1", 100.0);
    let r2 = resistor(&mut s, "R2", 300.0);
    for r in [r1, r2] {
        s.connect(Terminal::a(v), Terminal::a(r)).unwrap();
        s.connect(Terminal::b(v), Terminal::b(r)).unwrap();
    }
    s.set_reference(Terminal::b(v)).unwrap();

    DcSolver::new().solve_schematic(&mut s, None).unwrap();

    assert_relative_eq!(current(&s, "R1"), 0.12, max_relative = 1e-12);
    assert_relative_eq!(current(&s, "R2"), 0.04, max_relative = 1e-12);
    assert_relative_eq!(-current(&s, "V1"), current(&s, "R1") + current(&s, "R2"), max_relative = 1e-12);
    assert_relative_eq!(voltage(&s, "R1"), 12.0, max_relative = 1e-12);
    assert_relative_eq!(voltage(&s, "R2"), 12.0, max_relative = 1e-12);
}

#[test]
fn open_switch_stops_current_without_failing() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 5.0);
    let sw = s
        .add_component("SW1", ComponentKind::Switch, Parameters::new().with(CLOSED, false))
        .unwrap();
    let r = resistor(&mut s, "R1", 50.0);
    series_loop(&mut s, v, &[sw, r]);

    DcSolver::new().solve_schematic(&mut s, None).unwrap();
    assert_eq!(current(&s, "R1"), 0.0);
    assert_eq!(current(&s, "SW1"), 0.0);
    assert_eq!(current(&s, "V1"), 0.0);
    assert_relative_eq!(voltage(&s, "SW1"), 5.0, max_relative = 1e-12);
}

#[test]
fn meters_barely_disturb_the_circuit() {
    // Bare divider
    let mut bare = Schematic::new();
    let v = source(&mut bare, "V1", 10.0);
    let r1 = resistor(&mut bare, "R1", 10_000.0);
    let r2 = resistor(&mut bare, "R2", 10_000.0);
    series_loop(&mut bare, v, &[r1, r2]);
    DcSolver::new().solve_schematic(&mut bare, None).unwrap();

    // Same divider with an ammeter in series and a voltmeter across R2
    let mut metered = Schematic::new();
    let v = source(&mut metered, "V1", 10.0);
    let am = part(&mut metered, "AM1", ComponentKind::Ammeter);
    let r1 = resistor(&mut metered, "R1", 10_000.0);
    let r2 = resistor(&mut metered, "R2", 10_000.0);
    let vm = part(&mut metered, "VM1", ComponentKind::Voltmeter);
    series_loop(&mut metered, v, &[am, r1, r2]);
    metered.connect(Terminal::a(vm), Terminal::a(r2)).unwrap();
    metered.connect(Terminal::b(vm), Terminal::b(r2)).unwrap();
    let report = DcSolver::new().solve_schematic(&mut metered, None).unwrap();

    for name in ["R1", "R2"] {
        assert_relative_eq!(current(&metered, name), current(&bare, name), max_relative = 1e-4);
        assert_relative_eq!(voltage(&metered, name), voltage(&bare, name), max_relative = 1e-4);
    }
    assert_eq!(current(&metered, "AM1"), 0.0);
    assert_eq!(current(&metered, "VM1"), 0.0);

    let am = report.reading("AM1").unwrap();
    assert_relative_eq!(am.value, 5e-4, max_relative = 1e-4);
    let vm = report.reading("VM1").unwrap();
    assert_relative_eq!(vm.value, 5.0, max_relative = 1e-4);
}

#[test]
fn source_shorted_by_wiring_is_singular() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 9.0);
    let r = resistor(&mut s, "R1", 10.0);
    series_loop(&mut s, v, &[r]);
    s.connect(Terminal::a(v), Terminal::b(v)).unwrap();

    let err = DcSolver::new().solve_schematic(&mut s, None).unwrap_err();
    assert!(matches!(err, OhmlabError::SingularSystem));
    assert!(err.is_solve_failure());
    assert_eq!(current(&s, "R1"), 0.0);
}

#[test]
fn source_shorted_by_wire_element_is_solvable() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 1.0);
    let w = part(&mut s, "W1", ComponentKind::Wire);
    series_loop(&mut s, v, &[w]);

    DcSolver::new().solve_schematic(&mut s, None).unwrap();
    // 1 V across the 1 mOhm wire
    assert_relative_eq!(current(&s, "W1"), 1000.0, max_relative = 1e-9);
}

#[test]
fn disconnected_resistor_does_not_disturb_the_rest() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 6.0);
    let r1 = resistor(&mut s, "R1", 200.0);
    series_loop(&mut s, v, &[r1]);
    resistor(&mut s, "R_LOOSE", 470.0);

    let report = DcSolver::new().solve_schematic(&mut s, None).unwrap();
    assert_eq!(voltage(&s, "R_LOOSE"), 0.0);
    assert_eq!(current(&s, "R_LOOSE"), 0.0);
    assert_relative_eq!(current(&s, "R1"), 0.03, max_relative = 1e-12);
    assert_eq!(report.islands, 2);
}

#[test]
fn floating_loop_solves_against_its_own_reference() {
    let mut s = Schematic::new();
    let v1 = source(&mut s, "V1", 6.0);
    let r1 = resistor(&mut s, "R1", 200.0);
    series_loop(&mut s, v1, &[r1]);

    // Second loop with no wire to the first
    let v2 = source(&mut s, "V2", 2.0);
    let r2 = resistor(&mut s, "R2", 100.0);
    s.connect(Terminal::a(v2), Terminal::a(r2)).unwrap();
    s.connect(Terminal::b(r2), Terminal::b(v2)).unwrap();

    DcSolver::new().solve_schematic(&mut s, None).unwrap();
    assert_relative_eq!(current(&s, "R2"), 0.02, max_relative = 1e-12);
    assert_relative_eq!(current(&s, "R1"), 0.03, max_relative = 1e-12);
}

#[test]
fn empty_schematic_has_no_topology() {
    let mut s = Schematic::new();
    let err = DcSolver::new().solve_schematic(&mut s, None).unwrap_err();
    assert!(matches!(err, OhmlabError::NoTopology));
}

#[test]
fn potentiometer_position_is_clamped() {
    let build = |position: f64| {
        let mut s = Schematic::new();
        let v = source(&mut s, "V1", 10.0);
        let pot = s
            .add_component(
                "POT1",
                ComponentKind::Potentiometer,
                Parameters::new()
                    .with(MAX_RESISTANCE, 100.0)
                    .with(SLIDER_POSITION, position),
            )
            .unwrap();
        series_loop(&mut s, v, &[pot]);
        DcSolver::new().solve_schematic(&mut s, None).unwrap();
        current(&s, "POT1")
    };

    assert_relative_eq!(build(0.25), 0.4, max_relative = 1e-12);
    assert_relative_eq!(build(2.0), 0.1, max_relative = 1e-12);
    // Position 0 bottoms out at the short resistance instead of dividing by zero
    assert!(build(-1.0).is_finite());
}

#[test]
fn malformed_parameter_fails_without_writing() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 10.0);
    let r1 = resistor(&mut s, "R1", 100.0);
    let r2 = s
        .add_component("R2", ComponentKind::Resistor, Parameters::new().with(RESISTANCE, true))
        .unwrap();
    series_loop(&mut s, v, &[r1, r2]);

    let err = DcSolver::new().solve_schematic(&mut s, None).unwrap_err();
    assert!(matches!(err, OhmlabError::MalformedComponent { ref component, .. } if component == "R2"));
    assert!(s.components().iter().all(|c| c.voltage == 0.0 && c.current == 0.0));
}

#[test]
fn infinite_resistance_is_open() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 10.0);
    let r = resistor(&mut s, "R1", f64::INFINITY);
    series_loop(&mut s, v, &[r]);

    DcSolver::new().solve_schematic(&mut s, None).unwrap();
    assert_eq!(current(&s, "R1"), 0.0);
    assert_relative_eq!(voltage(&s, "R1"), 10.0, max_relative = 1e-12);
}

#[test]
fn repeated_solves_are_bit_identical() {
    let mut s = Schematic::new();
    let v = source(&mut s, "V1", 7.3);
    let r1 = resistor(&mut s, "R1", 330.0);
    let r2 = resistor(&mut s, "R2", 470.0);
    let r3 = resistor(&mut s, "R3", 1200.0);
    series_loop(&mut s, v, &[r1, r2]);
    s.connect(Terminal::a(r3), Terminal::b(r1)).unwrap();
    s.connect(Terminal::b(r3), Terminal::b(v)).unwrap();

    let solver = DcSolver::new();
    solver.solve_schematic(&mut s, None).unwrap();
    let first: Vec<(u64, u64)> = s
        .components()
        .iter()
        .map(|c| (c.voltage.to_bits(), c.current.to_bits()))
        .collect();

    // Solving again from the written outputs changes nothing
    solver.solve_schematic(&mut s, None).unwrap();
    let second: Vec<(u64, u64)> = s
        .components()
        .iter()
        .map(|c| (c.voltage.to_bits(), c.current.to_bits()))
        .collect();
    assert_eq!(first, second);

    // Nor does starting from a fresh copy
    let mut fresh = s.clone();
    fresh.clear_outputs();
    solver.solve_schematic(&mut fresh, None).unwrap();
    assert_eq!(s.components(), fresh.components());
}

#[test]
fn supply_override_beats_source_parameter() {
    let mut s = Schematic::new();
    let v1 = source(&mut s, "V1", 3.0);
    let r1 = resistor(&mut s, "R1", 100.0);
    series_loop(&mut s, v1, &[r1]);

    DcSolver::new().solve_schematic(&mut s, Some(5.0)).unwrap();
    assert_relative_eq!(current(&s, "R1"), 0.05, max_relative = 1e-12);
    assert!(matches!(
        DcSolver::new().solve_schematic(&mut s, Some(f64::NAN)),
        Err(OhmlabError::InvalidSolveParam { .. })
    ));
    assert_relative_eq!(current(&s, "R1"), 0.05, max_relative = 1e-12);
}

#[test]
fn unknown_terminal_is_rejected() {
    use ohmlab_core::circuit::{identify_nodes, Connection};
    let connections = [Connection::new(Terminal::a(ComponentId(0)), Terminal::b(ComponentId(4)))];
    assert!(matches!(
        identify_nodes(2, &connections, None),
        Err(OhmlabError::UnknownTerminal { .. })
    ));
}
