//! Plain-text result reports.

use std::io::{self, Write};

use crate::analysis::{operating_point, run_sweep, Probe, SweepPoint, SweepPolicy};
use crate::circuit::{validate_circuit, Circuit};
use crate::components::Component;
use crate::error::{Result, SpiceError};
use crate::netlist::Netlist;
use crate::solver::CircuitSolver;

fn output_error(source: io::Error) -> SpiceError {
    SpiceError::OutputError { source }
}

/// DC results, one `NAME = value` line per probe.
pub fn write_dc(out: &mut impl Write, probes: &[Probe], values: &[f64]) -> Result<()> {
    for (probe, value) in probes.iter().zip(values) {
        writeln!(out, "{} = {}", probe.name(), value).map_err(output_error)?;
    }
    Ok(())
}

/// AC results as a tab-separated table: `step`, `frequency`, then one
/// column per probe. Failed points print the reason instead of values.
pub fn write_ac_table(out: &mut impl Write, probes: &[Probe], points: &[SweepPoint]) -> Result<()> {
    let mut header = vec!["step".to_string(), "frequency".to_string()];
    header.extend(probes.iter().map(Probe::name));
    writeln!(out, "{}", header.join("\t")).map_err(output_error)?;

    for point in points {
        write!(out, "{}\t{}", point.step, point.frequency_hz).map_err(output_error)?;
        match &point.outcome {
            Ok(values) => {
                for value in values {
                    write!(out, "\t{}", value).map_err(output_error)?;
                }
            }
            Err(SpiceError::SweepStep { source, .. }) => {
                write!(out, "\terror: {}", source).map_err(output_error)?
            }
            Err(err) => write!(out, "\terror: {}", err).map_err(output_error)?,
        }
        writeln!(out).map_err(output_error)?;
    }
    Ok(())
}

/// Terminal labels as written in a legacy netlist line (second terminal
/// first); op-amps list in+, in-, out.
fn written_terminals(component: &Component) -> String {
    let mut nodes = component.nodes();
    if nodes.len() == 2 {
        nodes.reverse();
    }
    nodes.join(", ")
}

/// Full report of a solved circuit: node potentials, then voltage, current
/// and power of every element, then the power dissipated in passive elements.
pub fn write_legacy_report(out: &mut impl Write, solver: &CircuitSolver) -> Result<()> {
    let circuit = solver.circuit();

    writeln!(out, "Node potentials:").map_err(output_error)?;
    let ground = circuit.ground();
    for label in std::iter::once(ground).chain(solver.node_labels().iter().map(String::as_str)) {
        let v = solver.node_voltage(label)?.re;
        writeln!(out, "\tV({}) = {} V", label, v).map_err(output_error)?;
    }
    writeln!(out).map_err(output_error)?;

    let mut passive_power = 0.0;
    for element in circuit.elements() {
        let name = &element.name;
        let v = solver.voltage(name)?.re;
        let i = solver.current(name)?.re;
        let p = solver.power(name)?.re;
        if matches!(element.component, Component::Passive(_)) {
            passive_power += p;
        }

        writeln!(out, "{} - [{}]:", name, written_terminals(&element.component))
            .map_err(output_error)?;
        writeln!(out, "\tV({}) = {} V", name, v).map_err(output_error)?;
        writeln!(out, "\tI({}) = {} A", name, i).map_err(output_error)?;
        writeln!(out, "\tP({}) = {} W", name, p).map_err(output_error)?;
        writeln!(out).map_err(output_error)?;
    }

    writeln!(out, "Total power: {} W.", passive_power).map_err(output_error)?;
    Ok(())
}

/// Run the analysis a netlist asks for (its `.ac` sweep, or the DC operating
/// point) and write the matching report.
pub fn run_netlist(out: &mut impl Write, netlist: Netlist, policy: SweepPolicy) -> Result<()> {
    let Netlist {
        circuit, ac, probes, ..
    } = netlist;
    validate_circuit(&circuit)?;
    let mut solver = CircuitSolver::new(circuit);

    match ac {
        Some(sweep) => {
            let points = run_sweep(&mut solver, &sweep, &probes, policy)?;
            write_ac_table(out, &probes, &points)
        }
        None => {
            let values = operating_point(&mut solver, &probes)?;
            write_dc(out, &probes, &values)
        }
    }
}

/// Solve a legacy circuit at DC and write the full report.
pub fn run_legacy(out: &mut impl Write, circuit: Circuit) -> Result<()> {
    validate_circuit(&circuit)?;
    let mut solver = CircuitSolver::new(circuit);
    solver.solve(0.0)?;
    write_legacy_report(out, &solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::analysis::{run_sweep, AcSweep, ComplexView, SweepKind, SweepPolicy};
    use crate::circuit::Circuit;

    fn divider() -> CircuitSolver {
        let circuit = Circuit::with_ground("1")
            .with("E1", Component::voltage_source("2", "1", 5.0, 0.0))
            .unwrap()
            .with("R1", Component::resistor("2", "3", 1e3))
            .unwrap()
            .with("R2", Component::resistor("3", "1", 1e3))
            .unwrap();
        CircuitSolver::new(circuit)
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_dc_lines() {
        let probes = [
            Probe::node_voltage("3", ComplexView::Default),
            Probe::current("R1", ComplexView::Magnitude),
        ];
        let text = render(|out| write_dc(out, &probes, &[2.5, 0.0025]));
        assert_eq!(text, "V(3) = 2.5\nImag(R1) = 0.0025\n");
    }

    fn reported(text: &str, key: &str) -> f64 {
        let prefix = format!("\t{} = ", key);
        let line = text.lines().find(|l| l.starts_with(&prefix)).unwrap();
        line[prefix.len()..].split(' ').next().unwrap().parse().unwrap()
    }

    #[test]
    fn test_ac_table() {
        let circuit = Circuit::new()
            .with("V1", Component::voltage_source("in", "0", 0.0, 1.0))
            .unwrap()
            .with("R1", Component::resistor("in", "out", 1e3))
            .unwrap()
            .with("R2", Component::resistor("out", "0", 1e3))
            .unwrap();
        let mut solver = CircuitSolver::new(circuit);
        let sweep = AcSweep::new(SweepKind::Linear, 2, 1.0, 2.0).unwrap();
        let probes = [
            Probe::node_voltage("out", ComplexView::Real),
            Probe::current("R9", ComplexView::Real),
        ];
        let points = run_sweep(&mut solver, &sweep, &probes[..1], SweepPolicy::Continue).unwrap();
        let text = render(|out| write_ac_table(out, &probes[..1], &points));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "step\tfrequency\tVre(out)");
        let cells: Vec<_> = lines[2].split('\t').collect();
        assert_eq!(cells[..2], ["1", "2"]);
        assert_relative_eq!(cells[2].parse::<f64>().unwrap(), 0.5, epsilon = 1e-12);

        let failed = run_sweep(&mut solver, &sweep, &probes, SweepPolicy::Continue).unwrap();
        let text = render(|out| write_ac_table(out, &probes, &failed));
        assert!(text
            .lines()
            .nth(1)
            .unwrap()
            .starts_with("0\t1\terror: Probing 'Ire(R9)' failed"));
    }

    #[test]
    fn test_legacy_report() {
        let mut solver = divider();
        solver.solve(0.0).unwrap();
        let text = render(|out| write_legacy_report(out, &solver));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Node potentials:");
        assert!(lines[1].starts_with("\tV(1) = "));
        assert!(lines[2].starts_with("\tV(2) = "));
        assert!(lines[3].starts_with("\tV(3) = "));
        assert!(lines.contains(&"E1 - [1, 2]:"));
        assert!(lines.contains(&"R1 - [3, 2]:"));
        assert!(lines.contains(&"R2 - [1, 3]:"));

        assert_relative_eq!(reported(&text, "V(1)"), 0.0);
        assert_relative_eq!(reported(&text, "V(3)"), 2.5, epsilon = 1e-12);
        assert_relative_eq!(reported(&text, "I(E1)"), -2.5e-3, epsilon = 1e-12);
        assert_relative_eq!(reported(&text, "P(R1)"), 6.25e-3, epsilon = 1e-12);

        let total = lines.last().unwrap();
        assert!(total.starts_with("Total power: ") && total.ends_with(" W."));
        let total: f64 = total["Total power: ".len()..total.len() - 3].parse().unwrap();
        assert_relative_eq!(total, 12.5e-3, epsilon = 1e-12);
    }

    #[test]
    fn test_legacy_report_requires_solution() {
        let solver = divider();
        let mut buffer = Vec::new();
        assert!(matches!(
            write_legacy_report(&mut buffer, &solver),
            Err(SpiceError::NotSolved)
        ));
    }

    #[test]
    fn test_run_netlist_dc_and_ac() {
        let dc = crate::netlist::parse("divider\nV1 1 0 10\nR1 1 2 1k\nR2 2 0 1k\n.print V(2)\n").unwrap();
        let text = render(|out| run_netlist(out, dc, SweepPolicy::Abort));
        assert!(text.starts_with("V(2) = "));
        let value: f64 = text.trim()["V(2) = ".len()..].parse().unwrap();
        assert_relative_eq!(value, 5.0, epsilon = 1e-9);

        let ac = crate::netlist::parse(
            "rc\nV1 1 0 AC 1\nR1 1 2 1k\nC1 2 0 1u\n.ac dec 2 10 100\n.print Vmag(2)\n",
        )
        .unwrap();
        let text = render(|out| run_netlist(out, ac, SweepPolicy::Abort));
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().next(), Some("step\tfrequency\tVmag(2)"));
    }

    #[test]
    fn test_run_validates_circuit() {
        let netlist = crate::netlist::parse("floating\nR1 1 2 1k\n").unwrap();
        let mut buffer = Vec::new();
        assert!(matches!(
            run_netlist(&mut buffer, netlist, SweepPolicy::Abort),
            Err(SpiceError::MissingGround { .. })
        ));
        assert!(matches!(
            run_legacy(&mut buffer, Circuit::with_ground("1")),
            Err(SpiceError::InvalidTopology { .. })
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_run_legacy() {
        let circuit = crate::netlist::parse_legacy("E 1 2 5\nR 2 3 1k\nR 3 1 1k\n").unwrap();
        let text = render(|out| run_legacy(out, circuit));
        assert!(text.starts_with("Node potentials:\n\tV(1) = 0 V\n"));
        assert_relative_eq!(reported(&text, "V(3)"), 2.5, epsilon = 1e-12);
    }
}
