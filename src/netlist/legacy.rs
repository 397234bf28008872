//! Reader for the legacy resistor/source netlist format.
//!
//! Each non-empty line is `<T> <n1> <n2> <value>` with `T` one of `R`
//! (resistor), `I` (current source) or `E` (voltage source) and integer node
//! numbers. The element's first terminal is `n2` and its second is `n1`, so
//! `E 3 2 -5` drives node 2 to -5 V relative to node 3. Node 1 is ground.
//! Elements get names by type in order of appearance: `R1`, `R2`, ...

use super::lexer::parse_value;
use crate::circuit::Circuit;
use crate::components::Component;
use crate::error::{Result, SpiceError};

/// Ground label of legacy netlists.
pub const LEGACY_GROUND: &str = "1";

fn node(text: &str, line: usize) -> Result<String> {
    text.parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|_| SpiceError::parse(line, format!("invalid node number '{}'", text)))
}

/// Parse a legacy netlist into a circuit grounded at node `1`.
pub fn parse_legacy(input: &str) -> Result<Circuit> {
    let mut circuit = Circuit::with_ground(LEGACY_GROUND);
    let (mut resistors, mut current_sources, mut voltage_sources) = (0, 0, 0);

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [kind, n1, n2, value] = fields[..] else {
            if fields.is_empty() {
                continue;
            }
            return Err(SpiceError::parse(
                line,
                format!("expected '<type> <node> <node> <value>', got '{}'", text.trim()),
            ));
        };

        let first = node(n2, line)?;
        let second = node(n1, line)?;
        let value = parse_value(value)
            .ok_or_else(|| SpiceError::parse(line, format!("invalid value '{}'", value)))?;

        let (name, component) = match kind.to_ascii_uppercase().as_str() {
            "R" => {
                if value <= 0.0 {
                    return Err(SpiceError::parse(line, "resistance must be positive"));
                }
                resistors += 1;
                (format!("R{}", resistors), Component::resistor(first, second, value))
            }
            "I" => {
                current_sources += 1;
                (
                    format!("I{}", current_sources),
                    Component::current_source(first, second, value, 0.0),
                )
            }
            "E" => {
                voltage_sources += 1;
                (
                    format!("E{}", voltage_sources),
                    Component::voltage_source(first, second, value, 0.0),
                )
            }
            _ => {
                return Err(SpiceError::UnknownComponentType {
                    component_type: kind.to_string(),
                    line,
                })
            }
        };
        circuit.add(name, component)?;
    }

    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_order_and_names() {
        let circuit = parse_legacy("R 4 2 2\nI 5 4 2\n\nE 3 2 -5\nr 3 1 15\n").unwrap();
        assert_eq!(circuit.ground(), "1");
        let names: Vec<_> = circuit.elements().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["R1", "I1", "E1", "R2"]);
        assert_eq!(circuit.get("R1"), Some(&Component::resistor("2", "4", 2.0)));
        assert_eq!(
            circuit.get("E1"),
            Some(&Component::voltage_source("2", "3", -5.0, 0.0))
        );
        assert_eq!(
            circuit.get("I1"),
            Some(&Component::current_source("4", "5", 2.0, 0.0))
        );
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert!(matches!(
            parse_legacy("R 1 2 3\nR 1 2\n"),
            Err(SpiceError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            parse_legacy("R 1 2 3\nR 1 x 3\n"),
            Err(SpiceError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            parse_legacy("\nC 1 2 3\n"),
            Err(SpiceError::UnknownComponentType { line: 2, .. })
        ));
        assert!(matches!(
            parse_legacy("R 1 2 0\n"),
            Err(SpiceError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_node_numbers_are_normalised() {
        let circuit = parse_legacy("R 01 +2 1k\n").unwrap();
        assert_eq!(circuit.get("R1"), Some(&Component::resistor("2", "1", 1e3)));
    }
}
