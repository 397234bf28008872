//! Parser for SPICE-style netlists.

use log::warn;

use super::ast::Netlist;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::analysis::{AcSweep, ComplexView, Probe, SweepKind};
use crate::circuit::{Circuit, DEFAULT_GROUND};
use crate::components::Component;
use crate::error::{Result, SpiceError};

/// One non-empty source line.
struct Line {
    number: usize,
    tokens: Vec<Token>,
}

impl Line {
    fn head(&self) -> &Token {
        &self.tokens[0]
    }

    fn args(&self) -> &[Token] {
        &self.tokens[1..]
    }
}

/// Map the ground aliases onto the ground label.
fn node_label(text: &str) -> String {
    if text.eq_ignore_ascii_case("gnd") {
        DEFAULT_GROUND.to_string()
    } else {
        text.to_string()
    }
}

fn is_word(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Identifier | TokenKind::Number)
}

/// Parser for SPICE-style netlists.
///
/// The first line is the title. Element lines come in any order relative to
/// commands; commands are interpreted once every element is known.
pub struct Parser<'a> {
    title: &'a str,
    body: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given netlist text.
    pub fn new(input: &'a str) -> Self {
        let (title, body) = input.split_once('\n').unwrap_or((input, ""));
        Self {
            title: title.trim(),
            body,
        }
    }

    /// Parse the entire netlist.
    pub fn parse(&self) -> Result<Netlist> {
        let mut netlist = Netlist::new(self.title);
        let mut commands = Vec::new();

        for line in self.lines()? {
            if line.head().kind == TokenKind::Directive {
                if line.head().text.eq_ignore_ascii_case(".end") {
                    break;
                }
                commands.push(line);
                continue;
            }

            let (name, component) = parse_element(&line)?;
            if netlist.circuit.contains(&name) {
                return Err(SpiceError::invalid_component(
                    name,
                    line.number,
                    "duplicate component name",
                ));
            }
            netlist.circuit.add(name, component)?;
        }

        for line in &commands {
            let command = line.head().text.to_lowercase();
            match command.as_str() {
                ".ac" => netlist.ac = Some(parse_ac(line)?),
                ".print" => netlist.probes.extend(parse_print(line, &netlist.circuit)?),
                _ => warn!("ignoring command '{}' at line {}", command, line.number),
            }
        }

        Ok(netlist)
    }

    /// Group the body's tokens into non-empty lines.
    fn lines(&self) -> Result<Vec<Line>> {
        let tokens = Lexer::new(self.body).starting_at_line(2).tokenize()?;

        let mut lines = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        for token in tokens {
            match token.kind {
                TokenKind::Newline | TokenKind::Eof => {
                    if let Some(first) = current.first() {
                        let number = first.line;
                        lines.push(Line {
                            number,
                            tokens: std::mem::take(&mut current),
                        });
                    }
                }
                _ => current.push(token),
            }
        }
        Ok(lines)
    }
}

fn expect_node(token: Option<&Token>, name: &str, line: usize) -> Result<String> {
    match token {
        Some(t) if is_word(t) => Ok(node_label(&t.text)),
        Some(t) => Err(SpiceError::invalid_component(
            name,
            line,
            format!("expected node, got '{}'", t.text),
        )),
        None => Err(SpiceError::invalid_component(name, line, "missing node")),
    }
}

fn expect_value(token: Option<&Token>, name: &str, line: usize) -> Result<f64> {
    match token {
        Some(t) => parse_value(&t.text).ok_or_else(|| {
            SpiceError::invalid_component(name, line, format!("invalid value '{}'", t.text))
        }),
        None => Err(SpiceError::invalid_component(name, line, "missing value")),
    }
}

fn parse_element(line: &Line) -> Result<(String, Component)> {
    let name = line.head().text.clone();
    let upper = name.to_uppercase();
    let args = line.args();
    let n = line.number;

    // OPA before the single-letter prefixes
    if upper.starts_with("OPA") {
        if args.len() != 3 {
            return Err(SpiceError::invalid_component(
                &name,
                n,
                format!("op-amp takes 3 nodes (in+ in- out), got {} arguments", args.len()),
            ));
        }
        let component = Component::opamp(
            expect_node(args.first(), &name, n)?,
            expect_node(args.get(1), &name, n)?,
            expect_node(args.get(2), &name, n)?,
        );
        return Ok((name, component));
    }

    let component = match upper.chars().next() {
        Some('R') => parse_passive(line, Component::resistor)?,
        Some('C') => parse_passive(line, Component::capacitor)?,
        Some('L') => parse_passive(line, Component::inductor)?,
        Some('V') | Some('E') => parse_source(line, Component::voltage_source)?,
        Some('I') => parse_source(line, Component::current_source)?,
        _ => {
            return Err(SpiceError::UnknownComponentType {
                component_type: name,
                line: n,
            })
        }
    };
    Ok((name, component))
}

/// `<name> a b value`, value strictly positive.
fn parse_passive(line: &Line, build: fn(String, String, f64) -> Component) -> Result<Component> {
    let name = &line.head().text;
    let args = line.args();
    let n = line.number;

    let a = expect_node(args.first(), name, n)?;
    let b = expect_node(args.get(1), name, n)?;
    let value = expect_value(args.get(2), name, n)?;
    if let Some(extra) = args.get(3) {
        return Err(SpiceError::invalid_component(
            name,
            n,
            format!("unexpected argument '{}'", extra.text),
        ));
    }
    if value <= 0.0 {
        return Err(SpiceError::invalid_component(name, n, "value must be positive"));
    }
    Ok(build(a, b, value))
}

/// `<name> pos neg [DC] value [AC acvalue]`; the DC value may be omitted
/// when an AC value is given.
fn parse_source(line: &Line, build: fn(String, String, f64, f64) -> Component) -> Result<Component> {
    let name = &line.head().text;
    let args = line.args();
    let n = line.number;

    let pos = expect_node(args.first(), name, n)?;
    let neg = expect_node(args.get(1), name, n)?;

    let mut rest = args[2.min(args.len())..].iter().peekable();
    let keyword = |t: &&Token, kw: &str| t.text.eq_ignore_ascii_case(kw);

    let mut dc = None;
    if rest.next_if(|t| keyword(t, "dc")).is_some() {
        dc = Some(expect_value(rest.next(), name, n)?);
    } else if let Some(t) = rest.next_if(|t| t.kind == TokenKind::Number) {
        dc = Some(expect_value(Some(t), name, n)?);
    }

    let mut ac = None;
    if rest.next_if(|t| keyword(t, "ac")).is_some() {
        ac = Some(expect_value(rest.next(), name, n)?);
    }

    if let Some(extra) = rest.next() {
        return Err(SpiceError::invalid_component(
            name,
            n,
            format!("unexpected argument '{}'", extra.text),
        ));
    }
    if dc.is_none() && ac.is_none() {
        return Err(SpiceError::invalid_component(name, n, "missing value"));
    }

    Ok(build(pos, neg, dc.unwrap_or(0.0), ac.unwrap_or(0.0)))
}

/// `.ac lin|dec|oct points fstart fstop`
fn parse_ac(line: &Line) -> Result<AcSweep> {
    let n = line.number;
    let args = line.args();
    if args.len() != 4 || !args.iter().all(is_word) {
        return Err(SpiceError::invalid_command(
            ".ac",
            n,
            "expected '.ac lin|dec|oct <points> <fstart> <fstop>'",
        ));
    }

    let kind = SweepKind::from_keyword(&args[0].text).ok_or_else(|| {
        SpiceError::invalid_command(".ac", n, format!("invalid sweep type '{}'", args[0].text))
    })?;
    let points: usize = args[1].text.parse().map_err(|_| {
        SpiceError::invalid_command(".ac", n, format!("invalid point count '{}'", args[1].text))
    })?;
    let frequency = |t: &Token| {
        parse_value(&t.text).ok_or_else(|| {
            SpiceError::invalid_command(".ac", n, format!("invalid frequency '{}'", t.text))
        })
    };
    let start = frequency(&args[2])?;
    let stop = frequency(&args[3])?;

    AcSweep::new(kind, points, start, stop).map_err(|_| {
        SpiceError::invalid_command(
            ".ac",
            n,
            format!(
                "need points > 0 and 0 < fstart < fstop (got {}, {}, {})",
                points, start, stop
            ),
        )
    })
}

/// `.print` followed by probes; bare words such as `dc` or `ac` are skipped.
fn parse_print(line: &Line, circuit: &Circuit) -> Result<Vec<Probe>> {
    let n = line.number;
    let tokens = line.args();
    let mut probes = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let head = &tokens[i];
        let opens = tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::OpenParen);
        if head.kind != TokenKind::Identifier || !opens {
            i += 1;
            continue;
        }

        let mut args = Vec::new();
        let mut j = i + 2;
        loop {
            match tokens.get(j) {
                Some(t) if t.kind == TokenKind::CloseParen => break,
                Some(t) if t.kind == TokenKind::Comma => {}
                Some(t) if is_word(t) => args.push(t.text.as_str()),
                Some(t) => {
                    return Err(SpiceError::invalid_command(
                        ".print",
                        n,
                        format!("unexpected '{}' in probe '{}'", t.text, head.text),
                    ))
                }
                None => {
                    return Err(SpiceError::invalid_command(
                        ".print",
                        n,
                        format!("missing ')' in probe '{}'", head.text),
                    ))
                }
            }
            j += 1;
        }

        probes.push(make_probe(&head.text, &args, circuit, n)?);
        i = j + 1;
    }

    Ok(probes)
}

fn make_probe(head: &str, args: &[&str], circuit: &Circuit, line: usize) -> Result<Probe> {
    let fail = |message: String| SpiceError::invalid_command(".print", line, message);

    let mut chars = head.chars();
    let quantity = chars.next().map(|c| c.to_ascii_lowercase());
    let suffix = chars.as_str();
    let view = ComplexView::from_suffix(suffix)
        .ok_or_else(|| fail(format!("invalid probing method '{}' in '{}'", suffix, head)))?;

    let element = |args: &[&str]| match args {
        [name] if circuit.contains(name) => Ok(name.to_string()),
        [name] => Err(fail(format!("unknown element '{}' in '{}'", name, head))),
        _ => Err(fail(format!("'{}' takes exactly one element name", head))),
    };

    match quantity {
        Some('v') => match args {
            [target] if circuit.contains(target) => Ok(Probe::element_voltage(*target, view)),
            [node] => Ok(Probe::node_voltage(node_label(node), view)),
            [pos, neg] => Ok(Probe::voltage_between(node_label(pos), node_label(neg), view)),
            _ => Err(fail(format!("'{}' takes one or two arguments", head))),
        },
        Some('i') => Ok(Probe::current(element(args)?, view)),
        Some('p') => Ok(Probe::power(element(args)?, view)),
        _ => Err(fail(format!("unknown probe '{}'", head))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Measurement;

    fn parse(input: &str) -> Result<Netlist> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parse_elements() {
        let netlist = parse(
            "RC filter\n\
             V1 in 0 DC 1 AC 2\n\
             R1 in out 10k\n\
             C1 out GND 1u\n\
             L1 out 0 1m\n\
             I1 0 out 1u\n\
             OPA1 out fb 7\n",
        )
        .unwrap();

        assert_eq!(netlist.title, "RC filter");
        assert_eq!(netlist.circuit.len(), 6);
        assert_eq!(
            netlist.circuit.get("V1"),
            Some(&Component::voltage_source("in", "0", 1.0, 2.0))
        );
        assert_eq!(
            netlist.circuit.get("C1"),
            Some(&Component::capacitor("out", "0", 1e-6))
        );
        assert_eq!(netlist.circuit.get("OPA1"), Some(&Component::opamp("out", "fb", "7")));
        assert!(netlist.ac.is_none());
        assert!(netlist.probes.is_empty());
    }

    #[test]
    fn test_source_value_forms() {
        let netlist = parse("t\nV1 1 0 5\nE2 2 0 AC 1\nI3 3 0 dc 2m\n").unwrap();
        assert_eq!(netlist.circuit.get("V1"), Some(&Component::voltage_source("1", "0", 5.0, 0.0)));
        assert_eq!(netlist.circuit.get("E2"), Some(&Component::voltage_source("2", "0", 0.0, 1.0)));
        assert_eq!(netlist.circuit.get("I3"), Some(&Component::current_source("3", "0", 2e-3, 0.0)));

        assert!(parse("t\nV1 1 0\n").is_err());
        assert!(parse("t\nV1 1 0 5 AC\n").is_err());
        assert!(parse("t\nV1 1 0 5 6\n").is_err());
    }

    #[test]
    fn test_ac_command() {
        let netlist = parse("t\n.ac dec 10 1 1meg\nR1 1 0 1k\n").unwrap();
        let ac = netlist.ac.unwrap();
        assert_eq!(ac.kind, SweepKind::Decade);
        assert_eq!(ac.points, 10);
        assert_eq!(ac.start_hz, 1.0);
        assert_eq!(ac.stop_hz, 1e6);
    }

    #[test]
    fn test_bad_ac_commands() {
        for command in [
            ".ac dec 10 1",
            ".ac log 10 1 10",
            ".ac lin 0 1 10",
            ".ac lin 5 10 1",
            ".ac lin 5 0 10",
            ".ac lin 2.5 1 10",
        ] {
            let input = format!("t\nR1 1 0 1\n{}\n", command);
            assert!(
                matches!(parse(&input), Err(SpiceError::InvalidCommand { line: 3, .. })),
                "{}",
                command
            );
        }
    }

    #[test]
    fn test_print_probes() {
        let netlist = parse(
            "t\n\
             .print dc V(2) Vmag(2, 3) V(R1) Iph(R1) P(V1) v(gnd)\n\
             V1 2 0 1\n\
             R1 2 3 1k\n\
             R2 3 0 1k\n",
        )
        .unwrap();

        let names: Vec<_> = netlist.probes.iter().map(Probe::name).collect();
        assert_eq!(names, ["V(2)", "Vmag(2, 3)", "V(R1)", "Ip(R1)", "P(V1)", "V(0)"]);
        assert_eq!(
            netlist.probes[2].measurement,
            Measurement::ElementVoltage("R1".to_string())
        );
        assert_eq!(netlist.probes[3].view, ComplexView::Phase);
    }

    #[test]
    fn test_bad_probes() {
        for print in [".print I(R9)", ".print P(1, 2)", ".print Vabs(1)", ".print Q(1)", ".print V(1"] {
            let input = format!("t\nR1 1 0 1\n{}\n", print);
            assert!(
                matches!(parse(&input), Err(SpiceError::InvalidCommand { .. })),
                "{}",
                print
            );
        }
    }

    #[test]
    fn test_element_errors() {
        assert!(matches!(
            parse("t\nR1 1 0 1k\nR1 2 0 1k\n"),
            Err(SpiceError::InvalidComponent { line: 3, .. })
        ));
        assert!(matches!(
            parse("t\nX1 1 0 1k\n"),
            Err(SpiceError::UnknownComponentType { line: 2, .. })
        ));
        assert!(matches!(
            parse("t\nR1 1 0 -1k\n"),
            Err(SpiceError::InvalidComponent { .. })
        ));
        assert!(matches!(
            parse("t\nR1 1 0 10kohm\n"),
            Err(SpiceError::InvalidComponent { .. })
        ));
        assert!(parse("t\nOPA1 1 2\n").is_err());
        assert!(parse("t\nR1 1 ( 1\n").is_err());
    }

    #[test]
    fn test_end_and_unknown_commands() {
        let netlist = parse("t\n.op\nR1 1 0 1\n.end\nR2 bogus line\n").unwrap();
        assert_eq!(netlist.circuit.len(), 1);
    }

    #[test]
    fn test_title_only() {
        let netlist = parse("just a title").unwrap();
        assert_eq!(netlist.title, "just a title");
        assert!(netlist.circuit.is_empty());
    }
}
