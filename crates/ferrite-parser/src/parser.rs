use crate::analyses::{Directive, parse_directive};
use crate::circuit::Circuit;
use crate::elements::bjt::BJT;
use crate::elements::capacitor::Capacitor;
use crate::elements::controlled_source::{CCCS, CCVS, VCCS, VCVS};
use crate::elements::current_source::CurrentSource;
use crate::elements::diode::Diode;
use crate::elements::inductor::Inductor;
use crate::elements::logic_gate::LogicGate;
use crate::elements::mosfet::Mosfet;
use crate::elements::opamp::{FiniteGainOpAmp, OpAmp};
use crate::elements::pwl_resistor::PwlResistor;
use crate::elements::resistor::Resistor;
use crate::elements::voltage_source::VoltageSource;
use crate::prelude::*;
use std::path::Path;

/// A parsed netlist: the circuit topology plus the mandatory trailing
/// simulation directive.
#[derive(Debug, Clone)]
pub struct Netlist {
    pub circuit: Circuit,
    pub directive: Directive,
}

/// Parses a SPICE-like single-file netlist.
///
/// Line rules:
/// - The first non-comment line is an integer node count (informational;
///   mismatches against the observed node count are logged, not fatal).
/// - The last non-comment line is a `.TRAN` or `.AC` directive.
/// - Every line in between describes one element; its leading character
///   selects the variant, case-sensitively.
/// - `%` or `*` start a comment that runs to the end of the line.
pub fn parse_netlist(input: &str) -> Result<Netlist> {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('*') && !l.starts_with('%'))
        .collect();

    if lines.is_empty() {
        return Err(Error::EmptyNetlist);
    }

    let (header_line, header) = lines[0];
    let declared_nodes: usize = header.parse().map_err(|_| Error::ParseError {
        line: header_line,
        message: format!("invalid node count header '{header}'"),
    })?;

    let (_, last) = *lines.last().unwrap();
    if !last.starts_with('.') {
        return Err(Error::MissingDirective);
    }
    let directive = parse_directive(last)?;

    let mut circuit = Circuit::new();
    for &(line_num, line) in &lines[1..lines.len() - 1] {
        let element = parse_element_line(line).map_err(|e| Error::ParseError {
            line: line_num,
            message: e.to_string(),
        })?;
        circuit.add(element);
    }

    if circuit.is_empty() {
        return Err(Error::EmptyNetlist);
    }

    if circuit.number_of_nodes() != declared_nodes {
        log::warn!(
            "declared node count {} does not match the {} distinct node(s) observed",
            declared_nodes,
            circuit.number_of_nodes()
        );
    }

    Ok(Netlist { circuit, directive })
}

fn parse_element_line(line: &str) -> Result<Element> {
    let first = line
        .chars()
        .next()
        .ok_or_else(|| Error::InvalidElement(line.to_string()))?;

    let result: std::result::Result<Element, Error> = match first {
        'R' => line.parse::<Resistor>().map(Element::from),
        'C' => line.parse::<Capacitor>().map(Element::from),
        'L' => line.parse::<Inductor>().map(Element::from),
        'N' => line.parse::<PwlResistor>().map(Element::from),
        'O' => line.parse::<OpAmp>().map(Element::from),
        'A' => line.parse::<FiniteGainOpAmp>().map(Element::from),
        'E' => line.parse::<VCVS>().map(Element::from),
        'F' => line.parse::<CCCS>().map(Element::from),
        'G' => line.parse::<VCCS>().map(Element::from),
        'H' => line.parse::<CCVS>().map(Element::from),
        'V' => line.parse::<VoltageSource>().map(Element::from),
        'I' => line.parse::<CurrentSource>().map(Element::from),
        'D' => line.parse::<Diode>().map(Element::from),
        'Q' => line.parse::<BJT>().map(Element::from),
        'M' => line.parse::<Mosfet>().map(Element::from),
        '>' | ')' | '(' | '}' | '{' | ']' | '[' => line.parse::<LogicGate>().map(Element::from),
        _ => return Err(Error::InvalidElement(line.to_string())),
    };

    result.map_err(|_| Error::InvalidElement(line.to_string()))
}

pub fn parse_netlist_file(path: &Path) -> Result<Netlist> {
    let contents = std::fs::read_to_string(path)?;
    parse_netlist(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rc_netlist() {
        let netlist = "2\nV1 1 0 DC 1\nR1 1 2 1000\nC1 2 0 1e-6 IC=0\n.TRAN 10e-3 1e-4 BE 1";
        let parsed = parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 3);
        assert_eq!(parsed.circuit.number_of_nodes(), 2);
        assert!(matches!(parsed.directive, Directive::Tran(_)));
    }

    #[test]
    fn test_parse_ac_netlist() {
        let netlist = "2\nV1 1 0 DC 1 AC 1\nR1 1 2 1000\nC1 2 0 1e-6\n.AC DEC 10 1 10e3";
        let parsed = parse_netlist(netlist).unwrap();
        assert!(matches!(parsed.directive, Directive::Ac(_)));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let netlist =
            "1\n* a comment\n\nR1 1 0 1000\n% another comment\n.TRAN 1e-3 1e-5 BE 1";
        let parsed = parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 1);
    }

    #[test]
    fn test_logic_gate_dispatch() {
        let netlist = "2\n>1 1 2\n.TRAN 1e-6 1e-9 BE 1";
        let parsed = parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 1);
        assert!(matches!(parsed.circuit.elements[0], Element::LogicGate(_)));
    }

    #[test]
    fn test_missing_directive_is_an_error() {
        let netlist = "1\nR1 1 0 1000";
        assert!(matches!(parse_netlist(netlist), Err(Error::MissingDirective)));
    }

    #[test]
    fn test_empty_netlist_is_an_error() {
        assert!(matches!(parse_netlist(""), Err(Error::EmptyNetlist)));
    }

    #[test]
    fn test_invalid_element_leading_char() {
        let netlist = "1\nZ1 1 0 1000\n.TRAN 1e-3 1e-5 BE 1";
        assert!(matches!(parse_netlist(netlist), Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_lowercase_leading_char_is_rejected_by_dispatch() {
        // Dispatch is case-sensitive per the grammar even though the
        // individual element parsers tolerate lowercase keywords.
        let netlist = "1\nr1 1 0 1000\n.TRAN 1e-3 1e-5 BE 1";
        assert!(matches!(parse_netlist(netlist), Err(Error::ParseError { .. })));
    }
}
