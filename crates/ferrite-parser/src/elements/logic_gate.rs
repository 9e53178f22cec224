use crate::prelude::*;
use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::space1,
    combinator::all_consuming,
    multi::many0,
    sequence::preceded,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicGateKind {
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
}

impl LogicGateKind {
    /// The punctuation character that selects this gate as an element
    /// line's leading character.
    fn punctuation(self) -> char {
        match self {
            LogicGateKind::Not => '>',
            LogicGateKind::And => ')',
            LogicGateKind::Nand => '(',
            LogicGateKind::Or => '}',
            LogicGateKind::Nor => '{',
            LogicGateKind::Xor => ']',
            LogicGateKind::Xnor => '[',
        }
    }

    fn from_punctuation(c: char) -> Option<Self> {
        match c {
            '>' => Some(LogicGateKind::Not),
            ')' => Some(LogicGateKind::And),
            '(' => Some(LogicGateKind::Nand),
            '}' => Some(LogicGateKind::Or),
            '{' => Some(LogicGateKind::Nor),
            ']' => Some(LogicGateKind::Xor),
            '[' => Some(LogicGateKind::Xnor),
            _ => None,
        }
    }

    /// Whether the gate's "true" output level is 0 (inverting transfer curve).
    pub fn is_inverting(self) -> bool {
        matches!(
            self,
            LogicGateKind::Not | LogicGateKind::Nand | LogicGateKind::Nor | LogicGateKind::Xnor
        )
    }

    pub fn input_count(self) -> usize {
        match self {
            LogicGateKind::Not => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone)]
/// A logic gate with a piecewise-linear voltage transfer characteristic.
/// Each input pin sees a capacitor to ground; the output is driven through
/// an output resistance from a transconductance/current-source companion
/// pair selected by the gate's truth table.
pub struct LogicGate {
    pub name: String,
    pub kind: LogicGateKind,
    pub inputs: Vec<String>,
    pub output: String,
    /// Supply voltage.
    pub supply: f64,
    /// Input capacitance, one instance per input pin.
    pub cin: f64,
    /// Open-loop transfer gain in the linear region.
    pub gain: f64,
    /// Output resistance.
    pub rout: f64,
}

impl LogicGate {
    pub fn identifier(&self) -> String {
        format!("X{}{:?}", self.name, self.kind)
    }

    pub fn v_il(&self) -> f64 {
        self.supply / 2.0 - self.supply / (2.0 * self.gain)
    }

    pub fn v_ih(&self) -> f64 {
        self.supply / 2.0 + self.supply / (2.0 * self.gain)
    }
}

enum Param {
    Supply(f64),
    Cin(f64),
    Gain(f64),
    Rout(f64),
}

fn parse_param(input: &str) -> IResult<&str, Param> {
    use nom::branch::alt;
    use nom::bytes::complete::tag_no_case;
    alt((
        nom::combinator::map(preceded(tag_no_case("V="), value_parser), Param::Supply),
        nom::combinator::map(preceded(tag_no_case("C="), value_parser), Param::Cin),
        nom::combinator::map(preceded(tag_no_case("A="), value_parser), Param::Gain),
        nom::combinator::map(preceded(tag_no_case("R="), value_parser), Param::Rout),
    ))
    .parse(input)
}

fn parse_gate_with_kind(input: &str, kind: LogicGateKind) -> IResult<&str, LogicGate> {
    let punct = kind.punctuation();
    let mut punct_buf = [0u8; 4];
    let punct_str = punct.encode_utf8(&mut punct_buf);
    let (input, _) = tag(&*punct_str).parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;

    let n_inputs = kind.input_count();
    let mut inputs = Vec::with_capacity(n_inputs);
    let mut remaining = input;
    for _ in 0..n_inputs {
        let (rest, node) = preceded(space1, alphanumeric_or_underscore1).parse(remaining)?;
        inputs.push(node.to_string());
        remaining = rest;
    }
    let (input, output) = preceded(space1, alphanumeric_or_underscore1).parse(remaining)?;
    let (input, params) = many0(preceded(space1, parse_param)).parse(input)?;

    let mut supply = 5.0;
    let mut cin = 1e-12;
    let mut gain = 1e3;
    let mut rout = 100.0;
    for param in params {
        match param {
            Param::Supply(v) => supply = v,
            Param::Cin(v) => cin = v,
            Param::Gain(v) => gain = v,
            Param::Rout(v) => rout = v,
        }
    }

    Ok((
        input,
        LogicGate {
            name: name.to_string(),
            kind,
            inputs,
            output: output.to_string(),
            supply,
            cin,
            gain,
            rout,
        },
    ))
}

pub fn parse_logic_gate(input: &str) -> IResult<&str, LogicGate> {
    let first = input.chars().next().ok_or(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))?;
    let kind = LogicGateKind::from_punctuation(first).ok_or(nom::Err::Error(
        nom::error::Error::new(input, nom::error::ErrorKind::Char),
    ))?;
    parse_gate_with_kind(input, kind)
}

impl FromStr for LogicGate {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, gate) = all_consuming(parse_logic_gate)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_not_gate() {
        let g = ">1 1 2".parse::<LogicGate>().unwrap();
        assert_eq!(g.kind, LogicGateKind::Not);
        assert_eq!(g.inputs, vec!["1".to_string()]);
        assert_eq!(g.output, "2");
    }

    #[test]
    fn test_parse_and_gate_with_params() {
        let g = ")1 1 2 3 V=3.3 C=2e-12 A=2e3 R=50"
            .parse::<LogicGate>()
            .unwrap();
        assert_eq!(g.kind, LogicGateKind::And);
        assert_eq!(g.inputs, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(g.output, "3");
        assert_eq!(g.supply, 3.3);
        assert_eq!(g.cin, 2e-12);
        assert_eq!(g.gain, 2e3);
        assert_eq!(g.rout, 50.0);
    }

    #[test]
    fn test_parse_xor_gate() {
        let g = "]1 a b c".parse::<LogicGate>().unwrap();
        assert_eq!(g.kind, LogicGateKind::Xor);
        assert!(!g.kind.is_inverting());
    }

    #[test]
    fn test_parse_nand_gate_is_inverting() {
        let g = "(1 a b c".parse::<LogicGate>().unwrap();
        assert_eq!(g.kind, LogicGateKind::Nand);
        assert!(g.kind.is_inverting());
    }

    #[test]
    fn test_vil_vih_breakpoints() {
        let g = ">1 1 2".parse::<LogicGate>().unwrap();
        assert!((g.v_il() - (2.5 - 2.5 / 1e3)).abs() < 1e-9);
        assert!((g.v_ih() - (2.5 + 2.5 / 1e3)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_not_gate_missing_output() {
        assert!(">1 1".parse::<LogicGate>().is_err());
    }

    #[test]
    fn test_invalid_punctuation() {
        assert!("~1 1 2".parse::<LogicGate>().is_err());
    }
}
