use crate::prelude::*;
use nom::{
    IResult, Parser, bytes::complete::tag_no_case, character::complete::space1,
    combinator::all_consuming, multi::many0, sequence::preceded,
};

#[derive(Debug, Clone)]
/// An ideal (infinite-gain) op-amp, stamped as a nullator/norator pair: it
/// enforces `V(plus) = V(minus)` while letting the output branch current
/// float. Owns one auxiliary branch.
pub struct OpAmp {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub output: String,
}

impl OpAmp {
    pub fn identifier(&self) -> String {
        format!("O{}", self.name)
    }
}

pub fn parse_opamp(input: &str) -> IResult<&str, OpAmp> {
    let (input, _) = tag_no_case("O").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, output) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;

    Ok((
        input,
        OpAmp {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            output: output.to_string(),
        },
    ))
}

impl FromStr for OpAmp {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, opamp) = all_consuming(parse_opamp)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(opamp)
    }
}

#[derive(Debug, Clone)]
/// A finite-gain op-amp macromodel, synthesized from an input resistance
/// `Rin` across (plus, minus), a voltage-controlled voltage source of gain
/// `A` driving a synthesized internal net, an output resistance `Rout` from
/// that net to `output`, and an output capacitance `Cout` from `output` to
/// ground. The internal net is a hidden node private to this element.
pub struct FiniteGainOpAmp {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub output: String,
    pub internal: String,
    pub rin: f64,
    pub gain: f64,
    pub rout: f64,
    pub cout: f64,
}

impl FiniteGainOpAmp {
    pub fn identifier(&self) -> String {
        format!("A{}", self.name)
    }
}

enum Param {
    Rin(f64),
    Gain(f64),
    Rout(f64),
    Cout(f64),
}

fn parse_param(input: &str) -> IResult<&str, Param> {
    use nom::branch::alt;
    alt((
        nom::combinator::map(preceded(tag_no_case("RIN="), value_parser), Param::Rin),
        nom::combinator::map(preceded(tag_no_case("A="), value_parser), Param::Gain),
        nom::combinator::map(preceded(tag_no_case("ROUT="), value_parser), Param::Rout),
        nom::combinator::map(preceded(tag_no_case("COUT="), value_parser), Param::Cout),
    ))
    .parse(input)
}

pub fn parse_finite_gain_opamp(input: &str) -> IResult<&str, FiniteGainOpAmp> {
    let (input, _) = tag_no_case("A").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, output) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, params) = many0(preceded(space1, parse_param)).parse(input)?;

    let mut rin = 1e6;
    let mut gain = 1e5;
    let mut rout = 75.0;
    let mut cout = 0.0;
    for param in params {
        match param {
            Param::Rin(v) => rin = v,
            Param::Gain(v) => gain = v,
            Param::Rout(v) => rout = v,
            Param::Cout(v) => cout = v,
        }
    }

    Ok((
        input,
        FiniteGainOpAmp {
            internal: format!("__opamp_internal_{name}"),
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            output: output.to_string(),
            rin,
            gain,
            rout,
            cout,
        },
    ))
}

impl FromStr for FiniteGainOpAmp {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, opamp) = all_consuming(parse_finite_gain_opamp)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(opamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ideal_opamp() {
        let o = "O1 1 2 3".parse::<OpAmp>().unwrap();
        assert_eq!(o.plus, "1");
        assert_eq!(o.minus, "2");
        assert_eq!(o.output, "3");
    }

    #[test]
    fn test_invalid_ideal_opamp_format() {
        assert!("O1 1 2".parse::<OpAmp>().is_err());
    }

    #[test]
    fn test_parse_finite_gain_defaults() {
        let a = "A1 1 2 3".parse::<FiniteGainOpAmp>().unwrap();
        assert_eq!(a.rin, 1e6);
        assert_eq!(a.gain, 1e5);
        assert_eq!(a.internal, "__opamp_internal_1");
    }

    #[test]
    fn test_parse_finite_gain_with_params() {
        let a = "A1 1 2 3 RIN=2e6 A=2e4 ROUT=50 COUT=1e-12"
            .parse::<FiniteGainOpAmp>()
            .unwrap();
        assert_eq!(a.rin, 2e6);
        assert_eq!(a.gain, 2e4);
        assert_eq!(a.rout, 50.0);
        assert_eq!(a.cout, 1e-12);
    }
}
