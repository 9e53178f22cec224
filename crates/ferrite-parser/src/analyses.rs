use crate::prelude::*;
use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::space1,
    combinator::{all_consuming, opt},
    sequence::preceded,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    BackwardEuler,
    Trapezoidal,
    ForwardEuler,
}

impl std::str::FromStr for IntegrationMethod {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "BE" => Ok(IntegrationMethod::BackwardEuler),
            "TR" => Ok(IntegrationMethod::Trapezoidal),
            "FE" => Ok(IntegrationMethod::ForwardEuler),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyScale {
    Linear,
    Octave,
    Decade,
}

impl std::str::FromStr for FrequencyScale {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "LIN" => Ok(FrequencyScale::Linear),
            "OCT" => Ok(FrequencyScale::Octave),
            "DEC" => Ok(FrequencyScale::Decade),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransientAnalysis {
    pub end_time: f64,
    pub step: f64,
    pub method: IntegrationMethod,
    pub internal_multiplier: usize,
    /// `UIC`: use the elements' stored initial conditions rather than
    /// computing a DC operating point for the warm-up step.
    pub use_initial_conditions: bool,
}

#[derive(Debug, Clone)]
pub struct AcAnalysis {
    /// `LIN`/`OCT`/`DEC` is accepted but the sweep is always logarithmic,
    /// matching the known behavior of the source this was distilled from.
    pub scale: FrequencyScale,
    pub steps_per_decade: usize,
    pub f_start: f64,
    pub f_end: f64,
}

#[derive(Debug, Clone)]
pub enum Directive {
    Tran(TransientAnalysis),
    Ac(AcAnalysis),
}

fn parse_tran(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag_no_case(".TRAN").parse(input)?;
    let (input, end_time) = preceded(space1, value_parser).parse(input)?;
    let (input, step) = preceded(space1, value_parser).parse(input)?;
    let (input, method_token) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, internal_multiplier) = preceded(space1, value_parser).parse(input)?;
    let (input, uic) = opt(preceded(space1, tag_no_case("UIC"))).parse(input)?;

    let method = method_token
        .parse()
        .map_err(|_| nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Verify)))?;

    Ok((
        input,
        Directive::Tran(TransientAnalysis {
            end_time,
            step,
            method,
            internal_multiplier: internal_multiplier as usize,
            use_initial_conditions: uic.is_some(),
        }),
    ))
}

fn parse_ac(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag_no_case(".AC").parse(input)?;
    let (input, scale_token) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, steps_per_decade) = preceded(space1, value_parser).parse(input)?;
    let (input, f_start) = preceded(space1, value_parser).parse(input)?;
    let (input, f_end) = preceded(space1, value_parser).parse(input)?;

    let scale = scale_token
        .parse()
        .map_err(|_| nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::Verify)))?;

    Ok((
        input,
        Directive::Ac(AcAnalysis {
            scale,
            steps_per_decade: steps_per_decade as usize,
            f_start,
            f_end,
        }),
    ))
}

/// Parses the trailing simulation directive: the mandatory last line of a
/// netlist.
pub fn parse_directive(input: &str) -> Result<Directive> {
    use nom::branch::alt;
    let s_without_comment = input.split(['%', '*']).next().unwrap_or("").trim();

    all_consuming(alt((parse_tran, parse_ac)))
        .parse(s_without_comment)
        .map(|(_, directive)| directive)
        .map_err(|e| Error::InvalidFormat(format!("invalid directive '{input}': {e}")))
}
