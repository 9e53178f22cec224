use crate::prelude::*;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::space1,
    combinator::all_consuming,
    multi::many0,
    sequence::preceded,
};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ChannelType {
    NChannel,
    PChannel,
}

#[derive(Debug, Clone)]
/// A square-law MOSFET (N- or P-channel), evaluated in cutoff, triode, or
/// saturation about the previous Newton-Raphson iterate.
pub struct Mosfet {
    pub name: String,
    pub drain: String,
    pub gate: String,
    pub source: String,
    pub channel: ChannelType,
    /// Gate width (m).
    pub w: f64,
    /// Gate length (m).
    pub l: f64,
    /// Transconductance parameter.
    pub k: f64,
    /// Threshold voltage.
    pub vth: f64,
    /// Channel-length modulation coefficient.
    pub lambda: f64,
}

impl Mosfet {
    pub fn identifier(&self) -> String {
        format!("M{}", self.name)
    }
}

enum Param {
    W(f64),
    L(f64),
    K(f64),
    Vth(f64),
    Lambda(f64),
}

fn parse_param(input: &str) -> IResult<&str, Param> {
    alt((
        nom::combinator::map(preceded(tag_no_case("W="), value_parser), Param::W),
        nom::combinator::map(preceded(tag_no_case("L="), value_parser), Param::L),
        nom::combinator::map(preceded(tag_no_case("K="), value_parser), Param::K),
        nom::combinator::map(preceded(tag_no_case("VTH="), value_parser), Param::Vth),
        nom::combinator::map(preceded(tag_no_case("LAMBDA="), value_parser), Param::Lambda),
    ))
    .parse(input)
}

pub fn parse_mosfet(input: &str) -> IResult<&str, Mosfet> {
    let (input, _) = tag_no_case("M").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, drain) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, gate) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, source) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, type_char) = preceded(space1, alt((tag_no_case("N"), tag_no_case("P")))).parse(input)?;
    let (input, params) = many0(preceded(space1, parse_param)).parse(input)?;

    let channel = match type_char.to_ascii_uppercase().as_str() {
        "N" => ChannelType::NChannel,
        "P" => ChannelType::PChannel,
        _ => unreachable!(),
    };

    let mut w = 1e-6;
    let mut l = 1e-6;
    let mut k = 1e-4;
    let mut vth = 1.0;
    let mut lambda = 0.0;
    for param in params {
        match param {
            Param::W(v) => w = v,
            Param::L(v) => l = v,
            Param::K(v) => k = v,
            Param::Vth(v) => vth = v,
            Param::Lambda(v) => lambda = v,
        }
    }

    Ok((
        input,
        Mosfet {
            name: name.to_string(),
            drain: drain.to_string(),
            gate: gate.to_string(),
            source: source.to_string(),
            channel,
            w,
            l,
            k,
            vth,
            lambda,
        },
    ))
}

impl FromStr for Mosfet {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, mosfet) = all_consuming(parse_mosfet)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(mosfet)
    }
}
