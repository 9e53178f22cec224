use crate::{constants::THERMAL_VOLTAGE, prelude::*};
use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::space1,
    combinator::all_consuming,
    multi::many0,
    sequence::preceded,
};

#[derive(Debug, Clone)]
/// A Shockley diode, linearized about the previous Newton-Raphson iterate.
pub struct Diode {
    pub name: String,
    pub plus: String,
    pub minus: String,
    /// Saturation current (A).
    pub is: f64,
    /// Emission coefficient.
    pub n: f64,
    /// Thermal voltage override; defaults to kT/q at 300 K.
    pub vt: f64,
}

impl Diode {
    pub fn identifier(&self) -> String {
        format!("D{}", self.name)
    }
}

impl Default for Diode {
    fn default() -> Self {
        Diode {
            name: String::new(),
            plus: String::new(),
            minus: String::new(),
            is: 1e-14,
            n: 1.0,
            vt: THERMAL_VOLTAGE,
        }
    }
}

enum Param {
    Is(f64),
    N(f64),
    Vt(f64),
}

fn parse_param(input: &str) -> IResult<&str, Param> {
    use nom::branch::alt;
    alt((
        nom::combinator::map(preceded(tag_no_case("IS="), value_parser), Param::Is),
        nom::combinator::map(preceded(tag_no_case("N="), value_parser), Param::N),
        nom::combinator::map(preceded(tag_no_case("VT="), value_parser), Param::Vt),
    ))
    .parse(input)
}

pub fn parse_diode(input: &str) -> IResult<&str, Diode> {
    let (input, _) = tag_no_case("D").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, params) = many0(preceded(space1, parse_param)).parse(input)?;

    let mut diode = Diode {
        name: name.to_string(),
        plus: plus.to_string(),
        minus: minus.to_string(),
        ..Diode::default()
    };

    for param in params {
        match param {
            Param::Is(v) => diode.is = v,
            Param::N(v) => diode.n = v,
            Param::Vt(v) => diode.vt = v,
        }
    }

    Ok((input, diode))
}

impl FromStr for Diode {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, diode) = all_consuming(parse_diode)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(diode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diode_defaults() {
        let diode = "D1 1 0".parse::<Diode>().unwrap();
        assert_eq!(diode.name, "1");
        assert_eq!(diode.is, 1e-14);
        assert_eq!(diode.n, 1.0);
        assert_eq!(diode.vt, THERMAL_VOLTAGE);
    }

    #[test]
    fn test_parse_diode_with_params() {
        let diode = "D1 1 0 IS=1e-12 N=1.5".parse::<Diode>().unwrap();
        assert_eq!(diode.is, 1e-12);
        assert_eq!(diode.n, 1.5);
    }

    #[test]
    fn test_parse_diode_with_vt_override() {
        let diode = "D1 1 0 VT=0.03".parse::<Diode>().unwrap();
        assert_eq!(diode.vt, 0.03);
    }

    #[test]
    fn test_parse_diode_lowercase() {
        let diode = "d5 nodeA nodeB is=1e-13".parse::<Diode>().unwrap();
        assert_eq!(diode.name, "5");
        assert_eq!(diode.is, 1e-13);
    }

    #[test]
    fn test_parse_with_comment() {
        let diode = "D1 1 0 % comment".parse::<Diode>().unwrap();
        assert_eq!(diode.is, 1e-14);
    }

    #[test]
    fn test_invalid_format() {
        assert!("D1 1".parse::<Diode>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("R1 1 0 100".parse::<Diode>().is_err());
    }
}
