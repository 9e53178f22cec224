use crate::prelude::*;
use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::space1,
    combinator::{all_consuming, opt},
    sequence::preceded,
};

#[derive(Debug, Clone)]
/// A linear capacitor between two nodes, companion-modeled under
/// backward-Euler/trapezoidal stamping.
pub struct Capacitor {
    pub name: String,
    pub value: f64,
    pub plus: String,
    pub minus: String,
    /// Initial terminal voltage from a trailing `IC=<v>` token.
    pub ic: Option<f64>,
}

impl Capacitor {
    pub fn identifier(&self) -> String {
        format!("C{}", self.name)
    }
}

fn parse_ic(input: &str) -> IResult<&str, f64> {
    preceded((tag_no_case("IC="),), value_parser).parse(input)
}

pub fn parse_capacitor(input: &str) -> IResult<&str, Capacitor> {
    let (input, _) = tag_no_case("C").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, value) = preceded(space1, value_parser).parse(input)?;
    let (input, ic) = opt(preceded(space1, parse_ic)).parse(input)?;

    Ok((
        input,
        Capacitor {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            value,
            ic,
        },
    ))
}

impl FromStr for Capacitor {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, capacitor) = all_consuming(parse_capacitor)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(capacitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capacitor() {
        let capacitor = "C1 1 0 0.000001".parse::<Capacitor>().unwrap();
        assert_eq!(capacitor.name, "1");
        assert_eq!(capacitor.value, 0.000001);
        assert_eq!(capacitor.ic, None);
    }

    #[test]
    fn test_parse_capacitor_with_ic() {
        let capacitor = "C1 2 0 1e-6 IC=0.5".parse::<Capacitor>().unwrap();
        assert_eq!(capacitor.ic, Some(0.5));
    }

    #[test]
    fn test_parse_capacitor_ic_case_insensitive() {
        let capacitor = "c1 2 0 1e-6 ic=0".parse::<Capacitor>().unwrap();
        assert_eq!(capacitor.ic, Some(0.0));
    }

    #[test]
    fn test_parse_capacitor_with_comment() {
        let capacitor = "C1 1 0 1e-6 IC=0 % note".parse::<Capacitor>().unwrap();
        assert_eq!(capacitor.ic, Some(0.0));
    }

    #[test]
    fn test_invalid_capacitor_format() {
        assert!("C1 1 0".parse::<Capacitor>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("R1 1 0 100".parse::<Capacitor>().is_err());
    }
}
