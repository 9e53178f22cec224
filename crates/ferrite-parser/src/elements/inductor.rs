use crate::prelude::*;
use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::space1,
    combinator::{all_consuming, opt},
    sequence::preceded,
};

#[derive(Debug, Clone)]
/// A linear inductor between two nodes; owns one auxiliary branch current.
pub struct Inductor {
    pub name: String,
    pub value: f64,
    pub plus: String,
    pub minus: String,
    /// Initial branch current from a trailing `IC=<v>` token.
    pub ic: Option<f64>,
}

impl Inductor {
    pub fn identifier(&self) -> String {
        format!("L{}", self.name)
    }
}

fn parse_ic(input: &str) -> IResult<&str, f64> {
    preceded((tag_no_case("IC="),), value_parser).parse(input)
}

pub fn parse_inductor(input: &str) -> IResult<&str, Inductor> {
    let (input, _) = tag_no_case("L").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, value) = preceded(space1, value_parser).parse(input)?;
    let (input, ic) = opt(preceded(space1, parse_ic)).parse(input)?;

    Ok((
        input,
        Inductor {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            value,
            ic,
        },
    ))
}

impl FromStr for Inductor {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, inductor) = all_consuming(parse_inductor)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(inductor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inductor() {
        let inductor = "L1 1 0 0.001".parse::<Inductor>().unwrap();
        assert_eq!(inductor.name, "1");
        assert_eq!(inductor.value, 0.001);
        assert_eq!(inductor.ic, None);
    }

    #[test]
    fn test_parse_inductor_with_ic() {
        let inductor = "L1 1 0 1e-3 IC=0.25".parse::<Inductor>().unwrap();
        assert_eq!(inductor.ic, Some(0.25));
    }

    #[test]
    fn test_parse_lowercase_and_scientific() {
        let inductor = "l2 vcc out 1e-6".parse::<Inductor>().unwrap();
        assert_eq!(inductor.name, "2");
        assert_eq!(inductor.value, 1e-6);
    }

    #[test]
    fn test_invalid_inductor_format() {
        assert!("L1 1 0".parse::<Inductor>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("R1 1 0 100".parse::<Inductor>().is_err());
    }
}
