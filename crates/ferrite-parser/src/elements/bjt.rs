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
pub enum BjtType {
    NPN,
    PNP,
}

#[derive(Debug, Clone)]
/// A bipolar junction transistor, decomposed at stamp time into two diodes
/// plus two current-controlled sources (Ebers-Moll).
pub struct BJT {
    pub name: String,
    pub collector: String,
    pub base: String,
    pub emitter: String,
    pub bjt_type: BjtType,
    /// Saturation current shared by both internal diodes.
    pub is: f64,
    /// Forward common-base current gain.
    pub alpha_f: f64,
    /// Reverse common-base current gain.
    pub alpha_r: f64,
}

impl BJT {
    pub fn identifier(&self) -> String {
        format!("Q{}", self.name)
    }
}

enum Param {
    Is(f64),
    AlphaF(f64),
    AlphaR(f64),
}

fn parse_param(input: &str) -> IResult<&str, Param> {
    alt((
        nom::combinator::map(preceded(tag_no_case("IS="), value_parser), Param::Is),
        nom::combinator::map(preceded(tag_no_case("AF="), value_parser), Param::AlphaF),
        nom::combinator::map(preceded(tag_no_case("AR="), value_parser), Param::AlphaR),
    ))
    .parse(input)
}

pub fn parse_bjt(input: &str) -> IResult<&str, BJT> {
    let (input, _) = tag_no_case("Q").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, collector) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, base) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, emitter) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, type_char) = preceded(space1, alt((tag_no_case("N"), tag_no_case("P")))).parse(input)?;
    let (input, params) = many0(preceded(space1, parse_param)).parse(input)?;

    let bjt_type = match type_char.to_ascii_uppercase().as_str() {
        "N" => BjtType::NPN,
        "P" => BjtType::PNP,
        _ => unreachable!(),
    };

    let mut is = 1e-14;
    let mut alpha_f = 0.99;
    let mut alpha_r = 0.5;
    for param in params {
        match param {
            Param::Is(v) => is = v,
            Param::AlphaF(v) => alpha_f = v,
            Param::AlphaR(v) => alpha_r = v,
        }
    }

    Ok((
        input,
        BJT {
            name: name.to_string(),
            collector: collector.to_string(),
            base: base.to_string(),
            emitter: emitter.to_string(),
            bjt_type,
            is,
            alpha_f,
            alpha_r,
        },
    ))
}

impl FromStr for BJT {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, bjt) = all_consuming(parse_bjt)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(bjt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_npn_bjt() {
        let bjt = "Q1 1 2 0 N".parse::<BJT>().unwrap();
        assert_eq!(bjt.name, "1");
        assert_eq!(bjt.collector, "1");
        assert_eq!(bjt.base, "2");
        assert_eq!(bjt.emitter, "0");
        assert_eq!(bjt.bjt_type, BjtType::NPN);
        assert_eq!(bjt.identifier(), "Q1");
    }

    #[test]
    fn test_parse_pnp_bjt_with_params() {
        let bjt = "Q2 4 5 6 P IS=1e-15 AF=0.98 AR=0.4"
            .parse::<BJT>()
            .unwrap();
        assert_eq!(bjt.bjt_type, BjtType::PNP);
        assert_eq!(bjt.is, 1e-15);
        assert_eq!(bjt.alpha_f, 0.98);
        assert_eq!(bjt.alpha_r, 0.4);
    }

    #[test]
    fn test_parse_lowercase_symbolic_nodes() {
        let bjt = "q3 C B E n".parse::<BJT>().unwrap();
        assert_eq!(bjt.collector, "C");
        assert_eq!(bjt.base, "B");
        assert_eq!(bjt.emitter, "E");
        assert_eq!(bjt.bjt_type, BjtType::NPN);
    }

    #[test]
    fn test_parse_with_comment() {
        let bjt = "Q10 coll base emit p % note".parse::<BJT>().unwrap();
        assert_eq!(bjt.bjt_type, BjtType::PNP);
    }

    #[test]
    fn test_invalid_missing_type() {
        assert!("Q1 1 2 0".parse::<BJT>().is_err());
    }

    #[test]
    fn test_invalid_type_char() {
        assert!("Q1 1 2 3 X".parse::<BJT>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("R1 1 2 3 100".parse::<BJT>().is_err());
    }
}
