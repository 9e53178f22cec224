use crate::prelude::*;
use nom::{
    IResult, Parser, bytes::complete::tag_no_case, character::complete::space1,
    combinator::all_consuming, sequence::preceded,
};

#[derive(Debug, Clone)]
/// A piecewise-linear resistor defined by four (V, I) breakpoints, ordered
/// `V1 < V2 < V3 < V4` by convention.
pub struct PwlResistor {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub breakpoints: [(f64, f64); 4],
}

impl PwlResistor {
    pub fn identifier(&self) -> String {
        format!("N{}", self.name)
    }

    /// Picks the active segment for a drop `delta_v`, returning the pair of
    /// breakpoints bracketing it.
    pub fn segment_for(&self, delta_v: f64) -> ((f64, f64), (f64, f64)) {
        let [b1, b2, b3, b4] = self.breakpoints;
        if delta_v < b2.0 {
            (b1, b2)
        } else if delta_v < b3.0 {
            (b2, b3)
        } else {
            (b3, b4)
        }
    }
}

pub fn parse_pwl_resistor(input: &str) -> IResult<&str, PwlResistor> {
    let (input, _) = tag_no_case("N").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, v1) = preceded(space1, value_parser).parse(input)?;
    let (input, i1) = preceded(space1, value_parser).parse(input)?;
    let (input, v2) = preceded(space1, value_parser).parse(input)?;
    let (input, i2) = preceded(space1, value_parser).parse(input)?;
    let (input, v3) = preceded(space1, value_parser).parse(input)?;
    let (input, i3) = preceded(space1, value_parser).parse(input)?;
    let (input, v4) = preceded(space1, value_parser).parse(input)?;
    let (input, i4) = preceded(space1, value_parser).parse(input)?;

    Ok((
        input,
        PwlResistor {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            breakpoints: [(v1, i1), (v2, i2), (v3, i3), (v4, i4)],
        },
    ))
}

impl FromStr for PwlResistor {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, pwl) = all_consuming(parse_pwl_resistor)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(pwl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pwl_resistor() {
        let pwl = "N1 1 0 -1 -1 -0.5 -0.1 0.5 0.1 1 1"
            .parse::<PwlResistor>()
            .unwrap();
        assert_eq!(pwl.name, "1");
        assert_eq!(pwl.breakpoints[0], (-1.0, -1.0));
        assert_eq!(pwl.breakpoints[3], (1.0, 1.0));
    }

    #[test]
    fn test_segment_selection() {
        let pwl = "N1 1 0 -1 -1 -0.5 -0.1 0.5 0.1 1 1"
            .parse::<PwlResistor>()
            .unwrap();
        assert_eq!(pwl.segment_for(0.0), ((-0.5, -0.1), (0.5, 0.1)));
        assert_eq!(pwl.segment_for(-0.9), ((-1.0, -1.0), (-0.5, -0.1)));
        assert_eq!(pwl.segment_for(0.9), ((0.5, 0.1), (1.0, 1.0)));
    }

    #[test]
    fn test_invalid_missing_breakpoints() {
        assert!("N1 1 0 -1 -1".parse::<PwlResistor>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("R1 1 0 -1 -1 -0.5 -0.1 0.5 0.1 1 1"
            .parse::<PwlResistor>()
            .is_err());
    }
}
