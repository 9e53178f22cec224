use crate::prelude::*;
use nom::{
    IResult, Parser, bytes::complete::tag_no_case, character::complete::space1,
    combinator::all_consuming, sequence::preceded,
};

macro_rules! controlled_source {
    ($name:ident, $tag:literal, $letter:literal, $gain_field:ident, $parse_fn:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            pub name: String,
            pub out_plus: String,
            pub out_minus: String,
            pub ctrl_plus: String,
            pub ctrl_minus: String,
            pub $gain_field: f64,
        }

        impl $name {
            pub fn identifier(&self) -> String {
                format!("{}{}", $letter, self.name)
            }
        }

        pub fn $parse_fn(input: &str) -> IResult<&str, $name> {
            let (input, _) = tag_no_case($tag).parse(input)?;
            let (input, name) = alphanumeric_or_underscore1(input)?;
            let (input, out_plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
            let (input, out_minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
            let (input, ctrl_plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
            let (input, ctrl_minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
            let (input, gain) = preceded(space1, value_parser).parse(input)?;

            Ok((
                input,
                $name {
                    name: name.to_string(),
                    out_plus: out_plus.to_string(),
                    out_minus: out_minus.to_string(),
                    ctrl_plus: ctrl_plus.to_string(),
                    ctrl_minus: ctrl_minus.to_string(),
                    $gain_field: gain,
                },
            ))
        }

        impl FromStr for $name {
            type Err = crate::prelude::Error;

            fn from_str(s: &str) -> Result<Self> {
                let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
                let (_, element) = all_consuming($parse_fn)
                    .parse(s_without_comment)
                    .map_err(|e| Error::InvalidFormat(e.to_string()))?;

                Ok(element)
            }
        }
    };
}

controlled_source!(VCVS, "E", "E", gain, parse_vcvs);
controlled_source!(CCCS, "F", "F", gain, parse_cccs);
controlled_source!(VCCS, "G", "G", transconductance, parse_vccs);
controlled_source!(CCVS, "H", "H", transresistance, parse_ccvs);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vcvs() {
        let e = "E1 3 0 1 2 10".parse::<VCVS>().unwrap();
        assert_eq!(e.out_plus, "3");
        assert_eq!(e.out_minus, "0");
        assert_eq!(e.ctrl_plus, "1");
        assert_eq!(e.ctrl_minus, "2");
        assert_eq!(e.gain, 10.0);
        assert_eq!(e.identifier(), "E1");
    }

    #[test]
    fn test_parse_cccs() {
        let f = "F1 3 0 1 2 5".parse::<CCCS>().unwrap();
        assert_eq!(f.gain, 5.0);
        assert_eq!(f.identifier(), "F1");
    }

    #[test]
    fn test_parse_vccs() {
        let g = "G1 3 0 1 2 0.001".parse::<VCCS>().unwrap();
        assert_eq!(g.transconductance, 0.001);
        assert_eq!(g.identifier(), "G1");
    }

    #[test]
    fn test_parse_ccvs() {
        let h = "H1 3 0 1 2 100".parse::<CCVS>().unwrap();
        assert_eq!(h.transresistance, 100.0);
        assert_eq!(h.identifier(), "H1");
    }

    #[test]
    fn test_invalid_vcvs_format() {
        assert!("E1 3 0 1 2".parse::<VCVS>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("G1 3 0 1 2 5".parse::<VCVS>().is_err());
    }
}
