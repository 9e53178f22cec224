use crate::elements::source::{Waveform, parse_waveform};
use crate::prelude::*;
use nom::{IResult, Parser, bytes::complete::tag_no_case, character::complete::space1, combinator::all_consuming, sequence::preceded};

#[derive(Debug, Clone)]
/// An independent current source (DC, sinusoidal, or pulse) flowing from
/// `plus` to `minus`. No auxiliary branch.
pub struct CurrentSource {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub waveform: Waveform,
    pub ac_amplitude: f64,
}

impl CurrentSource {
    pub fn identifier(&self) -> String {
        format!("I{}", self.name)
    }

    pub fn value_at(&self, time: f64, step_size: f64) -> f64 {
        self.waveform.value_at(time, step_size)
    }
}

pub fn parse_current_source(input: &str) -> IResult<&str, CurrentSource> {
    let (input, _) = tag_no_case("I").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, (waveform, ac_amplitude)) = preceded(space1, parse_waveform).parse(input)?;

    Ok((
        input,
        CurrentSource {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            waveform,
            ac_amplitude,
        },
    ))
}

impl FromStr for CurrentSource {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, source) = all_consuming(parse_current_source)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(source)
    }
}
