use crate::elements::source::{Waveform, parse_waveform};
use crate::prelude::*;
use nom::{IResult, Parser, bytes::complete::tag_no_case, character::complete::space1, combinator::all_consuming, sequence::preceded};

#[derive(Debug, Clone)]
/// An independent voltage source (DC, sinusoidal, or pulse) between two nodes.
/// Owns one auxiliary branch current.
pub struct VoltageSource {
    pub name: String,
    pub plus: String,
    pub minus: String,
    pub waveform: Waveform,
    /// Small-signal AC magnitude, used only by the frequency sweep.
    pub ac_amplitude: f64,
}

impl VoltageSource {
    pub fn identifier(&self) -> String {
        format!("V{}", self.name)
    }

    pub fn value_at(&self, time: f64, step_size: f64) -> f64 {
        self.waveform.value_at(time, step_size)
    }
}

pub fn parse_voltage_source(input: &str) -> IResult<&str, VoltageSource> {
    let (input, _) = tag_no_case("V").parse(input)?;
    let (input, name) = alphanumeric_or_underscore1(input)?;
    let (input, plus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, minus) = preceded(space1, alphanumeric_or_underscore1).parse(input)?;
    let (input, (waveform, ac_amplitude)) = preceded(space1, parse_waveform).parse(input)?;

    Ok((
        input,
        VoltageSource {
            name: name.to_string(),
            plus: plus.to_string(),
            minus: minus.to_string(),
            waveform,
            ac_amplitude,
        },
    ))
}

impl FromStr for VoltageSource {
    type Err = crate::prelude::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s_without_comment = s.split(['%', '*']).next().unwrap_or("").trim();
        let (_, source) = all_consuming(parse_voltage_source)
            .parse(s_without_comment)
            .map_err(|e| Error::InvalidFormat(e.to_string()))?;

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dc_voltage_source() {
        let vs = "V1 1 0 DC 5".parse::<VoltageSource>().unwrap();
        assert_eq!(vs.name, "1");
        assert_eq!(vs.waveform, Waveform::Dc(5.0));
        assert_eq!(vs.ac_amplitude, 0.0);
    }

    #[test]
    fn test_parse_with_ac_tag() {
        let vs = "V2 3 4 DC 0 AC 1.5".parse::<VoltageSource>().unwrap();
        assert_eq!(vs.waveform, Waveform::Dc(0.0));
        assert_eq!(vs.ac_amplitude, 1.5);
    }

    #[test]
    fn test_parse_sine_source() {
        let vs = "V1 in 0 SIN(0 1 60 0 0 0)".parse::<VoltageSource>().unwrap();
        match vs.waveform {
            Waveform::Sine(s) => assert_eq!(s.frequency, 60.0),
            _ => panic!("expected sine"),
        }
    }

    #[test]
    fn test_parse_pulse_source() {
        let vs = "V1 in 0 PULSE(0 5 1u 100u 100u 5u 10u)"
            .parse::<VoltageSource>()
            .unwrap();
        assert!(matches!(vs.waveform, Waveform::Pulse(_)));
    }

    #[test]
    fn test_parse_with_comment() {
        let vs = "V1 1 0 DC 5 % note".parse::<VoltageSource>().unwrap();
        assert_eq!(vs.waveform, Waveform::Dc(5.0));
    }

    #[test]
    fn test_invalid_format() {
        assert!("V1 1 0".parse::<VoltageSource>().is_err());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("I1 1 0 DC 5".parse::<VoltageSource>().is_err());
    }
}
