use crate::prelude::*;
use std::f64::consts::PI;

use nom::{
    IResult, Parser,
    bytes::complete::{tag, tag_no_case},
    character::complete::{space0, space1},
    combinator::{map, opt},
    sequence::{delimited, preceded},
};

/// Sinusoidal source parameters (SPICE `SIN(...)`), per the source-time formula:
/// `v(t) = DC + A*sin(pi*phi/180)` outside `[t_d, t_d + n/f]`, otherwise
/// `v(t) = (DC + A*exp(-alpha*(t-t_d)))*sin(2*pi*f*(t-t_d) + pi*phi/180)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sine {
    pub dc_offset: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub delay: f64,
    pub damping: f64,
    pub phase_degrees: f64,
    pub cycles: f64,
}

impl Sine {
    pub fn value_at(&self, time: f64) -> f64 {
        let phase = PI * self.phase_degrees / 180.0;
        let past_cycles = self.cycles > 0.0 && time > self.delay + self.cycles / self.frequency;
        if time < self.delay || past_cycles {
            self.dc_offset + self.amplitude * phase.sin()
        } else {
            let t = time - self.delay;
            (self.dc_offset + self.amplitude * f64::exp(-self.damping * t))
                * f64::sin(2.0 * PI * self.frequency * t + phase)
        }
    }
}

/// Pulse source parameters (SPICE `PULSE(...)`). Outside `[t_d, t_d + n*T]` the
/// value is pinned to `A1`; inside, the waveform ramps `A1 -> A2 -> A1` once per
/// period. A zero rise/fall time is replaced by the caller's current step size.
#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    pub initial_value: f64,
    pub pulsed_value: f64,
    pub delay: f64,
    pub rise_time: f64,
    pub fall_time: f64,
    pub pulse_width: f64,
    pub period: f64,
    pub cycles: f64,
}

impl Pulse {
    pub fn value_at(&self, time: f64, step_size: f64) -> f64 {
        let rise = if self.rise_time <= 0.0 {
            step_size
        } else {
            self.rise_time
        };
        let fall = if self.fall_time <= 0.0 {
            step_size
        } else {
            self.fall_time
        };

        let past_cycles = self.cycles > 0.0 && time > self.delay + self.cycles * self.period;
        if time < self.delay || past_cycles {
            return self.initial_value;
        }

        let t = (time - self.delay) % self.period;
        if t < rise {
            self.initial_value + (self.pulsed_value - self.initial_value) * (t / rise)
        } else if t < rise + self.pulse_width {
            self.pulsed_value
        } else if t < rise + self.pulse_width + fall {
            self.pulsed_value
                + (self.initial_value - self.pulsed_value) * ((t - rise - self.pulse_width) / fall)
        } else {
            self.initial_value
        }
    }
}

/// The time-domain waveform of an independent source: a constant, a damped
/// sinusoid, or a pulse train.
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    Dc(f64),
    Sine(Sine),
    Pulse(Pulse),
}

impl Waveform {
    pub fn value_at(&self, time: f64, step_size: f64) -> f64 {
        match self {
            Waveform::Dc(v) => *v,
            Waveform::Sine(sine) => sine.value_at(time),
            Waveform::Pulse(pulse) => pulse.value_at(time, step_size),
        }
    }

    /// The value used for the DC operating point / warm-up step (t = 0).
    pub fn dc_value(&self) -> f64 {
        match self {
            Waveform::Dc(v) => *v,
            Waveform::Sine(sine) => sine.dc_offset,
            Waveform::Pulse(pulse) => pulse.initial_value,
        }
    }
}

fn parse_dc(input: &str) -> IResult<&str, Waveform> {
    map(preceded((tag_no_case("dc"), space1), value_parser), Waveform::Dc).parse(input)
}

fn parse_sine(input: &str) -> IResult<&str, Waveform> {
    let fields = (
        preceded(space0, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        opt(preceded(space1, value_parser)),
        opt(preceded(space1, value_parser)),
        opt(preceded(space1, value_parser)),
    );
    let (input, (dc_offset, amplitude, frequency, delay, damping, rest)) = preceded(
        tag_no_case("sin"),
        delimited(
            preceded(space0, tag("(")),
            fields,
            preceded(space0, tag(")")),
        ),
    )
    .parse(input)?;

    // `rest` absorbs phase when present; cycles are not separately parsed here
    // because the grammar only reserves six positional fields before phase.
    let phase_degrees = rest.unwrap_or(0.0);

    Ok((
        input,
        Waveform::Sine(Sine {
            dc_offset,
            amplitude,
            frequency,
            delay: delay.unwrap_or(0.0),
            damping: damping.unwrap_or(0.0),
            phase_degrees,
            cycles: 0.0,
        }),
    ))
}

fn parse_pulse(input: &str) -> IResult<&str, Waveform> {
    let fields = (
        preceded(space0, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        preceded(space1, value_parser),
        opt(preceded(space1, value_parser)),
    );
    let (
        input,
        (initial_value, pulsed_value, delay, rise_time, fall_time, pulse_width, period, cycles),
    ) = preceded(
        tag_no_case("pulse"),
        delimited(
            preceded(space0, tag("(")),
            fields,
            preceded(space0, tag(")")),
        ),
    )
    .parse(input)?;

    Ok((
        input,
        Waveform::Pulse(Pulse {
            initial_value,
            pulsed_value,
            delay,
            rise_time,
            fall_time,
            pulse_width,
            period,
            cycles: cycles.unwrap_or(0.0),
        }),
    ))
}

/// Parses the waveform portion of a `V`/`I` line: `DC <v>`, `SIN(...)`, or
/// `PULSE(...)`, followed optionally by an `AC <magnitude>` tag used only by
/// the small-signal sweep.
pub fn parse_waveform(input: &str) -> IResult<&str, (Waveform, f64)> {
    use nom::branch::alt;
    let (input, waveform) = alt((parse_sine, parse_pulse, parse_dc)).parse(input)?;
    let (input, ac) = opt(preceded(
        space1,
        preceded((tag_no_case("ac"), space1), value_parser),
    ))
    .parse(input)?;
    Ok((input, (waveform, ac.unwrap_or(0.0))))
}
