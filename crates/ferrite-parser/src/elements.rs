use crate::prelude::*;

pub mod bjt;
pub mod capacitor;
pub mod controlled_source;
pub mod current_source;
pub mod diode;
pub mod inductor;
pub mod logic_gate;
pub mod mosfet;
pub mod opamp;
pub mod pwl_resistor;
pub mod resistor;
pub mod source;
pub mod voltage_source;

use bjt::BJT;
use capacitor::Capacitor;
use controlled_source::{CCCS, CCVS, VCCS, VCVS};
use current_source::CurrentSource;
use diode::Diode;
use inductor::Inductor;
use logic_gate::LogicGate;
use mosfet::Mosfet;
use opamp::{FiniteGainOpAmp, OpAmp};
use pwl_resistor::PwlResistor;
use resistor::Resistor;
use voltage_source::VoltageSource;

/// Any component that can be included in a circuit simulation.
///
/// The set is closed and bounded at compile time: stamping is hot code and
/// dynamic dispatch over ~15+ variants is exactly the case where a tagged
/// enum and a match beats a trait object.
#[derive(Debug, Clone)]
pub enum Element {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    PwlResistor(PwlResistor),
    OpAmp(OpAmp),
    FiniteGainOpAmp(FiniteGainOpAmp),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Vcvs(VCVS),
    Cccs(CCCS),
    Vccs(VCCS),
    Ccvs(CCVS),
    Diode(Diode),
    BJT(BJT),
    Mosfet(Mosfet),
    LogicGate(LogicGate),
}

/// Forwards a method call to the variant's inner struct, avoiding per-variant
/// boilerplate on `Element`.
macro_rules! dispatch {
    ($self:expr, $method:ident($($args:expr),*)) => {
        match $self {
            Element::Resistor(e) => e.$method($($args),*),
            Element::Capacitor(e) => e.$method($($args),*),
            Element::Inductor(e) => e.$method($($args),*),
            Element::PwlResistor(e) => e.$method($($args),*),
            Element::OpAmp(e) => e.$method($($args),*),
            Element::FiniteGainOpAmp(e) => e.$method($($args),*),
            Element::VoltageSource(e) => e.$method($($args),*),
            Element::CurrentSource(e) => e.$method($($args),*),
            Element::Vcvs(e) => e.$method($($args),*),
            Element::Cccs(e) => e.$method($($args),*),
            Element::Vccs(e) => e.$method($($args),*),
            Element::Ccvs(e) => e.$method($($args),*),
            Element::Diode(e) => e.$method($($args),*),
            Element::BJT(e) => e.$method($($args),*),
            Element::Mosfet(e) => e.$method($($args),*),
            Element::LogicGate(e) => e.$method($($args),*),
        }
    };
}
pub(crate) use dispatch;

macro_rules! from_impl {
    ($variant:ident, $inner:ty) => {
        impl From<$inner> for Element {
            fn from(item: $inner) -> Self {
                Element::$variant(item)
            }
        }
    };
}

from_impl!(Resistor, Resistor);
from_impl!(Capacitor, Capacitor);
from_impl!(Inductor, Inductor);
from_impl!(PwlResistor, PwlResistor);
from_impl!(OpAmp, OpAmp);
from_impl!(FiniteGainOpAmp, FiniteGainOpAmp);
from_impl!(VoltageSource, VoltageSource);
from_impl!(CurrentSource, CurrentSource);
from_impl!(Vcvs, VCVS);
from_impl!(Cccs, CCCS);
from_impl!(Vccs, VCCS);
from_impl!(Ccvs, CCVS);
from_impl!(Diode, Diode);
from_impl!(BJT, BJT);
from_impl!(Mosfet, Mosfet);
from_impl!(LogicGate, LogicGate);

impl Element {
    /// Nodes the element is incident on (used only to build the node index
    /// map; order matches insertion order of first mention).
    pub fn nodes(&self) -> Vec<&str> {
        match self {
            Element::Resistor(e) => vec![&e.plus, &e.minus],
            Element::Capacitor(e) => vec![&e.plus, &e.minus],
            Element::Inductor(e) => vec![&e.plus, &e.minus],
            Element::PwlResistor(e) => vec![&e.plus, &e.minus],
            Element::OpAmp(e) => vec![&e.plus, &e.minus, &e.output],
            Element::FiniteGainOpAmp(e) => vec![&e.plus, &e.minus, &e.output, &e.internal],
            Element::VoltageSource(e) => vec![&e.plus, &e.minus],
            Element::CurrentSource(e) => vec![&e.plus, &e.minus],
            Element::Vcvs(e) => vec![&e.out_plus, &e.out_minus, &e.ctrl_plus, &e.ctrl_minus],
            Element::Cccs(e) => vec![&e.out_plus, &e.out_minus, &e.ctrl_plus, &e.ctrl_minus],
            Element::Vccs(e) => vec![&e.out_plus, &e.out_minus, &e.ctrl_plus, &e.ctrl_minus],
            Element::Ccvs(e) => vec![&e.out_plus, &e.out_minus, &e.ctrl_plus, &e.ctrl_minus],
            Element::Diode(e) => vec![&e.plus, &e.minus],
            Element::BJT(e) => vec![&e.collector, &e.base, &e.emitter],
            Element::Mosfet(e) => vec![&e.drain, &e.gate, &e.source],
            Element::LogicGate(e) => {
                let mut nodes: Vec<&str> = e.inputs.iter().map(String::as_str).collect();
                nodes.push(&e.output);
                nodes
            }
        }
    }

    /// Whether the element needs a dedicated auxiliary branch current (MNA
    /// "Group 2"). Nonlinear elements are always linearized into Group-1-only
    /// companion contributions (conductances and equivalent sources), never
    /// owning their own auxiliary branch.
    pub fn is_g2(&self) -> bool {
        matches!(
            self,
            Element::Inductor(_)
                | Element::OpAmp(_)
                | Element::FiniteGainOpAmp(_)
                | Element::VoltageSource(_)
                | Element::Vcvs(_)
                | Element::Cccs(_)
                | Element::Ccvs(_)
        )
    }

    /// CCVS additionally claims a second, control-sensing auxiliary branch.
    pub fn auxiliary_branch_count(&self) -> usize {
        match self {
            Element::Ccvs(_) => 2,
            e if e.is_g2() => 1,
            _ => 0,
        }
    }

    pub fn is_nonlinear(&self) -> bool {
        matches!(
            self,
            Element::PwlResistor(_)
                | Element::Diode(_)
                | Element::BJT(_)
                | Element::Mosfet(_)
                | Element::LogicGate(_)
        )
    }
}

/// A component with a unique string identifier, e.g. `R1`, `C2`, `Q3`.
pub trait Identifiable {
    fn identifier(&self) -> String;
}

impl Identifiable for Element {
    fn identifier(&self) -> String {
        dispatch!(self, identifier())
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
