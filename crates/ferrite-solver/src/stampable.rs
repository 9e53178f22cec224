//! Per-element stamp contracts.
//!
//! Every element knows how to add its own contribution to a shared dense
//! MNA system. Reactive and nonlinear elements do this by building a
//! per-step companion model: a conductance plus, where the model is not
//! exactly linear, an equivalent current source linearized about the
//! previous Newton-Raphson iterate. Nothing here owns a sub-object for its
//! companion model; the model is just a different set of numbers fed into
//! the same handful of stamp primitives every step.
use faer::{Mat, c64};
use ferrite_parser::constants::THERMAL_VOLTAGE;
use ferrite_parser::elements::{Element, Identifiable};

use crate::assembler::{
    Indices, StepContext, stamp_conductance, stamp_conductance_c, stamp_current_source,
    stamp_nodal_conductance_term, stamp_nodal_conductance_term_c, stamp_nodal_current_source,
    stamp_transconductance,
};

/// Linearizes a Shockley junction about `v`: returns `(conductance,
/// current)` at that point.
fn diode_linearize(is: f64, n: f64, vt: f64, v: f64) -> (f64, f64) {
    let nvt = n * vt;
    let exp = (v / nvt).exp();
    let g = (is / nvt) * exp;
    let i = is * (exp - 1.0);
    (g, i)
}

/// The bias point a diode-like junction is linearized about: 0.6V at the
/// very first internal step of the run, otherwise the previous
/// Newton-Raphson iterate's junction voltage, clamped so a stray large
/// guess can't blow up the exponential.
fn junction_bias(ctx: &StepContext, plus: &str, minus: &str) -> f64 {
    if ctx.t == 0.0 && ctx.internal_step == 0 {
        0.6
    } else {
        (ctx.voltage(plus) - ctx.voltage(minus)).min(0.9)
    }
}

pub trait Stampable {
    /// Adds this element's contribution for one real-valued (DC, transient)
    /// evaluation.
    fn stamp(&self, ctx: &StepContext, indices: &Indices, a: &mut Mat<f64>, b: &mut Mat<f64>);

    /// Adds this element's admittance contribution for one AC sweep point.
    /// `bias` is the DC operating point nonlinear elements are linearized
    /// about; `omega` is `2*pi*f`.
    fn stamp_fourier(
        &self,
        bias: &crate::assembler::Solution,
        indices: &Indices,
        omega: f64,
        a: &mut Mat<c64>,
        b: &mut Mat<c64>,
    );
}

impl Stampable for Element {
    fn stamp(&self, ctx: &StepContext, indices: &Indices, a: &mut Mat<f64>, b: &mut Mat<f64>) {
        match self {
            Element::Resistor(r) => {
                let g = (1.0 / r.value).max(0.0);
                stamp_conductance(a, indices.node(&r.plus), indices.node(&r.minus), g);
            }

            Element::Capacitor(c) => {
                let (plus, minus) = (indices.node(&c.plus), indices.node(&c.minus));
                let v0 = ctx.accepted_voltage(&c.plus) - ctx.accepted_voltage(&c.minus);
                let g = match ctx.method {
                    ferrite_parser::analyses::IntegrationMethod::Trapezoidal => {
                        2.0 * c.value / ctx.dt
                    }
                    _ => c.value / ctx.dt,
                };
                stamp_conductance(a, plus, minus, g);
                stamp_current_source(b, plus, minus, -g * v0);
            }

            Element::Inductor(l) => {
                let id = l.identifier();
                let (plus, minus, jx) = (
                    indices.node(&l.plus),
                    indices.node(&l.minus),
                    indices.branch(&id),
                );
                let i0 = ctx.accepted_current(&id);
                let g = match ctx.method {
                    ferrite_parser::analyses::IntegrationMethod::Trapezoidal => {
                        2.0 * l.value / ctx.dt
                    }
                    _ => l.value / ctx.dt,
                };
                a[(plus, jx)] += 1.0;
                a[(minus, jx)] -= 1.0;
                a[(jx, plus)] -= 1.0;
                a[(jx, minus)] += 1.0;
                a[(jx, jx)] += g;
                b[(jx, 0)] += g * i0;
            }

            Element::VoltageSource(v) => {
                let id = v.identifier();
                let (plus, minus, jx) = (
                    indices.node(&v.plus),
                    indices.node(&v.minus),
                    indices.branch(&id),
                );
                a[(plus, jx)] += 1.0;
                a[(minus, jx)] -= 1.0;
                a[(jx, plus)] += 1.0;
                a[(jx, minus)] -= 1.0;
                b[(jx, 0)] += v.value_at(ctx.t, ctx.dt);
            }

            Element::CurrentSource(cs) => {
                let value = cs.value_at(ctx.t, ctx.dt);
                stamp_current_source(b, indices.node(&cs.plus), indices.node(&cs.minus), value);
            }

            Element::Vcvs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm, jx) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                    indices.branch(&id),
                );
                a[(op, jx)] += 1.0;
                a[(om, jx)] -= 1.0;
                a[(jx, op)] += 1.0;
                a[(jx, om)] -= 1.0;
                a[(jx, cp)] -= e.gain;
                a[(jx, cm)] += e.gain;
            }

            Element::Cccs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm, jx) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                    indices.branch(&id),
                );
                a[(cp, jx)] += 1.0;
                a[(cm, jx)] -= 1.0;
                a[(jx, cp)] += 1.0;
                a[(jx, cm)] -= 1.0;
                a[(op, jx)] += e.gain;
                a[(om, jx)] -= e.gain;
            }

            Element::Vccs(e) => {
                let (op, om, cp, cm) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                );
                stamp_transconductance(a, op, om, cp, cm, e.transconductance);
            }

            Element::Ccvs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                );
                let jx = indices.branch(&id);
                let jy = indices.branch2(&id);
                a[(cp, jx)] += 1.0;
                a[(cm, jx)] -= 1.0;
                a[(jx, cp)] += 1.0;
                a[(jx, cm)] -= 1.0;
                a[(op, jy)] += 1.0;
                a[(om, jy)] -= 1.0;
                a[(jy, op)] += 1.0;
                a[(jy, om)] -= 1.0;
                a[(jy, jx)] -= e.transresistance;
            }

            Element::OpAmp(o) => {
                let id = o.identifier();
                let (plus, minus, out, jx) = (
                    indices.node(&o.plus),
                    indices.node(&o.minus),
                    indices.node(&o.output),
                    indices.branch(&id),
                );
                a[(jx, plus)] += 1.0;
                a[(jx, minus)] -= 1.0;
                a[(out, jx)] += 1.0;
            }

            Element::FiniteGainOpAmp(o) => {
                let id = o.identifier();
                let (plus, minus, out, internal, jx) = (
                    indices.node(&o.plus),
                    indices.node(&o.minus),
                    indices.node(&o.output),
                    indices.node(&o.internal),
                    indices.branch(&id),
                );
                stamp_conductance(a, plus, minus, 1.0 / o.rin);
                stamp_conductance(a, internal, out, 1.0 / o.rout);
                a[(internal, jx)] += 1.0;
                a[(jx, internal)] += 1.0;
                a[(jx, plus)] -= o.gain;
                a[(jx, minus)] += o.gain;
                if o.cout > 0.0 {
                    let v0 = ctx.accepted_voltage(&o.output);
                    let g = match ctx.method {
                        ferrite_parser::analyses::IntegrationMethod::Trapezoidal => {
                            2.0 * o.cout / ctx.dt
                        }
                        _ => o.cout / ctx.dt,
                    };
                    stamp_conductance(a, out, 0, g);
                    stamp_current_source(b, out, 0, -g * v0);
                }
            }

            Element::Diode(d) => {
                let (plus, minus) = (indices.node(&d.plus), indices.node(&d.minus));
                let v0 = junction_bias(ctx, &d.plus, &d.minus);
                let (g, i) = diode_linearize(d.is, d.n, d.vt, v0);
                let ieq = i - g * v0;
                stamp_conductance(a, plus, minus, g);
                stamp_current_source(b, plus, minus, ieq);
            }

            Element::BJT(q) => stamp_bjt(q, ctx, indices, a, b),

            Element::Mosfet(m) => stamp_mosfet(m, ctx, indices, a, b),

            Element::LogicGate(gate) => stamp_logic_gate(gate, ctx, indices, a, b),

            Element::PwlResistor(p) => {
                let (plus, minus) = (indices.node(&p.plus), indices.node(&p.minus));
                let v0 = ctx.voltage(&p.plus) - ctx.voltage(&p.minus);
                let (lo, hi) = p.segment_for(v0);
                let g = (hi.1 - lo.1) / (hi.0 - lo.0);
                let i0 = lo.1 + g * (v0 - lo.0);
                let ieq = i0 - g * v0;
                stamp_conductance(a, plus, minus, g);
                stamp_current_source(b, plus, minus, ieq);
            }
        }
    }

    fn stamp_fourier(
        &self,
        bias: &crate::assembler::Solution,
        indices: &Indices,
        omega: f64,
        a: &mut Mat<c64>,
        b: &mut Mat<c64>,
    ) {
        let voltage = |node: &str| -> f64 {
            if node == "0" {
                0.0
            } else {
                bias.get(&crate::assembler::voltage_key(node))
                    .copied()
                    .unwrap_or(0.0)
            }
        };

        match self {
            Element::Resistor(r) => {
                let y = c64::new((1.0 / r.value).max(0.0), 0.0);
                stamp_conductance_c(a, indices.node(&r.plus), indices.node(&r.minus), y);
            }

            Element::Capacitor(c) => {
                let y = c64::new(0.0, omega * c.value);
                stamp_conductance_c(a, indices.node(&c.plus), indices.node(&c.minus), y);
            }

            Element::Inductor(l) => {
                let id = l.identifier();
                let (plus, minus, jx) = (
                    indices.node(&l.plus),
                    indices.node(&l.minus),
                    indices.branch(&id),
                );
                a[(plus, jx)] += c64::new(1.0, 0.0);
                a[(minus, jx)] -= c64::new(1.0, 0.0);
                a[(jx, plus)] -= c64::new(1.0, 0.0);
                a[(jx, minus)] += c64::new(1.0, 0.0);
                a[(jx, jx)] += c64::new(0.0, omega * l.value);
            }

            Element::VoltageSource(v) => {
                let id = v.identifier();
                let (plus, minus, jx) = (
                    indices.node(&v.plus),
                    indices.node(&v.minus),
                    indices.branch(&id),
                );
                a[(plus, jx)] += c64::new(1.0, 0.0);
                a[(minus, jx)] -= c64::new(1.0, 0.0);
                a[(jx, plus)] += c64::new(1.0, 0.0);
                a[(jx, minus)] -= c64::new(1.0, 0.0);
                b[(jx, 0)] += c64::new(v.ac_amplitude, 0.0);
            }

            Element::CurrentSource(cs) => {
                let i = c64::new(cs.ac_amplitude, 0.0);
                let (p, m) = (indices.node(&cs.plus), indices.node(&cs.minus));
                b[(p, 0)] -= i;
                b[(m, 0)] += i;
            }

            Element::Vcvs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm, jx) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                    indices.branch(&id),
                );
                let gain = c64::new(e.gain, 0.0);
                a[(op, jx)] += c64::new(1.0, 0.0);
                a[(om, jx)] -= c64::new(1.0, 0.0);
                a[(jx, op)] += c64::new(1.0, 0.0);
                a[(jx, om)] -= c64::new(1.0, 0.0);
                a[(jx, cp)] -= gain;
                a[(jx, cm)] += gain;
            }

            Element::Cccs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm, jx) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                    indices.branch(&id),
                );
                let gain = c64::new(e.gain, 0.0);
                a[(cp, jx)] += c64::new(1.0, 0.0);
                a[(cm, jx)] -= c64::new(1.0, 0.0);
                a[(jx, cp)] += c64::new(1.0, 0.0);
                a[(jx, cm)] -= c64::new(1.0, 0.0);
                a[(op, jx)] += gain;
                a[(om, jx)] -= gain;
            }

            Element::Vccs(e) => {
                let gm = c64::new(e.transconductance, 0.0);
                let (op, om, cp, cm) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                );
                a[(op, cp)] += gm;
                a[(om, cm)] += gm;
                a[(op, cm)] -= gm;
                a[(om, cp)] -= gm;
            }

            Element::Ccvs(e) => {
                let id = e.identifier();
                let (op, om, cp, cm) = (
                    indices.node(&e.out_plus),
                    indices.node(&e.out_minus),
                    indices.node(&e.ctrl_plus),
                    indices.node(&e.ctrl_minus),
                );
                let jx = indices.branch(&id);
                let jy = indices.branch2(&id);
                let one = c64::new(1.0, 0.0);
                a[(cp, jx)] += one;
                a[(cm, jx)] -= one;
                a[(jx, cp)] += one;
                a[(jx, cm)] -= one;
                a[(op, jy)] += one;
                a[(om, jy)] -= one;
                a[(jy, op)] += one;
                a[(jy, om)] -= one;
                a[(jy, jx)] -= c64::new(e.transresistance, 0.0);
            }

            Element::OpAmp(o) => {
                let id = o.identifier();
                let (plus, minus, out, jx) = (
                    indices.node(&o.plus),
                    indices.node(&o.minus),
                    indices.node(&o.output),
                    indices.branch(&id),
                );
                let one = c64::new(1.0, 0.0);
                a[(jx, plus)] += one;
                a[(jx, minus)] -= one;
                a[(out, jx)] += one;
            }

            Element::FiniteGainOpAmp(o) => {
                let id = o.identifier();
                let (plus, minus, out, internal, jx) = (
                    indices.node(&o.plus),
                    indices.node(&o.minus),
                    indices.node(&o.output),
                    indices.node(&o.internal),
                    indices.branch(&id),
                );
                stamp_conductance_c(a, plus, minus, c64::new(1.0 / o.rin, 0.0));
                stamp_conductance_c(a, internal, out, c64::new(1.0 / o.rout, 0.0));
                let one = c64::new(1.0, 0.0);
                a[(internal, jx)] += one;
                a[(jx, internal)] += one;
                a[(jx, plus)] -= c64::new(o.gain, 0.0);
                a[(jx, minus)] += c64::new(o.gain, 0.0);
                if o.cout > 0.0 {
                    stamp_conductance_c(a, out, 0, c64::new(0.0, omega * o.cout));
                }
            }

            Element::Diode(d) => {
                let v0 = voltage(&d.plus) - voltage(&d.minus);
                let (g, _) = diode_linearize(d.is, d.n, d.vt, v0.min(0.9));
                stamp_conductance_c(a, indices.node(&d.plus), indices.node(&d.minus), c64::new(g, 0.0));
            }

            Element::BJT(q) => stamp_bjt_fourier(q, &voltage, indices, a),

            Element::Mosfet(m) => stamp_mosfet_fourier(m, &voltage, indices, a),

            Element::PwlResistor(p) => {
                let v0 = voltage(&p.plus) - voltage(&p.minus);
                let (lo, hi) = p.segment_for(v0);
                let g = (hi.1 - lo.1) / (hi.0 - lo.0);
                stamp_conductance_c(a, indices.node(&p.plus), indices.node(&p.minus), c64::new(g, 0.0));
            }

            // A logic gate's output stage is a large-signal switch; it has
            // no meaningful small-signal admittance for a frequency sweep.
            Element::LogicGate(_) => {}
        }
    }
}

struct BjtJunctions {
    base: usize,
    collector: usize,
    emitter: usize,
    g_f: f64,
    i_f: f64,
    v_be: f64,
    g_r: f64,
    i_r: f64,
    v_bc: f64,
    alpha_f: f64,
    alpha_r: f64,
}

fn bjt_junctions(
    q: &ferrite_parser::elements::bjt::BJT,
    indices: &Indices,
    v_be: f64,
    v_bc: f64,
) -> BjtJunctions {
    let (base, collector, emitter) = (
        indices.node(&q.base),
        indices.node(&q.collector),
        indices.node(&q.emitter),
    );
    let (g_f, i_f) = diode_linearize(q.is, 1.0, THERMAL_VOLTAGE, v_be);
    let (g_r, i_r) = diode_linearize(q.is, 1.0, THERMAL_VOLTAGE, v_bc);
    BjtJunctions {
        base,
        collector,
        emitter,
        g_f,
        i_f,
        v_be,
        g_r,
        i_r,
        v_bc,
        alpha_f: q.alpha_f,
        alpha_r: q.alpha_r,
    }
}

/// Stamps the simplified Ebers-Moll injection model: two linearized
/// junction diodes (base-emitter, base-collector) plus the two
/// alpha-weighted dependent terms that route a share of each junction's
/// current to the opposite outer terminal.
///
/// `i_B(in) = (1-aF)*iF + (1-aR)*iR`, `i_C(in) = aF*iF - iR`,
/// `i_E(in) = aR*iR - iF`, each affine in `v_be`/`v_bc` about the
/// linearization point; this satisfies `i_B + i_C + i_E = 0` by
/// construction regardless of sign convention, since it is built from the
/// same two junction terms throughout.
fn stamp_bjt(
    q: &ferrite_parser::elements::bjt::BJT,
    ctx: &StepContext,
    indices: &Indices,
    a: &mut Mat<f64>,
    b: &mut Mat<f64>,
) {
    use ferrite_parser::elements::bjt::BjtType;
    let (be_plus, be_minus, bc_plus, bc_minus) = match q.bjt_type {
        BjtType::NPN => (q.base.as_str(), q.emitter.as_str(), q.base.as_str(), q.collector.as_str()),
        BjtType::PNP => (q.emitter.as_str(), q.base.as_str(), q.collector.as_str(), q.base.as_str()),
    };
    let v_be = (ctx.voltage(be_plus) - ctx.voltage(be_minus)).min(0.9);
    let v_bc = (ctx.voltage(bc_plus) - ctx.voltage(bc_minus)).min(0.9);
    let j = bjt_junctions(q, indices, v_be, v_bc);

    let ieq_f = j.i_f - j.g_f * j.v_be;
    let ieq_r = j.i_r - j.g_r * j.v_bc;

    // i_B(in) terms
    stamp_nodal_conductance_term(a, j.base, j.base, (1.0 - j.alpha_f) * j.g_f);
    stamp_nodal_conductance_term(a, j.base, j.emitter, -(1.0 - j.alpha_f) * j.g_f);
    stamp_nodal_conductance_term(a, j.base, j.base, (1.0 - j.alpha_r) * j.g_r);
    stamp_nodal_conductance_term(a, j.base, j.collector, -(1.0 - j.alpha_r) * j.g_r);
    stamp_nodal_current_source(
        b,
        j.base,
        (1.0 - j.alpha_f) * ieq_f + (1.0 - j.alpha_r) * ieq_r,
    );

    // i_C(in) = aF*iF - iR
    stamp_nodal_conductance_term(a, j.collector, j.base, j.alpha_f * j.g_f);
    stamp_nodal_conductance_term(a, j.collector, j.emitter, -j.alpha_f * j.g_f);
    stamp_nodal_conductance_term(a, j.collector, j.base, -j.g_r);
    stamp_nodal_conductance_term(a, j.collector, j.collector, j.g_r);
    stamp_nodal_current_source(b, j.collector, j.alpha_f * ieq_f - ieq_r);

    // i_E(in) = aR*iR - iF
    stamp_nodal_conductance_term(a, j.emitter, j.base, j.alpha_r * j.g_r);
    stamp_nodal_conductance_term(a, j.emitter, j.collector, -j.alpha_r * j.g_r);
    stamp_nodal_conductance_term(a, j.emitter, j.base, -j.g_f);
    stamp_nodal_conductance_term(a, j.emitter, j.emitter, j.g_f);
    stamp_nodal_current_source(b, j.emitter, j.alpha_r * ieq_r - ieq_f);
}

fn stamp_bjt_fourier(
    q: &ferrite_parser::elements::bjt::BJT,
    voltage: &dyn Fn(&str) -> f64,
    indices: &Indices,
    a: &mut Mat<c64>,
) {
    use ferrite_parser::elements::bjt::BjtType;
    let (be_plus, be_minus, bc_plus, bc_minus) = match q.bjt_type {
        BjtType::NPN => (q.base.as_str(), q.emitter.as_str(), q.base.as_str(), q.collector.as_str()),
        BjtType::PNP => (q.emitter.as_str(), q.base.as_str(), q.collector.as_str(), q.base.as_str()),
    };
    let v_be = (voltage(be_plus) - voltage(be_minus)).min(0.9);
    let v_bc = (voltage(bc_plus) - voltage(bc_minus)).min(0.9);
    let j = bjt_junctions(q, indices, v_be, v_bc);
    let (gf, gr) = (c64::new(j.g_f, 0.0), c64::new(j.g_r, 0.0));
    let (af, ar) = (c64::new(j.alpha_f, 0.0), c64::new(j.alpha_r, 0.0));
    let one = c64::new(1.0, 0.0);

    stamp_nodal_conductance_term_c(a, j.base, j.base, (one - af) * gf);
    stamp_nodal_conductance_term_c(a, j.base, j.emitter, -(one - af) * gf);
    stamp_nodal_conductance_term_c(a, j.base, j.base, (one - ar) * gr);
    stamp_nodal_conductance_term_c(a, j.base, j.collector, -(one - ar) * gr);

    stamp_nodal_conductance_term_c(a, j.collector, j.base, af * gf);
    stamp_nodal_conductance_term_c(a, j.collector, j.emitter, -af * gf);
    stamp_nodal_conductance_term_c(a, j.collector, j.base, -gr);
    stamp_nodal_conductance_term_c(a, j.collector, j.collector, gr);

    stamp_nodal_conductance_term_c(a, j.emitter, j.base, ar * gr);
    stamp_nodal_conductance_term_c(a, j.emitter, j.collector, -ar * gr);
    stamp_nodal_conductance_term_c(a, j.emitter, j.base, -gf);
    stamp_nodal_conductance_term_c(a, j.emitter, j.emitter, gf);
}

/// Evaluates the square-law MOSFET model at `(v_gs, v_ds)`: drain current
/// and its partial derivatives `g_m = dId/dVgs`, `g_ds = dId/dVds`. The
/// triode-region `g_ds` uses `W/L`, not `W/K` as some published listings
/// of this model do; that's the single-parameter typo this crate does not
/// repeat.
fn mosfet_evaluate(m: &ferrite_parser::elements::mosfet::Mosfet, v_gs: f64, v_ds: f64) -> (f64, f64, f64) {
    let v_ov = v_gs - m.vth;
    if v_ov <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let wl = m.w / m.l;
    if v_ds < v_ov {
        let lambda_term = 1.0 + m.lambda * v_ds;
        let id = m.k * wl * (2.0 * v_ov * v_ds - v_ds * v_ds) * lambda_term;
        let g_m = m.k * wl * 2.0 * v_ds * lambda_term;
        let g_ds = m.k
            * wl
            * (2.0 * v_ov - 2.0 * v_ds + 4.0 * m.lambda * v_ov - 3.0 * m.lambda * v_ds * v_ds);
        (id, g_m, g_ds)
    } else {
        let id = m.k * wl * v_ov * v_ov * (1.0 + m.lambda * v_ds);
        let g_m = m.k * wl * 2.0 * v_ov * (1.0 + m.lambda * v_ds);
        let g_ds = m.k * wl * v_ov * v_ov * m.lambda;
        (id, g_m, g_ds)
    }
}

fn stamp_mosfet(
    m: &ferrite_parser::elements::mosfet::Mosfet,
    ctx: &StepContext,
    indices: &Indices,
    a: &mut Mat<f64>,
    b: &mut Mat<f64>,
) {
    use ferrite_parser::elements::mosfet::ChannelType;
    let polarity = match m.channel {
        ChannelType::NChannel => 1.0,
        ChannelType::PChannel => -1.0,
    };
    let v_gs = polarity * (ctx.voltage(&m.gate) - ctx.voltage(&m.source));
    let v_ds = polarity * (ctx.voltage(&m.drain) - ctx.voltage(&m.source));
    let (id, g_m, g_ds) = mosfet_evaluate(m, v_gs, v_ds);
    let id = polarity * id;

    let (drain, gate, source) = (
        indices.node(&m.drain),
        indices.node(&m.gate),
        indices.node(&m.source),
    );
    let ieq = id - g_m * v_gs - g_ds * v_ds;

    // drain current (into drain terminal) = g_m*v_gs + g_ds*v_ds + ieq
    stamp_nodal_conductance_term(a, drain, gate, g_m);
    stamp_nodal_conductance_term(a, drain, source, -g_m - g_ds);
    stamp_nodal_conductance_term(a, drain, drain, g_ds);
    stamp_nodal_current_source(b, drain, ieq);

    stamp_nodal_conductance_term(a, source, gate, -g_m);
    stamp_nodal_conductance_term(a, source, source, g_m + g_ds);
    stamp_nodal_conductance_term(a, source, drain, -g_ds);
    stamp_nodal_current_source(b, source, -ieq);
}

fn stamp_mosfet_fourier(
    m: &ferrite_parser::elements::mosfet::Mosfet,
    voltage: &dyn Fn(&str) -> f64,
    indices: &Indices,
    a: &mut Mat<c64>,
) {
    use ferrite_parser::elements::mosfet::ChannelType;
    let polarity = match m.channel {
        ChannelType::NChannel => 1.0,
        ChannelType::PChannel => -1.0,
    };
    let v_gs = polarity * (voltage(&m.gate) - voltage(&m.source));
    let v_ds = polarity * (voltage(&m.drain) - voltage(&m.source));
    let (_, g_m, g_ds) = mosfet_evaluate(m, v_gs, v_ds);
    let (g_m, g_ds) = (c64::new(g_m, 0.0), c64::new(g_ds, 0.0));

    let (drain, gate, source) = (
        indices.node(&m.drain),
        indices.node(&m.gate),
        indices.node(&m.source),
    );
    stamp_nodal_conductance_term_c(a, drain, gate, g_m);
    stamp_nodal_conductance_term_c(a, drain, source, -g_m - g_ds);
    stamp_nodal_conductance_term_c(a, drain, drain, g_ds);
    stamp_nodal_conductance_term_c(a, source, gate, -g_m);
    stamp_nodal_conductance_term_c(a, source, source, g_m + g_ds);
    stamp_nodal_conductance_term_c(a, source, drain, -g_ds);
}

/// Stamps one logic gate: an input capacitor on every input pin (always
/// the backward-Euler companion model, regardless of the outer
/// integration method, since the input node is a high-impedance gate
/// terminal with no meaningful trapezoidal benefit), plus a
/// transconductance/current-source/resistor output stage whose operating
/// point is selected from `v_il()`/`v_ih()`. Two-input gates pick their
/// dominant input by whichever is furthest from its threshold, splitting
/// the diagonal region between the two inputs.
fn stamp_logic_gate(
    gate: &ferrite_parser::elements::logic_gate::LogicGate,
    ctx: &StepContext,
    indices: &Indices,
    a: &mut Mat<f64>,
    b: &mut Mat<f64>,
) {
    use ferrite_parser::elements::logic_gate::LogicGateKind;

    for input in &gate.inputs {
        let node = indices.node(input);
        let v0 = ctx.accepted_voltage(input);
        let g = gate.cin / ctx.dt;
        stamp_conductance(a, node, 0, g);
        stamp_current_source(b, node, 0, -g * v0);
    }

    let v_il = gate.v_il();
    let v_ih = gate.v_ih();
    let mid = gate.supply / 2.0;

    // For two-input gates, the dominant input is whichever one currently
    // decides the output: AND/NAND follow the lower input, OR/NOR follow
    // the higher one, and XOR/XNOR have no single dominant input, so the
    // control term is split evenly across both.
    let (logical_input, control_terms): (f64, Vec<(usize, f64)>) = match gate.kind {
        LogicGateKind::Not => (
            ctx.voltage(&gate.inputs[0]),
            vec![(indices.node(&gate.inputs[0]), 1.0)],
        ),
        LogicGateKind::And | LogicGateKind::Nand => {
            let (va, vb) = (ctx.voltage(&gate.inputs[0]), ctx.voltage(&gate.inputs[1]));
            if va <= vb {
                (va, vec![(indices.node(&gate.inputs[0]), 1.0)])
            } else {
                (vb, vec![(indices.node(&gate.inputs[1]), 1.0)])
            }
        }
        LogicGateKind::Or | LogicGateKind::Nor => {
            let (va, vb) = (ctx.voltage(&gate.inputs[0]), ctx.voltage(&gate.inputs[1]));
            if va >= vb {
                (va, vec![(indices.node(&gate.inputs[0]), 1.0)])
            } else {
                (vb, vec![(indices.node(&gate.inputs[1]), 1.0)])
            }
        }
        LogicGateKind::Xor | LogicGateKind::Xnor => (
            0.5 * (ctx.voltage(&gate.inputs[0]) + ctx.voltage(&gate.inputs[1])),
            vec![
                (indices.node(&gate.inputs[0]), 0.5),
                (indices.node(&gate.inputs[1]), 0.5),
            ],
        ),
    };

    let driven = indices.node(&gate.output);
    let gain = if gate.kind.is_inverting() { -gate.gain } else { gate.gain };

    let (v_out_target, g_out, go) = if logical_input <= v_il {
        (if gate.kind.is_inverting() { gate.supply } else { 0.0 }, 1.0 / gate.rout, 0.0)
    } else if logical_input >= v_ih {
        (if gate.kind.is_inverting() { 0.0 } else { gate.supply }, 1.0 / gate.rout, 0.0)
    } else {
        let v_out = mid + gain * (logical_input - mid);
        (v_out.clamp(0.0, gate.supply), 1.0 / gate.rout, gain / gate.rout)
    };

    stamp_conductance(a, driven, 0, g_out);
    stamp_current_source(b, driven, 0, g_out * v_out_target);
    for (node, weight) in control_terms {
        stamp_nodal_conductance_term(a, driven, node, go * weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diode_linearize_at_zero_bias() {
        let (g, i) = diode_linearize(1e-14, 1.0, THERMAL_VOLTAGE, 0.0);
        assert!(i.abs() < 1e-12);
        assert!(g > 0.0);
    }

    #[test]
    fn test_mosfet_cutoff_has_zero_current() {
        let m = ferrite_parser::elements::mosfet::Mosfet {
            name: "1".into(),
            drain: "d".into(),
            gate: "g".into(),
            source: "s".into(),
            channel: ferrite_parser::elements::mosfet::ChannelType::NChannel,
            w: 1e-6,
            l: 1e-6,
            k: 1e-4,
            vth: 1.0,
            lambda: 0.0,
        };
        let (id, g_m, g_ds) = mosfet_evaluate(&m, 0.5, 1.0);
        assert_eq!(id, 0.0);
        assert_eq!(g_m, 0.0);
        assert_eq!(g_ds, 0.0);
    }

    #[test]
    fn test_mosfet_saturation_current_positive() {
        let m = ferrite_parser::elements::mosfet::Mosfet {
            name: "1".into(),
            drain: "d".into(),
            gate: "g".into(),
            source: "s".into(),
            channel: ferrite_parser::elements::mosfet::ChannelType::NChannel,
            w: 1e-6,
            l: 1e-6,
            k: 1e-4,
            vth: 1.0,
            lambda: 0.0,
        };
        let (id, g_m, _) = mosfet_evaluate(&m, 2.0, 5.0);
        assert!(id > 0.0);
        assert!(g_m > 0.0);
    }
}
