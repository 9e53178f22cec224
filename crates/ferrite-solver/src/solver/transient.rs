//! The time-stepping driver: a DC warm-up, then a fixed number of
//! internal steps per requested output step, each run through the
//! Newton-Raphson loop when the circuit has nonlinear elements.
use ferrite_parser::analyses::TransientAnalysis;
use ferrite_parser::circuit::Circuit;
use log::info;

use crate::assembler::{Indices, Solution};
use crate::prelude::*;
use crate::solver::op;

pub fn solve(
    circuit: &Circuit,
    config: &SolverConfig,
    tran: &TransientAnalysis,
) -> Result<Vec<(f64, Solution)>> {
    info!("Calculating initial operating point...");
    let initial = op::solve(circuit, config)?;
    let indices = Indices::build(circuit);

    let mut results = vec![(0.0, initial.clone())];

    let internal_multiplier = tran.internal_multiplier.max(1);
    let dt = tran.step / internal_multiplier as f64;
    let warm_up_dt = dt / config.warm_up_factor;
    let num_outer_steps = (tran.end_time / tran.step).round() as usize;

    info!(
        "Starting transient analysis from t=0 to t={}s, {} internal step(s) per {}s output step",
        tran.end_time, internal_multiplier, tran.step
    );

    // The warm-up step settles the companion models a tiny fraction of a
    // step into the simulation before the regular step size takes over.
    // `UIC` only changes what this step's initial guess is seeded from;
    // the step itself always runs.
    let mut prev_accepted = if tran.use_initial_conditions {
        seed_from_initial_conditions(circuit, &initial)
    } else {
        initial
    };
    prev_accepted = op::newton_raphson(
        circuit,
        &indices,
        config,
        0.0,
        warm_up_dt,
        0,
        tran.method,
        &prev_accepted,
    )?;

    let mut internal_step = 1usize;
    for step in 1..=num_outer_steps {
        let outer_start = (step - 1) as f64 * tran.step;
        let mut accepted = prev_accepted;
        for k in 1..=internal_multiplier {
            let current_time = outer_start + k as f64 * dt;
            accepted = op::newton_raphson(
                circuit,
                &indices,
                config,
                current_time,
                dt,
                internal_step,
                tran.method,
                &accepted,
            )?;
            internal_step += 1;
        }
        let output_time = step as f64 * tran.step;
        results.push((output_time, accepted.clone()));
        prev_accepted = accepted;
    }

    Ok(results)
}

/// Seeds the first accepted solution's history entries straight from the
/// reactive elements' `IC=` values, approximating a capacitor's stored
/// terminal voltage as a single node value and an inductor's stored
/// current directly.
fn seed_from_initial_conditions(circuit: &Circuit, dc_solution: &Solution) -> Solution {
    use crate::assembler::{current_key, voltage_key};
    use ferrite_parser::elements::{Element, Identifiable};

    let mut seeded = dc_solution.clone();
    for element in &circuit.elements {
        match element {
            Element::Capacitor(c) => {
                if let Some(ic) = c.ic {
                    seeded.insert(voltage_key(&c.plus), ic);
                }
            }
            Element::Inductor(l) => {
                if let Some(ic) = l.ic {
                    seeded.insert(current_key(&l.identifier()), ic);
                }
            }
            _ => {}
        }
    }
    seeded
}
