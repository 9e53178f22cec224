//! The DC operating point: the shared Newton-Raphson helper every other
//! driver warms up from. A huge step size makes a capacitor's `g = C/dt`
//! companion conductance negligible (open circuit); an inductor's branch
//! equation `V(plus)-V(minus) = (L/dt)*(i-i0)` degenerates to a short
//! under the same limit. One stamp implementation covers both the
//! steady-state solve and every transient step; nothing here special-cases
//! reactive elements.
use ferrite_parser::analyses::IntegrationMethod;
use ferrite_parser::circuit::Circuit;
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::assembler::{self, Indices, Solution, StepContext};
use crate::prelude::*;
use crate::stampable::Stampable;

const DC_STEP: f64 = 1e9;

fn solve_once(circuit: &Circuit, indices: &Indices, ctx: &StepContext) -> Result<Vec<f64>> {
    let mut a = faer::Mat::<f64>::zeros(indices.size, indices.size);
    let mut b = faer::Mat::<f64>::zeros(indices.size, 1);
    for element in &circuit.elements {
        element.stamp(ctx, indices, &mut a, &mut b);
    }
    assembler::reduce_and_solve(&a, &b)
}

/// Runs one internal step: a single pass for a linear circuit, or the
/// Newton-Raphson loop (random restart up to `config.guess_cap` times) for
/// a nonlinear one.
pub fn newton_raphson(
    circuit: &Circuit,
    indices: &Indices,
    config: &SolverConfig,
    t: f64,
    dt: f64,
    internal_step: usize,
    method: IntegrationMethod,
    prev_accepted: &Solution,
) -> Result<Solution> {
    let empty = Solution::new();

    if !circuit.has_nonlinear {
        let ctx = StepContext {
            t,
            dt,
            internal_step,
            method,
            x_prev: &empty,
            prev_accepted,
        };
        let x = solve_once(circuit, indices, &ctx)?;
        return Ok(assembler::to_solution(circuit, indices, &x));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    for guess_number in 0..config.guess_cap {
        let mut x_prev = Solution::new();
        for name in circuit.node_names() {
            x_prev.insert(assembler::voltage_key(name), rng.gen_range(1.0..101.0));
        }

        let mut result = Solution::new();
        let mut converged = false;
        for _ in 0..config.nr_iteration_cap {
            let ctx = StepContext {
                t,
                dt,
                internal_step,
                method,
                x_prev: &x_prev,
                prev_accepted,
            };
            let x = solve_once(circuit, indices, &ctx)?;
            result = assembler::to_solution(circuit, indices, &x);

            let delta = result
                .iter()
                .map(|(key, value)| (value - x_prev.get(key).copied().unwrap_or(0.0)).abs())
                .fold(0.0_f64, f64::max);

            if delta <= config.tolerance {
                converged = true;
                break;
            }
            x_prev = result.clone();
        }

        if converged {
            return Ok(result);
        }
        let _ = guess_number;
    }

    Err(Error::ImpossibleSolution {
        guesses: config.guess_cap,
    })
}

/// Solves for the DC operating point, used as the warm-up for a transient
/// run and as the linearization bias for an AC sweep.
pub fn solve(circuit: &Circuit, config: &SolverConfig) -> Result<Solution> {
    let indices = Indices::build(circuit);
    let empty = Solution::new();
    let result = newton_raphson(
        circuit,
        &indices,
        config,
        0.0,
        DC_STEP,
        0,
        IntegrationMethod::BackwardEuler,
        &empty,
    )?;
    info!("DC operating point solved");
    Ok(result)
}
