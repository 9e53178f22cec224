//! The frequency sweep: one DC bias point, then a Fourier-domain stamp
//! pass at every frequency on a logarithmic grid.
use faer::c64;
use ferrite_parser::analyses::AcAnalysis;
use ferrite_parser::circuit::Circuit;
use log::info;
use std::f64::consts::PI;

use crate::assembler::{self, ComplexSolution, Indices};
use crate::prelude::*;
use crate::solver::op;
use crate::stampable::Stampable;

/// Builds the logarithmic frequency grid from `f_start` to `f_end` at
/// `steps_per_decade` points per decade. The directive's `scale` token is
/// accepted but never consulted: the sweep is always logarithmic,
/// matching the known behavior of the source this was distilled from.
fn frequency_grid(params: &AcAnalysis) -> Vec<f64> {
    if params.f_start <= 0.0 || params.f_end <= params.f_start || params.steps_per_decade == 0 {
        return Vec::new();
    }
    let decades = (params.f_end / params.f_start).log10();
    let num_points = (decades * params.steps_per_decade as f64).round().max(1.0) as usize;
    let log_start = params.f_start.log10();
    let log_end = params.f_end.log10();
    let step = (log_end - log_start) / num_points as f64;

    (0..=num_points)
        .map(|i| 10f64.powf(log_start + step * i as f64))
        .collect()
}

/// Solves the small-signal AC response at every frequency in the sweep.
/// Nonlinear elements are linearized once, about the DC bias point, and
/// held fixed for every frequency in the grid.
pub fn solve(
    circuit: &Circuit,
    config: &SolverConfig,
    params: &AcAnalysis,
) -> Result<Vec<(f64, ComplexSolution)>> {
    info!("Calculating DC operating point for AC analysis...");
    let bias = op::solve(circuit, config)?;
    let indices = Indices::build(circuit);

    let frequencies = frequency_grid(params);
    info!("Starting AC sweep over {} frequencies...", frequencies.len());

    let mut all_results = Vec::with_capacity(frequencies.len());
    for frequency in frequencies {
        let omega = 2.0 * PI * frequency;
        let mut a = faer::Mat::<c64>::zeros(indices.size, indices.size);
        let mut b = faer::Mat::<c64>::zeros(indices.size, 1);
        for element in &circuit.elements {
            element.stamp_fourier(&bias, &indices, omega, &mut a, &mut b);
        }
        let x = assembler::reduce_and_solve_complex(&a, &b)?;

        let mut solution = ComplexSolution::new();
        for name in circuit.node_names() {
            solution.insert(assembler::voltage_key(name), x[indices.node(name)]);
        }
        all_results.push((frequency, solution));
    }

    Ok(all_results)
}
