//! The step assembler: builds the dense MNA system for one Newton-Raphson
//! evaluation and reduces it to a solvable system by dropping the ground
//! row/column.
//!
//! Node indices come straight from the `Circuit`'s node directory (ground is
//! always index 0). Auxiliary branch indices — one per Group-2 element, two
//! for a `CCVS` — are assigned once, in element insertion order, starting
//! just past the last node index. Because the element list never changes
//! during a run, this assignment is computed a single time per circuit and
//! reused for every internal step and every Newton-Raphson iteration.

use faer::Mat;
use faer::c64;
use faer::prelude::Solve;
use ferrite_parser::circuit::Circuit;
use ferrite_parser::elements::Identifiable;
use std::collections::HashMap;

use crate::error::Error;
use crate::prelude::Result;

/// A node-voltage/branch-current solution, keyed the way the companion
/// models read it back: `"V(<node>)"` for node voltages and
/// `"I(<identifier>)"` (`"I2(<identifier>)"` for a `CCVS`'s second branch)
/// for auxiliary branch currents.
pub type Solution = HashMap<String, f64>;
pub type ComplexSolution = HashMap<String, c64>;

pub fn voltage_key(node: &str) -> String {
    format!("V({node})")
}

pub fn current_key(identifier: &str) -> String {
    format!("I({identifier})")
}

pub fn current2_key(identifier: &str) -> String {
    format!("I2({identifier})")
}

/// Carries the per-step context a companion model needs: the integration
/// method in force, the step's time and size, and the two solutions a
/// stamp can read back from: the in-progress Newton-Raphson guess
/// (`x_prev`) and the last accepted step (`prev_accepted`), which supplies
/// the `v0`/`i0` history terms reactive companion models need.
pub struct StepContext<'a> {
    pub t: f64,
    pub dt: f64,
    /// Index of this internal step within the current outer step; 0 at the
    /// very first internal step of the whole run (the warm-up step).
    pub internal_step: usize,
    pub method: ferrite_parser::analyses::IntegrationMethod,
    pub x_prev: &'a Solution,
    pub prev_accepted: &'a Solution,
}

impl StepContext<'_> {
    pub fn voltage(&self, node: &str) -> f64 {
        if node == "0" {
            return 0.0;
        }
        self.x_prev.get(&voltage_key(node)).copied().unwrap_or(0.0)
    }

    pub fn accepted_voltage(&self, node: &str) -> f64 {
        if node == "0" {
            return 0.0;
        }
        self.prev_accepted
            .get(&voltage_key(node))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn accepted_current(&self, identifier: &str) -> f64 {
        self.prev_accepted
            .get(&current_key(identifier))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Maps node names and auxiliary branch identifiers onto dense matrix rows.
#[derive(Debug, Clone)]
pub struct Indices {
    node_index: HashMap<String, usize>,
    aux: HashMap<String, (usize, Option<usize>)>,
    /// Total unknown count, including the ground row at index 0.
    pub size: usize,
}

impl Indices {
    pub fn build(circuit: &Circuit) -> Self {
        let node_index = circuit.node_index().clone();
        let mut current_branch = circuit.number_of_nodes();
        let mut aux = HashMap::new();

        for element in &circuit.elements {
            let count = element.auxiliary_branch_count();
            if count == 0 {
                continue;
            }
            current_branch += 1;
            let jx = current_branch;
            let jy = if count == 2 {
                current_branch += 1;
                Some(current_branch)
            } else {
                None
            };
            aux.insert(element.identifier(), (jx, jy));
        }

        Indices {
            node_index,
            aux,
            size: current_branch + 1,
        }
    }

    pub fn node(&self, name: &str) -> usize {
        self.node_index[name]
    }

    /// An auxiliary branch's primary row (`jx`).
    pub fn branch(&self, identifier: &str) -> usize {
        self.aux[identifier].0
    }

    /// A `CCVS`'s second, control-sensing row (`jy`).
    pub fn branch2(&self, identifier: &str) -> usize {
        self.aux[identifier]
            .1
            .expect("element does not own a second auxiliary branch")
    }
}

/// Adds a conductance stamp between two nodes (ground is index 0 and is
/// simply never read back once the reduced system is solved).
pub fn stamp_conductance(a: &mut Mat<f64>, i: usize, j: usize, g: f64) {
    a[(i, i)] += g;
    a[(j, j)] += g;
    a[(i, j)] -= g;
    a[(j, i)] -= g;
}

pub fn stamp_conductance_c(a: &mut Mat<c64>, i: usize, j: usize, y: c64) {
    a[(i, i)] += y;
    a[(j, j)] += y;
    a[(i, j)] -= y;
    a[(j, i)] -= y;
}

/// Adds a voltage-controlled transconductance stamp: a current `gm*(Vp-Vq)`
/// flows from node `i` to node `j`.
pub fn stamp_transconductance(a: &mut Mat<f64>, i: usize, j: usize, p: usize, q: usize, gm: f64) {
    a[(i, p)] += gm;
    a[(j, q)] += gm;
    a[(i, q)] -= gm;
    a[(j, p)] -= gm;
}

/// Adds an independent current source of `value` flowing from `i` to `j`.
pub fn stamp_current_source(b: &mut Mat<f64>, i: usize, j: usize, value: f64) {
    b[(i, 0)] -= value;
    b[(j, 0)] += value;
}

/// Adds one line item of a multi-terminal dependent current: a current of
/// `coeff * V(wrt)` entering node `into`. Three-terminal devices (BJT,
/// MOSFET) are built from several of these, one per (terminal, controlling
/// node) pair; KCL only balances once every term across every terminal has
/// been added, not per call.
pub fn stamp_nodal_conductance_term(a: &mut Mat<f64>, into: usize, wrt: usize, coeff: f64) {
    a[(into, wrt)] -= coeff;
}

pub fn stamp_nodal_conductance_term_c(a: &mut Mat<c64>, into: usize, wrt: usize, coeff: c64) {
    a[(into, wrt)] -= coeff;
}

/// Adds a constant current of `value` entering node `into`.
pub fn stamp_nodal_current_source(b: &mut Mat<f64>, into: usize, value: f64) {
    b[(into, 0)] += value;
}

/// Reduces the assembled `(a, b)` system by dropping the ground row/column,
/// solves it, and prepends `x[0] = 0` to restore the original indexing.
pub fn reduce_and_solve(a: &Mat<f64>, b: &Mat<f64>) -> Result<Vec<f64>> {
    let m = a.nrows();
    let k = m - 1;
    let mut reduced_a = Mat::<f64>::zeros(k, k);
    let mut reduced_b = Mat::<f64>::zeros(k, 1);
    for row in 0..k {
        reduced_b[(row, 0)] = b[(row + 1, 0)];
        for col in 0..k {
            reduced_a[(row, col)] = a[(row + 1, col + 1)];
        }
    }

    let lu = reduced_a.partial_piv_lu();
    let reduced_x = lu.solve(&reduced_b);

    let mut x = Vec::with_capacity(m);
    x.push(0.0);
    for row in 0..k {
        let value = reduced_x[(row, 0)];
        if !value.is_finite() {
            return Err(Error::Numerical(format!(
                "non-finite value at reduced row {row}"
            )));
        }
        x.push(value);
    }
    Ok(x)
}

pub fn reduce_and_solve_complex(a: &Mat<c64>, b: &Mat<c64>) -> Result<Vec<c64>> {
    let m = a.nrows();
    let k = m - 1;
    let mut reduced_a = Mat::<c64>::zeros(k, k);
    let mut reduced_b = Mat::<c64>::zeros(k, 1);
    for row in 0..k {
        reduced_b[(row, 0)] = b[(row + 1, 0)];
        for col in 0..k {
            reduced_a[(row, col)] = a[(row + 1, col + 1)];
        }
    }

    let lu = reduced_a.partial_piv_lu();
    let reduced_x = lu.solve(&reduced_b);

    let mut x = Vec::with_capacity(m);
    x.push(c64::new(0.0, 0.0));
    for row in 0..k {
        let value = reduced_x[(row, 0)];
        if !value.re.is_finite() || !value.im.is_finite() {
            return Err(Error::Numerical(format!(
                "non-finite value at reduced row {row}"
            )));
        }
        x.push(value);
    }
    Ok(x)
}

/// Converts a dense solution vector (indexed by `Indices`) into the named
/// `Solution` map the companion models and result tables read from.
pub fn to_solution(circuit: &Circuit, indices: &Indices, x: &[f64]) -> Solution {
    let mut solution = Solution::new();
    for name in circuit.node_names() {
        solution.insert(voltage_key(name), x[indices.node(name)]);
    }
    for element in &circuit.elements {
        if element.auxiliary_branch_count() == 0 {
            continue;
        }
        let id = element.identifier();
        solution.insert(current_key(&id), x[indices.branch(&id)]);
        if element.auxiliary_branch_count() == 2 {
            solution.insert(current2_key(&id), x[indices.branch2(&id)]);
        }
    }
    solution
}
