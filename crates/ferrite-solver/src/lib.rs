pub mod assembler;
pub mod config;
pub mod error;
pub mod prelude;
pub mod solver;
pub mod stampable;

use crate::assembler::{ComplexSolution, Solution};

/// Holds the output data from a completed analysis, one variant per
/// directive the netlist can end in.
#[derive(Debug, Clone)]
pub enum AnalysisResult {
    /// A transient run: one `(time, solution)` pair per recorded output
    /// step.
    Transient(Vec<(f64, Solution)>),

    /// An AC sweep: one `(frequency, solution)` pair per grid point.
    Ac(Vec<(f64, ComplexSolution)>),
}

impl AnalysisResult {
    /// Unwraps the `Transient` result.
    ///
    /// # Panics
    /// Panics if the result is not `AnalysisResult::Transient`.
    pub fn into_transient(self) -> Vec<(f64, Solution)> {
        match self {
            AnalysisResult::Transient(result) => result,
            AnalysisResult::Ac(_) => panic!("called `into_transient()` on an Ac result"),
        }
    }

    /// Unwraps the `Ac` result.
    ///
    /// # Panics
    /// Panics if the result is not `AnalysisResult::Ac`.
    pub fn into_ac(self) -> Vec<(f64, ComplexSolution)> {
        match self {
            AnalysisResult::Ac(result) => result,
            AnalysisResult::Transient(_) => panic!("called `into_ac()` on a Transient result"),
        }
    }
}
