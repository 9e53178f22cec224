pub mod ac;
pub mod op;
pub mod transient;

use ferrite_parser::analyses::Directive;
use ferrite_parser::circuit::Circuit;

use crate::prelude::*;
use crate::AnalysisResult;

/// Dispatches a parsed circuit and its trailing directive to the matching
/// analysis driver.
pub struct Solver {
    circuit: Circuit,
    config: SolverConfig,
}

impl Solver {
    pub const fn new(circuit: Circuit, config: SolverConfig) -> Self {
        Self { circuit, config }
    }

    pub fn solve(&self, directive: Directive) -> Result<AnalysisResult> {
        match directive {
            Directive::Tran(tran) => {
                let result = transient::solve(&self.circuit, &self.config, &tran)?;
                Ok(AnalysisResult::Transient(result))
            }
            Directive::Ac(ac_params) => {
                let result = ac::solve(&self.circuit, &self.config, &ac_params)?;
                Ok(AnalysisResult::Ac(result))
            }
        }
    }
}
