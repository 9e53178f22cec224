use thiserror::Error;

/// Failures raised by the solver core.
///
/// Structural errors (unknown element letter, bad arity, missing directive)
/// belong to `ferrite_parser::Error` and never surface here: by the time a
/// `Circuit` reaches this crate it is already well-formed. What remains are
/// the two failure classes a driver can still hit once it starts stamping
/// and solving.
#[derive(Error, Debug)]
pub enum Error {
    /// The Newton-Raphson loop failed to converge for every random restart
    /// up to the guess cap.
    #[error("no solution found after {guesses} random initial guesses")]
    ImpossibleSolution { guesses: usize },

    /// The reduced system was singular, or produced a non-finite value.
    #[error("numerical failure solving the reduced system: {0}")]
    Numerical(String),
}
