/// Tunables for the Newton-Raphson driver and the dense assembler.
///
/// The convergence-related defaults are the ones used throughout the
/// transient and AC drivers: a single infinity-norm tolerance, a cap on
/// inner Newton-Raphson iterations per guess, and a cap on the number of
/// random restarts before a circuit is declared unsolvable.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Infinity-norm tolerance `‖x - x_prev‖∞` for Newton-Raphson convergence.
    pub tolerance: f64,

    /// Maximum inner Newton-Raphson iterations per initial guess.
    pub nr_iteration_cap: usize,

    /// Maximum number of random initial guesses before giving up.
    pub guess_cap: usize,

    /// Divides the first (warm-up) internal step's size at t=0, so the
    /// companion models settle close to their steady state before the
    /// regular step size takes over.
    pub warm_up_factor: f64,

    /// Seed for the generator that draws Newton-Raphson restart guesses.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 1e-4,
            nr_iteration_cap: 20,
            guess_cap: 100,
            warm_up_factor: 1e9,
            seed: 0x5EED_u64,
        }
    }
}
