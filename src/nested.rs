use num_traits::Float;
use alloc::vec::Vec;
use crate::{SolverError, ProbQRAPNC};

//

/// Common interface of the [`ProbQRAPNC`] solvers.
///
/// [`crate::DecompSolver`], [`crate::SeqSolver`] and [`crate::InfeasSolver`]
/// return the same optimal solution, up to their tolerances,
/// for an instance whose total resource is pinned by \\( L_{n-1} = U_{n-1} \\).
pub trait NestedSolver<F: Float>
{
    /// Solves `prob` without modifying it.
    ///
    /// Returns `Ok` with an optimal \\(x\\) or `Err` with [`SolverError`] type.
    fn solve_nested(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>;
}
