/// Solver errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError
{
    /// Invalid problem instance:
    /// length mismatch, empty, non-finite value, non-positive coefficient or crossed bounds.
    InvalidInstance,
    /// No solution satisfies the box and nested bounds.
    Infeasible,
    /// Division by a vanishing free weight.
    NumericDegenerate,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidInstance   => "InvalidInstance: invalid problem instance",
            SolverError::Infeasible        => "Infeasible: no solution satisfies the bounds",
            SolverError::NumericDegenerate => "NumericDegenerate: division by a vanishing free weight",
        })
    }
}

//

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for SolverError {}
