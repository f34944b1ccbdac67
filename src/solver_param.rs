use num_traits::Float;

//

/// Default tolerance of equality tests between a resource sum and its target.
pub const EPS_EQ: f64 = 1e-6;

/// Default tolerance of nested constraint violations.
pub const EPS_VIOL: f64 = 1e-5;

/// Default tolerance of small positive value to avoid division by zero.
pub const EPS_ZERO: f64 = 1e-12;

//

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Tolerance of equality tests between a resource sum and its target.
    pub eps_eq: F,
    /// Tolerance of nested constraint violations.
    pub eps_viol: F,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: F,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        SolverParam {
            eps_eq: F::from(EPS_EQ).unwrap(),
            eps_viol: F::from(EPS_VIOL).unwrap(),
            eps_zero: F::from(EPS_ZERO).unwrap(),
        }
    }
}

impl<F: Float> SolverParam<F>
{
    /// Divides `num` by a free weight `den`.
    ///
    /// Returns `None` if `den` is too small in magnitude.
    pub(crate) fn div_free(&self, num: F, den: F) -> Option<F>
    {
        if den.abs() <= self.eps_zero {
            None
        }
        else {
            Some(num / den)
        }
    }
}
