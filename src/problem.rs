use num_traits::Float;
use alloc::vec::Vec;
use crate::SolverError;

//

/// Clips `v` into `[lo, hi]`.
///
/// `lo` takes precedence when the interval is empty.
pub fn clip<F: Float>(v: F, lo: F, hi: F) -> F
{
    lo.max(hi.min(v))
}

/// Separable quadratic cost \\( \sum_j x_j^2 / (2 a_j) \\).
pub fn objective<F: Float>(a: &[F], x: &[F]) -> F
{
    let two = F::one() + F::one();
    a.iter().zip(x)
        .fold(F::zero(), |acc, (aj, xj)| acc + *xj * *xj / (two * *aj))
}

fn check_box<F: Float>(a: &[F], l: &[F], u: &[F]) -> Result<(), SolverError>
{
    let n = a.len();

    if n == 0 || l.len() != n || u.len() != n {
        log::error!("Size mismatch: a {}, l {}, u {}", n, l.len(), u.len());
        return Err(SolverError::InvalidInstance);
    }

    for j in 0.. n {
        if !(a[j].is_finite() && l[j].is_finite() && u[j].is_finite()) {
            log::error!("Non-finite value at {}", j);
            return Err(SolverError::InvalidInstance);
        }
        if !(a[j] > F::zero()) {
            log::error!("Non-positive coefficient at {}", j);
            return Err(SolverError::InvalidInstance);
        }
        if l[j] > u[j] {
            log::error!("Crossed box bounds at {}", j);
            return Err(SolverError::InvalidInstance);
        }
    }

    Ok(())
}

// forward pass of ProbQRAPNC::tighten over raw slices
pub(crate) fn tighten_nested<F: Float>(l: &[F], u: &[F], lower_nested: &mut [F], upper_nested: &mut [F])
{
    let n = lower_nested.len();

    if n > 0 {
        lower_nested[0] = lower_nested[0].max(l[0]);
        upper_nested[0] = upper_nested[0].min(u[0]);
    }
    for j in 1.. n {
        lower_nested[j] = lower_nested[j].max(lower_nested[j - 1] + l[j]);
        upper_nested[j] = upper_nested[j].min(upper_nested[j - 1] + u[j]);
    }
}

//

/// Quadratic resource allocation problem
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \sum_j {x_j^2 \over 2 a_j} \\\\
/// {\rm subject \ to} & \sum_j x_j = R \\\\
/// & l_j \le x_j \le u_j,
/// \end{array}
/// \\]
/// where \\( a_j > 0 \\).
#[derive(Debug, Clone, PartialEq)]
pub struct ProbQRAP<F: Float>
{
    /// Cost coefficients \\(a\\).
    pub a: Vec<F>,
    /// Lower box bounds \\(l\\).
    pub l: Vec<F>,
    /// Upper box bounds \\(u\\).
    pub u: Vec<F>,
    /// Resource value \\(R\\).
    pub r: F,
}

impl<F: Float> ProbQRAP<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProbQRAP`] instance.
    /// Nothing is validated until [`ProbQRAP::check`] or a solver runs.
    pub fn new(a: Vec<F>, l: Vec<F>, u: Vec<F>, r: F) -> Self
    {
        ProbQRAP {a, l, u, r}
    }

    /// Number of variables.
    pub fn len(&self) -> usize
    {
        self.a.len()
    }

    /// Validates the instance.
    ///
    /// Returns `Err` with [`SolverError::InvalidInstance`] on any malformed entry.
    pub fn check(&self) -> Result<(), SolverError>
    {
        check_box(&self.a, &self.l, &self.u)?;

        if !self.r.is_finite() {
            log::error!("Non-finite resource value");
            return Err(SolverError::InvalidInstance);
        }

        Ok(())
    }

    /// Cost of `x`.
    pub fn objective(&self, x: &[F]) -> F
    {
        objective(&self.a, x)
    }
}

//

/// Quadratic resource allocation problem with nested constraints
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \sum_j {x_j^2 \over 2 a_j} \\\\
/// {\rm subject \ to} & L_i \le \sum_{k \le i} x_k \le U_i \quad (i = 0, \ldots, n-1) \\\\
/// & l_j \le x_j \le u_j.
/// \end{array}
/// \\]
#[derive(Debug, Clone, PartialEq)]
pub struct ProbQRAPNC<F: Float>
{
    /// Cost coefficients \\(a\\).
    pub a: Vec<F>,
    /// Lower box bounds \\(l\\).
    pub l: Vec<F>,
    /// Upper box bounds \\(u\\).
    pub u: Vec<F>,
    /// Lower nested bounds \\(L\\).
    pub lower_nested: Vec<F>,
    /// Upper nested bounds \\(U\\).
    pub upper_nested: Vec<F>,
}

impl<F: Float> ProbQRAPNC<F>
{
    /// Creates an instance.
    ///
    /// Returns [`ProbQRAPNC`] instance.
    /// Nothing is validated until [`ProbQRAPNC::check`] or a solver runs.
    pub fn new(a: Vec<F>, l: Vec<F>, u: Vec<F>, lower_nested: Vec<F>, upper_nested: Vec<F>) -> Self
    {
        ProbQRAPNC {a, l, u, lower_nested, upper_nested}
    }

    /// Number of variables.
    pub fn len(&self) -> usize
    {
        self.a.len()
    }

    /// Validates the instance.
    ///
    /// Returns `Err` with [`SolverError::InvalidInstance`] on any malformed entry.
    pub fn check(&self) -> Result<(), SolverError>
    {
        check_box(&self.a, &self.l, &self.u)?;

        let n = self.len();
        if self.lower_nested.len() != n || self.upper_nested.len() != n {
            log::error!("Size mismatch: n {}, lower_nested {}, upper_nested {}",
                n, self.lower_nested.len(), self.upper_nested.len());
            return Err(SolverError::InvalidInstance);
        }

        for i in 0.. n {
            let (lo, up) = (self.lower_nested[i], self.upper_nested[i]);
            if !(lo.is_finite() && up.is_finite()) {
                log::error!("Non-finite nested bound at {}", i);
                return Err(SolverError::InvalidInstance);
            }
            if lo > up {
                log::error!("Crossed nested bounds at {}", i);
                return Err(SolverError::InvalidInstance);
            }
        }

        Ok(())
    }

    /// Tightens the nested bounds against the box bounds.
    ///
    /// Returns a copy with
    /// \\( L_0 \leftarrow \max(L_0, l_0) \\), \\( U_0 \leftarrow \min(U_0, u_0) \\) and
    /// \\( L_i \leftarrow \max(L_i, L_{i-1} + l_i) \\), \\( U_i \leftarrow \min(U_i, U_{i-1} + u_i) \\).
    pub fn tighten(&self) -> Self
    {
        let mut prob = self.clone();
        tighten_nested(&prob.l, &prob.u, &mut prob.lower_nested, &mut prob.upper_nested);

        prob
    }

    /// Tests whether any solution exists.
    ///
    /// Returns `Err` with [`SolverError::Infeasible`]
    /// if the tightened nested bounds (see [`ProbQRAPNC::tighten`]) cross by more than `eps`.
    pub fn check_feasible(&self, eps: F) -> Result<(), SolverError>
    {
        let tight = self.tighten();

        for i in 0.. tight.len() {
            if tight.lower_nested[i] > tight.upper_nested[i] + eps {
                log::warn!("Infeasible: no prefix sum reaches nested bounds at {}", i);
                return Err(SolverError::Infeasible);
            }
        }

        Ok(())
    }

    /// Tests whether `x` satisfies the box and nested bounds within `eps`.
    pub fn is_feasible(&self, x: &[F], eps: F) -> bool
    {
        if x.len() != self.len() {
            return false;
        }

        let mut sum = F::zero();
        for j in 0.. x.len() {
            if x[j] < self.l[j] - eps || x[j] > self.u[j] + eps {
                return false;
            }
            sum = sum + x[j];
            if sum < self.lower_nested[j] - eps || sum > self.upper_nested[j] + eps {
                return false;
            }
        }

        true
    }

    /// Cost of `x`.
    pub fn objective(&self, x: &[F]) -> F
    {
        objective(&self.a, x)
    }
}

//

#[cfg(test)]
mod tests
{
    use super::*;
    use alloc::vec;

    #[test]
    fn test_tighten_keeps_input()
    {
        let prob = ProbQRAPNC::new(
            vec![1., 1., 1.],
            vec![1., 2., 0.],
            vec![3., 4., 5.],
            vec![0., 0., 4.],
            vec![10., 10., 10.],
        );
        let tight = prob.tighten();

        assert_eq!(tight.lower_nested, vec![1., 3., 4.]);
        assert_eq!(tight.upper_nested, vec![3., 7., 10.]);
        assert_eq!(prob.lower_nested, vec![0., 0., 4.]);
        assert_eq!(prob.upper_nested, vec![10., 10., 10.]);
    }

    #[test]
    fn test_check()
    {
        let ok = ProbQRAPNC::new(vec![1.], vec![0.], vec![1.], vec![0.], vec![1.]);
        assert_eq!(ok.check(), Ok(()));

        let bad_a = ProbQRAPNC::new(vec![0.], vec![0.], vec![1.], vec![0.], vec![1.]);
        assert_eq!(bad_a.check(), Err(SolverError::InvalidInstance));

        let bad_box = ProbQRAPNC::new(vec![1.], vec![2.], vec![1.], vec![0.], vec![1.]);
        assert_eq!(bad_box.check(), Err(SolverError::InvalidInstance));

        let bad_nested = ProbQRAPNC::new(vec![1.], vec![0.], vec![1.], vec![1.], vec![0.]);
        assert_eq!(bad_nested.check(), Err(SolverError::InvalidInstance));

        let bad_len = ProbQRAPNC::new(vec![1., 1.], vec![0.], vec![1.], vec![1.], vec![0.]);
        assert_eq!(bad_len.check(), Err(SolverError::InvalidInstance));

        let empty = ProbQRAP::<f64>::new(vec![], vec![], vec![], 0.);
        assert_eq!(empty.check(), Err(SolverError::InvalidInstance));

        let nan = ProbQRAP::new(vec![1.], vec![0.], vec![1.], f64::NAN);
        assert_eq!(nan.check(), Err(SolverError::InvalidInstance));
    }

    #[test]
    fn test_feasible_and_objective()
    {
        let prob = ProbQRAPNC::new(
            vec![1., 2.],
            vec![0., 0.],
            vec![5., 5.],
            vec![1., 3.],
            vec![2., 3.],
        );

        assert!(prob.is_feasible(&[1.5, 1.5], 1e-9));
        assert!(!prob.is_feasible(&[2.5, 0.5], 1e-9));
        assert!(!prob.is_feasible(&[1.5], 1e-9));
        assert_eq!(prob.objective(&[2., 2.]), 2. + 1.);
        assert_eq!(clip(7., 0., 5.), 5.);
        assert_eq!(clip(-1., 0., 5.), 0.);
    }
}
