//! Infeasibility-guided solver

use num_traits::Float;
use core::fmt::Debug;
use alloc::vec::Vec;
use alloc::vec;
use crate::{SolverError, SolverParam, ProbQRAPNC, MedianSolver, NestedSolver};
use crate::problem::tighten_nested;

//

#[derive(Debug, Clone, Copy, PartialEq)]
enum Violation
{
    Lower,
    Upper,
}

//

/// Solver of [`ProbQRAPNC`] by infeasibility-guided decomposition.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The nested bounds of every part are tightened (see [`ProbQRAPNC::tighten`]) before it is solved.
/// All nested constraints but the last are relaxed, and the relaxation with
/// \\( \sum_j x_j = U_{n-1} \\) is solved by [`MedianSolver`].
/// The most violated nested constraint (earliest index on ties) is then pinned to its violated side,
/// and both parts split at that index are solved recursively.
pub struct InfeasSolver<F: Float>
{
    /// solver parameters.
    pub par: SolverParam<F>,
}

impl<F: Float> InfeasSolver<F>
{
    /// Creates an instance.
    ///
    /// Returns [`InfeasSolver`] instance.
    pub fn new() -> Self
    {
        InfeasSolver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`InfeasSolver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float + Debug> InfeasSolver<F>
{
    /// Starts to solve a [`ProbQRAPNC`].
    ///
    /// Returns `Ok` with an optimal \\(x\\) or `Err` with [`SolverError`] type.
    pub fn solve(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        prob.check()?;
        prob.check_feasible(self.par.eps_eq)?;

        log::debug!("infeasibility-guided: n {}, {:?}", prob.len(), self.par);

        let median = MedianSolver::new().par(|p| *p = self.par.clone());

        self.infeas(&median, &prob.a, &prob.l, &prob.u,
            prob.lower_nested.clone(), prob.upper_nested.clone(), 0)
    }

    fn infeas(&self, median: &MedianSolver<F>, a: &[F], l: &[F], u: &[F],
        mut lower_nested: Vec<F>, mut upper_nested: Vec<F>, depth: usize) -> Result<Vec<F>, SolverError>
    {
        let n = a.len();
        tighten_nested(l, u, &mut lower_nested, &mut upper_nested);

        if n == 1 {
            return Ok(vec![upper_nested[0]]);
        }

        let mut x = median.solve_slices(a, l, u, upper_nested[n - 1])?;

        let (idx, violation) = match self.most_violated(&x, &lower_nested, &upper_nested) {
            Some(v) => v,
            None => return Ok(x),
        };

        log::trace!("{}: most violated {:?} at {} of {}", depth, violation, idx, n);

        let pin = match violation {
            Violation::Upper => upper_nested[idx],
            Violation::Lower => lower_nested[idx],
        };
        lower_nested[idx] = pin;
        upper_nested[idx] = pin;
        for i in idx + 1.. n {
            lower_nested[i] = lower_nested[i] - pin;
            upper_nested[i] = upper_nested[i] - pin;
        }

        let lower_right = lower_nested.split_off(idx + 1);
        let upper_right = upper_nested.split_off(idx + 1);

        let x_left = self.infeas(median, &a[..= idx], &l[..= idx], &u[..= idx],
            lower_nested, upper_nested, depth + 1)?;
        x[..= idx].copy_from_slice(&x_left);

        if idx + 1 < n {
            let x_right = self.infeas(median, &a[idx + 1..], &l[idx + 1..], &u[idx + 1..],
                lower_right, upper_right, depth + 1)?;
            x[idx + 1..].copy_from_slice(&x_right);
        }

        Ok(x)
    }

    fn most_violated(&self, x: &[F], lower_nested: &[F], upper_nested: &[F]) -> Option<(usize, Violation)>
    {
        let eps = self.par.eps_viol;

        let mut sum = F::zero();
        let mut max_viol = F::zero();
        let mut found = None;

        for i in 0.. x.len() {
            sum = sum + x[i];

            if sum > upper_nested[i] + eps {
                if sum - upper_nested[i] > max_viol {
                    max_viol = sum - upper_nested[i];
                    found = Some((i, Violation::Upper));
                }
            }
            else if sum < lower_nested[i] - eps {
                if lower_nested[i] - sum > max_viol {
                    max_viol = lower_nested[i] - sum;
                    found = Some((i, Violation::Lower));
                }
            }
        }

        found
    }
}

impl<F: Float + Debug> NestedSolver<F> for InfeasSolver<F>
{
    fn solve_nested(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        self.solve(prob)
    }
}

//
