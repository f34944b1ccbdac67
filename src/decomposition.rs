//! Merge decomposition solver

use num_traits::Float;
use core::fmt::Debug;
use alloc::vec::Vec;
use alloc::vec;
use crate::{SolverError, SolverParam, ProbQRAPNC, MedianSolver, NestedSolver, clip};

//

// 0: lower nested bound, 1: upper nested bound
const REGIMES: [(usize, usize); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

type BoundarySol<F> = [[Vec<F>; 2]; 2];

fn nested<F: Float>(prob: &ProbQRAPNC<F>, regime: usize, i: usize) -> F
{
    if regime == 0 {
        prob.lower_nested[i]
    }
    else {
        prob.upper_nested[i]
    }
}

// prefix sum in front of `start` tight to `regime`
fn prefix<F: Float>(prob: &ProbQRAPNC<F>, regime: usize, start: usize) -> F
{
    if start == 0 {
        F::zero()
    }
    else {
        nested(prob, regime, start - 1)
    }
}

//

/// Solver of [`ProbQRAPNC`] by merge decomposition.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The index range is halved recursively.
/// Each range \\( [s, e] \\) keeps four boundary solutions \\( x^{(p, q)} \\),
/// where the prefix sum up to \\( s - 1 \\) is tight to \\(L\\) (\\(p = 0\\)) or \\(U\\) (\\(p = 1\\))
/// and the prefix sum up to \\(e\\) is tight to \\(L\\) (\\(q = 0\\)) or \\(U\\) (\\(q = 1\\)).
/// The boundary solutions of the two halves bound those of the merged range,
/// which are then found by [`MedianSolver`] or by a closed-form interpolation.
/// The nested bounds are tightened first (see [`ProbQRAPNC::tighten`]).
/// The answer is \\( x^{(0, 1)} \\) of the whole range, so the total resource is the tightened \\( U_{n-1} \\).
pub struct DecompSolver<F: Float>
{
    /// solver parameters.
    pub par: SolverParam<F>,
}

impl<F: Float> DecompSolver<F>
{
    /// Creates an instance.
    ///
    /// Returns [`DecompSolver`] instance.
    pub fn new() -> Self
    {
        DecompSolver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`DecompSolver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float + Debug> DecompSolver<F>
{
    /// Starts to solve a [`ProbQRAPNC`].
    ///
    /// Returns `Ok` with an optimal \\(x\\) or `Err` with [`SolverError`] type.
    pub fn solve(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        prob.check()?;
        prob.check_feasible(self.par.eps_eq)?;

        let prob = &prob.tighten();
        let n = prob.len();
        log::debug!("decomposition: n {}, {:?}", n, self.par);

        if n == 1 {
            return Ok(vec![clip(prob.upper_nested[0], prob.l[0], prob.u[0])]);
        }

        let median = MedianSolver::new().par(|p| *p = self.par.clone());

        let mut sol: BoundarySol<F> = [
            [vec![F::zero(); n], vec![F::zero(); n]],
            [vec![F::zero(); n], vec![F::zero(); n]],
        ];

        self.decomp(prob, &median, 0, n - 1, &mut sol)?;

        let [[_, sol_01], _] = sol;
        Ok(sol_01)
    }

    fn decomp(&self, prob: &ProbQRAPNC<F>, median: &MedianSolver<F>,
        start: usize, end: usize, sol: &mut BoundarySol<F>) -> Result<(), SolverError>
    {
        if start == end {
            for (p, q) in REGIMES {
                sol[p][q][start] = nested(prob, q, start) - prefix(prob, p, start);
            }
            return Ok(());
        }

        let mid = (start + end) / 2;
        self.decomp(prob, median, start, mid, sol)?;
        self.decomp(prob, median, mid + 1, end, sol)?;

        log::trace!("merge [{}, {}] + [{}, {}]", start, mid, mid + 1, end);

        // each case sees the entries written by the preceding ones
        for (p, q) in REGIMES {
            let mut cur_lower = Vec::with_capacity(end + 1 - start);
            let mut cur_upper = Vec::with_capacity(end + 1 - start);
            cur_lower.extend_from_slice(&sol[p][0][start..= mid]);
            cur_lower.extend_from_slice(&sol[1][q][mid + 1..= end]);
            cur_upper.extend_from_slice(&sol[p][1][start..= mid]);
            cur_upper.extend_from_slice(&sol[0][q][mid + 1..= end]);

            let (alt_lower, alt_upper) = Self::alt_bounds(prob, start, &cur_lower, &cur_upper);

            let target = nested(prob, q, end) - prefix(prob, p, start);

            let sum_lower = alt_lower.iter().fold(F::zero(), |s, v| s + *v);
            let sum_upper = alt_upper.iter().fold(F::zero(), |s, v| s + *v);

            let x = if target < sum_lower - self.par.eps_eq {
                let sum_cur = cur_lower.iter().fold(F::zero(), |s, v| s + *v);
                self.interpolate(target, sum_lower, sum_cur, &alt_lower, &cur_lower)?
            }
            else if target > sum_upper + self.par.eps_eq {
                let sum_cur = cur_upper.iter().fold(F::zero(), |s, v| s + *v);
                self.interpolate(target, sum_upper, sum_cur, &alt_upper, &cur_upper)?
            }
            else {
                median.solve_slices(&prob.a[start..= end], &alt_lower, &alt_upper, target)?
            };

            sol[p][q][start..= end].copy_from_slice(&x);
        }

        Ok(())
    }

    // box bounds clamped into the range spanned by the children
    fn alt_bounds(prob: &ProbQRAPNC<F>, start: usize, cur_lower: &[F], cur_upper: &[F]) -> (Vec<F>, Vec<F>)
    {
        let mut alt_lower = Vec::with_capacity(cur_lower.len());
        let mut alt_upper = Vec::with_capacity(cur_lower.len());

        for (k, (cl, cu)) in cur_lower.iter().zip(cur_upper).enumerate() {
            let (cl, cu) = (*cl, *cu);
            let l = prob.l[start + k];
            let u = prob.u[start + k];

            alt_lower.push(if cu < l {
                cu
            }
            else if cl > l {
                cl
            }
            else {
                l
            });

            alt_upper.push(if cl > u {
                cl
            }
            else if cu < u {
                cu
            }
            else {
                u
            });
        }

        (alt_lower, alt_upper)
    }

    fn interpolate(&self, target: F, sum_alt: F, sum_cur: F, alt: &[F], cur: &[F]) -> Result<Vec<F>, SolverError>
    {
        let ratio = match self.par.div_free(target - sum_alt, sum_cur - sum_alt) {
            Some(r) => r,
            None => {
                log::warn!("Infeasible merge: target {:?} not reachable from {:?}", target, sum_alt);
                return Err(SolverError::Infeasible);
            },
        };

        Ok(alt.iter().zip(cur).map(|(a, c)| *a + ratio * (*c - *a)).collect())
    }
}

impl<F: Float + Debug> NestedSolver<F> for DecompSolver<F>
{
    fn solve_nested(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        self.solve(prob)
    }
}
