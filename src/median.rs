//! Median-of-breakpoints search for a single resource constraint

use num_traits::Float;
use core::cmp::Ordering;
use core::fmt::Debug;
use alloc::vec::Vec;
use crate::{SolverError, SolverParam, ProbQRAP, clip, breakpoints};

//

fn median<F: Float>(v: &mut [F]) -> F
{
    let n = v.len();
    assert!(n > 0);

    let (left, mid, _) = v.select_nth_unstable_by(n / 2, |x, y| {
        x.partial_cmp(y).unwrap_or(Ordering::Equal)
    });
    let upper = *mid;

    if n % 2 == 1 {
        upper
    }
    else {
        let lower = left.iter().fold(F::neg_infinity(), |m, x| m.max(*x));
        (lower + upper) / (F::one() + F::one())
    }
}

//

/// Solver of [`ProbQRAP`] by median-of-breakpoints search.
///
/// The optimal multiplier \\(\lambda\\) gives \\( x_j = \min(u_j, \max(l_j, a_j \lambda)) \\).
/// Each iteration evaluates the resource sum at the median of the remaining breakpoints
/// \\( l_j / a_j, u_j / a_j \\), halves the breakpoint set,
/// and settles variables whose regime is decided within the narrowed multiplier bracket.
/// The expected running time is linear.
pub struct MedianSolver<F: Float>
{
    /// solver parameters.
    pub par: SolverParam<F>,
}

impl<F: Float> MedianSolver<F>
{
    /// Creates an instance.
    ///
    /// Returns [`MedianSolver`] instance.
    pub fn new() -> Self
    {
        MedianSolver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`MedianSolver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float + Debug> MedianSolver<F>
{
    /// Starts to solve a [`ProbQRAP`].
    ///
    /// Returns `Ok` with an optimal \\(x\\) or `Err` with [`SolverError`] type.
    pub fn solve(&self, prob: &ProbQRAP<F>) -> Result<Vec<F>, SolverError>
    {
        prob.check()?;

        self.solve_slices(&prob.a, &prob.l, &prob.u, prob.r)
    }

    /// Solves a problem given by slices without validating them.
    ///
    /// Returns `Ok` with an optimal \\(x\\),
    /// `Err` with [`SolverError::InvalidInstance`] if the slice lengths differ,
    /// or `Err` with [`SolverError::Infeasible`] if `r` lies outside \\( [\sum l, \sum u] \\).
    /// * `a` must be positive and `l <= u`.
    pub fn solve_slices(&self, a: &[F], l: &[F], u: &[F], r: F) -> Result<Vec<F>, SolverError>
    {
        let n = a.len();
        if l.len() != n || u.len() != n {
            log::error!("Size mismatch: a {}, l {}, u {}", n, l.len(), u.len());
            return Err(SolverError::InvalidInstance);
        }

        let sum_l = l.iter().fold(F::zero(), |s, v| s + *v);
        let sum_u = u.iter().fold(F::zero(), |s, v| s + *v);
        if r < sum_l - self.par.eps_eq || r > sum_u + self.par.eps_eq {
            log::warn!("Infeasible resource value: not within [{:?}, {:?}]",
                sum_l, sum_u);
            return Err(SolverError::Infeasible);
        }

        let lower_bp = breakpoints(a, l);
        let upper_bp = breakpoints(a, u);

        let mut cur_bp: Vec<F> = lower_bp.iter().chain(&upper_bp).copied().collect();
        let mut undecided: Vec<usize> = (0.. n).collect();

        let mut lower_bracket = cur_bp.iter().fold(F::infinity(), |m, v| m.min(*v));
        let mut upper_bracket = F::infinity();
        let mut fixed = F::zero();
        let mut free = F::zero();

        let mut i = 0;
        while !undecided.is_empty() && !cur_bp.is_empty() {
            let cand = median(&mut cur_bp);

            let mut sum = F::zero();
            for &j in &undecided {
                sum = sum + if upper_bp[j] <= cand {
                    u[j]
                }
                else if lower_bp[j] >= cand {
                    l[j]
                }
                else {
                    a[j] * cand
                };
            }
            sum = sum + fixed + free * cand;

            log::trace!("{}: candidate {:?}, sum {:?}, undecided {}",
                i, cand, sum, undecided.len());

            if (sum - r).abs() <= self.par.eps_eq {
                return Ok(Self::clip_all(a, l, u, cand));
            }
            else if sum > r {
                upper_bracket = cand;
                cur_bp.retain(|bp| *bp < cand);
            }
            else {
                lower_bracket = cand;
                cur_bp.retain(|bp| *bp > cand);
            }

            undecided.retain(|&j| {
                if upper_bp[j] <= lower_bracket {
                    fixed = fixed + u[j];
                    false
                }
                else if lower_bp[j] <= lower_bracket && upper_bracket <= upper_bp[j] {
                    free = free + a[j];
                    false
                }
                else if lower_bp[j] >= upper_bracket {
                    fixed = fixed + l[j];
                    false
                }
                else {
                    true
                }
            });

            i += 1;
        }

        let mult = if free == F::zero() {
            lower_bracket
        }
        else {
            (r - fixed) / free
        };

        Ok(Self::clip_all(a, l, u, mult))
    }

    fn clip_all(a: &[F], l: &[F], u: &[F], mult: F) -> Vec<F>
    {
        (0.. a.len()).map(|j| clip(a[j] * mult, l[j], u[j])).collect()
    }
}

//
