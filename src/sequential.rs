//! Sequential breakpoint-search solver

use num_traits::Float;
use core::fmt::Debug;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use alloc::vec;
use crate::{SolverError, SolverParam, ProbQRAPNC, NestedSolver, BreakpointHeap, clip, breakpoints};

//

// next breakpoint of a search, by source
#[derive(Debug, Clone, Copy, PartialEq)]
enum Next
{
    // initial lower breakpoint of a variable
    InitLower(usize),
    // initial upper breakpoint of a variable
    InitUpper(usize),
    // optimal multiplier of a lower subproblem
    LowerRun(usize),
    // optimal multiplier of an upper subproblem
    UpperRun(usize),
}

// picks the extreme candidate, earlier ones winning ties
fn pick<F: Float>(cands: [Option<(F, Next)>; 4], better: impl Fn(F, F) -> bool) -> Option<(F, Next)>
{
    let mut best: Option<(F, Next)> = None;
    for c in cands.into_iter().flatten() {
        match best {
            Some((v, _)) if !better(c.0, v) => {},
            _ => best = Some(c),
        }
    }
    best
}

/// Optimal multiplier of the prefix subproblems of one direction,
/// with the fixed resource and the free weight in force at it.
#[derive(Debug, Clone)]
struct Run<F: Float>
{
    mult: Vec<F>,
    fixed: Vec<F>,
    free: Vec<F>,
    deque: VecDeque<usize>,
}

impl<F: Float> Run<F>
{
    fn new(n: usize, mult0: F, free0: F) -> Self
    {
        let mut run = Run {
            mult: vec![F::zero(); n],
            fixed: vec![F::zero(); n],
            free: vec![F::zero(); n],
            deque: VecDeque::from(vec![0]),
        };
        run.mult[0] = mult0;
        run.free[0] = free0;
        run
    }

    fn set(&mut self, j: usize, mult: F, fixed: F, free: F)
    {
        self.mult[j] = mult;
        self.fixed[j] = fixed;
        self.free[j] = free;
    }
}

//

struct SeqCore<'a, F: Float + Debug>
{
    par: &'a SolverParam<F>,

    a: Vec<F>,
    l: Vec<F>,
    u: Vec<F>,
    lower_nested: Vec<F>,
    upper_nested: Vec<F>,
    lower_bp: Vec<F>,
    upper_bp: Vec<F>,

    lower_heap: BreakpointHeap<F>,
    upper_heap: BreakpointHeap<F>,

    lower: Run<F>,
    upper: Run<F>,
}

impl<'a, F: Float + Debug> SeqCore<'a, F>
{
    fn new(par: &'a SolverParam<F>, prob: &ProbQRAPNC<F>) -> Self
    {
        let prob = prob.tighten();
        let n = prob.len();

        let ProbQRAPNC {a, mut l, mut u, lower_nested, upper_nested} = prob;
        l[0] = lower_nested[0];
        u[0] = upper_nested[0];

        let lower_bp = breakpoints(&a, &l);
        let upper_bp = breakpoints(&a, &u);

        let lower = Run::new(n, lower_bp[0], a[0]);
        let upper = Run::new(n, upper_bp[0], a[0]);

        SeqCore {
            par,
            a, l, u, lower_nested, upper_nested, lower_bp, upper_bp,
            lower_heap: BreakpointHeap::new(n),
            upper_heap: BreakpointHeap::new(n),
            lower, upper,
        }
    }

    fn solve(mut self) -> Result<Vec<F>, SolverError>
    {
        let n = self.a.len();

        for j in 1.. n {
            let lower_help = self.init_lower(j);
            let upper_help = self.init_upper(j);

            let thr_lower = if lower_help.is_some() {self.lower.mult[j - 1]} else {self.lower.mult[j]};
            let thr_upper = if upper_help.is_some() {self.upper.mult[j - 1]} else {self.upper.mult[j]};
            self.add_breakpoints(j, thr_lower, thr_upper);

            if let Some((fixed, free)) = lower_help {
                self.search_lower(j, fixed, free)?;
            }
            if let Some((fixed, free)) = upper_help {
                self.search_upper(j, fixed, free)?;
            }

            log::trace!("{}: multipliers {:?} {:?}", j, self.lower.mult[j], self.upper.mult[j]);
        }

        Ok(self.backward())
    }

    // Returns `Some` with the starting fixed and free accumulators if a search is needed.
    fn init_lower(&mut self, j: usize) -> Option<(F, F)>
    {
        let prev = self.lower.mult[j - 1];
        let help = self.lower_nested[j - 1] + clip(self.a[j] * prev, self.l[j], self.u[j]);

        if help == self.lower_nested[j] {
            if let Some(front) = self.lower.deque.front_mut() {
                if *front == j - 1 {
                    *front = j;
                }
            }

            let mut fixed = self.lower.fixed[j - 1];
            let mut free = self.lower.free[j - 1];
            if prev < self.lower_bp[j] {
                fixed = fixed + self.l[j];
            }
            else if prev > self.upper_bp[j] {
                fixed = fixed + self.u[j];
            }
            else {
                free = free + self.a[j];
            }
            self.lower.set(j, prev, fixed, free);

            None
        }
        else if help > self.lower_nested[j] {
            let mult = (self.lower_nested[j] - self.lower_nested[j - 1]) / self.a[j];
            self.lower.set(j, mult, self.lower_nested[j - 1], self.a[j]);
            self.lower.deque.push_front(j);

            None
        }
        else {
            if self.lower.deque.front() == Some(&(j - 1)) {
                self.lower.deque.pop_front();
            }

            let fixed = self.lower.fixed[j - 1];
            let free = self.lower.free[j - 1];
            if self.lower_bp[j] > prev {
                Some((fixed + self.l[j], free))
            }
            else if self.upper_bp[j] > prev {
                Some((fixed, free + self.a[j]))
            }
            else {
                Some((fixed + self.u[j], free))
            }
        }
    }

    // Returns `Some` with the starting fixed and free accumulators if a search is needed.
    fn init_upper(&mut self, j: usize) -> Option<(F, F)>
    {
        let prev = self.upper.mult[j - 1];
        let help = self.upper_nested[j - 1] + clip(self.a[j] * prev, self.l[j], self.u[j]);

        if help == self.upper_nested[j] {
            if let Some(back) = self.upper.deque.back_mut() {
                if *back == j - 1 {
                    *back = j;
                }
            }

            let mut fixed = self.upper.fixed[j - 1];
            let mut free = self.upper.free[j - 1];
            if prev > self.upper_bp[j] {
                fixed = fixed + self.u[j];
            }
            else if prev < self.lower_bp[j] {
                fixed = fixed + self.l[j];
            }
            else {
                free = free + self.a[j];
            }
            self.upper.set(j, prev, fixed, free);

            None
        }
        else if help < self.upper_nested[j] {
            let mult = (self.upper_nested[j] - self.upper_nested[j - 1]) / self.a[j];
            self.upper.set(j, mult, self.upper_nested[j - 1], self.a[j]);
            self.upper.deque.push_back(j);

            None
        }
        else {
            if self.upper.deque.back() == Some(&(j - 1)) {
                self.upper.deque.pop_back();
            }

            let fixed = self.upper.fixed[j - 1];
            let free = self.upper.free[j - 1];
            if self.upper_bp[j] < prev {
                Some((fixed + self.u[j], free))
            }
            else if self.lower_bp[j] < prev {
                Some((fixed, free + self.a[j]))
            }
            else {
                Some((fixed + self.l[j], free))
            }
        }
    }

    // breakpoints of `j` strictly inside the current multiplier window
    fn add_breakpoints(&mut self, j: usize, thr_lower: F, thr_upper: F)
    {
        let eps = self.par.eps_eq;
        let (lbp, ubp) = (self.lower_bp[j], self.upper_bp[j]);

        if thr_lower < lbp - eps && lbp <= thr_upper - eps {
            self.lower_heap.push(lbp, j);
        }
        if thr_lower <= ubp - eps && ubp < thr_upper - eps {
            self.upper_heap.push(ubp, j);
        }
    }

    fn search_lower(&mut self, j: usize, mut fixed: F, mut free: F) -> Result<(), SolverError>
    {
        let target = self.lower_nested[j];

        loop {
            let cands = [
                self.lower_heap.peek_min().map(|(v, k)| (v, Next::InitLower(k))),
                self.upper_heap.peek_min().map(|(v, k)| (v, Next::InitUpper(k))),
                self.lower.deque.front().map(|&k| (self.lower.mult[k], Next::LowerRun(k))),
                self.upper.deque.front().map(|&k| (self.upper.mult[k], Next::UpperRun(k))),
            ];

            let (bp, next) = match pick(cands, |c, v| c < v) {
                Some(c) => c,
                None => {
                    let mult = self.div_free(target - fixed, free)?;
                    self.lower.set(j, mult, fixed, free);
                    self.lower.deque.push_front(j);
                    return Ok(());
                },
            };

            let sum = fixed + free * bp;
            log::trace!("{}: lower search {:?} at {:?}, sum {:?}", j, next, bp, sum);

            if (sum - target).abs() <= self.par.eps_eq {
                self.lower.set(j, bp, fixed, free);
                self.lower.deque.push_front(j);
                return Ok(());
            }
            else if sum > target {
                let mult = self.div_free(target - fixed, free)?;
                self.lower.set(j, mult, fixed, free);
                self.lower.deque.push_front(j);
                return Ok(());
            }

            match next {
                Next::InitLower(k) => {
                    fixed = fixed - self.l[k];
                    free = free + self.a[k];
                    self.lower_heap.remove_min();
                },
                Next::InitUpper(k) => {
                    fixed = fixed + self.u[k];
                    free = free - self.a[k];
                    self.upper_heap.remove_min();
                },
                Next::LowerRun(k) => {
                    fixed = fixed - self.lower.free[k] * bp;
                    free = free + self.lower.free[k];
                    self.lower.deque.pop_front();
                },
                Next::UpperRun(k) => {
                    fixed = fixed + self.upper.free[k] * bp;
                    free = free - self.upper.free[k];
                    self.upper.deque.pop_front();
                },
            }
        }
    }

    fn search_upper(&mut self, j: usize, mut fixed: F, mut free: F) -> Result<(), SolverError>
    {
        let target = self.upper_nested[j];

        loop {
            let cands = [
                self.lower_heap.peek_max().map(|(v, k)| (v, Next::InitLower(k))),
                self.upper_heap.peek_max().map(|(v, k)| (v, Next::InitUpper(k))),
                self.lower.deque.back().map(|&k| (self.lower.mult[k], Next::LowerRun(k))),
                self.upper.deque.back().map(|&k| (self.upper.mult[k], Next::UpperRun(k))),
            ];

            let (bp, next) = match pick(cands, |c, v| c > v) {
                Some(c) => c,
                None => {
                    let mult = self.div_free(target - fixed, free)?;
                    self.upper.set(j, mult, fixed, free);
                    self.upper.deque.push_back(j);
                    return Ok(());
                },
            };

            let sum = fixed + free * bp;
            log::trace!("{}: upper search {:?} at {:?}, sum {:?}", j, next, bp, sum);

            if (sum - target).abs() <= self.par.eps_eq {
                self.upper.set(j, bp, fixed, free);
                self.upper.deque.push_back(j);
                return Ok(());
            }
            else if sum < target {
                let mult = self.div_free(target - fixed, free)?;
                self.upper.set(j, mult, fixed, free);
                self.upper.deque.push_back(j);
                return Ok(());
            }

            match next {
                Next::InitLower(k) => {
                    fixed = fixed + self.l[k];
                    free = free - self.a[k];
                    self.lower_heap.remove_max();
                },
                Next::InitUpper(k) => {
                    fixed = fixed - self.u[k];
                    free = free + self.a[k];
                    self.upper_heap.remove_max();
                },
                Next::LowerRun(k) => {
                    fixed = fixed + self.lower.free[k] * bp;
                    free = free - self.lower.free[k];
                    self.lower.deque.pop_back();
                },
                Next::UpperRun(k) => {
                    fixed = fixed - self.upper.free[k] * bp;
                    free = free + self.upper.free[k];
                    self.upper.deque.pop_back();
                },
            }
        }
    }

    fn div_free(&self, num: F, free: F) -> Result<F, SolverError>
    {
        self.par.div_free(num, free).ok_or_else(|| {
            log::warn!("Vanishing free weight {:?}", free);
            SolverError::NumericDegenerate
        })
    }

    // narrows the multiplier window from the right end and evaluates the solution
    fn backward(&self) -> Vec<F>
    {
        let n = self.a.len();
        let last = n - 1;

        let mut lower_new = vec![F::zero(); n];
        let mut upper_new = vec![F::zero(); n];
        lower_new[last] = self.lower.mult[last];
        upper_new[last] = self.upper.mult[last];

        for j in (0.. last).rev() {
            lower_new[j] = self.narrow(j, lower_new[j + 1]);
            upper_new[j] = self.narrow(j, upper_new[j + 1]);
        }

        let opt_lower: Vec<F> = (0.. n).map(|j| clip(self.a[j] * lower_new[j], self.l[j], self.u[j])).collect();

        if self.lower_nested[last] == self.upper_nested[last] {
            log::debug!("total pinned: lower subproblem solution");
            opt_lower
        }
        else {
            (0.. n).map(|j| {
                let opt_upper = clip(self.a[j] * upper_new[j], self.l[j], self.u[j]);
                clip(F::zero(), opt_lower[j], opt_upper)
            }).collect()
        }
    }

    fn narrow(&self, j: usize, next: F) -> F
    {
        if self.upper.mult[j] <= next {
            self.upper.mult[j]
        }
        else if self.lower.mult[j] >= next {
            self.lower.mult[j]
        }
        else {
            next
        }
    }
}

//

/// Solver of [`ProbQRAPNC`] by a sequential breakpoint search.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// After tightening the nested bounds (see [`ProbQRAPNC::tighten`]),
/// the variables are swept from left to right.
/// At each \\(j\\), the optimal multipliers of the prefix subproblems
/// \\( \sum_{k \le j} x_k = L_j \\) and \\( \sum_{k \le j} x_k = U_j \\)
/// are updated from those at \\( j - 1 \\);
/// when they move, the next multiplier is searched over initial breakpoints kept in
/// lazily-deleted heaps and over earlier optimal multipliers kept in deques.
/// A backward pass then narrows both multiplier sequences into the optimal one.
///
/// If \\( L_{n-1} = U_{n-1} \\) after tightening, the solution of the lower subproblem is returned;
/// otherwise the minimum-cost point between the two narrowed solutions is returned.
pub struct SeqSolver<F: Float>
{
    /// solver parameters.
    pub par: SolverParam<F>,
}

impl<F: Float> SeqSolver<F>
{
    /// Creates an instance.
    ///
    /// Returns [`SeqSolver`] instance.
    pub fn new() -> Self
    {
        SeqSolver {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`SeqSolver`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float + Debug> SeqSolver<F>
{
    /// Starts to solve a [`ProbQRAPNC`].
    ///
    /// Returns `Ok` with an optimal \\(x\\) or `Err` with [`SolverError`] type.
    pub fn solve(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        prob.check()?;
        prob.check_feasible(self.par.eps_eq)?;

        log::debug!("sequential: n {}, {:?}", prob.len(), self.par);

        SeqCore::new(&self.par, prob).solve()
    }
}

impl<F: Float + Debug> NestedSolver<F> for SeqSolver<F>
{
    fn solve_nested(&self, prob: &ProbQRAPNC<F>) -> Result<Vec<F>, SolverError>
    {
        self.solve(prob)
    }
}

//

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_pick_ties()
    {
        let cands = [
            Some((1., Next::InitLower(3))),
            None,
            Some((1., Next::LowerRun(0))),
            Some((0.5, Next::UpperRun(2))),
        ];
        assert_eq!(pick(cands, |c, v| c < v), Some((0.5, Next::UpperRun(2))));
        assert_eq!(pick(cands, |c, v| c > v), Some((1., Next::InitLower(3))));
        assert_eq!(pick::<f64>([None; 4], |c, v| c > v), None);
    }
}
