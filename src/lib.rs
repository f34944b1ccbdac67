/*!
Exact solvers for quadratic resource allocation problems with nested constraints (QRAP-NC).

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

\\[
\begin{array}{ll}
{\rm minimize} & \sum_{j=0}^{n-1} {x_j^2 \over 2 a_j} \\\\
{\rm subject \ to} & L_i \le \sum_{k=0}^{i} x_k \le U_i \quad (i = 0, \ldots, n-1) \\\\
& l_j \le x_j \le u_j \quad (j = 0, \ldots, n-1),
\end{array}
\\]
where \\( a_j > 0 \\).
Such problems appear in scheduling a chained resource,
e.g. charging a storage device over successive time slots.

# General usage

1. Express your problem as [`ProbQRAPNC`]
   (or [`ProbQRAP`] if only the total \\( \sum_j x_j \\) is constrained).
1. Choose a solver:
   * [`MedianSolver`] -
     single resource constraint, median-of-breakpoints search in expected linear time.
   * [`DecompSolver`] -
     merge decomposition, \\( O(n \log n) \\).
   * [`SeqSolver`] -
     sequential breakpoint search with heaps and deques, the fastest in practice.
   * [`InfeasSolver`] -
     infeasibility-guided decomposition.
1. Optionally set its parameters by `par`, and invoke `solve` to get a resulted solution.

All nested solvers implement [`NestedSolver`],
and they agree on instances with a pinned total \\( L_{n-1} = U_{n-1} \\).

# Examples

```
use float_eq::assert_float_eq;
use qrapnc::*;

//env_logger::init(); // Use any logger crate as `qrapnc` uses `log` crate.

let prob = ProbQRAPNC::new(
    vec![1., 1., 1.],    // a
    vec![0., 0., 0.],    // l
    vec![10., 10., 10.], // u
    vec![0., 0., 9.],    // L
    vec![2., 10., 9.],   // U
);

let s = SeqSolver::new().par(|p| {
    p.eps_eq = 1e-9;
});
let rslt = s.solve(&prob).unwrap();

assert_float_eq!(rslt[0..3], [2., 3.5, 3.5].as_ref(), abs_all <= 1e-6);
```
*/

#![no_std]

extern crate alloc;

mod solver_error;

pub use solver_error::*;

//

mod solver_param;

pub use solver_param::*;

//

mod problem;

pub use problem::*;

//

mod breakpoint;

pub use breakpoint::*;

//

mod nested;
mod median;
mod decomposition;
mod sequential;
mod infeasible;

pub use nested::*;
pub use median::*;
pub use decomposition::*;
pub use sequential::*;
pub use infeasible::*;
