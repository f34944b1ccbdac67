use float_eq::assert_float_eq;
use qrapnc::*;

use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

type AProbQRAP = ProbQRAP<f64>;
type AProbQRAPNC = ProbQRAPNC<f64>;

// feasible by construction, with the total pinned to the reference point's sum
fn gen_nested(rng: &mut Xoshiro256StarStar, n: usize) -> (AProbQRAPNC, Vec<f64>)
{
    let a: Vec<f64> = (0.. n).map(|_| rng.gen_range(0.1 ..= 5.)).collect();
    let l: Vec<f64> = (0.. n).map(|_| rng.gen_range(-2. ..= 1.)).collect();
    let u: Vec<f64> = l.iter().map(|lj| lj + rng.gen_range(0.5 ..= 3.)).collect();
    let x_ref: Vec<f64> = l.iter().zip(&u).map(|(lj, uj)| rng.gen_range(*lj ..= *uj)).collect();

    let mut lower_nested = Vec::with_capacity(n);
    let mut upper_nested = Vec::with_capacity(n);
    let mut sum = 0.;
    for i in 0.. n {
        sum += x_ref[i];
        if i + 1 < n {
            lower_nested.push(sum - rng.gen_range(0. ..= 10.));
            upper_nested.push(sum + rng.gen_range(0. ..= 10.));
        }
        else {
            lower_nested.push(sum);
            upper_nested.push(sum);
        }
    }

    (AProbQRAPNC::new(a, l, u, lower_nested, upper_nested), x_ref)
}

// free variables between two consecutive tight nested constraints share one multiplier
fn assert_kkt(prob: &AProbQRAPNC, x: &[f64])
{
    let n = x.len();
    let mut start = 0;
    let mut sum = 0.;

    for i in 0.. n {
        sum += x[i];
        let tight = (sum - prob.lower_nested[i]).abs() <= 1e-5 || (sum - prob.upper_nested[i]).abs() <= 1e-5;

        if tight || i + 1 == n {
            let free: Vec<usize> = (start..= i)
                .filter(|&j| x[j] > prob.l[j] + 1e-7 && x[j] < prob.u[j] - 1e-7)
                .collect();

            if let Some(&j0) = free.first() {
                let mult = x[j0] / prob.a[j0];
                for j in start..= i {
                    if free.contains(&j) {
                        assert_float_eq!(x[j] / prob.a[j], mult, abs <= 1e-4);
                    }
                    else if x[j] >= prob.u[j] - 1e-7 {
                        assert!(prob.u[j] / prob.a[j] <= mult + 1e-4);
                    }
                    else {
                        assert!(prob.l[j] / prob.a[j] >= mult - 1e-4);
                    }
                }
            }

            start = i + 1;
        }
    }
}

// the same instance with some nested bounds out of reach, including the total
fn loosen(rng: &mut Xoshiro256StarStar, prob: &AProbQRAPNC) -> AProbQRAPNC
{
    let mut loose = prob.clone();
    let n = loose.len();

    for i in 0.. n {
        if rng.gen_bool(0.3) {
            loose.lower_nested[i] -= rng.gen_range(0. ..= 100.);
        }
        if rng.gen_bool(0.3) {
            loose.upper_nested[i] += rng.gen_range(0. ..= 100.);
        }
    }

    let sum_l: f64 = loose.l.iter().sum();
    let sum_u: f64 = loose.u.iter().sum();
    loose.lower_nested[n - 1] = sum_l - rng.gen_range(0. ..= 10.);
    loose.upper_nested[n - 1] = sum_u + rng.gen_range(0. ..= 10.);

    loose
}

//

#[test]
fn test_random_median_kkt()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(0);
    let s = MedianSolver::new();

    for _ in 0.. 300 {
        let n = rng.gen_range(1 ..= 30);
        let (nc, x_ref) = gen_nested(&mut rng, n);
        let r: f64 = x_ref.iter().sum();
        let prob = AProbQRAP::new(nc.a, nc.l, nc.u, r);

        let rslt = s.solve(&prob).unwrap();

        assert_float_eq!(rslt.iter().sum::<f64>(), r, abs <= 1e-5);
        assert!(prob.objective(&rslt) <= prob.objective(&x_ref) + 1e-4);

        // no transfer from j to k lowers the cost
        for j in 0.. n {
            assert!(rslt[j] >= prob.l[j] - 1e-9 && rslt[j] <= prob.u[j] + 1e-9);
            for k in 0.. n {
                if rslt[j] > prob.l[j] + 1e-9 && rslt[k] < prob.u[k] - 1e-9 {
                    assert!(rslt[j] / prob.a[j] <= rslt[k] / prob.a[k] + 1e-4);
                }
            }
        }
    }
}

#[test]
fn test_random_nested_agree()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let s_decomp = DecompSolver::new();
    let s_seq = SeqSolver::new();
    let s_infeas = InfeasSolver::new();

    for _ in 0.. 300 {
        let n = rng.gen_range(1 ..= 30);
        let (prob, x_ref) = gen_nested(&mut rng, n);

        let rslt_decomp = s_decomp.solve(&prob).unwrap();
        let rslt_seq = s_seq.solve(&prob).unwrap();
        let rslt_infeas = s_infeas.solve(&prob).unwrap();

        for rslt in [&rslt_decomp, &rslt_seq, &rslt_infeas] {
            assert!(prob.is_feasible(rslt, 1e-5));
            assert!(prob.objective(rslt) <= prob.objective(&x_ref) + 1e-4);
            assert_kkt(&prob, rslt);
        }

        assert_float_eq!(rslt_decomp, rslt_seq, abs_all <= 1e-4);
        assert_float_eq!(rslt_infeas, rslt_seq, abs_all <= 1e-4);
    }
}

#[test]
fn test_random_nested_tightened()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(2);
    let s_decomp = DecompSolver::new();
    let s_seq = SeqSolver::new();
    let s_infeas = InfeasSolver::new();

    for _ in 0.. 200 {
        let n = rng.gen_range(2 ..= 30);
        let (pinned, _) = gen_nested(&mut rng, n);

        for prob in [loosen(&mut rng, &pinned), pinned] {
            let tight = prob.tighten();

            let rslt_decomp = s_decomp.solve(&prob).unwrap();
            let rslt_seq = s_seq.solve(&prob).unwrap();
            let rslt_infeas = s_infeas.solve(&prob).unwrap();

            assert_float_eq!(rslt_decomp, s_decomp.solve(&tight).unwrap(), abs_all <= 1e-9);
            assert_float_eq!(rslt_seq, s_seq.solve(&tight).unwrap(), abs_all <= 1e-9);
            assert_float_eq!(rslt_infeas, s_infeas.solve(&tight).unwrap(), abs_all <= 1e-9);

            for rslt in [&rslt_decomp, &rslt_seq, &rslt_infeas] {
                assert!(prob.is_feasible(rslt, 1e-5));
                assert_kkt(&prob, rslt);
            }

            // both keep the total at the tightened upper bound
            assert_float_eq!(rslt_decomp.iter().sum::<f64>(), tight.upper_nested[n - 1], abs <= 1e-5);
            assert_float_eq!(rslt_decomp, rslt_infeas, abs_all <= 1e-4);
        }
    }
}
