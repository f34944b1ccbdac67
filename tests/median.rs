use float_eq::assert_float_eq;
use qrapnc::*;

type AProbQRAP = ProbQRAP<f64>;
type ASolver = MedianSolver<f64>;

//

#[test]
fn test_median1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let prob = AProbQRAP::new(
        vec![1., 1., 1.],
        vec![0., 0., 0.],
        vec![10., 10., 10.],
        15.,
    );

    let s = ASolver::new();
    let rslt = s.solve(&prob).unwrap();
    println!("{:?}", rslt);

    assert_float_eq!(rslt[0..3], [5., 5., 5.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_median2()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let prob = AProbQRAP::new(
        vec![1., 1., 1.],
        vec![0., 0., 0.],
        vec![10., 10., 10.],
        9.,
    );

    let s = ASolver::new();
    let rslt = s.solve(&prob).unwrap();
    println!("{:?}", rslt);

    assert_float_eq!(rslt[0..3], [3., 3., 3.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_median_clipped()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // x0 = min(1, t), x1 = 2t, x2 = max(2, t) with t = 7/3
    let prob = AProbQRAP::new(
        vec![1., 2., 1.],
        vec![0., 0., 2.],
        vec![1., 10., 10.],
        8.,
    );

    let s = ASolver::new();
    let rslt = s.solve(&prob).unwrap();
    println!("{:?}", rslt);

    assert_float_eq!(rslt[0..3], [1., 14. / 3., 7. / 3.].as_ref(), abs_all <= 1e-5);
    assert_float_eq!(rslt.iter().sum::<f64>(), 8., abs <= 1e-5);
}

#[test]
fn test_median_all_fixed()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let prob = AProbQRAP::new(
        vec![1., 2.],
        vec![0., 8.],
        vec![2., 8.],
        10.,
    );

    let s = ASolver::new();
    let rslt = s.solve(&prob).unwrap();

    assert_float_eq!(rslt[0..2], [2., 8.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_median_infeasible()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new();

    let over = AProbQRAP::new(vec![1., 1.], vec![0., 0.], vec![1., 1.], 2.5);
    assert_eq!(s.solve(&over), Err(SolverError::Infeasible));

    let under = AProbQRAP::new(vec![1., 1.], vec![0., 0.], vec![1., 1.], -0.5);
    assert_eq!(s.solve(&under), Err(SolverError::Infeasible));

    let invalid = AProbQRAP::new(vec![1., -1.], vec![0., 0.], vec![1., 1.], 1.);
    assert_eq!(s.solve(&invalid), Err(SolverError::InvalidInstance));
}

#[test]
fn test_median_f32()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let prob = ProbQRAP::<f32>::new(
        vec![1., 3.],
        vec![0., 0.],
        vec![10., 10.],
        8.,
    );

    let s = MedianSolver::<f32>::new().par(|p| {
        p.eps_eq = 1e-4;
    });
    let rslt = s.solve(&prob).unwrap();

    assert_float_eq!(rslt[0..2], [2_f32, 6.].as_ref(), abs_all <= 1e-4);
}

#[test]
fn test_median_slices_mismatch()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = ASolver::new();

    let rslt = s.solve_slices(&[1., 1.], &[0.], &[1., 1.], 1.);
    assert_eq!(rslt, Err(SolverError::InvalidInstance));

    let rslt = s.solve_slices(&[1., 1.], &[0., 0.], &[1., 1.], 1.).unwrap();
    assert_float_eq!(rslt[0..2], [0.5, 0.5].as_ref(), abs_all <= 1e-9);
}
