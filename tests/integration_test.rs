mod common;

use common::{close, lognormal_samples, uniform_samples};
use quiver_avq::{
    error_metric, error_metric_weighted, quantize, solve_approximate, solve_exact,
    solve_exact_accelerated, solve_exact_accelerated_weighted, solve_exact_weighted, Codebook,
    QuiverError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn squared_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

#[test]
fn 로그정규_전체_흐름_테스트() {
    println!("=== 로그정규 1000개, s = 16 ===");
    let values = lognormal_samples(1000, 2024);
    let s = 16;

    let exact = solve_exact(&values, s).unwrap();
    let accelerated = solve_exact_accelerated(&values, s).unwrap();
    let fine = solve_approximate(&values, s, 200).unwrap();
    let coarse = solve_approximate(&values, s, 32).unwrap();

    let exact_metric = error_metric(&values, &exact).unwrap();
    let accelerated_metric = error_metric(&values, &accelerated).unwrap();
    let fine_metric = error_metric(&values, &fine).unwrap();
    let coarse_metric = error_metric(&values, &coarse).unwrap();

    println!("exact       vNMSE: {:.6e}", exact_metric);
    println!("accelerated vNMSE: {:.6e}", accelerated_metric);
    println!("approx(200) vNMSE: {:.6e}", fine_metric);
    println!("approx(32)  vNMSE: {:.6e}", coarse_metric);

    assert_eq!(exact.len(), s);
    assert!(close(exact_metric, accelerated_metric));
    assert!(exact_metric >= 0.0);
    assert!(exact_metric <= fine_metric * (1.0 + 1e-9));
    assert!(fine_metric <= coarse_metric * (1.0 + 1e-9));

    // 구간 200개면 정확해와 거의 같고, 32개여도 크게 벗어나지 않는다
    assert!(fine_metric / exact_metric <= 1.02, "approx(200) 비율 {}", fine_metric / exact_metric);
    assert!(coarse_metric / exact_metric <= 2.0, "approx(32) 비율 {}", coarse_metric / exact_metric);

    for codebook in [&exact, &accelerated, &fine, &coarse] {
        assert_eq!(codebook.min(), values[0]);
        assert_eq!(codebook.max(), values[values.len() - 1]);
    }
}

#[test]
fn 실측_오차가_기대_오차에_수렴_테스트() {
    let values = uniform_samples(1000, -1.0, 1.0, 17);
    let codebook = solve_exact_accelerated(&values, 8).unwrap();
    let expected = error_metric(&values, &codebook).unwrap() * squared_norm(&values);

    let mut rng = StdRng::seed_from_u64(99);
    let reps = 100;
    let mut realized = 0.0;
    for _ in 0..reps {
        let quantized = quantize(&values, &codebook, &mut rng).unwrap();
        assert!(quantized.iter().all(|q| codebook.levels().contains(q)));
        realized += values
            .iter()
            .zip(&quantized)
            .map(|(v, q)| (v - q) * (v - q))
            .sum::<f64>();
    }
    realized /= reps as f64;

    println!("기대 오차 {:.6}, 실측 평균 {:.6}", expected, realized);
    assert!((realized - expected).abs() <= 0.05 * expected);
}

#[test]
fn 가중_공개함수_테스트() {
    let values = [0.0, 1.0, 2.0, 3.0, 10.0];
    let weights = [1.0, 1.0, 4.0, 1.0, 1.0];

    let exact = solve_exact_weighted(&values, &weights, 3).unwrap();
    let accelerated = solve_exact_accelerated_weighted(&values, &weights, 3).unwrap();

    let a = error_metric_weighted(&values, &weights, &exact).unwrap();
    let b = error_metric_weighted(&values, &weights, &accelerated).unwrap();
    assert!(close(a, b));
    // 무게가 몰린 2.0이 가운데 레벨이 된다
    assert_eq!(exact.levels(), &[0.0, 2.0, 10.0]);
}

#[test]
fn 공개함수_오류_테스트() {
    assert!(matches!(solve_exact(&[], 1), Err(QuiverError::InvalidInput(_))));
    assert!(matches!(
        solve_exact(&[3.0, 1.0, 2.0], 2),
        Err(QuiverError::InvalidInput(_))
    ));
    assert!(matches!(
        solve_exact_accelerated(&[1.0, 2.0], 3),
        Err(QuiverError::InvalidInput(_))
    ));
    assert!(matches!(
        solve_approximate(&[1.0, 2.0, 3.0, 4.0], 3, 2),
        Err(QuiverError::InvalidInput(_))
    ));

    let codebook = Codebook::new(vec![0.0, 1.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        quantize(&[2.0], &codebook, &mut rng),
        Err(QuiverError::OutOfRange { .. })
    ));
    assert!(matches!(
        error_metric(&[0.0, 0.0], &codebook),
        Err(QuiverError::InvalidInput(_))
    ));
}
