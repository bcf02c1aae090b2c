use super::super::accelerated::MonotoneSearch;
use super::super::engine::SplitSearch;
use super::super::exact::{FullScan, Smawk};
use super::super::{prepare_exact, solve_candidates};
use super::{assert_error_eq, lognormal_samples, normal_samples};
use crate::core::error::Result;
use crate::core::error_model::total_error;
use crate::core::{Codebook, ExactLevelSolver, LevelSolver, QuiverError, SampleSet, SolverConfig};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};

fn solve(values: &[f64], s: usize) -> crate::core::LevelSolution {
    ExactLevelSolver::default()
        .solve(&SampleSet::new(values).unwrap(), s)
        .unwrap()
}

/// 양끝을 포함하는 모든 s개 레벨 조합 중 최소 오차 (작은 입력 전용)
fn brute_force_error(distinct: &[f64], s: usize) -> f64 {
    let interior: Vec<usize> = (1..distinct.len() - 1).collect();
    let mut best = f64::INFINITY;
    let mut chosen = Vec::new();
    fn visit(
        interior: &[usize],
        start: usize,
        need: usize,
        chosen: &mut Vec<usize>,
        distinct: &[f64],
        best: &mut f64,
    ) {
        if need == 0 {
            let mut levels = vec![distinct[0]];
            levels.extend(chosen.iter().map(|&i| distinct[i]));
            levels.push(distinct[distinct.len() - 1]);
            let codebook = Codebook::new(levels).unwrap();
            *best = best.min(total_error(distinct, &codebook).unwrap());
            return;
        }
        for t in start..interior.len() {
            chosen.push(interior[t]);
            visit(interior, t + 1, need - 1, chosen, distinct, best);
            chosen.pop();
        }
    }
    visit(&interior, 0, s - 2, &mut chosen, distinct, &mut best);
    best
}

#[test]
fn 단일레벨_기준값_테스트() {
    let solution = solve(&[1.0, 2.0, 3.0, 4.0], 1);

    assert_eq!(solution.codebook.levels(), &[2.5]);
    assert_relative_eq!(solution.total_error, 5.0);
    let reported = total_error(&[1.0, 2.0, 3.0, 4.0], &solution.codebook).unwrap();
    assert_relative_eq!(reported, 5.0);
}

#[test]
fn 치우친_단일레벨은_중점_테스트() {
    // 평균 2.5가 아니라 중점 5.0: 오차 3·25 + 25
    let values = [0.0, 0.0, 0.0, 10.0];
    let solution = solve(&values, 1);

    assert_eq!(solution.codebook.levels(), &[5.0]);
    assert_relative_eq!(solution.total_error, 100.0, epsilon = 1e-12);
    assert_relative_eq!(total_error(&values, &solution.codebook).unwrap(), 100.0, epsilon = 1e-12);

    let weighted = ExactLevelSolver::default()
        .solve(&SampleSet::weighted(&[0.0, 10.0], &[3.0, 1.0]).unwrap(), 1)
        .unwrap();
    assert_eq!(weighted, solution);
}

#[test]
fn 두레벨은_최소최대_테스트() {
    let values = [0.0, 1.0, 2.0, 3.0, 10.0];
    let solution = solve(&values, 2);

    assert_eq!(solution.codebook.levels(), &[0.0, 10.0]);
    assert_relative_eq!(solution.total_error, 9.0 + 16.0 + 21.0, epsilon = 1e-9);
}

#[test]
fn 세레벨_손계산_테스트() {
    // 가운데 레벨 1 → 22, 2 → 8, 3 → 4
    let values = [0.0, 1.0, 2.0, 3.0, 10.0];
    let solution = solve(&values, 3);

    assert_eq!(solution.codebook.levels(), &[0.0, 3.0, 10.0]);
    assert_relative_eq!(solution.total_error, 4.0, epsilon = 1e-9);
}

#[test]
fn s가_d와_같으면_오차_0_테스트() {
    let values = [0.5, 1.0, 2.0, 7.0];
    let solution = solve(&values, 4);

    assert_eq!(solution.codebook.levels(), &values);
    assert_eq!(total_error(&values, &solution.codebook).unwrap(), 0.0);
    assert!(solution.total_error.abs() < 1e-12);
}

#[test]
fn 중복값_병합_테스트() {
    let values = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0];

    let three = solve(&values, 3);
    assert_eq!(three.codebook.levels(), &[1.0, 2.0, 3.0]);

    let two = solve(&values, 2);
    assert_eq!(two.codebook.levels(), &[1.0, 3.0]);
    assert_relative_eq!(two.total_error, 2.0, epsilon = 1e-12);

    // 서로 다른 값이 s보다 적으면 그 값들만 반환
    let constant = solve(&[5.0, 5.0, 5.0], 2);
    assert_eq!(constant.codebook.levels(), &[5.0]);
    assert_eq!(constant.total_error, 0.0);
}

#[test]
fn 전수탐색과_일치_테스트() {
    for seed in 0..5 {
        let values = normal_samples(9, seed);
        for s in 2..=6 {
            let solution = solve(&values, s);
            assert_eq!(solution.codebook.len(), s);
            assert_error_eq(solution.total_error, brute_force_error(&values, s));
        }
    }
}

#[test]
fn 보고된_오차와_오차모델_일치_테스트() {
    let values = lognormal_samples(300, 5);
    let solution = solve(&values, 8);
    assert_error_eq(solution.total_error, total_error(&values, &solution.codebook).unwrap());
    assert_eq!(solution.codebook.min(), values[0]);
    assert_eq!(solution.codebook.max(), values[values.len() - 1]);
}

#[test]
fn s_증가시_오차_비증가_테스트() {
    // 양끝을 덮는 코드북(s ≥ 2)끼리 비교
    let values = normal_samples(200, 3);
    let mut previous = f64::INFINITY;
    for s in 2..=12 {
        let error = solve(&values, s).total_error;
        assert!(
            error <= previous * (1.0 + 1e-12) + 1e-12,
            "s={s}: {error} > {previous}"
        );
        previous = error;
    }
}

#[test]
fn 가중치와_중복_동치_테스트() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let weights = [1.0, 5.0, 1.0, 1.0, 1.0];
    let expanded = [1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 4.0, 5.0];

    let weighted = ExactLevelSolver::default()
        .solve(&SampleSet::weighted(&values, &weights).unwrap(), 3)
        .unwrap();
    let repeated = solve(&expanded, 3);

    // 가운데 레벨 2 → 4, 3 → 6, 4 → 12
    assert_eq!(weighted.codebook.levels(), &[1.0, 2.0, 5.0]);
    assert_eq!(weighted.codebook, repeated.codebook);
    assert_error_eq(weighted.total_error, repeated.total_error);
}

#[test]
fn 결정성_테스트() {
    let values = lognormal_samples(150, 9);
    let first = solve(&values, 6);
    let second = solve(&values, 6);
    assert_eq!(first, second);
}

#[test]
fn 잘못된_입력_거부_테스트() {
    let solver = ExactLevelSolver::default();
    let values = [1.0, 2.0, 3.0];
    let samples = SampleSet::new(&values).unwrap();

    assert!(matches!(solver.solve(&samples, 0), Err(QuiverError::InvalidInput(_))));
    assert!(matches!(solver.solve(&samples, 4), Err(QuiverError::InvalidInput(_))));
}

#[test]
fn smawk_행최솟값_전수탐색과_일치_테스트() {
    let values = lognormal_samples(400, 41);
    let samples = SampleSet::new(&values).unwrap();
    let cost = prepare_exact(&samples, &SolverConfig::default());
    let n = cost.len() - 1;
    let mut rng = StdRng::seed_from_u64(5);

    for first in [0usize, 1, 7, 50] {
        let prev: Vec<f64> = (0..=n).map(|_| rng.gen_range(0.0..40.0)).collect();
        let window = |x: usize| (first, x - 1);
        let value = |x: usize, k: usize| -> Result<f64> { Ok(prev[k] + cost.segment_cost(k, x)?) };
        let rows = first + 1..n + 1;

        let full = FullScan.row_minima(rows.clone(), &window, &value).unwrap();
        let smawk = Smawk.row_minima(rows.clone(), &window, &value).unwrap();
        let monotone = MonotoneSearch::new(usize::MAX)
            .row_minima(rows, &window, &value)
            .unwrap();

        assert_eq!(full.len(), smawk.len());
        for (i, (a, b)) in full.iter().zip(&smawk).enumerate() {
            assert_error_eq(*a, *b);
            assert_error_eq(*a, monotone[i]);
        }
    }
}

#[test]
fn smawk_선형_평가횟수_테스트() {
    // (x − k)² + prev[k]는 Monge. 평가 횟수는 행 + 열의 상수배
    let n = 4096;
    let mut rng = StdRng::seed_from_u64(13);
    let prev: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1e3)).collect();
    let evaluations = AtomicUsize::new(0);
    let window = |x: usize| (0, x - 1);
    let value = |x: usize, k: usize| -> Result<f64> {
        evaluations.fetch_add(1, Ordering::Relaxed);
        let gap = x as f64 - k as f64;
        Ok(gap * gap + prev[k])
    };

    let smawk = Smawk.row_minima(1..n, &window, &value).unwrap();
    let count = evaluations.load(Ordering::Relaxed);
    println!("행 {} 열 {} 평가 {}", n - 1, n - 1, count);
    assert!(count <= 10 * 2 * n, "평가 {count}");

    let full = FullScan.row_minima(1..n, &window, &value).unwrap();
    assert_eq!(smawk, full);
}

#[test]
fn 전수탐색_dp와_일치_테스트() {
    let config = SolverConfig::default();
    for seed in 0..3 {
        let values = lognormal_samples(180, 60 + seed);
        let samples = SampleSet::new(&values).unwrap();
        let cost = prepare_exact(&samples, &config);
        for &s in &[2usize, 3, 6, 11] {
            let reference = solve_candidates(&cost, &FullScan, s).unwrap();
            let solution = ExactLevelSolver::new(config.clone()).solve(&samples, s).unwrap();
            assert_error_eq(solution.total_error, reference.total_error);
            assert_eq!(solution.codebook.len(), reference.codebook.len());
        }
    }
}
