use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::info;
use quiver_avq::{
    AcceleratedLevelSolver, ApproximateLevelSolver, Codebook, ExactLevelSolver, LevelSolver,
    OutOfRangePolicy, SampleSet, SolverConfig, StochasticQuantizer,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

fn main() {
    env_logger::init();

    let matches = Command::new("QUIVER CLI")
        .version("0.1.0")
        .about("확률적 반올림 최적 양자화 레벨 계산 도구")
        .subcommand(
            Command::new("solve")
                .about("표본에 대한 최적 코드북 계산")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("표본 파일 (JSON 배열 또는 공백 구분 숫자)"),
                )
                .arg(
                    Arg::new("levels")
                        .long("levels")
                        .short('s')
                        .value_name("S")
                        .help("코드북 크기 s")
                        .default_value("16"),
                )
                .arg(
                    Arg::new("solver")
                        .long("solver")
                        .value_name("NAME")
                        .help("exact | accelerated | approximate")
                        .default_value("accelerated"),
                )
                .arg(
                    Arg::new("bins")
                        .long("bins")
                        .short('m')
                        .value_name("M")
                        .help("근사 솔버 구간 수 m (s ≤ m ≤ d)"),
                )
                .arg(
                    Arg::new("weights")
                        .long("weights")
                        .short('w')
                        .value_name("FILE")
                        .help("표본 가중치 파일 (표본과 같은 순서)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_name("FILE")
                        .help("솔버 설정 JSON"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("리포트를 JSON 파일로 저장"),
                ),
        )
        .subcommand(
            Command::new("quantize")
                .about("코드북으로 값 확률적 양자화")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("값 파일 (JSON 배열 또는 공백 구분 숫자)"),
                )
                .arg(
                    Arg::new("codebook")
                        .long("codebook")
                        .short('k')
                        .value_name("FILE")
                        .required(true)
                        .help("코드북 JSON (solve 리포트 또는 레벨 배열)"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("SEED")
                        .help("난수 시드")
                        .default_value("0"),
                )
                .arg(
                    Arg::new("clamp")
                        .long("clamp")
                        .action(clap::ArgAction::SetTrue)
                        .help("범위 밖 값을 양끝 레벨로 고정"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("양자화 결과를 JSON 파일로 저장"),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("solve", sub_matches)) => handle_solve(sub_matches),
        Some(("quantize", sub_matches)) => handle_quantize(sub_matches),
        _ => {
            eprintln!("❌ 명령을 지정해주세요. --help를 참조하세요.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ 오류: {:#}", e);
        process::exit(1);
    }
}

#[derive(Debug, Serialize)]
struct SolveReport {
    solver: &'static str,
    samples: usize,
    levels: usize,
    bins: Option<usize>,
    codebook: Codebook,
    total_error: f64,
    vnmse: f64,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct QuantizeReport {
    values: usize,
    seed: u64,
    squared_error: f64,
    vnmse: f64,
    quantized: Vec<f64>,
}

fn handle_solve(matches: &ArgMatches) -> Result<()> {
    let input = required(matches, "input")?;
    let s: usize = parse_arg(matches, "levels")?;
    let solver_name = required(matches, "solver")?;
    let bins: Option<usize> = matches
        .get_one::<String>("bins")
        .map(|m| m.parse().with_context(|| format!("invalid --bins value: {m}")))
        .transpose()?;

    let config = match matches.get_one::<String>("config") {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("failed to load solver config from {path}"))?,
        None => SolverConfig::default(),
    };

    let mut values = read_numbers(Path::new(input))?;
    let mut weights = match matches.get_one::<String>("weights") {
        Some(path) => Some(read_numbers(Path::new(path))?),
        None => None,
    };
    sort_samples(&mut values, weights.as_mut())?;

    let samples = match &weights {
        Some(w) => SampleSet::weighted(&values, w)?,
        None => SampleSet::new(&values)?,
    };

    let solver: Box<dyn LevelSolver> = match (solver_name.as_str(), bins) {
        ("exact", _) => Box::new(ExactLevelSolver::new(config)),
        ("accelerated", _) => Box::new(AcceleratedLevelSolver::new(config)),
        ("approximate", Some(m)) => Box::new(ApproximateLevelSolver::new(m, config)),
        ("approximate", None) => bail!("--solver approximate requires --bins"),
        (other, _) => bail!("unknown solver '{other}' (expected exact, accelerated or approximate)"),
    };

    info!(
        "solving d={} s={} with {}",
        samples.len(),
        s,
        solver.name()
    );
    let started = Instant::now();
    let solution = solver.solve(&samples, s)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let report = SolveReport {
        solver: solver.name(),
        samples: samples.len(),
        levels: s,
        bins: bins.filter(|_| solver_name.as_str() == "approximate"),
        vnmse: solution.vnmse(&samples)?,
        total_error: solution.total_error,
        codebook: solution.codebook,
        elapsed_ms,
    };
    emit(&report, matches.get_one::<String>("output"))
}

fn handle_quantize(matches: &ArgMatches) -> Result<()> {
    let values = read_numbers(Path::new(required(matches, "input")?))?;
    let codebook = read_codebook(Path::new(required(matches, "codebook")?))?;
    let seed: u64 = parse_arg(matches, "seed")?;

    let policy = if matches.get_flag("clamp") {
        OutOfRangePolicy::Clamp
    } else {
        OutOfRangePolicy::Reject
    };
    let quantizer = StochasticQuantizer::new(&codebook).with_policy(policy);
    let results = quantizer.quantize_parallel_with_error(&values, seed)?;

    let squared_error: f64 = results.iter().map(|r| r.squared_error).sum();
    let quantized: Vec<f64> = results.iter().map(|r| r.value).collect();
    let norm: f64 = values.iter().map(|v| v * v).sum();
    if norm <= 0.0 {
        bail!("values have zero norm; vNMSE is undefined");
    }

    let report = QuantizeReport {
        values: values.len(),
        seed,
        squared_error,
        vnmse: squared_error / norm,
        quantized,
    };
    emit(&report, matches.get_one::<String>("output"))
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing argument: {name}"))
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = required(matches, name)?;
    raw.parse()
        .with_context(|| format!("invalid --{name} value: {raw}"))
}

/// JSON 숫자 배열 또는 공백 구분 숫자 목록
fn read_numbers(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON array in {}", path.display()));
    }
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid number '{token}' in {}", path.display()))
        })
        .collect()
}

/// 레벨 배열 또는 `codebook` 필드를 가진 solve 리포트
fn read_codebook(path: &Path) -> Result<Codebook> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let levels = match json.get("codebook") {
        Some(inner) => inner.clone(),
        None => json,
    };
    serde_json::from_value(levels).with_context(|| format!("invalid codebook in {}", path.display()))
}

/// 값 오름차순 정렬. 가중치는 같은 순열로 따라간다.
fn sort_samples(values: &mut Vec<f64>, weights: Option<&mut Vec<f64>>) -> Result<()> {
    match weights {
        Some(weights) => {
            if weights.len() != values.len() {
                bail!(
                    "weights length {} does not match sample count {}",
                    weights.len(),
                    values.len()
                );
            }
            let mut pairs: Vec<(f64, f64)> =
                values.iter().copied().zip(weights.iter().copied()).collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (i, (v, w)) in pairs.into_iter().enumerate() {
                values[i] = v;
                weights[i] = w;
            }
        }
        None => values.sort_by(|a, b| a.total_cmp(b)),
    }
    Ok(())
}

fn emit<T: Serialize>(report: &T, output: Option<&String>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("failed to write {path}"))?;
            println!("✅ 리포트 저장: {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
