use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use strum::IntoStaticStr;

use crate::ant_system::{AntSystem, RunResult};
use crate::arguments::{DuplicateHandling, InputFormat};
use crate::config::DistanceT;
use crate::error::{AntSystemError, AntSystemResult};
use crate::parameters::Parameters;
use crate::tour::Tour;
use crate::tsp_problem::TspProblem;

#[derive(Debug, Clone, Copy, IntoStaticStr)]
enum Algorithm {
    AntSystem,
}

#[derive(Serialize)]
struct RunRecord {
    run: u32,
    seed: u64,
    shortest_found_tour: DistanceT,
    best_tour: Tour,
    duration_millis: u128,
}

#[derive(Serialize)]
struct ShortProblemDesc<'a> {
    name: &'a str,
    city_count: usize,
}

/// Benchmark results are composed of a single identical configuration
/// run multiple times.
#[derive(Serialize)]
struct BenchmarkResults<'a> {
    benchmark_start_time_millis: u128,
    benchmark_duration_millis: u128,
    problem: ShortProblemDesc<'a>,
    algorithm: &'static str,
    algorithm_constants: Parameters,
    seed: u64,
    repeat_times: u32,
    run_results: Vec<RunRecord>,
}

/// How problems are read and where results go.
#[derive(Debug, Clone)]
pub struct BenchmarkOptions {
    pub format: InputFormat,
    pub city_count: Option<usize>,
    pub repeat_times: u32,
    pub seed: u64,
    pub results_dir: Option<PathBuf>,
    pub duplicate_handling: DuplicateHandling,
}

/// Best outcome over all runs on one problem.
#[derive(Debug, Clone)]
pub struct ProblemSummary {
    pub name: String,
    pub best_tour: Tour,
    pub duration_millis: u128,
}

/// Run `run` (counted from 0) is seeded with `seed + run`.
pub fn run_seed(seed: u64, run: u32) -> u64 {
    seed.wrapping_add(u64::from(run))
}

/// One independent run on its own generator.
pub fn solve_with_seed(
    problem: &TspProblem,
    parameters: Parameters,
    seed: u64,
) -> AntSystemResult<RunResult> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut colony = AntSystem::new(problem, parameters, &mut rng)?;
    colony.solve()
}

pub fn load_problem(
    path: impl AsRef<Path>,
    format: InputFormat,
    city_count: Option<usize>,
) -> AntSystemResult<TspProblem> {
    match format {
        InputFormat::Coords => TspProblem::from_file(path, city_count),
        InputFormat::Tsplib => TspProblem::from_tsplib(path),
    }
}

pub fn benchmark_ant_system<PD: AsRef<Path>>(
    paths: &[PD],
    parameters: Parameters,
    options: &BenchmarkOptions,
) -> AntSystemResult<Vec<ProblemSummary>> {
    if options.repeat_times == 0 {
        return Err(AntSystemError::NonPositive {
            name: "repeat times",
        });
    }
    parameters.validate()?;

    if let Some(dir) = &options.results_dir {
        // Create benchmark results directory.
        fs::create_dir_all(dir).map_err(|e| AntSystemError::io(dir, e))?;
    }

    let mut summaries = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        info!("Problem file name: {}", path.display());
        let problem = load_problem(path, options.format, options.city_count)?;
        info!(
            "{}: {} cities, {} ants, {} iterations, seed {}",
            problem.name(),
            problem.number_of_cities(),
            parameters.ant_count,
            parameters.max_iterations,
            options.seed
        );

        let save_file_path = match &options.results_dir {
            Some(dir) => {
                let candidate = dir.join(format!(
                    "bm_{name}_p{p}_a{a}_b{b}_rho{r}_intensity{i}.json",
                    name = problem.name(),
                    p = parameters.ant_count,
                    a = parameters.alpha,
                    b = parameters.beta,
                    r = parameters.rho,
                    i = parameters.init_intensity
                ));
                match get_output_file_path(candidate, options.duplicate_handling)? {
                    Some(path) => Some(path),
                    None => continue,
                }
            }
            None => None,
        };

        let mut run_results = Vec::with_capacity(options.repeat_times as usize);
        let bench_start_absolute = SystemTime::now();
        let bench_start = Instant::now();
        for run in 0..options.repeat_times {
            let seed = run_seed(options.seed, run);
            let run_start = Instant::now();
            let result = solve_with_seed(&problem, parameters, seed)?;
            let duration_millis = run_start.elapsed().as_millis();
            info!(
                "{} run {} (seed {}): best length {} in {} ms",
                problem.name(),
                run + 1,
                seed,
                result.best_length(),
                duration_millis
            );
            run_results.push(RunRecord {
                run: run + 1,
                seed,
                shortest_found_tour: result.best_length(),
                best_tour: result.best_tour,
                duration_millis,
            });
        }
        let bench_duration = bench_start.elapsed();

        let mut best = Tour::PLACEHOLDER;
        for record in &run_results {
            if record.best_tour.is_shorter_than(&best) {
                best = record.best_tour.clone();
            }
        }

        // Output results.
        if let Some(save_file_path) = save_file_path {
            let results = BenchmarkResults {
                benchmark_start_time_millis: bench_start_absolute
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis())
                    .unwrap_or_default(),
                benchmark_duration_millis: bench_duration.as_millis(),
                problem: ShortProblemDesc {
                    name: problem.name(),
                    city_count: problem.number_of_cities(),
                },
                algorithm: Algorithm::AntSystem.into(),
                algorithm_constants: parameters,
                seed: options.seed,
                repeat_times: options.repeat_times,
                run_results,
            };
            let json = serde_json::to_string_pretty(&results)?;
            info!("Saving results to '{}'", save_file_path.display());
            let mut file = open_output_file(&save_file_path, options.duplicate_handling)?;
            file.write_all(json.as_bytes())
                .map_err(|e| AntSystemError::io(&save_file_path, e))?;

            let tour_path = save_file_path.with_extension("tour");
            best.save_to_file(path.display(), &tour_path)?;
        }

        summaries.push(ProblemSummary {
            name: problem.name().to_owned(),
            best_tour: best,
            duration_millis: bench_duration.as_millis(),
        });
    }

    Ok(summaries)
}

/// Returns the path to write results to, or `None` if this benchmark should be skipped.
fn get_output_file_path(
    mut candidate_path: PathBuf,
    duplicate_handling: DuplicateHandling,
) -> AntSystemResult<Option<PathBuf>> {
    if !candidate_path.exists() {
        return Ok(Some(candidate_path));
    }

    match duplicate_handling {
        DuplicateHandling::Fail => Err(AntSystemError::ResultsExist(candidate_path)),
        DuplicateHandling::Skip => {
            warn!(
                "Existing benchmark results file '{}' found, skipping",
                candidate_path.display()
            );
            Ok(None)
        }
        DuplicateHandling::SwitchName => {
            let mut name = candidate_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            name.push_str(&format!("_{}.json", rand::random::<u32>()));
            candidate_path.set_file_name(name);
            warn!(
                "Existing benchmark results file found, will save new results to '{}'",
                candidate_path.display()
            );
            Ok(Some(candidate_path))
        }
        // Handled when opening.
        DuplicateHandling::Overwrite => Ok(Some(candidate_path)),
    }
}

fn open_output_file(path: &Path, duplicate_handling: DuplicateHandling) -> AntSystemResult<File> {
    let mut openopts = OpenOptions::new();
    openopts.write(true);
    match duplicate_handling {
        DuplicateHandling::Overwrite => openopts.truncate(true).create(true),
        _ => openopts.create_new(true),
    };
    openopts.open(path).map_err(|e| AntSystemError::io(path, e))
}
