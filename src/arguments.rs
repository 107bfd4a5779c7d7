use clap::{Parser, ValueEnum};

use crate::{config, parameters::Parameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicateHandling {
    /// Stop with an error.
    Fail,
    /// Ignore (does not run duplicate benchmarks)
    Skip,
    /// Use a different name (append a number) for our benchmark results file.
    SwitchName,
    /// Overwrite old file.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One `<id> <x> <y>` line per city.
    Coords,
    /// TSPLIB file with EUC_2D node coordinates.
    Tsplib,
}

#[derive(Parser, Debug)]
#[command(about = "Solves the travelling salesman problem with Ant System")]
pub struct Args {
    #[arg(short, long, required = true, num_args(1..))]
    /// TSP problem definition files.
    pub files: Vec<String>,

    #[arg(value_enum, long, default_value_t = InputFormat::Coords)]
    pub format: InputFormat,

    #[arg(short = 'n', long)]
    /// Read only the first N cities of a coordinate file.
    pub city_count: Option<usize>,

    #[arg(long, default_value_t = config::ALPHA)]
    pub alpha: f32,

    #[arg(long, default_value_t = config::BETA)]
    pub beta: f32,

    #[arg(long, default_value_t = config::RHO)]
    /// Evaporation rate.
    pub rho: f32,

    #[arg(long, default_value_t = config::INITIAL_TRAIL_INTENSITY)]
    pub init_intensity: f32,

    #[arg(short, long, default_value_t = config::ANT_COUNT)]
    pub ant_count: usize,

    #[arg(short, long, default_value_t = config::MAX_ITERATIONS)]
    /// Number of iterations in each run.
    pub max_iterations: u32,

    #[arg(short, long)]
    /// Random seed. Drawn at random if not given.
    pub seed: Option<u64>,

    #[arg(short, long, default_value_t = config::REPEAT_TIMES)]
    /// Number of times to repeat the run.
    pub bench_repeat_times: u32,

    #[arg(long, num_args(0..=1), default_missing_value = config::RESULTS_DIR)]
    /// Save JSON results and best tours to this directory.
    pub results_dir: Option<String>,

    #[arg(value_enum, long, default_value_t = DuplicateHandling::Fail)]
    /// What to do if existing benchmark results files are found.
    pub dup: DuplicateHandling,
}

impl Args {
    pub fn parameters(&self) -> Parameters {
        Parameters {
            ant_count: self.ant_count,
            max_iterations: self.max_iterations,
            alpha: self.alpha,
            beta: self.beta,
            rho: self.rho,
            init_intensity: self.init_intensity,
        }
    }
}
