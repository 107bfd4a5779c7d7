use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

use tsp_ant_system::arguments::Args;
use tsp_ant_system::benchmark::{self, BenchmarkOptions};
use tsp_ant_system::config;
use tsp_ant_system::utils::{initialize_random_seed, report};
use tsp_ant_system::AntSystemResult;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("{args:?}");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> AntSystemResult<()> {
    let parameters = args.parameters();
    let seed = initialize_random_seed(args.seed);
    info!("Parameters: {parameters:?}, seed {seed}");

    let options = BenchmarkOptions {
        format: args.format,
        city_count: args.city_count,
        repeat_times: args.bench_repeat_times,
        seed,
        results_dir: args.results_dir.map(PathBuf::from),
        duplicate_handling: args.dup,
    };
    let summaries = benchmark::benchmark_ant_system(&args.files, parameters, &options)?;

    for summary in summaries {
        println!(
            "{}",
            report(&summary.name, &summary.best_tour, config::REPORT_LINE_WIDTH)
        );
        println!("Finished in {} ms", summary.duration_millis);
    }

    Ok(())
}
