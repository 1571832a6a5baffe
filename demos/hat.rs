/// Estimates a draw probability from the command line.
///
///     cargo run --example hat -- "red=5,blue=3" "red=2" 4 2000
extern crate hat_sampler;
extern crate rand;

use hat_sampler::{Experiment, ExperimentConfig, ExperimentError, Hat, Quota};
use std::env;
use std::process;

fn parse_usize(arg: Option<String>, default: usize) -> Result<usize, ExperimentError> {
    match arg {
        Some(s) => s.parse().map_err(|_| ExperimentError::InvalidCount(s)),
        None => Ok(default),
    }
}

fn run() -> Result<(), ExperimentError> {
    let mut args = env::args().skip(1);
    let hat: Hat = args.next().unwrap_or_else(|| "red=5,blue=3".to_string()).parse()?;
    let quota: Quota = args.next().unwrap_or_else(|| "red=2".to_string()).parse()?;
    let draw_count = parse_usize(args.next(), 4)?;
    let trial_count = parse_usize(args.next(), 2000)?;

    let config = ExperimentConfig::new(draw_count, trial_count);
    let report = Experiment::new(&hat, quota).run_parallel(&mut rand::thread_rng(), &config)?;

    println!("trials\tsuccesses\tprobability\tms");
    println!(
        "{}\t{}\t{:.4}\t{:.3}",
        report.trials,
        report.successes,
        report.probability(),
        report.elapsed_ns as f64 / 1_000_000.0
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
