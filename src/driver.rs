use rand::{Rng, SeedableRng, XorShiftRng};
use rayon::prelude::*;
use tracing::{debug, trace};
use crate::error::{ExperimentError, Result};
use crate::hat::Hat;
use crate::pick::Pick;
use crate::quota::Quota;

/// Number of trials each parallel task runs with its own generator.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentConfig {
    /// items drawn per trial
    pub draw_count: usize,
    /// number of trials
    pub trial_count: usize,
    /// trials per task in `run_parallel`
    pub chunk_size: usize,
}

impl ExperimentConfig {
    pub fn new(draw_count: usize, trial_count: usize) -> Self {
        ExperimentConfig {
            draw_count: draw_count,
            trial_count: trial_count,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Outcome of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub trials: usize,
    pub successes: usize,
    /// wall time spent running the trials
    pub elapsed_ns: u64,
}

impl Report {
    /// The fraction of successful trials, in `[0, 1]`.
    pub fn probability(&self) -> f64 {
        debug_assert!(self.trials > 0);
        self.successes as f64 / self.trials as f64
    }
}

/// Repeats draw-and-check trials against a snapshot of a hat.
///
/// The snapshot is taken once, in `new`. Every trial rebuilds a full hat
/// from it, so no trial sees the depletion of another, and the caller's
/// hat is never touched.
pub struct Experiment {
    snapshot: Vec<String>,
    quota: Quota,
}

impl Experiment {
    pub fn new(hat: &Hat, quota: Quota) -> Self {
        Experiment {
            snapshot: hat.contents().to_vec(),
            quota: quota,
        }
    }

    pub fn quota(&self) -> &Quota {
        &self.quota
    }

    pub fn check(config: &ExperimentConfig) -> Result<()> {
        if config.trial_count == 0 {
            return Err(ExperimentError::ZeroTrials);
        }
        if config.chunk_size == 0 {
            return Err(ExperimentError::ZeroChunkSize);
        }
        Ok(())
    }

    fn trial<P>(&self, draw_count: usize, source: &mut P) -> (Vec<String>, bool)
    where
        P: Pick + ?Sized,
    {
        let mut hat = Hat::from_contents(self.snapshot.clone());
        let drawn = hat.draw(draw_count, source);
        let success = self.quota.is_met_by(&drawn);
        (drawn, success)
    }

    pub fn run<P>(&self, source: &mut P, config: &ExperimentConfig) -> Result<Report>
    where
        P: Pick + ?Sized,
    {
        self.run_logged(source, config, &|_, _, _| {})
    }

    /// Like `run`, calling `logger(trial, drawn, success)` after each trial.
    pub fn run_logged<P, L>(
        &self,
        source: &mut P,
        config: &ExperimentConfig,
        logger: &L,
    ) -> Result<Report>
    where
        P: Pick + ?Sized,
        L: Fn(usize, &[String], bool),
    {
        Experiment::check(config)?;

        let time_start = time::precise_time_ns();
        let mut successes = 0;

        for i in 0..config.trial_count {
            let (drawn, success) = self.trial(config.draw_count, source);
            trace!(trial = i, drawn = drawn.len(), success, "trial done");
            logger(i, &drawn, success);
            if success {
                successes += 1;
            }
        }

        let report = Report {
            trials: config.trial_count,
            successes: successes,
            elapsed_ns: time::precise_time_ns() - time_start,
        };
        debug!(
            trials = report.trials,
            successes = report.successes,
            elapsed_ns = report.elapsed_ns,
            "experiment finished"
        );
        Ok(report)
    }

    /// Runs the trials on the rayon pool.
    ///
    /// Trials are split into chunks of `config.chunk_size`. Each chunk gets
    /// its own generator, seeded from `rng` before anything is dispatched,
    /// so the result depends only on the state of `rng` and not on
    /// scheduling. Chunks share nothing but the snapshot and the final sum.
    pub fn run_parallel<R>(&self, rng: &mut R, config: &ExperimentConfig) -> Result<Report>
    where
        R: Rng,
    {
        Experiment::check(config)?;

        let time_start = time::precise_time_ns();
        let num_chunks = (config.trial_count + config.chunk_size - 1) / config.chunk_size;

        let chunks: Vec<(usize, [u32; 4])> = (0..num_chunks)
            .map(|c| {
                let len = config
                    .chunk_size
                    .min(config.trial_count - c * config.chunk_size);
                let mut seed: [u32; 4] = rng.gen();
                if seed == [0; 4] {
                    // not a valid xorshift state
                    seed[0] = 1;
                }
                (len, seed)
            })
            .collect();

        let draw_count = config.draw_count;
        let successes: usize = chunks
            .into_par_iter()
            .map(|(len, seed)| {
                let mut chunk_rng = XorShiftRng::from_seed(seed);
                (0..len)
                    .filter(|_| self.trial(draw_count, &mut chunk_rng).1)
                    .count()
            })
            .sum();

        let report = Report {
            trials: config.trial_count,
            successes: successes,
            elapsed_ns: time::precise_time_ns() - time_start,
        };
        debug!(
            trials = report.trials,
            successes = report.successes,
            chunks = num_chunks,
            elapsed_ns = report.elapsed_ns,
            "parallel experiment finished"
        );
        Ok(report)
    }
}

/// Estimates the probability that drawing `draw_count` items from `hat`
/// meets `quota`, over `trial_count` independent trials.
///
/// `hat` is left untouched. Fails with `ZeroTrials` if `trial_count` is 0.
pub fn experiment<P>(
    hat: &Hat,
    quota: &Quota,
    draw_count: usize,
    trial_count: usize,
    source: &mut P,
) -> Result<f64>
where
    P: Pick + ?Sized,
{
    let experiment = Experiment::new(hat, quota.clone());
    let report = experiment.run(source, &ExperimentConfig::new(draw_count, trial_count))?;
    Ok(report.probability())
}

#[test]
fn test_zero_trials() {
    let hat = Hat::new(vec![("red", 1)]);
    let mut rng = ::rand::thread_rng();
    assert_eq!(
        Err(ExperimentError::ZeroTrials),
        experiment(&hat, &Quota::default(), 1, 0, &mut rng)
    );
}

#[test]
fn test_zero_chunk_size() {
    let exp = Experiment::new(&Hat::new(vec![("red", 1)]), Quota::default());
    let config = ExperimentConfig {
        chunk_size: 0,
        ..ExperimentConfig::new(1, 10)
    };
    let mut rng = ::rand::thread_rng();
    assert_eq!(Err(ExperimentError::ZeroChunkSize), exp.run_parallel(&mut rng, &config));
}

#[test]
fn test_empty_quota_is_certain() {
    let hat = Hat::new(vec![("red", 3), ("blue", 2)]);
    let mut rng = ::rand::thread_rng();
    assert_eq!(Ok(1.0), experiment(&hat, &Quota::default(), 2, 100, &mut rng));
    assert_eq!(Ok(1.0), experiment(&hat, &Quota::default(), 0, 1, &mut rng));
}

#[test]
fn test_impossible() {
    let hat = Hat::new(vec![("red", 1)]);
    let quota = Quota::new(vec![("red", 2)]);
    let mut rng = ::rand::thread_rng();
    assert_eq!(Ok(0.0), experiment(&hat, &quota, 1, 500, &mut rng));
    // drawing more than the hat holds does not help
    assert_eq!(Ok(0.0), experiment(&hat, &quota, 5, 500, &mut rng));
}

#[test]
fn test_certain() {
    let hat = Hat::new(vec![("red", 1)]);
    let quota = Quota::new(vec![("red", 1)]);
    let mut rng = ::rand::thread_rng();
    assert_eq!(Ok(1.0), experiment(&hat, &quota, 1, 500, &mut rng));
}

#[test]
fn test_zero_draws() {
    let hat = Hat::new(vec![("red", 4)]);
    let mut rng = ::rand::thread_rng();
    let zero = Quota::new(vec![("red", 0)]);
    let one = Quota::new(vec![("red", 1)]);
    assert_eq!(Ok(1.0), experiment(&hat, &zero, 0, 50, &mut rng));
    assert_eq!(Ok(0.0), experiment(&hat, &one, 0, 50, &mut rng));
}

#[test]
fn test_every_trial_starts_full() {
    // With a progressively depleted hat, every trial after the first would
    // draw nothing and fail.
    let hat = Hat::new(vec![("red", 1), ("blue", 1)]);
    let quota = Quota::new(vec![("red", 1), ("blue", 1)]);
    let mut rng = ::rand::thread_rng();
    assert_eq!(Ok(1.0), experiment(&hat, &quota, 2, 200, &mut rng));
}

#[test]
fn test_caller_hat_untouched() {
    let hat = Hat::new(vec![("red", 5), ("blue", 3)]);
    let before = hat.clone();
    let mut rng = ::rand::thread_rng();
    experiment(&hat, &Quota::new(vec![("red", 2)]), 4, 100, &mut rng).unwrap();
    assert_eq!(before, hat);
}

#[test]
fn test_red_blue_scenario() {
    use crate::test_helper::seeded;

    // 4 out of 5 red and 3 blue: never 0 red, exactly 1 red in 5 of the
    // C(8, 4) = 70 hands, so P(at least 2 red) = 65/70.
    let hat = Hat::new(vec![("red", 5), ("blue", 3)]);
    let quota = Quota::new(vec![("red", 2)]);
    let exact = 65.0 / 70.0;

    let p = experiment(&hat, &quota, 4, 2000, &mut seeded(1)).unwrap();
    assert!((p - exact).abs() < 0.05, "p = {}", p);

    let exp = Experiment::new(&hat, quota);
    let report = exp
        .run_parallel(&mut seeded(2), &ExperimentConfig::new(4, 2000))
        .unwrap();
    assert_eq!(2000, report.trials);
    assert!((report.probability() - exact).abs() < 0.05, "{:?}", report);
}

#[test]
fn test_bounds() {
    use crate::test_helper::seeded;

    let hat = Hat::new(vec![("a", 3), ("b", 4), ("c", 2)]);
    let mut rng = seeded(3);
    for draw in 0..12 {
        for &(a, b) in &[(0, 0), (1, 1), (2, 0), (3, 4), (4, 1)] {
            let quota = Quota::new(vec![("a", a), ("b", b)]);
            let p = experiment(&hat, &quota, draw, 50, &mut rng).unwrap();
            assert!(p >= 0.0 && p <= 1.0);
        }
    }
}

#[test]
fn test_deterministic_with_seed() {
    use crate::test_helper::seeded;

    let hat = Hat::new(vec![("red", 5), ("blue", 3), ("green", 2)]);
    let quota = Quota::new(vec![("red", 2), ("green", 1)]);
    let exp = Experiment::new(&hat, quota.clone());
    let config = ExperimentConfig {
        chunk_size: 64,
        ..ExperimentConfig::new(4, 1000)
    };

    let a = experiment(&hat, &quota, 4, 1000, &mut seeded(42)).unwrap();
    let b = experiment(&hat, &quota, 4, 1000, &mut seeded(42)).unwrap();
    assert_eq!(a, b);

    let a = exp.run_parallel(&mut seeded(42), &config).unwrap();
    let b = exp.run_parallel(&mut seeded(42), &config).unwrap();
    assert_eq!(a.successes, b.successes);
}

#[test]
fn test_variance_shrinks_with_trials() {
    use crate::test_helper::seeded;

    fn variance(xs: &[f64]) -> f64 {
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / xs.len() as f64
    }

    let hat = Hat::new(vec![("red", 5), ("blue", 3)]);
    let quota = Quota::new(vec![("red", 2)]);
    let mut rng = seeded(9);

    let small: Vec<f64> = (0..30)
        .map(|_| experiment(&hat, &quota, 4, 20, &mut rng).unwrap())
        .collect();
    let large: Vec<f64> = (0..30)
        .map(|_| experiment(&hat, &quota, 4, 2000, &mut rng).unwrap())
        .collect();

    assert!(variance(&large) < variance(&small));
}

#[test]
fn test_logger_sees_every_trial() {
    use std::cell::{Cell, RefCell};
    use crate::test_helper::Scripted;

    let hat = Hat::new(vec![("red", 1), ("blue", 1)]);
    let exp = Experiment::new(&hat, Quota::new(vec![("red", 1)]));
    // index 0 is red, index 1 is blue
    let mut source = Scripted::new(&[0, 1, 1]);

    let seen = RefCell::new(Vec::new());
    let successes = Cell::new(0);
    let report = exp
        .run_logged(&mut source, &ExperimentConfig::new(1, 3), &|i, drawn, success| {
            seen.borrow_mut().push((i, drawn.to_vec()));
            if success {
                successes.set(successes.get() + 1);
            }
        })
        .unwrap();

    assert_eq!(1, report.successes);
    assert_eq!(1, successes.get());
    assert_eq!(
        vec![
            (0, vec!["red".to_string()]),
            (1, vec!["blue".to_string()]),
            (2, vec!["blue".to_string()]),
        ],
        seen.into_inner()
    );
}

#[test]
fn test_parallel_uneven_chunks() {
    use crate::test_helper::seeded;

    let hat = Hat::new(vec![("red", 2)]);
    let exp = Experiment::new(&hat, Quota::new(vec![("red", 2)]));
    let config = ExperimentConfig {
        chunk_size: 7,
        ..ExperimentConfig::new(2, 100)
    };
    let report = exp.run_parallel(&mut seeded(5), &config).unwrap();
    assert_eq!(100, report.trials);
    assert_eq!(100, report.successes);
    assert_eq!(1.0, report.probability());
}
