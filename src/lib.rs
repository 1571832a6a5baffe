//! Monte Carlo estimation of "how likely is it to draw at least these
//! items out of the hat".
//!
//! A [`Hat`] holds a multiset of labeled items and draws from it without
//! replacement. An [`Experiment`] repeats draws against a snapshot of a
//! hat and counts how often a [`Quota`] is met.
//!
//! ```no_run
//! use hat_sampler::{experiment, Hat, Quota};
//!
//! let hat = Hat::new(vec![("red", 5), ("blue", 3)]);
//! let quota = Quota::new(vec![("red", 2)]);
//! let p = experiment(&hat, &quota, 4, 2000, &mut rand::thread_rng()).unwrap();
//! assert!(p >= 0.0 && p <= 1.0);
//! ```

pub mod driver;
pub mod error;
pub mod hat;
pub mod pick;
pub mod quota;

#[cfg(test)]
mod test_helper;

pub use crate::driver::{experiment, Experiment, ExperimentConfig, Report};
pub use crate::error::{ExperimentError, Result};
pub use crate::hat::Hat;
pub use crate::pick::Pick;
pub use crate::quota::Quota;
