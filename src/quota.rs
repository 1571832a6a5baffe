use std::collections::BTreeMap;
use std::str::FromStr;
use crate::error::{parse_counts, ExperimentError};

/// The success condition of a trial: for each listed label, the minimum
/// number of items with that label that must be among the drawn items.
/// Labels that are not listed impose no constraint.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quota {
    minimums: BTreeMap<String, usize>,
}

impl Quota {
    pub fn new<I, S>(minimums: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Quota { minimums: minimums.into_iter().map(|(l, m)| (l.into(), m)).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.minimums.is_empty()
    }

    pub fn minimum(&self, label: &str) -> usize {
        self.minimums.get(label).cloned().unwrap_or(0)
    }

    /// True if `drawn` holds at least the required number of every label.
    pub fn is_met_by(&self, drawn: &[String]) -> bool {
        self.minimums.iter().all(|(label, &min)| {
            min == 0 || drawn.iter().filter(|d| *d == label).count() >= min
        })
    }
}

impl FromStr for Quota {
    type Err = ExperimentError;

    /// Parses `"red=2 blue=1"`. A label listed twice keeps the last minimum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Quota::new(parse_counts(s)?))
    }
}

#[cfg(test)]
fn labels(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_met() {
    let quota = Quota::new(vec![("red", 2), ("blue", 1)]);
    assert!(quota.is_met_by(&labels(&["red", "blue", "red"])));
    assert!(quota.is_met_by(&labels(&["red", "red", "red", "blue", "green"])));
    assert!(!quota.is_met_by(&labels(&["red", "blue"])));
    assert!(!quota.is_met_by(&labels(&["red", "red", "green"])));
}

#[test]
fn test_unlisted_labels_are_ignored() {
    let quota = Quota::new(vec![("red", 1)]);
    assert!(quota.is_met_by(&labels(&["red", "yellow", "yellow"])));
    assert_eq!(0, quota.minimum("yellow"));
}

#[test]
fn test_empty_draw() {
    assert!(Quota::default().is_met_by(&[]));
    assert!(Quota::new(vec![("red", 0), ("blue", 0)]).is_met_by(&[]));
    assert!(!Quota::new(vec![("red", 1)]).is_met_by(&[]));
}

#[test]
fn test_parse() {
    let quota: Quota = "red=2,blue=1".parse().unwrap();
    assert_eq!(2, quota.minimum("red"));
    assert_eq!(1, quota.minimum("blue"));
    assert!("".parse::<Quota>().unwrap().is_empty());
    assert_eq!(
        Err(ExperimentError::InvalidCount("red=two".to_string())),
        "red=two".parse::<Quota>()
    );
}
