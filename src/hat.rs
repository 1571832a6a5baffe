use std::str::FromStr;
use crate::error::{parse_counts, ExperimentError};
use crate::pick::Pick;

/// A hat holding a finite multiset of labeled items (balls).
///
/// Each physical item is one entry in `contents`; several entries with the
/// same label are several items of that category. The hat only ever
/// shrinks, through `draw`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hat {
    contents: Vec<String>,
}

impl Hat {
    /// Builds a hat from `(label, count)` pairs, placing `count` copies of
    /// each label in the hat. Any map or sequence of pairs works.
    pub fn new<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut contents = Vec::new();
        for (label, count) in counts {
            let label = label.into();
            contents.extend((0..count).map(|_| label.clone()));
        }
        Hat { contents: contents }
    }

    pub(crate) fn from_contents(contents: Vec<String>) -> Self {
        Hat { contents: contents }
    }

    /// The items currently in the hat.
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Number of remaining items labeled `label`.
    pub fn count(&self, label: &str) -> usize {
        self.contents.iter().filter(|c| *c == label).count()
    }

    /// Draws `n` items without replacement and returns their labels in
    /// draw order.
    ///
    /// Each item is picked uniformly among those still in the hat and then
    /// removed. When the hat runs dry before `n` items are out, the draw
    /// stops early and the result is shorter than `n`.
    pub fn draw<P>(&mut self, n: usize, source: &mut P) -> Vec<String>
    where
        P: Pick + ?Sized,
    {
        let mut drawn = Vec::with_capacity(n.min(self.contents.len()));
        for _ in 0..n {
            if self.contents.is_empty() {
                break;
            }
            let i = source.pick(self.contents.len());
            debug_assert!(i < self.contents.len());
            drawn.push(self.contents.remove(i));
        }
        drawn
    }
}

impl FromStr for Hat {
    type Err = ExperimentError;

    /// Parses `"red=5 blue=3"` (commas allowed as separators).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Hat::new(parse_counts(s)?))
    }
}

#[test]
fn test_new_expands_counts() {
    let hat = Hat::new(vec![("red", 2), ("blue", 1), ("green", 0)]);
    assert_eq!(3, hat.len());
    assert_eq!(&["red", "red", "blue"], hat.contents());
    assert_eq!(2, hat.count("red"));
    assert_eq!(1, hat.count("blue"));
    assert_eq!(0, hat.count("green"));
}

#[test]
fn test_new_from_map() {
    use std::collections::HashMap;

    let mut counts = HashMap::new();
    counts.insert("red".to_string(), 5);
    counts.insert("blue".to_string(), 3);
    let hat = Hat::new(counts);
    assert_eq!(8, hat.len());
    assert_eq!(5, hat.count("red"));
    assert_eq!(3, hat.count("blue"));
}

#[test]
fn test_empty_hat() {
    let hat = Hat::new(Vec::<(String, usize)>::new());
    assert!(hat.is_empty());
    assert_eq!(0, hat.len());
}

#[test]
fn test_draw_removes_picked_item() {
    use crate::test_helper::Scripted;

    let mut hat = Hat::new(vec![("red", 2), ("blue", 1)]);
    // picks index 2 of [red, red, blue], then index 0 of [red, red]
    let drawn = hat.draw(2, &mut Scripted::new(&[2, 0]));
    assert_eq!(vec!["blue", "red"], drawn);
    assert_eq!(&["red"], hat.contents());
}

#[test]
fn test_draw_removes_one_instance_only() {
    use crate::test_helper::Scripted;

    let mut hat = Hat::new(vec![("red", 3)]);
    let drawn = hat.draw(1, &mut Scripted::new(&[1]));
    assert_eq!(vec!["red"], drawn);
    assert_eq!(2, hat.count("red"));
}

#[test]
fn test_draw_exhaustion() {
    let mut rng = ::rand::thread_rng();
    let mut hat = Hat::new(vec![("red", 2), ("blue", 1)]);

    let mut drawn = hat.draw(10, &mut rng);
    assert_eq!(3, drawn.len());
    assert!(hat.is_empty());
    drawn.sort();
    assert_eq!(vec!["blue", "red", "red"], drawn);

    assert!(hat.draw(1, &mut rng).is_empty());
    assert!(hat.draw(0, &mut rng).is_empty());
}

#[test]
fn test_draw_zero() {
    let mut rng = ::rand::thread_rng();
    let mut hat = Hat::new(vec![("red", 2)]);
    assert!(hat.draw(0, &mut rng).is_empty());
    assert_eq!(2, hat.len());
}

#[test]
fn test_draw_is_proportional() {
    use crate::test_helper::seeded;

    // 9 red and 1 blue: a single pick should be red about 90% of the time
    let mut rng = seeded(7);
    let mut red = 0;
    for _ in 0..5000 {
        let mut hat = Hat::new(vec![("red", 9), ("blue", 1)]);
        if hat.draw(1, &mut rng)[0] == "red" {
            red += 1;
        }
    }
    let freq = red as f64 / 5000.0;
    assert!((freq - 0.9).abs() < 0.03, "red frequency {}", freq);
}

#[test]
fn test_parse() {
    let hat: Hat = "red=2, blue=1".parse().unwrap();
    assert_eq!(Hat::new(vec![("red", 2), ("blue", 1)]), hat);

    assert_eq!(
        Err(ExperimentError::NegativeCount {
            label: "blue".to_string(),
            count: -1,
        }),
        "red=2 blue=-1".parse::<Hat>()
    );
}

#[cfg(test)]
mod prop {
    use super::Hat;
    use crate::test_helper::seeded;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn composition_is_preserved(
            red in 0usize..20,
            blue in 0usize..20,
            green in 0usize..20,
            draws in proptest::collection::vec(0usize..10, 0..6),
            seed in any::<u32>(),
        ) {
            let mut rng = seeded(seed);
            let mut hat = Hat::new(vec![("red", red), ("blue", blue), ("green", green)]);
            let total = red + blue + green;
            prop_assert_eq!(total, hat.len());

            let mut removed: Vec<String> = Vec::new();
            for n in draws {
                let before = hat.len();
                let drawn = hat.draw(n, &mut rng);
                prop_assert_eq!(n.min(before), drawn.len());
                removed.extend(drawn);
                prop_assert_eq!(total - removed.len(), hat.len());
            }

            for &(label, count) in &[("red", red), ("blue", blue), ("green", green)] {
                let gone = removed.iter().filter(|l| *l == label).count();
                prop_assert_eq!(count - gone, hat.count(label));
            }
        }
    }
}
