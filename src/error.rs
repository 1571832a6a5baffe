use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    /// An experiment needs at least one trial to produce a ratio.
    #[error("trial count must be at least 1")]
    ZeroTrials,

    #[error("chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("negative count {count} for `{label}`")]
    NegativeCount { label: String, count: i64 },

    #[error("invalid count in `{0}`")]
    InvalidCount(String),

    #[error("malformed entry `{0}`, expected label=count")]
    Malformed(String),
}

pub type Result<T> = ::std::result::Result<T, ExperimentError>;

/// Parses text like `"red=5, blue=3"` into `(label, count)` pairs.
///
/// Entries are separated by commas and/or whitespace. Shared by the `FromStr`
/// impls of `Hat` and `Quota`.
pub(crate) fn parse_counts(s: &str) -> Result<Vec<(String, usize)>> {
    let mut pairs = Vec::new();
    for entry in s.split(|c: char| c == ',' || c.is_whitespace()) {
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.splitn(2, '=');
        let label = parts.next().unwrap_or("").trim();
        let count = match parts.next() {
            Some(count) if !label.is_empty() => count.trim(),
            _ => return Err(ExperimentError::Malformed(entry.to_string())),
        };
        let count: i64 = count
            .parse()
            .map_err(|_| ExperimentError::InvalidCount(entry.to_string()))?;
        if count < 0 {
            return Err(ExperimentError::NegativeCount {
                label: label.to_string(),
                count: count,
            });
        }
        pairs.push((label.to_string(), count as usize));
    }
    Ok(pairs)
}

#[test]
fn test_parse_counts() {
    assert_eq!(
        vec![("red".to_string(), 5), ("blue".to_string(), 3)],
        parse_counts("red=5, blue=3").unwrap()
    );
    assert_eq!(
        vec![("a".to_string(), 0)],
        parse_counts("  a=0 ").unwrap()
    );
    assert!(parse_counts("").unwrap().is_empty());
}

#[test]
fn test_parse_counts_errors() {
    assert_eq!(
        Err(ExperimentError::NegativeCount {
            label: "red".to_string(),
            count: -2,
        }),
        parse_counts("red=-2")
    );
    assert_eq!(
        Err(ExperimentError::Malformed("red".to_string())),
        parse_counts("red")
    );
    assert_eq!(
        Err(ExperimentError::Malformed("=4".to_string())),
        parse_counts("=4")
    );
    assert_eq!(
        Err(ExperimentError::InvalidCount("red=x".to_string())),
        parse_counts("blue=1 red=x")
    );
}

#[test]
fn test_error_display() {
    assert_eq!(
        "negative count -1 for `blue`",
        ExperimentError::NegativeCount {
            label: "blue".to_string(),
            count: -1,
        }.to_string()
    );
    assert_eq!("trial count must be at least 1", ExperimentError::ZeroTrials.to_string());
}
