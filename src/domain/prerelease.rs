//! Pre-release suffix handling for package versions
//!
//! A release-candidate suffix is a label plus a positive counter, e.g. `rc.3`.
//! Suffixes in any other shape are carried as an opaque label.

use crate::error::{ReleaseError, Result};
use std::fmt;

/// Label used for release candidates unless configured otherwise
pub const DEFAULT_LABEL: &str = "rc";

/// Pre-release suffix with optional counter
///
/// # Examples
/// - "rc.1" -> PreRelease { label: "rc", counter: Some(1) }
/// - "beta" -> PreRelease { label: "beta", counter: None }
/// - "alpha.x.7" -> PreRelease { label: "alpha.x.7", counter: None }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub label: String,
    pub counter: Option<u64>,
}

impl PreRelease {
    pub fn new(label: impl Into<String>, counter: Option<u64>) -> Self {
        PreRelease {
            label: label.into(),
            counter,
        }
    }

    /// First release candidate under `label`
    pub fn first(label: &str) -> Self {
        PreRelease::new(label, Some(1))
    }

    /// Split a suffix into label and counter
    ///
    /// Returns `None` for an empty suffix. The counter is only recognised when
    /// the suffix is exactly `<label>.<digits>`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }

        if let Some((label, counter)) = s.split_once('.') {
            if !label.is_empty() && !counter.is_empty() {
                if let Ok(counter) = counter.parse::<u64>() {
                    return Some(PreRelease::new(label, Some(counter)));
                }
            }
        }

        Some(PreRelease::new(s, None))
    }

    /// Whether this suffix carries the reserved release-candidate label
    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }

    /// Next candidate under `label`
    ///
    /// Increments the counter when the label matches, otherwise starts a
    /// fresh `<label>.1`.
    pub fn next(&self, label: &str) -> Result<Self> {
        if !self.has_label(label) {
            return Ok(PreRelease::first(label));
        }

        let counter = match self.counter {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                ReleaseError::version(format!(
                    "{} counter {} cannot be incremented",
                    label, n
                ))
            })?,
            None => 1,
        };
        Ok(PreRelease::new(label, Some(counter)))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(counter) = self.counter {
            write!(f, ".{}", counter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerelease_parse_with_counter() {
        let pr = PreRelease::parse("rc.2").unwrap();
        assert_eq!(pr.label, "rc");
        assert_eq!(pr.counter, Some(2));
    }

    #[test]
    fn test_prerelease_parse_without_counter() {
        let pr = PreRelease::parse("beta").unwrap();
        assert_eq!(pr.label, "beta");
        assert_eq!(pr.counter, None);
    }

    #[test]
    fn test_prerelease_parse_non_numeric_counter_is_opaque() {
        let pr = PreRelease::parse("rc.abc").unwrap();
        assert_eq!(pr.label, "rc.abc");
        assert_eq!(pr.counter, None);
        assert_eq!(pr.to_string(), "rc.abc");
    }

    #[test]
    fn test_prerelease_parse_empty() {
        assert!(PreRelease::parse("").is_none());
    }

    #[test]
    fn test_prerelease_next_increments_matching_label() {
        let pr = PreRelease::parse("rc.1").unwrap();
        assert_eq!(pr.next("rc").unwrap(), PreRelease::new("rc", Some(2)));
    }

    #[test]
    fn test_prerelease_next_replaces_foreign_label() {
        let pr = PreRelease::parse("beta.4").unwrap();
        assert_eq!(pr.next("rc").unwrap(), PreRelease::first("rc"));
    }

    #[test]
    fn test_prerelease_next_from_bare_label() {
        let pr = PreRelease::parse("rc").unwrap();
        assert_eq!(pr.next("rc").unwrap().to_string(), "rc.1");
    }

    #[test]
    fn test_prerelease_increment_high_number() {
        let pr = PreRelease::parse("rc.99").unwrap();
        assert_eq!(pr.next("rc").unwrap().counter, Some(100));
    }

    #[test]
    fn test_prerelease_counter_overflow_is_error() {
        let pr = PreRelease::new("rc", Some(u64::MAX));
        assert!(pr.next("rc").is_err());
        // A foreign label restarts instead of incrementing
        assert_eq!(pr.next("next").unwrap(), PreRelease::first("next"));
    }
}
