use crate::domain::prerelease::{PreRelease, DEFAULT_LABEL};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Package version as stored in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<PreRelease>,
}

/// Optional `v`, up to three numeric components, pre-release suffix and
/// build metadata
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?(\d*)(?:\.(\d*))?(?:\.(\d*))?(?:-([^+]*))?(?:\+.*)?$")
        .expect("version pattern is valid")
});

impl Version {
    /// Create a new version without a pre-release suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse a manifest version string (e.g. "1.2.3", "1.2.4-rc.1", "v2.0")
    ///
    /// Missing numeric components default to 0. Build metadata (`+sha`) is
    /// accepted and dropped.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let captures = VERSION_RE.captures(trimmed).ok_or_else(|| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z[-label.N]",
                s
            ))
        })?;

        let component = |idx: usize, name: &str| -> Result<u64> {
            match captures.get(idx).map(|m| m.as_str()) {
                None | Some("") => Ok(0),
                Some(digits) => digits.parse::<u64>().map_err(|_| {
                    ReleaseError::version(format!("Invalid {} version: {}", name, digits))
                }),
            }
        };

        Ok(Version {
            major: component(1, "major")?,
            minor: component(2, "minor")?,
            patch: component(3, "patch")?,
            prerelease: captures
                .get(4)
                .and_then(|m| PreRelease::parse(m.as_str())),
        })
    }

    /// Apply a base bump to the numeric components
    ///
    /// Every base bump clears the pre-release suffix. `BumpType::Rc` carries
    /// the version through unchanged.
    pub fn bump_base(&self, bump_type: BumpType) -> Result<Self> {
        Ok(match bump_type {
            BumpType::Major => Version::new(increment(self.major, "major")?, 0, 0),
            BumpType::Minor => Version::new(self.major, increment(self.minor, "minor")?, 0),
            BumpType::Patch => {
                Version::new(self.major, self.minor, increment(self.patch, "patch")?)
            }
            BumpType::Rc => self.clone(),
        })
    }

    /// Advance (or start) the release-candidate suffix under `label`
    pub fn bump_prerelease(&self, label: &str) -> Result<Self> {
        let prerelease = match &self.prerelease {
            Some(pr) => pr.next(label)?,
            None => PreRelease::first(label),
        };
        Ok(Version {
            prerelease: Some(prerelease),
            ..self.clone()
        })
    }

    /// Whether the version carries the reserved release-candidate label
    pub fn is_candidate(&self, label: &str) -> bool {
        self.prerelease
            .as_ref()
            .is_some_and(|pr| pr.has_label(label))
    }
}

fn increment(value: u64, name: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        ReleaseError::version(format!("{} version {} cannot be incremented", name, value))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pr) = &self.prerelease {
            write!(f, "-{}", pr)?;
        }
        Ok(())
    }
}

/// Version type offered by the publish menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Rc,
    Patch,
    Minor,
    Major,
}

impl BumpType {
    /// All types in menu order
    pub const ALL: [BumpType; 4] = [
        BumpType::Rc,
        BumpType::Patch,
        BumpType::Minor,
        BumpType::Major,
    ];

    /// Base bump types, i.e. everything except `Rc`
    pub const BASE: [BumpType; 3] = [BumpType::Patch, BumpType::Minor, BumpType::Major];

    /// Menu key
    pub fn key(&self) -> &'static str {
        match self {
            BumpType::Rc => "rc",
            BumpType::Patch => "patch",
            BumpType::Minor => "minor",
            BumpType::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BumpType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rc" => Ok(BumpType::Rc),
            "patch" => Ok(BumpType::Patch),
            "minor" => Ok(BumpType::Minor),
            "major" => Ok(BumpType::Major),
            other => Err(ReleaseError::version(format!(
                "Unknown version type: '{}'",
                other
            ))),
        }
    }
}

/// Compute the next version string using the default `rc` label
pub fn bump(
    version: &str,
    bump_type: BumpType,
    want_prerelease: bool,
    prerelease_only: bool,
) -> Result<String> {
    bump_with_label(
        version,
        bump_type,
        want_prerelease,
        prerelease_only,
        DEFAULT_LABEL,
    )
}

/// Compute the next version string
///
/// With `prerelease_only` the numeric components are never touched, whatever
/// `bump_type` says. With `want_prerelease` the candidate counter under
/// `label` is incremented, or started at 1.
pub fn bump_with_label(
    version: &str,
    bump_type: BumpType,
    want_prerelease: bool,
    prerelease_only: bool,
    label: &str,
) -> Result<String> {
    let mut next = Version::parse(version)?;

    if !prerelease_only {
        next = next.bump_base(bump_type)?;
    }

    if want_prerelease {
        next = next.bump_prerelease(label)?;
    }

    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_with_v_prefix() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_missing_components_default_to_zero() {
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("2.5").unwrap(), Version::new(2, 5, 0));
        assert_eq!(Version::parse("").unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_version_parse_prerelease() {
        let v = Version::parse("1.2.4-rc.1").unwrap();
        assert_eq!(v.patch, 4);
        assert_eq!(v.prerelease, Some(PreRelease::new("rc", Some(1))));
        assert!(v.is_candidate("rc"));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("one.two.three").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_version_parse_drops_build_metadata() {
        assert_eq!(Version::parse("1.2.3+sha.5114f85").unwrap(), Version::new(1, 2, 3));

        let v = Version::parse("1.2.4-rc.1+build.7").unwrap();
        assert_eq!(v.prerelease, Some(PreRelease::new("rc", Some(1))));
        assert!(v.is_candidate("rc"));
    }

    #[test]
    fn test_version_display_round_trip() {
        for s in ["1.2.3", "0.0.1-rc.7", "3.1.0-beta"] {
            assert_eq!(Version::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_bump_minor() {
        assert_eq!(bump("1.2.3", BumpType::Minor, false, false).unwrap(), "1.3.0");
    }

    #[test]
    fn test_bump_patch_with_first_candidate() {
        assert_eq!(
            bump("1.2.3", BumpType::Patch, true, false).unwrap(),
            "1.2.4-rc.1"
        );
    }

    #[test]
    fn test_bump_candidate_only_keeps_base() {
        assert_eq!(
            bump("1.2.4-rc.1", BumpType::Patch, true, true).unwrap(),
            "1.2.4-rc.2"
        );
    }

    #[test]
    fn test_bump_major_clears_candidate() {
        assert_eq!(
            bump("2.0.0-rc.3", BumpType::Major, false, false).unwrap(),
            "3.0.0"
        );
    }

    #[test]
    fn test_bump_plain_patch_has_no_suffix() {
        assert_eq!(bump("0.9.9", BumpType::Patch, false, false).unwrap(), "0.9.10");
    }

    #[test]
    fn test_bump_candidate_only_on_release_version() {
        assert_eq!(
            bump("1.4.0", BumpType::Major, true, true).unwrap(),
            "1.4.0-rc.1"
        );
    }

    #[test]
    fn test_bump_base_with_candidate_restarts_counter() {
        assert_eq!(
            bump("1.2.4-rc.5", BumpType::Minor, true, false).unwrap(),
            "1.3.0-rc.1"
        );
    }

    #[test]
    fn test_bump_candidate_with_build_metadata_advances_counter() {
        assert_eq!(
            bump("1.2.4-rc.1+sha", BumpType::Patch, true, true).unwrap(),
            "1.2.4-rc.2"
        );
    }

    #[test]
    fn test_bump_overflow_is_version_error() {
        let max = u64::MAX;
        for (version, bump_type) in [
            (format!("{}.0.0", max), BumpType::Major),
            (format!("1.{}.0", max), BumpType::Minor),
            (format!("1.2.{}", max), BumpType::Patch),
        ] {
            let err = bump(&version, bump_type, false, false).unwrap_err();
            assert!(err.to_string().starts_with("Version parsing error"));
        }

        let err = bump(&format!("1.0.0-rc.{}", max), BumpType::Patch, true, true).unwrap_err();
        assert!(err.to_string().contains("cannot be incremented"));
    }

    #[test]
    fn test_bump_rc_type_leaves_base_unchanged() {
        assert_eq!(bump("1.2.3", BumpType::Rc, false, false).unwrap(), "1.2.3");
    }

    #[test]
    fn test_bump_custom_label() {
        assert_eq!(
            bump_with_label("1.0.0-next.2", BumpType::Patch, true, true, "next").unwrap(),
            "1.0.0-next.3"
        );
    }

    #[test]
    fn test_bump_type_keys_round_trip() {
        for bump_type in BumpType::ALL {
            assert_eq!(bump_type.key().parse::<BumpType>().unwrap(), bump_type);
        }
        assert!("huge".parse::<BumpType>().is_err());
    }
}
