//! Version requirement parsing and checking.
//!
//! Requirements are comma-separated clauses that must all hold, written the
//! way package manifests usually spell them:
//!
//! - comparisons: `>=1.0`, `> 1.2.3`, `<2`, `<=2.0.1`
//! - equality: `=1.2.3`, `==1.2.3`, or a bare `1.2.3`; inequality: `!=1.2.3`
//! - pessimistic: `~> 2.1` (`>= 2.1, < 3`), `~> 2.1.3` (`>= 2.1.3, < 2.2`)
//!
//! Package versions are not semver: they have any number of dot-separated
//! segments (`1.6.8.1`), missing segments compare as `0`, and a segment with
//! letters (`1.7.0.rc1`, `2.0-beta`) marks a prerelease that sorts before
//! the release.
//!
//! # Examples
//!
//! ```
//! use extpack_manifest::version::VersionRequirement;
//!
//! let req = VersionRequirement::parse(">=1.0,<2.0").unwrap();
//! assert!(req.satisfies("1.4.2"));
//! assert!(!req.satisfies("2.0.0"));
//!
//! let req = VersionRequirement::parse("~> 2.1").unwrap();
//! assert!(req.satisfies("2.9.0"));
//! assert!(!req.satisfies("3.0.0"));
//!
//! let req = VersionRequirement::parse("~> 1.6.8.1").unwrap();
//! assert!(req.satisfies("1.6.8.4"));
//! assert!(!req.satisfies("1.6.9"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One segment of a [`Version`].
///
/// Variant order matters: the derived `Ord` puts any alphabetic segment
/// before any numeric one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Alpha(String),
    Num(u64),
}

/// A package version made of numeric and alphabetic segments.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<Segment>,
    raw: String,
}

impl Version {
    /// Parse a version such as `1.6.8.1`, `1.7.0.rc1` or `2.0-beta`.
    ///
    /// A `-` starts a prerelease part, so `2.0-beta` equals `2.0.pre.beta`.
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let raw = s.trim();
        if !raw.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(format!("invalid version '{raw}'"));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(format!("invalid character '{bad}' in version '{raw}'"));
        }

        let mut segments = Vec::new();
        for part in raw.replace('-', ".pre.").split('.') {
            if part.is_empty() {
                return Err(format!("empty segment in version '{raw}'"));
            }
            split_runs(part, &mut segments)
                .map_err(|e| format!("invalid version '{raw}': {e}"))?;
        }

        Ok(Self {
            segments,
            raw: raw.to_string(),
        })
    }

    /// Upper bound for `~>`: keep the release segments, drop the last one
    /// (unless it is the only one) and increment the new last segment.
    ///
    /// `2.1` ⇒ `3`, `2.1.3` ⇒ `2.2`, `1.6.8.1` ⇒ `1.6.9`.
    pub fn bump(&self) -> Self {
        let mut numbers: Vec<u64> = self
            .segments
            .iter()
            .map_while(|s| match s {
                Segment::Num(n) => Some(*n),
                Segment::Alpha(_) => None,
            })
            .collect();
        if numbers.len() > 1 {
            numbers.pop();
        }
        match numbers.last_mut() {
            Some(last) => *last = last.saturating_add(1),
            None => numbers.push(1),
        }

        let raw = numbers
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            segments: numbers.into_iter().map(Segment::Num).collect(),
            raw,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Split one dot-separated part into digit and letter runs.
fn split_runs(part: &str, segments: &mut Vec<Segment>) -> std::result::Result<(), String> {
    let mut rest = part;
    while let Some(first) = rest.chars().next() {
        let numeric = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        segments.push(if numeric {
            Segment::Num(run.parse().map_err(|_| format!("segment '{run}' is too large"))?)
        } else {
            Segment::Alpha(run.to_string())
        });
        rest = tail;
    }
    Ok(())
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let zero = Segment::Num(0);
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let a = self.segments.get(i).unwrap_or(&zero);
                let b = other.segments.get(i).unwrap_or(&zero);
                a.cmp(b)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `1.0` and `1` are the same version, so equality follows the ordering
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Gte,
    Gt,
    Lte,
    Lt,
    Eq,
    Ne,
}

/// One `op version` clause of a requirement.
#[derive(Debug, Clone)]
struct Specifier {
    op: CompareOp,
    version: Version,
}

impl Specifier {
    fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            CompareOp::Gte => candidate >= &self.version,
            CompareOp::Gt => candidate > &self.version,
            CompareOp::Lte => candidate <= &self.version,
            CompareOp::Lt => candidate < &self.version,
            CompareOp::Eq => candidate == &self.version,
            CompareOp::Ne => candidate != &self.version,
        }
    }
}

/// A parsed version requirement; every clause must hold.
#[derive(Debug, Clone)]
pub struct VersionRequirement {
    specifiers: Vec<Specifier>,
    /// The requirement string as written, for display.
    raw: String,
}

impl VersionRequirement {
    /// Parse a comma-separated requirement string.
    pub fn parse(requirement: &str) -> Result<Self> {
        let raw = requirement.trim().to_string();
        let mut specifiers = Vec::new();

        for part in requirement.split(',').map(str::trim) {
            if part.is_empty() {
                continue;
            }
            specifiers.extend(parse_clause(part)?);
        }

        if specifiers.is_empty() {
            return Err(Error::VersionConstraintParse {
                constraint: raw,
                reason: "empty requirement".to_string(),
            });
        }

        Ok(Self { specifiers, raw })
    }

    /// Whether `version` satisfies every clause.
    ///
    /// A version string that cannot be parsed satisfies nothing.
    pub fn satisfies(&self, version: &str) -> bool {
        match Version::parse(version) {
            Ok(parsed) => self.satisfies_version(&parsed),
            Err(e) => {
                tracing::debug!(version = %version, error = %e, "unparseable package version");
                false
            }
        }
    }

    pub fn satisfies_version(&self, version: &Version) -> bool {
        self.specifiers.iter().all(|spec| spec.matches(version))
    }

    /// Return the requirement string as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_clause(s: &str) -> Result<Vec<Specifier>> {
    if let Some(rest) = s.strip_prefix("~>") {
        let lower = parse_version_in(s, rest.trim())?;
        let upper = lower.bump();
        return Ok(vec![
            Specifier {
                op: CompareOp::Gte,
                version: lower,
            },
            Specifier {
                op: CompareOp::Lt,
                version: upper,
            },
        ]);
    }

    let (op, version_str) = if let Some(rest) = s.strip_prefix(">=") {
        (CompareOp::Gte, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (CompareOp::Lte, rest)
    } else if let Some(rest) = s.strip_prefix("!=") {
        (CompareOp::Ne, rest)
    } else if let Some(rest) = s.strip_prefix("==") {
        (CompareOp::Eq, rest)
    } else if let Some(rest) = s.strip_prefix('=') {
        (CompareOp::Eq, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (CompareOp::Gt, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (CompareOp::Lt, rest)
    } else {
        // Bare version implies equality
        (CompareOp::Eq, s)
    };

    let version = parse_version_in(s, version_str.trim())?;
    Ok(vec![Specifier { op, version }])
}

fn parse_version_in(clause: &str, version_str: &str) -> Result<Version> {
    Version::parse(version_str).map_err(|reason| Error::VersionConstraintParse {
        constraint: clause.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    // --- Version ---

    #[rstest]
    #[case("1", "1.0.0")]
    #[case("1.6", "1.6.0.0")]
    #[case(" 1.6.8.1 ", "1.6.8.1")]
    fn test_version_padding_is_equal(#[case] a: &str, #[case] b: &str) {
        assert_eq!(v(a), v(b));
    }

    #[rstest]
    #[case("1.6.8", "1.6.8.1")]
    #[case("1.7.0.rc1", "1.7")]
    #[case("1.7.0.rc1", "1.7.0.rc2")]
    #[case("1.7.0.beta", "1.7.0.rc")]
    #[case("2.0-beta", "2.0")]
    #[case("1.9.99", "1.10")]
    fn test_version_ordering(#[case] lower: &str, #[case] higher: &str) {
        assert!(v(lower) < v(higher), "{lower} < {higher}");
    }

    #[test]
    fn test_hyphen_is_prerelease() {
        assert_eq!(v("2.0-beta"), v("2.0.pre.beta"));
        assert!(v("2.0-beta") < v("2.0.0.0"));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1..2")]
    #[case("1.2+build")]
    #[case("1.2.")]
    fn test_version_rejects(#[case] input: &str) {
        assert!(Version::parse(input).is_err(), "{input:?} should be rejected");
    }

    #[rstest]
    #[case("2", "3")]
    #[case("2.1", "3")]
    #[case("2.1.3", "2.2")]
    #[case("1.6.8.1", "1.6.9")]
    #[case("1.0.rc1", "2")]
    fn test_bump(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(v(input).bump().as_str(), expected);
    }

    // --- VersionRequirement::parse ---

    #[test]
    fn test_parse_gte() {
        let c = VersionRequirement::parse(">=1.2").unwrap();
        assert_eq!(c.specifiers.len(), 1);
        assert_eq!(c.as_str(), ">=1.2");
    }

    #[test]
    fn test_parse_compound() {
        let c = VersionRequirement::parse(">=1.0,<2.0").unwrap();
        assert_eq!(c.specifiers.len(), 2);
    }

    #[test]
    fn test_parse_with_spaces() {
        let c = VersionRequirement::parse(">= 1.0, < 2.0").unwrap();
        assert!(c.satisfies("1.5.0"));
    }

    #[test]
    fn test_parse_pessimistic_expands() {
        let c = VersionRequirement::parse("~> 2.1").unwrap();
        assert_eq!(c.specifiers.len(), 2);
    }

    #[test]
    fn test_parse_four_segment_pessimistic() {
        assert!(VersionRequirement::parse("~> 1.6.8.1").is_ok());
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(VersionRequirement::parse("").is_err());
        assert!(VersionRequirement::parse(" , ").is_err());
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(VersionRequirement::parse(">=abc").is_err());
        assert!(VersionRequirement::parse("~>").is_err());
    }

    // --- satisfies ---

    #[test]
    fn test_satisfies_compound() {
        let c = VersionRequirement::parse(">=1.0,<2.0").unwrap();
        assert!(c.satisfies("1.0.0"));
        assert!(c.satisfies("1.9.9"));
        assert!(!c.satisfies("0.9.0"));
        assert!(!c.satisfies("2.0.0"));
    }

    #[test]
    fn test_satisfies_single_equals() {
        let c = VersionRequirement::parse("=1.2.3").unwrap();
        assert!(c.satisfies("1.2.3"));
        assert!(c.satisfies("1.2.3.0"));
        assert!(!c.satisfies("1.2.4"));
    }

    #[test]
    fn test_satisfies_ne() {
        let c = VersionRequirement::parse("!=1.1.0").unwrap();
        assert!(c.satisfies("1.2.0"));
        assert!(!c.satisfies("1.1.0"));
    }

    #[test]
    fn test_pessimistic_two_part() {
        let c = VersionRequirement::parse("~> 2.1").unwrap();
        assert!(c.satisfies("2.1.0"));
        assert!(c.satisfies("2.9.0"));
        assert!(!c.satisfies("2.0.9"));
        assert!(!c.satisfies("3.0.0"));
    }

    #[test]
    fn test_pessimistic_three_part() {
        let c = VersionRequirement::parse("~>2.1.3").unwrap();
        assert!(c.satisfies("2.1.3"));
        assert!(c.satisfies("2.1.99"));
        assert!(!c.satisfies("2.2.0"));
    }

    #[test]
    fn test_pessimistic_four_part() {
        let c = VersionRequirement::parse("~> 1.6.8.1").unwrap();
        assert!(c.satisfies("1.6.8.1"));
        assert!(c.satisfies("1.6.8.12"));
        assert!(!c.satisfies("1.6.8"));
        assert!(!c.satisfies("1.6.9"));
    }

    #[test]
    fn test_four_segment_version_satisfies_short_requirement() {
        let c = VersionRequirement::parse(">= 1.6").unwrap();
        assert!(c.satisfies("1.6.8.1"));
        assert!(c.satisfies("1.6.8"));
    }

    #[test]
    fn test_dotted_prerelease_sorts_before_release() {
        let c = VersionRequirement::parse("< 1.7").unwrap();
        assert!(c.satisfies("1.7.0.rc1"));
        assert!(!c.satisfies("1.7.0"));
    }

    #[test]
    fn test_satisfies_short_versions() {
        let c = VersionRequirement::parse("<2").unwrap();
        assert!(c.satisfies("1.9"));
        assert!(c.satisfies("1"));
        assert!(!c.satisfies("2"));
    }

    #[test]
    fn test_hyphen_prerelease_sorts_before_release() {
        let c = VersionRequirement::parse("<2.0").unwrap();
        assert!(c.satisfies("2.0.0-rc1"));
    }

    #[test]
    fn test_satisfies_invalid_version_returns_false() {
        let c = VersionRequirement::parse(">=1.0").unwrap();
        assert!(!c.satisfies("not-a-version"));
        assert!(!c.satisfies(""));
    }

    #[test]
    fn test_display() {
        let c = VersionRequirement::parse(">=1.0,<2.0").unwrap();
        assert_eq!(format!("{c}"), ">=1.0,<2.0");
    }
}
