//! Version ordering and ranges.
//!
//! Installed components carry version strings like `1.2.3`, `2.0.0.Final`
//! or `1.0.0.Beta1` that do not parse as semver, so comparison is
//! segment-aware rather than lexicographic:
//!
//! - versions are tokenized at `.`, `-`, `_` and at digit/alpha boundaries
//! - numeric segments compare numerically (`1.10 > 1.9`)
//! - qualifiers rank `alpha < beta < milestone < rc = cr < snapshot <
//!   release < sp`, with `final`, `ga` and `release` equal to the release
//!   baseline and unknown qualifiers sorting above `sp`
//! - a missing segment counts as the release baseline, so `1.0`, `1.0.0`
//!   and `1.0.Final` are all equal while `1.0-alpha < 1.0 < 1.0.sp1`
//!
//! # Examples
//!
//! ```
//! use qm_model::version::Version;
//!
//! let old = Version::parse("1.2.3.Final").unwrap();
//! let new = Version::parse("1.2.4").unwrap();
//! assert!(new > old);
//! assert_eq!(old, Version::parse("1.2.3").unwrap());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Rank of the release baseline (no qualifier, `final`, `ga`, `release`).
const RANK_RELEASE: u8 = 5;
/// Rank of qualifiers outside the known table.
const RANK_UNKNOWN: u8 = 7;

#[derive(Debug, Clone)]
enum Segment {
    Number(u64),
    Qualifier { rank: u8, text: String },
}

fn qualifier_rank(text: &str) -> u8 {
    match text {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" | "cr" => 3,
        "snapshot" => 4,
        "" | "final" | "ga" | "release" => RANK_RELEASE,
        "sp" => 6,
        _ => RANK_UNKNOWN,
    }
}

/// A component version with a segment-aware total order.
///
/// Equality is defined by the ordering, not the raw string: two spellings
/// of the same version (`1.0` and `1.0.0`) compare and test equal. The raw
/// string is preserved for display and persistence.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

impl Version {
    /// Parse a version string.
    ///
    /// Rejects empty strings and strings with no version segments at all;
    /// anything else is accepted and ordered by the rules above.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim().to_string();
        if raw.is_empty() {
            return Err(Error::InvalidVersion {
                value: s.to_string(),
                reason: "empty version".to_string(),
            });
        }

        let segments = tokenize(&raw)?;
        if segments.is_empty() {
            return Err(Error::InvalidVersion {
                value: raw,
                reason: "no version segments".to_string(),
            });
        }

        Ok(Self { raw, segments })
    }

    /// Return the original version string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn tokenize(raw: &str) -> Result<Vec<Segment>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in raw.chars() {
        if matches!(ch, '.' | '-' | '_') {
            flush(&mut tokens, &mut current);
            continue;
        }
        // Split at digit/alpha boundaries so "Beta1" becomes ["beta", "1"].
        if let Some(last) = current.chars().last()
            && last.is_ascii_digit() != ch.is_ascii_digit()
        {
            flush(&mut tokens, &mut current);
        }
        current.push(ch);
    }
    flush(&mut tokens, &mut current);

    let mut segments = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.chars().all(|c| c.is_ascii_digit()) {
            let number = token.parse::<u64>().map_err(|_| Error::InvalidVersion {
                value: raw.to_string(),
                reason: format!("numeric segment '{token}' out of range"),
            })?;
            segments.push(Segment::Number(number));
        } else {
            let text = token.to_ascii_lowercase();
            let rank = qualifier_rank(&text);
            segments.push(Segment::Qualifier { rank, text });
        }
    }
    Ok(segments)
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Compare one position of two segment lists, padding the shorter side
/// with the release baseline.
fn cmp_segment(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    use Segment::{Number, Qualifier};

    match (a, b) {
        (Some(Number(x)), Some(Number(y))) => x.cmp(y),
        (Some(Number(_)), Some(Qualifier { .. })) => Ordering::Greater,
        (Some(Qualifier { .. }), Some(Number(_))) => Ordering::Less,
        (
            Some(Qualifier { rank: ra, text: ta }),
            Some(Qualifier { rank: rb, text: tb }),
        ) => ra.cmp(rb).then_with(|| {
            if *ra == RANK_UNKNOWN {
                ta.cmp(tb)
            } else {
                Ordering::Equal
            }
        }),
        (Some(Number(x)), None) => x.cmp(&0),
        (None, Some(Number(y))) => 0.cmp(y),
        (Some(Qualifier { rank, .. }), None) => rank.cmp(&RANK_RELEASE),
        (None, Some(Qualifier { rank, .. })) => RANK_RELEASE.cmp(rank),
        (None, None) => Ordering::Equal,
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let positions = self.segments.len().max(other.segments.len());
        for i in 0..positions {
            let ord = cmp_segment(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// An endpoint of a version range.
#[derive(Debug, Clone)]
struct Bound {
    version: Version,
    inclusive: bool,
}

/// A version range such as `[1.0,)` or `[1.0,2.0)`.
///
/// Square brackets are inclusive, parentheses exclusive, and an omitted
/// endpoint is unbounded. Resolution derives `[current,)` for artifacts
/// without an explicit range.
#[derive(Debug, Clone)]
pub struct VersionRange {
    lower: Option<Bound>,
    upper: Option<Bound>,
    raw: String,
}

impl VersionRange {
    /// Parse a range string like `[1.0,)`, `(1.0,2.0]` or `(,)`.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim().to_string();
        let invalid = |reason: &str| Error::InvalidRange {
            value: raw.clone(),
            reason: reason.to_string(),
        };

        let lower_inclusive = match raw.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(invalid("must start with '[' or '('")),
        };
        let upper_inclusive = match raw.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(invalid("must end with ']' or ')'")),
        };

        let inner = &raw[1..raw.len() - 1];
        let (lower_str, upper_str) = inner
            .split_once(',')
            .ok_or_else(|| invalid("missing ',' between endpoints"))?;
        if upper_str.contains(',') {
            return Err(invalid("more than one ','"));
        }

        let lower = parse_bound(lower_str, lower_inclusive)?;
        let upper = parse_bound(upper_str, upper_inclusive)?;

        Ok(Self { lower, upper, raw })
    }

    /// Open-ended range `[version,)` used when an artifact has no explicit
    /// range of its own.
    pub fn from_floor(version: &Version) -> Self {
        Self {
            raw: format!("[{version},)"),
            lower: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            upper: None,
        }
    }

    /// Exact range `[version,version]`.
    pub fn exact(version: &Version) -> Self {
        Self {
            raw: format!("[{version},{version}]"),
            lower: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            upper: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
        }
    }

    /// The unbounded range `(,)`.
    pub fn any() -> Self {
        Self {
            raw: "(,)".to_string(),
            lower: None,
            upper: None,
        }
    }

    /// Check whether a version falls inside this range.
    pub fn contains(&self, version: &Version) -> bool {
        if let Some(bound) = &self.lower {
            match version.cmp(&bound.version) {
                Ordering::Less => return false,
                Ordering::Equal if !bound.inclusive => return false,
                _ => {}
            }
        }
        if let Some(bound) = &self.upper {
            match version.cmp(&bound.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !bound.inclusive => return false,
                _ => {}
            }
        }
        true
    }

    /// Return the original range string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_bound(s: &str, inclusive: bool) -> Result<Option<Bound>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    Ok(Some(Bound {
        version: s.parse()?,
        inclusive,
    }))
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
