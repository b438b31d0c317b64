// [libs/domain/models/src/patch.rs]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assumed minor-version cadence per major release. The upstream game ships
/// roughly two dozen minor patches per major version; used only to compute
/// a retention floor that wraps sanely across a major boundary.
const ASSUMED_MINORS_PER_MAJOR: u32 = 24;

/// Normalized "major.minor" patch tag, e.g. `14.3` parsed from an upstream
/// `gameVersion` string like `14.3.567.1234`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatchTag {
    pub major: u32,
    pub minor: u32,
}

impl PatchTag {
    /// Parses a multi-segment upstream version string, keeping only the
    /// first two dotted segments. Returns `None` if fewer than two numeric
    /// segments are present.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = raw.split('.');
        let major: u32 = segments.next()?.parse().ok()?;
        let minor: u32 = segments.next()?.parse().ok()?;
        Some(Self { major, minor })
    }

    /// String-level normalization: keep the first two dotted segments, or
    /// return the input unchanged if it already has fewer than two.
    /// `normalize(normalize(v)) == normalize(v)` by construction.
    pub fn normalize(raw: &str) -> String {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() < 2 {
            return raw.to_string();
        }
        format!("{}.{}", segments[0], segments[1])
    }

    pub fn as_tag(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Computes the retention floor `self - delta` minor versions, wrapping
    /// the major segment down by one when the subtraction underflows below
    /// minor version 1.
    pub fn retention_floor(&self, delta: u32) -> Self {
        if self.minor > delta {
            Self { major: self.major, minor: self.minor - delta }
        } else {
            let shortfall = delta - self.minor;
            let major = self.major.saturating_sub(1).max(1);
            let minor = ASSUMED_MINORS_PER_MAJOR.saturating_sub(shortfall).max(1);
            Self { major, minor }
        }
    }
}

impl fmt::Display for PatchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_first_two_segments() {
        assert_eq!(PatchTag::normalize("14.3.567.1234"), "14.3");
        assert_eq!(PatchTag::normalize("14.3"), "14.3");
        assert_eq!(PatchTag::normalize("14"), "14");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["14.3.567.1234", "14.3", "14", "1.2.3.4.5"] {
            let once = PatchTag::normalize(raw);
            let twice = PatchTag::normalize(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn retention_floor_wraps_major_on_underflow() {
        let tag = PatchTag { major: 14, minor: 2 };
        let floor = tag.retention_floor(3);
        assert_eq!(floor.major, 13);
        assert_eq!(floor.minor, 23);
    }

    #[test]
    fn retention_floor_simple_subtraction() {
        let tag = PatchTag { major: 14, minor: 10 };
        let floor = tag.retention_floor(3);
        assert_eq!(floor, PatchTag { major: 14, minor: 7 });
    }

    proptest::proptest! {
        #[test]
        fn retention_floor_never_underflows_minor(major in 1u32..50, minor in 1u32..30, delta in 0u32..10) {
            let tag = PatchTag { major, minor };
            let floor = tag.retention_floor(delta);
            prop_assert!(floor.minor >= 1);
            prop_assert!(floor.major >= 1);
        }
    }
}
