// [libs/infra/upstream-client/src/rank.rs]
//! Pure rank-floor predicate. The codebase hard-codes a specific
//! mid-ladder floor (historically "emerald-4 or higher") but the spec
//! treats it as a pluggable, configurable filter — see `RankFloor`.

const TIER_ORDER: &[&str] = &[
    "IRON", "BRONZE", "SILVER", "GOLD", "PLATINUM", "EMERALD", "DIAMOND", "MASTER", "GRANDMASTER", "CHALLENGER",
];

/// Divisions run IV (lowest) to I (highest) below Master; Master and above
/// have no division, represented here as `"I"` so ordering still works.
const DIVISION_ORDER: &[&str] = &["IV", "III", "II", "I"];

fn tier_rank(tier: &str) -> Option<usize> {
    TIER_ORDER.iter().position(|t| t.eq_ignore_ascii_case(tier))
}

fn division_rank(division: &str) -> usize {
    DIVISION_ORDER.iter().position(|d| d.eq_ignore_ascii_case(division)).unwrap_or(0)
}

/// A configurable mid-ladder qualification floor, e.g. Emerald IV.
#[derive(Debug, Clone)]
pub struct RankFloor {
    pub tier: String,
    pub division: String,
}

impl Default for RankFloor {
    fn default() -> Self {
        Self { tier: "EMERALD".to_string(), division: "IV".to_string() }
    }
}

impl RankFloor {
    /// Pure predicate comparing `(tier, division)` against this floor.
    /// Unrecognized tiers never qualify.
    pub fn qualifies(&self, tier: &str, division: &str) -> bool {
        let (Some(candidate_tier), Some(floor_tier)) = (tier_rank(tier), tier_rank(&self.tier)) else {
            return false;
        };

        match candidate_tier.cmp(&floor_tier) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => division_rank(division) >= division_rank(&self.division),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_tier_always_qualifies() {
        let floor = RankFloor::default();
        assert!(floor.qualifies("DIAMOND", "IV"));
    }

    #[test]
    fn same_tier_needs_division_at_or_above_floor() {
        let floor = RankFloor::default();
        assert!(floor.qualifies("EMERALD", "IV"));
        assert!(floor.qualifies("EMERALD", "I"));
        assert!(!floor.qualifies("GOLD", "I"));
    }

    #[test]
    fn unknown_tier_never_qualifies() {
        let floor = RankFloor::default();
        assert!(!floor.qualifies("UNRANKED", "IV"));
    }
}
