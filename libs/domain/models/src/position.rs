// [libs/domain/models/src/position.rs]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lane assignment reported by the upstream match API. Queues that don't
/// populate a team position (ARAM, customs ingested incidentally) report
/// the empty string, which the reducer skips rather than modeling here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
}

impl Position {
    /// Parses the upstream `teamPosition` string. Returns `None` for the
    /// empty string or any value outside the closed enum — callers must
    /// skip the row rather than guess.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "TOP" => Some(Self::Top),
            "JUNGLE" => Some(Self::Jungle),
            "MIDDLE" => Some(Self::Middle),
            "BOTTOM" => Some(Self::Bottom),
            "UTILITY" => Some(Self::Utility),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Jungle => "JUNGLE",
            Self::Middle => "MIDDLE",
            Self::Bottom => "BOTTOM",
            Self::Utility => "UTILITY",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_and_unknown() {
        assert_eq!(Position::parse(""), None);
        assert_eq!(Position::parse("INVALID"), None);
        assert_eq!(Position::parse("TOP"), Some(Position::Top));
    }

    #[test]
    fn roundtrips_through_as_str() {
        for p in [Position::Top, Position::Jungle, Position::Middle, Position::Bottom, Position::Utility] {
            assert_eq!(Position::parse(p.as_str()), Some(p));
        }
    }
}
