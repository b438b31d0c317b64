// [libs/domain/models/src/record.rs]
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// One flattened row per participant per match, as written to the hot/warm
/// newline-delimited log. Mirrors the on-disk JSON schema exactly —
/// `teamPosition` is carried as the raw upstream string (possibly empty)
/// rather than the parsed `Position`, since the reducer must be able to
/// skip empty-position rows without first failing to decode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRow {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "gameVersion")]
    pub game_version: String,
    #[serde(rename = "gameDuration")]
    pub game_duration: i64,
    #[serde(rename = "gameCreation")]
    pub game_creation: i64,
    pub puuid: String,
    #[serde(rename = "gameName", skip_serializing_if = "Option::is_none", default)]
    pub game_name: Option<String>,
    #[serde(rename = "tagLine", skip_serializing_if = "Option::is_none", default)]
    pub tag_line: Option<String>,
    #[serde(rename = "championId")]
    pub champion_id: u32,
    #[serde(rename = "championName")]
    pub champion_name: String,
    #[serde(rename = "teamPosition")]
    pub team_position: String,
    pub win: bool,
    pub item0: u32,
    pub item1: u32,
    pub item2: u32,
    pub item3: u32,
    pub item4: u32,
    pub item5: u32,
    #[serde(rename = "buildOrder", skip_serializing_if = "Option::is_none", default)]
    pub build_order: Option<Vec<u32>>,
}

impl ParticipantRow {
    /// Parses the raw `teamPosition` string into the closed enum. `None`
    /// for empty or unrecognized queues — the reducer must skip these.
    pub fn position(&self) -> Option<Position> {
        Position::parse(&self.team_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParticipantRow {
        ParticipantRow {
            match_id: "NA1_1".into(),
            game_version: "14.3.567.1234".into(),
            game_duration: 1800,
            game_creation: 1_700_000_000_000,
            puuid: "p1".into(),
            game_name: None,
            tag_line: None,
            champion_id: 1,
            champion_name: "Annie".into(),
            team_position: "MIDDLE".into(),
            win: true,
            item0: 1001,
            item1: 0,
            item2: 0,
            item3: 0,
            item4: 0,
            item5: 0,
            build_order: Some(vec![1001]),
        }
    }

    #[test]
    fn serializes_to_wire_schema_field_names() {
        let row = sample();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["matchId"], "NA1_1");
        assert_eq!(json["teamPosition"], "MIDDLE");
        assert!(json.get("gameName").is_none());
    }

    #[test]
    fn empty_position_is_skippable() {
        let mut row = sample();
        row.team_position = String::new();
        assert_eq!(row.position(), None);
    }
}
