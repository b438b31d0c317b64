// [libs/infra/upstream-client/src/dto.rs]
//! Wire shapes decoded from the upstream match API. Intentionally minimal —
//! only the fields the core actually consumes are modeled; unknown fields
//! are ignored by serde's default behavior.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadataDto,
    pub info: MatchInfoDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadataDto {
    pub match_id: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoDto {
    pub game_version: String,
    pub game_duration: i64,
    pub game_creation: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_id: u32,
    pub champion_name: String,
    #[serde(default)]
    pub team_position: String,
    pub win: bool,
    pub item0: u32,
    pub item1: u32,
    pub item2: u32,
    pub item3: u32,
    pub item4: u32,
    pub item5: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineDto {
    pub info: TimelineInfoDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineInfoDto {
    pub frames: Vec<TimelineFrameDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineFrameDto {
    pub events: Vec<TimelineEventDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEventDto {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub participant_id: Option<u32>,
    #[serde(default)]
    pub item_id: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub division: String,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderEntryDto {
    pub puuid: String,
    pub league_points: u32,
}
