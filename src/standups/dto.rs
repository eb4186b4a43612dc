use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::standups::repo::Standup;

/// Request body for submitting (or overwriting) today's standup.
#[derive(Debug, Deserialize)]
pub struct SubmitStandupRequest {
    pub yesterday: String,
    pub today: String,
    #[serde(default)]
    pub blockers: Option<String>,
}

/// Query parameters for the own-history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    5
}

/// One page of the acting user's history, with pager totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub standups: Vec<Standup>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

/// Query parameters for the team endpoint. `userId` may repeat.
#[derive(Debug, Deserialize)]
pub struct TeamParams {
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub range: Option<RangeParam>,
    #[serde(default, rename = "userId")]
    pub user_id: Vec<Uuid>,
}

/// Accepted values for `range`; anything else is rejected as bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeParam {
    Week,
}

/// The author fields attached to each team-view row.
#[derive(Debug, Serialize)]
pub struct StandupAuthor {
    pub name: String,
    pub email: String,
}

/// A team-view row: a standup joined with its author.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStandup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub yesterday: String,
    pub today: String,
    pub blockers: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
    pub user: StandupAuthor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_params_default_to_first_page_of_five() {
        let p: HistoryParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 5);
        assert!(p.search.is_none());
    }

    #[test]
    fn range_param_accepts_only_week() {
        let p: TeamParams = serde_json::from_str(r#"{"range":"week"}"#).unwrap();
        assert_eq!(p.range, Some(RangeParam::Week));
        assert!(serde_json::from_str::<TeamParams>(r#"{"range":"month"}"#).is_err());
    }

    #[test]
    fn team_params_parse_date_and_user_ids() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"date":"2025-04-29","userId":["{}"]}}"#, id);
        let p: TeamParams = serde_json::from_str(&raw).unwrap();
        assert_eq!(p.date, Some(time::macros::date!(2025 - 04 - 29)));
        assert_eq!(p.user_id, vec![id]);
        assert!(p.range.is_none());
    }

    #[test]
    fn history_response_uses_camel_case_wire_names() {
        let response = HistoryResponse {
            standups: vec![],
            total_pages: 3,
            current_page: 1,
            total: 11,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("totalPages").is_some());
        assert!(json.get("currentPage").is_some());
    }
}
