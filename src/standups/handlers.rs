use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Query as MultiQuery;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, Result},
    standups::{
        dto::{
            HistoryParams, HistoryResponse, RangeParam, StandupAuthor, SubmitStandupRequest,
            TeamParams, TeamStandup,
        },
        query::{today_utc, TeamQuery},
        repo,
        repo::TeamRow,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/standups", post(submit))
        .route("/standups/mine", get(mine))
        .route("/standups/team", get(team))
}

/// Create or overwrite the acting user's standup for today (server clock).
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SubmitStandupRequest>,
) -> Result<Json<repo::Standup>> {
    if payload.yesterday.trim().is_empty() {
        return Err(ApiError::Validation("yesterday is required".into()));
    }
    if payload.today.trim().is_empty() {
        return Err(ApiError::Validation("today is required".into()));
    }
    let blockers = payload.blockers.unwrap_or_default();

    let date = today_utc();
    let standup = repo::upsert_for_day(
        &state.db,
        user_id,
        date,
        &payload.yesterday,
        &payload.today,
        &blockers,
    )
    .await?;

    info!(user_id = %user_id, date = %date, "standup submitted");
    Ok(Json(standup))
}

/// The acting user's own history, paginated and optionally text-filtered.
#[instrument(skip(state))]
pub async fn mine(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>> {
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    // Empty search means "no filter", not "match empty string".
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let offset = page_offset(page, limit);
    let history = repo::history_page(&state.db, user_id, search, limit, offset).await?;

    Ok(Json(HistoryResponse {
        total_pages: total_pages(history.total, limit),
        current_page: page,
        total: history.total,
        standups: history.standups,
    }))
}

/// Team view. Unfiltered: the latest standup per user (team snapshot). With
/// any filter: every matching standup, ungrouped. A filtered query already
/// scopes results narrowly enough that every entry is wanted, not just the
/// latest per user.
#[instrument(skip(state))]
pub async fn team(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    MultiQuery(params): MultiQuery<TeamParams>,
) -> Result<Json<Vec<TeamStandup>>> {
    let query = TeamQuery {
        date: params.date,
        week_of: params.range.map(|RangeParam::Week| today_utc()),
        user_ids: params.user_id,
    };

    let rows = if query.is_unfiltered() {
        repo::latest_per_user(&state.db).await?
    } else {
        repo::filtered(&state.db, &query).await?
    };

    Ok(Json(rows.into_iter().map(into_team_standup).collect()))
}

fn into_team_standup(row: TeamRow) -> TeamStandup {
    TeamStandup {
        id: row.id,
        user_id: row.user_id,
        date: row.date,
        yesterday: row.yesterday,
        today: row.today,
        blockers: row.blockers,
        created_at: row.created_at,
        updated_at: row.updated_at,
        user: StandupAuthor {
            name: row.name,
            email: row.email,
        },
    }
}

fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

// Saturating: an absurd page number must yield an empty page, never an
// overflow or a negative OFFSET.
fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn page_offset_skips_earlier_pages() {
        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(2, 5), 5);
        assert_eq!(page_offset(3, 7), 14);
    }

    #[test]
    fn page_offset_saturates_on_huge_page_numbers() {
        assert_eq!(page_offset(i64::MAX, 5), i64::MAX);
        assert!(page_offset(i64::MAX, i64::MAX) >= 0);
    }

    #[test]
    fn team_row_maps_author_into_nested_user() {
        let row = TeamRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: date!(2025 - 04 - 29),
            yesterday: "wrote tests".into(),
            today: "fix bug".into(),
            blockers: String::new(),
            created_at: datetime!(2025-04-29 09:00 UTC),
            updated_at: datetime!(2025-04-29 09:00 UTC),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        let out = into_team_standup(row);
        assert_eq!(out.user.name, "Ada");
        assert_eq!(out.user.email, "ada@example.com");

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["user"]["email"], "ada@example.com");
        assert_eq!(json["date"], "2025-04-29");
    }
}
