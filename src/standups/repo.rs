use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::standups::query::TeamQuery;

/// One user's status record for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Standup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub yesterday: String,
    pub today: String,
    pub blockers: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A standup joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub yesterday: String,
    pub today: String,
    pub blockers: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub name: String,
    pub email: String,
}

/// One page of a user's history plus the total match count.
#[derive(Debug)]
pub struct HistoryPage {
    pub standups: Vec<Standup>,
    pub total: i64,
}

const STANDUP_COLS: &str = "id, user_id, date, yesterday, today, blockers, created_at, updated_at";

/// Create or overwrite the standup for (user, day). The unique constraint on
/// (user_id, date) makes concurrent submissions for the same day converge on
/// a single row instead of racing into a duplicate.
pub async fn upsert_for_day(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    yesterday: &str,
    today: &str,
    blockers: &str,
) -> sqlx::Result<Standup> {
    let sql = format!(
        r#"
        INSERT INTO standups (user_id, date, yesterday, today, blockers)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, date) DO UPDATE
        SET yesterday = EXCLUDED.yesterday,
            today = EXCLUDED.today,
            blockers = EXCLUDED.blockers,
            updated_at = now()
        RETURNING {STANDUP_COLS}
        "#
    );
    sqlx::query_as::<_, Standup>(&sql)
    .bind(user_id)
    .bind(date)
    .bind(yesterday)
    .bind(today)
    .bind(blockers)
    .fetch_one(db)
    .await
}

/// One date-descending page of the acting user's standups, optionally
/// filtered by a case-insensitive substring across the three text fields.
/// A `None` search means no filter, not "match empty string".
pub async fn history_page(
    db: &PgPool,
    user_id: Uuid,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<HistoryPage> {
    let pattern = search.map(escape_like);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM standups
        WHERE user_id = $1
          AND ($2::text IS NULL
               OR yesterday ILIKE '%' || $2 || '%' ESCAPE '\'
               OR today ILIKE '%' || $2 || '%' ESCAPE '\'
               OR blockers ILIKE '%' || $2 || '%' ESCAPE '\')
        "#,
    )
    .bind(user_id)
    .bind(&pattern)
    .fetch_one(db)
    .await?;

    let sql = format!(
        r#"
        SELECT {STANDUP_COLS}
        FROM standups
        WHERE user_id = $1
          AND ($2::text IS NULL
               OR yesterday ILIKE '%' || $2 || '%' ESCAPE '\'
               OR today ILIKE '%' || $2 || '%' ESCAPE '\'
               OR blockers ILIKE '%' || $2 || '%' ESCAPE '\')
        ORDER BY date DESC
        LIMIT $3 OFFSET $4
        "#
    );
    let standups = sqlx::query_as::<_, Standup>(&sql)
        .bind(user_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

    Ok(HistoryPage { standups, total })
}

/// Neutralize LIKE metacharacters so the search term matches literally;
/// the queries above pair the bound pattern with `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Team snapshot: each user's most recent standup, date descending. The
/// inner join drops rows whose author no longer resolves.
pub async fn latest_per_user(db: &PgPool) -> sqlx::Result<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT latest.*
        FROM (
            SELECT DISTINCT ON (s.user_id)
                   s.id, s.user_id, s.date, s.yesterday, s.today, s.blockers,
                   s.created_at, s.updated_at, u.name, u.email
            FROM standups s
            JOIN users u ON u.id = s.user_id
            ORDER BY s.user_id, s.date DESC
        ) latest
        ORDER BY latest.date DESC
        "#,
    )
    .fetch_all(db)
    .await
}

/// Every standup matching the supplied filters, ungrouped, date descending.
/// Predicates apply in a fixed order: date equality, week range, then user
/// membership; absent filters bind as NULL and fall away in SQL.
pub async fn filtered(db: &PgPool, query: &TeamQuery) -> sqlx::Result<Vec<TeamRow>> {
    let (week_start, week_end) = match query.week_bounds() {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };
    let user_ids = if query.user_ids.is_empty() {
        None
    } else {
        Some(query.user_ids.clone())
    };

    sqlx::query_as::<_, TeamRow>(
        r#"
        SELECT s.id, s.user_id, s.date, s.yesterday, s.today, s.blockers,
               s.created_at, s.updated_at, u.name, u.email
        FROM standups s
        JOIN users u ON u.id = s.user_id
        WHERE ($1::date IS NULL OR s.date = $1::date)
          AND ($2::date IS NULL OR s.date BETWEEN $2::date AND $3::date)
          AND ($4::uuid[] IS NULL OR s.user_id = ANY($4::uuid[]))
        ORDER BY s.date DESC
        "#,
    )
    .bind(query.date)
    .bind(week_start)
    .bind(week_end)
    .bind(user_ids)
    .fetch_all(db)
    .await
}
