//! Day records: range reads and wholesale attachment replacement.
//!
//! Rows are turned into typed [`DayRecord`]s here, so nothing above this
//! layer sees a raw link row or a stored color string.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::calendar::{DayAttachment, DayRecord, Event, Mood};
use crate::error::{AppError, AppResult};
use crate::models::day::{DayRow, EventLinkRow, MoodLinkRow, UpsertDayRequest};
use crate::models::mood::decode_stored_color;

const DAY_COLUMNS: &str = "id, user_id, day_date, created_at, updated_at";

/// All day records of `user_id` between `from` and `to` inclusive, ascending.
pub async fn fetch_day_records(
    pool: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<DayRecord>> {
    if from > to {
        return Ok(Vec::new());
    }

    let days = sqlx::query_as::<_, DayRow>(&format!(
        "SELECT {DAY_COLUMNS} FROM days
         WHERE user_id = $1 AND day_date BETWEEN $2 AND $3
         ORDER BY day_date ASC"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    with_attachments(pool, days).await
}

pub async fn fetch_day_record(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<Option<DayRecord>> {
    Ok(fetch_day_records(pool, user_id, date, date).await?.pop())
}

/// One page of logged days, newest first, with the total number of days in
/// range.
pub async fn fetch_day_page(
    pool: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
    page: u32,
    per_page: u32,
) -> AppResult<(Vec<DayRecord>, i64)> {
    if from > to {
        return Ok((Vec::new(), 0));
    }

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM days WHERE user_id = $1 AND day_date BETWEEN $2 AND $3",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;

    let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
    let days = sqlx::query_as::<_, DayRow>(&format!(
        "SELECT {DAY_COLUMNS} FROM days
         WHERE user_id = $1 AND day_date BETWEEN $2 AND $3
         ORDER BY day_date DESC
         LIMIT $4 OFFSET $5"
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .bind(i64::from(per_page))
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((with_attachments(pool, days).await?, total))
}

async fn with_attachments(pool: &PgPool, days: Vec<DayRow>) -> AppResult<Vec<DayRecord>> {
    if days.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = days.iter().map(|d| d.id).collect();

    let mood_links = sqlx::query_as::<_, MoodLinkRow>(
        r#"
        SELECT dm.day_id, dm.position, m.id AS mood_id, m.name, m.color
        FROM day_moods dm
        JOIN moods m ON m.id = dm.mood_id
        WHERE dm.day_id = ANY($1)
        ORDER BY dm.day_id, dm.position
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let event_links = sqlx::query_as::<_, EventLinkRow>(
        r#"
        SELECT de.day_id, de.position, e.id AS event_id, e.name
        FROM day_events de
        JOIN events e ON e.id = de.event_id
        WHERE de.day_id = ANY($1)
        ORDER BY de.day_id, de.position
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(assemble(days, mood_links, event_links))
}

/// Attach link rows to their days. Moods come first, then events, each in
/// `position` order. Day order is kept as given.
pub fn assemble(
    days: Vec<DayRow>,
    mut mood_links: Vec<MoodLinkRow>,
    mut event_links: Vec<EventLinkRow>,
) -> Vec<DayRecord> {
    mood_links.sort_by_key(|l| l.position);
    event_links.sort_by_key(|l| l.position);

    let mut attachments: HashMap<Uuid, Vec<DayAttachment>> = HashMap::new();
    for link in mood_links {
        let mood = Mood {
            id: link.mood_id,
            color: decode_stored_color(link.mood_id, &link.color),
            name: link.name,
        };
        attachments
            .entry(link.day_id)
            .or_default()
            .push(DayAttachment::Mood(mood));
    }
    for link in event_links {
        attachments
            .entry(link.day_id)
            .or_default()
            .push(DayAttachment::Event(Event {
                id: link.event_id,
                name: link.name,
            }));
    }

    days.into_iter()
        .map(|day| DayRecord {
            attachments: attachments.remove(&day.id).unwrap_or_default(),
            id: day.id,
            user_id: day.user_id,
            date: day.day_date,
            created_at: Some(day.created_at),
            updated_at: Some(day.updated_at),
        })
        .collect()
}

/// Replace the attachments of (user, date). An empty attachment set removes
/// the day record; `None` is returned in that case.
pub async fn upsert_day(
    pool: &PgPool,
    user_id: Uuid,
    req: &UpsertDayRequest,
) -> AppResult<Option<DayRecord>> {
    let (mood_ids, event_ids) = req.deduplicated();

    let mut tx = pool.begin().await?;

    ensure_owned(&mut tx, "moods", user_id, &mood_ids).await?;
    ensure_owned(&mut tx, "events", user_id, &event_ids).await?;

    if mood_ids.is_empty() && event_ids.is_empty() {
        let removed = sqlx::query("DELETE FROM days WHERE user_id = $1 AND day_date = $2")
            .bind(user_id)
            .bind(req.date)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        tracing::debug!(user_id = %user_id, date = %req.date, removed, "Day cleared");
        return Ok(None);
    }

    let day_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO days (id, user_id, day_date)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, day_date) DO UPDATE SET updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(req.date)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM day_moods WHERE day_id = $1")
        .bind(day_id)
        .execute(&mut *tx)
        .await?;
    for (position, mood_id) in mood_ids.iter().enumerate() {
        sqlx::query("INSERT INTO day_moods (day_id, mood_id, position) VALUES ($1, $2, $3)")
            .bind(day_id)
            .bind(mood_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM day_events WHERE day_id = $1")
        .bind(day_id)
        .execute(&mut *tx)
        .await?;
    for (position, event_id) in event_ids.iter().enumerate() {
        sqlx::query("INSERT INTO day_events (day_id, event_id, position) VALUES ($1, $2, $3)")
            .bind(day_id)
            .bind(event_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        user_id = %user_id,
        date = %req.date,
        moods = mood_ids.len(),
        events = event_ids.len(),
        "Day upserted"
    );

    fetch_day_record(pool, user_id, req.date).await
}

async fn ensure_owned(
    tx: &mut Transaction<'_, Postgres>,
    table: &'static str,
    user_id: Uuid,
    ids: &[Uuid],
) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let owned = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE user_id = $1 AND id = ANY($2)"
    ))
    .bind(user_id)
    .bind(ids)
    .fetch_one(&mut **tx)
    .await?;

    if owned != ids.len() as i64 {
        return Err(AppError::Validation(format!(
            "Unknown {} referenced",
            table.trim_end_matches('s')
        )));
    }
    Ok(())
}

/// Drop days left without any attachment, e.g. after a mood was deleted.
pub async fn prune_empty_days(pool: &PgPool, user_id: Uuid) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM days d
        WHERE d.user_id = $1
          AND NOT EXISTS (SELECT 1 FROM day_moods dm WHERE dm.day_id = d.id)
          AND NOT EXISTS (SELECT 1 FROM day_events de WHERE de.day_id = d.id)
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
