use crate::analytics::types::{DailyStatsRow, Device, Language, SessionRow, Theme};
use crate::analytics::window::Day;
use crate::error::AppResult;
use crate::storage::sqlite::with_conn;
use chrono::{DateTime, Utc};
use deadpool_sqlite::Pool;
use rusqlite::{params, OptionalExtension, TransactionBehavior};

const SEEN_TODAY_SQL: &str = "SELECT EXISTS(
    SELECT 1 FROM page_views
    WHERE visitor_id = ?1 AND created_at >= ?2 AND created_at < ?3
)";

const INSERT_PAGE_VIEW_SQL: &str =
    "INSERT INTO page_views (page, visitor_id, device, created_at) VALUES (?1, ?2, ?3, ?4)";

/// Every view bumps `visits`; the unique and device counters receive the
/// 0/1 increments bound as parameters.
const UPSERT_DAILY_VISIT_SQL: &str = "INSERT INTO daily_stats
    (date, visits, unique_visitors, desktop_count, mobile_count, tablet_count)
    VALUES (?1, 1, ?2, ?3, ?4, ?5)
    ON CONFLICT(date) DO UPDATE SET
        visits = visits + 1,
        unique_visitors = unique_visitors + excluded.unique_visitors,
        desktop_count = desktop_count + excluded.desktop_count,
        mobile_count = mobile_count + excluded.mobile_count,
        tablet_count = tablet_count + excluded.tablet_count";

const SESSION_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM sessions WHERE visitor_id = ?1)";

const UPSERT_SESSION_SQL: &str = "INSERT INTO sessions
    (visitor_id, duration_seconds, pages_count, theme, language, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
    ON CONFLICT(visitor_id) DO UPDATE SET
        duration_seconds = MAX(duration_seconds, excluded.duration_seconds),
        pages_count = MAX(pages_count, excluded.pages_count),
        theme = excluded.theme,
        language = excluded.language,
        updated_at = excluded.updated_at";

const UPSERT_DAILY_PREFS_SQL: &str = "INSERT INTO daily_stats
    (date, light_theme, dark_theme, lang_ru, lang_en)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(date) DO UPDATE SET
        light_theme = light_theme + excluded.light_theme,
        dark_theme = dark_theme + excluded.dark_theme,
        lang_ru = lang_ru + excluded.lang_ru,
        lang_en = lang_en + excluded.lang_en";

fn flag(on: bool) -> i64 {
    i64::from(on)
}

pub async fn record_page_view(
    pool: &Pool,
    page: String,
    visitor_id: String,
    device: Device,
) -> AppResult<bool> {
    record_page_view_at(pool, page, visitor_id, device, Utc::now()).await
}

/// Store one page view and fold it into the day's counters.
/// Returns whether this was the visitor's first view of the UTC day.
///
/// The immediate transaction takes the write lock before the existence
/// check, so concurrent first views from one visitor count once.
pub async fn record_page_view_at(
    pool: &Pool,
    page: String,
    visitor_id: String,
    device: Device,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let day = Day::containing(now);
    let now_ms = now.timestamp_millis();

    with_conn(pool, move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let seen: bool = tx.query_row(
            SEEN_TODAY_SQL,
            params![visitor_id, day.start_ms, day.end_ms],
            |row| row.get(0),
        )?;
        let is_new = !seen;

        tx.execute(
            INSERT_PAGE_VIEW_SQL,
            params![page, visitor_id, device.as_str(), now_ms],
        )?;
        tx.execute(
            UPSERT_DAILY_VISIT_SQL,
            params![
                day.date,
                flag(is_new),
                flag(is_new && device == Device::Desktop),
                flag(is_new && device == Device::Mobile),
                flag(is_new && device == Device::Tablet),
            ],
        )?;

        tx.commit()?;
        Ok(is_new)
    })
    .await
}

pub async fn record_session(
    pool: &Pool,
    visitor_id: String,
    duration_seconds: i64,
    pages_count: i64,
    theme: Theme,
    language: Language,
) -> AppResult<bool> {
    record_session_at(
        pool,
        visitor_id,
        duration_seconds,
        pages_count,
        theme,
        language,
        Utc::now(),
    )
    .await
}

/// Upsert the visitor's session. Duration and page count never decrease;
/// theme and language follow the latest report. The day's theme and
/// language counters move only when the session row is new.
/// Returns whether the session was created.
pub async fn record_session_at(
    pool: &Pool,
    visitor_id: String,
    duration_seconds: i64,
    pages_count: i64,
    theme: Theme,
    language: Language,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let day = Day::containing(now);
    let now_ms = now.timestamp_millis();

    with_conn(pool, move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: bool =
            tx.query_row(SESSION_EXISTS_SQL, params![visitor_id], |row| row.get(0))?;

        tx.execute(
            UPSERT_SESSION_SQL,
            params![
                visitor_id,
                duration_seconds,
                pages_count,
                theme.as_str(),
                language.as_str(),
                now_ms,
            ],
        )?;

        if !exists {
            tx.execute(
                UPSERT_DAILY_PREFS_SQL,
                params![
                    day.date,
                    flag(theme == Theme::Light),
                    flag(theme == Theme::Dark),
                    flag(language == Language::Ru),
                    flag(language == Language::En),
                ],
            )?;
        }

        tx.commit()?;
        Ok(!exists)
    })
    .await
}

/// Stored session for a visitor, if any.
pub async fn get_session(pool: &Pool, visitor_id: String) -> AppResult<Option<SessionRow>> {
    with_conn(pool, move |conn| {
        conn.query_row(
            "SELECT visitor_id, duration_seconds, pages_count, theme, language, created_at, updated_at
             FROM sessions WHERE visitor_id = ?1",
            params![visitor_id],
            |row| {
                Ok(SessionRow {
                    visitor_id: row.get(0)?,
                    duration_seconds: row.get(1)?,
                    pages_count: row.get(2)?,
                    theme: row.get(3)?,
                    language: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            },
        )
        .optional()
    })
    .await
}

/// Stored counters for a `YYYY-MM-DD` date, if any.
pub async fn get_daily_stats(pool: &Pool, date: String) -> AppResult<Option<DailyStatsRow>> {
    with_conn(pool, move |conn| {
        conn.query_row(
            "SELECT date, visits, unique_visitors, desktop_count, mobile_count, tablet_count,
                    light_theme, dark_theme, lang_ru, lang_en
             FROM daily_stats WHERE date = ?1",
            params![date],
            |row| {
                Ok(DailyStatsRow {
                    date: row.get(0)?,
                    visits: row.get(1)?,
                    unique_visitors: row.get(2)?,
                    desktop_count: row.get(3)?,
                    mobile_count: row.get(4)?,
                    tablet_count: row.get(5)?,
                    light_theme: row.get(6)?,
                    dark_theme: row.get(7)?,
                    lang_ru: row.get(8)?,
                    lang_en: row.get(9)?,
                })
            },
        )
        .optional()
    })
    .await
}
