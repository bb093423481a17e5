use crate::analytics::types::{
    AnalyticsData, DayVisits, DeviceStats, LanguageStats, ThemeStats, TopPage,
};
use crate::analytics::window::{date_key_days_back, Day, HOUR_MS};
use crate::error::AppResult;
use crate::storage::sqlite::with_conn;
use chrono::{DateTime, Utc};
use deadpool_sqlite::Pool;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

pub const TOP_PAGES_LIMIT: i64 = 10;
/// Days covered by `week_visits`, today included.
pub const WEEK_DAYS: i64 = 7;
/// Days covered by `visits_by_day`, today included.
pub const HISTORY_DAYS: i64 = 30;

const VISIT_TOTALS_SQL: &str = "SELECT COUNT(*), COUNT(DISTINCT visitor_id) FROM page_views";

/// Parameters: ?1 = range start ms (inclusive), ?2 = range end ms (exclusive)
const VISITS_IN_RANGE_SQL: &str =
    "SELECT COUNT(*) FROM page_views WHERE created_at >= ?1 AND created_at < ?2";

const SESSION_SUMMARY_SQL: &str = "SELECT
    COUNT(*),
    COALESCE(SUM(CASE WHEN pages_count <= 1 THEN 1 ELSE 0 END), 0),
    COALESCE(AVG(duration_seconds), 0.0)
FROM sessions";

/// Parameters: ?1 = limit
const TOP_PAGES_SQL: &str = "SELECT page, COUNT(*) AS views
FROM page_views
GROUP BY page
ORDER BY views DESC, page ASC
LIMIT ?1";

/// Parameters: ?1 = first date key (inclusive), ?2 = last date key (inclusive)
const VISITS_BY_DAY_SQL: &str = "SELECT date, visits
FROM daily_stats
WHERE date >= ?1 AND date <= ?2
ORDER BY date ASC";

/// Parameters: ?1 = day start ms, ?2 = day end ms, ?3 = bucket width ms
const VISITS_BY_HOUR_SQL: &str = "SELECT (created_at - ?1) / ?3 AS hour, COUNT(*)
FROM page_views
WHERE created_at >= ?1 AND created_at < ?2
GROUP BY hour";

const BREAKDOWN_SQL: &str = "SELECT
    COALESCE(SUM(desktop_count), 0),
    COALESCE(SUM(mobile_count), 0),
    COALESCE(SUM(tablet_count), 0),
    COALESCE(SUM(light_theme), 0),
    COALESCE(SUM(dark_theme), 0),
    COALESCE(SUM(lang_ru), 0),
    COALESCE(SUM(lang_en), 0)
FROM daily_stats";

/// Share of bounced sessions as a percentage; 0 when there are no sessions.
pub fn bounce_rate(bounced: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    bounced as f64 / total as f64 * 100.0
}

pub async fn get_analytics(pool: &Pool) -> AppResult<AnalyticsData> {
    get_analytics_at(pool, Utc::now()).await
}

/// Build the full report as of `now`. Read-only.
pub async fn get_analytics_at(pool: &Pool, now: DateTime<Utc>) -> AppResult<AnalyticsData> {
    with_conn(pool, move |conn| {
        // One read transaction so every figure comes from the same snapshot.
        let tx = conn.transaction()?;
        let data = build_report(&tx, now)?;
        tx.commit()?;
        Ok(data)
    })
    .await
}

fn build_report(conn: &Connection, now: DateTime<Utc>) -> rusqlite::Result<AnalyticsData> {
    let today = Day::containing(now);

    let (total_visits, unique_visitors): (i64, i64) =
        conn.query_row(VISIT_TOTALS_SQL, [], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let today_visits: i64 = conn.query_row(
        VISITS_IN_RANGE_SQL,
        params![today.start_ms, today.end_ms],
        |row| row.get(0),
    )?;
    let week_visits: i64 = conn.query_row(
        VISITS_IN_RANGE_SQL,
        params![today.start_days_back(WEEK_DAYS - 1), today.end_ms],
        |row| row.get(0),
    )?;

    let (sessions, bounced, avg_session_duration): (i64, i64, f64) =
        conn.query_row(SESSION_SUMMARY_SQL, [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    let top_pages = {
        let mut stmt = conn.prepare(TOP_PAGES_SQL)?;
        let rows = stmt.query_map(params![TOP_PAGES_LIMIT], |row| {
            Ok(TopPage {
                page: row.get(0)?,
                views: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };
    let page_views: BTreeMap<String, i64> = top_pages
        .iter()
        .map(|p| (p.page.clone(), p.views))
        .collect();

    let visits_by_day = {
        let mut stmt = conn.prepare(VISITS_BY_DAY_SQL)?;
        let rows = stmt.query_map(
            params![date_key_days_back(now, HISTORY_DAYS - 1), today.date],
            |row| {
                Ok(DayVisits {
                    date: row.get(0)?,
                    visits: row.get(1)?,
                })
            },
        )?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut visits_by_hour = vec![0i64; 24];
    {
        let mut stmt = conn.prepare(VISITS_BY_HOUR_SQL)?;
        let rows = stmt.query_map(params![today.start_ms, today.end_ms, HOUR_MS], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (hour, count) = row?;
            if let Some(bucket) = usize::try_from(hour)
                .ok()
                .and_then(|h| visits_by_hour.get_mut(h))
            {
                *bucket = count;
            }
        }
    }

    let (devices, themes, languages) = conn.query_row(BREAKDOWN_SQL, [], |row| {
        Ok((
            DeviceStats {
                desktop: row.get(0)?,
                mobile: row.get(1)?,
                tablet: row.get(2)?,
            },
            ThemeStats {
                light: row.get(3)?,
                dark: row.get(4)?,
            },
            LanguageStats {
                ru: row.get(5)?,
                en: row.get(6)?,
            },
        ))
    })?;

    Ok(AnalyticsData {
        total_visits,
        unique_visitors,
        today_visits,
        week_visits,
        avg_session_duration,
        bounce_rate: bounce_rate(bounced, sessions),
        page_views,
        top_pages,
        visits_by_day,
        visits_by_hour,
        devices,
        themes,
        languages,
    })
}
