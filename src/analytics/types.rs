use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/analytics/track`, discriminated by `event`.
/// Any other `event` value fails to decode and is rejected with 400.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackEvent {
    PageView {
        page: String,
        visitor_id: String,
        #[serde(default)]
        device: Device,
    },
    Session {
        visitor_id: String,
        #[serde(default)]
        duration: i64,
        #[serde(default)]
        pages: i64,
        #[serde(default)]
        theme: Theme,
        #[serde(default)]
        language: Language,
    },
}

impl TrackEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TrackEvent::PageView { .. } => "page_view",
            TrackEvent::Session { .. } => "session",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopPage {
    pub page: String,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayVisits {
    pub date: String,
    pub visits: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceStats {
    pub desktop: i64,
    pub mobile: i64,
    pub tablet: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStats {
    pub light: i64,
    pub dark: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageStats {
    pub ru: i64,
    pub en: i64,
}

/// Report served by `GET /api/analytics`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalyticsData {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub today_visits: i64,
    pub week_visits: i64,
    pub avg_session_duration: f64,
    pub bounce_rate: f64,
    pub page_views: BTreeMap<String, i64>,
    pub top_pages: Vec<TopPage>,
    pub visits_by_day: Vec<DayVisits>,
    pub visits_by_hour: Vec<i64>,
    pub devices: DeviceStats,
    pub themes: ThemeStats,
    pub languages: LanguageStats,
}

/// One stored `sessions` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRow {
    pub visitor_id: String,
    pub duration_seconds: i64,
    pub pages_count: i64,
    pub theme: String,
    pub language: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One stored `daily_stats` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyStatsRow {
    pub date: String,
    pub visits: i64,
    pub unique_visitors: i64,
    pub desktop_count: i64,
    pub mobile_count: i64,
    pub tablet_count: i64,
    pub light_theme: i64,
    pub dark_theme: i64,
    pub lang_ru: i64,
    pub lang_en: i64,
}
