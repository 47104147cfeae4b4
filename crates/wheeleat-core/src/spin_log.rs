//! Spin history and the statistics served by `/api/spin-logs`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SpinLogsConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinLog {
    pub id: String,
    pub restaurant_name: String,
    pub restaurant_unit: String,
    pub restaurant_floor: String,
    pub category: String,
    pub dietary_need: String,
    pub mall_id: String,
    pub selected_categories: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSpinLog {
    pub restaurant_name: String,
    pub restaurant_unit: String,
    pub restaurant_floor: String,
    pub category: String,
    pub dietary_need: String,
    pub mall_id: String,
    pub selected_categories: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewSpinLog {
    fn into_log(self, id: String) -> SpinLog {
        SpinLog {
            id,
            restaurant_name: self.restaurant_name,
            restaurant_unit: self.restaurant_unit,
            restaurant_floor: self.restaurant_floor,
            category: self.category,
            dietary_need: self.dietary_need,
            mall_id: self.mall_id,
            selected_categories: self.selected_categories,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("spin log store unavailable: {0}")]
    Unavailable(String),
    #[error("spin log store lock poisoned")]
    LockPoisoned,
}

/// Persistence for spin history. Spins must still succeed when recording
/// fails, so callers treat errors from `record` as non-fatal.
#[async_trait]
pub trait SpinLogStore: Send + Sync {
    async fn record(&self, entry: NewSpinLog) -> Result<SpinLog, StoreError>;

    async fn list(&self) -> Result<Vec<SpinLog>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySpinLogStore {
    logs: Mutex<Vec<SpinLog>>,
}

impl InMemorySpinLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpinLogStore for InMemorySpinLogStore {
    async fn record(&self, entry: NewSpinLog) -> Result<SpinLog, StoreError> {
        let log = entry.into_log(Uuid::now_v7().simple().to_string());
        let mut logs = self.logs.lock().map_err(|_| StoreError::LockPoisoned)?;
        logs.push(log.clone());
        Ok(log)
    }

    async fn list(&self) -> Result<Vec<SpinLog>, StoreError> {
        let logs = self.logs.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(logs.clone())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let logs = self.logs.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(logs.len())
    }
}

/// Raw query string of `/api/spin-logs`, echoed back as `filters`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinLogQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days: Option<String>,
    pub category: Option<String>,
    pub mall_id: Option<String>,
    pub restaurant_name: Option<String>,
    #[serde(skip_serializing)]
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// `start <= ts < end`
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// `ts > cutoff`
    After(DateTime<Utc>),
}

impl TimeWindow {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        match *self {
            TimeWindow::Between { start, end } => ts >= start && ts < end,
            TimeWindow::After(cutoff) => ts > cutoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinLogFilter {
    pub window: TimeWindow,
    pub category: Option<String>,
    pub mall_id: Option<String>,
    /// Lowercased; matched as a substring.
    pub restaurant_name: Option<String>,
    pub limit: usize,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_day(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ApiError::bad_request(format!("{} must be YYYY-MM-DD, got {:?}", field, value)))
}

fn day_after(field: &str, start: DateTime<Utc>) -> Result<DateTime<Utc>, ApiError> {
    start
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| ApiError::bad_request(format!("{} is out of range", field)))
}

fn parse_days(value: &str) -> Result<u32, ApiError> {
    match value.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ApiError::bad_request(format!(
            "days must be a positive integer, got {:?}",
            value
        ))),
    }
}

impl SpinLogFilter {
    /// Resolve query parameters against `now`. A single `date` wins over a
    /// `start_date`/`end_date` pair, which wins over `days`.
    pub fn from_query(
        query: &SpinLogQuery,
        cfg: &SpinLogsConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, ApiError> {
        let window = if let Some(date) = non_empty(&query.date) {
            let start = parse_day("date", date)?;
            TimeWindow::Between {
                start,
                end: day_after("date", start)?,
            }
        } else if let (Some(s), Some(e)) = (non_empty(&query.start_date), non_empty(&query.end_date)) {
            let start = parse_day("start_date", s)?;
            let end = day_after("end_date", parse_day("end_date", e)?)?;
            if end <= start {
                return Err(ApiError::bad_request("end_date must not precede start_date"));
            }
            TimeWindow::Between { start, end }
        } else {
            let days = match non_empty(&query.days) {
                Some(d) => parse_days(d)?,
                None => cfg.default_days,
            };
            let cutoff = Duration::try_days(i64::from(days))
                .and_then(|span| now.checked_sub_signed(span))
                .ok_or_else(|| {
                    ApiError::bad_request(format!("days out of range, got {}", days))
                })?;
            TimeWindow::After(cutoff)
        };

        let limit = match non_empty(&query.limit) {
            Some(l) => l.parse::<usize>().map_err(|_| {
                ApiError::bad_request(format!("limit must be a non-negative integer, got {:?}", l))
            })?,
            None => cfg.default_limit,
        }
        .clamp(1, cfg.max_limit);

        Ok(SpinLogFilter {
            window,
            category: non_empty(&query.category).map(str::to_string),
            mall_id: non_empty(&query.mall_id).map(str::to_string),
            restaurant_name: non_empty(&query.restaurant_name).map(str::to_lowercase),
            limit,
        })
    }

    pub fn matches(&self, log: &SpinLog) -> bool {
        self.window.contains(log.timestamp)
            && self.category.as_ref().map_or(true, |c| *c == log.category)
            && self.mall_id.as_ref().map_or(true, |m| *m == log.mall_id)
            && self
                .restaurant_name
                .as_ref()
                .map_or(true, |n| log.restaurant_name.to_lowercase().contains(n.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantCount {
    pub restaurant_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MallCount {
    pub mall_id: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinStatistics {
    pub spins_by_category: Vec<CategoryCount>,
    pub spins_by_restaurant: Vec<RestaurantCount>,
    pub spins_by_mall: Vec<MallCount>,
    pub daily_spins: Vec<DailyCount>,
    pub recent_spins: Vec<SpinLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSummary {
    pub total_spins: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinLogStats {
    pub summary: SpinSummary,
    pub statistics: SpinStatistics,
}

/// Count occurrences, highest first; ties broken by key.
fn ranked<'a, I>(keys: I) -> Vec<(String, usize)>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for k in keys {
        *counts.entry(k).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

impl SpinLogStats {
    pub fn compute(logs: &[SpinLog], filter: &SpinLogFilter) -> Self {
        let mut matching: Vec<&SpinLog> = logs.iter().filter(|l| filter.matches(l)).collect();

        let spins_by_category = ranked(matching.iter().map(|l| l.category.as_str()))
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        let spins_by_restaurant = ranked(matching.iter().map(|l| l.restaurant_name.as_str()))
            .into_iter()
            .take(filter.limit)
            .map(|(restaurant_name, count)| RestaurantCount {
                restaurant_name,
                count,
            })
            .collect();
        let spins_by_mall = ranked(matching.iter().map(|l| l.mall_id.as_str()))
            .into_iter()
            .map(|(mall_id, count)| MallCount { mall_id, count })
            .collect();

        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        for l in &matching {
            *per_day.entry(l.timestamp.date_naive()).or_default() += 1;
        }
        let mut daily_spins: Vec<DailyCount> = per_day
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();
        daily_spins.sort_by(|a, b| b.date.cmp(&a.date));

        let total_spins = matching.len();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let recent_spins = matching
            .into_iter()
            .take(filter.limit)
            .cloned()
            .collect();

        SpinLogStats {
            summary: SpinSummary { total_spins },
            statistics: SpinStatistics {
                spins_by_category,
                spins_by_restaurant,
                spins_by_mall,
                daily_spins,
                recent_spins,
            },
        }
    }
}
