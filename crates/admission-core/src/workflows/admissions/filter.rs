use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::domain::AdmissionRecord;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid YYYY-MM month")]
pub struct YearMonthParseError(String);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// "October 2025"
    pub fn long_label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// "Oct-2025", used in report file names.
    pub fn short_label(self) -> String {
        self.first_day().format("%b-%Y").to_string()
    }

    /// Inclusive bounds of the month as seen in `zone`, expressed in UTC for store queries.
    pub fn bounds_in(self, zone: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        let offset = Duration::seconds(i64::from(zone.local_minus_utc()));
        let midnight = |date: NaiveDate| {
            Utc.from_utc_datetime(&(date.and_hms_opt(0, 0, 0).unwrap_or_default() - offset))
        };
        let start = midnight(self.first_day());
        let end = midnight(self.next().first_day()) - Duration::milliseconds(1);
        (start, end)
    }

    /// The `count` most recent months ending with the month containing `today`.
    pub fn recent(today: NaiveDate, count: usize) -> Vec<Self> {
        let mut months = Vec::with_capacity(count);
        let mut cursor = Self::of(&today);
        for _ in 0..count {
            months.push(cursor);
            cursor = cursor.previous();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let error = || YearMonthParseError(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(error)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(error());
        }
        let year = year.parse::<i32>().map_err(|_| error())?;
        let month = month.parse::<u32>().map_err(|_| error())?;
        Self::new(year, month).ok_or_else(error)
    }
}

/// Inclusive date window compared against the UTC calendar date of each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// "2025-01-01 to 2025-01-31"
    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

/// The time window applied before any aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSelection {
    All,
    Month { month: YearMonth },
    Range { range: DateRange },
}

impl FilterSelection {
    /// Month wins when both a month and a complete range are supplied.
    pub fn resolve(month: Option<YearMonth>, range: Option<DateRange>) -> Self {
        match (month, range) {
            (Some(month), _) => Self::Month { month },
            (None, Some(range)) => Self::Range { range },
            (None, None) => Self::All,
        }
    }

    /// Human label used in report headers and payloads.
    pub fn period_label(&self) -> String {
        match self {
            Self::All => "All time".to_string(),
            Self::Month { month } => month.long_label(),
            Self::Range { range } => range.label(),
        }
    }

    pub fn matches(&self, record: &AdmissionRecord, zone: FixedOffset) -> bool {
        match self {
            Self::All => true,
            Self::Month { month } => {
                YearMonth::of(&record.created_at.with_timezone(&zone)) == *month
            }
            Self::Range { range } => range.contains(record.created_on()),
        }
    }

    /// Records passing the filter, in the order given. Never re-sorts.
    pub fn apply<'a>(
        &self,
        records: &'a [AdmissionRecord],
        zone: FixedOffset,
    ) -> Vec<&'a AdmissionRecord> {
        records
            .iter()
            .filter(|record| self.matches(record, zone))
            .collect()
    }
}

/// Filter inputs as the user edits them. Choosing a month clears the range and touching
/// either range bound clears the month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    month: Option<YearMonth>,
    range_start: Option<NaiveDate>,
    range_end: Option<NaiveDate>,
}

impl FilterState {
    pub fn select_month(&mut self, month: Option<YearMonth>) {
        self.month = month;
        if month.is_some() {
            self.range_start = None;
            self.range_end = None;
        }
    }

    pub fn set_range_start(&mut self, start: Option<NaiveDate>) {
        self.range_start = start;
        if start.is_some() {
            self.month = None;
        }
    }

    pub fn set_range_end(&mut self, end: Option<NaiveDate>) {
        self.range_end = end;
        if end.is_some() {
            self.month = None;
        }
    }

    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.set_range_start(Some(start));
        self.set_range_end(Some(end));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.month
    }

    /// A range only counts once both ends are present.
    pub fn range(&self) -> Option<DateRange> {
        match (self.range_start, self.range_end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }

    pub fn selection(&self) -> FilterSelection {
        FilterSelection::resolve(self.month, self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_and_labels_months() {
        let month: YearMonth = "2025-10".parse().expect("parses");
        assert_eq!(month.to_string(), "2025-10");
        assert_eq!(month.long_label(), "October 2025");
        assert_eq!(month.short_label(), "Oct-2025");
        assert_eq!(month.last_day(), date(2025, 10, 31));
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025/10".parse::<YearMonth>().is_err());
        assert!("25-10".parse::<YearMonth>().is_err());
    }

    #[test]
    fn recent_months_walk_back_across_years() {
        let months = YearMonth::recent(date(2025, 2, 14), 4);
        let labels: Vec<String> = months.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["2025-02", "2025-01", "2024-12", "2024-11"]);
    }

    #[test]
    fn bounds_cover_the_month_in_zone() {
        let utc = FixedOffset::east_opt(0).expect("utc");
        let (start, end) = YearMonth::new(2024, 2).expect("valid").bounds_in(utc);
        assert_eq!(start.to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(end.date_naive(), date(2024, 2, 29));

        let kolkata = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset");
        let (start, end) = YearMonth::new(2025, 10).expect("valid").bounds_in(kolkata);
        assert_eq!(start.to_rfc3339(), "2025-09-30T18:30:00+00:00");
        assert_eq!(
            end.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2025-10-31T18:29:59.999Z"
        );
    }

    #[test]
    fn month_selection_clears_range_and_vice_versa() {
        let mut state = FilterState::default();
        state.set_range(date(2025, 1, 1), date(2025, 1, 31));
        state.select_month(YearMonth::new(2025, 3));
        assert!(state.range().is_none());
        assert!(matches!(state.selection(), FilterSelection::Month { .. }));

        state.set_range_start(Some(date(2025, 2, 1)));
        assert!(state.month().is_none());
        assert_eq!(state.selection(), FilterSelection::All);

        state.set_range_end(Some(date(2025, 2, 28)));
        assert_eq!(
            state.selection(),
            FilterSelection::Range {
                range: DateRange {
                    start: date(2025, 2, 1),
                    end: date(2025, 2, 28)
                }
            }
        );
    }

    #[test]
    fn resolve_prefers_month() {
        let month = YearMonth::new(2025, 5).expect("valid");
        let range = DateRange {
            start: date(2025, 1, 1),
            end: date(2025, 1, 2),
        };
        assert_eq!(
            FilterSelection::resolve(Some(month), Some(range)),
            FilterSelection::Month { month }
        );
        assert_eq!(FilterSelection::All.period_label(), "All time");
        assert_eq!(
            FilterSelection::Range { range }.period_label(),
            "2025-01-01 to 2025-01-02"
        );
    }
}
