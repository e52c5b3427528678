use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::date::{MONTH_LABELS, WEEKDAY_LABELS, monday_first_index, monday_of_week, month_start,
    sub_months};
use crate::model::{Expense, Trip};

/// Selectable dashboard windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartWindow {
    /// Single bucket with today's totals.
    Today,
    /// The current Monday-first week, one bucket per day.
    ThisWeek,
    /// The last calendar month ending today, one bucket per day.
    LastMonth,
    Last3Months,
    Last6Months,
    LastYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Day,
    Month,
}

impl ChartWindow {
    /// Every window, in the order the dashboard offers them.
    pub fn all() -> [ChartWindow; 6] {
        [
            ChartWindow::Today,
            ChartWindow::ThisWeek,
            ChartWindow::LastMonth,
            ChartWindow::Last3Months,
            ChartWindow::Last6Months,
            ChartWindow::LastYear,
        ]
    }

    /// Inclusive `[start, end]` date range of this window as seen from `now`.
    pub fn range(self, now: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            ChartWindow::Today => (now, now),
            ChartWindow::ThisWeek => {
                let monday = monday_of_week(now);
                (monday, monday + Days::new(6))
            }
            ChartWindow::LastMonth => {
                let start = sub_months(now, 1) + Days::new(1);
                (start, now)
            }
            ChartWindow::Last3Months => (month_start(sub_months(now, 2)), now),
            ChartWindow::Last6Months => (month_start(sub_months(now, 5)), now),
            ChartWindow::LastYear => (month_start(sub_months(now, 11)), now),
        }
    }

    fn granularity(self) -> Granularity {
        match self {
            ChartWindow::Today | ChartWindow::ThisWeek | ChartWindow::LastMonth => Granularity::Day,
            _ => Granularity::Month,
        }
    }
}

/// Error for unrecognized window selectors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart window: {0} (expected today, week, month, 3m, 6m or year)")]
pub struct ParseChartWindowError(pub String);

impl std::str::FromStr for ChartWindow {
    type Err = ParseChartWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(ChartWindow::Today),
            "week" | "7d" => Ok(ChartWindow::ThisWeek),
            "month" | "1m" => Ok(ChartWindow::LastMonth),
            "3m" => Ok(ChartWindow::Last3Months),
            "6m" => Ok(ChartWindow::Last6Months),
            "year" | "12m" => Ok(ChartWindow::LastYear),
            other => Err(ParseChartWindowError(other.to_string())),
        }
    }
}

/// One rendered chart bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBucket {
    pub label: String,
    /// All trip amounts in the period, paid and pending alike.
    pub income: f64,
    pub expense: f64,
    /// True for the bucket containing `now`.
    pub is_current_period: bool,
}

/// Bucket trips and expenses over `window` as seen from `now`.
///
/// Buckets are contiguous and gap-free: every calendar day (or month) in the
/// window appears exactly once, zero-activity periods included, so the
/// number of buckets always equals the calendar units spanned inclusive of
/// both endpoints.
pub fn build_chart(
    now: NaiveDate,
    window: ChartWindow,
    trips: &[Trip],
    expenses: &[Expense],
) -> Vec<ChartBucket> {
    let (start, end) = window.range(now);
    let granularity = window.granularity();
    let key_of = |date: NaiveDate| match granularity {
        Granularity::Day => date,
        Granularity::Month => month_start(date),
    };

    let mut totals: HashMap<NaiveDate, (f64, f64)> = HashMap::new();
    for trip in trips {
        if trip.trip_date >= start && trip.trip_date <= end {
            totals.entry(key_of(trip.trip_date)).or_default().0 += trip.amount;
        }
    }
    for expense in expenses {
        if expense.expense_date >= start && expense.expense_date <= end {
            totals.entry(key_of(expense.expense_date)).or_default().1 += expense.amount;
        }
    }

    let mut buckets = Vec::new();
    match granularity {
        Granularity::Day => {
            for date in start.iter_days().take_while(|d| *d <= end) {
                let (income, expense) = totals.get(&date).copied().unwrap_or_default();
                buckets.push(ChartBucket {
                    label: day_label(window, date),
                    income,
                    expense,
                    is_current_period: date == now,
                });
            }
        }
        Granularity::Month => {
            let mut cursor = month_start(start);
            let last = month_start(end);
            while cursor <= last {
                let (income, expense) = totals.get(&cursor).copied().unwrap_or_default();
                buckets.push(ChartBucket {
                    label: MONTH_LABELS[cursor.month0() as usize].to_string(),
                    income,
                    expense,
                    is_current_period: cursor == month_start(now),
                });
                match cursor.checked_add_months(Months::new(1)) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }
    }
    buckets
}

fn day_label(window: ChartWindow, date: NaiveDate) -> String {
    match window {
        ChartWindow::Today => "Hoje".to_string(),
        ChartWindow::ThisWeek => WEEKDAY_LABELS[monday_first_index(date)].to_string(),
        // Repeated weekday abbreviations are ambiguous over a month; use the
        // day of month instead.
        _ => date.day().to_string(),
    }
}
