use chrono::{Datelike, Days, Months, NaiveDate};

/// Weekday labels indexed by [`monday_first_index`].
pub const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

/// Month abbreviations indexed by `month0`.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Monday-first index of a date's weekday: 0 = Monday … 6 = Sunday.
///
/// The platform numbering is Sunday-first (0 = Sunday); the weekly view is
/// Monday-first, so the native index is rotated here rather than inline at
/// every call site.
pub fn monday_first_index(date: NaiveDate) -> usize {
    ((date.weekday().num_days_from_sunday() + 6) % 7) as usize
}

/// The Monday starting the week that contains `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(monday_first_index(date) as u64)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 always exists for a valid year/month.
    date.with_day(1).unwrap_or(date)
}

/// `date` minus `months` calendar months, day-of-month clamped.
pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// Number of calendar days in `[start, end]`, inclusive of both endpoints.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Number of calendar months touched by `[start, end]`, inclusive.
pub fn months_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    years * 12 + i64::from(end.month()) - i64::from(start.month()) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn monday_first_index_rotates_the_sunday_first_numbering() {
        // 2024-01-01 is a Monday.
        assert_eq!(monday_first_index(d(2024, 1, 1)), 0);
        assert_eq!(monday_first_index(d(2024, 1, 6)), 5); // Saturday
        assert_eq!(monday_first_index(d(2024, 1, 7)), 6); // Sunday, not 0
    }

    #[test]
    fn monday_of_week_is_identity_on_mondays() {
        assert_eq!(monday_of_week(d(2024, 1, 1)), d(2024, 1, 1));
        assert_eq!(monday_of_week(d(2024, 1, 7)), d(2024, 1, 1));
        assert_eq!(monday_of_week(d(2024, 1, 4)), d(2024, 1, 1));
    }

    #[test]
    fn sub_months_clamps_the_day_of_month() {
        assert_eq!(sub_months(d(2024, 3, 31), 1), d(2024, 2, 29));
        assert_eq!(sub_months(d(2023, 3, 31), 1), d(2023, 2, 28));
        assert_eq!(sub_months(d(2024, 1, 15), 12), d(2023, 1, 15));
    }

    #[test]
    fn inclusive_spans_count_both_endpoints() {
        assert_eq!(days_inclusive(d(2024, 1, 1), d(2024, 1, 1)), 1);
        assert_eq!(days_inclusive(d(2024, 1, 1), d(2024, 1, 7)), 7);
        // Leap February.
        assert_eq!(days_inclusive(d(2024, 2, 1), d(2024, 2, 29)), 29);
        assert_eq!(months_inclusive(d(2023, 11, 20), d(2024, 2, 3)), 4);
        assert_eq!(months_inclusive(d(2024, 5, 1), d(2024, 5, 31)), 1);
    }
}
