use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// Calendar day (UTC) of an instant. Snapshots are keyed by this day.
pub fn valuation_date_from_utc(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Today's calendar day in UTC.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now())
}

/// Midnight at the start of `date`, as a UTC instant.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    midnight.and_utc()
}

/// Inclusive `[today - days, today]` window. Clamps to `NaiveDate::MIN`.
pub fn trailing_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    let start = TimeDelta::try_days(days.max(0))
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}
