//! Calendar months used to window transactions on the dashboard.

use std::{fmt::Display, str::FromStr};

use time::{Date, Duration, Month};

use crate::Error;

/// A calendar month, e.g. November 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    first_day: Date,
}

impl Period {
    /// Create the period for `year` and `month`.
    ///
    /// Returns `None` if the year is outside the range supported by [Date].
    pub fn new(year: i32, month: Month) -> Option<Self> {
        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first_day| Self { first_day })
    }

    /// The period that `date` falls in.
    pub fn containing(date: Date) -> Self {
        Self {
            first_day: date.replace_day(1).unwrap_or(date),
        }
    }

    /// The year of the period.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month of the period.
    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        let days = self.month().length(self.year());
        self.first_day.replace_day(days).unwrap_or(self.first_day)
    }

    /// Whether `date` falls inside the period.
    pub fn contains(&self, date: Date) -> bool {
        Period::containing(date) == *self
    }

    /// The inclusive range of dates in the period.
    pub fn date_range(&self) -> std::ops::RangeInclusive<Date> {
        self.first_day()..=self.last_day()
    }

    /// The period `months` months after this one, or before it if `months` is negative.
    ///
    /// Returns `None` if the result would be outside the range supported by [Date].
    pub fn offset(&self, months: i32) -> Option<Self> {
        add_months_clamped(self.first_day, months).map(Period::containing)
    }

    /// The period immediately before this one.
    pub fn previous(&self) -> Option<Self> {
        self.offset(-1)
    }

    /// The period immediately after this one.
    pub fn next(&self) -> Option<Self> {
        self.offset(1)
    }

    /// The date for `day` in this month, rolling over into the following month
    /// when the month is too short.
    ///
    /// For example, day 31 of November is the 1st of December and day 30 of
    /// February 2025 is the 2nd of March.
    pub fn day_rollover(&self, day: u8) -> Date {
        let extra_days = i64::from(day.max(1)) - 1;
        self.first_day
            .checked_add(Duration::days(extra_days))
            .unwrap_or_else(|| self.last_day())
    }

    /// The label shown in the period navigator, e.g. "NOVEMBER 2025".
    pub fn label(&self) -> String {
        format!("{} {}", self.month().to_string().to_uppercase(), self.year())
    }

    /// The `count` periods ending with this one, in chronological order.
    pub fn trailing(&self, count: usize) -> Vec<Period> {
        let mut periods: Vec<Period> = (0..count)
            .map_while(|i| i32::try_from(i).ok().and_then(|i| self.offset(-i)))
            .collect();
        periods.reverse();
        periods
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() as u8)
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse a period in the format "YYYY-MM".
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPeriod(text.to_owned());

        let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Period::new(year, month).ok_or_else(invalid)
    }
}

/// Add `months` calendar months to `date`, clamping the day to the end of
/// shorter months.
///
/// For example, 31 January plus one month is 28 February (29 in a leap year).
/// Returns `None` if the result is outside the range supported by [Date].
pub fn add_months_clamped(date: Date, months: i32) -> Option<Date> {
    let month_index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::from(date.month() as u8 - 1))?
        .checked_add(months)?;
    let year = month_index.div_euclid(12);
    let month = u8::try_from(month_index.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month).ok()?;
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).ok()
}
