use chrono::{Datelike, NaiveDate, Weekday};

use super::error::{AppError, Result};

/// Title printed in the banner of every page.
pub const SHEET_TITLE: &str = "ATTENDANCE SHEET";

/// Table header, left to right. The last four columns are filled in by hand
/// on the printed sheet and carry no data.
pub const COLUMN_HEADERS: [&str; 6] = ["Date", "Day", "IN", "OUT", "SIGN", "REMARK"];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// One calendar day within a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub day: u32,
    pub weekday: &'static str,
    /// Set exactly when the day falls on a Friday.
    pub special: bool,
}

impl DayRow {
    /// Zero-padded day number as it appears in the Date column.
    pub fn date_label(&self) -> String {
        format!("{:02}", self.day)
    }
}

/// One person's full-month attendance table plus header, the unit of
/// PDF output. Regenerated in full on every generate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub rows: Vec<DayRow>,
}

impl Page {
    pub fn month_label(&self) -> String {
        month_label(self.year, self.month)
    }
}

/// Number of days in a calendar month (1-based), or `None` when the month
/// is out of range. First day of the next month minus one day.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some((first_of_next - chrono::Duration::days(1)).day())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Banner month label, e.g. "February-2024".
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("");
    format!("{}-{}", name, year)
}

/// Build one page per name, in input order. Pure: no UI, no persistence.
///
/// Names are trimmed and upper-cased before placement. Fails when `names`
/// is empty or the month is out of range; the caller turns those into
/// user-facing messages.
pub fn generate(year: i32, month: u32, names: &[String]) -> Result<Vec<Page>> {
    if names.is_empty() {
        return Err(AppError::Sheet("select at least one name".to_string()));
    }
    let day_count = days_in_month(year, month)
        .ok_or_else(|| AppError::Sheet(format!("invalid month: {}-{:02}", year, month)))?;

    let mut pages = Vec::with_capacity(names.len());
    for name in names {
        let mut rows = Vec::with_capacity(day_count as usize);
        for day in 1..=day_count {
            // days_in_month already validated (year, month)
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| AppError::Sheet(format!("invalid date: {}-{:02}-{:02}", year, month, day)))?;
            let weekday = date.weekday();
            rows.push(DayRow {
                day,
                weekday: weekday_name(weekday),
                special: weekday == Weekday::Fri,
            });
        }
        pages.push(Page {
            name: name.trim().to_uppercase(),
            year,
            month,
            rows,
        });
    }
    Ok(pages)
}
