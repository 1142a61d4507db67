use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Year,
}

/// One cell of a calendar grid.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Monday = 0 .. Sunday = 6
    pub weekday: u32,
    /// Leading padding borrowed from the previous month. Rendered dimmed and
    /// never used for attachment lookups.
    pub outside_period: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthGroup {
    pub month: u32,
    pub label: &'static str,
    /// Offset of the month's first day within the year sequence.
    pub start_index: usize,
    pub days: u32,
}

/// Monday-first weekday index.
///
/// Computed from the Sunday-based number rather than trusting any particular
/// week start of the underlying primitive.
pub fn weekday_index(date: NaiveDate) -> u32 {
    (date.weekday().num_days_from_sunday() + 6) % 7
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_of_month(year, month).map_or(0, |last| last.day())
}

/// Expand `reference` into the ordered day sequence of its month or year.
pub fn expand_range(reference: NaiveDate, granularity: Granularity) -> Vec<CalendarDay> {
    match granularity {
        Granularity::Month => expand_month(reference.year(), reference.month()),
        Granularity::Year => expand_year(reference.year()),
    }
}

fn expand_month(year: i32, month: u32) -> Vec<CalendarDay> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };

    let total = days_in_month(year, month);

    // Walk back to Monday; stops early at the first representable date.
    let mut padding: Vec<NaiveDate> = Vec::with_capacity(6);
    let mut cursor = first;
    for _ in 0..weekday_index(first) {
        match cursor.pred_opt() {
            Some(prev) => {
                padding.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }

    let mut days = Vec::with_capacity(padding.len() + total as usize);
    days.extend(padding.into_iter().rev().map(|date| CalendarDay {
        date,
        weekday: weekday_index(date),
        outside_period: true,
    }));

    days.extend(
        first
            .iter_days()
            .take(total as usize)
            .map(|date| CalendarDay {
                date,
                weekday: weekday_index(date),
                outside_period: false,
            }),
    );

    days
}

fn expand_year(year: i32) -> Vec<CalendarDay> {
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };

    dates_between(first, last)
        .into_iter()
        .map(|date| CalendarDay {
            date,
            weekday: weekday_index(date),
            outside_period: false,
        })
        .collect()
}

/// Partition a year into its twelve months, used to size the heatmap header
/// proportionally.
pub fn month_groups(year: i32) -> Vec<MonthGroup> {
    let mut start_index = 0usize;
    (1..=12)
        .map(|month| {
            let days = days_in_month(year, month);
            let group = MonthGroup {
                month,
                label: MONTH_LABELS[(month - 1) as usize],
                start_index,
                days,
            };
            start_index += days as usize;
            group
        })
        .collect()
}

/// Inclusive list of dates. Empty when `from > to`.
pub fn dates_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from > to {
        return Vec::new();
    }
    let count = (to - from).num_days() as usize + 1;
    from.iter_days().take(count).collect()
}

/// First and last day covered by `expand_range`'s non-padding cells.
pub fn period_bounds(reference: NaiveDate, granularity: Granularity) -> Option<(NaiveDate, NaiveDate)> {
    match granularity {
        Granularity::Month => {
            let first = first_of_month(reference.year(), reference.month())?;
            let last = last_of_month(reference.year(), reference.month())?;
            Some((first, last))
        }
        Granularity::Year => Some((
            NaiveDate::from_ymd_opt(reference.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(reference.year(), 12, 31)?,
        )),
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// December is special-cased so the last representable year still has an end.
fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        return NaiveDate::from_ymd_opt(year, 12, 31);
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1).and_then(|next| next.pred_opt())
}
