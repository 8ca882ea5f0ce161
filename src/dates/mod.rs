use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult};

/// Abbreviated month names, index 0 = January.
const MONTH_NAMES: [&str; 12] = [
    "jan", "fev", "mar", "abr", "maio", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Difference in calendar months from `from` to `to`, ignoring the day of
/// month. Negative when `to` falls in an earlier month.
pub(crate) fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let years = to.year() - from.year();
    years * 12 + to.month() as i32 - from.month() as i32
}

/// Inclusive count of calendar months touched by `[start, end]`.
///
/// A range inside a single month spans 1.
pub(crate) fn month_span(start: NaiveDate, end: NaiveDate) -> CoreResult<u32> {
    if end < start {
        return Err(CoreError::domain(format!(
            "end date {end} is before start date {start}"
        )));
    }
    Ok(months_between(start, end) as u32 + 1)
}

/// Name of month `index` (1 = January).
pub(crate) fn month_name(index: u32) -> CoreResult<&'static str> {
    match index {
        1..=12 => Ok(MONTH_NAMES[index as usize - 1]),
        _ => Err(CoreError::domain(format!(
            "month index {index} outside 1..=12"
        ))),
    }
}

/// `count` consecutive month names starting at the month of `start`,
/// wrapping past December.
pub(crate) fn month_labels(start: NaiveDate, count: u32) -> Vec<&'static str> {
    (0..count)
        .map(|i| MONTH_NAMES[((start.month0() + i) % 12) as usize])
        .collect()
}

#[cfg(test)]
mod tests;
