use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates;
use crate::error::{CoreError, CoreResult};
use crate::models::{Contribution, Participant};

/// One participant's contributions, one cell per plan month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatrixRow {
    pub(crate) participant_id: Option<i64>,
    pub(crate) label: String,
    pub(crate) cells: Vec<Decimal>,
}

impl MatrixRow {
    pub(crate) fn total(&self) -> Decimal {
        self.cells
            .iter()
            .fold(Decimal::ZERO, |acc, cell| acc.saturating_add(*cell))
    }
}

/// Contributions per participant per month, rows in participant order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlyMatrix {
    pub(crate) start: NaiveDate,
    pub(crate) months: u32,
    pub(crate) rows: Vec<MatrixRow>,
}

impl MonthlyMatrix {
    /// Group total for each month. A built matrix never saturates, see
    /// [`build_monthly_matrix`].
    pub(crate) fn column_totals(&self) -> Vec<Decimal> {
        let mut totals = vec![Decimal::ZERO; self.months as usize];
        for row in &self.rows {
            for (total, cell) in totals.iter_mut().zip(&row.cells) {
                *total = total.saturating_add(*cell);
            }
        }
        totals
    }

    pub(crate) fn grand_total(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.total()))
    }

    pub(crate) fn labels(&self) -> Vec<&'static str> {
        dates::month_labels(self.start, self.months)
    }
}

/// Sum each contribution into its participant's row at the month it falls
/// in, counted from `start`.
///
/// Fails as a whole: a contribution from an unknown participant or dated
/// outside `[start, end]` rejects the build. Unknown participants are
/// reported first. Sums that would overflow are a `Domain` error.
pub(crate) fn build_monthly_matrix(
    start: NaiveDate,
    end: NaiveDate,
    participants: &[Participant],
    contributions: &[Contribution],
) -> CoreResult<MonthlyMatrix> {
    let months = dates::month_span(start, end)?;

    let row_of: HashMap<i64, usize> = participants
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.id.map(|id| (id, i)))
        .collect();

    let mut rows: Vec<MatrixRow> = participants
        .iter()
        .map(|p| MatrixRow {
            participant_id: p.id,
            label: p.name.clone(),
            cells: vec![Decimal::ZERO; months as usize],
        })
        .collect();

    // Every participant reference is resolved before any date is looked at
    let placed = contributions
        .iter()
        .map(|c| {
            row_of
                .get(&c.participant_id)
                .map(|row| (*row, c))
                .ok_or_else(|| CoreError::Reference {
                    description: c.description.clone(),
                    participant: c.participant_id,
                })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    for (row, c) in placed {
        if c.date < start || c.date > end {
            return Err(CoreError::Range {
                description: c.description.clone(),
                date: c.date,
                start,
                end,
            });
        }

        // In range by the check above, so 0 <= offset < months
        let offset = dates::months_between(start, c.date) as usize;
        let cell = &mut rows[row].cells[offset];
        *cell = cell
            .checked_add(c.amount)
            .ok_or_else(|| overflow(&c.description))?;
    }

    // Row, column and grand totals must fit as well
    for row in &rows {
        checked_sum(&row.cells).ok_or_else(|| overflow(&row.label))?;
    }
    let mut column_totals = vec![Decimal::ZERO; months as usize];
    for row in &rows {
        for (total, cell) in column_totals.iter_mut().zip(&row.cells) {
            *total = total
                .checked_add(*cell)
                .ok_or_else(|| overflow(&row.label))?;
        }
    }
    checked_sum(&column_totals).ok_or_else(|| overflow("grand total"))?;

    Ok(MonthlyMatrix {
        start,
        months,
        rows,
    })
}

fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

fn overflow(what: &str) -> CoreError {
    CoreError::domain(format!("amounts for '{what}' are too large to add up"))
}

#[cfg(test)]
mod tests;
