//! Savings projections: how much each participant pays per month and what
//! the group ends up with.
//!
//! Two policies are offered. [`ZeroYield`] splits the target linearly with
//! no growth, so the accumulated amount is the target itself.
//! [`CompoundYield`] splits the target over the period and projects the
//! future value of those installments at a fixed monthly rate; that
//! accumulated figure is a forecast and generally differs from the target.
//!
//! Values are never rounded here. Call [`ProjectionResult::rounded`] when
//! presenting them.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

use crate::error::{CoreError, CoreResult};
use crate::models::SavingsPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProjectionResult {
    pub(crate) per_participant: Decimal,
    pub(crate) total_per_month: Decimal,
    pub(crate) accumulated: Decimal,
}

impl ProjectionResult {
    /// Two fractional digits, midpoint away from zero.
    pub(crate) fn rounded(&self) -> Self {
        let r = |v: Decimal| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            per_participant: r(self.per_participant),
            total_per_month: r(self.total_per_month),
            accumulated: r(self.accumulated),
        }
    }
}

/// A projection policy.
pub(crate) trait Projection {
    fn name(&self) -> &'static str;
    fn project(&self) -> CoreResult<ProjectionResult>;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ZeroYield {
    pub(crate) target: Decimal,
    pub(crate) installments: u32,
    pub(crate) participants: u32,
}

impl Projection for ZeroYield {
    fn name(&self) -> &'static str {
        "zero-yield"
    }

    fn project(&self) -> CoreResult<ProjectionResult> {
        require_positive_target(self.target)?;
        require_positive_count("installments", self.installments)?;
        require_positive_count("participants", self.participants)?;

        let installments = Decimal::from(self.installments);
        let participants = Decimal::from(self.participants);
        let total_per_month = self.target / installments;
        Ok(ProjectionResult {
            per_participant: self.target / (installments * participants),
            total_per_month,
            accumulated: self.target,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CompoundYield {
    pub(crate) target: Decimal,
    /// Monthly rate as a fraction (0.01 = 1% a month).
    pub(crate) monthly_rate: Decimal,
    pub(crate) period_months: u32,
    pub(crate) participants: u32,
}

impl Projection for CompoundYield {
    fn name(&self) -> &'static str {
        "compound-yield"
    }

    fn project(&self) -> CoreResult<ProjectionResult> {
        require_positive_target(self.target)?;
        require_positive_count("period", self.period_months)?;
        require_positive_count("participants", self.participants)?;
        if self.monthly_rate < Decimal::ZERO {
            return Err(CoreError::domain(format!(
                "monthly rate must not be negative, got {}",
                self.monthly_rate
            )));
        }

        let period = Decimal::from(self.period_months);
        let total_per_month = self.target / period;
        let per_participant = total_per_month / Decimal::from(self.participants);

        let accumulated = if self.monthly_rate > Decimal::ZERO {
            // Future value of an ordinary annuity.
            let growth = (Decimal::ONE + self.monthly_rate)
                .checked_powu(u64::from(self.period_months))
                .ok_or_else(|| overflow(self))?;
            (growth - Decimal::ONE)
                .checked_div(self.monthly_rate)
                .and_then(|factor| total_per_month.checked_mul(factor))
                .ok_or_else(|| overflow(self))?
        } else {
            total_per_month * period
        };

        Ok(ProjectionResult {
            per_participant,
            total_per_month,
            accumulated,
        })
    }
}

pub(crate) fn compute_zero_yield(
    target: Decimal,
    installments: u32,
    participants: u32,
) -> CoreResult<ProjectionResult> {
    ZeroYield {
        target,
        installments,
        participants,
    }
    .project()
}

pub(crate) fn compute_compound_yield(
    target: Decimal,
    monthly_rate: Decimal,
    period_months: u32,
    participants: u32,
) -> CoreResult<ProjectionResult> {
    CompoundYield {
        target,
        monthly_rate,
        period_months,
        participants,
    }
    .project()
}

/// Compound projection over the plan's own month span.
pub(crate) fn project_plan(
    plan: &SavingsPlan,
    annual_percent: Decimal,
    participants: u32,
) -> CoreResult<ProjectionResult> {
    compute_compound_yield(
        plan.target,
        monthly_rate_from_annual_percent(annual_percent),
        plan.period_months()?,
        participants,
    )
}

/// `12` (% a year) becomes `0.01` a month.
pub(crate) fn monthly_rate_from_annual_percent(annual_percent: Decimal) -> Decimal {
    annual_percent / Decimal::ONE_HUNDRED / Decimal::from(12)
}

pub(crate) fn annual_percent_from_monthly(monthly_rate: Decimal) -> Decimal {
    monthly_rate * Decimal::from(12) * Decimal::ONE_HUNDRED
}

/// Balance at the end of each month when `per_month` is paid in at the end
/// of every month and the balance earns `monthly_rate`. The last entry is
/// the compound-yield accumulated amount.
pub(crate) fn accumulation_schedule(
    per_month: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> CoreResult<Vec<Decimal>> {
    let growth = Decimal::ONE + monthly_rate;
    let mut balance = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(months as usize);
    for month in 1..=months {
        balance = balance
            .checked_mul(growth)
            .and_then(|b| b.checked_add(per_month))
            .ok_or_else(|| {
                CoreError::domain(format!(
                    "balance out of range in month {month} of {months}"
                ))
            })?;
        schedule.push(balance);
    }
    Ok(schedule)
}

fn require_positive_target(target: Decimal) -> CoreResult<()> {
    if target <= Decimal::ZERO {
        return Err(CoreError::domain(format!(
            "target must be positive, got {target}"
        )));
    }
    Ok(())
}

fn require_positive_count(what: &str, count: u32) -> CoreResult<()> {
    if count == 0 {
        return Err(CoreError::domain(format!("{what} must be at least 1")));
    }
    Ok(())
}

fn overflow(p: &CompoundYield) -> CoreError {
    CoreError::domain(format!(
        "rate {} over {} months is out of range",
        p.monthly_rate, p.period_months
    ))
}

#[cfg(test)]
mod tests;
