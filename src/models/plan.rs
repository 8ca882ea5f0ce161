use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Contribution, Participant};
use crate::dates;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{self, MonthlyMatrix};

/// A savings goal shared by a group of participants.
#[derive(Debug, Clone)]
pub struct SavingsPlan {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub description: String,
    pub target: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Insertion order, as loaded from the store.
    pub participants: Vec<Participant>,
    pub contributions: Vec<Contribution>,
}

impl SavingsPlan {
    pub(crate) fn new(
        owner_id: i64,
        description: String,
        target: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> CoreResult<Self> {
        if end_date < start_date {
            return Err(CoreError::domain(format!(
                "plan ends ({end_date}) before it starts ({start_date})"
            )));
        }
        Ok(Self {
            id: None,
            owner_id,
            description,
            target,
            start_date,
            end_date,
            participants: Vec::new(),
            contributions: Vec::new(),
        })
    }

    pub(crate) fn period_months(&self) -> CoreResult<u32> {
        dates::month_span(self.start_date, self.end_date)
    }

    pub(crate) fn month_labels(&self) -> CoreResult<Vec<&'static str>> {
        Ok(dates::month_labels(self.start_date, self.period_months()?))
    }

    pub(crate) fn monthly_matrix(&self) -> CoreResult<MonthlyMatrix> {
        ledger::build_monthly_matrix(
            self.start_date,
            self.end_date,
            &self.participants,
            &self.contributions,
        )
    }

    /// Net of all contributions, withdrawals included.
    pub fn total_contributed(&self) -> Decimal {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    /// Share of the target reached so far, clamped to `[0, 1]`.
    pub fn progress(&self) -> Decimal {
        if self.target <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.total_contributed() / self.target).clamp(Decimal::ZERO, Decimal::ONE)
    }

    pub fn find_participant(&self, participant_id: i64) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.id == Some(participant_id))
    }
}

impl std::fmt::Display for SavingsPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}
