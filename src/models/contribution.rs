use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A dated cash entry against a plan. Negative amounts are withdrawals.
#[derive(Debug, Clone)]
pub struct Contribution {
    pub id: Option<i64>,
    pub plan_id: i64,
    pub participant_id: i64,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl Contribution {
    pub fn new(
        plan_id: i64,
        participant_id: i64,
        description: String,
        date: NaiveDate,
        amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            plan_id,
            participant_id,
            description,
            date,
            amount,
        }
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
