use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// An RSVP-style event owned by a user.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub name: String,
    pub contact: String,
    /// Price per person.
    pub price: Decimal,
    pub starts_at: NaiveDateTime,
    pub location: String,
}

impl Event {
    pub const DATETIME_FORMAT: &'static str = "%Y-%m-%d %H:%M";

    pub fn new(
        owner_id: i64,
        name: String,
        contact: String,
        price: Decimal,
        starts_at: NaiveDateTime,
        location: String,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            name,
            contact,
            price,
            starts_at,
            location,
        }
    }

    pub fn parse_starts_at(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s.trim(), Self::DATETIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M"))
            .ok()
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.starts_at < now
    }
}
