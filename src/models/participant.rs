#[derive(Debug, Clone)]
pub struct Participant {
    pub id: Option<i64>,
    pub plan_id: i64,
    pub name: String,
    /// Phone, e-mail, anything that reaches the person.
    pub contact: String,
}

impl Participant {
    pub fn new(plan_id: i64, name: String, contact: String) -> Self {
        Self {
            id: None,
            plan_id,
            name,
            contact,
        }
    }

    /// Find a participant by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(participants: &'a [Participant], name: &str) -> Option<&'a Participant> {
        let lower = name.to_lowercase();
        participants.iter().find(|p| p.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
